// ============================================================================
// ROUTE LAYER - Rutas de la flota sobre el mapa del planificador
// ============================================================================
// Mantiene una única instancia de mapa. Las operaciones que llegan con el estilo
// sin cargar (o recargando) se encolan y se reproducen en orden en cuanto el
// mapa vuelve a estar listo: en `load`/`idle` o antes de la siguiente operación.
// ============================================================================

use std::collections::HashMap;
use std::mem;

use serde_json::Value;

use super::layers::{routes_lines, stops_circles, ROUTES_LAYER, ROUTES_SOURCE, STOPS_LAYER, STOPS_SOURCE};
use super::paint::{RoutePaint, DEPOT_COLOR};
use super::popups::DEPOT_POPUP_HTML;
use super::sources::{routes_collection, stops_collection};
use super::traits::{MapError, MapRenderer, MarkerSpec, PopupKind};
use crate::models::{Bounds, LngLat, VehicleRoute};

pub const FIT_PADDING: f64 = 80.0;
pub const FIT_MAX_ZOOM: f64 = 14.0;

#[derive(Debug, Clone, PartialEq)]
enum PendingOp {
    SetRoutes(Vec<VehicleRoute>),
    SetSelection(Option<String>),
    SetVisibility(HashMap<String, bool>),
    FitTo(Bounds),
}

impl PendingOp {
    /// Solo cuenta la última de cada tipo; los encuadres se guardan todos
    fn supersedes(&self, queued: &PendingOp) -> bool {
        matches!(
            (self, queued),
            (PendingOp::SetRoutes(_), PendingOp::SetRoutes(_))
                | (PendingOp::SetSelection(_), PendingOp::SetSelection(_))
                | (PendingOp::SetVisibility(_), PendingOp::SetVisibility(_))
        )
    }
}

pub struct RouteLayer<R: MapRenderer> {
    renderer: Option<R>,
    routes: Vec<VehicleRoute>,
    selected: Option<String>,
    pending: Vec<PendingOp>,
}

impl<R: MapRenderer> Default for RouteLayer<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: MapRenderer> RouteLayer<R> {
    pub fn new() -> Self {
        Self {
            renderer: None,
            routes: Vec::new(),
            selected: None,
            pending: Vec::new(),
        }
    }

    /// Toma posesión del mapa. Si había otro, se libera antes.
    pub fn initialize(&mut self, mut renderer: R, depot: LngLat) -> Result<(), MapError> {
        self.teardown();

        renderer.add_navigation_control()?;
        renderer.add_marker(&MarkerSpec {
            position: depot,
            color: DEPOT_COLOR.to_string(),
            popup_html: Some(DEPOT_POPUP_HTML.to_string()),
        })?;
        self.renderer = Some(renderer);
        log::info!("🗺️ Mapa de rutas inicializado");
        Ok(())
    }

    pub fn teardown(&mut self) {
        if let Some(mut renderer) = self.renderer.take() {
            renderer.remove();
            log::info!("🧹 Mapa de rutas liberado");
        }
        self.routes.clear();
        self.selected = None;
        self.pending.clear();
    }

    pub fn is_ready(&self) -> bool {
        self.renderer
            .as_ref()
            .map(|r| r.is_style_loaded())
            .unwrap_or(false)
    }

    /// Llamar desde los eventos `load` e `idle` del mapa
    pub fn on_style_loaded(&mut self) {
        if self.is_ready() {
            self.flush_pending();
        }
    }

    fn flush_pending(&mut self) {
        let ops = mem::take(&mut self.pending);
        if !ops.is_empty() {
            log::info!("▶️ Reproduciendo {} operaciones encoladas", ops.len());
        }
        for op in ops {
            if let Err(e) = self.execute(op) {
                log::warn!("⚠️ Operación de mapa fallida: {}", e);
            }
        }
    }

    pub fn set_routes(&mut self, routes: Vec<VehicleRoute>) -> Result<(), MapError> {
        self.submit(PendingOp::SetRoutes(routes))
    }

    pub fn set_selection(&mut self, vehicle_id: Option<String>) -> Result<(), MapError> {
        self.submit(PendingOp::SetSelection(vehicle_id))
    }

    pub fn set_visibility(&mut self, visibility: HashMap<String, bool>) -> Result<(), MapError> {
        self.submit(PendingOp::SetVisibility(visibility))
    }

    pub fn fit_to(&mut self, bounds: Bounds) -> Result<(), MapError> {
        self.submit(PendingOp::FitTo(bounds))
    }

    pub fn routes(&self) -> &[VehicleRoute] {
        &self.routes
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn renderer(&self) -> Option<&R> {
        self.renderer.as_ref()
    }

    pub fn renderer_mut(&mut self) -> Option<&mut R> {
        self.renderer.as_mut()
    }

    fn submit(&mut self, op: PendingOp) -> Result<(), MapError> {
        if self.is_ready() {
            // Lo encolado durante una recarga del estilo va antes
            self.flush_pending();
            self.execute(op)
        } else {
            self.pending.retain(|queued| !op.supersedes(queued));
            self.pending.push(op);
            Ok(())
        }
    }

    fn execute(&mut self, op: PendingOp) -> Result<(), MapError> {
        match op {
            PendingOp::SetRoutes(routes) => {
                self.routes = routes;
                self.sync_sources()?;
                self.repaint()
            }
            PendingOp::SetSelection(selected) => {
                self.selected = selected;
                self.repaint()
            }
            PendingOp::SetVisibility(visibility) => {
                for route in &mut self.routes {
                    if let Some(visible) = visibility.get(&route.vehicle_id) {
                        route.visible = *visible;
                    }
                }
                self.repaint()
            }
            PendingOp::FitTo(bounds) => {
                let renderer = self.renderer.as_mut().ok_or(MapError::NotReady)?;
                renderer.fit_bounds(&bounds, FIT_PADDING, FIT_MAX_ZOOM)
            }
        }
    }

    /// Fuentes y capas se crean una sola vez; después solo cambian los datos
    fn sync_sources(&mut self) -> Result<(), MapError> {
        let renderer = self.renderer.as_mut().ok_or(MapError::NotReady)?;

        renderer.upsert_source(ROUTES_SOURCE, &routes_collection(&self.routes))?;
        if renderer.ensure_layer(&routes_lines())? {
            renderer.bind_popup(ROUTES_LAYER, PopupKind::Route)?;
        }

        renderer.upsert_source(STOPS_SOURCE, &stops_collection(&self.routes))?;
        if renderer.ensure_layer(&stops_circles())? {
            renderer.bind_popup(STOPS_LAYER, PopupKind::Stop)?;
        }
        Ok(())
    }

    fn repaint(&mut self) -> Result<(), MapError> {
        let renderer = self.renderer.as_mut().ok_or(MapError::NotReady)?;
        if !renderer.has_layer(ROUTES_LAYER) {
            return Ok(());
        }
        let paint = RoutePaint::compute(&self.routes, self.selected.as_deref());
        let updates: [(&str, &str, &Value); 4] = [
            (ROUTES_LAYER, "line-opacity", &paint.line_opacity),
            (ROUTES_LAYER, "line-width", &paint.line_width),
            (STOPS_LAYER, "circle-opacity", &paint.stop_opacity),
            (STOPS_LAYER, "circle-stroke-opacity", &paint.stop_opacity),
        ];
        for (layer, property, value) in updates {
            renderer.set_paint_property(layer, property, value)?;
        }
        Ok(())
    }
}

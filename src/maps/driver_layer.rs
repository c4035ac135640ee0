// ============================================================================
// DRIVER LAYER - Mapa de navegación del conductor
// ============================================================================
// Una línea (depósito → entregas → depósito) y un punto numerado por entrega.
// ============================================================================

use std::mem;

use super::layers::{
    delivery_numbers, delivery_points, driver_route_line, DELIVERIES_SOURCE, DELIVERY_POINTS_LAYER,
    DRIVER_ROUTE_SOURCE,
};
use super::paint::DEPOT_COLOR;
use super::popups::DEPOT_POPUP_HTML;
use super::route_layer::{FIT_MAX_ZOOM, FIT_PADDING};
use super::sources::{deliveries_collection, line_collection};
use super::traits::{MapError, MapRenderer, MarkerSpec, PopupKind};
use crate::models::{Bounds, DriverDelivery, LngLat};

#[derive(Debug, Clone, PartialEq)]
enum DriverOp {
    Render {
        deliveries: Vec<DriverDelivery>,
        line: Vec<LngLat>,
    },
    FitTo(Bounds),
}

impl DriverOp {
    /// Un render nuevo deja obsoleto cualquier otro encolado
    fn supersedes(&self, queued: &DriverOp) -> bool {
        matches!((self, queued), (DriverOp::Render { .. }, DriverOp::Render { .. }))
    }
}

pub struct DriverLayer<R: MapRenderer> {
    renderer: Option<R>,
    pending: Vec<DriverOp>,
}

impl<R: MapRenderer> Default for DriverLayer<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: MapRenderer> DriverLayer<R> {
    pub fn new() -> Self {
        Self {
            renderer: None,
            pending: Vec::new(),
        }
    }

    pub fn initialize(&mut self, mut renderer: R, depot: LngLat) -> Result<(), MapError> {
        self.teardown();

        renderer.add_navigation_control()?;
        renderer.add_geolocate_control()?;
        renderer.add_marker(&MarkerSpec {
            position: depot,
            color: DEPOT_COLOR.to_string(),
            popup_html: Some(DEPOT_POPUP_HTML.to_string()),
        })?;
        self.renderer = Some(renderer);
        log::info!("🧭 Mapa del conductor inicializado");
        Ok(())
    }

    pub fn teardown(&mut self) {
        if let Some(mut renderer) = self.renderer.take() {
            renderer.remove();
        }
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
        for op in mem::take(&mut self.pending) {
            if let Err(e) = self.execute(op) {
                log::warn!("⚠️ Operación de mapa fallida: {}", e);
            }
        }
    }

    /// Pinta las entregas activas y la línea que las une
    pub fn render(&mut self, deliveries: &[DriverDelivery], line: &[LngLat]) -> Result<(), MapError> {
        self.submit(DriverOp::Render {
            deliveries: deliveries.to_vec(),
            line: line.to_vec(),
        })
    }

    pub fn fit_to(&mut self, bounds: Bounds) -> Result<(), MapError> {
        self.submit(DriverOp::FitTo(bounds))
    }

    pub fn renderer(&self) -> Option<&R> {
        self.renderer.as_ref()
    }

    pub fn renderer_mut(&mut self) -> Option<&mut R> {
        self.renderer.as_mut()
    }

    fn submit(&mut self, op: DriverOp) -> Result<(), MapError> {
        if self.is_ready() {
            self.flush_pending();
            self.execute(op)
        } else {
            self.pending.retain(|queued| !op.supersedes(queued));
            self.pending.push(op);
            Ok(())
        }
    }

    fn execute(&mut self, op: DriverOp) -> Result<(), MapError> {
        let renderer = self.renderer.as_mut().ok_or(MapError::NotReady)?;
        match op {
            DriverOp::Render { deliveries, line } => {
                // La línea primero para que quede debajo de los puntos
                renderer.upsert_source(DRIVER_ROUTE_SOURCE, &line_collection(&line))?;
                renderer.ensure_layer(&driver_route_line())?;

                renderer.upsert_source(DELIVERIES_SOURCE, &deliveries_collection(&deliveries))?;
                if renderer.ensure_layer(&delivery_points())? {
                    renderer.bind_popup(DELIVERY_POINTS_LAYER, PopupKind::Delivery)?;
                }
                renderer.ensure_layer(&delivery_numbers())?;
                Ok(())
            }
            DriverOp::FitTo(bounds) => renderer.fit_bounds(&bounds, FIT_PADDING, FIT_MAX_ZOOM),
        }
    }
}

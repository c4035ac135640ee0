// ============================================================================
// ROUTE PLANNER VIEWMODEL - Flota + mapa + geometría por carretera
// ============================================================================
// Une la leyenda, el panel de filtros y la capa de rutas. Cada recálculo de
// geometría abre una generación nueva; los lotes viejos se descartan al llegar.
// ============================================================================

use std::cell::{Cell, Ref, RefCell};
use std::collections::HashMap;

use crate::maps::{MapRenderer, RouteLayer};
use crate::models::{LngLat, RoutePreferences};
use crate::services::route_csv::{parse_routes_csv, parse_vehicle_types_csv};
use crate::services::{enrich_routes, DirectionsProvider, FetchGeneration};
use crate::viewmodels::legend_viewmodel::FleetRoutes;

pub struct RoutePlannerViewModel<R: MapRenderer, P: DirectionsProvider> {
    fleet: RefCell<FleetRoutes>,
    layer: RefCell<RouteLayer<R>>,
    provider: P,
    generation: FetchGeneration,
    preferences: Cell<RoutePreferences>,
}

impl<R: MapRenderer, P: DirectionsProvider> RoutePlannerViewModel<R, P> {
    pub fn new(provider: P) -> Self {
        Self {
            fleet: RefCell::new(FleetRoutes::default()),
            layer: RefCell::new(RouteLayer::new()),
            provider,
            generation: FetchGeneration::new(),
            preferences: Cell::new(RoutePreferences::default()),
        }
    }

    pub fn fleet(&self) -> Ref<'_, FleetRoutes> {
        self.fleet.borrow()
    }

    pub fn layer(&self) -> Ref<'_, RouteLayer<R>> {
        self.layer.borrow()
    }

    pub fn preferences(&self) -> RoutePreferences {
        self.preferences.get()
    }

    /// Entrega el mapa nuevo a la capa (libera el anterior) y vuelve a pintar la flota
    pub fn attach_map(&self, renderer: R, depot: LngLat) {
        let result = self.layer.borrow_mut().initialize(renderer, depot);
        if let Err(e) = result {
            log::error!("❌ No se pudo inicializar el mapa: {}", e);
            return;
        }
        if !self.fleet.borrow().is_empty() {
            self.push_routes();
            self.fit_all();
        }
    }

    pub fn detach_map(&self) {
        self.layer.borrow_mut().teardown();
    }

    /// Evento `load` del estilo
    pub fn on_map_loaded(&self) {
        // `idle` puede llegar con la capa prestada; la cola se vacía en la siguiente operación
        if let Ok(mut layer) = self.layer.try_borrow_mut() {
            layer.on_style_loaded();
        }
    }

    /// Construye la flota desde los CSV. Devuelve el número de vehículos.
    pub fn load_csv(&self, routes_csv: &str, vehicles_csv: Option<&str>) -> usize {
        let parsed = parse_routes_csv(routes_csv);
        let lookup = vehicles_csv
            .map(parse_vehicle_types_csv)
            .unwrap_or_else(HashMap::new);
        let mut fleet = FleetRoutes::from_parsed(parsed, &lookup);
        fleet.apply_low_carbon(self.preferences.get().low_carbon);
        let count = fleet.routes().len();
        *self.fleet.borrow_mut() = fleet;

        log::info!("🚚 {} rutas cargadas desde CSV", count);
        self.push_routes();
        self.fit_all();
        count
    }

    /// Pide geometría por carretera para toda la flota.
    /// Devuelve false si el lote quedó obsoleto y se descartó.
    pub async fn refresh_geometry(&self) -> bool {
        let generation = self.generation.next();
        let routes = self.fleet.borrow().routes().to_vec();
        if routes.is_empty() {
            return true;
        }
        let preferences = self.preferences.get();

        let geometries = enrich_routes(&self.provider, &routes, &preferences).await;

        if !self.generation.is_current(generation) {
            log::info!("⏭️ Lote de geometría {} obsoleto, descartado", generation);
            return false;
        }
        self.fleet.borrow_mut().apply_geometry(geometries);
        self.push_routes();
        true
    }

    /// Aplica las preferencias del panel. Devuelve true si hay que pedir geometría nueva.
    pub fn apply_preferences(&self, preferences: RoutePreferences) -> bool {
        let previous = self.preferences.replace(preferences);
        if previous.low_carbon != preferences.low_carbon {
            self.fleet.borrow_mut().apply_low_carbon(preferences.low_carbon);
            self.push_visibility();
        }
        preferences.geometry_changed(&previous)
    }

    // --- Acciones de la leyenda ---

    pub fn select(&self, vehicle_id: &str) {
        let bounds = self.fleet.borrow_mut().select(vehicle_id);
        let selected = self.fleet.borrow().selected().map(str::to_string);
        let mut layer = self.layer.borrow_mut();
        let result = match bounds {
            Some(bounds) => layer.set_selection(selected).and_then(|_| layer.fit_to(bounds)),
            None => layer.set_selection(selected),
        };
        if let Err(e) = result {
            log::warn!("⚠️ No se pudo seleccionar {}: {}", vehicle_id, e);
        }
    }

    pub fn toggle_visibility(&self, vehicle_id: &str) {
        self.fleet.borrow_mut().toggle_visibility(vehicle_id);
        self.push_visibility();
    }

    pub fn select_all(&self) {
        self.fleet.borrow_mut().select_all();
        self.push_visibility();
    }

    pub fn deselect_all(&self) {
        self.fleet.borrow_mut().deselect_all();
        self.push_visibility();
    }

    pub fn filter_by_type(&self, vehicle_type: &str) {
        self.fleet.borrow_mut().filter_by_type(vehicle_type);
        self.push_visibility();
    }

    pub fn toggle_legend_expanded(&self) {
        self.fleet.borrow_mut().toggle_expanded();
    }

    /// Encuadra toda la flota
    pub fn fit_all(&self) {
        let bounds = self.fleet.borrow().bounds();
        if let Some(bounds) = bounds {
            if let Err(e) = self.layer.borrow_mut().fit_to(bounds) {
                log::warn!("⚠️ fitBounds falló: {}", e);
            }
        }
    }

    fn push_routes(&self) {
        let (routes, selected) = {
            let fleet = self.fleet.borrow();
            (fleet.routes().to_vec(), fleet.selected().map(str::to_string))
        };
        let mut layer = self.layer.borrow_mut();
        let result = layer
            .set_routes(routes)
            .and_then(|_| layer.set_selection(selected));
        if let Err(e) = result {
            log::warn!("⚠️ No se pudieron pintar las rutas: {}", e);
        }
    }

    fn push_visibility(&self) {
        let visibility = self.fleet.borrow().visibility();
        if let Err(e) = self.layer.borrow_mut().set_visibility(visibility) {
            log::warn!("⚠️ No se pudo actualizar la visibilidad: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use futures::channel::oneshot;
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;

    use crate::maps::layers::ROUTES_LAYER;
    use crate::maps::testing::RecordingRenderer;
    use crate::models::Exclusion;
    use crate::services::directions_service::DirectionsError;
    use crate::services::route_enricher::tests::FakeDirections;

    const CSV: &str = "vehicle_id,lat,lon,vehicle_type\n\
        V1,46.05,14.45,van\n\
        V1,46.06,14.50,van\n\
        V1,46.05,14.45,van\n\
        V2,46.05,14.45,electric\n\
        V2,46.02,14.40,electric\n\
        V2,46.05,14.45,electric\n";

    fn planner() -> RoutePlannerViewModel<RecordingRenderer, FakeDirections> {
        let planner = RoutePlannerViewModel::new(FakeDirections::default());
        planner.attach_map(RecordingRenderer::loaded(), [14.45, 46.05]);
        planner
    }

    #[test]
    fn loading_same_csv_twice_creates_layers_once() {
        let planner = planner();
        planner.load_csv(CSV, None);
        let first = planner.layer().renderer().unwrap().paint.clone();
        planner.load_csv(CSV, None);

        let layer = planner.layer();
        let renderer = layer.renderer().unwrap();
        assert_eq!(renderer.count("add_layer:"), 2);
        assert_eq!(renderer.paint, first);
    }

    #[test]
    fn refresh_replaces_geometry_but_not_waypoints() {
        let planner = planner();
        planner.load_csv(CSV, None);
        let waypoints: Vec<_> = planner.fleet().routes().iter().map(|r| r.waypoints.clone()).collect();

        assert!(planner.apply_preferences(RoutePreferences {
            avoid_tolls: true,
            ..RoutePreferences::default()
        }));
        assert!(block_on(planner.refresh_geometry()));

        let fleet = planner.fleet();
        for (route, original) in fleet.routes().iter().zip(&waypoints) {
            assert_eq!(&route.waypoints, original);
            assert_eq!(route.road_geometry.len(), 5);
        }
        let requests = planner.provider.requests.borrow();
        assert!(requests.iter().all(|(_, ex)| ex == &vec![Exclusion::Toll]));
    }

    #[test]
    fn empty_directions_keep_straight_line() {
        let planner = planner();
        planner.load_csv(CSV, None);
        let v1 = planner.fleet().get("V1").unwrap().waypoints.clone();
        planner.provider.fail_from(v1[0]);
        block_on(planner.refresh_geometry());
        assert_eq!(planner.fleet().get("V1").unwrap().road_geometry, v1);
    }

    #[test]
    fn low_carbon_only_changes_visibility() {
        let planner = planner();
        planner.load_csv(CSV, None);
        let refetch = planner.apply_preferences(RoutePreferences {
            low_carbon: true,
            ..RoutePreferences::default()
        });
        assert!(!refetch);
        assert!(!planner.fleet().get("V1").unwrap().visible);
        assert!(planner.fleet().get("V2").unwrap().visible);
        assert!(planner.layer().routes().iter().any(|r| !r.visible));
    }

    #[test]
    fn legend_select_frames_the_route() {
        let planner = planner();
        planner.load_csv(CSV, None);
        let fits_before = planner.layer().renderer().unwrap().fitted.len();
        planner.select("V2");
        assert_eq!(planner.layer().selected(), Some("V2"));
        let layer = planner.layer();
        let renderer = layer.renderer().unwrap();
        assert_eq!(renderer.fitted.len(), fits_before + 1);
        assert!(renderer.paint_of(ROUTES_LAYER, "line-width").is_some());
    }

    /// Proveedor que no responde hasta que el test abre su compuerta
    struct GatedDirections {
        gates: RefCell<VecDeque<oneshot::Receiver<Vec<LngLat>>>>,
    }

    impl DirectionsProvider for GatedDirections {
        async fn fetch_geometry(
            &self,
            _waypoints: &[LngLat],
            _exclusions: &[Exclusion],
        ) -> Result<Vec<LngLat>, DirectionsError> {
            let gate = self.gates.borrow_mut().pop_front().ok_or(DirectionsError::NoRoute)?;
            gate.await
                .map_err(|_| DirectionsError::Network("cancelled".to_string()))
        }
    }

    #[test]
    fn stale_batch_is_discarded() {
        let (old_tx, old_rx) = oneshot::channel();
        let (new_tx, new_rx) = oneshot::channel();
        let provider = GatedDirections {
            gates: RefCell::new(VecDeque::from(vec![old_rx, new_rx])),
        };
        let planner = Rc::new(RoutePlannerViewModel::<RecordingRenderer, _>::new(provider));
        planner.attach_map(RecordingRenderer::loaded(), [14.45, 46.05]);
        planner.load_csv("vehicle_id,lat,lon\nV1,46.0,14.0\nV1,46.1,14.1\n", None);

        let mut pool = LocalPool::new();
        let outcomes = Rc::new(RefCell::new(Vec::new()));
        for _ in 0..2 {
            let planner = planner.clone();
            let outcomes = outcomes.clone();
            pool.spawner()
                .spawn_local(async move {
                    let applied = planner.refresh_geometry().await;
                    outcomes.borrow_mut().push(applied);
                })
                .unwrap();
            pool.run_until_stalled();
        }

        let newer = vec![[14.0, 46.0], [14.2, 46.2], [14.1, 46.1]];
        new_tx.send(newer.clone()).unwrap();
        pool.run_until_stalled();
        old_tx.send(vec![[0.0, 0.0], [1.0, 1.0]]).unwrap();
        pool.run_until_stalled();

        assert_eq!(*outcomes.borrow(), vec![true, false]);
        assert_eq!(planner.fleet().get("V1").unwrap().road_geometry, newer);
        assert_eq!(planner.layer().routes()[0].road_geometry, newer);
    }
}

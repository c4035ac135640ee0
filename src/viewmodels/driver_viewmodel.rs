// ============================================================================
// DRIVER VIEWMODEL - Entregas del conductor y su mapa
// ============================================================================

use std::cell::{Ref, RefCell};

use crate::maps::{DriverLayer, MapRenderer};
use crate::models::{
    Bounds, DriverRoute, GeometrySource, LngLat, Order, RoutePreferences,
};
use crate::models::delivery::DRIVER_DELIVERY_LIMIT;
use crate::services::{enrich_chunked, DirectionsProvider, FetchGeneration};

pub struct DriverViewModel<R: MapRenderer, P: DirectionsProvider> {
    route: RefCell<DriverRoute>,
    layer: RefCell<DriverLayer<R>>,
    provider: P,
    generation: FetchGeneration,
    depot: LngLat,
}

impl<R: MapRenderer, P: DirectionsProvider> DriverViewModel<R, P> {
    pub fn new(driver_id: &str, depot: LngLat, provider: P) -> Self {
        Self {
            route: RefCell::new(DriverRoute {
                driver_id: driver_id.to_string(),
                deliveries: Vec::new(),
            }),
            layer: RefCell::new(DriverLayer::new()),
            provider,
            generation: FetchGeneration::new(),
            depot,
        }
    }

    pub fn route(&self) -> Ref<'_, DriverRoute> {
        self.route.borrow()
    }

    pub fn layer(&self) -> Ref<'_, DriverLayer<R>> {
        self.layer.borrow()
    }

    pub fn attach_map(&self, renderer: R) {
        let result = self.layer.borrow_mut().initialize(renderer, self.depot);
        match result {
            Ok(()) => self.render_straight(),
            Err(e) => log::error!("❌ No se pudo inicializar el mapa del conductor: {}", e),
        }
    }

    pub fn detach_map(&self) {
        self.layer.borrow_mut().teardown();
    }

    pub fn on_map_loaded(&self) {
        // `idle` puede llegar con la capa prestada; la cola se vacía en la siguiente operación
        if let Ok(mut layer) = self.layer.try_borrow_mut() {
            layer.on_style_loaded();
        }
    }

    /// Asigna al conductor los primeros pedidos geocodificados
    pub fn load_orders(&self, orders: &[Order]) -> usize {
        let driver_id = self.route.borrow().driver_id.clone();
        let route = DriverRoute::from_orders(&driver_id, orders, DRIVER_DELIVERY_LIMIT);
        let count = route.deliveries.len();
        *self.route.borrow_mut() = route;
        log::info!("📦 {} entregas asignadas a {}", count, driver_id);
        self.render_straight();
        count
    }

    /// Depósito → entregas → depósito
    pub fn waypoints(&self) -> Vec<LngLat> {
        let route = self.route.borrow();
        std::iter::once(self.depot)
            .chain(route.deliveries.iter().map(|d| d.coordinates))
            .chain(std::iter::once(self.depot))
            .collect()
    }

    /// Marca la entrega como hecha; el mapa vuelve a línea recta hasta el siguiente recálculo
    pub fn complete(&self, delivery_id: &str) -> bool {
        let removed = self.route.borrow_mut().complete(delivery_id);
        if removed {
            log::info!("✅ Entrega {} completada", delivery_id);
            self.render_straight();
        }
        removed
    }

    /// Geometría por carretera de la ruta actual. false si el lote quedó obsoleto.
    pub async fn refresh_geometry(&self) -> bool {
        let generation = self.generation.next();
        let waypoints = self.waypoints();
        let (line, source) =
            enrich_chunked(&self.provider, &waypoints, &RoutePreferences::default()).await;

        if !self.generation.is_current(generation) {
            return false;
        }
        if source == GeometrySource::StraightLine {
            log::warn!("⚠️ Ruta del conductor en línea recta");
        }
        self.render(&line);
        true
    }

    fn render_straight(&self) {
        let waypoints = self.waypoints();
        self.render(&waypoints);
        if let Some(bounds) = Bounds::from_points(&waypoints) {
            if let Err(e) = self.layer.borrow_mut().fit_to(bounds) {
                log::warn!("⚠️ fitBounds falló: {}", e);
            }
        }
    }

    fn render(&self, line: &[LngLat]) {
        let route = self.route.borrow();
        if let Err(e) = self.layer.borrow_mut().render(&route.deliveries, line) {
            log::warn!("⚠️ No se pudo pintar la ruta del conductor: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    use crate::maps::layers::{DELIVERIES_SOURCE, DRIVER_ROUTE_SOURCE};
    use crate::maps::testing::RecordingRenderer;
    use crate::services::route_enricher::tests::FakeDirections;

    const DEPOT: LngLat = [14.4595, 46.0506];

    fn order(n: usize, geocoded: bool) -> Order {
        Order {
            order_id: format!("O{}", n),
            weight: 7.0,
            priority: "standard".to_string(),
            window_start: "09:00".to_string(),
            window_end: "11:00".to_string(),
            street: "Slovenska".to_string(),
            house_number: n.to_string(),
            postal_code: None,
            city: None,
            latitude: geocoded.then_some(46.0 + n as f64 * 0.001),
            longitude: geocoded.then_some(14.5),
            status: "pending".to_string(),
        }
    }

    fn driver() -> DriverViewModel<RecordingRenderer, FakeDirections> {
        let vm = DriverViewModel::new("V001", DEPOT, FakeDirections::default());
        vm.attach_map(RecordingRenderer::loaded());
        let orders: Vec<Order> = (1..=10).map(|n| order(n, n != 2)).collect();
        vm.load_orders(&orders);
        vm
    }

    fn line_len(vm: &DriverViewModel<RecordingRenderer, FakeDirections>) -> usize {
        let layer = vm.layer();
        let source = &layer.renderer().unwrap().sources[DRIVER_ROUTE_SOURCE];
        match &source.features[0].geometry.as_ref().unwrap().value {
            geojson::Value::LineString(points) => points.len(),
            _ => 0,
        }
    }

    #[test]
    fn takes_first_eight_geocoded_orders() {
        let vm = driver();
        let route = vm.route();
        assert_eq!(route.deliveries.len(), 8);
        assert!(route.deliveries.iter().all(|d| d.order_id != "O2"));
        assert_eq!(vm.waypoints().len(), 10);
        assert_eq!(line_len(&vm), 10);
    }

    #[test]
    fn completing_removes_only_that_delivery() {
        let vm = driver();
        let before = vm.route().pending_count();
        assert!(vm.complete("DEL-3"));
        assert!(!vm.complete("DEL-3"));
        let route = vm.route();
        assert_eq!(route.pending_count(), before - 1);
        let sequence: Vec<usize> = route.deliveries.iter().map(|d| d.sequence_number).collect();
        assert_eq!(sequence, vec![1, 2, 4, 5, 6, 7, 8]);

        let layer = vm.layer();
        assert_eq!(layer.renderer().unwrap().sources[DELIVERIES_SOURCE].features.len(), 7);
    }

    #[test]
    fn refresh_draws_road_geometry() {
        let vm = driver();
        assert!(block_on(vm.refresh_geometry()));
        // 9 tramos con punto intermedio + último punto
        assert_eq!(line_len(&vm), 9 * 2 + 1);
    }

    #[test]
    fn failed_directions_keep_straight_route() {
        let vm = driver();
        vm.provider.fail_all.set(true);
        assert!(block_on(vm.refresh_geometry()));
        assert_eq!(line_len(&vm), 10);
    }
}

// ============================================================================
// ROUTE ENRICHER - Sustituye líneas rectas por geometría de carretera
// ============================================================================
// Todas las peticiones de un lote se lanzan a la vez y se aplican juntas.
// Cada lote lleva un id de generación: un lote viejo que llega tarde se descarta.
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use futures::future::join_all;

use crate::models::{GeometrySource, LngLat, RoadGeometry, RoutePreferences, VehicleRoute};
use crate::services::directions_service::{
    chunk_waypoints, downsample_waypoints, stitch_segments, DirectionsProvider,
};

/// Contador monotónico de lotes de geometría
#[derive(Clone, Default)]
pub struct FetchGeneration {
    current: Rc<Cell<u64>>,
}

impl FetchGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abre un lote nuevo; invalida los anteriores
    pub fn next(&self) -> u64 {
        let id = self.current.get() + 1;
        self.current.set(id);
        id
    }

    pub fn is_current(&self, id: u64) -> bool {
        self.current.get() == id
    }
}

/// Geometría de un vehículo: carretera si la API responde, línea recta si no
pub async fn enrich_route<P: DirectionsProvider>(
    provider: &P,
    route: &VehicleRoute,
    prefs: &RoutePreferences,
) -> RoadGeometry {
    if !route.is_routable() {
        return RoadGeometry::straight_line(&route.vehicle_id, &route.waypoints);
    }

    let request = downsample_waypoints(&route.waypoints);
    if request.len() < route.waypoints.len() {
        log::info!(
            "🚚 Vehicle {}: Using {} of {} waypoints",
            route.vehicle_id,
            request.len(),
            route.waypoints.len()
        );
    }

    match provider.fetch_geometry(&request, &prefs.exclusions()).await {
        Ok(coordinates) => RoadGeometry {
            vehicle_id: route.vehicle_id.clone(),
            coordinates,
            source: GeometrySource::Directions,
        },
        Err(e) => {
            log::warn!("⚠️ Directions para {} fallaron ({}), usando línea recta", route.vehicle_id, e);
            RoadGeometry::straight_line(&route.vehicle_id, &route.waypoints)
        }
    }
}

/// Enriquecer todas las rutas a la vez. El resultado conserva el orden de `routes`.
pub async fn enrich_routes<P: DirectionsProvider>(
    provider: &P,
    routes: &[VehicleRoute],
    prefs: &RoutePreferences,
) -> Vec<RoadGeometry> {
    let geometries = join_all(routes.iter().map(|route| enrich_route(provider, route, prefs))).await;
    let with_roads = geometries
        .iter()
        .filter(|g| g.source == GeometrySource::Directions)
        .count();
    log::info!("✅ Enhanced {} routes with road directions ({} en línea recta)",
        with_roads, geometries.len() - with_roads);
    geometries
}

/// Ruta del conductor: se trocea en tramos de ≤ 25 puntos en lugar de muestrear.
/// Si un tramo falla, toda la ruta queda en línea recta.
pub async fn enrich_chunked<P: DirectionsProvider>(
    provider: &P,
    waypoints: &[LngLat],
    prefs: &RoutePreferences,
) -> (Vec<LngLat>, GeometrySource) {
    if waypoints.len() < 2 {
        return (waypoints.to_vec(), GeometrySource::StraightLine);
    }
    let exclusions = prefs.exclusions();
    let chunks = chunk_waypoints(waypoints);
    if chunks.len() > 1 {
        log::info!("🧩 Ruta de {} waypoints partida en {} tramos", waypoints.len(), chunks.len());
    }

    let results = join_all(chunks.iter().map(|chunk| provider.fetch_geometry(chunk, &exclusions))).await;
    let segments: Result<Vec<_>, _> = results.into_iter().collect();
    match segments {
        Ok(segments) => (stitch_segments(segments), GeometrySource::Directions),
        Err(e) => {
            log::error!("❌ Error fetching directions: {}", e);
            (waypoints.to_vec(), GeometrySource::StraightLine)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    use futures::executor::block_on;

    use crate::models::Exclusion;
    use crate::services::directions_service::{DirectionsError, MAX_DIRECTIONS_WAYPOINTS};

    /// Proveedor de pruebas: geometría sintética y registro de peticiones
    #[derive(Default)]
    pub struct FakeDirections {
        pub requests: RefCell<Vec<(Vec<LngLat>, Vec<Exclusion>)>>,
        /// Respuesta forzada por primer waypoint de la petición
        pub failures: RefCell<HashMap<String, DirectionsError>>,
        pub fail_all: Cell<bool>,
    }

    impl FakeDirections {
        pub fn fail_from(&self, first: LngLat) {
            self.failures
                .borrow_mut()
                .insert(format!("{:?}", first), DirectionsError::NoRoute);
        }

        /// Geometría "de carretera": mete un punto intermedio entre cada par
        pub fn road_for(waypoints: &[LngLat], tolls: bool) -> Vec<LngLat> {
            let offset = if tolls { 0.001 } else { 0.0 };
            let mut out = Vec::new();
            for pair in waypoints.windows(2) {
                out.push(pair[0]);
                out.push([(pair[0][0] + pair[1][0]) / 2.0 + offset, (pair[0][1] + pair[1][1]) / 2.0]);
            }
            out.push(waypoints[waypoints.len() - 1]);
            out
        }
    }

    impl DirectionsProvider for FakeDirections {
        async fn fetch_geometry(
            &self,
            waypoints: &[LngLat],
            exclusions: &[Exclusion],
        ) -> Result<Vec<LngLat>, DirectionsError> {
            self.requests
                .borrow_mut()
                .push((waypoints.to_vec(), exclusions.to_vec()));
            if self.fail_all.get() {
                return Err(DirectionsError::Network("offline".to_string()));
            }
            if let Some(err) = self.failures.borrow_mut().remove(&format!("{:?}", waypoints[0])) {
                return Err(err);
            }
            Ok(Self::road_for(waypoints, exclusions.contains(&Exclusion::Toll)))
        }
    }

    fn route(id: &str, n: usize, offset: f64) -> VehicleRoute {
        let points = (0..n).map(|i| [14.0 + offset + i as f64 * 0.01, 46.0 + i as f64 * 0.01]).collect();
        VehicleRoute::new(id, points, None)
    }

    #[test]
    fn successful_response_replaces_geometry() {
        let provider = FakeDirections::default();
        let r = route("V1", 3, 0.0);
        let geometry = block_on(enrich_route(&provider, &r, &RoutePreferences::default()));
        assert_eq!(geometry.source, GeometrySource::Directions);
        assert_eq!(geometry.coordinates.len(), 5);
    }

    #[test]
    fn empty_routes_falls_back_to_straight_line() {
        let provider = FakeDirections::default();
        let r = route("V1", 4, 0.0);
        provider.fail_from(r.waypoints[0]);
        let geometry = block_on(enrich_route(&provider, &r, &RoutePreferences::default()));
        assert_eq!(geometry.source, GeometrySource::StraightLine);
        assert_eq!(geometry.coordinates, r.waypoints);
    }

    #[test]
    fn single_waypoint_makes_no_request() {
        let provider = FakeDirections::default();
        let r = route("V1", 1, 0.0);
        let geometry = block_on(enrich_route(&provider, &r, &RoutePreferences::default()));
        assert!(provider.requests.borrow().is_empty());
        assert_eq!(geometry.coordinates, r.waypoints);
    }

    #[test]
    fn long_route_request_keeps_endpoints() {
        let provider = FakeDirections::default();
        let r = route("V1", 30, 0.0);
        block_on(enrich_route(&provider, &r, &RoutePreferences::default()));
        let requests = provider.requests.borrow();
        let (sent, _) = &requests[0];
        assert!(sent.len() <= MAX_DIRECTIONS_WAYPOINTS);
        assert_eq!(sent[0], r.waypoints[0]);
        assert_eq!(sent[sent.len() - 1], r.waypoints[29]);
    }

    #[test]
    fn batch_keeps_order_and_mixes_fallbacks() {
        let provider = FakeDirections::default();
        let routes = vec![route("V1", 3, 0.0), route("V2", 3, 1.0), route("V3", 2, 2.0)];
        provider.fail_from(routes[1].waypoints[0]);
        let prefs = RoutePreferences { avoid_tolls: true, ..RoutePreferences::default() };
        let geometries = block_on(enrich_routes(&provider, &routes, &prefs));

        let ids: Vec<&str> = geometries.iter().map(|g| g.vehicle_id.as_str()).collect();
        assert_eq!(ids, vec!["V1", "V2", "V3"]);
        assert_eq!(geometries[1].source, GeometrySource::StraightLine);
        assert!(provider
            .requests
            .borrow()
            .iter()
            .all(|(_, exclusions)| exclusions == &vec![Exclusion::Toll]));
    }

    #[test]
    fn chunked_route_is_stitched() {
        let provider = FakeDirections::default();
        let waypoints = route("D", 40, 0.0).waypoints;
        let (geometry, source) = block_on(enrich_chunked(&provider, &waypoints, &RoutePreferences::default()));
        assert_eq!(source, GeometrySource::Directions);
        assert_eq!(provider.requests.borrow().len(), 2);
        // 39 tramos con punto medio + último punto
        assert_eq!(geometry.len(), 39 * 2 + 1);
        assert_eq!(geometry[0], waypoints[0]);
        assert_eq!(geometry[geometry.len() - 1], waypoints[39]);
    }

    #[test]
    fn failed_chunk_falls_back_for_whole_route() {
        let provider = FakeDirections::default();
        provider.fail_all.set(true);
        let waypoints = route("D", 5, 0.0).waypoints;
        let (geometry, source) = block_on(enrich_chunked(&provider, &waypoints, &RoutePreferences::default()));
        assert_eq!(source, GeometrySource::StraightLine);
        assert_eq!(geometry, waypoints);
    }

    #[test]
    fn newer_generation_invalidates_older() {
        let generation = FetchGeneration::new();
        let first = generation.next();
        assert!(generation.is_current(first));
        let shared = generation.clone();
        let second = shared.next();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
        assert!(second > first);
    }
}

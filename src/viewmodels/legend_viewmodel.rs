// ============================================================================
// LEGEND VIEWMODEL - Estado de la flota que controla la leyenda
// ============================================================================
// Transiciones síncronas sobre la colección de rutas. La pintura del mapa es
// función pura de (rutas, selección), así que basta con reenviar el resultado.
// ============================================================================

use std::collections::HashMap;

use crate::maps::paint::route_color;
use crate::models::{is_low_carbon_type, Bounds, RoadGeometry, VehicleRoute};
use crate::services::ParsedRoute;
use crate::utils::LEGEND_VISIBLE_ITEMS;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FleetRoutes {
    routes: Vec<VehicleRoute>,
    selected: Option<String>,
    expanded: bool,
}

impl FleetRoutes {
    /// Rutas del CSV con color asignado. El tipo del CSV principal manda;
    /// `type_lookup` solo rellena los que faltan.
    pub fn from_parsed(parsed: Vec<ParsedRoute>, type_lookup: &HashMap<String, String>) -> Self {
        let total = parsed.len();
        let routes = parsed
            .into_iter()
            .enumerate()
            .map(|(index, p)| {
                let vehicle_type = p
                    .vehicle_type
                    .or_else(|| type_lookup.get(&p.vehicle_id).cloned());
                let mut route = VehicleRoute::new(p.vehicle_id, p.waypoints, vehicle_type);
                route.color = route_color(index, total);
                route
            })
            .collect();
        Self {
            routes,
            selected: None,
            expanded: false,
        }
    }

    pub fn routes(&self) -> &[VehicleRoute] {
        &self.routes
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn get(&self, vehicle_id: &str) -> Option<&VehicleRoute> {
        self.routes.iter().find(|r| r.vehicle_id == vehicle_id)
    }

    /// Selecciona un vehículo; repetir la selección la quita.
    /// Devuelve los bounds a encuadrar cuando queda seleccionado.
    pub fn select(&mut self, vehicle_id: &str) -> Option<Bounds> {
        if self.selected.as_deref() == Some(vehicle_id) {
            self.selected = None;
            return None;
        }
        let bounds = self.get(vehicle_id)?.bounds;
        self.selected = Some(vehicle_id.to_string());
        bounds
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Devuelve la nueva visibilidad
    pub fn toggle_visibility(&mut self, vehicle_id: &str) -> Option<bool> {
        let route = self.routes.iter_mut().find(|r| r.vehicle_id == vehicle_id)?;
        route.visible = !route.visible;
        Some(route.visible)
    }

    pub fn select_all(&mut self) {
        self.set_all_visible(true);
    }

    pub fn deselect_all(&mut self) {
        self.set_all_visible(false);
    }

    fn set_all_visible(&mut self, visible: bool) {
        for route in &mut self.routes {
            route.visible = visible;
        }
    }

    /// Solo quedan visibles los de ese tipo (sin distinguir mayúsculas)
    pub fn filter_by_type(&mut self, vehicle_type: &str) {
        for route in &mut self.routes {
            route.visible = route
                .vehicle_type
                .as_deref()
                .map(|t| t.eq_ignore_ascii_case(vehicle_type))
                .unwrap_or(false);
        }
    }

    /// Filtro "Low Carbon": con `on` quedan visibles eléctricos y bicis; sin él, todos.
    /// Sin ningún tipo conocido no hay nada que filtrar.
    pub fn apply_low_carbon(&mut self, on: bool) {
        if self.routes.iter().all(|r| r.vehicle_type.is_none()) {
            return;
        }
        for route in &mut self.routes {
            route.visible = !on
                || route
                    .vehicle_type
                    .as_deref()
                    .map(|t| is_low_carbon_type(&t.to_lowercase()))
                    .unwrap_or(false);
        }
    }

    /// Sustituye la geometría pintada; los waypoints no se tocan
    pub fn apply_geometry(&mut self, geometries: Vec<RoadGeometry>) {
        let mut by_id: HashMap<String, RoadGeometry> = geometries
            .into_iter()
            .map(|g| (g.vehicle_id.clone(), g))
            .collect();
        for route in &mut self.routes {
            if let Some(geometry) = by_id.remove(&route.vehicle_id) {
                route.road_geometry = geometry.coordinates;
            }
        }
    }

    pub fn visibility(&self) -> HashMap<String, bool> {
        self.routes
            .iter()
            .map(|r| (r.vehicle_id.clone(), r.visible))
            .collect()
    }

    pub fn visible_count(&self) -> usize {
        self.routes.iter().filter(|r| r.visible).count()
    }

    /// Tipos distintos en orden de aparición
    pub fn vehicle_types(&self) -> Vec<String> {
        let mut types: Vec<String> = Vec::new();
        for t in self.routes.iter().filter_map(|r| r.vehicle_type.as_ref()) {
            if !types.contains(t) {
                types.push(t.clone());
            }
        }
        types
    }

    /// Bounds de toda la flota
    pub fn bounds(&self) -> Option<Bounds> {
        self.routes
            .iter()
            .filter_map(|r| r.bounds)
            .reduce(|acc, b| acc.union(&b))
    }

    // --- Leyenda ---

    pub fn legend_items(&self) -> &[VehicleRoute] {
        if self.expanded {
            &self.routes
        } else {
            &self.routes[..self.routes.len().min(LEGEND_VISIBLE_ITEMS)]
        }
    }

    pub fn hidden_legend_items(&self) -> usize {
        self.routes.len().saturating_sub(self.legend_items().len())
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::paint::RoutePaint;

    fn parsed(id: &str, n: usize, vehicle_type: Option<&str>) -> ParsedRoute {
        ParsedRoute {
            vehicle_id: id.to_string(),
            waypoints: (0..n).map(|i| [14.0 + i as f64, 46.0]).collect(),
            vehicle_type: vehicle_type.map(str::to_string),
        }
    }

    fn fleet() -> FleetRoutes {
        let mut lookup = HashMap::new();
        lookup.insert("V3".to_string(), "electric".to_string());
        lookup.insert("V4".to_string(), "diesel".to_string());
        FleetRoutes::from_parsed(vec![parsed("V3", 3, None), parsed("V4", 3, None)], &lookup)
    }

    #[test]
    fn low_carbon_keeps_only_electric_and_restores() {
        let mut fleet = fleet();
        fleet.apply_low_carbon(true);
        assert!(fleet.get("V3").unwrap().visible);
        assert!(!fleet.get("V4").unwrap().visible);

        fleet.apply_low_carbon(false);
        assert!(fleet.get("V3").unwrap().visible);
        assert!(fleet.get("V4").unwrap().visible);
    }

    #[test]
    fn low_carbon_without_types_is_noop() {
        let mut fleet = FleetRoutes::from_parsed(vec![parsed("V1", 2, None)], &HashMap::new());
        fleet.apply_low_carbon(true);
        assert!(fleet.get("V1").unwrap().visible);
    }

    #[test]
    fn csv_type_wins_over_lookup() {
        let mut lookup = HashMap::new();
        lookup.insert("V1".to_string(), "van".to_string());
        let fleet = FleetRoutes::from_parsed(vec![parsed("V1", 2, Some("bike"))], &lookup);
        assert_eq!(fleet.get("V1").unwrap().vehicle_type.as_deref(), Some("bike"));
    }

    #[test]
    fn each_vehicle_gets_its_own_color() {
        let fleet = FleetRoutes::from_parsed(
            vec![parsed("A", 2, None), parsed("B", 2, None), parsed("C", 2, None)],
            &HashMap::new(),
        );
        let colors: Vec<&str> = fleet.routes().iter().map(|r| r.color.as_str()).collect();
        assert_eq!(colors, vec!["hsl(0,78%,45%)", "hsl(120,78%,45%)", "hsl(240,78%,45%)"]);
    }

    #[test]
    fn selecting_twice_clears_selection() {
        let mut fleet = fleet();
        assert!(fleet.select("V3").is_some());
        assert_eq!(fleet.selected(), Some("V3"));
        assert!(fleet.select("V3").is_none());
        assert_eq!(fleet.selected(), None);
        assert!(fleet.select("missing").is_none());
        assert_eq!(fleet.selected(), None);
    }

    #[test]
    fn toggling_visibility_twice_restores_paint() {
        let mut fleet = fleet();
        fleet.select("V4");
        let before = RoutePaint::compute(fleet.routes(), fleet.selected());
        assert_eq!(fleet.toggle_visibility("V3"), Some(false));
        assert_ne!(RoutePaint::compute(fleet.routes(), fleet.selected()), before);
        assert_eq!(fleet.toggle_visibility("V3"), Some(true));
        assert_eq!(RoutePaint::compute(fleet.routes(), fleet.selected()), before);
    }

    #[test]
    fn filter_by_type_is_case_insensitive() {
        let mut fleet = FleetRoutes::from_parsed(
            vec![parsed("V1", 2, Some("Van")), parsed("V2", 2, Some("bike")), parsed("V3", 2, None)],
            &HashMap::new(),
        );
        fleet.filter_by_type("van");
        assert_eq!(fleet.visible_count(), 1);
        assert!(fleet.get("V1").unwrap().visible);
        assert_eq!(fleet.vehicle_types(), vec!["Van", "bike"]);

        fleet.deselect_all();
        assert_eq!(fleet.visible_count(), 0);
        fleet.select_all();
        assert_eq!(fleet.visible_count(), 3);
    }

    #[test]
    fn geometry_update_keeps_waypoints() {
        let mut fleet = fleet();
        let original = fleet.get("V3").unwrap().waypoints.clone();
        fleet.apply_geometry(vec![RoadGeometry {
            vehicle_id: "V3".to_string(),
            coordinates: vec![[0.0, 0.0], [0.5, 0.5], [1.0, 1.0]],
            source: crate::models::GeometrySource::Directions,
        }]);
        let route = fleet.get("V3").unwrap();
        assert_eq!(route.waypoints, original);
        assert_eq!(route.road_geometry.len(), 3);
    }

    #[test]
    fn legend_caps_items_until_expanded() {
        let parsed_routes = (0..9).map(|i| parsed(&format!("V{}", i), 2, None)).collect();
        let mut fleet = FleetRoutes::from_parsed(parsed_routes, &HashMap::new());
        assert_eq!(fleet.legend_items().len(), 6);
        assert_eq!(fleet.hidden_legend_items(), 3);
        fleet.toggle_expanded();
        assert_eq!(fleet.legend_items().len(), 9);
        assert_eq!(fleet.hidden_legend_items(), 0);
    }

    #[test]
    fn fleet_bounds_cover_all_routes() {
        let bounds = fleet().bounds().unwrap();
        assert_eq!(bounds.min, [14.0, 46.0]);
        assert_eq!(bounds.max, [16.0, 46.0]);
    }
}

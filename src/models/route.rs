use serde::{Deserialize, Serialize};

use super::geo::{Bounds, LngLat};

/// Ruta de un vehículo tal como la pinta el mapa de planificación
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRoute {
    pub vehicle_id: String,
    /// Waypoints originales del CSV (depósito → paradas → depósito).
    /// No se tocan después del parseo: son la fuente para recalcular la geometría.
    pub waypoints: Vec<LngLat>,
    /// Geometría que se pinta (carretera o línea recta)
    pub road_geometry: Vec<LngLat>,
    pub color: String,
    pub visible: bool,
    pub vehicle_type: Option<String>,
    pub bounds: Option<Bounds>,
}

impl VehicleRoute {
    pub fn new(vehicle_id: impl Into<String>, waypoints: Vec<LngLat>, vehicle_type: Option<String>) -> Self {
        let bounds = Bounds::from_points(&waypoints);
        Self {
            vehicle_id: vehicle_id.into(),
            road_geometry: waypoints.clone(),
            waypoints,
            color: String::new(),
            visible: true,
            vehicle_type,
            bounds,
        }
    }

    /// Con menos de 2 puntos no se pide geometría de carretera
    pub fn is_routable(&self) -> bool {
        self.waypoints.len() >= 2
    }

    /// Número de entregas (sin contar salida y llegada al depósito)
    pub fn delivery_count(&self) -> usize {
        self.waypoints.len().saturating_sub(2)
    }

    /// Paradas de entrega: todos los waypoints salvo el primero y el último
    pub fn delivery_stops(&self) -> Vec<DeliveryStop> {
        if self.waypoints.len() <= 2 {
            return Vec::new();
        }
        let last = self.waypoints.len() - 1;
        self.waypoints
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != 0 && *idx != last)
            .map(|(idx, position)| DeliveryStop {
                vehicle_id: self.vehicle_id.clone(),
                stop_number: idx,
                position: *position,
                color: self.color.clone(),
            })
            .collect()
    }
}

/// Parada derivada de una `VehicleRoute`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryStop {
    pub vehicle_id: String,
    pub stop_number: usize,
    pub position: LngLat,
    pub color: String,
}

/// Origen de la geometría pintada
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GeometrySource {
    Directions,
    StraightLine,
}

/// Resultado del enriquecimiento para un vehículo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadGeometry {
    pub vehicle_id: String,
    pub coordinates: Vec<LngLat>,
    pub source: GeometrySource,
}

impl RoadGeometry {
    pub fn straight_line(vehicle_id: &str, waypoints: &[LngLat]) -> Self {
        Self {
            vehicle_id: vehicle_id.to_string(),
            coordinates: waypoints.to_vec(),
            source: GeometrySource::StraightLine,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_skip_depot_points() {
        let mut route = VehicleRoute::new(
            "V1",
            vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [0.0, 0.0]],
            None,
        );
        route.color = "hsl(0,78%,45%)".to_string();
        let stops = route.delivery_stops();
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].stop_number, 1);
        assert_eq!(stops[1].stop_number, 2);
        assert_eq!(stops[1].position, [2.0, 2.0]);
        assert!(stops.iter().all(|s| s.color == route.color));
        assert_eq!(route.delivery_count(), 2);
    }

    #[test]
    fn single_point_route_is_not_routable() {
        let route = VehicleRoute::new("V1", vec![[0.0, 0.0]], None);
        assert!(!route.is_routable());
        assert!(route.delivery_stops().is_empty());
        assert_eq!(route.delivery_count(), 0);
    }
}

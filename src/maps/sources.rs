// ============================================================================
// SOURCES - FeatureCollections GeoJSON para las fuentes del mapa
// ============================================================================
// Las propiedades llevan todo lo que necesita un popup: al hacer click no se
// consulta ningún estado fuera de la feature.
// ============================================================================

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value as GeoValue};
use serde_json::json;

use crate::maps::paint::{COMPLETED_COLOR, PENDING_COLOR};
use crate::models::{DeliveryStatus, DriverDelivery, LngLat, VehicleRoute};

fn position(point: &LngLat) -> Vec<f64> {
    vec![point[0], point[1]]
}

fn feature(geometry: GeoValue, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geometry)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn line(points: &[LngLat]) -> GeoValue {
    GeoValue::LineString(points.iter().map(position).collect())
}

/// Una LineString por vehículo con la geometría que se pinta
pub fn routes_collection(routes: &[VehicleRoute]) -> FeatureCollection {
    collection(
        routes
            .iter()
            .map(|route| {
                let mut props = JsonObject::new();
                props.insert("vehicle_id".into(), json!(route.vehicle_id));
                props.insert("color".into(), json!(route.color));
                props.insert(
                    "vehicle_type".into(),
                    json!(route.vehicle_type.as_deref().unwrap_or("Unknown")),
                );
                props.insert("deliveries".into(), json!(route.delivery_count()));
                feature(line(&route.road_geometry), props)
            })
            .collect(),
    )
}

/// Paradas de entrega de todos los vehículos (sin depósito)
pub fn stops_collection(routes: &[VehicleRoute]) -> FeatureCollection {
    collection(
        routes
            .iter()
            .flat_map(VehicleRoute::delivery_stops)
            .map(|stop| {
                let mut props = JsonObject::new();
                props.insert("vehicle_id".into(), json!(stop.vehicle_id));
                props.insert("stop_number".into(), json!(stop.stop_number));
                props.insert("color".into(), json!(stop.color));
                feature(GeoValue::Point(position(&stop.position)), props)
            })
            .collect(),
    )
}

pub fn status_color(status: DeliveryStatus) -> &'static str {
    match status {
        DeliveryStatus::Completed => COMPLETED_COLOR,
        DeliveryStatus::Pending => PENDING_COLOR,
    }
}

/// Entregas del conductor con los datos del popup
pub fn deliveries_collection(deliveries: &[DriverDelivery]) -> FeatureCollection {
    collection(
        deliveries
            .iter()
            .map(|delivery| {
                let mut props = JsonObject::new();
                props.insert("id".into(), json!(delivery.id));
                props.insert("orderId".into(), json!(delivery.order_id));
                props.insert("address".into(), json!(delivery.address));
                props.insert("packages".into(), json!(delivery.packages));
                props.insert("time".into(), json!(delivery.time));
                props.insert("status".into(), json!(delivery.status.as_str()));
                props.insert("sequenceNumber".into(), json!(delivery.sequence_number));
                props.insert("color".into(), json!(status_color(delivery.status)));
                feature(GeoValue::Point(position(&delivery.coordinates)), props)
            })
            .collect(),
    )
}

/// Línea única (ruta del conductor)
pub fn line_collection(points: &[LngLat]) -> FeatureCollection {
    collection(vec![feature(line(points), JsonObject::new())])
}

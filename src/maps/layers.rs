//! Ids de fuentes/capas y definición de cada capa.

use serde_json::json;

use super::paint::{DEFAULT_OPACITY, DEPOT_COLOR, UNSELECTED_WIDTH};
use super::traits::{LayerKind, LayerSpec};

// Planificador
pub const ROUTES_SOURCE: &str = "routes-src";
pub const ROUTES_LAYER: &str = "routes-lines";
pub const STOPS_SOURCE: &str = "delivery-stops";
pub const STOPS_LAYER: &str = "delivery-stops-circle";

// Conductor
pub const DRIVER_ROUTE_SOURCE: &str = "route";
pub const DRIVER_ROUTE_LAYER: &str = "route-line";
pub const DELIVERIES_SOURCE: &str = "deliveries";
pub const DELIVERY_POINTS_LAYER: &str = "delivery-points";
pub const DELIVERY_NUMBERS_LAYER: &str = "delivery-numbers";

pub fn routes_lines() -> LayerSpec {
    LayerSpec {
        id: ROUTES_LAYER,
        kind: LayerKind::Line,
        source: ROUTES_SOURCE,
        layout: json!({ "line-join": "round", "line-cap": "round" }),
        paint: json!({
            "line-color": ["get", "color"],
            "line-width": UNSELECTED_WIDTH,
            "line-opacity": DEFAULT_OPACITY,
        }),
    }
}

pub fn stops_circles() -> LayerSpec {
    LayerSpec {
        id: STOPS_LAYER,
        kind: LayerKind::Circle,
        source: STOPS_SOURCE,
        layout: json!({}),
        paint: json!({
            "circle-radius": 6,
            "circle-color": ["get", "color"],
            "circle-stroke-width": 2,
            "circle-stroke-color": "#ffffff",
        }),
    }
}

pub fn driver_route_line() -> LayerSpec {
    LayerSpec {
        id: DRIVER_ROUTE_LAYER,
        kind: LayerKind::Line,
        source: DRIVER_ROUTE_SOURCE,
        layout: json!({ "line-join": "round", "line-cap": "round" }),
        paint: json!({
            "line-color": DEPOT_COLOR,
            "line-width": 4,
            "line-opacity": 0.7,
        }),
    }
}

pub fn delivery_points() -> LayerSpec {
    LayerSpec {
        id: DELIVERY_POINTS_LAYER,
        kind: LayerKind::Circle,
        source: DELIVERIES_SOURCE,
        layout: json!({}),
        paint: json!({
            "circle-radius": 12,
            "circle-color": ["get", "color"],
            "circle-stroke-width": 3,
            "circle-stroke-color": "#ffffff",
        }),
    }
}

pub fn delivery_numbers() -> LayerSpec {
    LayerSpec {
        id: DELIVERY_NUMBERS_LAYER,
        kind: LayerKind::Symbol,
        source: DELIVERIES_SOURCE,
        layout: json!({
            "text-field": ["to-string", ["get", "sequenceNumber"]],
            "text-font": ["Open Sans Bold", "Arial Unicode MS Bold"],
            "text-size": 12,
            "text-allow-overlap": true,
        }),
        paint: json!({ "text-color": "#ffffff" }),
    }
}

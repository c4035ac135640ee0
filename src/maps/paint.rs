//! Colores y expresiones de pintura de la capa de rutas.

use serde_json::{json, Value};

use crate::models::VehicleRoute;

pub const SELECTED_WIDTH: f64 = 6.0;
pub const UNSELECTED_WIDTH: f64 = 3.0;
pub const SELECTED_OPACITY: f64 = 1.0;
pub const DIMMED_OPACITY: f64 = 0.25;
pub const DEFAULT_OPACITY: f64 = 0.9;
pub const HIDDEN_OPACITY: f64 = 0.0;

pub const DEPOT_COLOR: &str = "#3b82f6";
pub const COMPLETED_COLOR: &str = "#10b981";
pub const PENDING_COLOR: &str = "#f59e0b";

/// Color del vehículo `index` de `total`, repartido por el círculo de tonos
pub fn route_color(index: usize, total: usize) -> String {
    let hue = if total == 0 {
        0
    } else {
        (index as f64 * 360.0 / total as f64).round() as u32 % 360
    };
    format!("hsl({},78%,45%)", hue)
}

/// Opacidad de una línea. Una ruta oculta nunca se ve, aunque esté seleccionada.
pub fn route_opacity(visible: bool, is_selected: bool, has_selection: bool) -> f64 {
    match (visible, is_selected, has_selection) {
        (false, _, _) => HIDDEN_OPACITY,
        (true, true, _) => SELECTED_OPACITY,
        (true, false, true) => DIMMED_OPACITY,
        (true, false, false) => DEFAULT_OPACITY,
    }
}

pub fn route_width(is_selected: bool) -> f64 {
    if is_selected {
        SELECTED_WIDTH
    } else {
        UNSELECTED_WIDTH
    }
}

/// `["match", ["get", "vehicle_id"], id, valor, ..., fallback]`.
/// Sin entradas devuelve el fallback literal: un match vacío no es válido.
pub fn match_by_vehicle(entries: impl IntoIterator<Item = (String, Value)>, fallback: Value) -> Value {
    let mut expr = vec![json!("match"), json!(["get", "vehicle_id"])];
    for (id, value) in entries {
        expr.push(Value::String(id));
        expr.push(value);
    }
    if expr.len() == 2 {
        return fallback;
    }
    expr.push(fallback);
    Value::Array(expr)
}

/// Propiedades de pintura derivadas de (rutas, selección)
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePaint {
    pub line_opacity: Value,
    pub line_width: Value,
    pub stop_opacity: Value,
}

impl RoutePaint {
    pub fn compute(routes: &[VehicleRoute], selected: Option<&str>) -> Self {
        let has_selection = selected.is_some();
        let is_selected = |route: &VehicleRoute| selected == Some(route.vehicle_id.as_str());

        let line_opacity = match_by_vehicle(
            routes.iter().map(|r| {
                (r.vehicle_id.clone(), json!(route_opacity(r.visible, is_selected(r), has_selection)))
            }),
            json!(DEFAULT_OPACITY),
        );
        let line_width = match_by_vehicle(
            routes.iter().map(|r| (r.vehicle_id.clone(), json!(route_width(is_selected(r))))),
            json!(UNSELECTED_WIDTH),
        );
        let stop_opacity = match_by_vehicle(
            routes
                .iter()
                .map(|r| (r.vehicle_id.clone(), json!(if r.visible { 1.0 } else { 0.0 }))),
            json!(1.0),
        );

        Self { line_opacity, line_width, stop_opacity }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(id: &str, visible: bool) -> VehicleRoute {
        let mut r = VehicleRoute::new(id, vec![[0.0, 0.0], [1.0, 1.0]], None);
        r.visible = visible;
        r
    }

    /// Valor que la expresión asigna a `id`
    fn lookup<'a>(expr: &'a Value, id: &str) -> &'a Value {
        let items = expr.as_array().unwrap();
        let pos = items.iter().position(|v| v == id).unwrap();
        &items[pos + 1]
    }

    #[test]
    fn colors_spread_over_hue_circle() {
        assert_eq!(route_color(0, 4), "hsl(0,78%,45%)");
        assert_eq!(route_color(1, 4), "hsl(90,78%,45%)");
        assert_eq!(route_color(1, 3), "hsl(120,78%,45%)");
        assert_eq!(route_color(1, 7), "hsl(51,78%,45%)");
    }

    #[test]
    fn selection_dims_the_rest() {
        let routes = vec![route("V1", true), route("V2", true), route("V3", true)];
        let paint = RoutePaint::compute(&routes, Some("V2"));
        assert_eq!(lookup(&paint.line_opacity, "V1"), &json!(0.25));
        assert_eq!(lookup(&paint.line_opacity, "V2"), &json!(1.0));
        assert_eq!(lookup(&paint.line_width, "V2"), &json!(6.0));
        assert_eq!(lookup(&paint.line_width, "V3"), &json!(3.0));
    }

    #[test]
    fn hidden_routes_are_transparent_even_when_selected() {
        let routes = vec![route("V1", false), route("V2", true)];
        let paint = RoutePaint::compute(&routes, Some("V1"));
        assert_eq!(lookup(&paint.line_opacity, "V1"), &json!(0.0));
        assert_eq!(lookup(&paint.stop_opacity, "V1"), &json!(0.0));
        assert_eq!(lookup(&paint.stop_opacity, "V2"), &json!(1.0));

        let unselected = RoutePaint::compute(&routes, None);
        assert_eq!(lookup(&unselected.line_opacity, "V2"), &json!(0.9));
    }

    #[test]
    fn empty_fleet_uses_literal_fallback() {
        let paint = RoutePaint::compute(&[], None);
        assert_eq!(paint.line_opacity, json!(0.9));
        assert_eq!(paint.line_width, json!(3.0));
        assert_eq!(paint.stop_opacity, json!(1.0));
    }

    #[test]
    fn match_expression_shape() {
        let expr = match_by_vehicle(vec![("V1".to_string(), json!(1))], json!(0));
        assert_eq!(expr, json!(["match", ["get", "vehicle_id"], "V1", 1, 0]));
    }
}

// ============================================================================
// ROUTE LEGEND VIEW - Lista de vehículos sobre el mapa del planificador
// ============================================================================
// Se repinta entera tras cada acción; el estado vive en `FleetRoutes`.
// ============================================================================

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{get_element_by_id, replace_children, clear_children, ElementBuilder};
use crate::models::VehicleRoute;
use crate::utils::LEGEND_VISIBLE_ITEMS;
use crate::views::Planner;

pub const ROUTE_LEGEND_ID: &str = "route-legend";

/// Contenedor vacío de la leyenda; se rellena con `refresh_route_legend`
pub fn render_route_legend_slot() -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("div")?.class("route-legend").id(ROUTE_LEGEND_ID).build())
}

/// Vuelve a pintar la leyenda con el estado actual de la flota
pub fn refresh_route_legend(planner: &Rc<Planner>) {
    let Some(slot) = get_element_by_id(ROUTE_LEGEND_ID) else {
        return;
    };
    if planner.fleet().is_empty() {
        clear_children(&slot);
        return;
    }
    let result = render_route_legend(planner).and_then(|legend| replace_children(&slot, &legend));
    if let Err(e) = result {
        log::error!("❌ Error pintando la leyenda: {:?}", e);
    }
}

fn render_route_legend(planner: &Rc<Planner>) -> Result<Element, JsValue> {
    let fleet = planner.fleet();
    let total = fleet.routes().len();

    let header = ElementBuilder::new("div")?
        .class("legend-header")
        .child(
            ElementBuilder::new("div")?
                .class("legend-title")
                .text(&format!("Routes ({}/{})", fleet.visible_count(), total))
                .build(),
        )?
        .child(
            ElementBuilder::new("div")?
                .class("legend-actions")
                .child(legend_button(planner, "All", "legend-button legend-button--all", |p| p.select_all())?)?
                .child(legend_button(planner, "None", "legend-button legend-button--none", |p| p.deselect_all())?)?
                .build(),
        )?
        .build();

    let mut type_buttons = Vec::new();
    for vehicle_type in fleet.vehicle_types() {
        let planner = planner.clone();
        let button = ElementBuilder::new("button")?
            .class("legend-type")
            .attr("type", "button")?
            .text(&vehicle_type)
            .on_click(move |_| {
                planner.filter_by_type(&vehicle_type);
                refresh_route_legend(&planner);
            })?
            .build();
        type_buttons.push(button);
    }
    let types = ElementBuilder::new("div")?.class("legend-types").children(type_buttons)?.build();

    let mut items = Vec::new();
    for route in fleet.legend_items() {
        items.push(render_legend_item(planner, route, fleet.selected() == Some(route.vehicle_id.as_str()))?);
    }

    let mut legend = ElementBuilder::new("div")?
        .class("legend-card")
        .child(header)?
        .child(types)?
        .child(ElementBuilder::new("div")?.class("legend-items").children(items)?.build())?;

    if total > LEGEND_VISIBLE_ITEMS {
        let label = if fleet.is_expanded() {
            "Show less".to_string()
        } else {
            format!("Show all ({})", total)
        };
        legend = legend.child(legend_button(planner, &label, "legend-more", |p| p.toggle_legend_expanded())?)?;
    }

    Ok(legend.build())
}

fn render_legend_item(planner: &Rc<Planner>, route: &VehicleRoute, selected: bool) -> Result<Element, JsValue> {
    let swatch = ElementBuilder::new("div")?
        .class("legend-swatch")
        .style("background", &route.color)?
        .build();

    let name = {
        let planner = planner.clone();
        let vehicle_id = route.vehicle_id.clone();
        ElementBuilder::new("button")?
            .class(if selected { "legend-name legend-name--selected" } else { "legend-name" })
            .attr("type", "button")?
            .text(&route.vehicle_id)
            .on_click(move |_| {
                planner.select(&vehicle_id);
                refresh_route_legend(&planner);
            })?
            .build()
    };

    let mut checkbox = ElementBuilder::new("input")?
        .class("legend-toggle")
        .attr("type", "checkbox")?
        .attr("aria-label", &format!("Show {}", route.vehicle_id))?;
    if route.visible {
        checkbox = checkbox.attr("checked", "")?;
    }
    let checkbox = {
        let planner = planner.clone();
        let vehicle_id = route.vehicle_id.clone();
        checkbox
            .on_change(move |_| {
                planner.toggle_visibility(&vehicle_id);
                refresh_route_legend(&planner);
            })?
            .build()
    };

    Ok(ElementBuilder::new("div")?
        .class("legend-item")
        .child(swatch)?
        .child(name)?
        .child(checkbox)?
        .build())
}

fn legend_button(
    planner: &Rc<Planner>,
    label: &str,
    class: &str,
    action: fn(&Planner),
) -> Result<Element, JsValue> {
    let planner = planner.clone();
    Ok(ElementBuilder::new("button")?
        .class(class)
        .attr("type", "button")?
        .text(label)
        .on_click(move |_| {
            action(&planner);
            refresh_route_legend(&planner);
        })?
        .build())
}

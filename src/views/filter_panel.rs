// ============================================================================
// FILTER PANEL VIEW - Preferencias de optimización
// ============================================================================
// El panel edita un borrador; "Apply Filters" lo publica en el estado y lanza
// el optimizador. El mapa reacciona a la suscripción de `state.filters`.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{
    event_checked, event_select_value, get_element_by_id, replace_children, set_style, ElementBuilder,
};
use crate::models::{CostOptimization, FilterOption, FuelType, RouteFilters, VehicleCapacity};
use crate::services::spawn_optimization;
use crate::state::{AppState, ReactiveState};

pub const FILTER_PANEL_ID: &str = "filter-panel";
const TOLL_HINT_ID: &str = "toll-hint";

type Draft = Rc<RefCell<RouteFilters>>;

struct ToggleRow {
    id: &'static str,
    label: &'static str,
    get: fn(&RouteFilters) -> bool,
    set: fn(&mut RouteFilters, bool),
}

/// Renderizar el contenedor del panel (el contenido se monta con `mount_filter_panel`)
pub fn render_filter_panel(state: &AppState) -> Result<Element, JsValue> {
    let slot = ElementBuilder::new("div")?.class("filter-panel").id(FILTER_PANEL_ID).build();
    mount_filter_panel(&slot, &state.filters, state.filters.snapshot())?;
    Ok(slot)
}

/// Pinta el panel dentro de `slot` con `initial` como borrador
pub fn mount_filter_panel(
    slot: &Element,
    filters: &ReactiveState<RouteFilters>,
    initial: RouteFilters,
) -> Result<(), JsValue> {
    let draft: Draft = Rc::new(RefCell::new(initial));

    let header = {
        let slot = slot.clone();
        let filters = filters.clone();
        ElementBuilder::new("div")?
            .class("filter-header")
            .child(ElementBuilder::new("h2")?.text("Route Optimization").build())?
            .child(
                ElementBuilder::new("button")?
                    .class("button button--ghost")
                    .attr("type", "button")?
                    .text("Reset")
                    .on_click(move |_| {
                        if let Err(e) = mount_filter_panel(&slot, &filters, RouteFilters::default()) {
                            log::error!("❌ Error reseteando filtros: {:?}", e);
                        }
                    })?
                    .build(),
            )?
            .build()
    };

    let environmental = render_section(
        "Environmental",
        vec![
            render_toggle(&draft, &ToggleRow {
                id: "low-carbon",
                label: "Low Carbon Footprint",
                get: |f| f.low_carbon,
                set: |f, v| f.low_carbon = v,
            })?,
            render_toggle(&draft, &ToggleRow {
                id: "ev-priority",
                label: "EV Priority",
                get: |f| f.ev_priority,
                set: |f, v| f.ev_priority = v,
            })?,
            render_toggle(&draft, &ToggleRow {
                id: "emission-zones",
                label: "Low Emission Zones",
                get: |f| f.emission_zones,
                set: |f, v| f.emission_zones = v,
            })?,
        ],
    )?;

    let economic = render_section(
        "Economic",
        vec![
            render_select::<CostOptimization>(
                &draft,
                "cost-optimization",
                "Cost Optimization",
                |f| f.cost_optimization,
                |f, v| f.cost_optimization = v,
            )?,
            render_toggle(&draft, &ToggleRow {
                id: "toll-avoidance",
                label: "Avoid Tolls",
                get: |f| f.avoid_tolls,
                set: |f, v| f.avoid_tolls = v,
            })?,
            render_toggle(&draft, &ToggleRow {
                id: "fuel-efficiency",
                label: "Fuel Efficiency Priority",
                get: |f| f.fuel_efficiency,
                set: |f, v| f.fuel_efficiency = v,
            })?,
        ],
    )?;

    let vehicle = render_section(
        "Vehicle Type",
        vec![
            render_select::<FuelType>(&draft, "fuel-type", "Fuel Type", |f| f.fuel_type, |f, v| f.fuel_type = v)?,
            render_select::<VehicleCapacity>(
                &draft,
                "vehicle-capacity",
                "Vehicle Capacity",
                |f| f.vehicle_capacity,
                |f, v| f.vehicle_capacity = v,
            )?,
        ],
    )?;

    let performance = render_section(
        "Performance",
        vec![
            render_toggle(&draft, &ToggleRow {
                id: "traffic-avoidance",
                label: "Avoid Traffic",
                get: |f| f.avoid_traffic,
                set: |f, v| f.avoid_traffic = v,
            })?,
            render_toggle(&draft, &ToggleRow {
                id: "time-windows",
                label: "Respect Time Windows",
                get: |f| f.time_windows,
                set: |f, v| f.time_windows = v,
            })?,
        ],
    )?;

    let apply = {
        let draft = draft.clone();
        let filters = filters.clone();
        ElementBuilder::new("button")?
            .class("button button--primary button--full")
            .attr("type", "button")?
            .text("Apply Filters")
            .on_click(move |_| {
                let applied = *draft.borrow();
                log::info!("🎛️ Aplicando filtros: {:?}", applied);
                // Primero el mapa, luego el optimizador
                filters.set(applied);
                spawn_optimization(applied);
            })?
            .build()
    };

    let toll_hint = ElementBuilder::new("p")?
        .class("filter-hint")
        .id(TOLL_HINT_ID)
        .text("ℹ️ Toll avoidance will be applied to routes")
        .build();
    show_toll_hint(&toll_hint, draft.borrow().avoid_tolls);

    let content = ElementBuilder::new("div")?
        .class("filter-card")
        .child(header)?
        .child(environmental)?
        .child(economic)?
        .child(vehicle)?
        .child(performance)?
        .child(ElementBuilder::new("div")?.class("filter-actions").child(apply)?.child(toll_hint)?.build())?
        .build();

    replace_children(slot, &content)
}

fn render_section(title: &str, rows: Vec<Element>) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("div")?
        .class("filter-section")
        .child(ElementBuilder::new("h3")?.class("filter-section-title").text(title).build())?
        .children(rows)?
        .build())
}

fn render_toggle(draft: &Draft, row: &ToggleRow) -> Result<Element, JsValue> {
    let mut input = ElementBuilder::new("input")?
        .class("filter-switch")
        .id(row.id)
        .attr("type", "checkbox")?;
    if (row.get)(&draft.borrow()) {
        input = input.attr("checked", "")?;
    }

    let draft = draft.clone();
    let set = row.set;
    let input = input
        .on_change(move |event| {
            let Some(checked) = event_checked(&event) else {
                return;
            };
            set(&mut draft.borrow_mut(), checked);
            if let Some(hint) = get_element_by_id(TOLL_HINT_ID) {
                show_toll_hint(&hint, draft.borrow().avoid_tolls);
            }
        })?
        .build();

    Ok(ElementBuilder::new("div")?
        .class("filter-row")
        .child(ElementBuilder::new("label")?.attr("for", row.id)?.text(row.label).build())?
        .child(input)?
        .build())
}

fn render_select<T: FilterOption>(
    draft: &Draft,
    id: &str,
    label: &str,
    get: fn(&RouteFilters) -> T,
    set: fn(&mut RouteFilters, T),
) -> Result<Element, JsValue> {
    let current = get(&draft.borrow());
    let mut options = Vec::with_capacity(T::all().len());
    for option in T::all() {
        let mut builder = ElementBuilder::new("option")?
            .attr("value", option.key())?
            .text(option.label());
        if *option == current {
            builder = builder.attr("selected", "")?;
        }
        options.push(builder.build());
    }

    let draft = draft.clone();
    let select = ElementBuilder::new("select")?
        .class("filter-select")
        .id(id)
        .children(options)?
        .on_change(move |event| {
            match event_select_value(&event).as_deref().and_then(T::from_key) {
                Some(value) => set(&mut draft.borrow_mut(), value),
                None => log::warn!("⚠️ Valor de filtro desconocido"),
            }
        })?
        .build();

    Ok(ElementBuilder::new("div")?
        .class("filter-field")
        .child(ElementBuilder::new("label")?.attr("for", id)?.text(label).build())?
        .child(select)?
        .build())
}

fn show_toll_hint(hint: &Element, visible: bool) {
    if let Err(e) = set_style(hint, "display", if visible { "block" } else { "none" }) {
        log::warn!("⚠️ {:?}", e);
    }
}

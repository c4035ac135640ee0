// ============================================================================
// ROUTE MAP VIEW - Mapa del planificador con badges y leyenda
// ============================================================================

use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::config::CONFIG;
use crate::dom::{get_element_by_id, replace_children, ElementBuilder};
use crate::maps::web::{MapOptions, WebMapRenderer};
use crate::models::RouteFilters;
use crate::utils::PLANNER_MAP_CONTAINER;
use crate::views::route_legend::{refresh_route_legend, render_route_legend_slot};
use crate::views::Planner;

const MAP_BADGES_ID: &str = "map-badges";

/// Renderizar el bloque del mapa. Sin token se muestra el aviso y no hay mapa.
pub fn render_route_map(filters: &RouteFilters) -> Result<Element, JsValue> {
    let badges = ElementBuilder::new("div")?
        .class("map-badges")
        .id(MAP_BADGES_ID)
        .child(render_badges(filters)?)?
        .build();

    let mut wrapper = ElementBuilder::new("div")?
        .class("route-map-wrapper")
        .child(badges)?
        .child(render_route_legend_slot()?)?
        .child(ElementBuilder::new("div")?.class("route-map").id(PLANNER_MAP_CONTAINER).build())?;

    if CONFIG.mapbox_token().is_none() {
        wrapper = wrapper.child(render_token_placeholder()?)?;
    }

    Ok(wrapper.build())
}

/// Crea el mapa de Mapbox una vez que el contenedor está en el DOM
pub fn mount_route_map(planner: &Rc<Planner>) {
    let Some(token) = CONFIG.mapbox_token() else {
        log::warn!("⚠️ MAPBOX_ACCESS_TOKEN no configurado, mapa deshabilitado");
        return;
    };
    let map_config = &CONFIG.map_config;
    let options = MapOptions {
        container_id: PLANNER_MAP_CONTAINER,
        style: &map_config.planner_style,
        center: map_config.depot(),
        zoom: map_config.planner_zoom,
        access_token: token,
    };

    // El mapa vive dentro del planner: Weak para no crear un ciclo
    let weak: Weak<Planner> = Rc::downgrade(planner);
    let on_load = move || {
        if let Some(planner) = weak.upgrade() {
            log::info!("🗺️ Estilo del planificador cargado");
            planner.on_map_loaded();
        }
    };

    match WebMapRenderer::new(&options, on_load) {
        Ok(renderer) => {
            planner.attach_map(renderer, map_config.depot());
            refresh_route_legend(planner);
            schedule_resize(Rc::downgrade(planner));
        }
        Err(e) => log::error!("❌ No se pudo crear el mapa del planificador: {}", e),
    }
}

/// Actualiza los badges de estado de filtros
pub fn refresh_map_badges(filters: &RouteFilters) {
    let Some(slot) = get_element_by_id(MAP_BADGES_ID) else {
        return;
    };
    let result = render_badges(filters).and_then(|badges| replace_children(&slot, &badges));
    if let Err(e) = result {
        log::warn!("⚠️ Error pintando badges: {:?}", e);
    }
}

fn render_badges(filters: &RouteFilters) -> Result<Element, JsValue> {
    let mut badges = Vec::new();
    if filters.avoid_tolls {
        badges.push(badge("🚧 Avoiding toll roads", "map-badge map-badge--tolls")?);
    }
    if filters.low_carbon {
        badges.push(badge("🌱 Low carbon routes", "map-badge map-badge--carbon")?);
    }
    if filters.ev_priority {
        badges.push(badge("⚡ EV priority routes", "map-badge map-badge--ev")?);
    }
    Ok(ElementBuilder::new("div")?.class("map-badge-list").children(badges)?.build())
}

fn badge(text: &str, class: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("div")?.class(class).text(text).build())
}

fn render_token_placeholder() -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("div")?
        .class("map-token-required")
        .child(
            ElementBuilder::new("div")?
                .class("map-token-card")
                .child(ElementBuilder::new("h3")?.text("Mapbox Token Required").build())?
                .child(
                    ElementBuilder::new("p")?
                        .text("Please set MAPBOX_ACCESS_TOKEN in your .env file")
                        .build(),
                )?
                .build(),
        )?
        .build())
}

// El contenedor puede no tener tamaño final al crear el mapa
fn schedule_resize(planner: Weak<Planner>) {
    Timeout::new(100, move || {
        if let Some(planner) = planner.upgrade() {
            if let Some(renderer) = planner.layer().renderer() {
                renderer.resize();
            };
        }
    })
    .forget();
}

// ============================================================================
// ROUTE PLANNER VIEW - Panel de filtros + mapa de la flota
// ============================================================================

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::config::CONFIG;
use crate::dom::ElementBuilder;
use crate::services::ApiClient;
use crate::views::filter_panel::render_filter_panel;
use crate::views::route_legend::refresh_route_legend;
use crate::views::route_map::{mount_route_map, render_route_map};
use crate::views::{Planner, ViewContext};

/// Renderizar página del planificador
pub fn render_route_planner(ctx: &ViewContext) -> Result<Element, JsValue> {
    let header = ElementBuilder::new("div")?
        .class("page-header")
        .child(ElementBuilder::new("h1")?.class("page-title").text("Route Optimization").build())?
        .child(
            ElementBuilder::new("p")?
                .class("page-subtitle")
                .text("Plan and optimize delivery routes with advanced filters")
                .build(),
        )?
        .build();

    let layout = ElementBuilder::new("div")?
        .class("planner-layout")
        .child(
            ElementBuilder::new("div")?
                .class("planner-filters")
                .child(render_filter_panel(&ctx.state)?)?
                .build(),
        )?
        .child(
            ElementBuilder::new("div")?
                .class("planner-map")
                .child(render_route_map(&ctx.state.filters.snapshot())?)?
                .build(),
        )?
        .build();

    Ok(ElementBuilder::new("div")?
        .class("page route-planner-page")
        .child(header)?
        .child(layout)?
        .build())
}

/// Monta el mapa y, la primera vez, carga la flota desde los CSV
pub fn mount_route_planner(ctx: &ViewContext) {
    mount_route_map(&ctx.planner);

    if ctx.fleet_requested.replace(true) {
        return;
    }
    let planner = ctx.planner.clone();
    spawn_local(async move {
        let api = ApiClient::new();
        let routes_csv = match api.fetch_asset_text(&CONFIG.assets.routes_csv_path).await {
            Ok(text) => text,
            Err(e) => {
                log::error!("❌ No se pudo cargar {}: {}", CONFIG.assets.routes_csv_path, e);
                return;
            }
        };
        // Sin el CSV de vehículos las rutas quedan sin tipo
        let vehicles_csv = match api.fetch_asset_text(&CONFIG.assets.vehicles_csv_path).await {
            Ok(text) => Some(text),
            Err(e) => {
                log::warn!("⚠️ Sin tipos de vehículo: {}", e);
                None
            }
        };

        planner.load_csv(&routes_csv, vehicles_csv.as_deref());
        refresh_route_legend(&planner);
        refresh_geometry(planner).await;
    });
}

/// Lanza un recálculo de geometría en segundo plano
pub fn spawn_geometry_refresh(planner: Rc<Planner>) {
    spawn_local(refresh_geometry(planner));
}

async fn refresh_geometry(planner: Rc<Planner>) {
    if CONFIG.mapbox_token().is_none() {
        return;
    }
    if planner.refresh_geometry().await {
        log::info!("🛣️ Geometría por carretera aplicada");
    }
}

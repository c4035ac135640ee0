// ============================================================================
// APP VIEW - Shell: navbar + página actual
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::ElementBuilder;
use crate::state::Page;
use crate::views::dashboard::{mount_dashboard, render_dashboard};
use crate::views::driver_view::{mount_driver_view, render_driver_view};
use crate::views::navbar::render_navbar;
use crate::views::not_found::render_not_found;
use crate::views::route_planner::{mount_route_planner, render_route_planner};
use crate::views::ViewContext;

pub const PAGE_ROOT_ID: &str = "page-root";

/// Renderizar la aplicación completa
pub fn render_app(ctx: &ViewContext) -> Result<Element, JsValue> {
    let page = match ctx.state.page() {
        Page::Dashboard => render_dashboard()?,
        Page::RoutePlanner => render_route_planner(ctx)?,
        Page::DriverView => render_driver_view(ctx)?,
        Page::NotFound => render_not_found()?,
    };

    Ok(ElementBuilder::new("div")?
        .class("app-shell")
        .child(render_navbar(&ctx.state)?)?
        .child(ElementBuilder::new("main")?.class("app-main").id(PAGE_ROOT_ID).child(page)?.build())?
        .build())
}

/// Pasos que necesitan el árbol ya insertado (mapas, fetch de datos)
pub fn mount_current_page(ctx: &ViewContext) {
    match ctx.state.page() {
        Page::Dashboard => mount_dashboard(),
        Page::RoutePlanner => mount_route_planner(ctx),
        Page::DriverView => mount_driver_view(ctx),
        Page::NotFound => {}
    }
}

// ============================================================================
// NAVBAR VIEW - Marca, enlaces por rol y selector de rol
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::ElementBuilder;
use crate::models::Role;
use crate::state::{AppState, Page};

/// Renderizar barra de navegación
pub fn render_navbar(state: &AppState) -> Result<Element, JsValue> {
    let role = state.session.role();
    let current = state.page();

    let brand = ElementBuilder::new("div")?
        .class("navbar-brand")
        .child(
            ElementBuilder::new("img")?
                .class("navbar-logo")
                .attr("src", "/image.jpg")?
                .attr("alt", "OptiPot Logo")?
                .build(),
        )?
        .child(ElementBuilder::new("span")?.class("navbar-title").text("OptiPot").build())?
        .build();

    let mut links = Vec::new();
    for page in Page::nav_items(role) {
        let class = if *page == current {
            "nav-link nav-link--active"
        } else {
            "nav-link"
        };
        let link = ElementBuilder::new("a")?
            .class(class)
            .attr("href", &format!("#{}", page.path()))?
            .text(page.title())
            .build();
        links.push(link);
    }
    let nav = ElementBuilder::new("nav")?.class("navbar-links").children(links)?.build();

    let switcher = ElementBuilder::new("div")?
        .class("role-switch")
        .child(render_role_button(state, Role::Manager, "Manager View")?)?
        .child(render_role_button(state, Role::Driver, "Driver View")?)?
        .build();

    let navbar = ElementBuilder::new("header")?
        .class("navbar")
        .child(
            ElementBuilder::new("div")?
                .class("navbar-left")
                .child(brand)?
                .child(nav)?
                .build(),
        )?
        .child(switcher)?
        .build();

    Ok(navbar)
}

fn render_role_button(state: &AppState, role: Role, label: &str) -> Result<Element, JsValue> {
    let active = state.session.role() == role;
    let text = if active {
        format!("✓ {}", label)
    } else {
        label.to_string()
    };
    let state = state.clone();
    let button = ElementBuilder::new("button")?
        .class(if active { "role-button role-button--active" } else { "role-button" })
        .attr("type", "button")?
        .text(&text)
        .on_click(move |_| {
            // set_role notifica y la app se vuelve a renderizar
            state.set_role(role);
        })?
        .build();
    Ok(button)
}

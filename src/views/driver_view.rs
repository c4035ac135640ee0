// ============================================================================
// DRIVER VIEW - Ruta del día del conductor
// ============================================================================

use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::config::CONFIG;
use crate::dom::{get_element_by_id, replace_children, ElementBuilder};
use crate::maps::web::{MapOptions, WebMapRenderer};
use crate::models::{DeliveryStatus, DriverDelivery};
use crate::services::ApiClient;
use crate::utils::DRIVER_MAP_CONTAINER;
use crate::views::{Driver, ViewContext};

const SUMMARY_ID: &str = "driver-summary";
const DELIVERIES_ID: &str = "driver-deliveries";

/// Renderizar vista del conductor
pub fn render_driver_view(ctx: &ViewContext) -> Result<Element, JsValue> {
    let driver_id = ctx.state.session.driver_id();

    let header = ElementBuilder::new("div")?
        .class("page-header driver-header")
        .child(
            ElementBuilder::new("div")?
                .child(
                    ElementBuilder::new("h1")?
                        .class("page-title")
                        .text(&format!("My Route - {}", driver_id))
                        .build(),
                )?
                .child(ElementBuilder::new("p")?.class("page-subtitle").id(SUMMARY_ID).build())?
                .build(),
        )?
        .child(
            ElementBuilder::new("span")?
                .class("badge badge--outline")
                .text(&format!("Route #{}", driver_id))
                .build(),
        )?
        .build();

    let mut map = ElementBuilder::new("div")?
        .class("driver-map-wrapper")
        .child(ElementBuilder::new("div")?.class("driver-map").id(DRIVER_MAP_CONTAINER).build())?;
    if CONFIG.mapbox_token().is_none() {
        map = map.child(
            ElementBuilder::new("div")?
                .class("map-token-required")
                .child(ElementBuilder::new("h3")?.text("Mapbox Token Required").build())?
                .build(),
        )?;
    }

    let list = ElementBuilder::new("div")?
        .class("driver-deliveries-card")
        .child(ElementBuilder::new("h2")?.text("📦 Today's Deliveries").build())?
        .child(ElementBuilder::new("div")?.class("delivery-list").id(DELIVERIES_ID).build())?
        .build();

    let page = ElementBuilder::new("div")?
        .class("page driver-page")
        .child(header)?
        .child(
            ElementBuilder::new("div")?
                .class("driver-layout")
                .child(map.build())?
                .child(list)?
                .build(),
        )?
        .build();

    Ok(page)
}

/// Monta el mapa, pinta la lista y la primera vez pide los pedidos
pub fn mount_driver_view(ctx: &ViewContext) {
    mount_driver_map(&ctx.driver);
    refresh_delivery_panel(&ctx.driver);

    if ctx.orders_requested.replace(true) {
        return;
    }
    let driver = ctx.driver.clone();
    spawn_local(async move {
        let orders = ApiClient::new().fetch_orders().await;
        driver.load_orders(&orders);
        refresh_delivery_panel(&driver);
        refresh_geometry(driver).await;
    });
}

fn mount_driver_map(driver: &Rc<Driver>) {
    let Some(token) = CONFIG.mapbox_token() else {
        return;
    };
    let map_config = &CONFIG.map_config;
    let options = MapOptions {
        container_id: DRIVER_MAP_CONTAINER,
        style: &map_config.driver_style,
        center: map_config.depot(),
        zoom: map_config.driver_zoom,
        access_token: token,
    };

    let weak: Weak<Driver> = Rc::downgrade(driver);
    let on_load = move || {
        if let Some(driver) = weak.upgrade() {
            driver.on_map_loaded();
        }
    };

    match WebMapRenderer::new(&options, on_load) {
        Ok(renderer) => {
            driver.attach_map(renderer);
            let weak = Rc::downgrade(driver);
            Timeout::new(100, move || {
                if let Some(driver) = weak.upgrade() {
                    if let Some(renderer) = driver.layer().renderer() {
                        renderer.resize();
                    };
                }
            })
            .forget();
        }
        Err(e) => log::error!("❌ No se pudo crear el mapa del conductor: {}", e),
    }
}

/// Repinta el resumen y la lista de entregas
fn refresh_delivery_panel(driver: &Rc<Driver>) {
    let route = driver.route();
    if let Some(summary) = get_element_by_id(SUMMARY_ID) {
        summary.set_text_content(Some(&format!(
            "{} deliveries remaining • {} completed",
            route.pending_count(),
            route.completed_count()
        )));
    }

    let Some(slot) = get_element_by_id(DELIVERIES_ID) else {
        return;
    };
    let mut cards = Vec::with_capacity(route.deliveries.len());
    for delivery in &route.deliveries {
        match render_delivery_card(driver, delivery) {
            Ok(card) => cards.push(card),
            Err(e) => log::error!("❌ Error pintando {}: {:?}", delivery.id, e),
        }
    }
    let result = ElementBuilder::new("div")
        .and_then(|list| list.class("delivery-items").children(cards))
        .and_then(|list| replace_children(&slot, &list.build()));
    if let Err(e) = result {
        log::error!("❌ Error pintando entregas: {:?}", e);
    }
}

fn render_delivery_card(driver: &Rc<Driver>, delivery: &DriverDelivery) -> Result<Element, JsValue> {
    let completed = delivery.status == DeliveryStatus::Completed;

    let mut title = ElementBuilder::new("div")?
        .class("delivery-title")
        .child(
            ElementBuilder::new("span")?
                .class("badge badge--outline")
                .text(&format!("Stop #{}", delivery.sequence_number))
                .build(),
        )?
        .child(ElementBuilder::new("span")?.class("delivery-order").text(&delivery.order_id).build())?;
    if completed {
        title = title.child(
            ElementBuilder::new("span")?
                .class("badge badge--success")
                .text("Completed")
                .build(),
        )?;
    }

    let mut footer = ElementBuilder::new("div")?
        .class("delivery-footer")
        .child(
            ElementBuilder::new("span")?
                .class("delivery-meta")
                .text(&format!("📦 {} packages", delivery.packages))
                .build(),
        )?
        .child(ElementBuilder::new("span")?.class("delivery-meta").text(&format!("🕒 {}", delivery.time)).build())?;

    if !completed {
        let driver = driver.clone();
        let delivery_id = delivery.id.clone();
        footer = footer.child(
            ElementBuilder::new("button")?
                .class("button button--outline button--small")
                .attr("type", "button")?
                .text("Complete")
                .on_click(move |_| {
                    if driver.complete(&delivery_id) {
                        refresh_delivery_panel(&driver);
                        spawn_local(refresh_geometry(driver.clone()));
                    }
                })?
                .build(),
        )?;
    }

    Ok(ElementBuilder::new("div")?
        .class(if completed { "delivery-card delivery-card--completed" } else { "delivery-card" })
        .child(title.build())?
        .child(ElementBuilder::new("p")?.class("delivery-address").text(&format!("📍 {}", delivery.address)).build())?
        .child(footer.build())?
        .build())
}

async fn refresh_geometry(driver: Rc<Driver>) {
    if CONFIG.mapbox_token().is_none() {
        return;
    }
    driver.refresh_geometry().await;
}

// ============================================================================
// DASHBOARD VIEW - Tarjetas de métricas del manager
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{get_element_by_id, replace_children, ElementBuilder};
use crate::services::ApiClient;
use crate::viewmodels::DashboardMetrics;

const METRICS_ID: &str = "dashboard-metrics";

/// Renderizar página de inicio. Las métricas se rellenan cuando llega la API.
pub fn render_dashboard() -> Result<Element, JsValue> {
    let header = ElementBuilder::new("div")?
        .class("page-header")
        .child(ElementBuilder::new("h1")?.class("page-title").text("Dashboard").build())?
        .child(
            ElementBuilder::new("p")?
                .class("page-subtitle")
                .text("Monitor your fleet performance and delivery metrics")
                .build(),
        )?
        .build();

    let metrics = ElementBuilder::new("div")?
        .class("metrics-grid")
        .id(METRICS_ID)
        .child(render_metric_cards(&DashboardMetrics::default())?)?
        .build();

    let page = ElementBuilder::new("div")?
        .class("page dashboard-page")
        .child(header)?
        .child(metrics)?
        .build();

    Ok(page)
}

/// Pide pedidos y vehículos y repinta las tarjetas
pub fn mount_dashboard() {
    spawn_local(async {
        let api = ApiClient::new();
        let orders = api.fetch_orders().await;
        let vehicles = api.fetch_vehicles().await;
        let metrics = DashboardMetrics::compute(&orders, &vehicles);
        log::info!("📊 Dashboard: {} vehículos, {} pedidos", metrics.total_vehicles, metrics.total_orders);

        // La página pudo cambiar mientras llegaban los datos
        let Some(container) = get_element_by_id(METRICS_ID) else {
            return;
        };
        let result = render_metric_cards(&metrics).and_then(|cards| replace_children(&container, &cards));
        if let Err(e) = result {
            log::error!("❌ Error pintando métricas: {:?}", e);
        }
    });
}

fn render_metric_cards(metrics: &DashboardMetrics) -> Result<Element, JsValue> {
    let cards = [
        (
            "Total Vehicles",
            metrics.total_vehicles.to_string(),
            format!("{} electric vehicles", metrics.electric_vehicles),
            "metric-card metric-card--default",
        ),
        (
            "Pending Orders",
            metrics.total_orders.to_string(),
            format!("{} express deliveries", metrics.express_orders),
            "metric-card metric-card--success",
        ),
        (
            "Avg. Emissions",
            format!("{} g CO₂/km", metrics.avg_emissions),
            format!("{}% electric fleet", metrics.electric_percentage),
            "metric-card metric-card--info",
        ),
        (
            "Fleet Capacity",
            format!("{:.1}t", metrics.total_capacity_t),
            "Total capacity available".to_string(),
            "metric-card metric-card--warning",
        ),
    ];

    let mut elements = Vec::with_capacity(cards.len());
    for (title, value, change, class) in cards {
        let card = ElementBuilder::new("div")?
            .class(class)
            .child(ElementBuilder::new("p")?.class("metric-title").text(title).build())?
            .child(ElementBuilder::new("p")?.class("metric-value").text(&value).build())?
            .child(ElementBuilder::new("p")?.class("metric-change").text(&change).build())?
            .build();
        elements.push(card);
    }

    Ok(ElementBuilder::new("div")?.class("metrics-row").children(elements)?.build())
}

// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP (Stateless)
// ============================================================================
// Los fallos de /orders/ y /vehicles/ se degradan a lista vacía y se loguean
// ============================================================================

use gloo_net::http::Request;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::CONFIG;
use crate::models::{Order, Vehicle};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {status_text}")]
    Http { status: u16, status_text: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Cliente API - SOLO comunicación HTTP (stateless)
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    pub fn new() -> Self {
        Self::with_base_url(CONFIG.backend_url())
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Listar pedidos (vacío si falla)
    pub async fn fetch_orders(&self) -> Vec<Order> {
        match self.get_json::<Vec<Order>>(&self.url("/orders/")).await {
            Ok(orders) => {
                log::info!("📦 {} pedidos recibidos", orders.len());
                orders
            }
            Err(e) => {
                log::error!("❌ Error fetching orders: {}", e);
                Vec::new()
            }
        }
    }

    /// Listar vehículos (vacío si falla)
    pub async fn fetch_vehicles(&self) -> Vec<Vehicle> {
        match self.get_json::<Vec<Vehicle>>(&self.url("/vehicles/")).await {
            Ok(vehicles) => {
                log::info!("🚚 {} vehículos recibidos", vehicles.len());
                vehicles
            }
            Err(e) => {
                log::error!("❌ Error fetching vehicles: {}", e);
                Vec::new()
            }
        }
    }

    /// Descargar un asset estático (CSV) servido junto al bundle
    pub async fn fetch_asset_text(&self, path: &str) -> Result<String, ApiError> {
        let response = Request::get(path)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if !response.ok() {
            return Err(ApiError::Http {
                status: response.status(),
                status_text: response.status_text(),
            });
        }
        response
            .text()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = Request::get(url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if !response.ok() {
            return Err(ApiError::Http {
                status: response.status(),
                status_text: response.status_text(),
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

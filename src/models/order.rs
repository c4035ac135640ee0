use serde::{Deserialize, Serialize};

/// Pedido tal como lo devuelve `GET /orders/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub weight: f64,
    pub priority: String,
    pub window_start: String,
    pub window_end: String,
    pub street: String,
    pub house_number: String,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    pub status: String,
}

impl Order {
    /// Coordenadas `[lng, lat]` si el pedido está geocodificado (0.0 cuenta como ausente)
    pub fn coordinates(&self) -> Option<[f64; 2]> {
        match (self.longitude, self.latitude) {
            (Some(lng), Some(lat)) if lng != 0.0 && lat != 0.0 => Some([lng, lat]),
            _ => None,
        }
    }

    pub fn is_express(&self) -> bool {
        self.priority == "express"
    }
}

use serde::{Deserialize, Serialize};

use crate::models::LngLat;

/// Valor que trae el `.env.example`; se trata igual que un token vacío
pub const PLACEHOLDER_MAPBOX_TOKEN: &str = "your_mapbox_public_token_here";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend_url: String,
    pub enable_logging: bool,
    pub mapbox_access_token: String,
    pub map_config: MapConfig,
    pub assets: AssetConfig,
    pub driver_id: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000".to_string(),
            enable_logging: true,
            mapbox_access_token: String::new(),
            map_config: MapConfig::default(),
            assets: AssetConfig::default(),
            driver_id: "V001".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub depot_lat: f64,
    pub depot_lng: f64,
    pub planner_zoom: f64,
    pub driver_zoom: f64,
    pub planner_style: String,
    pub driver_style: String,
    pub directions_base_url: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            // Depósito de Ljubljana
            depot_lat: 46.0506713158607,
            depot_lng: 14.459560361232214,
            planner_zoom: 12.0,
            driver_zoom: 11.0,
            planner_style: "mapbox://styles/mapbox/streets-v12".to_string(),
            driver_style: "mapbox://styles/mapbox/navigation-day-v1".to_string(),
            directions_base_url: "https://api.mapbox.com/directions/v5/mapbox/driving".to_string(),
        }
    }
}

impl MapConfig {
    pub fn depot(&self) -> LngLat {
        [self.depot_lng, self.depot_lat]
    }
}

/// Rutas de los CSV estáticos servidos junto al bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    pub routes_csv_path: String,
    pub vehicles_csv_path: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            routes_csv_path: "/routes_solution.csv".to_string(),
            vehicles_csv_path: "/delivery_vehicles.csv".to_string(),
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let map_defaults = MapConfig::default();
        Self {
            backend_url: option_env!("BACKEND_URL")
                .map(str::to_string)
                .unwrap_or(defaults.backend_url),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true").parse().unwrap_or(true),
            mapbox_access_token: option_env!("MAPBOX_ACCESS_TOKEN")
                .unwrap_or("").to_string(),
            map_config: MapConfig {
                depot_lat: option_env!("DEPOT_LAT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(map_defaults.depot_lat),
                depot_lng: option_env!("DEPOT_LNG")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(map_defaults.depot_lng),
                directions_base_url: option_env!("DIRECTIONS_BASE_URL")
                    .map(str::to_string)
                    .unwrap_or(map_defaults.directions_base_url.clone()),
                ..map_defaults
            },
            assets: AssetConfig {
                routes_csv_path: option_env!("ROUTES_CSV_PATH")
                    .unwrap_or("/routes_solution.csv").to_string(),
                vehicles_csv_path: option_env!("VEHICLES_CSV_PATH")
                    .unwrap_or("/delivery_vehicles.csv").to_string(),
            },
            driver_id: option_env!("DRIVER_ID")
                .map(str::to_string)
                .unwrap_or(defaults.driver_id),
        }
    }

    pub fn backend_url(&self) -> &str {
        self.backend_url.trim_end_matches('/')
    }

    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }

    /// Token de Mapbox utilizable, o None si falta o es el placeholder
    pub fn mapbox_token(&self) -> Option<&str> {
        let token = self.mapbox_access_token.trim();
        if token.is_empty() || token == PLACEHOLDER_MAPBOX_TOKEN {
            None
        } else {
            Some(token)
        }
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_token(token: &str) -> AppConfig {
        AppConfig {
            mapbox_access_token: token.to_string(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn empty_or_placeholder_token_is_rejected() {
        assert_eq!(with_token("").mapbox_token(), None);
        assert_eq!(with_token("   ").mapbox_token(), None);
        assert_eq!(with_token(PLACEHOLDER_MAPBOX_TOKEN).mapbox_token(), None);
    }

    #[test]
    fn real_token_is_trimmed() {
        assert_eq!(with_token(" pk.abc123 ").mapbox_token(), Some("pk.abc123"));
    }

    #[test]
    fn backend_url_drops_trailing_slash() {
        let config = AppConfig {
            backend_url: "http://localhost:8000/".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.backend_url(), "http://localhost:8000");
    }

    #[test]
    fn depot_is_lng_lat() {
        let depot = MapConfig::default().depot();
        assert!((depot[0] - 14.4595).abs() < 1e-3);
        assert!((depot[1] - 46.0506).abs() < 1e-3);
    }
}

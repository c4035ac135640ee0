// ============================================================================
// MAP TRAITS - Frontera entre la lógica de capas y Mapbox GL JS
// ============================================================================
// Los controladores de capas solo hablan con `MapRenderer`. En el navegador lo
// implementa `web::WebMapRenderer`; en los tests, un renderer que graba llamadas.
// ============================================================================

use geojson::FeatureCollection;
use serde_json::{json, Value};
use thiserror::Error;

use crate::models::{Bounds, LngLat};

/// Error del mapa
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    #[error("Map is not ready")]
    NotReady,
    #[error("Mapbox token missing or placeholder")]
    MissingToken,
    #[error("Container '{0}' not found")]
    ContainerNotFound(String),
    #[error("Unknown source '{0}'")]
    UnknownSource(String),
    #[error("JS error: {0}")]
    Js(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Line,
    Circle,
    Symbol,
}

impl LayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Line => "line",
            LayerKind::Circle => "circle",
            LayerKind::Symbol => "symbol",
        }
    }
}

/// Definición de una capa de estilo
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    pub id: &'static str,
    pub kind: LayerKind,
    pub source: &'static str,
    pub layout: Value,
    pub paint: Value,
}

impl LayerSpec {
    /// Objeto que espera `map.addLayer`
    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "type": self.kind.as_str(),
            "source": self.source,
            "layout": self.layout,
            "paint": self.paint,
        })
    }
}

/// Marcador fijo (depósito)
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub position: LngLat,
    pub color: String,
    pub popup_html: Option<String>,
}

/// Qué popup abre un click sobre una capa
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PopupKind {
    Route,
    Stop,
    Delivery,
}

/// Trait común para renderizadores de mapas
pub trait MapRenderer {
    /// true cuando el estilo terminó de cargar y se pueden añadir fuentes
    fn is_style_loaded(&self) -> bool;

    fn add_navigation_control(&mut self) -> Result<(), MapError>;

    fn add_geolocate_control(&mut self) -> Result<(), MapError>;

    fn add_marker(&mut self, marker: &MarkerSpec) -> Result<(), MapError>;

    fn has_source(&self, id: &str) -> bool;

    fn add_geojson_source(&mut self, id: &str, data: &FeatureCollection) -> Result<(), MapError>;

    /// Reemplaza los datos de una fuente existente
    fn set_source_data(&mut self, id: &str, data: &FeatureCollection) -> Result<(), MapError>;

    fn has_layer(&self, id: &str) -> bool;

    fn add_layer(&mut self, spec: &LayerSpec) -> Result<(), MapError>;

    fn set_paint_property(&mut self, layer_id: &str, name: &str, value: &Value) -> Result<(), MapError>;

    fn fit_bounds(&mut self, bounds: &Bounds, padding: f64, max_zoom: f64) -> Result<(), MapError>;

    /// Popup al hacer click y cursor de puntero al pasar por encima
    fn bind_popup(&mut self, layer_id: &str, kind: PopupKind) -> Result<(), MapError>;

    /// Libera el mapa y sus listeners
    fn remove(&mut self);

    /// Crea la fuente o, si ya existe, solo reemplaza sus datos
    fn upsert_source(&mut self, id: &str, data: &FeatureCollection) -> Result<(), MapError> {
        if self.has_source(id) {
            self.set_source_data(id, data)
        } else {
            self.add_geojson_source(id, data)
        }
    }

    /// Añade la capa si falta. Devuelve true si la ha creado.
    fn ensure_layer(&mut self, spec: &LayerSpec) -> Result<bool, MapError> {
        if self.has_layer(spec.id) {
            return Ok(false);
        }
        self.add_layer(spec)?;
        Ok(true)
    }
}

//! Renderer que graba cada llamada, para probar las capas sin navegador.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use geojson::FeatureCollection;
use serde_json::Value;

use super::traits::{LayerSpec, MapError, MapRenderer, MarkerSpec, PopupKind};
use crate::models::Bounds;

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub style_loaded: bool,
    pub calls: Vec<String>,
    pub sources: HashMap<String, FeatureCollection>,
    pub layers: Vec<String>,
    pub paint: HashMap<(String, String), Value>,
    pub markers: Vec<MarkerSpec>,
    pub popups: HashSet<(String, PopupKind)>,
    pub fitted: Vec<Bounds>,
    /// Compartido entre instancias: cuenta los `remove()` aunque el renderer ya no exista
    pub removals: Rc<Cell<usize>>,
}

impl RecordingRenderer {
    pub fn loaded() -> Self {
        Self {
            style_loaded: true,
            ..Self::default()
        }
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls.iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn paint_of(&self, layer: &str, name: &str) -> Option<&Value> {
        self.paint.get(&(layer.to_string(), name.to_string()))
    }
}

impl MapRenderer for RecordingRenderer {
    fn is_style_loaded(&self) -> bool {
        self.style_loaded
    }

    fn add_navigation_control(&mut self) -> Result<(), MapError> {
        self.calls.push("add_navigation_control".into());
        Ok(())
    }

    fn add_geolocate_control(&mut self) -> Result<(), MapError> {
        self.calls.push("add_geolocate_control".into());
        Ok(())
    }

    fn add_marker(&mut self, marker: &MarkerSpec) -> Result<(), MapError> {
        self.calls.push("add_marker".into());
        self.markers.push(marker.clone());
        Ok(())
    }

    fn has_source(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    fn add_geojson_source(&mut self, id: &str, data: &FeatureCollection) -> Result<(), MapError> {
        self.calls.push(format!("add_source:{}", id));
        self.sources.insert(id.to_string(), data.clone());
        Ok(())
    }

    fn set_source_data(&mut self, id: &str, data: &FeatureCollection) -> Result<(), MapError> {
        self.calls.push(format!("set_data:{}", id));
        match self.sources.get_mut(id) {
            Some(existing) => {
                *existing = data.clone();
                Ok(())
            }
            None => Err(MapError::UnknownSource(id.to_string())),
        }
    }

    fn has_layer(&self, id: &str) -> bool {
        self.layers.iter().any(|l| l == id)
    }

    fn add_layer(&mut self, spec: &LayerSpec) -> Result<(), MapError> {
        self.calls.push(format!("add_layer:{}", spec.id));
        self.layers.push(spec.id.to_string());
        Ok(())
    }

    fn set_paint_property(&mut self, layer_id: &str, name: &str, value: &Value) -> Result<(), MapError> {
        self.calls.push(format!("paint:{}:{}", layer_id, name));
        self.paint
            .insert((layer_id.to_string(), name.to_string()), value.clone());
        Ok(())
    }

    fn fit_bounds(&mut self, bounds: &Bounds, padding: f64, max_zoom: f64) -> Result<(), MapError> {
        self.calls.push(format!("fit_bounds:{}:{}", padding, max_zoom));
        self.fitted.push(*bounds);
        Ok(())
    }

    fn bind_popup(&mut self, layer_id: &str, kind: PopupKind) -> Result<(), MapError> {
        self.calls.push(format!("bind_popup:{}", layer_id));
        self.popups.insert((layer_id.to_string(), kind));
        Ok(())
    }

    fn remove(&mut self) {
        self.calls.push("remove".into());
        self.removals.set(self.removals.get() + 1);
    }
}

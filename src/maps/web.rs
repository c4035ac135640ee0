// ============================================================================
// WEB MAP RENDERER - `MapRenderer` sobre Mapbox GL JS
// ============================================================================
// Guarda los closures de los listeners: viven lo mismo que el mapa y se sueltan
// en `remove()`.
// ============================================================================

use geojson::FeatureCollection;
use js_sys::{Array, Reflect};
use serde::Serialize;
use serde_json::{json, Map as JsonMap, Value};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::popups::popup_html;
use super::traits::{LayerSpec, MapError, MapRenderer, MarkerSpec, PopupKind};
use crate::models::{Bounds, LngLat};
use crate::utils::mapbox_ffi::{
    self, GeoJSONSource, GeolocateControl, Map, Marker, NavigationControl, Popup,
};

type Listener = Closure<dyn FnMut(JsValue)>;

#[derive(Serialize)]
struct GeoJsonSource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    data: &'a FeatureCollection,
}

/// Opciones de creación del mapa
#[derive(Debug, Clone)]
pub struct MapOptions<'a> {
    pub container_id: &'a str,
    pub style: &'a str,
    pub center: LngLat,
    pub zoom: f64,
    pub access_token: &'a str,
}

/// Renderizador de mapas para web usando Mapbox GL JS
pub struct WebMapRenderer {
    map: Map,
    markers: Vec<Marker>,
    listeners: Vec<Listener>,
    removed: bool,
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, MapError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| MapError::Js(e.to_string()))
}

fn js_error(error: JsValue) -> MapError {
    MapError::Js(error.as_string().unwrap_or_else(|| format!("{:?}", error)))
}

fn get(target: &JsValue, key: &str) -> JsValue {
    Reflect::get(target, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

impl WebMapRenderer {
    /// Crea el mapa. `on_load` se llama en `load` y en cada `idle`, para vaciar lo
    /// que se encoló mientras el estilo recargaba.
    pub fn new(options: &MapOptions<'_>, on_load: impl FnMut() + 'static) -> Result<Self, MapError> {
        if !mapbox_ffi::mapbox_available() {
            return Err(MapError::Js("mapboxgl no está cargado".to_string()));
        }
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or(MapError::NotReady)?;
        if document.get_element_by_id(options.container_id).is_none() {
            return Err(MapError::ContainerNotFound(options.container_id.to_string()));
        }

        mapbox_ffi::set_access_token(options.access_token).map_err(js_error)?;
        let map = Map::new(&to_js(&json!({
            "container": options.container_id,
            "style": options.style,
            "center": options.center,
            "zoom": options.zoom,
        }))?)
        .map_err(js_error)?;

        let mut on_load = on_load;
        let load_listener: Listener = Closure::wrap(Box::new(move |_event: JsValue| on_load()) as Box<dyn FnMut(JsValue)>);
        map.on("load", &load_listener);
        map.on("idle", &load_listener);

        log::info!("🗺️ Mapbox GL JS creado en #{}", options.container_id);
        Ok(Self {
            map,
            markers: Vec::new(),
            listeners: vec![load_listener],
            removed: false,
        })
    }

    pub fn resize(&self) {
        self.map.resize();
    }

    fn set_cursor(map: &Map, cursor: &str) {
        let _ = map.get_canvas().style().set_property("cursor", cursor);
    }

    fn show_feature_popup(map: &Map, kind: PopupKind, event: &JsValue) {
        let feature = match get(event, "features").dyn_into::<Array>() {
            Ok(features) if features.length() > 0 => features.get(0),
            _ => return,
        };
        let props: JsonMap<String, Value> =
            serde_wasm_bindgen::from_value(get(&feature, "properties")).unwrap_or_default();
        let position = match kind {
            // En una línea el popup va donde se hizo click
            PopupKind::Route => get(event, "lngLat"),
            PopupKind::Stop | PopupKind::Delivery => get(&get(&feature, "geometry"), "coordinates"),
        };
        Popup::new()
            .set_lng_lat(&position)
            .set_html(&popup_html(kind, &props))
            .add_to(map);
    }
}

impl MapRenderer for WebMapRenderer {
    fn is_style_loaded(&self) -> bool {
        !self.removed && self.map.is_style_loaded()
    }

    fn add_navigation_control(&mut self) -> Result<(), MapError> {
        self.map.add_control(&NavigationControl::new(), "top-right");
        Ok(())
    }

    fn add_geolocate_control(&mut self) -> Result<(), MapError> {
        let control = GeolocateControl::new(&to_js(&json!({
            "positionOptions": { "enableHighAccuracy": true },
            "trackUserLocation": true,
        }))?);
        self.map.add_control(&control, "top-right");
        Ok(())
    }

    fn add_marker(&mut self, spec: &MarkerSpec) -> Result<(), MapError> {
        let marker = Marker::new(&to_js(&json!({ "color": spec.color }))?)
            .set_lng_lat(&to_js(&spec.position)?);
        if let Some(html) = &spec.popup_html {
            marker.set_popup(&Popup::new().set_html(html));
        }
        self.markers.push(marker.add_to(&self.map));
        Ok(())
    }

    fn has_source(&self, id: &str) -> bool {
        !self.map.get_source(id).is_undefined()
    }

    fn add_geojson_source(&mut self, id: &str, data: &FeatureCollection) -> Result<(), MapError> {
        let source = to_js(&GeoJsonSource { kind: "geojson", data })?;
        self.map.add_source(id, &source).map_err(js_error)
    }

    fn set_source_data(&mut self, id: &str, data: &FeatureCollection) -> Result<(), MapError> {
        let source = self.map.get_source(id);
        if source.is_undefined() {
            return Err(MapError::UnknownSource(id.to_string()));
        }
        source.unchecked_into::<GeoJSONSource>().set_data(&to_js(data)?);
        Ok(())
    }

    fn has_layer(&self, id: &str) -> bool {
        !self.map.get_layer(id).is_undefined()
    }

    fn add_layer(&mut self, spec: &LayerSpec) -> Result<(), MapError> {
        self.map.add_layer(&to_js(&spec.to_json())?).map_err(js_error)
    }

    fn set_paint_property(&mut self, layer_id: &str, name: &str, value: &Value) -> Result<(), MapError> {
        self.map
            .set_paint_property(layer_id, name, &to_js(value)?)
            .map_err(js_error)
    }

    fn fit_bounds(&mut self, bounds: &Bounds, padding: f64, max_zoom: f64) -> Result<(), MapError> {
        let options = to_js(&json!({ "padding": padding, "maxZoom": max_zoom }))?;
        self.map
            .fit_bounds(&to_js(&bounds.to_array())?, &options)
            .map_err(js_error)
    }

    fn bind_popup(&mut self, layer_id: &str, kind: PopupKind) -> Result<(), MapError> {
        let map = self.map.clone();
        let click: Listener = Closure::wrap(Box::new(move |event: JsValue| {
            Self::show_feature_popup(&map, kind, &event);
        }) as Box<dyn FnMut(JsValue)>);

        let map = self.map.clone();
        let enter: Listener = Closure::wrap(Box::new(move |_event: JsValue| {
            Self::set_cursor(&map, "pointer");
        }) as Box<dyn FnMut(JsValue)>);

        let map = self.map.clone();
        let leave: Listener = Closure::wrap(Box::new(move |_event: JsValue| {
            Self::set_cursor(&map, "");
        }) as Box<dyn FnMut(JsValue)>);

        self.map.on_layer("click", layer_id, &click);
        self.map.on_layer("mouseenter", layer_id, &enter);
        self.map.on_layer("mouseleave", layer_id, &leave);
        self.listeners.extend([click, enter, leave]);
        Ok(())
    }

    fn remove(&mut self) {
        if self.removed {
            return;
        }
        for marker in self.markers.drain(..) {
            marker.remove();
        }
        self.map.remove();
        self.listeners.clear();
        self.removed = true;
    }
}

impl Drop for WebMapRenderer {
    fn drop(&mut self) {
        self.remove();
    }
}

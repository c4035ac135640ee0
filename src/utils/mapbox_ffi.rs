// ============================================================================
// MAPBOX FFI - Foreign Function Interface para Mapbox GL JS
// ============================================================================
// Solo bindings - Sin estado, sin lógica. `mapboxgl` lo carga index.html.
// ============================================================================

use js_sys::Reflect;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mapboxgl)]
    #[derive(Clone)]
    pub type Map;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, catch)]
    pub fn new(options: &JsValue) -> Result<Map, JsValue>;

    #[wasm_bindgen(method, js_name = isStyleLoaded)]
    pub fn is_style_loaded(this: &Map) -> bool;

    #[wasm_bindgen(method, js_name = addControl)]
    pub fn add_control(this: &Map, control: &JsValue, position: &str);

    #[wasm_bindgen(method, js_name = getSource)]
    pub fn get_source(this: &Map, id: &str) -> JsValue;

    #[wasm_bindgen(method, catch, js_name = addSource)]
    pub fn add_source(this: &Map, id: &str, source: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = getLayer)]
    pub fn get_layer(this: &Map, id: &str) -> JsValue;

    #[wasm_bindgen(method, catch, js_name = addLayer)]
    pub fn add_layer(this: &Map, layer: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = setPaintProperty)]
    pub fn set_paint_property(this: &Map, layer: &str, name: &str, value: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = fitBounds)]
    pub fn fit_bounds(this: &Map, bounds: &JsValue, options: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method)]
    pub fn on(this: &Map, event: &str, handler: &Closure<dyn FnMut(JsValue)>);

    #[wasm_bindgen(method, js_name = on)]
    pub fn on_layer(this: &Map, event: &str, layer: &str, handler: &Closure<dyn FnMut(JsValue)>);

    #[wasm_bindgen(method, js_name = getCanvas)]
    pub fn get_canvas(this: &Map) -> web_sys::HtmlElement;

    #[wasm_bindgen(method)]
    pub fn resize(this: &Map);

    #[wasm_bindgen(method)]
    pub fn remove(this: &Map);

    pub type GeoJSONSource;

    #[wasm_bindgen(method, js_name = setData)]
    pub fn set_data(this: &GeoJSONSource, data: &JsValue);

    #[wasm_bindgen(js_namespace = mapboxgl)]
    pub type NavigationControl;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl)]
    pub fn new() -> NavigationControl;

    #[wasm_bindgen(js_namespace = mapboxgl)]
    pub type GeolocateControl;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl)]
    pub fn new(options: &JsValue) -> GeolocateControl;

    #[wasm_bindgen(js_namespace = mapboxgl)]
    pub type Marker;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl)]
    pub fn new(options: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = setLngLat)]
    pub fn set_lng_lat(this: &Marker, lng_lat: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = setPopup)]
    pub fn set_popup(this: &Marker, popup: &Popup) -> Marker;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &Marker, map: &Map) -> Marker;

    #[wasm_bindgen(method)]
    pub fn remove(this: &Marker);

    #[wasm_bindgen(js_namespace = mapboxgl)]
    pub type Popup;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl)]
    pub fn new() -> Popup;

    #[wasm_bindgen(method, js_name = setLngLat)]
    pub fn set_lng_lat(this: &Popup, lng_lat: &JsValue) -> Popup;

    #[wasm_bindgen(method, js_name = setHTML)]
    pub fn set_html(this: &Popup, html: &str) -> Popup;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &Popup, map: &Map) -> Popup;
}

/// true si la página cargó el script de Mapbox GL JS
pub fn mapbox_available() -> bool {
    Reflect::get(&js_sys::global(), &JsValue::from_str("mapboxgl"))
        .map(|value| !value.is_undefined())
        .unwrap_or(false)
}

/// `mapboxgl.accessToken = token`
pub fn set_access_token(token: &str) -> Result<(), JsValue> {
    let mapboxgl = Reflect::get(&js_sys::global(), &JsValue::from_str("mapboxgl"))?;
    Reflect::set(&mapboxgl, &JsValue::from_str("accessToken"), &JsValue::from_str(token))?;
    Ok(())
}

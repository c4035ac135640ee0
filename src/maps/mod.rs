// Capa de mapas: lógica de capas independiente de la plataforma + Mapbox GL JS en web

pub mod traits;
pub mod layers;
pub mod paint;
pub mod popups;
pub mod sources;
pub mod route_layer;
pub mod driver_layer;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
pub(crate) mod testing;

pub use driver_layer::DriverLayer;
pub use route_layer::RouteLayer;
pub use traits::{LayerKind, LayerSpec, MapError, MapRenderer, MarkerSpec, PopupKind};

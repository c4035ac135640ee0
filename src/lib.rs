// ============================================================================
// OPTIPOT DASHBOARD - FRONTEND MVVM (RUST + WASM)
// ============================================================================
// Arquitectura:
// - Views: Funciones que renderizan DOM (sin lógica)
// - ViewModels: Estado + Lógica UI
// - Maps: Capas de Mapbox detrás del trait MapRenderer
// - Services: API del backend, CSV y Directions
// - State: State Management con Rc<RefCell>
// - Models: Estructuras compartidas con backend
// ============================================================================

pub mod config;
pub mod maps;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
pub mod viewmodels;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod views;

#[cfg(target_arch = "wasm32")]
pub use web::*;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;
    use wasm_logger::Config;

    use crate::app::App;
    use crate::config::CONFIG;
    use crate::dom::{location_hash, on_window_event};
    use crate::state::path_from_hash;

    // Variable estática global para mantener la instancia de App
    thread_local! {
        static APP: RefCell<Option<App>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        // Inicializar panic hook para mejor debugging
        console_error_panic_hook::set_once();

        if CONFIG.is_logging_enabled() {
            wasm_logger::init(Config::default());
        }
        log::info!("🚀 OptiPot Dashboard - Rust + MVVM");

        let mut app = App::new()?;
        app.render()?;

        APP.with(|app_cell| {
            *app_cell.borrow_mut() = Some(app);
        });

        // Navegación por hash. Listener global: se registra UNA sola vez aquí.
        on_window_event("hashchange", |_event| {
            let path = path_from_hash(&location_hash());
            log::info!("🧭 Navegando a {}", path);
            // navigate notifica si cambia la página; el subscriber re-renderiza
            APP.with(|app_cell| {
                if let Some(app) = app_cell.borrow().as_ref() {
                    app.state().navigate(&path);
                }
            });
        })?;

        Ok(())
    }

    /// Re-render completo de la app
    pub fn rerender_app() {
        APP.with(|app_cell| {
            if let Some(app) = app_cell.borrow_mut().as_mut() {
                if let Err(e) = app.render() {
                    log::error!("❌ Error re-renderizando: {:?}", e);
                }
            } else {
                log::warn!("⚠️ [RERENDER] App no está inicializada");
            }
        });
    }

    /// Re-render llamable desde JavaScript
    #[wasm_bindgen]
    pub fn rerender_app_wasm() {
        rerender_app();
    }
}

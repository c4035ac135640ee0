// ============================================================================
// APP - Aplicación principal
// ============================================================================
// Dueña del estado y de los dos controladores de mapa. Cada render reconstruye
// el DOM, así que antes suelta los mapas (sus contenedores desaparecen) y
// después vuelve a montar el de la página actual.
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::config::CONFIG;
use crate::dom::{get_element_by_id, location_hash, replace_children};
use crate::models::{Role, SessionContext};
use crate::services::MapboxDirections;
use crate::state::{path_from_hash, AppState};
use crate::utils::APP_ROOT_ID;
use crate::viewmodels::{DriverViewModel, RoutePlannerViewModel};
use crate::views::route_legend::refresh_route_legend;
use crate::views::route_map::refresh_map_badges;
use crate::views::route_planner::spawn_geometry_refresh;
use crate::views::{mount_current_page, render_app, ViewContext};

/// Aplicación principal
pub struct App {
    ctx: ViewContext,
    root: Element,
}

impl App {
    /// Crear nueva aplicación
    pub fn new() -> Result<Self, JsValue> {
        let root = get_element_by_id(APP_ROOT_ID)
            .ok_or_else(|| JsValue::from_str("No #app element found"))?;

        let session = SessionContext::new(Role::Manager, &CONFIG.driver_id);
        let state = AppState::new(session);
        state.navigate(&path_from_hash(&location_hash()));

        let directions = MapboxDirections::new(CONFIG.mapbox_token().unwrap_or_default());
        let ctx = ViewContext {
            state: state.clone(),
            planner: Rc::new(RoutePlannerViewModel::new(directions.clone())),
            driver: Rc::new(DriverViewModel::new(
                &CONFIG.driver_id,
                CONFIG.map_config.depot(),
                directions,
            )),
            fleet_requested: Rc::new(Cell::new(false)),
            orders_requested: Rc::new(Cell::new(false)),
        };

        // Filtros aplicados → mapa del planificador
        {
            let planner = ctx.planner.clone();
            let filters = state.filters.clone();
            state.filters.subscribe(move || {
                let applied = filters.snapshot();
                let refetch = planner.apply_preferences(applied.route_preferences());
                if refetch {
                    log::info!("🔁 Preferencias de ruta cambiaron, pidiendo geometría nueva");
                    spawn_geometry_refresh(planner.clone());
                }
                refresh_route_legend(&planner);
                refresh_map_badges(&applied);
            });
        }

        // Suscribirse a cambios de página para re-renderizar
        state.subscribe_to_changes(move || {
            // Usar gloo_timers para batchear múltiples updates
            Timeout::new(0, move || {
                crate::rerender_app();
            })
            .forget();
        });

        Ok(Self { ctx, root })
    }

    pub fn state(&self) -> &AppState {
        &self.ctx.state
    }

    /// Renderizar aplicación
    pub fn render(&mut self) -> Result<(), JsValue> {
        log::info!("🎬 [APP] Render de {}", self.ctx.state.page().title());

        // Los contenedores de mapa se van a destruir
        self.ctx.planner.detach_map();
        self.ctx.driver.detach_map();

        let view = render_app(&self.ctx)?;
        replace_children(&self.root, &view)?;

        mount_current_page(&self.ctx);
        Ok(())
    }
}

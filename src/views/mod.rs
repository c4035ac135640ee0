// ============================================================================
// VIEWS - Funciones que construyen DOM (sin lógica de negocio)
// ============================================================================
// Cada página tiene un `render_xxx` que devuelve el árbol y, si tiene mapa, un
// `mount_xxx` que se llama cuando el árbol ya está en el documento.
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use crate::maps::web::WebMapRenderer;
use crate::services::MapboxDirections;
use crate::state::AppState;
use crate::viewmodels::{DriverViewModel, RoutePlannerViewModel};

pub mod app;
pub mod dashboard;
pub mod driver_view;
pub mod filter_panel;
pub mod navbar;
pub mod not_found;
pub mod route_legend;
pub mod route_map;
pub mod route_planner;

pub use app::{mount_current_page, render_app};

pub type Planner = RoutePlannerViewModel<WebMapRenderer, MapboxDirections>;
pub type Driver = DriverViewModel<WebMapRenderer, MapboxDirections>;

/// Lo que necesitan las vistas: estado compartido y los dos controladores de mapa
#[derive(Clone)]
pub struct ViewContext {
    pub state: AppState,
    pub planner: Rc<Planner>,
    pub driver: Rc<Driver>,
    /// Los CSV de la flota ya se pidieron
    pub fleet_requested: Rc<Cell<bool>>,
    /// Los pedidos del conductor ya se pidieron
    pub orders_requested: Rc<Cell<bool>>,
}

// ============================================================================
// STATE MODULE - State Management con Rc<RefCell> + notificaciones
// ============================================================================

pub mod reactivity;
pub mod navigation;
pub mod app_state;

pub use reactivity::*;
pub use navigation::*;
pub use app_state::*;

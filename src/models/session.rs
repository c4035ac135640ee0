// ============================================================================
// SESSION - Contexto de rol (manager / conductor)
// ============================================================================
// Se pasa explícitamente a las vistas; no hay estado global ni persistencia
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    Manager,
    Driver,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Manager => "Manager",
            Role::Driver => "Driver",
        }
    }
}

/// Contexto de sesión compartido entre vistas
#[derive(Clone)]
pub struct SessionContext {
    role: Rc<Cell<Role>>,
    driver_id: Rc<RefCell<String>>,
}

impl SessionContext {
    pub fn new(role: Role, driver_id: &str) -> Self {
        Self {
            role: Rc::new(Cell::new(role)),
            driver_id: Rc::new(RefCell::new(driver_id.to_string())),
        }
    }

    pub fn role(&self) -> Role {
        self.role.get()
    }

    /// Devuelve true si el rol cambió
    pub fn set_role(&self, role: Role) -> bool {
        let changed = self.role.get() != role;
        self.role.set(role);
        changed
    }

    pub fn driver_id(&self) -> String {
        self.driver_id.borrow().clone()
    }
}

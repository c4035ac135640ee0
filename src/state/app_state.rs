// ============================================================================
// APP STATE - Estado global de la aplicación
// ============================================================================
// Sesión (rol), filtros del planificador y página actual. Se clona barato: todo
// vive detrás de Rc.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::models::{Role, RouteFilters, SessionContext};
use crate::state::navigation::Page;
use crate::state::reactivity::ReactiveState;

#[derive(Clone)]
pub struct AppState {
    pub session: SessionContext,
    pub filters: ReactiveState<RouteFilters>,
    page: Rc<Cell<Page>>,
    path: Rc<RefCell<String>>,
    change_subscribers: Rc<RefCell<Vec<Rc<dyn Fn()>>>>,
}

impl AppState {
    pub fn new(session: SessionContext) -> Self {
        let page = Page::resolve(session.role(), "/");
        Self {
            session,
            filters: ReactiveState::new(RouteFilters::default()),
            page: Rc::new(Cell::new(page)),
            path: Rc::new(RefCell::new("/".to_string())),
            change_subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn page(&self) -> Page {
        self.page.get()
    }

    /// Resuelve `path` para el rol actual. Devuelve true si cambia la página.
    pub fn navigate(&self, path: &str) -> bool {
        *self.path.borrow_mut() = path.to_string();
        self.refresh_page()
    }

    /// Cambia de rol y vuelve a resolver la ruta actual
    pub fn set_role(&self, role: Role) -> bool {
        if !self.session.set_role(role) {
            return false;
        }
        log::info!("👤 Rol: {}", role.label());
        self.refresh_page();
        true
    }

    fn refresh_page(&self) -> bool {
        let page = Page::resolve(self.session.role(), &self.path.borrow());
        let changed = self.page.replace(page) != page;
        if changed {
            self.notify_subscribers();
        }
        changed
    }

    /// Suscribirse a cambios de página
    pub fn subscribe_to_changes<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.change_subscribers.borrow_mut().push(Rc::new(callback));
    }

    pub fn notify_subscribers(&self) {
        let callbacks: Vec<Rc<dyn Fn()>> = self.change_subscribers.borrow().clone();
        for callback in callbacks {
            callback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(SessionContext::new(Role::Manager, "V001"))
    }

    #[test]
    fn navigation_follows_role() {
        let app = state();
        assert_eq!(app.page(), Page::Dashboard);
        assert!(app.navigate("/routes"));
        assert_eq!(app.page(), Page::RoutePlanner);

        assert!(app.set_role(Role::Driver));
        assert_eq!(app.page(), Page::DriverView);
        assert!(!app.set_role(Role::Driver));

        app.set_role(Role::Manager);
        assert_eq!(app.page(), Page::RoutePlanner);
    }

    #[test]
    fn subscribers_hear_page_changes_only() {
        let app = state();
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        app.subscribe_to_changes(move || counter.set(counter.get() + 1));

        app.navigate("/routes");
        app.navigate("/routes");
        app.navigate("/nope");
        assert_eq!(count.get(), 2);
        assert_eq!(app.page(), Page::NotFound);
    }
}

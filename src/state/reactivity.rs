// ============================================================================
// REACTIVITY - Sistema de notificaciones/subscribers para reactividad
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

type Callback = Rc<dyn Fn()>;

/// Estado reactivo con sistema de notificaciones.
/// Los clones comparten valor y subscribers.
pub struct ReactiveState<T> {
    value: Rc<RefCell<T>>,
    subscribers: Rc<RefCell<Vec<Callback>>>,
}

impl<T: Clone> ReactiveState<T> {
    /// Copia del valor actual
    pub fn snapshot(&self) -> T {
        self.value.borrow().clone()
    }
}

impl<T> ReactiveState<T> {
    /// Crear nuevo estado reactivo
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Obtener referencia al valor interno
    pub fn get(&self) -> Rc<RefCell<T>> {
        self.value.clone()
    }

    /// Establecer nuevo valor y notificar subscribers
    pub fn set(&self, new_value: T) {
        *self.value.borrow_mut() = new_value;
        self.notify();
    }

    /// Actualizar valor usando closure y notificar
    pub fn update<F>(&self, updater: F)
    where
        F: FnOnce(&mut T),
    {
        updater(&mut *self.value.borrow_mut());
        self.notify();
    }

    /// Suscribirse a cambios
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.subscribers.borrow_mut().push(Rc::new(callback));
    }

    /// Notificar a todos los subscribers. Se copia la lista para que un
    /// callback pueda suscribir a otros sin pánico.
    fn notify(&self) {
        let callbacks: Vec<Callback> = self.subscribers.borrow().clone();
        for callback in callbacks {
            callback();
        }
    }
}

impl<T> Clone for ReactiveState<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            subscribers: self.subscribers.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::models::RouteFilters;

    #[test]
    fn update_notifies_clones() {
        let filters = ReactiveState::new(RouteFilters::default());
        let seen = Rc::new(Cell::new(0));
        let seen_in_callback = seen.clone();
        filters.clone().subscribe(move || seen_in_callback.set(seen_in_callback.get() + 1));

        filters.update(|f| f.avoid_tolls = true);
        filters.set(RouteFilters::default());

        assert_eq!(seen.get(), 2);
        assert!(!filters.snapshot().avoid_tolls);
    }

    #[test]
    fn callback_can_read_value() {
        let state = ReactiveState::new(1);
        let reader = state.clone();
        let last = Rc::new(Cell::new(0));
        let last_in_callback = last.clone();
        state.subscribe(move || last_in_callback.set(*reader.get().borrow()));
        state.set(5);
        assert_eq!(last.get(), 5);
    }
}

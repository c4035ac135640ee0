// ============================================================================
// NAVIGATION - Tabla de rutas por rol
// ============================================================================
// El conductor solo tiene una pantalla: cualquier ruta lo lleva a ella.
// ============================================================================

use crate::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    RoutePlanner,
    DriverView,
    NotFound,
}

impl Page {
    pub fn resolve(role: Role, path: &str) -> Page {
        if role == Role::Driver {
            return Page::DriverView;
        }
        match normalize_path(path).as_str() {
            "/" => Page::Dashboard,
            "/routes" => Page::RoutePlanner,
            _ => Page::NotFound,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Page::Dashboard => "/",
            Page::RoutePlanner => "/routes",
            Page::DriverView => "/driver",
            Page::NotFound => "/404",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::RoutePlanner => "Route Planner",
            Page::DriverView => "My Route",
            Page::NotFound => "Not Found",
        }
    }

    /// Páginas que aparecen en la barra de navegación del rol
    pub fn nav_items(role: Role) -> &'static [Page] {
        match role {
            Role::Manager => &[Page::Dashboard, Page::RoutePlanner],
            Role::Driver => &[Page::DriverView],
        }
    }
}

/// "#/routes?x=1" → "/routes"; vacío → "/"
pub fn path_from_hash(hash: &str) -> String {
    normalize_path(hash.trim_start_matches('#'))
}

fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

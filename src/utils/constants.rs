/// Contenedor del mapa del planificador
pub const PLANNER_MAP_CONTAINER: &str = "route-map";

/// Contenedor del mapa del conductor
pub const DRIVER_MAP_CONTAINER: &str = "driver-map";

/// Elemento raíz donde se monta la app
pub const APP_ROOT_ID: &str = "app";

/// Vehículos que la leyenda muestra antes de "Show more"
pub const LEGEND_VISIBLE_ITEMS: usize = 6;

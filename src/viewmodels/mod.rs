// ============================================================================
// VIEWMODELS - Lógica de presentación, sin DOM
// ============================================================================

pub mod dashboard_viewmodel;
pub mod driver_viewmodel;
pub mod legend_viewmodel;
pub mod route_planner_viewmodel;

pub use dashboard_viewmodel::DashboardMetrics;
pub use driver_viewmodel::DriverViewModel;
pub use legend_viewmodel::FleetRoutes;
pub use route_planner_viewmodel::RoutePlannerViewModel;

pub mod geo;
pub mod route;
pub mod filters;
pub mod order;
pub mod vehicle;
pub mod delivery;
pub mod session;

pub use geo::{Bounds, LngLat};
pub use route::{DeliveryStop, GeometrySource, RoadGeometry, VehicleRoute};
pub use filters::{
    CostOptimization, Exclusion, FilterOption, FuelType, RouteFilters, RoutePreferences, VehicleCapacity,
};
pub use order::Order;
pub use vehicle::{is_low_carbon_type, Vehicle, LOW_CARBON_TYPES};
pub use delivery::{DeliveryStatus, DriverDelivery, DriverRoute};
pub use session::{Role, SessionContext};

pub mod api_client;
pub mod directions_service;
pub mod optimization_service;
pub mod route_csv;
pub mod route_enricher;

pub use api_client::{ApiClient, ApiError};
pub use directions_service::{DirectionsError, DirectionsProvider, MapboxDirections};
pub use optimization_service::{run_optimization, spawn_optimization};
pub use route_csv::{parse_routes_csv, parse_vehicle_types_csv, ParsedRoute};
pub use route_enricher::{enrich_chunked, enrich_routes, FetchGeneration};

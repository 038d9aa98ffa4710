//! Great-circle distance and border-avoiding route computation.
//!
//! The crate is pure: airports and border polygons come in through the
//! [`EndpointLookup`] and [`PolygonLookup`] traits.

pub mod cancel;
pub mod error;
pub mod models;
pub mod planner;
pub mod polygon;
pub mod route;
pub mod spatial;

pub use cancel::CancelToken;
pub use error::{BlockedReason, EndpointRole, RouteError};
pub use models::{Coordinate, Distances, RouteRequest, RouteResult, MILES_PER_KM, NM_PER_KM};
pub use planner::{plan_path, Obstacle, PlannedPath, PlannerConfig, PlannerStats};
pub use polygon::Polygon;
pub use route::{
    compute_route, compute_route_for_request, normalize_code, EndpointLookup, PolygonLookup,
};
pub use spatial::{haversine_distance, path_length_km, spherical_centroid};

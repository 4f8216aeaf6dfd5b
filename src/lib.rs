//! tour-planner core
//!
//! Finds the cheapest closed tour from an origin through a small set of
//! locations, pricing legs through a pluggable distance provider.

pub mod error;
pub mod location;
pub mod traits;
pub mod cache;
pub mod evaluator;
pub mod route;
pub mod search;
pub mod matrix;
pub mod haversine;
pub mod osrm;
pub mod ors;

pub use error::{ProviderError, ProviderErrorKind, Result, SearchError};
pub use location::Location;
pub use route::{OptimizationResult, RankedRoute, Route, RouteCost};
pub use search::{CancellationToken, RouteSearch, SearchOptions};
pub use traits::{CostMetric, DistanceProvider};

//! Core seam between the planner and distance sources.
//!
//! Implement [`DistanceProvider`] for whatever answers "how far is it from
//! here to there": a routing API, a precomputed table, a synthetic formula.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::location::Location;
use crate::route::RouteCost;

/// Returns the travel cost of a single leg.
///
/// Calls with identical arguments must be safe to repeat and are expected to
/// return equal results. The unit (meters, seconds) is the provider's choice.
pub trait DistanceProvider {
    fn distance(&self, from: &Location, to: &Location) -> Result<RouteCost, ProviderError>;
}

impl<T: DistanceProvider + ?Sized> DistanceProvider for &T {
    fn distance(&self, from: &Location, to: &Location) -> Result<RouteCost, ProviderError> {
        (**self).distance(from, to)
    }
}

impl<T: DistanceProvider + ?Sized> DistanceProvider for Box<T> {
    fn distance(&self, from: &Location, to: &Location) -> Result<RouteCost, ProviderError> {
        (**self).distance(from, to)
    }
}

impl<T: DistanceProvider + ?Sized> DistanceProvider for Arc<T> {
    fn distance(&self, from: &Location, to: &Location) -> Result<RouteCost, ProviderError> {
        (**self).distance(from, to)
    }
}

/// Which quantity a road routing adapter reports as the leg cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostMetric {
    /// Driving distance in meters.
    #[default]
    Distance,
    /// Driving time in seconds.
    Duration,
}

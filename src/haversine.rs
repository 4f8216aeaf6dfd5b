//! Haversine distance provider (fallback when no routing service is available).
//!
//! Uses great-circle distance, optionally scaled by a detour factor to
//! approximate road distance. Ignores the road network but never fails.

use crate::error::ProviderError;
use crate::location::Location;
use crate::route::RouteCost;
use crate::traits::DistanceProvider;

/// Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance provider.
///
/// Reports meters, matching what the road routing adapters return with
/// [`CostMetric::Distance`](crate::traits::CostMetric::Distance).
#[derive(Debug, Clone)]
pub struct HaversineDistance {
    /// Multiplier applied to the straight-line distance.
    pub detour_factor: f64,
}

impl Default for HaversineDistance {
    fn default() -> Self {
        Self { detour_factor: 1.0 }
    }
}

impl HaversineDistance {
    pub fn new(detour_factor: f64) -> Self {
        Self { detour_factor }
    }

    /// Calculate haversine distance between two (lat, lng) points in meters.
    pub fn haversine_m(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lng1) = from;
        let (lat2, lng2) = to;

        let lat1_rad = lat1.to_radians();
        let lat2_rad = lat2.to_radians();
        let delta_lat = (lat2 - lat1).to_radians();
        let delta_lng = (lng2 - lng1).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_M * c
    }
}

impl DistanceProvider for HaversineDistance {
    fn distance(&self, from: &Location, to: &Location) -> Result<RouteCost, ProviderError> {
        Ok(Self::haversine_m(from.coords(), to.coords()) * self.detour_factor)
    }
}

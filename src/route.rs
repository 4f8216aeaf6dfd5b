//! Routes and the ranked result handed to presentation code.

use serde::{Deserialize, Serialize};

use crate::location::Location;

/// Non-negative travel cost; unit is set by the distance provider.
pub type RouteCost = f64;

/// Separator used in route labels.
const LABEL_SEPARATOR: &str = " → ";

/// A closed tour: starts and ends at the origin, visits every other stop once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RouteStops")]
pub struct Route {
    stops: Vec<Location>,
}

/// Unchecked wire form of [`Route`].
#[derive(Deserialize)]
struct RouteStops {
    stops: Vec<Location>,
}

impl TryFrom<RouteStops> for Route {
    type Error = String;

    fn try_from(raw: RouteStops) -> Result<Self, Self::Error> {
        let stops = raw.stops;
        if stops.len() < 2 {
            return Err(format!("route needs at least 2 stops, got {}", stops.len()));
        }
        if stops.first() != stops.last() {
            return Err("route must end at its origin".to_string());
        }
        Ok(Self { stops })
    }
}

impl Route {
    pub(crate) fn new(stops: Vec<Location>) -> Self {
        debug_assert!(stops.len() >= 2, "a route always has origin at both ends");
        Self { stops }
    }

    pub fn stops(&self) -> &[Location] {
        &self.stops
    }

    pub fn origin(&self) -> &Location {
        &self.stops[0]
    }

    /// Number of stops including the origin at both ends.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Consecutive (from, to) pairs.
    pub fn legs(&self) -> impl Iterator<Item = (&Location, &Location)> {
        self.stops.windows(2).map(|pair| (&pair[0], &pair[1]))
    }

    /// Stop names joined with " → ".
    pub fn label(&self) -> String {
        self.stops
            .iter()
            .map(Location::name)
            .collect::<Vec<_>>()
            .join(LABEL_SEPARATOR)
    }
}

/// A successfully priced route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRoute {
    pub route: Route,
    pub cost: RouteCost,
    /// Cosmetic; never used for comparison.
    pub label: String,
}

impl RankedRoute {
    pub fn new(route: Route, cost: RouteCost) -> Self {
        let label = route.label();
        Self { route, cost, label }
    }

    /// Cost divided by 1000, i.e. kilometres when the provider reports meters.
    pub fn cost_km(&self) -> f64 {
        self.cost / 1000.0
    }
}

/// Outcome of one optimization call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Cheapest route; always equal to `ranked[0]`.
    pub best: RankedRoute,
    /// Every successfully evaluated route, ascending by cost, ties in discovery order.
    pub ranked: Vec<RankedRoute>,
    /// Candidates evaluated, successful or not.
    pub evaluated: usize,
    /// Candidates excluded because a leg could not be priced.
    pub failed: usize,
    /// Distinct provider calls issued.
    pub provider_calls: usize,
    /// Leg lookups answered from the cache.
    pub cache_hits: usize,
}

impl OptimizationResult {
    /// Sorts `routes` (stable) and builds the result. Returns `None` when empty.
    pub(crate) fn from_routes(
        mut routes: Vec<RankedRoute>,
        evaluated: usize,
        failed: usize,
        provider_calls: usize,
        cache_hits: usize,
    ) -> Option<Self> {
        routes.sort_by(|a, b| a.cost.total_cmp(&b.cost));
        let best = routes.first()?.clone();
        Some(Self {
            best,
            ranked: routes,
            evaluated,
            failed,
            provider_calls,
            cache_hits,
        })
    }
}

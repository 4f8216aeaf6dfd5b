//! Precomputed distance table keyed by location name.

use std::collections::HashMap;

use crate::error::ProviderError;
use crate::location::Location;
use crate::route::RouteCost;
use crate::traits::DistanceProvider;

/// Distance provider backed by a fixed table of leg costs.
///
/// Lookups use location names. A missing entry is reported as "no route".
#[derive(Debug, Clone, Default)]
pub struct MatrixDistance {
    costs: HashMap<(String, String), RouteCost>,
}

impl MatrixDistance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cost for `from -> to` only.
    pub fn insert(&mut self, from: &str, to: &str, cost: RouteCost) {
        self.costs.insert((from.to_string(), to.to_string()), cost);
    }

    /// Sets the same cost in both directions.
    pub fn insert_symmetric(&mut self, a: &str, b: &str, cost: RouteCost) {
        self.insert(a, b, cost);
        self.insert(b, a, cost);
    }

    /// Builder form of [`insert_symmetric`](Self::insert_symmetric).
    pub fn with_symmetric(mut self, a: &str, b: &str, cost: RouteCost) -> Self {
        self.insert_symmetric(a, b, cost);
        self
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, from: &str, to: &str, cost: RouteCost) -> Self {
        self.insert(from, to, cost);
        self
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

impl DistanceProvider for MatrixDistance {
    fn distance(&self, from: &Location, to: &Location) -> Result<RouteCost, ProviderError> {
        self.costs
            .get(&(from.name().to_string(), to.name().to_string()))
            .copied()
            .ok_or_else(|| {
                ProviderError::no_route(format!("no entry for {} -> {}", from.name(), to.name()))
            })
    }
}

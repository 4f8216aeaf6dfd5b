//! Per-run memoization of leg costs.
//!
//! Locations are identified by their position in the run's location table,
//! so duplicate names or coincident coordinates stay distinct stops.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use tracing::trace;

use crate::error::{ProviderError, ProviderErrorKind};
use crate::location::Location;
use crate::route::RouteCost;
use crate::traits::DistanceProvider;

/// Cache key for one leg. In symmetric mode (a, b) and (b, a) are the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocationPair {
    from: usize,
    to: usize,
}

impl LocationPair {
    pub fn new(from: usize, to: usize, symmetric: bool) -> Self {
        if symmetric && to < from {
            Self { from: to, to: from }
        } else {
            Self { from, to }
        }
    }

    pub fn from(&self) -> usize {
        self.from
    }

    pub fn to(&self) -> usize {
        self.to
    }
}

type Slot = Arc<OnceLock<Result<RouteCost, ProviderError>>>;

/// Memoizes provider answers so each distinct pair costs at most one call.
///
/// Safe to share across threads: concurrent misses on the same pair wait for
/// a single fetch. Failures are memoized as well, so a failing pair is asked
/// once per run. Entries are never evicted; the cache lives for one search.
pub struct DistanceCache<'a, P: ?Sized> {
    provider: &'a P,
    locations: Vec<Location>,
    symmetric: bool,
    entries: Mutex<HashMap<LocationPair, Slot>>,
    provider_calls: AtomicUsize,
    hits: AtomicUsize,
}

impl<'a, P> DistanceCache<'a, P>
where
    P: DistanceProvider + ?Sized,
{
    pub fn new(provider: &'a P, locations: Vec<Location>, symmetric: bool) -> Self {
        Self {
            provider,
            locations,
            symmetric,
            entries: Mutex::new(HashMap::new()),
            provider_calls: AtomicUsize::new(0),
            hits: AtomicUsize::new(0),
        }
    }

    /// The run's location table; indices into it identify stops.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// Cost of the leg between the locations at indices `from` and `to`.
    ///
    /// A leg from a stop to itself is free and never reaches the provider.
    ///
    /// # Panics
    ///
    /// Panics if either index is outside the location table.
    pub fn get_or_fetch(&self, from: usize, to: usize) -> Result<RouteCost, ProviderError> {
        if from == to {
            return Ok(0.0);
        }

        let key = LocationPair::new(from, to, self.symmetric);
        let slot = self.slot(key);

        let mut fetched = false;
        let result = slot.get_or_init(|| {
            fetched = true;
            self.fetch(key)
        });

        if fetched {
            trace!(event = "cache_miss", from = key.from, to = key.to);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(event = "cache_hit", from = key.from, to = key.to);
        }

        result.clone()
    }

    /// Number of provider calls made so far.
    pub fn provider_calls(&self) -> usize {
        self.provider_calls.load(Ordering::Relaxed)
    }

    /// Number of lookups answered without calling the provider.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of distinct pairs stored.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, key: LocationPair) -> Slot {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.entry(key).or_default().clone()
    }

    fn fetch(&self, key: LocationPair) -> Result<RouteCost, ProviderError> {
        self.provider_calls.fetch_add(1, Ordering::Relaxed);
        let from = &self.locations[key.from];
        let to = &self.locations[key.to];

        let cost = self.provider.distance(from, to)?;
        if !cost.is_finite() || cost < 0.0 {
            return Err(ProviderError::new(
                ProviderErrorKind::InvalidCost,
                format!("{} -> {} returned cost {}", from.name(), to.name(), cost),
            ));
        }
        Ok(cost)
    }
}

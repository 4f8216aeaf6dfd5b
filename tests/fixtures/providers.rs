//! Scripted distance providers.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tour_planner::{DistanceProvider, Location, ProviderError, RouteCost};

/// Wraps a provider, counting calls and failing every leg that touches a
/// blocked location name.
pub struct Scripted<P> {
    inner: P,
    blocked: HashSet<String>,
    fatal: bool,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, String)>>,
}

impl<P: DistanceProvider> Scripted<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            blocked: HashSet::new(),
            fatal: false,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn block(mut self, name: &str) -> Self {
        self.blocked.insert(name.to_string());
        self
    }

    /// Blocked legs fail with an authorization error instead of "no route".
    pub fn fatal(mut self) -> Self {
        self.fatal = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every (from, to) name pair requested, in call order.
    pub fn seen(&self) -> Vec<(String, String)> {
        self.seen.lock().unwrap().clone()
    }
}

impl<P: DistanceProvider> DistanceProvider for Scripted<P> {
    fn distance(&self, from: &Location, to: &Location) -> Result<RouteCost, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((from.name().to_string(), to.name().to_string()));

        if self.blocked.contains(from.name()) || self.blocked.contains(to.name()) {
            return Err(if self.fatal {
                ProviderError::unauthorized("key revoked")
            } else {
                ProviderError::no_route(format!("{} -> {}", from.name(), to.name()))
            });
        }
        self.inner.distance(from, to)
    }
}

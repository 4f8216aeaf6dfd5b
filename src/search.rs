//! Exhaustive tour search.
//!
//! Every ordering of the non-origin stops is priced, origin fixed at both
//! ends. This is exact and only tractable for single-digit stop counts;
//! `max_locations` guards against accidental factorial blow-up.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::DistanceCache;
use crate::error::{ProviderError, Result, SearchError};
use crate::evaluator::RouteEvaluator;
use crate::location::Location;
use crate::route::{OptimizationResult, RankedRoute, Route, RouteCost};
use crate::traits::DistanceProvider;

/// Index of the origin in a run's location table.
const ORIGIN: usize = 0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Treat A→B and B→A as one cached leg.
    pub symmetric: bool,
    /// Worker threads for candidate evaluation; 1 evaluates sequentially.
    pub parallelism: usize,
    /// Largest accepted number of non-origin stops.
    pub max_locations: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            symmetric: true,
            parallelism: 1,
            max_locations: 10,
        }
    }
}

/// Cooperative cancellation flag, checked between candidates.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One evaluated candidate, successful or not.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateOutcome {
    /// Position in permutation (discovery) order.
    pub index: usize,
    pub route: Route,
    pub outcome: std::result::Result<RouteCost, ProviderError>,
}

type Observer = Arc<dyn Fn(&CandidateOutcome) + Send + Sync>;

/// Finds the cheapest closed tour through a set of stops.
pub struct RouteSearch<P> {
    provider: P,
    options: SearchOptions,
    cancellation: Option<CancellationToken>,
    observer: Option<Observer>,
}

impl<P: fmt::Debug> fmt::Debug for RouteSearch<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteSearch")
            .field("provider", &self.provider)
            .field("options", &self.options)
            .field("cancellation", &self.cancellation)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl<P> RouteSearch<P>
where
    P: DistanceProvider + Sync,
{
    pub fn new(provider: P, options: SearchOptions) -> Self {
        Self {
            provider,
            options,
            cancellation: None,
            observer: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Registers a callback invoked once per evaluated candidate.
    ///
    /// With `parallelism > 1` calls arrive from worker threads in no
    /// particular order.
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&CandidateOutcome) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Prices every ordering of `others` and ranks the successful ones.
    ///
    /// Candidates whose legs cannot be priced are excluded and counted in
    /// `failed`. Fails with [`SearchError::NoFeasibleRoute`] if none succeed.
    pub fn search(&self, origin: &Location, others: &[Location]) -> Result<OptimizationResult> {
        let total = self.validate(origin, others)?;

        info!(
            event = "search_start",
            origin = origin.name(),
            locations = others.len(),
            candidates = total,
            symmetric = self.options.symmetric,
            parallelism = self.options.parallelism,
        );

        let cache = DistanceCache::new(
            &self.provider,
            location_table(origin, others),
            self.options.symmetric,
        );

        let tally = if self.options.parallelism > 1 {
            self.run_parallel(&cache, others.len(), total)?
        } else {
            self.run_sequential(&cache, others.len())?
        };

        let Tally {
            routes,
            evaluated,
            failed,
        } = tally;

        let result = OptimizationResult::from_routes(
            routes,
            evaluated,
            failed,
            cache.provider_calls(),
            cache.hits(),
        )
        .ok_or(SearchError::NoFeasibleRoute { evaluated, failed })?;

        info!(
            event = "search_end",
            best = %result.best.label,
            cost = result.best.cost,
            evaluated = result.evaluated,
            failed = result.failed,
            provider_calls = result.provider_calls,
            cache_hits = result.cache_hits,
        );

        Ok(result)
    }

    /// Lazily evaluates candidates one by one in permutation order.
    ///
    /// The stream is finite and cannot be restarted; it ends early if the
    /// cancellation token fires.
    pub fn candidates(&self, origin: &Location, others: &[Location]) -> Result<Candidates<'_, P>> {
        self.validate(origin, others)?;
        let cache = DistanceCache::new(
            &self.provider,
            location_table(origin, others),
            self.options.symmetric,
        );
        Ok(Candidates {
            search: self,
            cache,
            permutations: Permutations::new(others.len()),
            index: 0,
        })
    }

    /// Checks the input and returns the number of candidates.
    fn validate(&self, origin: &Location, others: &[Location]) -> Result<usize> {
        if self.options.parallelism == 0 {
            return Err(SearchError::Configuration(
                "parallelism must be at least 1".to_string(),
            ));
        }
        if others.len() > self.options.max_locations {
            return Err(SearchError::Configuration(format!(
                "{} locations exceed the exhaustive search limit of {}",
                others.len(),
                self.options.max_locations
            )));
        }

        origin.validate().map_err(SearchError::Configuration)?;
        for location in others {
            location.validate().map_err(SearchError::Configuration)?;
            if location == origin {
                return Err(SearchError::Configuration(format!(
                    "origin '{}' must not be listed among the stops",
                    origin.name()
                )));
            }
        }

        (1..=others.len())
            .try_fold(1usize, |acc, k| acc.checked_mul(k))
            .ok_or_else(|| {
                SearchError::Configuration(format!(
                    "{}! candidate routes overflow",
                    others.len()
                ))
            })
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    fn run_sequential(&self, cache: &DistanceCache<'_, P>, stops: usize) -> Result<Tally> {
        let mut tally = Tally::default();
        for (index, order) in Permutations::new(stops).enumerate() {
            if self.is_cancelled() {
                return Err(SearchError::Cancelled);
            }
            tally.record(self.evaluate_candidate(cache, index, &order))?;
        }
        Ok(tally)
    }

    fn run_parallel(
        &self,
        cache: &DistanceCache<'_, P>,
        stops: usize,
        total: usize,
    ) -> Result<Tally> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.parallelism)
            .build()
            .map_err(|err| SearchError::Configuration(err.to_string()))?;

        // Each worker folds its contiguous index range in order and reduce
        // joins ranges left to right, so ties rank as in a sequential run.
        pool.install(|| {
            (0..total)
                .into_par_iter()
                .try_fold(Tally::default, |mut tally, index| {
                    if self.is_cancelled() {
                        return Err(SearchError::Cancelled);
                    }
                    let order = nth_permutation(stops, index);
                    tally.record(self.evaluate_candidate(cache, index, &order))?;
                    Ok(tally)
                })
                .try_reduce(Tally::default, |left, right| Ok(left.merge(right)))
        })
    }

    fn evaluate_candidate(
        &self,
        cache: &DistanceCache<'_, P>,
        index: usize,
        order: &[usize],
    ) -> CandidateOutcome {
        let mut sequence = Vec::with_capacity(order.len() + 2);
        sequence.push(ORIGIN);
        sequence.extend_from_slice(order);
        sequence.push(ORIGIN);

        let outcome = RouteEvaluator::new(cache).evaluate(&sequence);
        let table = cache.locations();
        let route = Route::new(sequence.iter().map(|&i| table[i].clone()).collect());

        match &outcome {
            Ok(cost) => debug!(event = "candidate", index, route = %route.label(), cost),
            Err(err) => warn!(
                event = "candidate_failed",
                index,
                route = %route.label(),
                error = %err,
            ),
        }

        let candidate = CandidateOutcome {
            index,
            route,
            outcome,
        };
        if let Some(observer) = &self.observer {
            observer(&candidate);
        }
        candidate
    }
}

/// Lazy stream of evaluated candidates. See [`RouteSearch::candidates`].
pub struct Candidates<'s, P> {
    search: &'s RouteSearch<P>,
    cache: DistanceCache<'s, P>,
    permutations: Permutations,
    index: usize,
}

impl<P> Candidates<'_, P>
where
    P: DistanceProvider + Sync,
{
    /// Provider calls issued so far by this stream.
    pub fn provider_calls(&self) -> usize {
        self.cache.provider_calls()
    }

    pub fn cache_hits(&self) -> usize {
        self.cache.hits()
    }
}

impl<P> Iterator for Candidates<'_, P>
where
    P: DistanceProvider + Sync,
{
    type Item = CandidateOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        if self.search.is_cancelled() {
            return None;
        }
        let order = self.permutations.next()?;
        let candidate = self.search.evaluate_candidate(&self.cache, self.index, &order);
        self.index += 1;
        Some(candidate)
    }
}

#[derive(Debug, Default)]
struct Tally {
    routes: Vec<RankedRoute>,
    evaluated: usize,
    failed: usize,
}

impl Tally {
    /// Fatal provider errors end the search; others just exclude the candidate.
    fn record(&mut self, candidate: CandidateOutcome) -> Result<()> {
        self.evaluated += 1;
        match candidate.outcome {
            Ok(cost) => self.routes.push(RankedRoute::new(candidate.route, cost)),
            Err(err) if err.is_fatal() => return Err(SearchError::Provider(err)),
            Err(_) => self.failed += 1,
        }
        Ok(())
    }

    /// Appends `later`, which must cover candidates discovered after `self`.
    fn merge(mut self, later: Tally) -> Tally {
        self.routes.extend(later.routes);
        self.evaluated += later.evaluated;
        self.failed += later.failed;
        self
    }
}

fn location_table(origin: &Location, others: &[Location]) -> Vec<Location> {
    let mut table = Vec::with_capacity(others.len() + 1);
    table.push(origin.clone());
    table.extend_from_slice(others);
    table
}

/// Lexicographic permutations of the stop indices `1..=n`.
struct Permutations {
    next: Option<Vec<usize>>,
}

impl Permutations {
    fn new(n: usize) -> Self {
        Self {
            next: Some((1..=n).collect()),
        }
    }
}

impl Iterator for Permutations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        let mut following = current.clone();
        if advance(&mut following) {
            self.next = Some(following);
        }
        Some(current)
    }
}

/// The `index`-th lexicographic permutation of `1..=n`, decoded through the
/// factorial number system.
fn nth_permutation(n: usize, mut index: usize) -> Vec<usize> {
    let mut remaining: Vec<usize> = (1..=n).collect();
    let mut order = Vec::with_capacity(n);
    for position in 0..n {
        let block: usize = (1..n - position).product();
        order.push(remaining.remove(index / block));
        index %= block;
    }
    order
}

/// Rearranges `items` into the next lexicographic permutation.
/// Returns false when `items` is already the last one.
fn advance(items: &mut [usize]) -> bool {
    if items.len() < 2 {
        return false;
    }

    let mut pivot = items.len() - 1;
    while pivot > 0 && items[pivot - 1] >= items[pivot] {
        pivot -= 1;
    }
    if pivot == 0 {
        return false;
    }

    let mut successor = items.len() - 1;
    while items[successor] <= items[pivot - 1] {
        successor -= 1;
    }
    items.swap(pivot - 1, successor);
    items[pivot..].reverse();
    true
}

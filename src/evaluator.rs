//! Prices a visiting order leg by leg.

use crate::cache::DistanceCache;
use crate::error::ProviderError;
use crate::route::RouteCost;
use crate::traits::DistanceProvider;

/// Sums leg costs for a sequence of location indices.
pub struct RouteEvaluator<'c, 'a, P: ?Sized> {
    cache: &'c DistanceCache<'a, P>,
}

impl<'c, 'a, P> RouteEvaluator<'c, 'a, P>
where
    P: DistanceProvider + ?Sized,
{
    pub fn new(cache: &'c DistanceCache<'a, P>) -> Self {
        Self { cache }
    }

    /// Total cost of visiting `order` in sequence.
    ///
    /// Every leg is priced; the first failing leg fails the whole route and
    /// no partial sum is returned.
    pub fn evaluate(&self, order: &[usize]) -> Result<RouteCost, ProviderError> {
        order
            .windows(2)
            .map(|leg| self.cache.get_or_fetch(leg[0], leg[1]))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::ProviderErrorKind;
    use crate::location::Location;

    /// Cost is the absolute difference of the first digit of each name.
    struct NameDigits;

    impl DistanceProvider for NameDigits {
        fn distance(&self, from: &Location, to: &Location) -> Result<RouteCost, ProviderError> {
            let digit = |loc: &Location| -> Result<f64, ProviderError> {
                loc.name()
                    .parse::<f64>()
                    .map_err(|_| ProviderError::no_route(format!("{} is unroutable", loc.name())))
            };
            Ok((digit(from)? - digit(to)?).abs())
        }
    }

    fn locations(names: &[&str]) -> Vec<Location> {
        names.iter().map(|name| Location::new(*name, 0.0, 0.0)).collect()
    }

    #[test]
    fn test_sums_every_leg() {
        let cache = DistanceCache::new(&NameDigits, locations(&["0", "4", "1"]), true);
        let evaluator = RouteEvaluator::new(&cache);

        // 0 -> 4 -> 1 -> 0 = 4 + 3 + 1
        assert_eq!(evaluator.evaluate(&[0, 1, 2, 0]).unwrap(), 8.0);
    }

    #[test]
    fn test_origin_only_route_is_zero() {
        let cache = DistanceCache::new(&NameDigits, locations(&["7"]), true);
        let evaluator = RouteEvaluator::new(&cache);

        assert_eq!(evaluator.evaluate(&[0, 0]).unwrap(), 0.0);
        assert_eq!(cache.provider_calls(), 0);
    }

    #[test]
    fn test_failing_leg_fails_route() {
        let cache = DistanceCache::new(&NameDigits, locations(&["0", "x", "2"]), true);
        let evaluator = RouteEvaluator::new(&cache);

        let err = evaluator.evaluate(&[0, 2, 1, 0]).unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::NoRoute);
        assert!(err.reason.contains('x'));
    }

    #[test]
    fn test_reuses_cached_legs() {
        let cache = DistanceCache::new(&NameDigits, locations(&["0", "1", "2"]), true);
        let evaluator = RouteEvaluator::new(&cache);

        evaluator.evaluate(&[0, 1, 2, 0]).unwrap();
        evaluator.evaluate(&[0, 2, 1, 0]).unwrap();

        assert_eq!(cache.provider_calls(), 3);
        assert_eq!(cache.hits(), 3);
    }
}

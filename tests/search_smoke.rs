mod fixtures;

use tour_planner::haversine::HaversineDistance;
use tour_planner::{RouteSearch, SearchOptions};

#[test]
fn tours_kenyan_towns_from_nairobi() {
    let origin = fixtures::nairobi();
    let towns = fixtures::towns();

    let search = RouteSearch::new(HaversineDistance::default(), SearchOptions::default());
    let result = search.search(&origin, &towns).expect("haversine never fails");

    assert_eq!(result.ranked.len(), 24);
    assert!(result.best.label.starts_with("Nairobi → "));
    assert!(result.best.label.ends_with(" → Nairobi"));

    // Best tour keeps the two western towns (Nandi, Kericho) adjacent.
    let names: Vec<&str> = result.best.route.stops().iter().map(|s| s.name()).collect();
    let nandi = names.iter().position(|n| *n == "Nandi").unwrap();
    let kericho = names.iter().position(|n| *n == "Kericho").unwrap();
    assert_eq!(nandi.abs_diff(kericho), 1, "unexpected best tour {}", result.best.label);

    // Straight-line round trip is a little over 700 km.
    assert!(
        result.best.cost_km() > 650.0 && result.best.cost_km() < 800.0,
        "best tour was {:.1} km",
        result.best.cost_km()
    );
}

//! Kenyan towns for realistic test fixtures.
//!
//! Coordinates are town centres; Nairobi is the depot every tour starts from.

use tour_planner::Location;

pub const NAIROBI: (&str, f64, f64) = ("Nairobi", -1.2921, 36.8219);

pub const TOWNS: &[(&str, f64, f64)] = &[
    ("Meru", 0.0460, 37.6493),
    ("Nyeri", -0.4167, 36.9500),
    ("Nandi", 0.1000, 35.1833),
    ("Kericho", -0.3673, 35.2830),
];

pub const EXTRA_TOWNS: &[(&str, f64, f64)] = &[
    ("Nakuru", -0.3031, 36.0800),
    ("Machakos", -1.5177, 37.2634),
    ("Eldoret", 0.5143, 35.2698),
];

pub fn location((name, lat, lng): (&str, f64, f64)) -> Location {
    Location::new(name, lat, lng)
}

pub fn nairobi() -> Location {
    location(NAIROBI)
}

/// The four towns toured from Nairobi.
pub fn towns() -> Vec<Location> {
    TOWNS.iter().copied().map(location).collect()
}

/// Towns plus a few extras, for larger searches.
pub fn all_towns() -> Vec<Location> {
    TOWNS.iter().chain(EXTRA_TOWNS).copied().map(location).collect()
}

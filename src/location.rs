//! Named geographic points.

use serde::{Deserialize, Serialize};

/// A named location with coordinates in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    name: String,
    latitude: f64,
    longitude: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Coordinates as (lat, lng).
    pub fn coords(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// Checks that both coordinates are finite and within WGS84 bounds.
    pub fn validate(&self) -> Result<(), String> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(format!("location '{}' has non-finite coordinates", self.name));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(format!(
                "location '{}' latitude {} out of range",
                self.name, self.latitude
            ));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(format!(
                "location '{}' longitude {} out of range",
                self.name, self.longitude
            ));
        }
        Ok(())
    }
}

//! Coordinates

use serde::{Deserialize, Serialize};
use std::fmt;

/// A WGS84 coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parse a PostgreSQL `point` rendered as `(lng,lat)`.
    ///
    /// Returns `None` for anything that is not two finite numbers.
    pub fn from_point(raw: &str) -> Option<Self> {
        let inner = raw.trim().trim_start_matches('(').trim_end_matches(')');
        let mut parts = inner.split(',').map(|p| p.trim().parse::<f64>());

        let longitude = parts.next()?.ok()?;
        let latitude = parts.next()?.ok()?;
        if parts.next().is_some() || !longitude.is_finite() || !latitude.is_finite() {
            return None;
        }

        Some(Self::new(latitude, longitude))
    }

    /// Google Maps search link for this coordinate
    pub fn maps_url(&self) -> String {
        format!(
            "https://www.google.com/maps/search/?api=1&query={},{}",
            self.latitude, self.longitude
        )
    }
}

/// Renders as `lat,lng`, the form the distance API takes
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

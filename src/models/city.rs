//! City coordinate model

use serde::Serialize;

/// A supported city and the coordinates requested for it
///
/// Latitude and longitude stay in their registered decimal form so they reach
/// the request URL exactly as written.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct CityCoordinate {
    /// City name, the registry key
    pub city: &'static str,
    /// Latitude in decimal degrees
    pub latitude: &'static str,
    /// Longitude in decimal degrees
    pub longitude: &'static str,
}

impl CityCoordinate {
    #[must_use]
    pub const fn new(city: &'static str, latitude: &'static str, longitude: &'static str) -> Self {
        Self {
            city,
            latitude,
            longitude,
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{}, {}", self.latitude, self.longitude)
    }
}

//! Supported cities and their coordinates

use crate::models::CityCoordinate;

static CITIES: [CityCoordinate; 4] = [
    CityCoordinate::new("Cleveland", "41.4995", "-81.6954"),
    CityCoordinate::new("Akron", "41.0817", "-81.5114"),
    CityCoordinate::new("Youngstown", "41.1035", "-80.6520"),
    CityCoordinate::new("Toledo", "41.6510", "-83.5419"),
];

/// Static lookup from city name to coordinates
#[derive(Debug, Clone, Copy)]
pub struct CityRegistry {
    cities: &'static [CityCoordinate],
}

impl Default for CityRegistry {
    fn default() -> Self {
        Self { cities: &CITIES }
    }
}

impl CityRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact, case-sensitive lookup
    #[must_use]
    pub fn lookup(&self, city: &str) -> Option<&CityCoordinate> {
        self.cities.iter().find(|entry| entry.city == city)
    }

    /// Registered names in registry order
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.cities.iter().map(|entry| entry.city).collect()
    }

    /// Canonical name for a case-insensitive match, used when reading user input
    #[must_use]
    pub fn find_ignore_case(&self, input: &str) -> Option<&'static str> {
        let input = input.trim();
        self.cities
            .iter()
            .find(|entry| entry.city.eq_ignore_ascii_case(input))
            .map(|entry| entry.city)
    }
}

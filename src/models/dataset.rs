//! Combined multi-city dataset

use super::HourlyReading;
use crate::archive::SkipReason;
use serde::Serialize;

/// A city whose fetch produced no rows, and why
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitySkip {
    pub city: String,
    pub reason: SkipReason,
}

/// All readings of one run, in city-selection order
#[derive(Debug, Clone, Default, Serialize)]
pub struct CombinedDataset {
    pub readings: Vec<HourlyReading>,
    pub skipped: Vec<CitySkip>,
}

impl CombinedDataset {
    /// Total rows across every city that returned data
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.readings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Cities in the order their rows first appear
    #[must_use]
    pub fn cities(&self) -> Vec<&str> {
        let mut cities: Vec<&str> = Vec::new();
        for city in self.readings.iter().filter_map(|r| r.city.as_deref()) {
            if !cities.contains(&city) {
                cities.push(city);
            }
        }
        cities
    }

    /// Readings grouped per city, groups sorted by city name
    #[must_use]
    pub fn by_city(&self) -> Vec<(&str, Vec<&HourlyReading>)> {
        let mut cities = self.cities();
        cities.sort_unstable();
        cities
            .into_iter()
            .map(|city| {
                let rows = self
                    .readings
                    .iter()
                    .filter(|r| r.city.as_deref() == Some(city))
                    .collect();
                (city, rows)
            })
            .collect()
    }
}

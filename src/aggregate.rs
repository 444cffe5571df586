//! Multi-city aggregation
//!
//! Drives an [`HourlySource`] across the selected cities one at a time and
//! concatenates the tagged rows into a [`CombinedDataset`].

use crate::archive::{FetchOutcome, HourlySource};
use crate::models::{CitySkip, CombinedDataset, DateRange};
use crate::registry::CityRegistry;
use crate::{CityTempError, Result};
use tracing::{debug, info, instrument};

/// Fetch every city in order and combine the results
///
/// A city that fails is recorded in [`CombinedDataset::skipped`] and the run
/// carries on with the next one. Only an empty selection or a name missing
/// from the registry is an error, and both are raised before any request.
#[instrument(skip(registry, source, cities, range), fields(cities = cities.len(), range = %range))]
pub async fn aggregate<S: HourlySource>(
    registry: &CityRegistry,
    source: &S,
    cities: &[String],
    range: &DateRange,
) -> Result<CombinedDataset> {
    if cities.is_empty() {
        return Err(CityTempError::validation("At least one city must be selected"));
    }

    let coordinates = cities
        .iter()
        .map(|city| {
            registry
                .lookup(city)
                .ok_or_else(|| CityTempError::unknown_city(city.as_str()))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut dataset = CombinedDataset::default();

    for entry in coordinates {
        debug!("Fetching {} ({})", entry.city, entry.format_coordinates());

        let outcome = source
            .fetch_hourly(entry.latitude, entry.longitude, range)
            .await;
        debug!("{} returned {} rows", entry.city, outcome.row_count());

        match outcome {
            FetchOutcome::Fetched(readings) => {
                dataset
                    .readings
                    .extend(readings.into_iter().map(|r| r.with_city(entry.city)));
            }
            FetchOutcome::Skipped(reason) => dataset.skipped.push(CitySkip {
                city: entry.city.to_string(),
                reason,
            }),
        }
    }

    info!(
        "Combined {} rows from {} cities ({} skipped)",
        dataset.row_count(),
        cities.len() - dataset.skipped.len(),
        dataset.skipped.len()
    );

    Ok(dataset)
}

//! Open-Meteo archive client
//!
//! Fetches hourly temperatures for one coordinate pair over a date range and
//! normalizes the response into [`HourlyReading`] rows. Every failure is turned
//! into a [`SkipReason`] here so callers only ever see a [`FetchOutcome`].

use crate::CityTempError;
use crate::config::ArchiveConfig;
use crate::models::dates::DATE_FORMAT;
use crate::models::{DateRange, HourlyReading};
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Unit requested from the archive; readings are never converted locally
pub const TEMPERATURE_UNIT: &str = "fahrenheit";

const HOURLY_VARIABLE: &str = "temperature_2m";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Why a fetch produced no rows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// Timeout, connection failure or non-2xx status
    Transport { message: String },
    /// Response has no `hourly` field
    MissingHourly,
    /// `hourly` is present but carries no values
    EmptyHourly,
    /// Body could not be turned into rows
    Malformed { message: String },
}

impl SkipReason {
    /// True for the "no data available" family of skips
    #[must_use]
    pub fn is_no_data(&self) -> bool {
        matches!(self, SkipReason::MissingHourly | SkipReason::EmptyHourly)
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Transport { message } => write!(f, "request failed: {message}"),
            SkipReason::MissingHourly => write!(f, "response has no hourly data"),
            SkipReason::EmptyHourly => write!(f, "no temperature data available"),
            SkipReason::Malformed { message } => write!(f, "unreadable response: {message}"),
        }
    }
}

/// Result of one archive fetch
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Fetched(Vec<HourlyReading>),
    Skipped(SkipReason),
}

impl FetchOutcome {
    /// Rows contributed to the combined dataset
    #[must_use]
    pub fn row_count(&self) -> usize {
        match self {
            FetchOutcome::Fetched(readings) => readings.len(),
            FetchOutcome::Skipped(_) => 0,
        }
    }
}

/// Anything that can produce hourly readings for a coordinate pair
///
/// Sources are driven on a current-thread runtime, so the returned futures
/// carry no `Send` bound.
#[allow(async_fn_in_trait)]
pub trait HourlySource {
    async fn fetch_hourly(&self, latitude: &str, longitude: &str, range: &DateRange)
    -> FetchOutcome;
}

/// HTTP client for the archive endpoint
#[derive(Debug, Clone)]
pub struct ArchiveClient {
    client: Client,
    base_url: String,
    timezone: String,
}

impl ArchiveClient {
    /// Create a new archive client
    pub fn new(config: &ArchiveConfig) -> Result<Self, CityTempError> {
        let timeout = Duration::from_secs(config.timeout_seconds.into());

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("citytemp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timezone: config.timezone.clone(),
        })
    }

    /// Full request URL for one coordinate pair and date range
    #[must_use]
    pub fn request_url(&self, latitude: &str, longitude: &str, range: &DateRange) -> String {
        format!(
            "{}/archive?latitude={}&longitude={}&start_date={}&end_date={}&hourly={}&timezone={}&temperature_unit={}",
            self.base_url,
            latitude,
            longitude,
            range.start().format(DATE_FORMAT),
            range.end().format(DATE_FORMAT),
            HOURLY_VARIABLE,
            urlencoding::encode(&self.timezone),
            TEMPERATURE_UNIT,
        )
    }

    /// Fetch hourly temperatures, logging and absorbing every failure
    #[instrument(skip(self, range), fields(range = %range))]
    pub async fn fetch(&self, latitude: &str, longitude: &str, range: &DateRange) -> FetchOutcome {
        let url = self.request_url(latitude, longitude, range);
        debug!("Archive request URL: {}", url);
        let start_time = Instant::now();

        let body = match self.get_body(&url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(
                    "The following error was raised while requesting data for {}, {} and it will be skipped: {}",
                    latitude, longitude, e
                );
                return FetchOutcome::Skipped(SkipReason::Transport {
                    message: e.to_string(),
                });
            }
        };

        match openmeteo::parse_archive_response(&body) {
            Ok(readings) => {
                debug!(
                    "Received {} hourly readings in {:.3}s",
                    readings.len(),
                    start_time.elapsed().as_secs_f64()
                );
                FetchOutcome::Fetched(readings)
            }
            Err(reason) if reason.is_no_data() => {
                warn!(
                    "There was no temperature data available for {}, {} and it will be skipped ({})",
                    latitude, longitude, reason
                );
                FetchOutcome::Skipped(reason)
            }
            Err(reason) => {
                warn!(
                    "There was an error processing data for {}, {} and it will be skipped: {}",
                    latitude, longitude, reason
                );
                FetchOutcome::Skipped(reason)
            }
        }
    }

    async fn get_body(&self, url: &str) -> Result<String, reqwest::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        debug!("HTTP response received: {}", response.status());
        response.text().await
    }
}

impl HourlySource for ArchiveClient {
    async fn fetch_hourly(
        &self,
        latitude: &str,
        longitude: &str,
        range: &DateRange,
    ) -> FetchOutcome {
        self.fetch(latitude, longitude, range).await
    }
}

/// `OpenMeteo` archive response structures and conversion into readings
mod openmeteo {
    use super::{HOURLY_VARIABLE, HourlyReading, NaiveDateTime, SkipReason, TIMESTAMP_FORMAT};
    use serde::Deserialize;

    /// Archive response; location scalars are optional so a missing `hourly`
    /// is reported as such even on an otherwise sparse body
    #[derive(Debug, Deserialize)]
    pub struct ArchiveResponse {
        pub latitude: Option<f64>,
        pub longitude: Option<f64>,
        pub elevation: Option<f64>,
        pub hourly: Option<HourlyData>,
    }

    /// Parallel hourly arrays, aligned by index
    #[derive(Debug, Deserialize)]
    pub struct HourlyData {
        #[serde(default)]
        pub time: Option<Vec<String>>,
        #[serde(default, rename = "temperature_2m")]
        pub temperature: Option<Vec<Option<f64>>>,
    }

    impl HourlyData {
        fn is_empty(&self) -> bool {
            self.time.as_ref().is_none_or(Vec::is_empty)
                && self.temperature.as_ref().is_none_or(Vec::is_empty)
        }
    }

    fn malformed(message: impl Into<String>) -> SkipReason {
        SkipReason::Malformed {
            message: message.into(),
        }
    }

    pub fn parse_archive_response(body: &str) -> Result<Vec<HourlyReading>, SkipReason> {
        let response: ArchiveResponse =
            serde_json::from_str(body).map_err(|e| malformed(e.to_string()))?;

        let hourly = response.hourly.ok_or(SkipReason::MissingHourly)?;
        if hourly.is_empty() {
            return Err(SkipReason::EmptyHourly);
        }

        let (Some(latitude), Some(longitude), Some(elevation)) =
            (response.latitude, response.longitude, response.elevation)
        else {
            return Err(malformed("missing latitude, longitude or elevation"));
        };

        let times = hourly.time.ok_or_else(|| malformed("hourly data has no time series"))?;
        let temperatures = hourly
            .temperature
            .ok_or_else(|| malformed(format!("hourly data has no {HOURLY_VARIABLE} series")))?;

        if times.len() != temperatures.len() {
            return Err(malformed(format!(
                "{} timestamps but {} temperatures",
                times.len(),
                temperatures.len()
            )));
        }

        times
            .iter()
            .zip(temperatures)
            .map(|(time, temperature)| {
                let timestamp = NaiveDateTime::parse_from_str(time, TIMESTAMP_FORMAT)
                    .map_err(|_| malformed(format!("invalid timestamp '{time}'")))?;
                Ok(HourlyReading {
                    timestamp,
                    temperature: temperature.unwrap_or(f64::NAN),
                    latitude,
                    longitude,
                    elevation,
                    city: None,
                })
            })
            .collect()
    }
}

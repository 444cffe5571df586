//! Date range a pull covers

use crate::CityTempError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date format accepted on input and sent to the archive
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive range of calendar days, `start <= end`
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CityTempError> {
        if end < start {
            return Err(CityTempError::validation(format!(
                "End date {end} is before start date {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse both ends from `YYYY-MM-DD` text
    pub fn parse(start: &str, end: &str) -> Result<Self, CityTempError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

/// Parse a single `YYYY-MM-DD` date
pub fn parse_date(input: &str) -> Result<NaiveDate, CityTempError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| CityTempError::validation(format!("'{input}' is not a YYYY-MM-DD date")))
}

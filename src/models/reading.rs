//! Hourly temperature reading model

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// One timestamped temperature observation
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HourlyReading {
    /// Local timestamp in the timezone the archive was asked for
    pub timestamp: NaiveDateTime,
    /// Temperature in Fahrenheit as reported by the archive, `NaN` where the archive had a gap
    pub temperature: f64,
    /// Grid cell latitude reported by the archive
    pub latitude: f64,
    /// Grid cell longitude reported by the archive
    pub longitude: f64,
    /// Grid cell elevation in meters
    pub elevation: f64,
    /// City the row was requested for, set during aggregation
    pub city: Option<String>,
}

impl HourlyReading {
    /// Calendar date part of the timestamp
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Time-of-day part of the timestamp
    #[must_use]
    pub fn time(&self) -> NaiveTime {
        self.timestamp.time()
    }

    /// Tag the reading with the city it was requested for
    #[must_use]
    pub fn with_city(mut self, city: &str) -> Self {
        self.city = Some(city.to_string());
        self
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        if self.temperature.is_nan() {
            "n/a".to_string()
        } else {
            format!("{:.1}°F", self.temperature)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(temperature: f64) -> HourlyReading {
        HourlyReading {
            timestamp: NaiveDate::from_ymd_opt(2023, 1, 1)
                .unwrap()
                .and_hms_opt(13, 0, 0)
                .unwrap(),
            temperature,
            latitude: 41.49,
            longitude: -81.69,
            elevation: 199.0,
            city: None,
        }
    }

    #[test]
    fn test_date_and_time_split() {
        let reading = reading(34.2);
        assert_eq!(reading.date(), NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(reading.time(), NaiveTime::from_hms_opt(13, 0, 0).unwrap());
    }

    #[test]
    fn test_with_city_tags_reading() {
        let tagged = reading(34.2).with_city("Toledo");
        assert_eq!(tagged.city.as_deref(), Some("Toledo"));
    }

    #[test]
    fn test_format_temperature() {
        assert_eq!(reading(34.24).format_temperature(), "34.2°F");
        assert_eq!(reading(f64::NAN).format_temperature(), "n/a");
    }
}

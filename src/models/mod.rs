//! Data models for `CityTemp`
//!
//! - City: registered city coordinates
//! - Reading: one hourly temperature row
//! - Dataset: the combined multi-city result of one run
//! - Dates: the validated date range a run covers

pub mod city;
pub mod dataset;
pub mod dates;
pub mod reading;

// Re-export all public types for convenient access
pub use city::CityCoordinate;
pub use dataset::{CitySkip, CombinedDataset};
pub use dates::DateRange;
pub use reading::HourlyReading;

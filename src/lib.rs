//! `CityTemp` - historical hourly temperatures for a set of cities
//!
//! This library looks up city coordinates, pulls hourly temperatures from the
//! Open-Meteo archive, combines the per-city rows into one dataset and hands it
//! to a print, plot or store action.

pub mod actions;
pub mod aggregate;
pub mod archive;
pub mod config;
pub mod error;
pub mod models;
pub mod registry;
pub mod selection;

// Re-export core types for public API
pub use actions::Action;
pub use aggregate::aggregate;
pub use archive::{ArchiveClient, FetchOutcome, HourlySource, SkipReason};
pub use config::CityTempConfig;
pub use error::CityTempError;
pub use models::{CityCoordinate, CitySkip, CombinedDataset, DateRange, HourlyReading};
pub use registry::CityRegistry;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, CityTempError>;

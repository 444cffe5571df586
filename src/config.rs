//! Configuration management for `CityTemp`
//!
//! Handles loading configuration from files and environment variables and
//! validates every setting before the rest of the program sees it.

use crate::CityTempError;
use anyhow::{Context, Result};
use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for `CityTemp`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CityTempConfig {
    /// Weather archive API configuration
    pub archive: ArchiveConfig,
    /// Database target for the store action
    pub storage: StorageConfig,
    /// Chart output for the plot action
    pub plot: PlotConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Weather archive API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Base URL of the archive API, without the `/archive` path
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
    /// IANA timezone the hourly timestamps are reported in
    pub timezone: String,
}

/// Storage settings for the store action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Table rows are appended to
    pub table: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Image file the chart is written to
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

// Default value functions
fn default_archive_base_url() -> String {
    "https://archive-api.open-meteo.com/v1".to_string()
}

fn default_archive_timeout() -> u32 {
    30
}

fn default_archive_timezone() -> String {
    "America/New_York".to_string()
}

fn default_database_path() -> PathBuf {
    PathBuf::from("citytemp.db")
}

fn default_table() -> String {
    "Temperature".to_string()
}

fn default_plot_output() -> PathBuf {
    PathBuf::from("temperature.png")
}

fn default_plot_width() -> u32 {
    1000
}

fn default_plot_height() -> u32 {
    400
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: default_archive_base_url(),
            timeout_seconds: default_archive_timeout(),
            timezone: default_archive_timezone(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            table: default_table(),
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            output_path: default_plot_output(),
            width: default_plot_width(),
            height: default_plot_height(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ArchiveConfig {
    /// Parsed form of [`ArchiveConfig::timezone`]
    pub fn tz(&self) -> Result<Tz, CityTempError> {
        self.timezone.parse::<Tz>().map_err(|_| {
            CityTempError::config(format!("Unknown timezone '{}'", self.timezone))
        })
    }
}

impl CityTempConfig {
    /// Load configuration from the given file, or the default location when
    /// `None`, layered under `CITYTEMP_` environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // CITYTEMP_ARCHIVE__TIMEOUT_SECONDS=10 overrides archive.timeout_seconds
        builder = builder.add_source(
            Environment::with_prefix("CITYTEMP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: CityTempConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("citytemp").join("config.toml"))
    }

    /// Apply default values to empty or zeroed fields
    pub fn apply_defaults(&mut self) {
        if self.archive.base_url.is_empty() {
            self.archive.base_url = default_archive_base_url();
        }
        if self.archive.timeout_seconds == 0 {
            self.archive.timeout_seconds = default_archive_timeout();
        }
        if self.archive.timezone.is_empty() {
            self.archive.timezone = default_archive_timezone();
        }
        if self.storage.database_path.as_os_str().is_empty() {
            self.storage.database_path = default_database_path();
        }
        if self.storage.table.is_empty() {
            self.storage.table = default_table();
        }
        if self.plot.output_path.as_os_str().is_empty() {
            self.plot.output_path = default_plot_output();
        }
        if self.plot.width == 0 {
            self.plot.width = default_plot_width();
        }
        if self.plot.height == 0 {
            self.plot.height = default_plot_height();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.archive.timeout_seconds > 300 {
            return Err(
                CityTempError::config("Archive API timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.plot.width > 10_000 || self.plot.height > 10_000 {
            return Err(
                CityTempError::config("Plot dimensions cannot exceed 10000 pixels").into(),
            );
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(CityTempError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(CityTempError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.archive.base_url.starts_with("http://")
            && !self.archive.base_url.starts_with("https://")
        {
            return Err(CityTempError::config(
                "Archive API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        self.archive.tz()?;

        // The table name is spliced into SQL, so keep it to a plain identifier.
        let table = &self.storage.table;
        let valid_table = table
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid_table {
            return Err(CityTempError::config(format!(
                "Invalid table name '{table}'. Use letters, digits and underscores only"
            ))
            .into());
        }

        Ok(())
    }
}

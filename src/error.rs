//! Error types and handling for `CityTemp`

use thiserror::Error;

/// Main error type for the `CityTemp` library
///
/// Per-city fetch failures never show up here; they are absorbed into
/// [`crate::archive::SkipReason`] at the fetch boundary.
#[derive(Error, Debug)]
pub enum CityTempError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// A city name that is not in the registry reached the core
    #[error("Unknown city: {city}")]
    UnknownCity { city: String },

    /// HTTP client construction errors
    #[error("HTTP client error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    /// Database errors raised by the store action
    #[error("Storage error: {source}")]
    Storage {
        #[from]
        source: rusqlite::Error,
    },

    /// Chart rendering errors
    #[error("Plot error: {message}")]
    Plot { message: String },

    /// Interactive input ended before a selection was made
    #[error("Input closed: {message}")]
    Input { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl CityTempError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unknown_city<S: Into<String>>(city: S) -> Self {
        Self::UnknownCity { city: city.into() }
    }

    pub fn plot<S: Into<String>>(message: S) -> Self {
        Self::Plot {
            message: message.into(),
        }
    }

    pub fn input<S: Into<String>>(message: S) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            CityTempError::Config { .. } => {
                "Configuration error. Please check your config file and environment.".to_string()
            }
            CityTempError::Validation { message } => format!("Invalid input: {message}"),
            CityTempError::UnknownCity { city } => {
                format!("'{city}' is not one of the supported cities.")
            }
            CityTempError::Http { .. } => {
                "Unable to set up the HTTP client for the weather archive.".to_string()
            }
            CityTempError::Storage { .. } => {
                "Database operation failed. Please check the storage settings.".to_string()
            }
            CityTempError::Plot { .. } => "Unable to draw the temperature chart.".to_string(),
            CityTempError::Input { .. } => "Input ended before a selection was made.".to_string(),
            CityTempError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

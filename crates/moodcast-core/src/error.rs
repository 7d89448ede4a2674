//! Core error types for moodcast-core.
//!
//! Structural misuse (malformed samples, a zero horizon) is reported as a
//! [`ForecastError`]. Sparse or missing data is never an error: the
//! analyzer and forecaster fall back to baseline levels instead.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for moodcast-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Analysis or forecasting errors
    #[error("Forecast error: {0}")]
    Forecast(#[from] ForecastError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the pattern analyzer and forecaster.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForecastError {
    /// A sample or pattern argument is malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Forecast horizon is not a positive number of hours
    #[error("Invalid range: {0}")]
    InvalidRange(String),
}

impl ForecastError {
    pub(crate) fn invalid_sample(id: &str, message: impl std::fmt::Display) -> Self {
        ForecastError::InvalidInput(format!("sample '{id}': {message}"))
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

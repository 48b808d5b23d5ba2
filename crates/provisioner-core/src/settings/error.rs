//! Error types for settings and credential loading

use std::path::PathBuf;
use thiserror::Error;

/// Result type for settings operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors detected before any remote call is made
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Settings file does not exist
    #[error("Config file {path} not found")]
    NotFound { path: PathBuf },

    /// Settings file exists but could not be read
    #[error("I/O error for {path}: {message}")]
    IoError { path: PathBuf, message: String },

    /// Settings file is not valid JSON or has the wrong shape
    #[error("Invalid JSON in config file {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },

    /// Required setting is blank
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Setting or input has an unusable value
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// No service-account credentials were supplied
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Service-account credentials could not be parsed
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),
}

impl ConfigError {
    /// Get the error code for the JSON result record
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "CONFIG_NOT_FOUND",
            Self::IoError { .. } => "IO_ERROR",
            Self::JsonParseError { .. } => "PARSE_ERROR",
            Self::MissingField(_) | Self::ValidationError(_) => "CONFIG_INVALID",
            Self::MissingCredentials(_) => "CREDENTIALS_MISSING",
            Self::InvalidCredentials(_) => "CREDENTIALS_INVALID",
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParseError {
            path: PathBuf::new(),
            message: err.to_string(),
        }
    }
}

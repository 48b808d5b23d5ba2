//! Error types for the Google Drive backend

use std::path::PathBuf;
use thiserror::Error;

use provisioner_core::{ConfigError, ProvisionError};

/// Result type for Drive client setup and authentication
pub type DriveResult<T> = Result<T, DriveError>;

/// Errors raised while setting up an authenticated Drive session
///
/// Failures of individual Drive calls are reported as
/// [`provisioner_core::StorageError`] instead.
#[derive(Error, Debug)]
pub enum DriveError {
    /// Service-account key is missing fields or holds an unusable private key
    #[error("Invalid service account key: {0}")]
    InvalidKey(String),

    /// Key file could not be read
    #[error("Failed to read service account key {path}: {message}")]
    KeyFile { path: PathBuf, message: String },

    /// Token endpoint rejected the assertion
    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    /// Invalid API base URL
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// HTTP client could not be built or the request never completed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl From<DriveError> for ProvisionError {
    fn from(err: DriveError) -> Self {
        match err {
            DriveError::InvalidKey(_) | DriveError::KeyFile { .. } => {
                Self::Configuration(ConfigError::InvalidCredentials(err.to_string()))
            }
            DriveError::InvalidUrl(message) => {
                Self::Configuration(ConfigError::ValidationError(message))
            }
            DriveError::TokenExchange(_) | DriveError::Request(_) => {
                Self::Authentication(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_problems_are_configuration_errors() {
        let err = ProvisionError::from(DriveError::InvalidKey("missing client_email".into()));
        assert_eq!(err.code(), "CREDENTIALS_INVALID");
        assert!(err.to_string().contains("missing client_email"));
    }

    #[test]
    fn test_rejected_exchange_is_authentication_error() {
        let err = ProvisionError::from(DriveError::TokenExchange("invalid_grant".into()));
        assert_eq!(err.code(), "AUTH_FAILED");
    }
}

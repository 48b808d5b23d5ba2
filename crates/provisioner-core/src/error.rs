//! Error types for provisioning runs

use std::fmt;

use thiserror::Error;

use crate::backend::StorageError;
use crate::settings::ConfigError;

/// Result type for provisioning operations
pub type ProvisionResult<T> = Result<T, ProvisionError>;

/// The remote primitive that was being executed when a failure occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOperation {
    CreateFolder,
    CopyFile,
    ListChildren,
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateFolder => write!(f, "create folder"),
            Self::CopyFile => write!(f, "copy file"),
            Self::ListChildren => write!(f, "list contents of folder"),
        }
    }
}

/// Errors that abort a provisioning run
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Settings, credentials or input are missing or malformed
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Credential exchange with the storage provider failed
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// A create/copy/list call against the storage backend failed
    #[error("Failed to {operation} '{target}': {source}")]
    Remote {
        operation: RemoteOperation,
        target: String,
        source: StorageError,
    },

    /// A template folder is its own ancestor, or was created by this run
    #[error("Folder '{folder_id}' leads back into the tree being walked (cycle detected)")]
    CycleDetected { folder_id: String },

    /// The template tree is nested deeper than the configured limit
    #[error("Folder '{folder_id}' is nested deeper than the limit of {limit} levels")]
    DepthLimitExceeded { folder_id: String, limit: usize },
}

impl ProvisionError {
    /// Build a remote failure for the given operation and target
    pub fn remote(
        operation: RemoteOperation,
        target: impl Into<String>,
        source: StorageError,
    ) -> Self {
        Self::Remote {
            operation,
            target: target.into(),
            source,
        }
    }

    /// Get the error code for the JSON result record
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration(e) => e.code(),
            Self::Authentication(_) => "AUTH_FAILED",
            Self::Remote { operation, .. } => match operation {
                RemoteOperation::CreateFolder => "REMOTE_CREATE_FAILED",
                RemoteOperation::CopyFile => "REMOTE_COPY_FAILED",
                RemoteOperation::ListChildren => "REMOTE_LIST_FAILED",
            },
            Self::CycleDetected { .. } => "CYCLE_DETECTED",
            Self::DepthLimitExceeded { .. } => "DEPTH_LIMIT_EXCEEDED",
        }
    }
}

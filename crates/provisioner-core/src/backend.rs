//! Storage backend abstraction
//!
//! The replicator only needs three remote primitives. Concrete providers
//! (Google Drive, test doubles) implement [`StorageBackend`].

use async_trait::async_trait;
use thiserror::Error;

use crate::node::RemoteNode;

/// Why a single remote call failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Referenced object does not exist (or is not visible to the caller)
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller lacks access to the referenced object
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Storage or request quota exhausted
    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Access token rejected
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Any other non-success response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Network failure before a response was received
    #[error("transport error: {0}")]
    Transport(String),

    /// A response arrived but could not be decoded
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Remote folder/file operations used by the replicator
///
/// Every call is awaited before the next one is issued; implementations do
/// not need to support concurrent use.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Human-readable provider name, used in logs
    fn name(&self) -> &str;

    /// Create a folder named `name` under `parent_id`, returning its new id
    async fn create_folder(&self, name: &str, parent_id: &str) -> Result<String, StorageError>;

    /// Copy `file_id` into `parent_id` as `new_name`, returning the copy's id
    async fn copy_file(
        &self,
        file_id: &str,
        new_name: &str,
        parent_id: &str,
    ) -> Result<String, StorageError>;

    /// List the direct, non-trashed children of `folder_id`
    async fn list_children(&self, folder_id: &str) -> Result<Vec<RemoteNode>, StorageError>;

    /// Browser URL for a folder
    fn folder_url(&self, folder_id: &str) -> String;
}

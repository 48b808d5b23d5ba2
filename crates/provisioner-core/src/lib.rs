//! Provisioner Core - template folder replication
//!
//! This crate holds the storage-agnostic part of client provisioning:
//! settings, the rename rule, the error taxonomy, the [`StorageBackend`]
//! seam, and the [`TreeReplicator`] that mirrors a template folder tree
//! under a freshly created client folder.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

pub mod backend;
pub mod error;
pub mod node;
pub mod rename;
pub mod replicate;
pub mod settings;

pub use backend::{StorageBackend, StorageError};
pub use error::{ProvisionError, ProvisionResult, RemoteOperation};
pub use node::{NodeKind, RemoteNode};
pub use rename::RenameRule;
pub use replicate::{
    CopyStats, PlannedFile, PlannedFolder, ReplicationPlan, ReplicationResult, TreeReplicator,
};
pub use settings::{ConfigError, ConfigResult, Settings};

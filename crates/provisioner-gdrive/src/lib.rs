//! Provisioner Google Drive backend
//!
//! [`DriveClient`] implements [`provisioner_core::StorageBackend`] on top of
//! the Drive v3 REST API. [`ServiceAccountKey`] performs the service-account
//! token exchange that produces the client's [`AccessToken`].

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

pub mod auth;
pub mod client;
pub mod error;
pub mod types;

pub use auth::{AccessToken, ServiceAccountKey, DEFAULT_TOKEN_URI, DRIVE_SCOPE};
pub use client::{classify_failure, http_client, DriveClient, DEFAULT_API_BASE};
pub use error::{DriveError, DriveResult};
pub use types::{DriveFile, FOLDER_MIME_TYPE};

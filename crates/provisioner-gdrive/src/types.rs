//! Drive v3 wire types

use provisioner_core::RemoteNode;
use serde::{Deserialize, Serialize};

/// MIME type Drive uses for folders
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Body of `files.create` for a folder
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateFolderRequest<'a> {
    pub name: &'a str,
    pub mime_type: &'a str,
    pub parents: [&'a str; 1],
}

/// Body of `files.copy`
#[derive(Debug, Serialize)]
pub(crate) struct CopyFileRequest<'a> {
    pub name: &'a str,
    pub parents: [&'a str; 1],
}

/// Response carrying only the new object's id (`fields=id`)
#[derive(Debug, Deserialize)]
pub(crate) struct CreatedFile {
    pub id: String,
}

/// One entry of a `files.list` page
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
}

impl DriveFile {
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_MIME_TYPE
    }

    #[must_use]
    pub fn into_node(self) -> RemoteNode {
        if self.is_folder() {
            RemoteNode::folder(self.id, self.name)
        } else {
            RemoteNode::file(self.id, self.name)
        }
    }
}

/// A `files.list` page
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileList {
    #[serde(default)]
    pub files: Vec<DriveFile>,
    pub next_page_token: Option<String>,
}

/// Google API error envelope: `{"error": {"code", "message", "errors": [...]}}`
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub reason: String,
}

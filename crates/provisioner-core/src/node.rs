//! Descriptors for objects returned by the storage backend

use serde::{Deserialize, Serialize};

/// Kind of a remote object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    File,
}

/// A folder or file as reported by a listing call
///
/// Identifiers are assigned by the remote service and never generated locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteNode {
    /// Opaque remote identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Folder or file
    pub kind: NodeKind,
}

impl RemoteNode {
    /// Create a folder descriptor
    pub fn folder(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::Folder,
        }
    }

    /// Create a file descriptor
    pub fn file(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::File,
        }
    }

    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }
}

/// Split a listing into `(files, folders)`, keeping listing order within each
#[must_use]
pub fn partition_children(children: Vec<RemoteNode>) -> (Vec<RemoteNode>, Vec<RemoteNode>) {
    let (folders, files): (Vec<_>, Vec<_>) =
        children.into_iter().partition(RemoteNode::is_folder);
    (files, folders)
}

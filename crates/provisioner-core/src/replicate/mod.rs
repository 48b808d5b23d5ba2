//! Template tree replication
//!
//! [`TreeReplicator`] creates the client's top-level folder and mirrors the
//! template tree beneath it, depth-first and pre-order on folders:
//!
//! 1. list the source folder's direct children
//! 2. copy each file into the destination, applying the [`RenameRule`]
//! 3. for each subfolder, create its counterpart and finish that whole
//!    subtree before moving on to the next sibling
//!
//! The first failing remote call aborts the walk. Nothing already created is
//! removed.

mod plan;
mod result;

pub use plan::{PlannedFile, PlannedFolder, ReplicationPlan};
pub use result::{CopyStats, ReplicationResult};

use std::collections::HashSet;
use tracing::{debug, error, info};

use crate::backend::StorageBackend;
use crate::error::{ProvisionError, ProvisionResult, RemoteOperation};
use crate::node::{partition_children, RemoteNode};
use crate::rename::RenameRule;
use crate::settings::{validate_organization_name, Settings};

/// Mirrors the template folder tree for one client at a time
pub struct TreeReplicator<'a, B: StorageBackend + ?Sized> {
    backend: &'a B,
    settings: &'a Settings,
}

/// Pending unit of work on the explicit walk stack
enum Step {
    /// List a source folder and copy its files into an existing destination
    Contents {
        source_id: String,
        destination_id: String,
        depth: usize,
    },
    /// Create the counterpart of a source subfolder, then descend into it
    Folder {
        source: RemoteNode,
        parent_id: String,
        depth: usize,
    },
    /// Subtree of a source folder is finished
    Leave { source_id: String },
}

/// Top-level folder created by a successful run
struct CreatedRoot {
    id: String,
    name: String,
}

/// Cycle and depth protection for template walks
///
/// A source folder is rejected when it is one of its own ancestors on the
/// current path, or when it is a folder created during this run. A folder
/// shared by two parents is walked once under each of them.
pub(crate) struct WalkGuard {
    ancestors: HashSet<String>,
    created: HashSet<String>,
    max_depth: usize,
}

impl WalkGuard {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            ancestors: HashSet::new(),
            created: HashSet::new(),
            max_depth,
        }
    }

    /// Push `folder_id` onto the current path
    pub(crate) fn enter(&mut self, folder_id: &str, depth: usize) -> ProvisionResult<()> {
        if depth > self.max_depth {
            return Err(ProvisionError::DepthLimitExceeded {
                folder_id: folder_id.to_string(),
                limit: self.max_depth,
            });
        }
        if self.created.contains(folder_id) || !self.ancestors.insert(folder_id.to_string()) {
            return Err(ProvisionError::CycleDetected {
                folder_id: folder_id.to_string(),
            });
        }
        Ok(())
    }

    /// Pop `folder_id` once its whole subtree is done
    pub(crate) fn leave(&mut self, folder_id: &str) {
        self.ancestors.remove(folder_id);
    }

    pub(crate) fn record_created(&mut self, folder_id: &str) {
        self.created.insert(folder_id.to_string());
    }
}

impl<'a, B: StorageBackend + ?Sized> TreeReplicator<'a, B> {
    pub fn new(backend: &'a B, settings: &'a Settings) -> Self {
        Self { backend, settings }
    }

    /// Provision `organization` from the configured template into the
    /// configured destination folder
    pub async fn provision(&self, organization: &str) -> ReplicationResult {
        self.replicate(
            &self.settings.google_drive.template_folder_id,
            &self.settings.google_drive.destination_folder_id,
            organization,
        )
        .await
    }

    /// Create `<organization><main_folder_suffix>` under
    /// `destination_parent_id` and mirror `source_folder_id` into it
    ///
    /// Never fails: the first error is folded into the returned record.
    /// Calling this twice for the same organization creates two folders.
    pub async fn replicate(
        &self,
        source_folder_id: &str,
        destination_parent_id: &str,
        organization: &str,
    ) -> ReplicationResult {
        let organization = organization.trim();
        match self
            .try_replicate(source_folder_id, destination_parent_id, organization)
            .await
        {
            Ok(root) => {
                let url = self.backend.folder_url(&root.id);
                ReplicationResult::success(organization, root.id, root.name, url)
            }
            Err(err) => {
                error!(code = err.code(), error = %err, "Provisioning failed");
                ReplicationResult::failure(organization, &err)
            }
        }
    }

    async fn try_replicate(
        &self,
        source_folder_id: &str,
        destination_parent_id: &str,
        organization: &str,
    ) -> ProvisionResult<CreatedRoot> {
        let organization = validate_organization_name(organization)?;
        let main_folder_name = self.settings.main_folder_name(organization);

        info!(
            backend = self.backend.name(),
            folder = %main_folder_name,
            parent_id = %destination_parent_id,
            "Creating main folder"
        );
        let root_id = self
            .create_folder(&main_folder_name, destination_parent_id)
            .await?;

        info!(template_id = %source_folder_id, "Copying template folder structure");
        let rule = self.settings.rename_rule(organization);
        let stats = self.copy_tree(source_folder_id, &root_id, &rule).await?;

        info!(
            folder_id = %root_id,
            folders_created = stats.folders_created,
            files_copied = stats.files_copied,
            "Folder structure created"
        );
        Ok(CreatedRoot {
            id: root_id,
            name: main_folder_name,
        })
    }

    /// Mirror the contents of `source_folder_id` into the existing folder
    /// `destination_folder_id`
    pub async fn copy_tree(
        &self,
        source_folder_id: &str,
        destination_folder_id: &str,
        rule: &RenameRule,
    ) -> ProvisionResult<CopyStats> {
        let mut guard = WalkGuard::new(self.settings.replication.max_depth);
        guard.record_created(destination_folder_id);
        guard.enter(source_folder_id, 0)?;

        let mut stats = CopyStats::default();
        let mut pending = vec![Step::Contents {
            source_id: source_folder_id.to_string(),
            destination_id: destination_folder_id.to_string(),
            depth: 0,
        }];

        while let Some(step) = pending.pop() {
            match step {
                Step::Contents {
                    source_id,
                    destination_id,
                    depth,
                } => {
                    let (files, folders) =
                        partition_children(self.list_children(&source_id).await?);
                    debug!(
                        folder_id = %source_id,
                        files = files.len(),
                        folders = folders.len(),
                        "Listed folder"
                    );

                    for file in files {
                        let target_name = rule.apply(&file.name);
                        info!(from = %file.name, to = %target_name, "Copying file");
                        self.copy_file(&file.id, target_name, &destination_id)
                            .await?;
                        stats.files_copied += 1;
                    }

                    // Reversed so the first listed folder is handled first
                    pending.extend(folders.into_iter().rev().map(|source| Step::Folder {
                        source,
                        parent_id: destination_id.clone(),
                        depth: depth + 1,
                    }));
                }
                Step::Folder {
                    source,
                    parent_id,
                    depth,
                } => {
                    guard.enter(&source.id, depth)?;
                    info!(folder = %source.name, "Creating subfolder");
                    let folder_id = self.create_folder(&source.name, &parent_id).await?;
                    guard.record_created(&folder_id);
                    stats.folders_created += 1;

                    pending.push(Step::Leave {
                        source_id: source.id.clone(),
                    });
                    pending.push(Step::Contents {
                        source_id: source.id,
                        destination_id: folder_id,
                        depth,
                    });
                }
                Step::Leave { source_id } => guard.leave(&source_id),
            }
        }

        Ok(stats)
    }

    async fn create_folder(&self, name: &str, parent_id: &str) -> ProvisionResult<String> {
        self.backend
            .create_folder(name, parent_id)
            .await
            .map_err(|e| ProvisionError::remote(RemoteOperation::CreateFolder, name, e))
    }

    async fn copy_file(
        &self,
        file_id: &str,
        new_name: &str,
        parent_id: &str,
    ) -> ProvisionResult<String> {
        self.backend
            .copy_file(file_id, new_name, parent_id)
            .await
            .map_err(|e| ProvisionError::remote(RemoteOperation::CopyFile, new_name, e))
    }

    async fn list_children(&self, folder_id: &str) -> ProvisionResult<Vec<RemoteNode>> {
        self.backend
            .list_children(folder_id)
            .await
            .map_err(|e| ProvisionError::remote(RemoteOperation::ListChildren, folder_id, e))
    }
}

//! Dry-run planning
//!
//! Walks the template with listing calls only and records what a real run
//! would create.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{TreeReplicator, WalkGuard};
use crate::backend::StorageBackend;
use crate::error::ProvisionResult;
use crate::node::partition_children;
use crate::settings::validate_organization_name;

/// A file copy that a run would perform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedFile {
    pub source_id: String,
    pub source_name: String,
    pub target_name: String,
}

impl PlannedFile {
    #[must_use]
    pub fn is_renamed(&self) -> bool {
        self.source_name != self.target_name
    }
}

/// A folder that a run would create, with everything below it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedFolder {
    pub name: String,
    pub source_id: String,
    pub files: Vec<PlannedFile>,
    pub folders: Vec<PlannedFolder>,
}

impl PlannedFolder {
    fn new(name: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_id: source_id.into(),
            files: Vec::new(),
            folders: Vec::new(),
        }
    }

    /// Number of folders below this one
    #[must_use]
    pub fn folder_count(&self) -> usize {
        self.folders
            .iter()
            .map(|f| 1 + f.folder_count())
            .sum()
    }

    /// Number of files in this folder and below
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len() + self.folders.iter().map(PlannedFolder::file_count).sum::<usize>()
    }

    fn descendant_mut(&mut self, path: &[usize]) -> &mut PlannedFolder {
        path.iter().fold(self, |node, &i| &mut node.folders[i])
    }

    fn render_into(&self, out: &mut String, indent: usize) {
        let pad = "  ".repeat(indent);
        out.push_str(&format!("{pad}{}/\n", self.name));
        for file in &self.files {
            let line = if file.is_renamed() {
                format!("{pad}  {} (from {})\n", file.target_name, file.source_name)
            } else {
                format!("{pad}  {}\n", file.target_name)
            };
            out.push_str(&line);
        }
        for folder in &self.folders {
            folder.render_into(out, indent + 1);
        }
    }
}

/// Pending unit of work on the planning stack
enum PlanStep {
    /// List a source folder into the node at `path` (child indexes from the root)
    Visit {
        source_id: String,
        path: Vec<usize>,
        depth: usize,
    },
    /// Subtree of a source folder is finished
    Leave { source_id: String },
}

/// Everything a provisioning run would create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationPlan {
    pub organization: String,
    pub destination_parent_id: String,
    pub root: PlannedFolder,
}

impl ReplicationPlan {
    /// Indented text tree, one entry per line
    #[must_use]
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        self.root.render_into(&mut out, 0);
        out
    }
}

impl<B: StorageBackend + ?Sized> TreeReplicator<'_, B> {
    /// Preview the tree `provision` would create, issuing only list calls
    pub async fn plan(&self, organization: &str) -> ProvisionResult<ReplicationPlan> {
        let organization = validate_organization_name(organization)?;
        let template_id = &self.settings.google_drive.template_folder_id;
        let rule = self.settings.rename_rule(organization);

        let mut root = PlannedFolder::new(self.settings.main_folder_name(organization), template_id);
        let mut guard = WalkGuard::new(self.settings.replication.max_depth);
        let mut pending = vec![PlanStep::Visit {
            source_id: template_id.clone(),
            path: Vec::new(),
            depth: 0,
        }];

        while let Some(step) = pending.pop() {
            let (source_id, path, depth) = match step {
                PlanStep::Visit {
                    source_id,
                    path,
                    depth,
                } => (source_id, path, depth),
                PlanStep::Leave { source_id } => {
                    guard.leave(&source_id);
                    continue;
                }
            };

            guard.enter(&source_id, depth)?;
            let (files, folders) = partition_children(self.list_children(&source_id).await?);
            debug!(
                folder_id = %source_id,
                files = files.len(),
                folders = folders.len(),
                "Planned folder"
            );

            let node = root.descendant_mut(&path);
            for file in files {
                let target_name = rule.apply(&file.name).to_string();
                node.files.push(PlannedFile {
                    source_id: file.id,
                    source_name: file.name,
                    target_name,
                });
            }
            for folder in &folders {
                node.folders.push(PlannedFolder::new(&folder.name, &folder.id));
            }

            pending.push(PlanStep::Leave { source_id });
            for (index, folder) in folders.into_iter().enumerate().rev() {
                let mut child_path = path.clone();
                child_path.push(index);
                pending.push(PlanStep::Visit {
                    source_id: folder.id,
                    path: child_path,
                    depth: depth + 1,
                });
            }
        }

        Ok(ReplicationPlan {
            organization: organization.to_string(),
            destination_parent_id: self.settings.google_drive.destination_folder_id.clone(),
            root,
        })
    }
}

//! In-memory storage backend for replication tests

#![allow(dead_code)]

use async_trait::async_trait;
use provisioner_core::{NodeKind, RemoteNode, Settings, StorageBackend, StorageError};
use std::collections::HashMap;
use std::sync::Mutex;

/// A remote call as observed by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create { name: String, parent_id: String },
    Copy { file_id: String, new_name: String, parent_id: String },
    List { folder_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Create,
    Copy,
    List,
}

#[derive(Default)]
struct State {
    nodes: HashMap<String, (String, NodeKind)>,
    children: HashMap<String, Vec<String>>,
    next_id: usize,
    calls: Vec<Call>,
    failure: Option<(Op, String, StorageError)>,
}

impl State {
    fn insert(&mut self, parent_id: &str, name: &str, kind: NodeKind) -> String {
        self.next_id += 1;
        let id = format!("node-{}", self.next_id);
        self.nodes.insert(id.clone(), (name.to_string(), kind));
        self.children
            .entry(parent_id.to_string())
            .or_default()
            .push(id.clone());
        id
    }

    fn check_failure(&self, op: Op, target: &str) -> Result<(), StorageError> {
        match &self.failure {
            Some((fail_op, fail_target, err)) if *fail_op == op && fail_target == target => {
                Err(err.clone())
            }
            _ => Ok(()),
        }
    }

    fn require_folder(&self, id: &str) -> Result<(), StorageError> {
        match self.nodes.get(id) {
            Some((_, NodeKind::Folder)) => Ok(()),
            _ => Err(StorageError::NotFound(format!("folder {id}"))),
        }
    }
}

/// Folder tree held in memory, recording every call made against it
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    /// Add a root-level folder (no parent)
    pub fn add_root(&self, name: &str) -> String {
        self.state.lock().unwrap().insert("", name, NodeKind::Folder)
    }

    pub fn add_folder(&self, parent_id: &str, name: &str) -> String {
        self.state
            .lock()
            .unwrap()
            .insert(parent_id, name, NodeKind::Folder)
    }

    pub fn add_file(&self, parent_id: &str, name: &str) -> String {
        self.state
            .lock()
            .unwrap()
            .insert(parent_id, name, NodeKind::File)
    }

    /// Make `child_id` also appear inside `parent_id`
    pub fn link(&self, parent_id: &str, child_id: &str) {
        self.state
            .lock()
            .unwrap()
            .children
            .entry(parent_id.to_string())
            .or_default()
            .push(child_id.to_string());
    }

    /// Fail calls of kind `op` whose target (name for create/copy, folder id
    /// for list) equals `target`
    pub fn fail_on(&self, op: Op, target: &str, err: StorageError) {
        self.state.lock().unwrap().failure = Some((op, target.to_string(), err));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn children_of(&self, folder_id: &str) -> Vec<RemoteNode> {
        let state = self.state.lock().unwrap();
        state
            .children
            .get(folder_id)
            .map(|ids| {
                ids.iter()
                    .map(|id| {
                        let (name, kind) = state.nodes[id].clone();
                        RemoteNode {
                            id: id.clone(),
                            name,
                            kind,
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every path below `folder_id`, folders suffixed with '/', sorted
    pub fn tree(&self, folder_id: &str) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect(folder_id, "", &mut paths);
        paths.sort();
        paths
    }

    fn collect(&self, folder_id: &str, prefix: &str, paths: &mut Vec<String>) {
        for node in self.children_of(folder_id) {
            let path = format!("{prefix}{}", node.name);
            if node.is_folder() {
                paths.push(format!("{path}/"));
                self.collect(&node.id, &format!("{path}/"), paths);
            } else {
                paths.push(path);
            }
        }
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    async fn create_folder(&self, name: &str, parent_id: &str) -> Result<String, StorageError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Create {
            name: name.to_string(),
            parent_id: parent_id.to_string(),
        });
        state.check_failure(Op::Create, name)?;
        state.require_folder(parent_id)?;
        Ok(state.insert(parent_id, name, NodeKind::Folder))
    }

    async fn copy_file(
        &self,
        file_id: &str,
        new_name: &str,
        parent_id: &str,
    ) -> Result<String, StorageError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Copy {
            file_id: file_id.to_string(),
            new_name: new_name.to_string(),
            parent_id: parent_id.to_string(),
        });
        state.check_failure(Op::Copy, new_name)?;
        match state.nodes.get(file_id) {
            Some((_, NodeKind::File)) => {}
            _ => return Err(StorageError::NotFound(format!("file {file_id}"))),
        }
        state.require_folder(parent_id)?;
        Ok(state.insert(parent_id, new_name, NodeKind::File))
    }

    async fn list_children(&self, folder_id: &str) -> Result<Vec<RemoteNode>, StorageError> {
        {
            let mut state = self.state.lock().unwrap();
            state.calls.push(Call::List {
                folder_id: folder_id.to_string(),
            });
            state.check_failure(Op::List, folder_id)?;
            state.require_folder(folder_id)?;
        }
        Ok(self.children_of(folder_id))
    }

    fn folder_url(&self, folder_id: &str) -> String {
        format!("memory://folders/{folder_id}")
    }
}

/// Settings pointing at the given template and destination
pub fn settings(template_id: &str, destination_id: &str) -> Settings {
    let json = format!(
        r#"{{
            "google_drive": {{
                "destination_folder_id": "{destination_id}",
                "template_folder_id": "{template_id}"
            }},
            "folder_structure": {{
                "main_folder_suffix": " - Client Folder",
                "user_list_original_name": "Authorized Users.xlsx",
                "user_list_suffix": " - Authorized Users.xlsx"
            }}
        }}"#
    );
    Settings::from_json(&json).expect("valid test settings")
}

//! Provisioning settings
//!
//! Settings are read once from a JSON file, validated eagerly, and then
//! shared by reference for the rest of the run.

mod error;

pub use error::{ConfigError, ConfigResult};

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::rename::RenameRule;

/// Default nesting limit for template folders
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Complete settings for a provisioning run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Where the template lives and where client folders are created
    pub google_drive: DriveLocations,
    /// Naming of the created folder and the designated list file
    pub folder_structure: FolderStructure,
    /// Walk limits
    #[serde(default)]
    pub replication: ReplicationLimits,
}

/// Remote folder identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveLocations {
    /// Parent folder that receives one new folder per client
    pub destination_folder_id: String,
    /// Root of the template tree
    pub template_folder_id: String,
}

/// Naming rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderStructure {
    /// Appended to the organization name for the top-level folder
    pub main_folder_suffix: String,
    /// Name of the template file that gets a per-client name
    pub user_list_original_name: String,
    /// Appended to the organization name for the renamed list file
    pub user_list_suffix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationLimits {
    /// Deepest template folder level that will be copied
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ReplicationLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Settings {
    /// Load and validate settings from a JSON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::IoError {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            }
        })?;

        let settings: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::JsonParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check that every required field is usable
    pub fn validate(&self) -> ConfigResult<()> {
        require("google_drive.destination_folder_id", &self.google_drive.destination_folder_id)?;
        require("google_drive.template_folder_id", &self.google_drive.template_folder_id)?;
        require("folder_structure.main_folder_suffix", &self.folder_structure.main_folder_suffix)?;
        require(
            "folder_structure.user_list_original_name",
            &self.folder_structure.user_list_original_name,
        )?;
        require("folder_structure.user_list_suffix", &self.folder_structure.user_list_suffix)?;

        if self.google_drive.destination_folder_id == self.google_drive.template_folder_id {
            return Err(ConfigError::ValidationError(
                "destination_folder_id must differ from template_folder_id".into(),
            ));
        }
        if self.replication.max_depth == 0 {
            return Err(ConfigError::ValidationError(
                "replication.max_depth must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Name of the top-level folder created for `organization`
    #[must_use]
    pub fn main_folder_name(&self, organization: &str) -> String {
        format!("{organization}{}", self.folder_structure.main_folder_suffix)
    }

    /// Rename rule for files copied on behalf of `organization`
    #[must_use]
    pub fn rename_rule(&self, organization: &str) -> RenameRule {
        RenameRule::for_organization(organization, &self.folder_structure)
    }
}

fn require(field: &str, value: &str) -> ConfigResult<()> {
    // Suffixes may start with a space, so only all-blank values are rejected
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField(field.to_string()));
    }
    Ok(())
}

/// Validate an organization name and return it trimmed
pub fn validate_organization_name(name: &str) -> ConfigResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::ValidationError(
            "Organization name cannot be empty".into(),
        ));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(ConfigError::ValidationError(
            "Organization name cannot contain control characters".into(),
        ));
    }
    Ok(trimmed)
}

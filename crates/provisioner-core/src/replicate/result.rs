//! Result records produced by a replication run

use serde::{Deserialize, Serialize};

use crate::error::ProvisionError;

/// Counters for a finished copy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyStats {
    /// Folders created below the destination root
    pub folders_created: usize,
    /// Files copied
    pub files_copied: usize,
}

/// The single record handed back to the invoking automation
///
/// Field names on the wire match what existing CI workflows consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationResult {
    /// Whether the whole tree was created
    pub success: bool,

    /// Identifier of the created top-level folder
    #[serde(rename = "folder_id", skip_serializing_if = "Option::is_none")]
    pub root_folder_id: Option<String>,

    /// Name of the created top-level folder
    #[serde(rename = "folder_name", skip_serializing_if = "Option::is_none")]
    pub root_folder_name: Option<String>,

    /// Browser URL of the created top-level folder
    #[serde(rename = "folder_url", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Description of the first failure
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Stable code for the first failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,

    /// Human-readable summary
    pub message: String,
}

impl ReplicationResult {
    /// Create a success result
    pub fn success(
        organization: &str,
        root_folder_id: impl Into<String>,
        root_folder_name: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            root_folder_id: Some(root_folder_id.into()),
            root_folder_name: Some(root_folder_name.into()),
            url: Some(url.into()),
            error_message: None,
            error_code: None,
            message: format!("Successfully created folder structure for {organization}"),
        }
    }

    /// Create a failure result for a run that started replicating
    #[must_use]
    pub fn failure(organization: &str, error: &ProvisionError) -> Self {
        Self {
            success: false,
            root_folder_id: None,
            root_folder_name: None,
            url: None,
            error_message: Some(error.to_string()),
            error_code: Some(error.code().to_string()),
            message: format!("Failed to create folder structure for {organization}"),
        }
    }

    /// Create a failure result for a dry run that could not finish its plan
    #[must_use]
    pub fn plan_failed(organization: &str, error: &ProvisionError) -> Self {
        Self {
            message: format!("Failed to plan folder structure for {organization}; nothing was created"),
            ..Self::failure(organization, error)
        }
    }

    /// Create a failure result for a run that never reached the storage backend
    #[must_use]
    pub fn aborted(error: &ProvisionError) -> Self {
        Self {
            success: false,
            root_folder_id: None,
            root_folder_name: None,
            url: None,
            error_message: Some(error.to_string()),
            error_code: Some(error.code().to_string()),
            message: format!("Provisioning aborted: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::StorageError;
    use crate::error::RemoteOperation;
    use serde_json::json;

    #[test]
    fn test_success_wire_shape() {
        let result = ReplicationResult::success(
            "Acme",
            "root-1",
            "Acme - Client Folder",
            "https://drive.google.com/drive/folders/root-1",
        );

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "folder_id": "root-1",
                "folder_name": "Acme - Client Folder",
                "folder_url": "https://drive.google.com/drive/folders/root-1",
                "message": "Successfully created folder structure for Acme"
            })
        );
    }

    #[test]
    fn test_failure_wire_shape() {
        let err = ProvisionError::remote(
            RemoteOperation::CopyFile,
            "ReadMe.txt",
            StorageError::QuotaExceeded("storageQuotaExceeded".into()),
        );
        let result = ReplicationResult::failure("Acme", &err);

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["error_code"], json!("REMOTE_COPY_FAILED"));
        assert!(value["error"].as_str().unwrap().contains("ReadMe.txt"));
        assert!(value.get("folder_id").is_none());
        assert!(value.get("folder_url").is_none());
    }

    #[test]
    fn test_plan_failed_message() {
        let err = ProvisionError::remote(
            RemoteOperation::ListChildren,
            "tmpl-1",
            StorageError::PermissionDenied("insufficientFilePermissions".into()),
        );
        let result = ReplicationResult::plan_failed("Acme", &err);

        assert!(!result.success);
        assert_eq!(
            result.message,
            "Failed to plan folder structure for Acme; nothing was created"
        );
        assert_eq!(result.error_code.as_deref(), Some("REMOTE_LIST_FAILED"));
    }
}

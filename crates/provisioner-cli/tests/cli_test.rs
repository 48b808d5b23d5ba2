//! CLI integration tests using assert_cmd
//!
//! These cover argument handling and every failure that happens before the
//! first Drive request, so no network access is needed.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const CONFIG: &str = r#"{
    "google_drive": {
        "destination_folder_id": "1DestinationFolder",
        "template_folder_id": "1TemplateFolder"
    },
    "folder_structure": {
        "main_folder_suffix": " - Client Folder",
        "user_list_original_name": "Authorized Users.xlsx",
        "user_list_suffix": " - Authorized Users.xlsx"
    }
}"#;

/// Get a command instance for the provisioner binary
fn provisioner_cmd() -> Command {
    let mut cmd = Command::cargo_bin("provisioner").expect("Failed to find provisioner binary");
    cmd.env_remove("GOOGLE_SERVICE_ACCOUNT_JSON")
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("config.json");
    fs::write(&path, CONFIG).unwrap();
    path
}

/// Run to completion, expect exit 1, and parse the JSON record from stdout
fn failure_record(cmd: &mut Command) -> Value {
    let output = cmd.assert().failure().code(1).get_output().clone();
    serde_json::from_slice(&output.stdout).expect("stdout holds one JSON record")
}

#[test]
fn test_help_command() {
    provisioner_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Provisioner - create a client folder structure from the Drive template",
        ))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_version_command() {
    provisioner_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("provisioner"));
}

#[test]
fn test_missing_organization_is_usage_error() {
    provisioner_cmd()
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("<ORGANIZATION>"));
}

#[test]
fn test_missing_config_file() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing.json");

    let record = failure_record(
        provisioner_cmd()
            .arg("--config")
            .arg(&missing)
            .arg("Acme Corp"),
    );

    assert_eq!(record["success"], Value::Bool(false));
    assert_eq!(record["error_code"], "CONFIG_NOT_FOUND");
    assert!(record["error"]
        .as_str()
        .unwrap()
        .contains("missing.json"));
    assert!(record.get("folder_id").is_none());
}

#[test]
fn test_invalid_config_json() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();

    let record = failure_record(provisioner_cmd().arg("-c").arg(&path).arg("Acme Corp"));

    assert_eq!(record["error_code"], "PARSE_ERROR");
}

#[test]
fn test_blank_organization() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp);

    let record = failure_record(provisioner_cmd().arg("-c").arg(&config).arg("   "));

    assert_eq!(record["success"], Value::Bool(false));
    assert_eq!(record["error_code"], "CONFIG_INVALID");
}

#[test]
fn test_missing_credentials() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp);

    let record = failure_record(provisioner_cmd().arg("-c").arg(&config).arg("Acme Corp"));

    assert_eq!(record["error_code"], "CREDENTIALS_MISSING");
    assert!(record["error"]
        .as_str()
        .unwrap()
        .contains("GOOGLE_SERVICE_ACCOUNT_JSON"));
}

#[test]
fn test_invalid_credentials_from_env() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp);

    let record = failure_record(
        provisioner_cmd()
            .env("GOOGLE_SERVICE_ACCOUNT_JSON", r#"{"type": "authorized_user"}"#)
            .arg("-c")
            .arg(&config)
            .arg("Acme Corp"),
    );

    assert_eq!(record["error_code"], "CREDENTIALS_INVALID");
}

#[test]
fn test_missing_credentials_file() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp);

    let record = failure_record(
        provisioner_cmd()
            .arg("-c")
            .arg(&config)
            .arg("--credentials-file")
            .arg(temp.path().join("key.json"))
            .arg("Acme Corp"),
    );

    assert_eq!(record["error_code"], "CREDENTIALS_INVALID");
}

#[test]
fn test_stdout_is_only_json_when_verbose() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp);

    let record = failure_record(
        provisioner_cmd()
            .arg("--verbose")
            .arg("-c")
            .arg(&config)
            .arg("Acme Corp"),
    );

    assert!(record["message"]
        .as_str()
        .unwrap()
        .starts_with("Provisioning aborted"));
}

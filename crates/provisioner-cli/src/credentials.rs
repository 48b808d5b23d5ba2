//! Service-account credential loading

use std::path::Path;

use provisioner_core::{ConfigError, ProvisionError};
use provisioner_gdrive::ServiceAccountKey;

/// Environment variable holding the key JSON when no file is given
pub const CREDENTIALS_ENV: &str = "GOOGLE_SERVICE_ACCOUNT_JSON";

/// Load the key from `credentials_file`, or from [`CREDENTIALS_ENV`]
pub fn load(credentials_file: Option<&Path>) -> Result<ServiceAccountKey, ProvisionError> {
    if let Some(path) = credentials_file {
        return Ok(ServiceAccountKey::from_file(path)?);
    }

    match std::env::var(CREDENTIALS_ENV) {
        Ok(json) if !json.trim().is_empty() => Ok(ServiceAccountKey::from_json(&json)?),
        _ => Err(ConfigError::MissingCredentials(format!(
            "{CREDENTIALS_ENV} environment variable not set"
        ))
        .into()),
    }
}

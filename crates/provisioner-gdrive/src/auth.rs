//! Service-account authentication
//!
//! Implements the OAuth2 JWT bearer grant: sign an RS256 assertion with the
//! service account's private key and trade it for an access token.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{DriveError, DriveResult};

/// Full read/write Drive scope
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

/// Google's OAuth2 token endpoint
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens are renewed this long before their reported expiry
const REFRESH_MARGIN_SECS: i64 = 60;

/// The subset of a downloaded service-account key file that is needed
#[derive(Deserialize)]
struct KeyFile {
    #[serde(rename = "type")]
    key_type: Option<String>,
    #[serde(default)]
    client_email: String,
    #[serde(default)]
    private_key: String,
    token_uri: Option<String>,
    project_id: Option<String>,
}

/// Parsed service-account credentials with a ready signing key
#[derive(Clone)]
pub struct ServiceAccountKey {
    client_email: String,
    token_uri: String,
    project_id: Option<String>,
    signing_key: EncodingKey,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

impl ServiceAccountKey {
    /// Parse a service-account key from its JSON text
    pub fn from_json(json: &str) -> DriveResult<Self> {
        let raw: KeyFile =
            serde_json::from_str(json).map_err(|e| DriveError::InvalidKey(e.to_string()))?;

        if let Some(key_type) = &raw.key_type {
            if key_type != "service_account" {
                return Err(DriveError::InvalidKey(format!(
                    "expected type 'service_account', found '{key_type}'"
                )));
            }
        }
        if raw.client_email.trim().is_empty() {
            return Err(DriveError::InvalidKey("missing client_email".into()));
        }
        if raw.private_key.trim().is_empty() {
            return Err(DriveError::InvalidKey("missing private_key".into()));
        }

        let signing_key = EncodingKey::from_rsa_pem(raw.private_key.as_bytes())
            .map_err(|e| DriveError::InvalidKey(format!("unusable private_key: {e}")))?;

        Ok(Self {
            client_email: raw.client_email,
            token_uri: raw
                .token_uri
                .filter(|uri| !uri.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            project_id: raw.project_id,
            signing_key,
        })
    }

    /// Read and parse a service-account key file
    pub fn from_file(path: &Path) -> DriveResult<Self> {
        let json = fs::read_to_string(path).map_err(|e| DriveError::KeyFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    #[must_use]
    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    #[must_use]
    pub fn token_uri(&self) -> &str {
        &self.token_uri
    }

    /// Signed JWT asserting this account's identity for the Drive scope
    pub fn assertion(&self, issued_at: DateTime<Utc>) -> DriveResult<String> {
        let iat = issued_at.timestamp();
        let claims = Claims {
            iss: &self.client_email,
            scope: DRIVE_SCOPE,
            aud: &self.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };
        encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)
            .map_err(|e| DriveError::InvalidKey(format!("failed to sign assertion: {e}")))
    }

    /// Exchange a fresh assertion for an access token
    pub async fn fetch_token(&self, http: &Client) -> DriveResult<AccessToken> {
        let now = Utc::now();
        let assertion = self.assertion(now)?;

        debug!(token_uri = %self.token_uri, client_email = %self.client_email, "Requesting access token");
        let response = http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(err) => match err.error_description {
                    Some(description) => format!("{}: {description}", err.error),
                    None => err.error,
                },
                Err(_) if body.is_empty() => format!("HTTP {status}"),
                Err(_) => format!("HTTP {status}: {body}"),
            };
            return Err(DriveError::TokenExchange(detail));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| DriveError::TokenExchange(format!("malformed token response: {e}")))?;

        info!(client_email = %self.client_email, "Authenticated with service account");
        Ok(AccessToken {
            value: token.access_token,
            expires_at: token.expires_in.map(|secs| now + Duration::seconds(secs)),
        })
    }
}

/// Bearer token for Drive API calls
#[derive(Clone)]
pub struct AccessToken {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Wrap an already-issued token
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expires_at: None,
        }
    }

    /// Wrap an already-issued token that stops working at `expires_at`
    pub fn with_expiry(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            expires_at: Some(expires_at),
        }
    }

    #[must_use]
    pub fn secret(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }

    /// Expired, or close enough to expiry that the next call may fail
    #[must_use]
    pub fn needs_refresh(&self) -> bool {
        self.expires_at
            .is_some_and(|at| at - Duration::seconds(REFRESH_MARGIN_SECS) <= Utc::now())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

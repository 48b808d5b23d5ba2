//! Google Drive v3 client

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

use provisioner_core::{RemoteNode, StorageBackend, StorageError};

use crate::auth::{AccessToken, ServiceAccountKey};
use crate::error::{DriveError, DriveResult};
use crate::types::{
    CopyFileRequest, CreateFolderRequest, CreatedFile, ErrorEnvelope, FileList, FOLDER_MIME_TYPE,
};

/// Production Drive API root
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/drive/v3";

const FOLDER_URL_BASE: &str = "https://drive.google.com/drive/folders";
const LIST_FIELDS: &str = "nextPageToken,files(id,name,mimeType)";
const LIST_PAGE_SIZE: &str = "1000";

/// Error reasons Google uses for storage and rate quotas
const QUOTA_REASONS: &[&str] = &[
    "storageQuotaExceeded",
    "quotaExceeded",
    "dailyLimitExceeded",
    "userRateLimitExceeded",
    "rateLimitExceeded",
    "teamDriveFileLimitExceeded",
];

/// Authenticated Drive session implementing [`StorageBackend`]
///
/// Works against My Drive and shared drives alike. With a service-account
/// key attached, the access token is renewed before it expires.
pub struct DriveClient {
    http: Client,
    base_url: String,
    token: Mutex<AccessToken>,
    key: Option<ServiceAccountKey>,
}

/// HTTP client with the timeouts used for every Drive and token request
pub fn http_client() -> DriveResult<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(format!("client-provisioner/{}", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

impl DriveClient {
    /// Create a client for `base_url` using an existing token
    pub fn new(http: Client, base_url: &str, token: AccessToken) -> DriveResult<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(DriveError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got '{base_url}'"
            )));
        }
        Ok(Self {
            http,
            base_url,
            token: Mutex::new(token),
            key: None,
        })
    }

    /// Renew the token with `key` whenever it is about to expire
    #[must_use]
    pub fn with_refresh(mut self, key: ServiceAccountKey) -> Self {
        self.key = Some(key);
        self
    }

    /// Authenticate `key` and connect to the production Drive API
    pub async fn connect(key: &ServiceAccountKey) -> DriveResult<Self> {
        let http = http_client()?;
        let token = key.fetch_token(&http).await?;
        Ok(Self::new(http, DEFAULT_API_BASE, token)?.with_refresh(key.clone()))
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn files_url(&self) -> String {
        format!("{}/files", self.base_url)
    }

    /// Current bearer token, renewed first if it is about to expire
    async fn bearer(&self) -> Result<String, StorageError> {
        let mut token = self.token.lock().await;
        if let Some(key) = &self.key {
            if token.needs_refresh() {
                info!(expires_at = ?token.expires_at(), "Refreshing access token");
                *token = key
                    .fetch_token(&self.http)
                    .await
                    .map_err(|e| StorageError::Unauthorized(format!("token refresh failed: {e}")))?;
            }
        }
        Ok(token.secret().to_string())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StorageError> {
        let token = self.bearer().await?;
        request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| StorageError::Transport(e.to_string()))
    }
}

/// Decode a success body or classify a failure response
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StorageError> {
    let status = response.status();
    if status.is_success() {
        response
            .json::<T>()
            .await
            .map_err(|e| StorageError::InvalidResponse(e.to_string()))
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(classify_failure(status.as_u16(), &body))
    }
}

/// Map a non-success Drive response to a [`StorageError`]
#[must_use]
pub fn classify_failure(status: u16, body: &str) -> StorageError {
    let (message, reasons) = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => (
            envelope.error.message,
            envelope
                .error
                .errors
                .into_iter()
                .map(|d| d.reason)
                .collect::<Vec<_>>(),
        ),
        Err(_) => (body.trim().to_string(), Vec::new()),
    };
    let message = if message.is_empty() {
        format!("HTTP {status}")
    } else {
        message
    };
    let is_quota = reasons.iter().any(|r| QUOTA_REASONS.contains(&r.as_str()));

    match status {
        401 => StorageError::Unauthorized(message),
        429 => StorageError::QuotaExceeded(message),
        403 if is_quota => StorageError::QuotaExceeded(message),
        403 => StorageError::PermissionDenied(message),
        404 => StorageError::NotFound(message),
        _ => StorageError::Api { status, message },
    }
}

/// Quote a value for use inside a Drive search query string literal
fn quote_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

#[async_trait]
impl StorageBackend for DriveClient {
    fn name(&self) -> &str {
        "Google Drive"
    }

    async fn create_folder(&self, name: &str, parent_id: &str) -> Result<String, StorageError> {
        debug!(folder = name, parent_id, "files.create");
        let request = self
            .http
            .post(self.files_url())
            .query(&[("fields", "id"), ("supportsAllDrives", "true")])
            .json(&CreateFolderRequest {
                name,
                mime_type: FOLDER_MIME_TYPE,
                parents: [parent_id],
            });
        let created: CreatedFile = decode(self.send(request).await?).await?;
        Ok(created.id)
    }

    async fn copy_file(
        &self,
        file_id: &str,
        new_name: &str,
        parent_id: &str,
    ) -> Result<String, StorageError> {
        debug!(file_id, new_name, parent_id, "files.copy");
        let request = self
            .http
            .post(format!("{}/{file_id}/copy", self.files_url()))
            .query(&[("fields", "id"), ("supportsAllDrives", "true")])
            .json(&CopyFileRequest {
                name: new_name,
                parents: [parent_id],
            });
        let created: CreatedFile = decode(self.send(request).await?).await?;
        Ok(created.id)
    }

    async fn list_children(&self, folder_id: &str) -> Result<Vec<RemoteNode>, StorageError> {
        let query = format!(
            "'{}' in parents and trashed=false",
            quote_query_value(folder_id)
        );
        let mut children = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            debug!(folder_id, page_token = ?page_token, "files.list");
            let mut request = self.http.get(self.files_url()).query(&[
                ("q", query.as_str()),
                ("fields", LIST_FIELDS),
                ("pageSize", LIST_PAGE_SIZE),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let page: FileList = decode(self.send(request).await?).await?;
            children.extend(page.files.into_iter().map(|f| f.into_node()));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(children)
    }

    fn folder_url(&self, folder_id: &str) -> String {
        format!("{FOLDER_URL_BASE}/{folder_id}")
    }
}

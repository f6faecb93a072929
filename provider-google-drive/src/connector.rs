//! Google Drive API connector implementation
//!
//! Implements the `RemoteStorage` trait for Google Drive API v3.

use async_trait::async_trait;
use bridge_traits::error::Result;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
use bridge_traits::storage::{FileUpload, RemoteDeletion, RemoteFolder, RemoteStorage, StoredFile};
use bytes::{BufMut, Bytes, BytesMut};
use core_runtime::config::{CoreConfig, DEFAULT_DRIVE_API_BASE, DEFAULT_DRIVE_UPLOAD_BASE};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::GoogleDriveError;
use crate::types::{
    CreateFileRequest, DriveErrorResponse, DriveFile, FilesListResponse, FOLDER_MIME_TYPE,
};

/// Fields to request for file resources
const FILE_FIELDS: &str = "id,name,parents";

/// Google Drive API connector
///
/// Implements `RemoteStorage` for Google Drive API v3.
///
/// # Features
///
/// - Folder lookup ordered by creation time, so duplicates resolve to the oldest
/// - `multipart/related` uploads (metadata + media in one request)
/// - 404/410 on delete reported as [`RemoteDeletion::NotFound`]
/// - Remote error messages (`error.message`) surfaced to callers
///
/// # Example
///
/// ```ignore
/// use provider_google_drive::GoogleDriveConnector;
/// use bridge_traits::storage::RemoteStorage;
///
/// let connector = GoogleDriveConnector::new(http_client);
/// let folder = connector.find_folder(token, "Album-Boda", None).await?;
/// ```
pub struct GoogleDriveConnector {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    api_base: String,
    upload_base: String,
    request_timeout: Duration,
    upload_timeout: Duration,
}

impl GoogleDriveConnector {
    /// Create a connector against the public Drive endpoints
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            api_base: DEFAULT_DRIVE_API_BASE.to_string(),
            upload_base: DEFAULT_DRIVE_UPLOAD_BASE.to_string(),
            request_timeout: Duration::from_secs(30),
            upload_timeout: Duration::from_secs(120),
        }
    }

    /// Create a connector using the endpoints and timeouts from `config`
    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(Arc::clone(&config.http_client))
            .with_endpoints(&config.drive_api_base, &config.drive_upload_base)
            .with_timeouts(config.request_timeout, config.upload_timeout)
    }

    pub fn with_endpoints(mut self, api_base: &str, upload_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self.upload_base = upload_base.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeouts(mut self, request_timeout: Duration, upload_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self.upload_timeout = upload_timeout;
        self
    }

    /// Escape a value for use inside a single-quoted Drive query literal
    fn escape_query_value(value: &str) -> String {
        value.replace('\\', "\\\\").replace('\'', "\\'")
    }

    /// Build the `q` expression for a folder lookup
    fn folder_query(name: &str, parent_id: Option<&str>) -> String {
        format!(
            "name='{}' and '{}' in parents and mimeType='{}' and trashed=false",
            Self::escape_query_value(name),
            Self::escape_query_value(parent_id.unwrap_or("root")),
            FOLDER_MIME_TYPE
        )
    }

    /// Pull `error.message` out of a Drive error body, falling back to raw text
    fn error_message(response: &HttpResponse) -> String {
        match serde_json::from_slice::<DriveErrorResponse>(&response.body) {
            Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
            _ => {
                let text = String::from_utf8_lossy(&response.body).trim().to_string();
                if text.is_empty() {
                    format!("HTTP {}", response.status)
                } else {
                    text
                }
            }
        }
    }

    fn check_status(response: &HttpResponse) -> std::result::Result<(), GoogleDriveError> {
        if response.is_success() {
            return Ok(());
        }
        let message = Self::error_message(response);
        warn!(status = response.status, message = %message, "Drive API request failed");
        Err(GoogleDriveError::from_status(response.status, message))
    }

    fn parse_file(response: &HttpResponse, context: &str) -> std::result::Result<DriveFile, GoogleDriveError> {
        serde_json::from_slice(&response.body)
            .map_err(|e| GoogleDriveError::ParseError(format!("Failed to parse {}: {}", context, e)))
    }

    /// Assemble a `multipart/related` body: JSON metadata then raw media.
    fn multipart_body(boundary: &str, metadata: &[u8], upload: &FileUpload) -> Bytes {
        let mut body = BytesMut::with_capacity(upload.size() + metadata.len() + 256);

        body.put_slice(format!("--{}\r\n", boundary).as_bytes());
        body.put_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
        body.put_slice(metadata);
        body.put_slice(b"\r\n");

        body.put_slice(format!("--{}\r\n", boundary).as_bytes());
        body.put_slice(format!("Content-Type: {}\r\n\r\n", upload.mime_type).as_bytes());
        body.put_slice(&upload.content);
        body.put_slice(b"\r\n");

        body.put_slice(format!("--{}--\r\n", boundary).as_bytes());
        body.freeze()
    }
}

#[async_trait]
impl RemoteStorage for GoogleDriveConnector {
    #[instrument(skip(self, access_token), fields(parent = ?parent_id))]
    async fn find_folder(
        &self,
        access_token: &str,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<Option<RemoteFolder>> {
        let url = format!(
            "{}/files?q={}&spaces=drive&orderBy=createdTime&pageSize=1&fields=files({})&supportsAllDrives=true&includeItemsFromAllDrives=true",
            self.api_base,
            urlencoding::encode(&Self::folder_query(name, parent_id)),
            FILE_FIELDS
        );

        let request = HttpRequest::new(HttpMethod::Get, url)
            .bearer_token(access_token)
            .header("Accept", "application/json")
            .timeout(self.request_timeout);

        let response = self
            .http_client
            .execute_with_retry(request, RetryPolicy::default())
            .await?;
        Self::check_status(&response)?;

        let list: FilesListResponse = serde_json::from_slice(&response.body).map_err(|e| {
            GoogleDriveError::ParseError(format!("Failed to parse files list response: {}", e))
        })?;

        let folder = list.files.into_iter().next().map(|file| RemoteFolder {
            id: file.id,
            name: file.name,
            parent_id: parent_id.map(str::to_string),
        });

        debug!(found = folder.is_some(), "Folder lookup finished");
        Ok(folder)
    }

    #[instrument(skip(self, access_token), fields(parent = ?parent_id))]
    async fn create_folder(
        &self,
        access_token: &str,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<RemoteFolder> {
        let url = format!(
            "{}/files?supportsAllDrives=true&fields={}",
            self.api_base, FILE_FIELDS
        );

        let body = CreateFileRequest {
            name,
            mime_type: Some(FOLDER_MIME_TYPE),
            parents: parent_id.into_iter().collect(),
        };

        let request = HttpRequest::new(HttpMethod::Post, url)
            .bearer_token(access_token)
            .timeout(self.request_timeout)
            .json(&body)?;

        // Not idempotent: a replayed create would leave a duplicate folder.
        let response = self
            .http_client
            .execute_with_retry(request, RetryPolicy::no_retry())
            .await?;
        Self::check_status(&response)?;

        let file = Self::parse_file(&response, "created folder")?;
        info!(folder_id = %file.id, "Created Drive folder");

        Ok(RemoteFolder {
            id: file.id,
            name: if file.name.is_empty() {
                name.to_string()
            } else {
                file.name
            },
            parent_id: parent_id.map(str::to_string),
        })
    }

    #[instrument(skip(self, access_token, upload), fields(file_name = %upload.name, size = upload.size()))]
    async fn upload_file(
        &self,
        access_token: &str,
        upload: &FileUpload,
        folder_id: &str,
    ) -> Result<StoredFile> {
        let url = format!(
            "{}/files?uploadType=multipart&supportsAllDrives=true&fields={}",
            self.upload_base, FILE_FIELDS
        );

        let metadata = serde_json::to_vec(&CreateFileRequest {
            name: &upload.name,
            mime_type: None,
            parents: vec![folder_id],
        })
        .map_err(|e| GoogleDriveError::ParseError(format!("Failed to encode metadata: {}", e)))?;

        let boundary = format!("album_admin_{}", Uuid::new_v4().simple());
        let body = Self::multipart_body(&boundary, &metadata, upload);

        let request = HttpRequest::new(HttpMethod::Post, url)
            .bearer_token(access_token)
            .header(
                "Content-Type",
                format!("multipart/related; boundary={}", boundary),
            )
            .body(body)
            .timeout(self.upload_timeout);

        let response = self
            .http_client
            .execute_with_retry(request, RetryPolicy::no_retry())
            .await?;
        Self::check_status(&response)?;

        let file = Self::parse_file(&response, "upload response")?;
        info!(file_id = %file.id, "Uploaded file to Drive");

        Ok(StoredFile {
            id: file.id,
            name: if file.name.is_empty() {
                upload.name.clone()
            } else {
                file.name
            },
            folder_id: file
                .parents
                .into_iter()
                .next()
                .or_else(|| Some(folder_id.to_string())),
        })
    }

    #[instrument(skip(self, access_token))]
    async fn delete_file(&self, access_token: &str, file_id: &str) -> Result<RemoteDeletion> {
        let url = format!(
            "{}/files/{}?supportsAllDrives=true",
            self.api_base,
            urlencoding::encode(file_id)
        );

        let request = HttpRequest::new(HttpMethod::Delete, url)
            .bearer_token(access_token)
            .timeout(self.request_timeout);

        let response = self
            .http_client
            .execute_with_retry(request, RetryPolicy::default())
            .await?;

        match response.status {
            404 | 410 => {
                debug!("File already gone");
                Ok(RemoteDeletion::NotFound)
            }
            _ => {
                Self::check_status(&response)?;
                Ok(RemoteDeletion::Deleted)
            }
        }
    }
}

//! # Core Configuration Module
//!
//! Provides configuration management for the album admin core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds all bridges and settings the core needs. It enforces
//! fail-fast validation so missing capabilities are reported before any
//! remote call is attempted.
//!
//! ## Required Dependencies
//!
//! - `HttpClient` - Drive API traffic (desktop default: reqwest)
//! - `DocumentStore` - Album/photo metadata (desktop default: SQLite at `database_path`)
//!
//! When the `desktop-shims` feature is enabled, a `ReqwestHttpClient` is
//! injected automatically if none is provided, and a missing document store is
//! opened at `database_path` by the service bootstrap. Without the feature,
//! both bridges must be injected.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let config = CoreConfig::builder()
//!     .http_client(Arc::new(MyHttpClient))
//!     .document_store(Arc::new(MyDocumentStore))
//!     .album_root_folder_name("Album-Boda")
//!     .upload_timeout(Duration::from_secs(300))
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//!
//! // Without desktop-shims this fails with Error::CapabilityMissing
//! let config = CoreConfig::builder().build();
//! assert!(config.is_err());
//! ```

use crate::error::{Error, Result};
use bridge_traits::{DocumentStore, HttpClient};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Default name of the top-level Drive folder holding every album.
pub const DEFAULT_ALBUM_ROOT_FOLDER: &str = "Album-Boda";

/// Default name of the folder (under the album root) holding the cover image.
pub const DEFAULT_COVER_FOLDER: &str = "cover";

/// Drive v3 metadata endpoint.
pub const DEFAULT_DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Drive v3 media upload endpoint.
pub const DEFAULT_DRIVE_UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";

/// Public download address; `{id}` is replaced by the Drive file id.
pub const DEFAULT_PUBLIC_URL_TEMPLATE: &str = "https://drive.google.com/uc?id={id}&export=download";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Core configuration for the album admin core.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// SQLite file backing the default document store
    pub database_path: Option<PathBuf>,

    /// HTTP client for Drive API requests
    pub http_client: Arc<dyn HttpClient>,

    /// Metadata store; `None` only when a desktop default will be opened at
    /// `database_path`
    pub document_store: Option<Arc<dyn DocumentStore>>,

    /// Top-level Drive folder for all albums
    pub album_root_folder_name: String,

    /// Folder under the album root that holds the cover image
    pub cover_folder_name: String,

    /// Base URL for Drive metadata calls
    pub drive_api_base: String,

    /// Base URL for Drive media uploads
    pub drive_upload_base: String,

    /// Public address template, must contain `{id}`
    pub public_url_template: String,

    /// Timeout applied to folder and delete requests
    pub request_timeout: Duration,

    /// Timeout applied to each upload request
    pub upload_timeout: Duration,

    /// Event bus buffer size
    pub event_buffer_size: usize,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("database_path", &self.database_path)
            .field("http_client", &"HttpClient { ... }")
            .field(
                "document_store",
                &self
                    .document_store
                    .as_ref()
                    .map(|_| "DocumentStore { ... }"),
            )
            .field("album_root_folder_name", &self.album_root_folder_name)
            .field("cover_folder_name", &self.cover_folder_name)
            .field("drive_api_base", &self.drive_api_base)
            .field("drive_upload_base", &self.drive_upload_base)
            .field("public_url_template", &self.public_url_template)
            .field("request_timeout", &self.request_timeout)
            .field("upload_timeout", &self.upload_timeout)
            .field("event_buffer_size", &self.event_buffer_size)
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Folder names are not blank
    /// - The public URL template contains `{id}`
    /// - Timeouts and the event buffer are non-zero
    /// - A document store is available or can be opened
    pub fn validate(&self) -> Result<()> {
        if self.album_root_folder_name.trim().is_empty() {
            return Err(Error::Config(
                "Album root folder name cannot be empty".to_string(),
            ));
        }

        if self.cover_folder_name.trim().is_empty() {
            return Err(Error::Config("Cover folder name cannot be empty".to_string()));
        }

        if !self.public_url_template.contains("{id}") {
            return Err(Error::Config(format!(
                "Public URL template must contain '{{id}}': {}",
                self.public_url_template
            )));
        }

        if self.drive_api_base.is_empty() || self.drive_upload_base.is_empty() {
            return Err(Error::Config("Drive base URLs cannot be empty".to_string()));
        }

        if self.request_timeout.is_zero() || self.upload_timeout.is_zero() {
            return Err(Error::Config(
                "Request and upload timeouts must be greater than zero".to_string(),
            ));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.document_store.is_none() {
            ensure_default_document_store(self.database_path.as_ref())?;
        }

        Ok(())
    }

    /// Public address for a Drive file id.
    pub fn public_url(&self, file_id: &str) -> String {
        self.public_url_template.replace("{id}", file_id)
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "HttpClient implementation is required for Drive API access. \
                 Desktop: enable the 'desktop-shims' feature to use the default ReqwestHttpClient. \
                 Other hosts: inject an HttpClient that honours per-request timeouts."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    Err(http_client_missing_error())
}

#[cfg(feature = "desktop-shims")]
fn ensure_default_document_store(database_path: Option<&PathBuf>) -> Result<()> {
    match database_path {
        Some(path) if !path.as_os_str().is_empty() => Ok(()),
        _ => Err(Error::Config(
            "Database path is required when no DocumentStore is injected. \
             Use .database_path() to set it."
                .to_string(),
        )),
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn ensure_default_document_store(_database_path: Option<&PathBuf>) -> Result<()> {
    Err(Error::CapabilityMissing {
        capability: "DocumentStore".to_string(),
        message: "DocumentStore implementation is required for album metadata. \
                 Desktop: enable the 'desktop-shims' feature to use the default SqliteDocumentStore. \
                 Other hosts: inject a DocumentStore backed by the host database."
            .to_string(),
    })
}

/// Builder for constructing [`CoreConfig`] instances.
///
/// Call [`build()`](CoreConfigBuilder::build) to validate and create the final
/// config.
#[derive(Default)]
pub struct CoreConfigBuilder {
    database_path: Option<PathBuf>,
    http_client: Option<Arc<dyn HttpClient>>,
    document_store: Option<Arc<dyn DocumentStore>>,
    album_root_folder_name: Option<String>,
    cover_folder_name: Option<String>,
    drive_api_base: Option<String>,
    drive_upload_base: Option<String>,
    public_url_template: Option<String>,
    request_timeout: Option<Duration>,
    upload_timeout: Option<Duration>,
    event_buffer_size: Option<usize>,
}

impl CoreConfigBuilder {
    /// Sets the database path used by the default SQLite document store.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_runtime::config::CoreConfig;
    ///
    /// let builder = CoreConfig::builder()
    ///     .database_path("/path/to/album-admin.db");
    /// ```
    pub fn database_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.database_path = Some(path.into());
        self
    }

    /// Sets the HTTP client implementation.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the metadata store implementation.
    pub fn document_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.document_store = Some(store);
        self
    }

    /// Sets the top-level Drive folder name (default `Album-Boda`).
    pub fn album_root_folder_name(mut self, name: impl Into<String>) -> Self {
        self.album_root_folder_name = Some(name.into());
        self
    }

    /// Sets the cover folder name (default `cover`).
    pub fn cover_folder_name(mut self, name: impl Into<String>) -> Self {
        self.cover_folder_name = Some(name.into());
        self
    }

    /// Overrides the Drive metadata endpoint.
    pub fn drive_api_base(mut self, base: impl Into<String>) -> Self {
        self.drive_api_base = Some(base.into());
        self
    }

    /// Overrides the Drive upload endpoint.
    pub fn drive_upload_base(mut self, base: impl Into<String>) -> Self {
        self.drive_upload_base = Some(base.into());
        self
    }

    /// Overrides the public address template. Must contain `{id}`.
    pub fn public_url_template(mut self, template: impl Into<String>) -> Self {
        self.public_url_template = Some(template.into());
        self
    }

    /// Timeout for folder and delete requests (default 30 s).
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Timeout for each upload request (default 120 s).
    pub fn upload_timeout(mut self, timeout: Duration) -> Self {
        self.upload_timeout = Some(timeout);
        self
    }

    /// Event bus buffer size (default 100).
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// # Returns
    ///
    /// Returns `Ok(CoreConfig)` on success, or an error if:
    /// - A required bridge is missing and no desktop default is available
    /// - Configuration values are invalid
    pub fn build(self) -> Result<CoreConfig> {
        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client()?,
        };

        let config = CoreConfig {
            database_path: self.database_path,
            http_client,
            document_store: self.document_store,
            album_root_folder_name: self
                .album_root_folder_name
                .unwrap_or_else(|| DEFAULT_ALBUM_ROOT_FOLDER.to_string()),
            cover_folder_name: self
                .cover_folder_name
                .unwrap_or_else(|| DEFAULT_COVER_FOLDER.to_string()),
            drive_api_base: self
                .drive_api_base
                .unwrap_or_else(|| DEFAULT_DRIVE_API_BASE.to_string()),
            drive_upload_base: self
                .drive_upload_base
                .unwrap_or_else(|| DEFAULT_DRIVE_UPLOAD_BASE.to_string()),
            public_url_template: self
                .public_url_template
                .unwrap_or_else(|| DEFAULT_PUBLIC_URL_TEMPLATE.to_string()),
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            upload_timeout: self.upload_timeout.unwrap_or(DEFAULT_UPLOAD_TIMEOUT),
            event_buffer_size: self
                .event_buffer_size
                .unwrap_or(crate::events::DEFAULT_EVENT_BUFFER_SIZE),
        };

        config.validate()?;

        Ok(config)
    }
}

//! # Host Bridge Traits
//!
//! Platform abstraction traits that the album core depends on but that are
//! implemented outside of it.
//!
//! ## Overview
//!
//! This crate defines the contract between the core library and concrete
//! adapters. Each trait represents a capability the core requires but must not
//! hard-wire: the HTTP stack, the cloud file host, and the metadata database.
//!
//! ## Traits
//!
//! ### Networking
//! - [`HttpClient`](http::HttpClient) - Async HTTP operations with retry policy and timeouts
//! - [`RemoteStorage`](storage::RemoteStorage) - Folder lookup/creation, upload and delete on a file host
//!
//! ### Persistence
//! - [`DocumentStore`](document::DocumentStore) - Collection/document metadata store
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Implementations
//!
//! | Capability | Implementation |
//! |------------|----------------|
//! | `HttpClient` | `bridge-desktop::ReqwestHttpClient` |
//! | `DocumentStore` | `bridge-desktop::SqliteDocumentStore` |
//! | `RemoteStorage` | `provider-google-drive::GoogleDriveConnector` |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type.
//! Implementations should convert library-specific errors to `BridgeError`
//! with actionable messages, and use
//! [`BridgeError::RemoteRejected`](error::BridgeError::RemoteRejected) when a
//! remote service answered with a failure status so callers can surface the
//! remote message.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds so adapters can be shared
//! behind `Arc` across async tasks.

pub mod document;
pub mod error;
pub mod http;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use document::{Document, DocumentStore};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use storage::{FileUpload, RemoteDeletion, RemoteFolder, RemoteStorage, StoredFile};
pub use time::{Clock, FixedClock, LogEntry, LogLevel, LoggerSink, SystemClock};

//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop hosts
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest`
//! - `DocumentStore` using a SQLite-backed collection table
//!
//! The Google Drive `RemoteStorage` adapter lives in `provider-google-drive`
//! and runs on top of [`ReqwestHttpClient`].
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ReqwestHttpClient, SqliteDocumentStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> bridge_traits::error::Result<()> {
//!     let http_client = Arc::new(ReqwestHttpClient::new());
//!     let store = Arc::new(SqliteDocumentStore::new("album-admin.db".into()).await?);
//!
//!     // Use in core configuration
//!     Ok(())
//! }
//! ```

mod document_store;
mod http;

pub use document_store::SqliteDocumentStore;
pub use http::ReqwestHttpClient;

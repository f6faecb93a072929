//! # Google Drive Provider
//!
//! Implements `RemoteStorage` for Google Drive API v3.
//!
//! ## Overview
//!
//! This module provides:
//! - Folder lookup by name and parent, oldest match first
//! - Folder creation
//! - Multipart (metadata + media) uploads
//! - File deletion with "already gone" detection
//!
//! Reads and deletes go through the bridge client's retry policy; folder
//! creation and uploads are sent exactly once.

pub mod connector;
pub mod error;
pub mod types;

pub use connector::GoogleDriveConnector;
pub use error::{GoogleDriveError, Result};

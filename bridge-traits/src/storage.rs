//! Remote File Storage Abstraction
//!
//! Describes the small slice of a cloud file host the album core relies on:
//! folder lookup and creation, single-file upload and delete. Every call takes
//! the bearer token explicitly; implementations hold no session state.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A folder on the remote host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFolder {
    pub id: String,
    pub name: String,
    /// `None` when the folder sits at the top of the drive
    pub parent_id: Option<String>,
}

/// Binary payload handed to [`RemoteStorage::upload_file`].
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub name: String,
    pub content: Bytes,
    pub mime_type: String,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, content: Bytes, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content,
            mime_type: mime_type.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// File created on the remote host by an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub id: String,
    pub name: String,
    pub folder_id: Option<String>,
}

/// Result of a remote delete call that reached the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteDeletion {
    /// The file existed and was removed
    Deleted,
    /// The host reported the file as already gone
    NotFound,
}

/// Remote file storage trait
///
/// Implemented per provider (desktop ships Google Drive). Implementations
/// must translate a "not found" answer on delete into
/// [`RemoteDeletion::NotFound`] instead of an error, and report every other
/// non-2xx answer as [`BridgeError::RemoteRejected`](crate::BridgeError::RemoteRejected).
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::RemoteStorage;
///
/// async fn ensure_folder(storage: &dyn RemoteStorage, token: &str) -> Result<String> {
///     match storage.find_folder(token, "Album-Boda", None).await? {
///         Some(folder) => Ok(folder.id),
///         None => Ok(storage.create_folder(token, "Album-Boda", None).await?.id),
///     }
/// }
/// ```
#[async_trait]
pub trait RemoteStorage: Send + Sync {
    /// Find a non-trashed folder named `name` directly under `parent_id`
    /// (or at the top of the drive when `parent_id` is `None`).
    ///
    /// When several folders match, the oldest one is returned.
    async fn find_folder(
        &self,
        access_token: &str,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<Option<RemoteFolder>>;

    /// Create a folder named `name` under `parent_id`
    async fn create_folder(
        &self,
        access_token: &str,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<RemoteFolder>;

    /// Upload a single file into `folder_id`
    async fn upload_file(
        &self,
        access_token: &str,
        upload: &FileUpload,
        folder_id: &str,
    ) -> Result<StoredFile>;

    /// Delete a file by id
    async fn delete_file(&self, access_token: &str, file_id: &str) -> Result<RemoteDeletion>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_upload_size() {
        let upload = FileUpload::new("a.jpg", Bytes::from_static(b"12345"), "image/jpeg");
        assert_eq!(upload.size(), 5);
        assert_eq!(upload.mime_type, "image/jpeg");
    }
}

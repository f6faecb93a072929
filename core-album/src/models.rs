//! Domain models for the album catalog
//!
//! Albums and photos are persisted in the metadata store; uploads and delete
//! outcomes are transient values returned by the services.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BestEffortError;

/// MIME types accepted for photos and the cover image.
pub const ACCEPTED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Check a MIME type against [`ACCEPTED_IMAGE_TYPES`], ignoring case.
pub fn is_accepted_image(mime_type: &str) -> bool {
    ACCEPTED_IMAGE_TYPES
        .iter()
        .any(|accepted| accepted.eq_ignore_ascii_case(mime_type.trim()))
}

// =============================================================================
// Catalog
// =============================================================================

/// A logical photo container, backed by one remote folder named after its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Album with its current photo count, as shown in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumSummary {
    pub album: Album,
    pub photo_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    pub album_id: String,
    /// Remote file id; absent for records written before uploads were tracked
    pub drive_id: Option<String>,
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Fields for a photo record that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPhoto {
    pub album_id: String,
    pub drive_id: String,
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

/// The singleton cover image setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverImage {
    pub url: String,
    pub drive_id: Option<String>,
    /// Absent on records written before timestamps were kept
    pub updated_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Transfers
// =============================================================================

/// A file the admin picked for upload.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub name: String,
    pub bytes: Bytes,
    pub mime_type: String,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_accepted_image(&self) -> bool {
        is_accepted_image(&self.mime_type)
    }
}

/// A file stored remotely, with its public download address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub id: String,
    pub name: String,
    pub folder_id: Option<String>,
    pub public_url: String,
}

/// Result of one batch upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Files dropped by the content-type filter before the batch started
    pub rejected: usize,
    /// Photo records written, in upload order
    pub photos: Vec<Photo>,
}

/// Result of a best-effort remote delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The host reported the file as already gone
    AlreadyGone,
    Skipped(BestEffortError),
}

impl DeleteOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, DeleteOutcome::Skipped(_))
    }
}

/// Result of [`Reconciler::delete_photo`](crate::reconcile::Reconciler::delete_photo).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoDeletion {
    pub photo: Photo,
    /// `None` when the photo had no remote file
    pub remote: Option<DeleteOutcome>,
}

/// Result of [`Reconciler::delete_album`](crate::reconcile::Reconciler::delete_album).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumDeletion {
    pub album_id: String,
    pub photos_removed: usize,
    /// Remote deletes that could not be confirmed; those files may be orphaned
    pub remote_skipped: Vec<BestEffortError>,
}

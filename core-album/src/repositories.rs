//! Repositories over the metadata [`DocumentStore`]
//!
//! Records are stored as camelCase JSON documents in the `albums`, `photos`
//! and `settings` collections. Store failures propagate unchanged.

use async_trait::async_trait;
use bridge_traits::document::{Document, DocumentStore};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AlbumError, Result};
use crate::models::{Album, CoverImage, NewPhoto, Photo};

pub const ALBUMS_COLLECTION: &str = "albums";
pub const PHOTOS_COLLECTION: &str = "photos";
pub const SETTINGS_COLLECTION: &str = "settings";
pub const COVER_SETTING_ID: &str = "cover";

/// Album repository interface
#[async_trait]
pub trait AlbumRepository: Send + Sync {
    /// Store a new album and return it with its assigned id
    async fn insert(&self, name: &str, created_at: DateTime<Utc>) -> Result<Album>;

    /// Find an album by its ID
    ///
    /// # Returns
    /// - `Ok(Some(album))` if found
    /// - `Ok(None)` if not found
    async fn find_by_id(&self, id: &str) -> Result<Option<Album>>;

    /// All albums, in store order
    async fn list(&self) -> Result<Vec<Album>>;

    /// Delete an album record
    ///
    /// Returns `Ok(false)` if the album was not found.
    async fn delete(&self, id: &str) -> Result<bool>;
}

/// Photo repository interface
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    async fn insert(&self, photo: NewPhoto) -> Result<Photo>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Photo>>;

    async fn list(&self) -> Result<Vec<Photo>>;

    /// Photos belonging to `album_id`, in store order
    async fn list_by_album(&self, album_id: &str) -> Result<Vec<Photo>>;

    /// Number of photo records per album id
    async fn count_by_album(&self) -> Result<HashMap<String, usize>>;

    async fn delete(&self, id: &str) -> Result<bool>;
}

/// Cover image setting interface
#[async_trait]
pub trait CoverRepository: Send + Sync {
    async fn load(&self) -> Result<Option<CoverImage>>;

    /// Overwrite the cover setting
    async fn save(&self, cover: &CoverImage) -> Result<()>;

    /// Remote file id of the stored record, even one without an address
    async fn stored_file_id(&self) -> Result<Option<String>>;

    async fn clear(&self) -> Result<bool>;
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlbumRecord {
    name: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhotoRecord {
    album_id: String,
    #[serde(default)]
    drive_id: Option<String>,
    url: String,
    uploaded_at: DateTime<Utc>,
}

/// Lenient view of `settings/cover`; older records may lack any field.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CoverRecord {
    url: Option<String>,
    drive_id: Option<String>,
    updated_at: Option<DateTime<Utc>>,
}

fn encode<T: Serialize>(collection: &str, id: &str, record: &T) -> Result<serde_json::Value> {
    serde_json::to_value(record).map_err(|e| AlbumError::InvalidRecord {
        collection: collection.to_string(),
        id: id.to_string(),
        message: e.to_string(),
    })
}

fn decode<T: DeserializeOwned>(collection: &str, document: &Document) -> Result<T> {
    serde_json::from_value(document.data.clone()).map_err(|e| AlbumError::InvalidRecord {
        collection: collection.to_string(),
        id: document.id.clone(),
        message: e.to_string(),
    })
}

fn album_from_document(document: &Document) -> Result<Album> {
    let record: AlbumRecord = decode(ALBUMS_COLLECTION, document)?;
    Ok(Album {
        id: document.id.clone(),
        name: record.name,
        created_at: record.created_at,
    })
}

fn photo_from_document(document: &Document) -> Result<Photo> {
    let record: PhotoRecord = decode(PHOTOS_COLLECTION, document)?;
    Ok(Photo {
        id: document.id.clone(),
        album_id: record.album_id,
        // An empty id cannot address a remote file
        drive_id: record.drive_id.filter(|id| !id.is_empty()),
        url: record.url,
        uploaded_at: record.uploaded_at,
    })
}

/// [`AlbumRepository`] backed by a [`DocumentStore`]
pub struct DocumentAlbumRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentAlbumRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AlbumRepository for DocumentAlbumRepository {
    async fn insert(&self, name: &str, created_at: DateTime<Utc>) -> Result<Album> {
        let record = AlbumRecord {
            name: name.to_string(),
            created_at,
        };
        let data = encode(ALBUMS_COLLECTION, "", &record)?;
        let id = self.store.add(ALBUMS_COLLECTION, data).await?;

        Ok(Album {
            id,
            name: record.name,
            created_at,
        })
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Album>> {
        self.store
            .get(ALBUMS_COLLECTION, id)
            .await?
            .as_ref()
            .map(album_from_document)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<Album>> {
        self.store
            .list(ALBUMS_COLLECTION)
            .await?
            .iter()
            .map(album_from_document)
            .collect()
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.store.delete(ALBUMS_COLLECTION, id).await?)
    }
}

/// [`PhotoRepository`] backed by a [`DocumentStore`]
pub struct DocumentPhotoRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentPhotoRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PhotoRepository for DocumentPhotoRepository {
    async fn insert(&self, photo: NewPhoto) -> Result<Photo> {
        let record = PhotoRecord {
            album_id: photo.album_id,
            drive_id: Some(photo.drive_id),
            url: photo.url,
            uploaded_at: photo.uploaded_at,
        };
        let data = encode(PHOTOS_COLLECTION, "", &record)?;
        let id = self.store.add(PHOTOS_COLLECTION, data).await?;

        Ok(Photo {
            id,
            album_id: record.album_id,
            drive_id: record.drive_id,
            url: record.url,
            uploaded_at: record.uploaded_at,
        })
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Photo>> {
        self.store
            .get(PHOTOS_COLLECTION, id)
            .await?
            .as_ref()
            .map(photo_from_document)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<Photo>> {
        self.store
            .list(PHOTOS_COLLECTION)
            .await?
            .iter()
            .map(photo_from_document)
            .collect()
    }

    /// Only the album's own records are decoded; malformed records
    /// elsewhere in the collection are ignored.
    async fn list_by_album(&self, album_id: &str) -> Result<Vec<Photo>> {
        self.store
            .list(PHOTOS_COLLECTION)
            .await?
            .iter()
            .filter(|document| document.str_field("albumId") == Some(album_id))
            .map(photo_from_document)
            .collect()
    }

    /// Counts by the `albumId` field alone, without decoding the records.
    async fn count_by_album(&self) -> Result<HashMap<String, usize>> {
        let mut counts = HashMap::new();
        for document in self.store.list(PHOTOS_COLLECTION).await? {
            if let Some(album_id) = document.str_field("albumId") {
                *counts.entry(album_id.to_string()).or_default() += 1;
            }
        }
        Ok(counts)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.store.delete(PHOTOS_COLLECTION, id).await?)
    }
}

/// [`CoverRepository`] backed by the `settings/cover` document
pub struct DocumentCoverRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentCoverRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CoverRepository for DocumentCoverRepository {
    async fn load(&self) -> Result<Option<CoverImage>> {
        let Some(document) = self.store.get(SETTINGS_COLLECTION, COVER_SETTING_ID).await? else {
            return Ok(None);
        };
        let record: CoverRecord = decode(SETTINGS_COLLECTION, &document)?;
        // A cover without an address is treated as unset
        let Some(url) = record.url.filter(|url| !url.trim().is_empty()) else {
            return Ok(None);
        };
        Ok(Some(CoverImage {
            url,
            drive_id: record.drive_id.filter(|id| !id.is_empty()),
            updated_at: record.updated_at,
        }))
    }

    async fn save(&self, cover: &CoverImage) -> Result<()> {
        let data = encode(SETTINGS_COLLECTION, COVER_SETTING_ID, cover)?;
        self.store
            .set(SETTINGS_COLLECTION, COVER_SETTING_ID, data)
            .await?;
        Ok(())
    }

    async fn stored_file_id(&self) -> Result<Option<String>> {
        let Some(document) = self.store.get(SETTINGS_COLLECTION, COVER_SETTING_ID).await? else {
            return Ok(None);
        };
        Ok(document
            .str_field("driveId")
            .filter(|id| !id.is_empty())
            .map(str::to_string))
    }

    async fn clear(&self) -> Result<bool> {
        Ok(self
            .store
            .delete(SETTINGS_COLLECTION, COVER_SETTING_ID)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_desktop::SqliteDocumentStore;
    use serde_json::json;

    async fn store() -> Arc<dyn DocumentStore> {
        Arc::new(SqliteDocumentStore::in_memory().await.unwrap())
    }

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[tokio::test]
    async fn test_album_insert_and_find() {
        let repo = DocumentAlbumRepository::new(store().await);
        let album = repo
            .insert("Ceremonia", at("2025-06-14T18:30:00Z"))
            .await
            .unwrap();

        let found = repo.find_by_id(&album.id).await.unwrap().unwrap();
        assert_eq!(found, album);
        assert!(repo.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_album_record_uses_camel_case() {
        let store = store().await;
        let repo = DocumentAlbumRepository::new(Arc::clone(&store));
        let album = repo
            .insert("Fiesta", at("2025-06-14T22:00:00Z"))
            .await
            .unwrap();

        let doc = store
            .get(ALBUMS_COLLECTION, &album.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.data["name"], "Fiesta");
        assert!(doc.data.get("createdAt").is_some());
    }

    #[tokio::test]
    async fn test_photos_by_album() {
        let repo = DocumentPhotoRepository::new(store().await);
        for (album, drive) in [("a1", "d1"), ("a2", "d2"), ("a1", "d3")] {
            repo.insert(NewPhoto {
                album_id: album.to_string(),
                drive_id: drive.to_string(),
                url: format!("https://example.test/{}", drive),
                uploaded_at: at("2025-06-14T18:30:00Z"),
            })
            .await
            .unwrap();
        }

        let photos = repo.list_by_album("a1").await.unwrap();
        let drive_ids: Vec<_> = photos
            .iter()
            .map(|p| p.drive_id.as_deref().unwrap())
            .collect();
        assert_eq!(drive_ids, vec!["d1", "d3"]);
    }

    #[tokio::test]
    async fn test_legacy_photo_without_drive_id() {
        let store = store().await;
        store
            .set(
                PHOTOS_COLLECTION,
                "legacy",
                json!({
                    "albumId": "a1",
                    "url": "https://example.test/x",
                    "uploadedAt": "2024-01-01T00:00:00Z",
                    "driveId": ""
                }),
            )
            .await
            .unwrap();

        let repo = DocumentPhotoRepository::new(store);
        let photo = repo.find_by_id("legacy").await.unwrap().unwrap();
        assert!(photo.drive_id.is_none());
    }

    #[tokio::test]
    async fn test_malformed_record_is_reported() {
        let store = store().await;
        store
            .set(ALBUMS_COLLECTION, "bad", json!({ "title": 1 }))
            .await
            .unwrap();

        let repo = DocumentAlbumRepository::new(store);
        let result = repo.find_by_id("bad").await;
        assert!(matches!(result, Err(AlbumError::InvalidRecord { .. })));
    }

    #[tokio::test]
    async fn test_cover_roundtrip_and_clear() {
        let repo = DocumentCoverRepository::new(store().await);
        assert!(repo.load().await.unwrap().is_none());

        let cover = CoverImage {
            url: "https://example.test/cover".to_string(),
            drive_id: Some("c1".to_string()),
            updated_at: Some(at("2025-06-14T18:30:00Z")),
        };
        repo.save(&cover).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), Some(cover));

        assert!(repo.clear().await.unwrap());
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cover_record_without_url_is_unset() {
        let store = store().await;
        store
            .set(
                SETTINGS_COLLECTION,
                COVER_SETTING_ID,
                json!({ "driveId": "d1", "updatedAt": "2025-06-14T18:30:00Z" }),
            )
            .await
            .unwrap();

        let repo = DocumentCoverRepository::new(store);
        assert!(repo.load().await.unwrap().is_none());
        assert_eq!(repo.stored_file_id().await.unwrap().as_deref(), Some("d1"));
    }

    #[tokio::test]
    async fn test_cover_record_without_timestamp() {
        let store = store().await;
        store
            .set(
                SETTINGS_COLLECTION,
                COVER_SETTING_ID,
                json!({ "url": "https://example.test/cover" }),
            )
            .await
            .unwrap();

        let repo = DocumentCoverRepository::new(store);
        let cover = repo.load().await.unwrap().unwrap();
        assert_eq!(cover.url, "https://example.test/cover");
        assert!(cover.drive_id.is_none());
        assert!(cover.updated_at.is_none());
        assert!(repo.stored_file_id().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_photos_by_album_ignores_foreign_malformed_records() {
        let store = store().await;
        store
            .set(
                PHOTOS_COLLECTION,
                "legacy",
                json!({ "albumId": "other", "driveId": "x" }),
            )
            .await
            .unwrap();

        let repo = DocumentPhotoRepository::new(store);
        repo.insert(NewPhoto {
            album_id: "a1".to_string(),
            drive_id: "d1".to_string(),
            url: "https://example.test/d1".to_string(),
            uploaded_at: at("2025-06-14T18:30:00Z"),
        })
        .await
        .unwrap();

        let photos = repo.list_by_album("a1").await.unwrap();
        assert_eq!(photos.len(), 1);
        let counts = repo.count_by_album().await.unwrap();
        assert_eq!(counts.get("a1"), Some(&1));
        assert_eq!(counts.get("other"), Some(&1));
        assert!(matches!(
            repo.list_by_album("other").await,
            Err(AlbumError::InvalidRecord { .. })
        ));
    }
}

//! # Consistency Reconciler
//!
//! Deletes photos and albums so the metadata store never points at a remote
//! file that is gone. The remote file is always deleted before its record;
//! the worst failure leaves an orphaned remote file, reported as a skipped
//! delete.
//!
//! Album deletion removes member photos one by one and deletes the album
//! record strictly last. There is no rollback: if it stops part-way, the
//! photos already removed stay removed and the error says how many.

use core_runtime::events::{AlbumEvent, CoreEvent, EventBus};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::error::{AlbumError, Result};
use crate::gateway::TransferGateway;
use crate::models::{AlbumDeletion, DeleteOutcome, Photo, PhotoDeletion};
use crate::repositories::{AlbumRepository, PhotoRepository};
use crate::session::Session;

pub struct Reconciler {
    gateway: Arc<TransferGateway>,
    albums: Arc<dyn AlbumRepository>,
    photos: Arc<dyn PhotoRepository>,
    event_bus: Arc<EventBus>,
}

impl Reconciler {
    pub fn new(
        gateway: Arc<TransferGateway>,
        albums: Arc<dyn AlbumRepository>,
        photos: Arc<dyn PhotoRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            gateway,
            albums,
            photos,
            event_bus,
        }
    }

    /// Delete one photo: remote file first (best effort), then its record.
    ///
    /// A photo without a remote id costs no remote call.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the photo does not exist
    /// - `MissingCredential` if the photo has a remote file and the session
    ///   is signed out; nothing is deleted
    /// - `Store` if the record delete fails
    #[instrument(skip(self, session))]
    pub async fn delete_photo(&self, session: &Session, photo_id: &str) -> Result<PhotoDeletion> {
        let photo = self
            .photos
            .find_by_id(photo_id)
            .await?
            .ok_or_else(|| AlbumError::not_found("Photo", photo_id))?;

        if photo.drive_id.is_some() {
            session.access_token()?;
        }

        let remote = self.remove_photo(session, &photo).await?;
        Ok(PhotoDeletion { photo, remote })
    }

    /// Delete an album, its photos and their remote files.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the album does not exist
    /// - `MissingCredential` if any member photo has a remote file and the
    ///   session is signed out; nothing is deleted
    /// - [`AlbumError::Consistency`] if enumeration or a record delete fails
    #[instrument(skip(self, session))]
    pub async fn delete_album(&self, session: &Session, album_id: &str) -> Result<AlbumDeletion> {
        if self.albums.find_by_id(album_id).await?.is_none() {
            return Err(AlbumError::not_found("Album", album_id));
        }

        let photos = self
            .photos
            .list_by_album(album_id)
            .await
            .map_err(|e| Self::partial(album_id, 0, e))?;

        if photos.iter().any(|photo| photo.drive_id.is_some()) {
            session.access_token()?;
        }

        info!(photos = photos.len(), "Deleting album");
        let mut remote_skipped = Vec::new();
        for (removed, photo) in photos.iter().enumerate() {
            let outcome = self
                .remove_photo(session, photo)
                .await
                .map_err(|e| Self::partial(album_id, removed, e))?;
            if let Some(DeleteOutcome::Skipped(error)) = outcome {
                remote_skipped.push(error);
            }
        }

        let photos_removed = photos.len();
        self.albums
            .delete(album_id)
            .await
            .map_err(|e| Self::partial(album_id, photos_removed, e))?;

        if !remote_skipped.is_empty() {
            warn!(
                skipped = remote_skipped.len(),
                "Album deleted with unconfirmed remote deletes"
            );
        }
        info!(photos_removed, "Album deleted");
        let _ = self.event_bus.emit(CoreEvent::Album(AlbumEvent::AlbumDeleted {
            album_id: album_id.to_string(),
            photos_removed,
        }));

        Ok(AlbumDeletion {
            album_id: album_id.to_string(),
            photos_removed,
            remote_skipped,
        })
    }

    async fn remove_photo(&self, session: &Session, photo: &Photo) -> Result<Option<DeleteOutcome>> {
        let remote = match &photo.drive_id {
            Some(drive_id) => Some(self.gateway.delete(session, drive_id).await),
            None => None,
        };

        self.photos.delete(&photo.id).await?;

        let _ = self.event_bus.emit(CoreEvent::Album(AlbumEvent::PhotoDeleted {
            album_id: photo.album_id.clone(),
            photo_id: photo.id.clone(),
        }));
        Ok(remote)
    }

    fn partial(album_id: &str, photos_removed: usize, source: AlbumError) -> AlbumError {
        warn!(album_id, photos_removed, error = %source, "Album deletion stopped part-way");
        AlbumError::Consistency {
            album_id: album_id.to_string(),
            photos_removed,
            source: Box::new(source),
        }
    }
}

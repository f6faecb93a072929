//! Album and photo catalog queries.

use bridge_traits::time::Clock;
use core_runtime::events::{AlbumEvent, CoreEvent, EventBus};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::error::{PreconditionError, Result};
use crate::models::{Album, AlbumSummary, Photo};
use crate::repositories::{AlbumRepository, PhotoRepository};

pub struct CatalogService {
    albums: Arc<dyn AlbumRepository>,
    photos: Arc<dyn PhotoRepository>,
    event_bus: Arc<EventBus>,
    clock: Arc<dyn Clock>,
}

impl CatalogService {
    pub fn new(
        albums: Arc<dyn AlbumRepository>,
        photos: Arc<dyn PhotoRepository>,
        event_bus: Arc<EventBus>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            albums,
            photos,
            event_bus,
            clock,
        }
    }

    /// Create an album. The remote folder is created on first upload.
    #[instrument(skip(self))]
    pub async fn create_album(&self, name: &str) -> Result<Album> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PreconditionError::MissingAlbumName.into());
        }

        let album = self.albums.insert(name, self.clock.now()).await?;
        info!(album_id = %album.id, "Album created");
        let _ = self.event_bus.emit(CoreEvent::Album(AlbumEvent::AlbumCreated {
            album_id: album.id.clone(),
            name: album.name.clone(),
        }));
        Ok(album)
    }

    /// All albums with photo counts, oldest first.
    pub async fn list_albums(&self) -> Result<Vec<AlbumSummary>> {
        let counts = self.photos.count_by_album().await?;

        let mut albums = self.albums.list().await?;
        // Stable: equal timestamps keep store order
        albums.sort_by_key(|album| album.created_at);

        Ok(albums
            .into_iter()
            .map(|album| AlbumSummary {
                photo_count: counts.get(&album.id).copied().unwrap_or(0),
                album,
            })
            .collect())
    }

    /// Photos, optionally restricted to one album.
    pub async fn list_photos(&self, album_id: Option<&str>) -> Result<Vec<Photo>> {
        match album_id {
            Some(album_id) => self.photos.list_by_album(album_id).await,
            None => self.photos.list().await,
        }
    }
}

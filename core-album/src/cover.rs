//! Cover image for the public album page.
//!
//! The cover lives in its own folder under the album root and is recorded
//! in the `settings/cover` document.

use bridge_traits::time::Clock;
use core_runtime::events::{AlbumEvent, CoreEvent, EventBus};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::error::{PreconditionError, Result};
use crate::folders::FolderResolver;
use crate::gateway::TransferGateway;
use crate::models::{CandidateFile, CoverImage, DeleteOutcome};
use crate::repositories::CoverRepository;
use crate::session::Session;

pub struct CoverService {
    resolver: Arc<FolderResolver>,
    gateway: Arc<TransferGateway>,
    covers: Arc<dyn CoverRepository>,
    event_bus: Arc<EventBus>,
    clock: Arc<dyn Clock>,
    cover_folder_name: String,
}

impl CoverService {
    pub fn new(
        resolver: Arc<FolderResolver>,
        gateway: Arc<TransferGateway>,
        covers: Arc<dyn CoverRepository>,
        event_bus: Arc<EventBus>,
        clock: Arc<dyn Clock>,
        cover_folder_name: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            gateway,
            covers,
            event_bus,
            clock,
            cover_folder_name: cover_folder_name.into(),
        }
    }

    /// Upload `file` as the new cover and replace the setting.
    ///
    /// The previous cover file is deleted best-effort once the new record
    /// is written.
    #[instrument(skip(self, session, file), fields(file_name = %file.name))]
    pub async fn set_cover(&self, session: &Session, file: CandidateFile) -> Result<CoverImage> {
        if !file.is_accepted_image() {
            return Err(PreconditionError::UnsupportedCoverType(file.mime_type.clone()).into());
        }
        session.access_token()?;
        let root_id = session.album_root()?;

        let previous_file = self.covers.stored_file_id().await?;

        let folder_id = self
            .resolver
            .resolve(session, root_id, &[self.cover_folder_name.as_str()])
            .await?;
        let uploaded = self.gateway.upload(session, &file, &folder_id).await?;

        let cover = CoverImage {
            url: uploaded.public_url,
            drive_id: Some(uploaded.id),
            updated_at: Some(self.clock.now()),
        };
        self.covers.save(&cover).await?;
        info!(url = %cover.url, "Cover image updated");

        if let Some(old_id) = previous_file {
            if cover.drive_id.as_deref() != Some(old_id.as_str()) {
                self.gateway.delete(session, &old_id).await;
            }
        }

        let _ = self.event_bus.emit(CoreEvent::Album(AlbumEvent::CoverUpdated {
            url: cover.url.clone(),
        }));
        Ok(cover)
    }

    /// Remove the cover: remote file first (best effort), then the setting.
    ///
    /// Any recorded remote file is deleted, even when the record has no
    /// address. Returns `None` when no remote file was recorded.
    #[instrument(skip(self, session))]
    pub async fn remove_cover(&self, session: &Session) -> Result<Option<DeleteOutcome>> {
        let outcome = match self.covers.stored_file_id().await? {
            Some(drive_id) => {
                session.access_token()?;
                Some(self.gateway.delete(session, &drive_id).await)
            }
            None => None,
        };

        if self.covers.clear().await? {
            info!("Cover image removed");
            let _ = self
                .event_bus
                .emit(CoreEvent::Album(AlbumEvent::CoverRemoved));
        }
        Ok(outcome)
    }

    pub async fn load_cover(&self) -> Result<Option<CoverImage>> {
        self.covers.load().await
    }
}

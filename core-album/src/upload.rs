//! # Batch Upload Orchestrator
//!
//! Uploads a list of picked files into one album.
//!
//! ## Workflow
//!
//! 1. Check preconditions: album id, credential, album root folder
//! 2. Drop files whose MIME type is not an accepted image type
//! 3. Resolve the album folder (`[album_id]` under the album root) once
//! 4. Upload each file in list order, writing one photo record per success
//! 5. Report `{succeeded, failed}`
//!
//! A failed item is counted and logged; the batch continues and earlier
//! successes are kept. Progress events follow list order, "i of N".

use bridge_traits::time::Clock;
use core_runtime::events::{AlbumEvent, CoreEvent, EventBus, UploadEvent};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::error::{PreconditionError, Result};
use crate::folders::FolderResolver;
use crate::gateway::TransferGateway;
use crate::models::{CandidateFile, NewPhoto, Photo, UploadSummary};
use crate::repositories::PhotoRepository;
use crate::session::Session;

pub struct UploadOrchestrator {
    resolver: Arc<FolderResolver>,
    gateway: Arc<TransferGateway>,
    photos: Arc<dyn PhotoRepository>,
    event_bus: Arc<EventBus>,
    clock: Arc<dyn Clock>,
}

impl UploadOrchestrator {
    pub fn new(
        resolver: Arc<FolderResolver>,
        gateway: Arc<TransferGateway>,
        photos: Arc<dyn PhotoRepository>,
        event_bus: Arc<EventBus>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            resolver,
            gateway,
            photos,
            event_bus,
            clock,
        }
    }

    /// Upload `files` into the album `album_id`.
    ///
    /// # Errors
    ///
    /// - [`PreconditionError`] (checked in order: album, credential, root
    ///   folder, then an empty batch after filtering) before any remote call
    /// - [`TransferError`](crate::TransferError) if the album folder cannot be
    ///   resolved; no item is attempted
    ///
    /// Individual upload or record failures never fail the batch.
    #[instrument(skip(self, session, files), fields(album_id = %album_id, files = files.len()))]
    pub async fn upload_batch(
        &self,
        session: &Session,
        files: Vec<CandidateFile>,
        album_id: &str,
    ) -> Result<UploadSummary> {
        let album_id = album_id.trim();
        if album_id.is_empty() {
            return Err(PreconditionError::MissingAlbum.into());
        }
        session.access_token()?;
        let root_id = session.album_root()?;

        let (accepted, rejected) = Self::filter_images(files);
        if accepted.is_empty() {
            return Err(PreconditionError::EmptyBatch.into());
        }

        let total = accepted.len();
        info!(total, rejected, "Starting upload batch");
        self.emit(UploadEvent::Started {
            album_id: album_id.to_string(),
            total,
            rejected,
        });

        let folder_id = match self.resolver.resolve(session, root_id, &[album_id]).await {
            Ok(id) => id,
            Err(e) => {
                error!(error = %e, "Album folder resolution failed");
                self.emit(UploadEvent::Failed {
                    album_id: album_id.to_string(),
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        let mut summary = UploadSummary {
            rejected,
            ..Default::default()
        };

        for (position, file) in accepted.iter().enumerate() {
            let index = position + 1;
            self.emit(UploadEvent::Progress {
                album_id: album_id.to_string(),
                index,
                total,
            });
            info!(index, total, file_name = %file.name, size = file.size(), "Uploading photo");

            match self.upload_one(session, file, &folder_id, album_id).await {
                Ok(photo) => {
                    let _ = self.event_bus.emit(CoreEvent::Album(AlbumEvent::PhotoAdded {
                        album_id: album_id.to_string(),
                        photo_id: photo.id.clone(),
                    }));
                    summary.succeeded += 1;
                    summary.photos.push(photo);
                }
                Err(e) => {
                    error!(index, file_name = %file.name, error = %e, "Photo upload failed");
                    self.emit(UploadEvent::ItemFailed {
                        album_id: album_id.to_string(),
                        index,
                        file_name: file.name.clone(),
                        message: e.to_string(),
                    });
                    summary.failed += 1;
                }
            }
        }

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Upload batch complete"
        );
        self.emit(UploadEvent::Completed {
            album_id: album_id.to_string(),
            succeeded: summary.succeeded,
            failed: summary.failed,
        });

        Ok(summary)
    }

    /// Upload then record; a record failure leaves the remote file orphaned.
    async fn upload_one(
        &self,
        session: &Session,
        file: &CandidateFile,
        folder_id: &str,
        album_id: &str,
    ) -> Result<Photo> {
        let uploaded = self.gateway.upload(session, file, folder_id).await?;

        self.photos
            .insert(NewPhoto {
                album_id: album_id.to_string(),
                drive_id: uploaded.id.clone(),
                url: uploaded.public_url,
                uploaded_at: self.clock.now(),
            })
            .await
            .inspect_err(|_| warn!(file_id = %uploaded.id, "Uploaded file has no photo record"))
    }

    fn filter_images(files: Vec<CandidateFile>) -> (Vec<CandidateFile>, usize) {
        let before = files.len();
        let accepted: Vec<CandidateFile> = files
            .into_iter()
            .filter(|file| {
                let ok = file.is_accepted_image();
                if !ok {
                    warn!(file_name = %file.name, mime_type = %file.mime_type, "Skipping unsupported file");
                }
                ok
            })
            .collect();
        let rejected = before - accepted.len();
        (accepted, rejected)
    }

    fn emit(&self, event: UploadEvent) {
        let _ = self.event_bus.emit(CoreEvent::Upload(event));
    }
}

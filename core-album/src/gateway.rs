//! # File Transfer Gateway
//!
//! Single-file upload and delete against the remote host, plus the public
//! address for a stored file.
//!
//! Uploads fail loudly. Deletes are best-effort: anything short of a
//! confirmed delete (or "already gone") is logged and returned as
//! [`DeleteOutcome::Skipped`], never as an error.

use bridge_traits::storage::{FileUpload, RemoteDeletion, RemoteStorage};
use core_runtime::config::{CoreConfig, DEFAULT_PUBLIC_URL_TEMPLATE};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::{BestEffortError, Result, TransferError};
use crate::models::{CandidateFile, DeleteOutcome, UploadedFile};
use crate::session::Session;

pub struct TransferGateway {
    storage: Arc<dyn RemoteStorage>,
    public_url_template: String,
}

impl TransferGateway {
    pub fn new(storage: Arc<dyn RemoteStorage>) -> Self {
        Self {
            storage,
            public_url_template: DEFAULT_PUBLIC_URL_TEMPLATE.to_string(),
        }
    }

    pub fn from_config(storage: Arc<dyn RemoteStorage>, config: &CoreConfig) -> Self {
        Self::new(storage).with_public_url_template(config.public_url_template.clone())
    }

    pub fn with_public_url_template(mut self, template: impl Into<String>) -> Self {
        self.public_url_template = template.into();
        self
    }

    /// Public download address for a remote file id
    pub fn public_url(&self, file_id: &str) -> String {
        self.public_url_template.replace("{id}", file_id)
    }

    /// Upload one file into `target_folder_id`.
    ///
    /// # Errors
    ///
    /// - `MissingCredential` before any network call
    /// - [`TransferError::Upload`] carrying the remote message on rejection
    #[instrument(skip(self, session, file), fields(file_name = %file.name, size = file.size()))]
    pub async fn upload(
        &self,
        session: &Session,
        file: &CandidateFile,
        target_folder_id: &str,
    ) -> Result<UploadedFile> {
        let token = session.access_token()?;
        let upload = FileUpload::new(file.name.clone(), file.bytes.clone(), file.mime_type.clone());

        let stored = self
            .storage
            .upload_file(token, &upload, target_folder_id)
            .await
            .map_err(|source| TransferError::Upload {
                file_name: file.name.clone(),
                source,
            })?;

        debug!(file_id = %stored.id, "Upload stored");
        Ok(UploadedFile {
            public_url: self.public_url(&stored.id),
            id: stored.id,
            name: stored.name,
            folder_id: stored
                .folder_id
                .or_else(|| Some(target_folder_id.to_string())),
        })
    }

    /// Delete a remote file, best effort.
    #[instrument(skip(self, session))]
    pub async fn delete(&self, session: &Session, file_id: &str) -> DeleteOutcome {
        let token = match session.access_token() {
            Ok(token) => token,
            Err(e) => return Self::skipped(file_id, e.to_string()),
        };

        match self.storage.delete_file(token, file_id).await {
            Ok(RemoteDeletion::Deleted) => {
                info!("Remote file deleted");
                DeleteOutcome::Deleted
            }
            Ok(RemoteDeletion::NotFound) => {
                debug!("Remote file already gone");
                DeleteOutcome::AlreadyGone
            }
            Err(e) => Self::skipped(file_id, e.to_string()),
        }
    }

    fn skipped(file_id: &str, reason: String) -> DeleteOutcome {
        let error = BestEffortError {
            file_id: file_id.to_string(),
            reason,
        };
        warn!(error = %error, "Remote delete skipped");
        DeleteOutcome::Skipped(error)
    }
}

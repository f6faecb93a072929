//! # Remote Folder Resolver
//!
//! Maps a logical path (e.g. `["abc123"]` under the album root) onto the
//! remote folder tree, creating missing folders on the way down.
//!
//! Each segment costs one lookup and, when absent, one create. Nothing is
//! cached between calls: a retry walks the full path again. When several
//! folders share a name under one parent, the lookup returns the oldest, so
//! resolvers that raced to create duplicates still converge on one id.

use bridge_traits::storage::RemoteStorage;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::error::{Result, TransferError};
use crate::session::Session;

pub struct FolderResolver {
    storage: Arc<dyn RemoteStorage>,
}

impl FolderResolver {
    pub fn new(storage: Arc<dyn RemoteStorage>) -> Self {
        Self { storage }
    }

    /// Resolve `segments` below `root_folder_id` and return the leaf folder id.
    ///
    /// An empty path returns `root_folder_id` without any remote call.
    ///
    /// # Errors
    ///
    /// - [`PreconditionError::MissingCredential`](crate::PreconditionError::MissingCredential)
    ///   when the session has no credential
    /// - [`TransferError`] on the first failed lookup or create; folders
    ///   created by earlier steps are left in place
    #[instrument(skip(self, session), fields(root = %root_folder_id))]
    pub async fn resolve(
        &self,
        session: &Session,
        root_folder_id: &str,
        segments: &[&str],
    ) -> Result<String> {
        if segments.is_empty() {
            return Ok(root_folder_id.to_string());
        }

        let token = session.access_token()?;
        let mut current = root_folder_id.to_string();
        for segment in segments {
            current = self.find_or_create(token, segment, Some(&current)).await?;
        }

        debug!(folder_id = %current, "Resolved folder path");
        Ok(current)
    }

    /// Find or create the album root folder at the top of the drive.
    #[instrument(skip(self, session))]
    pub async fn resolve_root(&self, session: &Session, root_name: &str) -> Result<String> {
        let token = session.access_token()?;
        self.find_or_create(token, root_name, None).await
    }

    async fn find_or_create(&self, token: &str, name: &str, parent_id: Option<&str>) -> Result<String> {
        let existing = self
            .storage
            .find_folder(token, name, parent_id)
            .await
            .map_err(|source| TransferError::FolderLookup {
                name: name.to_string(),
                source,
            })?;

        if let Some(folder) = existing {
            debug!(folder_id = %folder.id, name, "Folder exists");
            return Ok(folder.id);
        }

        let created = self
            .storage
            .create_folder(token, name, parent_id)
            .await
            .map_err(|source| TransferError::FolderCreate {
                name: name.to_string(),
                source,
            })?;

        info!(folder_id = %created.id, name, "Created folder");
        Ok(created.id)
    }
}

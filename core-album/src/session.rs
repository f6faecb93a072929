//! Admin session state.
//!
//! A [`Session`] is an explicit value handed to every remote operation: the
//! credential and the album root folder id resolved at sign-in.

use core_auth::Credential;
use core_runtime::events::{AuthEvent, CoreEvent, EventBus};
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::error::{PreconditionError, Result};
use crate::folders::FolderResolver;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub credential: Option<Credential>,
    /// Remote id of the album root folder
    pub album_root_id: Option<String>,
}

impl Session {
    pub fn new(credential: Credential, album_root_id: Option<String>) -> Self {
        Self {
            credential: Some(credential),
            album_root_id,
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn is_signed_in(&self) -> bool {
        self.credential.is_some()
    }

    pub fn email(&self) -> Option<&str> {
        self.credential.as_ref()?.email.as_deref()
    }

    /// Bearer token, or `MissingCredential`
    pub fn access_token(&self) -> std::result::Result<&str, PreconditionError> {
        self.credential
            .as_ref()
            .filter(|credential| !credential.access_token.is_empty())
            .map(Credential::bearer)
            .ok_or(PreconditionError::MissingCredential)
    }

    /// Album root folder id, or `MissingRootFolder`
    pub fn album_root(&self) -> std::result::Result<&str, PreconditionError> {
        self.album_root_id
            .as_deref()
            .ok_or(PreconditionError::MissingRootFolder)
    }
}

/// Turns a credential into a ready [`Session`].
pub struct SessionBootstrap {
    resolver: Arc<FolderResolver>,
    album_root_folder_name: String,
    event_bus: Arc<EventBus>,
}

impl SessionBootstrap {
    pub fn new(
        resolver: Arc<FolderResolver>,
        album_root_folder_name: impl Into<String>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            resolver,
            album_root_folder_name: album_root_folder_name.into(),
            event_bus,
        }
    }

    /// Resolve (or create) the album root folder and return the session.
    #[instrument(skip(self, credential), fields(root = %self.album_root_folder_name))]
    pub async fn start(&self, credential: Credential) -> Result<Session> {
        let mut session = Session::new(credential, None);

        match self
            .resolver
            .resolve_root(&session, &self.album_root_folder_name)
            .await
        {
            Ok(root_id) => {
                info!(root_folder_id = %root_id, "Session started");
                let _ = self
                    .event_bus
                    .emit(CoreEvent::Auth(AuthEvent::SessionStarted {
                        email: session.email().map(str::to_string),
                        root_folder_id: root_id.clone(),
                    }));
                session.album_root_id = Some(root_id);
                Ok(session)
            }
            Err(e) => {
                error!(error = %e, "Session bootstrap failed");
                let _ = self.event_bus.emit(CoreEvent::Auth(AuthEvent::AuthError {
                    message: e.to_string(),
                }));
                Err(e)
            }
        }
    }
}

//! Credential supply.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::types::Credential;

/// Source of the current admin credential.
///
/// Implemented by the host after it completes the OAuth flow. Returning
/// `None` means nobody is signed in.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn current_credential(&self) -> Option<Credential>;
}

/// In-memory provider holding at most one credential.
///
/// # Examples
///
/// ```
/// use core_auth::{Credential, CredentialProvider, StaticCredentialProvider};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let provider = StaticCredentialProvider::signed_out();
/// provider.sign_in(Credential::new("ya29")).await;
/// assert!(provider.current_credential().await.is_some());
/// # }
/// ```
#[derive(Debug, Default)]
pub struct StaticCredentialProvider {
    credential: RwLock<Option<Credential>>,
}

impl StaticCredentialProvider {
    pub fn new(credential: Credential) -> Self {
        Self {
            credential: RwLock::new(Some(credential)),
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub async fn sign_in(&self, credential: Credential) {
        info!(has_email = credential.email.is_some(), "Credential stored");
        *self.credential.write().await = Some(credential);
    }

    pub async fn sign_out(&self) {
        info!("Credential cleared");
        *self.credential.write().await = None;
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn current_credential(&self) -> Option<Credential> {
        self.credential.read().await.clone()
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::id_token::email_from_id_token;

/// OAuth bearer token used for Drive requests.
///
/// # Security
///
/// Tokens should never be logged. The `Debug` and `Display` implementations
/// redact the value; use [`AccessToken::secret`] only when building an
/// `Authorization` header.
///
/// # Examples
///
/// ```
/// use core_auth::AccessToken;
///
/// let token = AccessToken::new("ya29.a0...");
/// assert_eq!(format!("{:?}", token), "AccessToken([REDACTED])");
/// assert_eq!(token.secret(), "ya29.a0...");
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token value
    pub fn secret(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken([REDACTED])")
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

/// Bearer token plus the account it belongs to.
///
/// # Examples
///
/// ```
/// use core_auth::Credential;
///
/// let credential = Credential::new("ya29.a0...").with_email("novios@example.com");
/// assert_eq!(credential.email.as_deref(), Some("novios@example.com"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: AccessToken,
    pub email: Option<String>,
}

impl Credential {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: AccessToken::new(access_token),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Build a credential from an OAuth token response.
    ///
    /// The email is read from the ID token when one was returned.
    pub fn from_token_response(access_token: impl Into<String>, id_token: Option<&str>) -> Result<Self> {
        let credential = Self::new(access_token);
        match id_token {
            Some(jwt) => Ok(credential.with_email(email_from_id_token(jwt)?)),
            None => Ok(credential),
        }
    }

    /// The bearer token value, for the `Authorization` header
    pub fn bearer(&self) -> &str {
        self.access_token.secret()
    }
}

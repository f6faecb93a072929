//! Google ID token payload decoding.
//!
//! The signature is not verified; the email is display data only and never
//! used for authorization decisions.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

use crate::error::{AuthError, Result};

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    email: Option<String>,
}

/// Extract the `email` claim from a JWT without verifying it.
///
/// # Errors
///
/// Returns [`AuthError::InvalidIdToken`] if the token does not have three
/// segments, the payload is not base64url JSON, or no email claim is present.
///
/// # Examples
///
/// ```
/// use core_auth::email_from_id_token;
///
/// // header.{"email":"novios@example.com"}.signature
/// let jwt = "eyJhbGciOiJSUzI1NiJ9.eyJlbWFpbCI6Im5vdmlvc0BleGFtcGxlLmNvbSJ9.c2ln";
/// assert_eq!(email_from_id_token(jwt).unwrap(), "novios@example.com");
/// ```
pub fn email_from_id_token(jwt: &str) -> Result<String> {
    let mut segments = jwt.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => {
            return Err(AuthError::InvalidIdToken(
                "expected three dot-separated segments".to_string(),
            ))
        }
    };

    // Some encoders pad the segment anyway.
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| AuthError::InvalidIdToken(format!("payload is not base64url: {}", e)))?;

    let claims: IdTokenClaims = serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::InvalidIdToken(format!("payload is not JSON: {}", e)))?;

    claims
        .email
        .filter(|email| !email.is_empty())
        .ok_or_else(|| AuthError::InvalidIdToken("missing email claim".to_string()))
}

//! # Authentication Module
//!
//! Credential value types for the admin session.
//!
//! ## Overview
//!
//! The OAuth popup, the code exchange and token persistence are handled by the
//! host. This crate only models what the core consumes: a bearer token plus
//! the signed-in email, supplied through a [`CredentialProvider`].
//!
//! ## Features
//!
//! - `AccessToken` that never prints its secret
//! - Email extraction from an (unverified) Google ID token
//! - In-memory provider for hosts that sign in once per process

pub mod error;
pub mod id_token;
pub mod provider;
pub mod types;

pub use error::{AuthError, Result};
pub use id_token::email_from_id_token;
pub use provider::{CredentialProvider, StaticCredentialProvider};
pub use types::{AccessToken, Credential};

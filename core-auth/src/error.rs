use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Invalid ID token: {0}")]
    InvalidIdToken(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;

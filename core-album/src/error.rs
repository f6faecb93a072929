use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlbumError {
    #[error("Precondition failed: {0}")]
    Precondition(#[from] PreconditionError),

    #[error("Transfer failed: {0}")]
    Transfer(#[from] TransferError),

    /// Album deletion stopped part-way; removed photos stay removed.
    #[error("Album {album_id} partially deleted ({photos_removed} photos removed): {source}")]
    Consistency {
        album_id: String,
        photos_removed: usize,
        #[source]
        source: Box<AlbumError>,
    },

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Metadata store error: {0}")]
    Store(#[from] BridgeError),

    #[error("Invalid record {collection}/{id}: {message}")]
    InvalidRecord {
        collection: String,
        id: String,
        message: String,
    },
}

impl AlbumError {
    pub fn not_found(entity_type: &str, id: &str) -> Self {
        AlbumError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }
}

/// Raised before any remote call; no partial state exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("no target album given")]
    MissingAlbum,

    #[error("no Google credential; sign in first")]
    MissingCredential,

    #[error("album root folder not resolved for this session")]
    MissingRootFolder,

    #[error("no supported image files in batch (JPG, PNG, GIF, WEBP)")]
    EmptyBatch,

    #[error("album name must not be empty")]
    MissingAlbumName,

    #[error("unsupported cover image type: {0}")]
    UnsupportedCoverType(String),
}

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("folder lookup for '{name}' failed: {source}")]
    FolderLookup {
        name: String,
        #[source]
        source: BridgeError,
    },

    #[error("folder creation for '{name}' failed: {source}")]
    FolderCreate {
        name: String,
        #[source]
        source: BridgeError,
    },

    #[error("upload of '{file_name}' failed: {source}")]
    Upload {
        file_name: String,
        #[source]
        source: BridgeError,
    },
}

impl TransferError {
    fn source_error(&self) -> &BridgeError {
        match self {
            TransferError::FolderLookup { source, .. }
            | TransferError::FolderCreate { source, .. }
            | TransferError::Upload { source, .. } => source,
        }
    }

    /// HTTP status of the remote rejection, if the host answered
    pub fn status(&self) -> Option<u16> {
        self.source_error().status()
    }

    /// Message reported by the remote host, or the transport error text
    pub fn remote_message(&self) -> String {
        match self.source_error() {
            BridgeError::RemoteRejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// A remote delete that could not be confirmed.
///
/// Logged and carried inside [`DeleteOutcome::Skipped`](crate::models::DeleteOutcome),
/// never returned as `Err`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("remote delete of {file_id} skipped: {reason}")]
pub struct BestEffortError {
    pub file_id: String,
    pub reason: String,
}

pub type Result<T> = std::result::Result<T, AlbumError>;

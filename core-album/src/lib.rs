//! # Album Management Module
//!
//! Maps the wedding album catalog onto a remote folder tree.
//!
//! ## Overview
//!
//! This module manages:
//! - Album, photo and cover records in the metadata store
//! - Folder resolution under the album root (`Album-Boda/{album_id}`)
//! - Sequential batch uploads with per-item progress and failure tolerance
//! - Remote-then-local deletes that keep the store consistent with the drive
//!
//! Every remote operation takes an explicit [`Session`] carrying the
//! credential and the album root folder id.

pub mod catalog;
pub mod cover;
pub mod error;
pub mod folders;
pub mod gateway;
pub mod models;
pub mod reconcile;
pub mod repositories;
pub mod session;
pub mod upload;

pub use catalog::CatalogService;
pub use cover::CoverService;
pub use error::{AlbumError, BestEffortError, PreconditionError, Result, TransferError};
pub use folders::FolderResolver;
pub use gateway::TransferGateway;
pub use models::{
    is_accepted_image, Album, AlbumDeletion, AlbumSummary, CandidateFile, CoverImage,
    DeleteOutcome, Photo, PhotoDeletion, UploadSummary, UploadedFile, ACCEPTED_IMAGE_TYPES,
};
pub use reconcile::Reconciler;
pub use repositories::{
    AlbumRepository, CoverRepository, DocumentAlbumRepository, DocumentCoverRepository,
    DocumentPhotoRepository, PhotoRepository,
};
pub use session::{Session, SessionBootstrap};
pub use upload::UploadOrchestrator;

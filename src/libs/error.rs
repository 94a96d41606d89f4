//! Error taxonomy for catalog operations.
//!
//! `PieceError` is what the record store and the catalog service return.
//! Validation and not-found errors are meant to be shown to the user as-is,
//! storage errors mean a write did not persist. Asset failures have their own
//! type because they never fail a metadata save; they travel as warnings.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PieceError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Piece with ID {0} not found")]
    NotFound(i64),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),
}

impl PieceError {
    /// True for errors raised by the storage engine or the file system,
    /// as opposed to errors about the caller's input.
    pub fn is_storage(&self) -> bool {
        matches!(self, PieceError::Storage(_) | PieceError::Io(_))
    }
}

/// Failures of the managed image lifecycle. Always non-fatal to the save.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Selected image no longer exists: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("Failed to copy image {} into {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to rename image {} to {}: {source}", .from.display(), .to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to downsize image {}: {source}", .path.display())]
    Resize {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to create image directory {}: {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type PieceResult<T> = Result<T, PieceError>;

//! Error types for the persistence layer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors the store can surface. Recoverable conditions (corrupt file,
/// wrong root shape) never reach this type during a normal load; they are
/// reported as warnings on [`crate::store::LoadOutcome`] instead.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Data could not be serialized to or deserialized from JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An import file had a parseable but unusable structure.
    #[error("invalid import format: {0}")]
    InvalidFormat(String),

    /// The user's home directory could not be located, so no data path can
    /// be derived.
    #[error("could not locate home directory")]
    NoHomeDirectory,

    /// A path supplied for import does not exist.
    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),
}

/// Convenience alias that pins the error type to [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;

//! Error types for the archive module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while unpacking an archive.
#[derive(Debug, Error)]
pub enum UnpackError {
    /// Archive file does not exist.
    #[error("Archive not found: {path}")]
    NotFound { path: PathBuf },

    /// Leading bytes match no supported format.
    #[error("Unrecognized archive format: {path}")]
    UnrecognizedFormat { path: PathBuf },

    /// Decompression or extraction failed partway.
    #[error("Corrupt archive {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// I/O error outside of extraction itself.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking extraction task panicked or was cancelled.
    #[error("Extraction task failed: {0}")]
    Task(String),
}

//! Error types for the fetcher module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while downloading a backup archive.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request or body transfer failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The download endpoint returned a non-success status.
    #[error("Download failed with HTTP {status}")]
    Api { status: u16 },

    /// Writing the archive to disk failed.
    #[error("Failed to write archive to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

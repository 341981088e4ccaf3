//! Backup archive download.

mod downloader;
mod error;

pub use downloader::{ArchiveFile, BackupFetcher};
pub use error::FetchError;

//! Backup archive extraction.
//!
//! Detects the archive format from its leading bytes and unpacks it into the
//! configured directory. Realm backups are gzip-compressed tarballs; plain
//! tarballs are accepted too.

mod error;
mod unpack;

pub use error::UnpackError;
pub use unpack::{detect_format, ArchiveFormat, ArchiveUnpacker, UnpackedWorldTree};

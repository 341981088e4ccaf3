//! Format detection and extraction.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Component, Path, PathBuf};

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use serde::Serialize;
use tracing::{debug, info};
use xz2::read::XzDecoder;
use zip::ZipArchive;

use crate::config::UnpackConfig;

use super::error::UnpackError;

/// Bytes needed to recognise every supported format.
const SNIFF_LEN: u64 = 262;
const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const BZIP2_MAGIC: &[u8] = b"BZh";
const XZ_MAGIC: &[u8] = &[0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00];
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const ZIP_EMPTY_MAGIC: &[u8] = b"PK\x05\x06";
const USTAR_OFFSET: usize = 257;
const USTAR_MAGIC: &[u8] = b"ustar";

/// Supported archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveFormat {
    Tar,
    TarGz,
    TarBz2,
    TarXz,
    Zip,
}

/// Directory tree produced by an extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnpackedWorldTree {
    pub root: PathBuf,
    pub format: ArchiveFormat,
    /// Number of archive entries written
    pub entries: usize,
    /// Top-level names found in the archive, sorted
    pub top_level: Vec<String>,
}

/// Detect the archive format from the file's leading bytes.
pub fn detect_format(path: &Path) -> Result<ArchiveFormat, UnpackError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => UnpackError::NotFound {
            path: path.to_path_buf(),
        },
        _ => UnpackError::Io(e),
    })?;

    let mut head = Vec::with_capacity(SNIFF_LEN as usize);
    file.take(SNIFF_LEN).read_to_end(&mut head)?;

    let format = if head.starts_with(GZIP_MAGIC) {
        Some(ArchiveFormat::TarGz)
    } else if head.starts_with(BZIP2_MAGIC) {
        Some(ArchiveFormat::TarBz2)
    } else if head.starts_with(XZ_MAGIC) {
        Some(ArchiveFormat::TarXz)
    } else if head.starts_with(ZIP_MAGIC) || head.starts_with(ZIP_EMPTY_MAGIC) {
        Some(ArchiveFormat::Zip)
    } else if head.get(USTAR_OFFSET..USTAR_OFFSET + USTAR_MAGIC.len()) == Some(USTAR_MAGIC) {
        Some(ArchiveFormat::Tar)
    } else {
        None
    };

    format.ok_or_else(|| UnpackError::UnrecognizedFormat {
        path: path.to_path_buf(),
    })
}

/// Unpacks downloaded backups into the configured directory.
pub struct ArchiveUnpacker {
    config: UnpackConfig,
}

impl ArchiveUnpacker {
    pub fn new(config: UnpackConfig) -> Self {
        Self { config }
    }

    /// Extract `archive` into the destination directory.
    ///
    /// Existing files are overwritten. A failure partway leaves whatever was
    /// already extracted in place.
    pub async fn unpack(&self, archive: &Path) -> Result<UnpackedWorldTree, UnpackError> {
        let archive = archive.to_path_buf();
        let dest = self.config.dest_dir.clone();

        info!(
            "Unpacking {} into {}",
            archive.display(),
            dest.display()
        );

        let tree = tokio::task::spawn_blocking(move || unpack_blocking(&archive, &dest))
            .await
            .map_err(|e| UnpackError::Task(e.to_string()))??;

        info!(
            "Unpacking of download successful: {} entries ({})",
            tree.entries,
            tree.top_level.join(", ")
        );
        Ok(tree)
    }
}

fn unpack_blocking(archive: &Path, dest: &Path) -> Result<UnpackedWorldTree, UnpackError> {
    let format = detect_format(archive)?;
    debug!("Detected {:?} archive", format);

    std::fs::create_dir_all(dest)?;
    let reader = BufReader::new(File::open(archive)?);

    let (entries, top_level) = match format {
        ArchiveFormat::Tar => extract_tar(reader, archive, dest)?,
        ArchiveFormat::TarGz => extract_tar(GzDecoder::new(reader), archive, dest)?,
        ArchiveFormat::TarBz2 => extract_tar(BzDecoder::new(reader), archive, dest)?,
        ArchiveFormat::TarXz => extract_tar(XzDecoder::new(reader), archive, dest)?,
        ArchiveFormat::Zip => extract_zip(reader, archive, dest)?,
    };

    Ok(UnpackedWorldTree {
        root: dest.to_path_buf(),
        format,
        entries,
        top_level: top_level.into_iter().collect(),
    })
}

fn corrupt(archive: &Path, reason: impl ToString) -> UnpackError {
    UnpackError::Corrupt {
        path: archive.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn record_top_level(top_level: &mut BTreeSet<String>, entry_path: &Path) {
    if let Some(Component::Normal(name)) = entry_path.components().next() {
        top_level.insert(name.to_string_lossy().into_owned());
    }
}

fn extract_tar<R: Read>(
    reader: R,
    archive: &Path,
    dest: &Path,
) -> Result<(usize, BTreeSet<String>), UnpackError> {
    let mut tarball = tar::Archive::new(reader);
    let mut count = 0;
    let mut top_level = BTreeSet::new();

    for entry in tarball.entries().map_err(|e| corrupt(archive, e))? {
        let mut entry = entry.map_err(|e| corrupt(archive, e))?;
        let entry_path = entry.path().map_err(|e| corrupt(archive, e))?.into_owned();

        // unpack_in refuses entries escaping dest and reports them as skipped
        if !entry.unpack_in(dest).map_err(|e| corrupt(archive, e))? {
            debug!("Skipped entry outside destination: {}", entry_path.display());
            continue;
        }

        record_top_level(&mut top_level, &entry_path);
        count += 1;
    }

    // Reading stops at the end-of-archive block; drain the rest so the
    // decompressor reaches and verifies its trailer.
    std::io::copy(&mut tarball.into_inner(), &mut std::io::sink())
        .map_err(|e| corrupt(archive, e))?;

    Ok((count, top_level))
}

fn extract_zip<R: Read + std::io::Seek>(
    reader: R,
    archive: &Path,
    dest: &Path,
) -> Result<(usize, BTreeSet<String>), UnpackError> {
    let mut zip = ZipArchive::new(reader).map_err(|e| corrupt(archive, e))?;
    let mut count = 0;
    let mut top_level = BTreeSet::new();

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(|e| corrupt(archive, e))?;

        // enclosed_name rejects absolute paths and `..` escapes
        let Some(entry_path) = entry.enclosed_name().map(|p| p.to_path_buf()) else {
            debug!("Skipped entry outside destination: {}", entry.name());
            continue;
        };

        let target = dest.join(&entry_path);
        if entry.is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&target)?;
            // the entry reader checks the CRC once it reaches the end
            std::io::copy(&mut entry, &mut out).map_err(|e| corrupt(archive, e))?;
        }

        record_top_level(&mut top_level, &entry_path);
        count += 1;
    }

    Ok((count, top_level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        path
    }

    fn unpacker(dest: &Path) -> ArchiveUnpacker {
        ArchiveUnpacker::new(UnpackConfig {
            dest_dir: dest.to_path_buf(),
        })
    }

    #[test]
    fn test_detect_tar_gz() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "world.tar.gz", &fixtures::world_archive());
        assert_eq!(detect_format(&path).unwrap(), ArchiveFormat::TarGz);
    }

    #[test]
    fn test_detect_plain_tar() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "world.tar", &fixtures::world_tar());
        assert_eq!(detect_format(&path).unwrap(), ArchiveFormat::Tar);
    }

    #[test]
    fn test_detect_other_formats() {
        let dir = TempDir::new().unwrap();
        let cases = [
            ("world.tar.bz2", fixtures::world_archive_bz2(), ArchiveFormat::TarBz2),
            ("world.tar.xz", fixtures::world_archive_xz(), ArchiveFormat::TarXz),
            ("world.zip", fixtures::world_zip(), ArchiveFormat::Zip),
        ];
        for (name, bytes, expected) in cases {
            let path = write_file(&dir, name, &bytes);
            assert_eq!(detect_format(&path).unwrap(), expected, "{}", name);
        }
    }

    #[test]
    fn test_detect_unrecognized() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "world.tar.gz", b"<html>Access denied</html>");
        assert!(matches!(
            detect_format(&path),
            Err(UnpackError::UnrecognizedFormat { .. })
        ));

        let empty = write_file(&dir, "empty.tar.gz", b"");
        assert!(matches!(
            detect_format(&empty),
            Err(UnpackError::UnrecognizedFormat { .. })
        ));
    }

    #[test]
    fn test_detect_missing_file() {
        let result = detect_format(Path::new("/nonexistent/world.tar.gz"));
        assert!(matches!(result, Err(UnpackError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_unpack_tar_gz_populates_world_tree() {
        let dir = TempDir::new().unwrap();
        let archive = write_file(&dir, "world.tar.gz", &fixtures::world_archive());
        let dest = dir.path().join("out");

        let tree = unpacker(&dest).unpack(&archive).await.unwrap();

        assert_eq!(tree.format, ArchiveFormat::TarGz);
        assert_eq!(tree.entries, fixtures::WORLD_FILES.len());
        assert_eq!(tree.top_level, vec!["world".to_string()]);
        for name in fixtures::WORLD_FILES {
            let on_disk = std::fs::read(dest.join(name)).unwrap();
            assert_eq!(on_disk, fixtures::file_contents(name));
        }
    }

    #[tokio::test]
    async fn test_unpack_plain_tar() {
        let dir = TempDir::new().unwrap();
        let archive = write_file(&dir, "world.tar", &fixtures::world_tar());
        let dest = dir.path().join("out");

        let tree = unpacker(&dest).unpack(&archive).await.unwrap();
        assert_eq!(tree.format, ArchiveFormat::Tar);
        assert!(dest.join("world/level.dat").is_file());
    }

    #[tokio::test]
    async fn test_unpack_compressed_tar_variants() {
        let dir = TempDir::new().unwrap();
        let cases = [
            ("world.tar.bz2", fixtures::world_archive_bz2(), ArchiveFormat::TarBz2),
            ("world.tar.xz", fixtures::world_archive_xz(), ArchiveFormat::TarXz),
        ];
        for (name, bytes, expected) in cases {
            let archive = write_file(&dir, name, &bytes);
            let dest = dir.path().join(format!("out-{}", name));

            let tree = unpacker(&dest).unpack(&archive).await.unwrap();
            assert_eq!(tree.format, expected);
            assert_eq!(tree.entries, fixtures::WORLD_FILES.len());
            for file in fixtures::WORLD_FILES {
                assert_eq!(
                    std::fs::read(dest.join(file)).unwrap(),
                    fixtures::file_contents(file)
                );
            }
        }
    }

    #[tokio::test]
    async fn test_unpack_zip() {
        let dir = TempDir::new().unwrap();
        let archive = write_file(&dir, "world.zip", &fixtures::world_zip());
        let dest = dir.path().join("out");

        let tree = unpacker(&dest).unpack(&archive).await.unwrap();

        assert_eq!(tree.format, ArchiveFormat::Zip);
        assert_eq!(tree.entries, fixtures::WORLD_FILES.len());
        assert_eq!(tree.top_level, vec!["world".to_string()]);
        for name in fixtures::WORLD_FILES {
            assert_eq!(
                std::fs::read(dest.join(name)).unwrap(),
                fixtures::file_contents(name)
            );
        }
    }

    #[tokio::test]
    async fn test_unpack_truncated_zip_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let bytes = fixtures::world_zip();
        let archive = write_file(&dir, "world.zip", &bytes[..bytes.len() - 30]);

        let result = unpacker(&dir.path().join("out")).unpack(&archive).await;
        assert!(matches!(result, Err(UnpackError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn test_unpack_missing_gzip_trailer_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let bytes = fixtures::world_archive();
        for cut in [1, 4, 8] {
            let archive = write_file(&dir, "world.tar.gz", &bytes[..bytes.len() - cut]);
            let result = unpacker(&dir.path().join("out")).unpack(&archive).await;
            assert!(
                matches!(result, Err(UnpackError::Corrupt { .. })),
                "cut {} bytes: {:?}",
                cut,
                result
            );
        }
    }

    #[tokio::test]
    async fn test_unpack_bad_gzip_checksum_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let mut bytes = fixtures::world_archive();
        let crc_start = bytes.len() - 8;
        bytes[crc_start] ^= 0xff;
        let archive = write_file(&dir, "world.tar.gz", &bytes);

        let result = unpacker(&dir.path().join("out")).unpack(&archive).await;
        assert!(matches!(result, Err(UnpackError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn test_unpack_truncated_xz_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let bytes = fixtures::world_archive_xz();
        let archive = write_file(&dir, "world.tar.xz", &bytes[..bytes.len() - 4]);

        let result = unpacker(&dir.path().join("out")).unpack(&archive).await;
        assert!(matches!(result, Err(UnpackError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn test_unpack_truncated_archive_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let bytes = fixtures::world_archive();
        let archive = write_file(&dir, "world.tar.gz", &bytes[..bytes.len() / 2]);

        let result = unpacker(&dir.path().join("out")).unpack(&archive).await;
        assert!(matches!(result, Err(UnpackError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn test_unpack_garbage_after_gzip_magic_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let archive = write_file(&dir, "world.tar.gz", &[0x1f, 0x8b, 0xff, 0x00, 0x13, 0x37]);

        let result = unpacker(&dir.path().join("out")).unpack(&archive).await;
        assert!(matches!(result, Err(UnpackError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn test_unpack_overwrites_previous_extraction() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("out");
        std::fs::create_dir_all(dest.join("world")).unwrap();
        std::fs::write(dest.join("world/level.dat"), b"stale").unwrap();

        let archive = write_file(&dir, "world.tar.gz", &fixtures::world_archive());
        unpacker(&dest).unpack(&archive).await.unwrap();

        let level = std::fs::read(dest.join("world/level.dat")).unwrap();
        assert_ne!(level, b"stale");
    }
}

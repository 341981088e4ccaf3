//! Testing utilities and mock implementations.
//!
//! Provides a [`MockCommandRunner`] standing in for the renderer and `rsync`,
//! and archive fixtures shaped like a realm backup.
//!
//! # Example
//!
//! ```rust,ignore
//! use realmsync_core::testing::MockCommandRunner;
//!
//! let runner = MockCommandRunner::new();
//! runner.set_exit_code("rsync", 12).await;
//!
//! let pipeline = Pipeline::new(config, Arc::new(runner.clone()))?;
//! let err = pipeline.run(&credentials).await.unwrap_err();
//! assert_eq!(runner.invocation_count().await, 3);
//! ```

mod mock_runner;

pub use mock_runner::MockCommandRunner;

/// Archive fixtures.
pub mod fixtures {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::{Cursor, Write};

    /// Files inside [`world_archive`], relative to the extraction root.
    pub const WORLD_FILES: [&str; 3] = [
        "world/level.dat",
        "world/region/r.0.0.mca",
        "world/data/raids.dat",
    ];

    /// Contents of a [`WORLD_FILES`] entry.
    pub fn file_contents(name: &str) -> Vec<u8> {
        match name {
            "world/level.dat" => b"level data".to_vec(),
            "world/region/r.0.0.mca" => region_bytes(),
            "world/data/raids.dat" => b"raids".to_vec(),
            _ => Vec::new(),
        }
    }

    /// Deterministic, poorly compressible bytes so a truncated archive ends
    /// inside the region entry rather than at an entry boundary.
    fn region_bytes() -> Vec<u8> {
        let mut state: u32 = 0x2545_f491;
        (0..16 * 1024)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state >> 24) as u8
            })
            .collect()
    }

    /// Plain tarball of a small world tree.
    pub fn world_tar() -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for name in WORLD_FILES {
            let bytes = file_contents(name);
            let mut header = tar::Header::new_gnu();
            header.set_size(bytes.len() as u64);
            header.set_mode(0o644);
            builder
                .append_data(&mut header, name, bytes.as_slice())
                .expect("append tar entry");
        }
        builder.into_inner().expect("finish tar")
    }

    /// Gzip-compressed [`world_tar`], the shape of a realm backup.
    pub fn world_archive() -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&world_tar()).expect("compress tar");
        encoder.finish().expect("finish gzip")
    }

    /// Bzip2-compressed [`world_tar`].
    pub fn world_archive_bz2() -> Vec<u8> {
        let mut encoder =
            bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
        encoder.write_all(&world_tar()).expect("compress tar");
        encoder.finish().expect("finish bzip2")
    }

    /// Xz-compressed [`world_tar`].
    pub fn world_archive_xz() -> Vec<u8> {
        let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
        encoder.write_all(&world_tar()).expect("compress tar");
        encoder.finish().expect("finish xz")
    }

    /// Zip archive holding the same files as [`world_tar`].
    pub fn world_zip() -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for name in WORLD_FILES {
            writer
                .start_file(name, zip::write::SimpleFileOptions::default())
                .expect("start zip entry");
            writer
                .write_all(&file_contents(name))
                .expect("write zip entry");
        }
        writer.finish().expect("finish zip").into_inner()
    }
}

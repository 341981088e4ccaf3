//! Streaming archive downloader.

use std::path::PathBuf;
use std::time::Duration;

use futures::StreamExt;
use reqwest::Client;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::config::DownloadConfig;
use crate::realms::DownloadDescriptor;

use super::error::FetchError;

/// Archive written to the configured output path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveFile {
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Hex SHA-256 of the bytes on disk
    pub sha256: String,
}

/// Downloads a backup from a [`DownloadDescriptor`].
///
/// The link is fetched without session cookies.
pub struct BackupFetcher {
    client: Client,
    config: DownloadConfig,
}

impl BackupFetcher {
    /// Create a new fetcher.
    pub fn new(config: DownloadConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// Download the archive, truncating any previous file at the output path.
    ///
    /// The status is checked before the file is opened, so a rejected
    /// download leaves an existing archive untouched. A transfer that fails
    /// midway leaves a truncated file behind.
    pub async fn fetch(&self, descriptor: &DownloadDescriptor) -> Result<ArchiveFile, FetchError> {
        let path = self.config.output_file.clone();

        info!("Downloading backup to {}", path.display());
        let response = self.client.get(&descriptor.download_link).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Api {
                status: status.as_u16(),
            });
        }

        if let Some(len) = response.content_length() {
            debug!("Expecting {} bytes", len);
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| FetchError::io(parent, e))?;
        }

        let mut file = File::create(&path)
            .await
            .map_err(|e| FetchError::io(&path, e))?;

        let mut hasher = Sha256::new();
        let mut size_bytes = 0u64;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            hasher.update(&chunk);
            size_bytes += chunk.len() as u64;
            file.write_all(&chunk)
                .await
                .map_err(|e| FetchError::io(&path, e))?;
        }

        file.flush().await.map_err(|e| FetchError::io(&path, e))?;

        let sha256 = format!("{:x}", hasher.finalize());
        info!("Download successful: {} bytes, sha256 {}", size_bytes, &sha256[..16]);

        Ok(ArchiveFile {
            path,
            size_bytes,
            sha256,
        })
    }

    /// Configured output path.
    pub fn output_file(&self) -> &std::path::Path {
        &self.config.output_file
    }
}

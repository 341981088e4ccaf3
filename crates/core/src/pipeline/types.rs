//! Types for the pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::archive::{UnpackError, UnpackedWorldTree};
use crate::auth::AuthError;
use crate::fetcher::{ArchiveFile, FetchError};
use crate::realms::RealmsError;
use crate::render::ProcessError;

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Authenticate,
    LocateRealm,
    FetchBackup,
    Unpack,
    Render,
    Publish,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Authenticate,
        Stage::LocateRealm,
        Stage::FetchBackup,
        Stage::Unpack,
        Stage::Render,
        Stage::Publish,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Authenticate => "authenticate",
            Stage::LocateRealm => "locate_realm",
            Stage::FetchBackup => "fetch_backup",
            Stage::Unpack => "unpack",
            Stage::Render => "render",
            Stage::Publish => "publish",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse error classes, independent of the stage that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Credentials rejected or auth service error.
    Authentication,
    /// A response lacked required fields.
    MalformedResponse,
    /// Transport failure or non-success HTTP status.
    Network,
    /// Configured realm not present in the listing.
    RealmSelection,
    /// Local disk failure.
    Io,
    /// Archive missing, unrecognised or corrupt.
    Unpack,
    /// External tool missing or exited non-zero.
    Process,
}

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// HTTP client construction failed before any stage ran.
    #[error("failed to set up HTTP client: {0}")]
    Setup(String),

    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("realm lookup failed: {0}")]
    Realms(#[from] RealmsError),

    #[error("download link request failed: {0}")]
    DownloadLink(RealmsError),

    #[error("backup download failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("unpacking failed: {0}")]
    Unpack(#[from] UnpackError),

    #[error("{stage} failed: {source}")]
    Process {
        stage: Stage,
        #[source]
        source: ProcessError,
    },
}

impl PipelineError {
    /// The stage that failed; `None` for setup failures.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Setup(_) => None,
            Self::Auth(_) => Some(Stage::Authenticate),
            Self::Realms(_) => Some(Stage::LocateRealm),
            Self::DownloadLink(_) => Some(Stage::FetchBackup),
            Self::Fetch(_) => Some(Stage::FetchBackup),
            Self::Unpack(_) => Some(Stage::Unpack),
            Self::Process { stage, .. } => Some(*stage),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Setup(_) => ErrorKind::Network,
            Self::Auth(AuthError::MalformedResponse(_)) => ErrorKind::MalformedResponse,
            Self::Auth(_) => ErrorKind::Authentication,
            Self::Realms(e) | Self::DownloadLink(e) => match e {
                RealmsError::MalformedResponse(_) => ErrorKind::MalformedResponse,
                RealmsError::IndexOutOfRange { .. } | RealmsError::NoMatch { .. } => {
                    ErrorKind::RealmSelection
                }
                RealmsError::Http(_) | RealmsError::Api { .. } => ErrorKind::Network,
            },
            Self::Fetch(FetchError::Io { .. }) => ErrorKind::Io,
            Self::Fetch(_) => ErrorKind::Network,
            Self::Unpack(_) => ErrorKind::Unpack,
            Self::Process { .. } => ErrorKind::Process,
        }
    }
}

/// Wall-clock duration of one completed stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageTiming {
    pub stage: Stage,
    pub duration_ms: u64,
}

/// Summary of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub display_name: String,
    pub world_id: String,
    pub backup_slot: String,
    pub archive: ArchiveFile,
    pub unpacked: UnpackedWorldTree,
    pub stages: Vec<StageTiming>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn total_duration_ms(&self) -> u64 {
        self.stages.iter().map(|s| s.duration_ms).sum()
    }
}

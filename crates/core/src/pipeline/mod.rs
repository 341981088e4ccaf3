//! Backup-to-map pipeline.
//!
//! Runs the stages strictly in order, each consuming the previous stage's
//! output:
//! - **Authenticate**: credentials to session
//! - **LocateRealm**: session to realm reference
//! - **FetchBackup**: download link, then archive on disk
//! - **Unpack**: archive to world tree
//! - **Render**: renderer full pass and points-of-interest pass
//! - **Publish**: rsync of the render output
//!
//! The first failure aborts the run; no later stage executes.

mod runner;
mod types;

pub use runner::Pipeline;
pub use types::{ErrorKind, PipelineError, RunReport, Stage, StageTiming};

//! Remote synchronisation of the rendered map.

use std::sync::Arc;

use tracing::info;

use crate::config::PublishConfig;

use super::error::ProcessError;
use super::runner::{CommandInvocation, CommandRunner};

/// Pushes the render output tree to the remote host over a remote shell.
///
/// Incremental transfer is left entirely to the remote-copy tool.
pub struct MapPublisher {
    config: PublishConfig,
    runner: Arc<dyn CommandRunner>,
}

impl MapPublisher {
    pub fn new(config: PublishConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    /// `<command> <extra_args..> -ae <shell> <local_dir> <user>@<host>:<path>`
    pub fn invocation(&self) -> CommandInvocation {
        let mut args = self.config.extra_args.clone();
        args.extend([
            "-ae".to_string(),
            self.config.shell.clone(),
            self.config.local_dir.display().to_string(),
            self.config.destination(),
        ]);
        CommandInvocation::new(&self.config.command, args)
    }

    pub async fn publish(&self) -> Result<(), ProcessError> {
        info!("Starting {} upload to {}...", self.config.command, self.config.destination());
        self.runner.run_checked(&self.invocation()).await?;
        info!("Upload completed successfully");
        Ok(())
    }
}

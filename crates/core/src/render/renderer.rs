//! Map renderer invocation.

use std::sync::Arc;

use tracing::info;

use crate::config::RenderConfig;

use super::error::ProcessError;
use super::runner::{CommandInvocation, CommandRunner};

const POI_FLAG: &str = "--genpoi";

/// Regenerates the static map from the unpacked world.
pub struct MapRenderer {
    config: RenderConfig,
    runner: Arc<dyn CommandRunner>,
}

impl MapRenderer {
    pub fn new(config: RenderConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    /// The invocations `render` runs, in order.
    pub fn invocations(&self) -> Vec<CommandInvocation> {
        let config_arg = format!("--config={}", self.config.config_file.display());

        let mut passes = vec![CommandInvocation::new(
            &self.config.command,
            [config_arg.clone()],
        )];
        if self.config.generate_poi {
            passes.push(CommandInvocation::new(
                &self.config.command,
                [config_arg, POI_FLAG.to_string()],
            ));
        }
        for pass in &mut passes {
            pass.current_dir = self.config.working_dir.clone();
        }
        passes
    }

    /// Full render pass, then the points-of-interest pass.
    ///
    /// Stops at the first pass that exits non-zero.
    pub async fn render(&self) -> Result<(), ProcessError> {
        info!("Running {}...", self.config.command);
        for invocation in self.invocations() {
            info!("Render pass: {}", invocation.display());
            self.runner.run_checked(&invocation).await?;
        }
        info!("{} successful", self.config.command);
        Ok(())
    }
}

//! Sequential pipeline runner.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::info;

use crate::archive::ArchiveUnpacker;
use crate::auth::{Authenticator, Credentials};
use crate::config::Config;
use crate::fetcher::BackupFetcher;
use crate::realms::RealmsClient;
use crate::render::{CommandRunner, MapPublisher, MapRenderer};

use super::types::{PipelineError, RunReport, Stage, StageTiming};

/// Runs one backup-to-map pass.
///
/// Components are built from the [`Config`] once; the runner decides how
/// external tools are executed.
pub struct Pipeline {
    authenticator: Authenticator,
    realms: RealmsClient,
    fetcher: BackupFetcher,
    unpacker: ArchiveUnpacker,
    renderer: MapRenderer,
    publisher: MapPublisher,
}

impl Pipeline {
    /// Creates a new pipeline.
    pub fn new(config: Config, runner: Arc<dyn CommandRunner>) -> Result<Self, PipelineError> {
        let authenticator =
            Authenticator::new(config.auth).map_err(|e| PipelineError::Setup(e.to_string()))?;
        let realms =
            RealmsClient::new(config.realms).map_err(|e| PipelineError::Setup(e.to_string()))?;
        let fetcher =
            BackupFetcher::new(config.download).map_err(|e| PipelineError::Setup(e.to_string()))?;

        Ok(Self {
            authenticator,
            realms,
            fetcher,
            unpacker: ArchiveUnpacker::new(config.unpack),
            renderer: MapRenderer::new(config.render, Arc::clone(&runner)),
            publisher: MapPublisher::new(config.publish, runner),
        })
    }

    /// Runs every stage in order, stopping at the first failure.
    pub async fn run(&self, credentials: &Credentials) -> Result<RunReport, PipelineError> {
        let started_at = Utc::now();
        let mut stages = Vec::with_capacity(Stage::ALL.len());

        info!("Beginning realm backup processing...");

        let clock = Instant::now();
        let session = self.authenticator.authenticate(credentials).await?;
        finish(&mut stages, Stage::Authenticate, clock);

        let clock = Instant::now();
        let realm = self.realms.locate(&session).await?;
        finish(&mut stages, Stage::LocateRealm, clock);

        let clock = Instant::now();
        let slot = self.realms.backup_slot().to_string();
        let descriptor = self
            .realms
            .download_link(&session, &realm, &slot)
            .await
            .map_err(PipelineError::DownloadLink)?;
        let archive = self.fetcher.fetch(&descriptor).await?;
        finish(&mut stages, Stage::FetchBackup, clock);

        let clock = Instant::now();
        let unpacked = self.unpacker.unpack(&archive.path).await?;
        finish(&mut stages, Stage::Unpack, clock);

        let clock = Instant::now();
        self.renderer
            .render()
            .await
            .map_err(|source| PipelineError::Process {
                stage: Stage::Render,
                source,
            })?;
        finish(&mut stages, Stage::Render, clock);

        let clock = Instant::now();
        self.publisher
            .publish()
            .await
            .map_err(|source| PipelineError::Process {
                stage: Stage::Publish,
                source,
            })?;
        finish(&mut stages, Stage::Publish, clock);

        Ok(RunReport {
            display_name: session.display_name,
            world_id: realm.world_id,
            backup_slot: slot,
            archive,
            unpacked,
            stages,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

fn finish(stages: &mut Vec<StageTiming>, stage: Stage, clock: Instant) {
    let duration_ms = clock.elapsed().as_millis() as u64;
    info!("Stage {} completed in {} ms", stage, duration_ms);
    stages.push(StageTiming { stage, duration_ms });
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use realmsync_core::{
    load_config, load_config_from_env, validate_config, Config, Credentials, Pipeline,
    ProcessRunner,
};

/// Config file looked up in the working directory when `REALMSYNC_CONFIG` is unset.
const DEFAULT_CONFIG_FILE: &str = "realmsync.toml";

/// Download the latest realm backup, render it into a map and publish it.
#[derive(Debug, Parser)]
#[command(name = "realmsync", version, about)]
struct Cli {
    /// Account username (usually an email address)
    username: String,
    /// Account password
    password: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("Fatal error: {:#}", e);
        // The filter may silence tracing entirely; stderr always gets the reason.
        eprintln!("realmsync: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = resolve_config()?;
    validate_config(&config).context("Configuration validation failed")?;

    info!("Realm selector: {}", config.realms.selector);
    info!("Output file: {:?}", config.download.output_file);

    let runner = Arc::new(ProcessRunner::new(config.runner.capture_output));
    let pipeline = Pipeline::new(config, runner).context("Failed to set up pipeline")?;

    let credentials = Credentials::new(cli.username, cli.password);
    let report = pipeline.run(&credentials).await.map_err(|e| {
        let stage = e
            .stage()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "setup".to_string());
        anyhow::Error::new(e).context(format!("Stage {} failed", stage))
    })?;

    info!(
        "Published map for realm {} ({} bytes, sha256 {}) in {} ms",
        report.world_id,
        report.archive.size_bytes,
        report.archive.sha256,
        report.total_duration_ms()
    );
    debug!(
        "Run report: {}",
        serde_json::to_string(&report).context("Failed to serialize run report")?
    );

    Ok(())
}

/// `REALMSYNC_CONFIG`, else `realmsync.toml` if present, else env and defaults.
fn resolve_config() -> Result<Config> {
    if let Ok(path) = std::env::var("REALMSYNC_CONFIG") {
        return load_from(&PathBuf::from(path));
    }

    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        return load_from(default_path);
    }

    info!("No config file found, using environment and defaults");
    load_config_from_env().context("Failed to load config from environment")
}

fn load_from(path: &Path) -> Result<Config> {
    info!("Loading configuration from {:?}", path);
    load_config(path).with_context(|| format!("Failed to load config from {:?}", path))
}

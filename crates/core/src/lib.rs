pub mod archive;
pub mod auth;
pub mod config;
pub mod fetcher;
pub mod pipeline;
pub mod realms;
pub mod render;
pub mod testing;

pub use archive::{detect_format, ArchiveFormat, ArchiveUnpacker, UnpackError, UnpackedWorldTree};
pub use auth::{AuthError, Authenticator, Credentials, Session};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, AuthConfig, Config,
    ConfigError, DownloadConfig, PublishConfig, RealmSelector, RealmsConfig, RenderConfig,
    RunnerConfig, UnpackConfig,
};
pub use fetcher::{ArchiveFile, BackupFetcher, FetchError};
pub use pipeline::{ErrorKind, Pipeline, PipelineError, RunReport, Stage, StageTiming};
pub use realms::{
    select_realm, DownloadDescriptor, RealmReference, RealmSummary, RealmsClient, RealmsError,
};
pub use render::{
    CommandInvocation, CommandOutput, CommandRunner, MapPublisher, MapRenderer, ProcessError,
    ProcessRunner,
};

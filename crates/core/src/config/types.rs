use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub realms: RealmsConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub unpack: UnpackConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub publish: PublishConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
}

/// Account authentication endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Authentication endpoint URL
    #[serde(default = "default_auth_url")]
    pub url: String,
    /// Static client token sent with every authentication request
    #[serde(default = "default_client_token")]
    pub client_token: String,
    /// Agent name reported to the authentication service
    #[serde(default = "default_agent_name")]
    pub agent_name: String,
    /// Agent version reported to the authentication service
    #[serde(default = "default_agent_version")]
    pub agent_version: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            url: default_auth_url(),
            client_token: default_client_token(),
            agent_name: default_agent_name(),
            agent_version: default_agent_version(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_auth_url() -> String {
    "https://authserver.mojang.com/authenticate".to_string()
}

fn default_client_token() -> String {
    "github.com/air/minecraft-tools".to_string()
}

fn default_agent_name() -> String {
    "Minecraft".to_string()
}

fn default_agent_version() -> String {
    "1".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Realms service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RealmsConfig {
    /// Realm listing endpoint; download links live below it
    #[serde(default = "default_realms_url")]
    pub url: String,
    /// Game version sent in the session cookie
    #[serde(default = "default_game_version")]
    pub game_version: String,
    /// Which realm of the listing to back up
    #[serde(default)]
    pub selector: RealmSelector,
    /// Backup slot to download
    #[serde(default = "default_backup_slot")]
    pub backup_slot: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for RealmsConfig {
    fn default() -> Self {
        Self {
            url: default_realms_url(),
            game_version: default_game_version(),
            selector: RealmSelector::default(),
            backup_slot: default_backup_slot(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_realms_url() -> String {
    "https://pc.realms.minecraft.net/worlds".to_string()
}

fn default_game_version() -> String {
    "1.16.5".to_string()
}

fn default_backup_slot() -> String {
    "1".to_string()
}

/// Selects one realm out of the account's listing.
///
/// `Index` is positional: it picks `servers[n]` as returned by the service and
/// breaks silently if the service reorders the list. Prefer `Name` or `Id`
/// when the account hosts more than one realm.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RealmSelector {
    Index(usize),
    Name(String),
    Id(String),
}

impl Default for RealmSelector {
    fn default() -> Self {
        RealmSelector::Index(1)
    }
}

impl fmt::Display for RealmSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RealmSelector::Index(index) => write!(f, "index {}", index),
            RealmSelector::Name(name) => write!(f, "name '{}'", name),
            RealmSelector::Id(id) => write!(f, "id '{}'", id),
        }
    }
}

/// Archive download configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloadConfig {
    /// Local archive path, overwritten on every run
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,
    /// Whole-transfer timeout in seconds (unset: no limit)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_file: default_output_file(),
            timeout_secs: None,
        }
    }
}

fn default_output_file() -> PathBuf {
    PathBuf::from("world.tar.gz")
}

/// Archive extraction configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UnpackConfig {
    /// Extraction target
    #[serde(default = "default_dest_dir")]
    pub dest_dir: PathBuf,
}

impl Default for UnpackConfig {
    fn default() -> Self {
        Self {
            dest_dir: default_dest_dir(),
        }
    }
}

fn default_dest_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Map renderer configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RenderConfig {
    /// Renderer executable
    #[serde(default = "default_render_command")]
    pub command: String,
    /// Renderer configuration file passed as `--config=<file>`
    #[serde(default = "default_render_config_file")]
    pub config_file: PathBuf,
    /// Run the points-of-interest pass after the render
    #[serde(default = "default_true")]
    pub generate_poi: bool,
    /// Directory the renderer runs in (unset: the current directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            command: default_render_command(),
            config_file: default_render_config_file(),
            generate_poi: true,
            working_dir: None,
        }
    }
}

fn default_render_command() -> String {
    "mc-ovw".to_string()
}

fn default_render_config_file() -> PathBuf {
    PathBuf::from("config.py")
}

fn default_true() -> bool {
    true
}

/// Remote publishing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PublishConfig {
    /// Remote-copy executable
    #[serde(default = "default_publish_command")]
    pub command: String,
    /// Remote shell used as transport
    #[serde(default = "default_shell")]
    pub shell: String,
    /// Arguments placed before the transfer flags
    #[serde(default = "default_publish_extra_args")]
    pub extra_args: Vec<String>,
    /// Rendered map directory
    #[serde(default = "default_local_dir")]
    pub local_dir: PathBuf,
    #[serde(default = "default_remote_user")]
    pub remote_user: String,
    #[serde(default = "default_remote_host")]
    pub remote_host: String,
    #[serde(default = "default_remote_path")]
    pub remote_path: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            command: default_publish_command(),
            shell: default_shell(),
            extra_args: default_publish_extra_args(),
            local_dir: default_local_dir(),
            remote_user: default_remote_user(),
            remote_host: default_remote_host(),
            remote_path: default_remote_path(),
        }
    }
}

impl PublishConfig {
    /// Remote destination in `user@host:path` form
    pub fn destination(&self) -> String {
        format!(
            "{}@{}:{}",
            self.remote_user, self.remote_host, self.remote_path
        )
    }
}

fn default_publish_command() -> String {
    "rsync".to_string()
}

fn default_shell() -> String {
    "ssh".to_string()
}

fn default_publish_extra_args() -> Vec<String> {
    vec!["--info=progress2".to_string()]
}

fn default_local_dir() -> PathBuf {
    PathBuf::from("/home/USER/overviewer/mc-map/")
}

fn default_remote_user() -> String {
    "USER".to_string()
}

fn default_remote_host() -> String {
    "HOST.com".to_string()
}

fn default_remote_path() -> String {
    "~/HOST.com/mc-map".to_string()
}

/// External process runner configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RunnerConfig {
    /// Capture stdout/stderr instead of inheriting the terminal
    #[serde(default)]
    pub capture_output: bool,
}

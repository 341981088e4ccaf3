use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Endpoint URLs are non-empty http(s) URLs
/// - Timeouts are not 0
/// - Command names, backup slot, output path and remote target are set
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    check_url("auth.url", &config.auth.url)?;
    check_url("realms.url", &config.realms.url)?;

    check_timeout("auth.timeout_secs", config.auth.timeout_secs)?;
    check_timeout("realms.timeout_secs", config.realms.timeout_secs)?;
    if let Some(secs) = config.download.timeout_secs {
        check_timeout("download.timeout_secs", secs)?;
    }

    check_not_empty("realms.backup_slot", &config.realms.backup_slot)?;
    check_not_empty("render.command", &config.render.command)?;
    check_not_empty("publish.command", &config.publish.command)?;
    check_not_empty("publish.shell", &config.publish.shell)?;
    check_not_empty("publish.remote_user", &config.publish.remote_user)?;
    check_not_empty("publish.remote_host", &config.publish.remote_host)?;
    check_not_empty("publish.remote_path", &config.publish.remote_path)?;

    if config.download.output_file.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "download.output_file cannot be empty".to_string(),
        ));
    }

    if config.realms.backup_slot.contains('/') {
        return Err(ConfigError::ValidationError(
            "realms.backup_slot cannot contain '/'".to_string(),
        ));
    }

    Ok(())
}

fn check_url(field: &str, url: &str) -> Result<(), ConfigError> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "{} must be an http(s) URL, got '{}'",
            field, url
        )));
    }
    Ok(())
}

fn check_timeout(field: &str, secs: u64) -> Result<(), ConfigError> {
    if secs == 0 {
        return Err(ConfigError::ValidationError(format!(
            "{} cannot be 0",
            field
        )));
    }
    Ok(())
}

fn check_not_empty(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "{} cannot be empty",
            field
        )));
    }
    Ok(())
}

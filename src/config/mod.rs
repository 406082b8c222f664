mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, io::ErrorKind, path::Path};
use tracing::debug;

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
    load_from(&config_path).await
}

/// Reads a YAML config file. A missing file yields the built-in defaults.
pub async fn load_from(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    debug!("Loading configuration from: {}", path.display());

    let config_str = match tokio::fs::read_to_string(path).await {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No configuration file at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        Err(e) => return Err(e.into()),
    };

    let config: Config = serde_yaml::from_str(&config_str)?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.server.session_ttl_secs == 0 {
        return Err(Error::config("server.session_ttl_secs must be greater than zero"));
    }
    if config.server.max_sessions == 0 {
        return Err(Error::config("server.max_sessions must be greater than zero"));
    }
    if config.api.endpoint.trim().is_empty() {
        return Err(Error::config("api.endpoint must not be empty"));
    }
    if config.api.timeout_secs == 0 {
        return Err(Error::config("api.timeout_secs must be greater than zero"));
    }
    if config.api.field_name.trim().is_empty() {
        return Err(Error::config("api.field_name must not be empty"));
    }
    if config.ui.preview_width == 0 {
        return Err(Error::config("ui.preview_width must be greater than zero"));
    }
    Ok(())
}

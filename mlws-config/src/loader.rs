use std::env;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::MlwsConfig;
use crate::paths::default_config_path;
use mlws_core::error::{Result, WsError};

/// Load configuration from `path`, or from the default location.
///
/// An explicit path must exist. The default location is optional and falls
/// back to built-in defaults when missing.
pub fn load_config(path: Option<&Path>) -> Result<MlwsConfig> {
    let mut config = match path {
        Some(explicit) => read_file(explicit)?,
        None => {
            let default_path = default_config_path();
            if default_path.is_file() {
                read_file(&default_path)?
            } else {
                debug!(path = %default_path.display(), "No config file, using defaults");
                MlwsConfig::default()
            }
        }
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<MlwsConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        WsError::Config(format!("Failed to read {}: {}", path.display(), e))
    })?;
    debug!(path = %path.display(), "Loaded config file");

    if content.trim().is_empty() {
        return Ok(MlwsConfig::default());
    }
    serde_yaml_ng::from_str(&content)
        .map_err(|e| WsError::Config(format!("Invalid YAML in {}: {}", path.display(), e)))
}

/// Apply `MLWS_REGION`, `MLWS_RECLAIM_MAX_ATTEMPTS` and
/// `MLWS_RECLAIM_DELAY_SECS`.
pub fn apply_env_overrides(config: &mut MlwsConfig) -> Result<()> {
    if let Ok(region) = env::var("MLWS_REGION") {
        if !region.trim().is_empty() {
            config.region = region;
        }
    }
    if let Ok(raw) = env::var("MLWS_RECLAIM_MAX_ATTEMPTS") {
        config.reclaim.max_attempts = raw.trim().parse().map_err(|_| {
            WsError::Config(format!("MLWS_RECLAIM_MAX_ATTEMPTS is not a number: {raw}"))
        })?;
    }
    if let Ok(raw) = env::var("MLWS_RECLAIM_DELAY_SECS") {
        config.reclaim.delay_secs = raw.trim().parse().map_err(|_| {
            WsError::Config(format!("MLWS_RECLAIM_DELAY_SECS is not a number: {raw}"))
        })?;
    }
    Ok(())
}

use std::env;
use std::path::PathBuf;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "MLWS_CONFIG";

/// Default config file location.
/// Priority order:
/// 1. `MLWS_CONFIG` environment variable
/// 2. `<platform config dir>/mlws/config.yaml`
/// 3. `./mlws.yaml` when no config dir is known
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_ENV) {
        return PathBuf::from(path);
    }

    match dirs::config_dir() {
        Some(dir) => dir.join("mlws").join("config.yaml"),
        None => PathBuf::from("mlws.yaml"),
    }
}

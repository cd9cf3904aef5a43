//! Configuration for provisioning defaults.
//!
//! Resolution order, later wins: built-in defaults, the YAML file, then
//! `MLWS_*` environment variables. CLI flags are applied by the binary on
//! top of the returned [`MlwsConfig`].

pub mod config;
pub mod loader;
pub mod paths;

pub use config::{MlwsConfig, ReclaimSettings, StorageSettings, TelemetrySettings, VaultSettings};
pub use loader::{apply_env_overrides, load_config};

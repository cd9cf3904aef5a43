use std::time::Duration;

use serde::{Deserialize, Serialize};

use mlws_core::error::{Result, WsError};
use mlws_core::DEFAULT_REGION;

/// Root of `config.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MlwsConfig {
    /// Region used when `--region` is not passed
    pub region: String,

    /// Pass `--only-show-errors` to every `az` invocation
    pub suppress_warnings: bool,

    pub storage: StorageSettings,
    pub vault: VaultSettings,
    pub telemetry: TelemetrySettings,
    pub reclaim: ReclaimSettings,
}

impl Default for MlwsConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            suppress_warnings: true,
            storage: StorageSettings::default(),
            vault: VaultSettings::default(),
            telemetry: TelemetrySettings::default(),
            reclaim: ReclaimSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub sku: String,
    pub kind: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            sku: "Standard_LRS".to_string(),
            kind: "StorageV2".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultSettings {
    pub sku: String,
}

impl Default for VaultSettings {
    fn default() -> Self {
        Self {
            sku: "standard".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetrySettings {
    pub application_type: String,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            application_type: "web".to_string(),
        }
    }
}

/// Attempt budget for waiting on a purged vault name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReclaimSettings {
    pub max_attempts: u32,
    pub delay_secs: u64,
}

impl Default for ReclaimSettings {
    fn default() -> Self {
        Self {
            max_attempts: 12,
            delay_secs: 10,
        }
    }
}

impl ReclaimSettings {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

impl MlwsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.region.trim().is_empty() {
            return Err(WsError::Config("region must not be empty".to_string()));
        }
        if self.reclaim.max_attempts == 0 {
            return Err(WsError::Config(
                "reclaim.max_attempts must be at least 1".to_string(),
            ));
        }
        let skus = [
            ("storage.sku", &self.storage.sku),
            ("storage.kind", &self.storage.kind),
            ("vault.sku", &self.vault.sku),
            ("telemetry.application_type", &self.telemetry.application_type),
        ];
        for (field, value) in skus {
            if value.trim().is_empty() {
                return Err(WsError::Config(format!("{field} must not be empty")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = MlwsConfig::default();
        assert_eq!(config.region, "eastus");
        assert_eq!(config.reclaim.max_attempts, 12);
        assert_eq!(config.reclaim.delay(), Duration::from_secs(10));
        assert!(config.suppress_warnings);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: MlwsConfig =
            serde_yaml_ng::from_str("region: westeurope\nreclaim:\n  delay_secs: 3\n").unwrap();
        assert_eq!(config.region, "westeurope");
        assert_eq!(config.reclaim.delay_secs, 3);
        assert_eq!(config.reclaim.max_attempts, 12);
        assert_eq!(config.storage.sku, "Standard_LRS");
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = MlwsConfig::default();
        config.reclaim.max_attempts = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_attempts"));
    }

    #[test]
    fn test_empty_sku_rejected() {
        let mut config = MlwsConfig::default();
        config.vault.sku = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("vault.sku"));
    }
}

//! Cloud provider abstraction for workspace provisioning.
//!
//! The orchestration layer only ever sees the traits in this crate. Each
//! backend bundles them behind [`CloudProvider`]; [`get_provider`] picks one
//! by name.

// External crates
use serde::{Deserialize, Serialize};

// Internal imports
use mlws_core::error::Result;
use mlws_core::ResourceKind;

pub use mlws_core::error::{Result as WsResult, WsError};

pub mod error;

#[cfg(feature = "azure")]
pub mod azure;

// When the `test-helpers` feature is enabled, include the mock provider.
#[cfg(feature = "test-helpers")]
pub mod mock;

/// An authenticated session for one subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub subscription_id: String,
    pub account: Option<String>,
}

/// What the provider reports about one existing resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub kind: ResourceKind,
    pub name: String,
    /// Provider-scoped identifier, passed to the workspace at creation.
    pub id: String,
    pub resource_group: String,
    pub location: Option<String>,
}

/// Kind-specific settings for a create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOptions {
    Storage {
        sku: String,
        kind: String,
    },
    Telemetry {
        application_type: String,
    },
    Vault {
        sku: String,
    },
    Workspace {
        storage_account_id: String,
        key_vault_id: String,
        application_insights_id: String,
    },
}

impl CreateOptions {
    pub fn kind(&self) -> ResourceKind {
        match self {
            CreateOptions::Storage { .. } => ResourceKind::Storage,
            CreateOptions::Telemetry { .. } => ResourceKind::Telemetry,
            CreateOptions::Vault { .. } => ResourceKind::Vault,
            CreateOptions::Workspace { .. } => ResourceKind::Workspace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    pub name: String,
    pub resource_group: String,
    pub region: String,
    pub options: CreateOptions,
}

/// Establishes the session every other call runs under.
pub trait SessionApi {
    /// Fails with [`WsError::Auth`] when credentials are missing or expired.
    fn authenticate(&self, subscription_id: &str) -> Result<Session>;
}

pub trait ResourceGroupApi {
    fn exists(&self, name: &str) -> Result<bool>;

    fn create(&self, name: &str, region: &str) -> Result<()>;

    /// Starts deletion and returns without waiting for it to finish.
    fn delete(&self, name: &str) -> Result<()>;
}

/// Existence, creation and deletion of one kind of named resource.
pub trait NamedResourceApi {
    fn kind(&self) -> ResourceKind;

    fn exists(&self, name: &str, resource_group: &str) -> Result<bool> {
        Ok(self.show(name, resource_group)?.is_some())
    }

    /// Look up a resource, `None` when the provider reports it missing.
    fn show(&self, name: &str, resource_group: &str) -> Result<Option<ResourceDescriptor>>;

    fn create(&self, request: &CreateRequest) -> Result<ResourceDescriptor>;

    /// Forced delete, no confirmation.
    fn delete(&self, name: &str, resource_group: &str) -> Result<()>;

    fn list(&self, resource_group: &str) -> Result<Vec<ResourceDescriptor>>;
}

/// Vaults are retained after deletion ("soft-deleted") and keep their name
/// reserved until purged.
pub trait VaultApi: NamedResourceApi {
    /// Soft-deleted vault names are partitioned by region.
    fn exists_soft_deleted(&self, name: &str, region: &str) -> Result<bool>;

    /// Irreversible. The provider frees the name asynchronously, so success
    /// here does not mean the name is reusable yet.
    fn purge_soft_deleted(&self, name: &str, region: &str) -> Result<()>;
}

/// One backend: every API the provisioning and teardown flows need.
pub trait CloudProvider {
    /// Get the name of the provider (e.g., "azure", "mock").
    fn name(&self) -> &'static str;

    fn session(&self) -> &dyn SessionApi;

    fn resource_groups(&self) -> &dyn ResourceGroupApi;

    fn storage(&self) -> &dyn NamedResourceApi;

    fn telemetry(&self) -> &dyn NamedResourceApi;

    fn workspaces(&self) -> &dyn NamedResourceApi;

    fn registries(&self) -> &dyn NamedResourceApi;

    fn vaults(&self) -> &dyn VaultApi;
}

/// Backend-independent settings applied once at provider construction.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    pub subscription_id: Option<String>,
    /// Ask the backend to drop deprecation and breaking-change warnings.
    pub suppress_warnings: bool,
}

/// Creates a provider instance by name.
///
/// # Arguments
/// * `provider_name` - `"azure"`, or `"mock"` with the `test-helpers` feature
/// * `settings` - Settings fixed for the lifetime of the provider
#[cfg_attr(not(feature = "azure"), allow(unused_variables))]
pub fn get_provider(
    provider_name: &str,
    settings: ProviderSettings,
) -> Result<Box<dyn CloudProvider>> {
    #[cfg(feature = "test-helpers")]
    if provider_name == "mock" {
        return Ok(Box::new(mock::MockProvider::new()));
    }

    match provider_name {
        #[cfg(feature = "azure")]
        "azure" => Ok(Box::new(azure::AzureCliProvider::new(settings)?)),
        _ => Err(WsError::Provider(format!(
            "Unknown provider: {provider_name}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_provider_unknown() {
        let result = get_provider("unknown-provider", ProviderSettings::default());
        assert!(result.is_err());

        if let Err(error) = result {
            let error_msg = error.to_string();
            assert!(error_msg.contains("Unknown provider"));
            assert!(error_msg.contains("unknown-provider"));
        }
    }

    #[test]
    #[cfg(feature = "azure")]
    fn test_get_provider_azure() {
        match get_provider("azure", ProviderSettings::default()) {
            Ok(provider) => assert_eq!(provider.name(), "azure"),
            Err(error) => {
                // Without the az CLI installed we get a dependency error
                assert!(error.to_string().contains("Dependency not found"));
            }
        }
    }

    #[test]
    #[cfg(feature = "test-helpers")]
    fn test_get_provider_mock() {
        let provider = get_provider("mock", ProviderSettings::default()).unwrap();
        assert_eq!(provider.name(), "mock");
    }

    #[test]
    fn test_create_options_kind() {
        let options = CreateOptions::Vault {
            sku: "standard".into(),
        };
        assert_eq!(options.kind(), ResourceKind::Vault);
    }
}

//! Azure backend driven through the `az` command-line client.

pub mod command;
mod resources;
mod session;

use which::which;

use mlws_core::error::{Result, WsError};
use mlws_core::ResourceKind;

pub use command::{AzCommand, AzGlobalFlags};
pub use resources::{AzNamedResource, AzVault};
pub use session::{AzResourceGroups, AzSession};

use crate::{
    CloudProvider, NamedResourceApi, ProviderSettings, ResourceGroupApi, SessionApi, VaultApi,
};

pub struct AzureCliProvider {
    session: AzSession,
    groups: AzResourceGroups,
    storage: AzNamedResource,
    telemetry: AzNamedResource,
    workspaces: AzNamedResource,
    registries: AzNamedResource,
    vaults: AzVault,
}

impl AzureCliProvider {
    /// Build the provider. Warning suppression and the subscription are
    /// fixed here for every later call.
    pub fn new(settings: ProviderSettings) -> Result<Self> {
        if which(command::AZ_BINARY).is_err() {
            return Err(WsError::Dependency(format!(
                "{} (Azure CLI)",
                command::AZ_BINARY
            )));
        }

        let flags = AzGlobalFlags {
            subscription_id: settings.subscription_id,
            suppress_warnings: settings.suppress_warnings,
        };

        Ok(Self {
            session: AzSession::new(flags.clone()),
            groups: AzResourceGroups::new(flags.clone()),
            storage: AzNamedResource::new(ResourceKind::Storage, flags.clone()),
            telemetry: AzNamedResource::new(ResourceKind::Telemetry, flags.clone()),
            workspaces: AzNamedResource::new(ResourceKind::Workspace, flags.clone()),
            registries: AzNamedResource::new(ResourceKind::ContainerRegistry, flags.clone()),
            vaults: AzVault::new(flags),
        })
    }
}

impl CloudProvider for AzureCliProvider {
    fn name(&self) -> &'static str {
        "azure"
    }

    fn session(&self) -> &dyn SessionApi {
        &self.session
    }

    fn resource_groups(&self) -> &dyn ResourceGroupApi {
        &self.groups
    }

    fn storage(&self) -> &dyn NamedResourceApi {
        &self.storage
    }

    fn telemetry(&self) -> &dyn NamedResourceApi {
        &self.telemetry
    }

    fn workspaces(&self) -> &dyn NamedResourceApi {
        &self.workspaces
    }

    fn registries(&self) -> &dyn NamedResourceApi {
        &self.registries
    }

    fn vaults(&self) -> &dyn VaultApi {
        &self.vaults
    }
}

//! Read-only view of what exists for a workspace.

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use mlws_core::{ExistenceState, ResourceKind, WorkspaceIdentity};
use mlws_provider::{CloudProvider, NamedResourceApi, VaultApi};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryEntry {
    pub kind: ResourceKind,
    pub name: String,
    pub state: ExistenceState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inventory {
    pub group_exists: bool,
    pub entries: Vec<InventoryEntry>,
    /// Registries whose name contains the workspace name.
    pub registries: Vec<String>,
}

impl Inventory {
    pub fn state(&self, kind: ResourceKind) -> Option<ExistenceState> {
        self.entries.iter().find(|e| e.kind == kind).map(|e| e.state)
    }
}

/// Probe every derived name once. Never creates or deletes anything.
pub fn inspect(provider: &dyn CloudProvider, identity: &WorkspaceIdentity) -> Result<Inventory> {
    provider.session().authenticate(&identity.subscription_id)?;

    let group = &identity.resource_group;
    if !provider.resource_groups().exists(group)? {
        return Ok(Inventory {
            group_exists: false,
            entries: Vec::new(),
            registries: Vec::new(),
        });
    }

    let mut entries = Vec::with_capacity(4);
    for api in [provider.storage(), provider.telemetry()] {
        entries.push(active_entry(api, identity)?);
    }

    let vaults = provider.vaults();
    let vault_name = identity.resource_name(ResourceKind::Vault);
    let active = vaults.exists(&vault_name, group)?;
    let soft_deleted = !active && vaults.exists_soft_deleted(&vault_name, &identity.region)?;
    entries.push(InventoryEntry {
        kind: ResourceKind::Vault,
        name: vault_name,
        state: ExistenceState::from_flags(active, soft_deleted),
    });

    entries.push(active_entry(provider.workspaces(), identity)?);

    let registries = provider
        .registries()
        .list(group)?
        .into_iter()
        .map(|r| r.name)
        .filter(|name| name.contains(identity.workspace_name.as_str()))
        .collect();

    debug!(entries = entries.len(), "Inventory collected");
    Ok(Inventory {
        group_exists: true,
        entries,
        registries,
    })
}

fn active_entry(
    api: &dyn NamedResourceApi,
    identity: &WorkspaceIdentity,
) -> Result<InventoryEntry> {
    let kind = api.kind();
    let name = identity.resource_name(kind);
    let active = api.exists(&name, &identity.resource_group)?;
    Ok(InventoryEntry {
        kind,
        name,
        state: ExistenceState::from_flags(active, false),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlws_provider::mock::MockProvider;

    #[test]
    fn test_reports_soft_deleted_vault() {
        let provider = MockProvider::new()
            .with_group("rg")
            .with_resource(ResourceKind::Storage, "demostorage", "rg")
            .with_soft_deleted_vault("demo-kv")
            .with_resource(ResourceKind::ContainerRegistry, "demoacr", "rg")
            .with_resource(ResourceKind::ContainerRegistry, "otheracr", "rg");
        let identity = WorkspaceIdentity::new("sub", "rg", "demo", "eastus");

        let inventory = inspect(&provider, &identity).unwrap();

        assert!(inventory.group_exists);
        assert_eq!(inventory.state(ResourceKind::Storage), Some(ExistenceState::Active));
        assert_eq!(inventory.state(ResourceKind::Telemetry), Some(ExistenceState::Absent));
        assert_eq!(
            inventory.state(ResourceKind::Vault),
            Some(ExistenceState::SoftDeleted)
        );
        assert_eq!(inventory.registries, vec!["demoacr".to_string()]);
        assert_eq!(provider.state().creates(), 0);
        assert_eq!(provider.state().purges(), 0);
    }

    #[test]
    fn test_missing_group_has_no_entries() {
        let provider = MockProvider::new();
        let identity = WorkspaceIdentity::new("sub", "rg", "demo", "eastus");

        let inventory = inspect(&provider, &identity).unwrap();

        assert!(!inventory.group_exists);
        assert!(inventory.entries.is_empty());
    }
}

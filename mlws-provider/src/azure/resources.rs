//! Named-resource command groups for each resource kind.

use serde::Deserialize;
use tracing::{debug, info};

use super::command::{AzCommand, AzGlobalFlags};
use crate::{CreateOptions, CreateRequest, NamedResourceApi, ResourceDescriptor, VaultApi};
use mlws_core::error::{Result, WsError};
use mlws_core::ResourceKind;

/// How one resource kind maps onto `az` subcommands.
#[derive(Debug, Clone, Copy)]
struct CommandTable {
    group: &'static [&'static str],
    name_flag: &'static str,
    delete: &'static [&'static str],
    /// Subcommand that lists everything in a resource group.
    list: &'static str,
}

fn command_table(kind: ResourceKind) -> CommandTable {
    match kind {
        ResourceKind::Storage => CommandTable {
            group: &["storage", "account"],
            name_flag: "--name",
            delete: &["delete", "--yes"],
            list: "list",
        },
        ResourceKind::Telemetry => CommandTable {
            group: &["monitor", "app-insights", "component"],
            name_flag: "--app",
            delete: &["delete"],
            // `component show` without --app lists the group.
            list: "show",
        },
        ResourceKind::Vault => CommandTable {
            group: &["keyvault"],
            name_flag: "--name",
            delete: &["delete"],
            list: "list",
        },
        ResourceKind::Workspace => CommandTable {
            group: &["ml", "workspace"],
            name_flag: "--name",
            delete: &["delete", "--yes"],
            list: "list",
        },
        ResourceKind::ContainerRegistry => CommandTable {
            group: &["acr"],
            name_flag: "--name",
            delete: &["delete", "--yes"],
            list: "list",
        },
    }
}

#[derive(Debug, Deserialize)]
struct AzResource {
    name: String,
    #[serde(default)]
    id: String,
    #[serde(default, rename = "resourceGroup", alias = "resource_group")]
    resource_group: Option<String>,
    #[serde(default)]
    location: Option<String>,
}

impl AzResource {
    fn into_descriptor(self, kind: ResourceKind, fallback_group: &str) -> ResourceDescriptor {
        ResourceDescriptor {
            kind,
            name: self.name,
            id: self.id,
            resource_group: self
                .resource_group
                .unwrap_or_else(|| fallback_group.to_string()),
            location: self.location,
        }
    }
}

fn create_args(options: &CreateOptions) -> Vec<(&'static str, String)> {
    match options {
        CreateOptions::Storage { sku, kind } => {
            vec![("--sku", sku.clone()), ("--kind", kind.clone())]
        }
        CreateOptions::Telemetry { application_type } => {
            vec![("--application-type", application_type.clone())]
        }
        CreateOptions::Vault { sku } => vec![("--sku", sku.clone())],
        CreateOptions::Workspace {
            storage_account_id,
            key_vault_id,
            application_insights_id,
        } => vec![
            ("--storage-account", storage_account_id.clone()),
            ("--key-vault", key_vault_id.clone()),
            ("--application-insights", application_insights_id.clone()),
        ],
    }
}

/// One resource kind on the Azure CLI.
pub struct AzNamedResource {
    kind: ResourceKind,
    table: CommandTable,
    flags: AzGlobalFlags,
}

impl AzNamedResource {
    pub fn new(kind: ResourceKind, flags: AzGlobalFlags) -> Self {
        Self {
            kind,
            table: command_table(kind),
            flags,
        }
    }

    fn command(&self, subcommand: &str) -> AzCommand {
        AzCommand::new(&self.flags)
            .args(self.table.group.iter().copied())
            .arg(subcommand)
    }
}

impl NamedResourceApi for AzNamedResource {
    fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn show(&self, name: &str, resource_group: &str) -> Result<Option<ResourceDescriptor>> {
        let found: Option<AzResource> = self
            .command("show")
            .opt(self.table.name_flag, name)
            .opt("--resource-group", resource_group)
            .execute_lookup()?;
        debug!(kind = %self.kind, name = %name, found = found.is_some(), "Probed resource");
        Ok(found.map(|r| r.into_descriptor(self.kind, resource_group)))
    }

    fn create(&self, request: &CreateRequest) -> Result<ResourceDescriptor> {
        if request.options.kind() != self.kind {
            return Err(WsError::Provider(format!(
                "Cannot create {} with {} options",
                self.kind,
                request.options.kind()
            )));
        }

        let mut command = self
            .command("create")
            .opt(self.table.name_flag, &request.name)
            .opt("--resource-group", &request.resource_group)
            .opt("--location", &request.region);
        for (flag, value) in create_args(&request.options) {
            command = command.opt(flag, value);
        }

        info!(
            kind = %self.kind,
            name = %request.name,
            region = %request.region,
            "Creating resource"
        );
        let created: AzResource = command.execute_json()?;
        Ok(created.into_descriptor(self.kind, &request.resource_group))
    }

    fn delete(&self, name: &str, resource_group: &str) -> Result<()> {
        info!(kind = %self.kind, name = %name, "Deleting resource");
        AzCommand::new(&self.flags)
            .args(self.table.group.iter().copied())
            .args(self.table.delete.iter().copied())
            .opt(self.table.name_flag, name)
            .opt("--resource-group", resource_group)
            .raw_output()
            .execute()
    }

    fn list(&self, resource_group: &str) -> Result<Vec<ResourceDescriptor>> {
        let listed: Vec<AzResource> = self
            .command(self.table.list)
            .opt("--resource-group", resource_group)
            .execute_json()?;
        Ok(listed
            .into_iter()
            .map(|r| r.into_descriptor(self.kind, resource_group))
            .collect())
    }
}

/// Key vaults: the named-resource commands plus the soft-delete namespace.
pub struct AzVault {
    inner: AzNamedResource,
}

impl AzVault {
    pub fn new(flags: AzGlobalFlags) -> Self {
        Self {
            inner: AzNamedResource::new(ResourceKind::Vault, flags),
        }
    }
}

impl NamedResourceApi for AzVault {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Vault
    }

    fn show(&self, name: &str, resource_group: &str) -> Result<Option<ResourceDescriptor>> {
        self.inner.show(name, resource_group)
    }

    fn create(&self, request: &CreateRequest) -> Result<ResourceDescriptor> {
        self.inner.create(request)
    }

    fn delete(&self, name: &str, resource_group: &str) -> Result<()> {
        self.inner.delete(name, resource_group)
    }

    fn list(&self, resource_group: &str) -> Result<Vec<ResourceDescriptor>> {
        self.inner.list(resource_group)
    }
}

impl VaultApi for AzVault {
    fn exists_soft_deleted(&self, name: &str, region: &str) -> Result<bool> {
        let found: Option<serde_json::Value> = self
            .inner
            .command("show-deleted")
            .opt("--name", name)
            .opt("--location", region)
            .execute_lookup()?;
        debug!(
            name = %name,
            region = %region,
            soft_deleted = found.is_some(),
            "Probed deleted vaults"
        );
        Ok(found.is_some())
    }

    fn purge_soft_deleted(&self, name: &str, region: &str) -> Result<()> {
        info!(name = %name, region = %region, "Purging soft-deleted vault");
        self.inner
            .command("purge")
            .opt("--name", name)
            .opt("--location", region)
            .arg("--no-wait")
            .raw_output()
            .execute()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telemetry_uses_app_flag() {
        let table = command_table(ResourceKind::Telemetry);
        assert_eq!(table.name_flag, "--app");
        assert_eq!(table.list, "show");
    }

    #[test]
    fn test_workspace_create_args_carry_dependency_ids() {
        let args = create_args(&CreateOptions::Workspace {
            storage_account_id: "/sa".into(),
            key_vault_id: "/kv".into(),
            application_insights_id: "/ai".into(),
        });
        assert_eq!(
            args,
            vec![
                ("--storage-account", "/sa".to_string()),
                ("--key-vault", "/kv".to_string()),
                ("--application-insights", "/ai".to_string()),
            ]
        );
    }

    #[test]
    fn test_descriptor_from_cli_json() {
        let json = r#"{"name":"demostorage","id":"/subscriptions/s/resourceGroups/rg/providers/Microsoft.Storage/storageAccounts/demostorage","resourceGroup":"rg","location":"eastus","sku":{"name":"Standard_LRS"}}"#;
        let resource: AzResource = serde_json::from_str(json).unwrap();
        let descriptor = resource.into_descriptor(ResourceKind::Storage, "fallback");
        assert_eq!(descriptor.name, "demostorage");
        assert_eq!(descriptor.resource_group, "rg");
        assert_eq!(descriptor.location.as_deref(), Some("eastus"));
    }

    #[test]
    fn test_ml_workspace_json_uses_snake_case_group() {
        let json = r#"{"name":"demo","id":"/ws","resource_group":"rg-ml"}"#;
        let resource: AzResource = serde_json::from_str(json).unwrap();
        assert_eq!(
            resource.into_descriptor(ResourceKind::Workspace, "x").resource_group,
            "rg-ml"
        );
    }
}

//! Teardown of a workspace, its dependent resources and, on request, the
//! resource group that holds them.

use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use crate::confirm::Confirmation;
use crate::error::Result;
use mlws_core::{ws_println, ResourceKind, WorkspaceIdentity};
use mlws_messages::{msg, MESSAGES};
use mlws_provider::{CloudProvider, NamedResourceApi, VaultApi};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeardownOptions {
    /// Also delete the resource group, after an explicit confirmation.
    pub delete_resource_group: bool,
    /// Purge the soft-deleted vault so its name is free immediately.
    pub purge_vault: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupDeletion {
    NotRequested,
    Declined,
    /// Deletion was submitted; the provider finishes it in the background.
    Started,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeardownReport {
    pub deleted: Vec<ResourceRef>,
    /// Resources that were already absent.
    pub skipped: Vec<ResourceRef>,
    pub registries: Vec<String>,
    pub vault_purged: bool,
    pub group: GroupDeletion,
}

impl TeardownReport {
    fn new() -> Self {
        Self {
            deleted: Vec::new(),
            skipped: Vec::new(),
            registries: Vec::new(),
            vault_purged: false,
            group: GroupDeletion::NotRequested,
        }
    }

    pub fn was_deleted(&self, kind: ResourceKind) -> bool {
        self.deleted.iter().any(|r| r.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeardownOutcome {
    GroupMissing,
    Completed(TeardownReport),
}

pub struct Teardown<'a> {
    provider: &'a dyn CloudProvider,
    confirmation: &'a dyn Confirmation,
    options: TeardownOptions,
}

impl<'a> Teardown<'a> {
    pub fn new(
        provider: &'a dyn CloudProvider,
        confirmation: &'a dyn Confirmation,
        options: TeardownOptions,
    ) -> Self {
        Self {
            provider,
            confirmation,
            options,
        }
    }

    pub fn run(&self, identity: &WorkspaceIdentity) -> Result<TeardownOutcome> {
        let span = info_span!(
            "teardown",
            workspace = %identity.workspace_name,
            group = %identity.resource_group
        );
        let _enter = span.enter();

        self.provider
            .session()
            .authenticate(&identity.subscription_id)?;

        let group = &identity.resource_group;
        if !self.provider.resource_groups().exists(group)? {
            info!("Resource group missing, nothing to tear down");
            ws_println!("{}", msg!(MESSAGES.common.group_missing, group = group));
            return Ok(TeardownOutcome::GroupMissing);
        }

        ws_println!(
            "{}",
            msg!(
                MESSAGES.teardown.header,
                name = &identity.workspace_name,
                group = group
            )
        );

        let mut report = TeardownReport::new();

        // The workspace references the others, so it goes first.
        self.remove(self.provider.workspaces(), identity, &mut report)?;
        self.remove(self.provider.telemetry(), identity, &mut report)?;
        self.remove(self.provider.storage(), identity, &mut report)?;
        self.remove(self.provider.vaults(), identity, &mut report)?;

        if self.options.purge_vault {
            report.vault_purged = self.purge_vault(identity)?;
        }

        report.registries = self.remove_registries(identity)?;
        report.group = self.delete_group(group)?;

        ws_println!(
            "{}",
            msg!(MESSAGES.teardown.success, name = &identity.workspace_name)
        );
        info!(
            deleted = report.deleted.len(),
            skipped = report.skipped.len(),
            registries = report.registries.len(),
            "Teardown finished"
        );
        Ok(TeardownOutcome::Completed(report))
    }

    /// Delete if present; absence is recorded as skipped, not an error.
    fn remove<R>(
        &self,
        api: &R,
        identity: &WorkspaceIdentity,
        report: &mut TeardownReport,
    ) -> Result<()>
    where
        R: NamedResourceApi + ?Sized,
    {
        let kind = api.kind();
        let name = identity.resource_name(kind);
        let entry = ResourceRef {
            kind,
            name: name.clone(),
        };

        if !api.exists(&name, &identity.resource_group)? {
            debug!(kind = %kind, name = %name, "Already absent");
            ws_println!(
                "{}",
                msg!(MESSAGES.teardown.skipped, kind = kind.label(), name = &name)
            );
            report.skipped.push(entry);
            return Ok(());
        }

        ws_println!(
            "{}",
            msg!(MESSAGES.teardown.deleting, kind = kind.label(), name = &name)
        );
        api.delete(&name, &identity.resource_group)?;
        ws_println!(
            "{}",
            msg!(MESSAGES.teardown.deleted, kind = kind.label(), name = &name)
        );
        report.deleted.push(entry);
        Ok(())
    }

    fn purge_vault(&self, identity: &WorkspaceIdentity) -> Result<bool> {
        let vaults = self.provider.vaults();
        let name = identity.resource_name(ResourceKind::Vault);
        if !vaults.exists_soft_deleted(&name, &identity.region)? {
            return Ok(false);
        }
        vaults.purge_soft_deleted(&name, &identity.region)?;
        info!(name = %name, region = %identity.region, "Soft-deleted vault purged");
        ws_println!("{}", msg!(MESSAGES.teardown.vault_purged, name = &name));
        Ok(true)
    }

    /// Registries carry no ownership tag, so any registry whose name contains
    /// the workspace name is treated as belonging to it.
    fn remove_registries(&self, identity: &WorkspaceIdentity) -> Result<Vec<String>> {
        let registries = self.provider.registries();
        let matching: Vec<String> = registries
            .list(&identity.resource_group)?
            .into_iter()
            .map(|r| r.name)
            .filter(|name| name.contains(identity.workspace_name.as_str()))
            .collect();

        if matching.is_empty() {
            ws_println!(
                "{}",
                msg!(
                    MESSAGES.teardown.no_registries,
                    name = &identity.workspace_name
                )
            );
        }

        for name in &matching {
            let kind = registries.kind();
            ws_println!(
                "{}",
                msg!(MESSAGES.teardown.deleting, kind = kind.label(), name = name)
            );
            registries.delete(name, &identity.resource_group)?;
            ws_println!(
                "{}",
                msg!(MESSAGES.teardown.deleted, kind = kind.label(), name = name)
            );
        }
        Ok(matching)
    }

    fn delete_group(&self, group: &str) -> Result<GroupDeletion> {
        if !self.options.delete_resource_group {
            return Ok(GroupDeletion::NotRequested);
        }

        ws_println!("{}", msg!(MESSAGES.teardown.group_warning, group = group));
        let prompt = msg!(MESSAGES.teardown.group_confirm_prompt, group = group);
        if !self.confirmation.confirm(&prompt)? {
            warn!(group = %group, "Resource group deletion declined");
            ws_println!("{}", msg!(MESSAGES.teardown.group_declined, group = group));
            return Ok(GroupDeletion::Declined);
        }

        self.provider.resource_groups().delete(group)?;
        info!(group = %group, "Resource group deletion submitted");
        ws_println!(
            "{}",
            msg!(MESSAGES.teardown.group_deletion_started, group = group)
        );
        Ok(GroupDeletion::Started)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::ScriptedConfirmation;
    use mlws_provider::mock::{MockCall, MockProvider};

    fn identity() -> WorkspaceIdentity {
        WorkspaceIdentity::new("sub", "rg", "demo", "eastus")
    }

    fn seeded() -> MockProvider {
        MockProvider::new()
            .with_group("rg")
            .with_resource(ResourceKind::Workspace, "demo", "rg")
            .with_resource(ResourceKind::Storage, "demostorage", "rg")
            .with_resource(ResourceKind::Telemetry, "demo-insights", "rg")
            .with_resource(ResourceKind::Vault, "demo-kv", "rg")
    }

    #[test]
    fn test_deletes_workspace_before_dependents() {
        let provider = seeded();
        let confirmation = ScriptedConfirmation::default();

        Teardown::new(&provider, &confirmation, TeardownOptions::default())
            .run(&identity())
            .unwrap();

        let deletes: Vec<ResourceKind> = provider
            .state()
            .calls
            .iter()
            .filter_map(|c| match c {
                MockCall::Delete(kind, _) => Some(*kind),
                _ => None,
            })
            .collect();
        assert_eq!(
            deletes,
            vec![
                ResourceKind::Workspace,
                ResourceKind::Telemetry,
                ResourceKind::Storage,
                ResourceKind::Vault,
            ]
        );
    }

    #[test]
    fn test_group_not_requested_never_prompts() {
        let provider = seeded();
        let confirmation = ScriptedConfirmation::default();

        let TeardownOutcome::Completed(report) =
            Teardown::new(&provider, &confirmation, TeardownOptions::default())
                .run(&identity())
                .unwrap()
        else {
            panic!("expected a completed teardown");
        };

        assert_eq!(report.group, GroupDeletion::NotRequested);
        assert!(confirmation.prompts().is_empty());
        assert_eq!(provider.state().group_deletes(), 0);
    }

    #[test]
    fn test_purge_vault_frees_name() {
        let provider = seeded();
        let confirmation = ScriptedConfirmation::default();
        let options = TeardownOptions {
            purge_vault: true,
            ..TeardownOptions::default()
        };

        let TeardownOutcome::Completed(report) = Teardown::new(&provider, &confirmation, options)
            .run(&identity())
            .unwrap()
        else {
            panic!("expected a completed teardown");
        };

        assert!(report.vault_purged);
        assert_eq!(provider.state().purges(), 1);
        assert!(!provider
            .vaults()
            .exists_soft_deleted("demo-kv", "eastus")
            .unwrap());
    }

    #[test]
    fn test_vault_stays_soft_deleted_without_purge() {
        let provider = seeded();
        let confirmation = ScriptedConfirmation::default();

        Teardown::new(&provider, &confirmation, TeardownOptions::default())
            .run(&identity())
            .unwrap();

        assert_eq!(provider.state().purges(), 0);
        assert!(provider
            .vaults()
            .exists_soft_deleted("demo-kv", "eastus")
            .unwrap());
    }
}

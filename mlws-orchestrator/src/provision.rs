//! Idempotent provisioning of a workspace and its dependent resources.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::error::Result;
use crate::reclaim::Reclaimer;
use crate::retry::{RetryPolicy, Sleeper};
use mlws_config::MlwsConfig;
use mlws_core::{ws_println, ResourceKind, WorkspaceIdentity};
use mlws_messages::{msg, MESSAGES};
use mlws_provider::{
    CloudProvider, CreateOptions, CreateRequest, NamedResourceApi, ResourceDescriptor,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Created,
    Reused,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Created => f.write_str("created"),
            Action::Reused => f.write_str("reused"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceOutcome {
    pub kind: ResourceKind,
    pub name: String,
    pub id: String,
    pub action: Action,
    /// Availability checks spent reclaiming a soft-deleted vault name.
    pub reclaim_attempts: Option<u32>,
}

impl ResourceOutcome {
    fn describe(&self) -> String {
        match self.reclaim_attempts {
            Some(attempts) => {
                format!("{}, name reclaimed after {} check(s)", self.action, attempts)
            }
            None => self.action.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    pub workspace_name: String,
    pub resource_group: String,
    pub region: String,
    /// In provisioning order: storage, telemetry, vault, workspace.
    pub resources: Vec<ResourceOutcome>,
}

impl ProvisionReport {
    pub fn outcome(&self, kind: ResourceKind) -> Option<&ResourceOutcome> {
        self.resources.iter().find(|r| r.kind == kind)
    }

    pub fn created(&self) -> usize {
        self.count(Action::Created)
    }

    pub fn reused(&self) -> usize {
        self.count(Action::Reused)
    }

    pub fn vault_reclaimed(&self) -> bool {
        self.outcome(ResourceKind::Vault)
            .is_some_and(|r| r.reclaim_attempts.is_some())
    }

    fn count(&self, action: Action) -> usize {
        self.resources.iter().filter(|r| r.action == action).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// Nothing was touched because the resource group does not exist.
    GroupMissing,
    Completed(ProvisionReport),
}

pub struct Provisioner<'a> {
    provider: &'a dyn CloudProvider,
    config: &'a MlwsConfig,
    policy: RetryPolicy,
    sleeper: &'a dyn Sleeper,
}

impl<'a> Provisioner<'a> {
    pub fn new(
        provider: &'a dyn CloudProvider,
        config: &'a MlwsConfig,
        sleeper: &'a dyn Sleeper,
    ) -> Self {
        Self {
            provider,
            config,
            policy: RetryPolicy::from(config.reclaim),
            sleeper,
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn run(&self, identity: &WorkspaceIdentity) -> Result<ProvisionOutcome> {
        let span = info_span!(
            "provision",
            workspace = %identity.workspace_name,
            group = %identity.resource_group,
            region = %identity.region
        );
        let _enter = span.enter();

        let session = self
            .provider
            .session()
            .authenticate(&identity.subscription_id)?;
        debug!(account = ?session.account, "Authenticated");
        ws_println!(
            "{}",
            msg!(
                MESSAGES.common.session_ready,
                subscription = session.subscription_id
            )
        );

        if !self
            .provider
            .resource_groups()
            .exists(&identity.resource_group)?
        {
            info!("Resource group missing, skipping provisioning");
            ws_println!(
                "{}",
                msg!(MESSAGES.common.group_missing, group = &identity.resource_group)
            );
            return Ok(ProvisionOutcome::GroupMissing);
        }

        ws_println!(
            "{}",
            msg!(
                MESSAGES.provision.header,
                name = &identity.workspace_name,
                group = &identity.resource_group,
                region = &identity.region
            )
        );

        let storage = self.ensure(
            self.provider.storage(),
            identity,
            CreateOptions::Storage {
                sku: self.config.storage.sku.clone(),
                kind: self.config.storage.kind.clone(),
            },
            None,
        )?;

        let telemetry = self.ensure(
            self.provider.telemetry(),
            identity,
            CreateOptions::Telemetry {
                application_type: self.config.telemetry.application_type.clone(),
            },
            None,
        )?;

        let vault_name = identity.resource_name(ResourceKind::Vault);
        let reclaimer = Reclaimer::new(self.provider.vaults(), self.policy, self.sleeper);
        let reclaim_attempts = reclaimer.reclaim_if_soft_deleted(
            &vault_name,
            &identity.resource_group,
            &identity.region,
        )?;
        let vault = self.ensure(
            self.provider.vaults(),
            identity,
            CreateOptions::Vault {
                sku: self.config.vault.sku.clone(),
            },
            reclaim_attempts,
        )?;

        let workspace = self.ensure(
            self.provider.workspaces(),
            identity,
            CreateOptions::Workspace {
                storage_account_id: storage.id.clone(),
                key_vault_id: vault.id.clone(),
                application_insights_id: telemetry.id.clone(),
            },
            None,
        )?;

        let report = ProvisionReport {
            workspace_name: identity.workspace_name.clone(),
            resource_group: identity.resource_group.clone(),
            region: identity.region.clone(),
            resources: vec![storage, telemetry, vault, workspace],
        };

        ws_println!("{}", MESSAGES.provision.summary_header);
        for resource in &report.resources {
            ws_println!(
                "{}",
                msg!(
                    MESSAGES.provision.summary_item,
                    kind = resource.kind.label(),
                    name = &resource.name,
                    outcome = resource.describe()
                )
            );
        }
        ws_println!(
            "{}",
            msg!(MESSAGES.provision.success, name = &identity.workspace_name)
        );
        info!(
            created = report.created(),
            reused = report.reused(),
            "Provisioning finished"
        );

        Ok(ProvisionOutcome::Completed(report))
    }

    /// Reuse the resource if it is active, create it otherwise.
    fn ensure<R>(
        &self,
        api: &R,
        identity: &WorkspaceIdentity,
        options: CreateOptions,
        reclaim_attempts: Option<u32>,
    ) -> Result<ResourceOutcome>
    where
        R: NamedResourceApi + ?Sized,
    {
        let kind = options.kind();
        let name = identity.resource_name(kind);

        let (descriptor, action) = match api.show(&name, &identity.resource_group)? {
            Some(existing) => {
                debug!(kind = %kind, name = %name, "Resource already active");
                ws_println!(
                    "{}",
                    msg!(MESSAGES.provision.reusing, kind = kind.label(), name = &name)
                );
                (existing, Action::Reused)
            }
            None => {
                ws_println!(
                    "{}",
                    msg!(MESSAGES.provision.creating, kind = kind.label(), name = &name)
                );
                let created = api.create(&CreateRequest {
                    name: name.clone(),
                    resource_group: identity.resource_group.clone(),
                    region: identity.region.clone(),
                    options,
                })?;
                info!(kind = %kind, name = %name, id = %created.id, "Resource created");
                ws_println!(
                    "{}",
                    msg!(MESSAGES.provision.created, kind = kind.label(), name = &name)
                );
                (created, Action::Created)
            }
        };

        Ok(outcome(descriptor, action, reclaim_attempts))
    }
}

fn outcome(
    descriptor: ResourceDescriptor,
    action: Action,
    reclaim_attempts: Option<u32>,
) -> ResourceOutcome {
    ResourceOutcome {
        kind: descriptor.kind,
        name: descriptor.name,
        id: descriptor.id,
        action,
        reclaim_attempts,
    }
}

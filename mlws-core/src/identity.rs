//! Workspace identity and resource kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Region used when none is given on the command line or in config.
pub const DEFAULT_REGION: &str = "eastus";

/// Immutable input to every run. All dependent resource names derive from
/// `workspace_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceIdentity {
    pub subscription_id: String,
    pub resource_group: String,
    pub workspace_name: String,
    pub region: String,
}

impl WorkspaceIdentity {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        workspace_name: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            workspace_name: workspace_name.into(),
            region: region.into(),
        }
    }

    /// Name of the resource of `kind` that belongs to this workspace.
    pub fn resource_name(&self, kind: ResourceKind) -> String {
        crate::naming::derive_name(&self.workspace_name, kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Storage,
    Telemetry,
    Vault,
    Workspace,
    ContainerRegistry,
}

impl ResourceKind {
    /// Human label used in progress output.
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Storage => "storage account",
            ResourceKind::Telemetry => "application insights",
            ResourceKind::Vault => "key vault",
            ResourceKind::Workspace => "workspace",
            ResourceKind::ContainerRegistry => "container registry",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Observed state of a named resource. `SoftDeleted` only occurs for vaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExistenceState {
    Absent,
    Active,
    SoftDeleted,
}

impl ExistenceState {
    pub fn from_flags(active: bool, soft_deleted: bool) -> Self {
        if active {
            ExistenceState::Active
        } else if soft_deleted {
            ExistenceState::SoftDeleted
        } else {
            ExistenceState::Absent
        }
    }
}

impl fmt::Display for ExistenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ExistenceState::Absent => "absent",
            ExistenceState::Active => "active",
            ExistenceState::SoftDeleted => "soft-deleted",
        };
        f.write_str(text)
    }
}

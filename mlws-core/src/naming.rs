//! Deterministic names for the resources that belong to a workspace.
//!
//! Every dependent resource is found again on a later run purely by its
//! derived name, so [`derive_name`] must stay a pure function of the
//! workspace name and the resource kind.

use crate::identity::ResourceKind;

/// Charset and length limits for one resource kind.
#[derive(Debug, Clone, Copy)]
pub struct NamingRule {
    pub suffix: &'static str,
    pub allow_hyphen: bool,
    pub max_len: usize,
}

pub const STORAGE_RULE: NamingRule = NamingRule {
    suffix: "storage",
    allow_hyphen: false,
    max_len: 24,
};

pub const VAULT_RULE: NamingRule = NamingRule {
    suffix: "-kv",
    allow_hyphen: true,
    max_len: 24,
};

pub const TELEMETRY_RULE: NamingRule = NamingRule {
    suffix: "-insights",
    allow_hyphen: true,
    max_len: 255,
};

impl NamingRule {
    pub fn for_kind(kind: ResourceKind) -> Option<NamingRule> {
        match kind {
            ResourceKind::Storage => Some(STORAGE_RULE),
            ResourceKind::Vault => Some(VAULT_RULE),
            ResourceKind::Telemetry => Some(TELEMETRY_RULE),
            // Registries are matched against the workspace name, never derived.
            ResourceKind::Workspace | ResourceKind::ContainerRegistry => None,
        }
    }

    fn allows(&self, c: char) -> bool {
        c.is_ascii_lowercase() || c.is_ascii_digit() || (self.allow_hyphen && c == '-')
    }

    /// Lowercase, strip, drop leading hyphens, then keep the leading
    /// `max_len` characters.
    pub fn apply(&self, workspace_name: &str) -> String {
        let name: String = format!("{workspace_name}{}", self.suffix)
            .to_lowercase()
            .chars()
            .filter(|c| self.allows(*c))
            .skip_while(|c| *c == '-')
            .take(self.max_len)
            .collect();

        // Truncation can leave a dangling hyphen; the provider rejects names
        // that start or end with one.
        name.trim_end_matches('-').to_string()
    }
}

/// Derive the provider name for `kind` from a workspace name.
///
/// The workspace itself keeps the name the caller gave it.
pub fn derive_name(workspace_name: &str, kind: ResourceKind) -> String {
    match NamingRule::for_kind(kind) {
        Some(rule) => rule.apply(workspace_name),
        None => workspace_name.to_string(),
    }
}

//! Provisioning messages (`mlws create`)

pub struct ProvisionMessages {
    pub created: &'static str,
    pub creating: &'static str,
    pub header: &'static str,
    pub reusing: &'static str,
    pub success: &'static str,
    pub summary_header: &'static str,
    pub summary_item: &'static str,
    pub vault_purging: &'static str,
    pub vault_reclaimed: &'static str,
    pub vault_waiting: &'static str,
}

pub const PROVISION_MESSAGES: ProvisionMessages = ProvisionMessages {
    created: "  ✓ Created {kind} '{name}'",
    creating: "  ➕ Creating {kind} '{name}'...",
    header: "🚀 Provisioning workspace '{name}' in '{group}' ({region})...\n",
    reusing: "  ✓ Reusing existing {kind} '{name}'",
    success: "\n✅ Workspace '{name}' is ready",
    summary_header: "\nSummary:",
    summary_item: "  • {kind}: {name} ({outcome})",
    vault_purging: "  ♻️  Key vault '{name}' is soft-deleted in {region}, purging...",
    vault_reclaimed: "  ✓ Name '{name}' is available again",
    vault_waiting: "  ⏳ Waiting for '{name}' to be released (attempt {attempt}/{max})...",
};

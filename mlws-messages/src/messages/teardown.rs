//! Teardown messages (`mlws destroy`)

pub struct TeardownMessages {
    pub deleted: &'static str,
    pub deleting: &'static str,
    pub group_confirm_prompt: &'static str,
    pub group_declined: &'static str,
    pub group_deletion_started: &'static str,
    pub group_warning: &'static str,
    pub header: &'static str,
    pub no_registries: &'static str,
    pub skipped: &'static str,
    pub success: &'static str,
    pub vault_purged: &'static str,
}

pub const TEARDOWN_MESSAGES: TeardownMessages = TeardownMessages {
    deleted: "  ✓ Deleted {kind} '{name}'",
    deleting: "  ➖ Deleting {kind} '{name}'...",
    group_confirm_prompt: "Type YES to delete resource group '{group}'",
    group_declined: "  Resource group '{group}' kept",
    group_deletion_started: "  ✓ Deletion of resource group '{group}' started (continues in background)",
    group_warning: "\n⚠️  Deleting resource group '{group}' removes every resource inside it, not only this workspace.",
    header: "🗑️ Tearing down workspace '{name}' in '{group}'...\n",
    no_registries: "  · No container registry matching '{name}'",
    skipped: "  · {kind} '{name}' not found, skipping",
    success: "\n✅ Teardown of '{name}' complete",
    vault_purged: "  ✓ Purged soft-deleted key vault '{name}'",
};

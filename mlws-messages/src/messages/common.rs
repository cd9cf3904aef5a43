//! Common/shared messages across commands

pub struct CommonMessages {
    // ============================================================================
    // Session and resource group
    // ============================================================================
    pub group_missing: &'static str,
    pub session_ready: &'static str,

    // ============================================================================
    // Status
    // ============================================================================
    pub status_header: &'static str,
    pub status_item: &'static str,
    pub status_registry_item: &'static str,
    pub status_no_registries: &'static str,

    // ============================================================================
    // Errors
    // ============================================================================
    pub error_generic: &'static str,
    pub error_name_locked: &'static str,
}

pub const COMMON_MESSAGES: CommonMessages = CommonMessages {
    group_missing: "🔍 Resource group '{group}' not found, nothing to do",
    session_ready: "🔑 Using subscription {subscription}",

    status_header: "📊 Workspace '{name}' in '{group}' ({region})\n",
    status_item: "  {kind}: {name} ({state})",
    status_registry_item: "  container registry: {name} (matched)",
    status_no_registries: "  container registry: none matching '{name}'",

    error_generic: "Error: {error}",
    error_name_locked: "Key vault name '{name}' is still reserved after {attempts} checks\n\n💡 Try:\n   • Wait a few minutes and re-run mlws create\n   • Inspect: az keyvault list-deleted\n   • Raise --max-attempts or --delay-secs",
};

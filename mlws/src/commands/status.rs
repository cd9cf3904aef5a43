//! `mlws status`

use crate::error::CliResult;
use mlws_core::{ws_println, WorkspaceIdentity};
use mlws_messages::{msg, MESSAGES};
use mlws_orchestrator::{inspect, Inventory};
use mlws_provider::CloudProvider;

pub fn handle_status(
    provider: &dyn CloudProvider,
    identity: &WorkspaceIdentity,
    json: bool,
) -> CliResult<()> {
    let inventory = inspect(provider, identity)?;

    if json {
        let text =
            serde_json::to_string_pretty(&inventory).map_err(mlws_core::error::WsError::from)?;
        ws_println!("{}", text);
        return Ok(());
    }

    print_inventory(&inventory, identity);
    Ok(())
}

fn print_inventory(inventory: &Inventory, identity: &WorkspaceIdentity) {
    if !inventory.group_exists {
        ws_println!(
            "{}",
            msg!(MESSAGES.common.group_missing, group = &identity.resource_group)
        );
        return;
    }

    ws_println!(
        "{}",
        msg!(
            MESSAGES.common.status_header,
            name = &identity.workspace_name,
            group = &identity.resource_group,
            region = &identity.region
        )
    );
    for entry in &inventory.entries {
        ws_println!(
            "{}",
            msg!(
                MESSAGES.common.status_item,
                kind = entry.kind.label(),
                name = &entry.name,
                state = entry.state.to_string()
            )
        );
    }

    if inventory.registries.is_empty() {
        ws_println!(
            "{}",
            msg!(
                MESSAGES.common.status_no_registries,
                name = &identity.workspace_name
            )
        );
    }
    for name in &inventory.registries {
        ws_println!("{}", msg!(MESSAGES.common.status_registry_item, name = name));
    }
}

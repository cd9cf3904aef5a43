//! `mlws destroy`

use tracing::info;

use crate::commands::confirm::TerminalConfirmation;
use crate::error::CliResult;
use mlws_core::WorkspaceIdentity;
use mlws_orchestrator::{Teardown, TeardownOptions, TeardownOutcome};
use mlws_provider::CloudProvider;

pub fn handle_destroy(
    provider: &dyn CloudProvider,
    identity: &WorkspaceIdentity,
    delete_resource_group: bool,
    purge_vault: bool,
) -> CliResult<()> {
    let confirmation = TerminalConfirmation;
    let options = TeardownOptions {
        delete_resource_group,
        purge_vault,
    };

    if let TeardownOutcome::Completed(report) =
        Teardown::new(provider, &confirmation, options).run(identity)?
    {
        info!(
            deleted = report.deleted.len(),
            registries = report.registries.len(),
            group = ?report.group,
            "Destroy finished"
        );
    }
    Ok(())
}

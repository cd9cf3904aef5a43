//! `mlws create`

use tracing::info;

use crate::error::CliResult;
use mlws_config::MlwsConfig;
use mlws_core::WorkspaceIdentity;
use mlws_orchestrator::{ProvisionOutcome, Provisioner, ThreadSleeper};
use mlws_provider::CloudProvider;

pub fn handle_create(
    provider: &dyn CloudProvider,
    config: &MlwsConfig,
    identity: &WorkspaceIdentity,
) -> CliResult<()> {
    let sleeper = ThreadSleeper;
    match Provisioner::new(provider, config, &sleeper).run(identity)? {
        ProvisionOutcome::GroupMissing => {}
        ProvisionOutcome::Completed(report) => {
            info!(
                created = report.created(),
                reused = report.reused(),
                vault_reclaimed = report.vault_reclaimed(),
                "Create finished"
            );
        }
    }
    Ok(())
}

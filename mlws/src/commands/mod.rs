// Command handlers for workspace operations

use tracing::debug;

use crate::cli::{Args, Command, WorkspaceArgs};
use crate::error::CliResult;
use mlws_config::{load_config, MlwsConfig};
use mlws_core::WorkspaceIdentity;
use mlws_provider::{get_provider, CloudProvider, ProviderSettings};

pub mod confirm;
pub mod create;
pub mod destroy;
pub mod status;

/// Main command dispatcher
#[must_use = "command execution results should be handled"]
pub fn execute_command(args: Args) -> CliResult<()> {
    let mut config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Create {
            workspace,
            max_attempts,
            delay_secs,
        } => {
            if let Some(max_attempts) = max_attempts {
                config.reclaim.max_attempts = max_attempts;
            }
            if let Some(delay_secs) = delay_secs {
                config.reclaim.delay_secs = delay_secs;
            }
            let (identity, provider) = prepare(&workspace, &mut config)?;
            debug!("Handling create command");
            create::handle_create(provider.as_ref(), &config, &identity)
        }
        Command::Destroy {
            workspace,
            delete_resource_group,
            purge_vault,
        } => {
            let (identity, provider) = prepare(&workspace, &mut config)?;
            debug!(delete_resource_group, purge_vault, "Handling destroy command");
            destroy::handle_destroy(
                provider.as_ref(),
                &identity,
                delete_resource_group,
                purge_vault,
            )
        }
        Command::Status { workspace, json } => {
            let (identity, provider) = prepare(&workspace, &mut config)?;
            debug!("Handling status command");
            status::handle_status(provider.as_ref(), &identity, json)
        }
    }
}

/// Apply command-line overrides, validate, and build the provider.
fn prepare(
    workspace: &WorkspaceArgs,
    config: &mut MlwsConfig,
) -> CliResult<(WorkspaceIdentity, Box<dyn CloudProvider>)> {
    if let Some(region) = &workspace.region {
        config.region = region.clone();
    }
    config.validate()?;

    let identity = WorkspaceIdentity::new(
        &workspace.subscription_id,
        &workspace.resource_group,
        &workspace.workspace_name,
        &config.region,
    );
    let provider = build_provider(config, &identity.subscription_id)?;
    Ok((identity, provider))
}

fn build_provider(config: &MlwsConfig, subscription_id: &str) -> CliResult<Box<dyn CloudProvider>> {
    let settings = ProviderSettings {
        subscription_id: Some(subscription_id.to_string()),
        suppress_warnings: config.suppress_warnings,
    };
    let provider = get_provider("azure", settings)?;
    debug!(provider = provider.name(), "Provider ready");
    Ok(provider)
}


// CLI argument parsing and definitions

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "mlws")]
#[command(about = "Provision and tear down machine-learning workspaces")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a custom configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,
}

/// Identifies the workspace every command operates on.
#[derive(Debug, Clone, ClapArgs)]
pub struct WorkspaceArgs {
    /// Subscription that owns the resource group
    #[arg(long)]
    pub subscription_id: String,

    /// Resource group holding the workspace (must already exist)
    #[arg(long)]
    pub resource_group: String,

    /// Workspace name; dependent resource names are derived from it
    #[arg(long)]
    pub workspace_name: String,

    /// Region for new resources [default: eastus, or `region` from config]
    #[arg(long)]
    pub region: Option<String>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create the workspace, reusing anything that already exists
    Create {
        #[command(flatten)]
        workspace: WorkspaceArgs,

        /// Availability checks while waiting for a purged key vault name
        #[arg(long)]
        max_attempts: Option<u32>,

        /// Seconds between availability checks
        #[arg(long)]
        delay_secs: Option<u64>,
    },
    /// Delete the workspace and its dependent resources
    Destroy {
        #[command(flatten)]
        workspace: WorkspaceArgs,

        /// Also delete the whole resource group (asks for confirmation)
        #[arg(long)]
        delete_resource_group: bool,

        /// Purge the deleted key vault so its name can be reused right away
        #[arg(long)]
        purge_vault: bool,
    },
    /// Show which of the workspace's resources exist
    Status {
        #[command(flatten)]
        workspace: WorkspaceArgs,

        /// Print the inventory as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Create { .. } => "create",
            Command::Destroy { .. } => "destroy",
            Command::Status { .. } => "status",
        }
    }
}

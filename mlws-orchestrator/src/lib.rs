//! Workspace provisioning and teardown.
//!
//! This crate holds the decision logic: probe each resource, then create,
//! reuse, delete or skip it. It only talks to the provider through the
//! `mlws-provider` traits, so the same flows run against Azure or the mock.

pub mod confirm;
pub mod error;
pub mod inventory;
pub mod provision;
pub mod reclaim;
pub mod retry;
pub mod teardown;
pub mod test_utils;

pub use confirm::{Confirmation, ScriptedConfirmation, CONFIRMATION_TOKEN};
pub use error::{OrchestratorError, Result};
pub use inventory::{inspect, Inventory, InventoryEntry};
pub use provision::{Action, ProvisionOutcome, ProvisionReport, Provisioner, ResourceOutcome};
pub use reclaim::{Availability, Reclaimer, VaultProbe};
pub use retry::{poll_until, PollOutcome, RetryPolicy, Sleeper, ThreadSleeper};
pub use teardown::{
    GroupDeletion, ResourceRef, Teardown, TeardownOptions, TeardownOutcome, TeardownReport,
};

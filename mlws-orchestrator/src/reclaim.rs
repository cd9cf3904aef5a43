//! Soft-delete reclamation for key vault names.
//!
//! A deleted vault keeps its name reserved until it is purged, and the purge
//! itself completes asynchronously on the provider side. The only reliable
//! signal that the name is reusable is repeated probing of both the active
//! and the soft-deleted namespace.

use tracing::{debug, info, warn};

use crate::error::{OrchestratorError, Result};
use crate::retry::{poll_until, PollOutcome, RetryPolicy, Sleeper};
use mlws_core::error::Result as WsResult;
use mlws_core::{ws_println, ExistenceState};
use mlws_messages::{msg, MESSAGES};
use mlws_provider::{NamedResourceApi, VaultApi};

/// Result of one availability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultProbe {
    pub exists_active: bool,
    pub exists_deleted: bool,
}

impl VaultProbe {
    pub fn is_free(&self) -> bool {
        !self.exists_active && !self.exists_deleted
    }

    pub fn state(&self) -> ExistenceState {
        ExistenceState::from_flags(self.exists_active, self.exists_deleted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available { attempts: u32 },
    TimedOut { attempts: u32 },
}

pub struct Reclaimer<'a> {
    vaults: &'a dyn VaultApi,
    policy: RetryPolicy,
    sleeper: &'a dyn Sleeper,
}

impl<'a> Reclaimer<'a> {
    pub fn new(vaults: &'a dyn VaultApi, policy: RetryPolicy, sleeper: &'a dyn Sleeper) -> Self {
        Self {
            vaults,
            policy,
            sleeper,
        }
    }

    /// Two independent checks; nothing is cached between calls. The active
    /// check only sees `resource_group`, so a vault holding the name in
    /// another group surfaces later as a create failure.
    pub fn probe(&self, name: &str, resource_group: &str, region: &str) -> WsResult<VaultProbe> {
        let exists_active = self.vaults.exists(name, resource_group)?;
        let exists_deleted = self.vaults.exists_soft_deleted(name, region)?;
        Ok(VaultProbe {
            exists_active,
            exists_deleted,
        })
    }

    pub fn purge(&self, name: &str, region: &str) -> WsResult<()> {
        self.vaults.purge_soft_deleted(name, region)
    }

    /// Poll until neither an active nor a soft-deleted vault holds `name`.
    ///
    /// Exhausting the budget is reported as [`Availability::TimedOut`], not
    /// as an error; the caller decides how fatal that is.
    pub fn wait_for_availability(
        &self,
        name: &str,
        resource_group: &str,
        region: &str,
    ) -> WsResult<Availability> {
        let max = self.policy.max_attempts;
        let outcome = poll_until(
            &self.policy,
            self.sleeper,
            |attempt| -> WsResult<VaultProbe> {
                let probe = self.probe(name, resource_group, region)?;
                debug!(
                    name = %name,
                    attempt,
                    max,
                    state = %probe.state(),
                    "Vault availability probe"
                );
                if !probe.is_free() {
                    ws_println!(
                        "{}",
                        msg!(
                            MESSAGES.provision.vault_waiting,
                            name = name,
                            attempt = attempt.to_string(),
                            max = max.to_string()
                        )
                    );
                }
                Ok(probe)
            },
            VaultProbe::is_free,
        )?;

        Ok(match outcome {
            PollOutcome::Satisfied { attempts, .. } => Availability::Available { attempts },
            PollOutcome::Exhausted { attempts, .. } => Availability::TimedOut { attempts },
        })
    }

    /// Purge a soft-deleted vault holding `name` and wait for the name.
    ///
    /// Returns the number of availability probes when a reclamation happened,
    /// `None` when nothing was soft-deleted, and [`OrchestratorError::NameLocked`]
    /// when the name never became free.
    pub fn reclaim_if_soft_deleted(
        &self,
        name: &str,
        resource_group: &str,
        region: &str,
    ) -> Result<Option<u32>> {
        if !self.vaults.exists_soft_deleted(name, region)? {
            return Ok(None);
        }

        info!(name = %name, region = %region, "Vault name held by soft-deleted vault");
        ws_println!(
            "{}",
            msg!(MESSAGES.provision.vault_purging, name = name, region = region)
        );
        self.purge(name, region)?;

        match self.wait_for_availability(name, resource_group, region)? {
            Availability::Available { attempts } => {
                ws_println!("{}", msg!(MESSAGES.provision.vault_reclaimed, name = name));
                Ok(Some(attempts))
            }
            Availability::TimedOut { attempts } => {
                warn!(name = %name, attempts, "Vault name still reserved, giving up");
                Err(OrchestratorError::NameLocked {
                    name: name.to_string(),
                    attempts,
                })
            }
        }
    }
}

use serde::Deserialize;
use tracing::{debug, info};

use super::command::{AzCommand, AzGlobalFlags};
use crate::{ResourceGroupApi, Session, SessionApi};
use mlws_core::error::{Result, WsError};

#[derive(Debug, Deserialize)]
struct AccountInfo {
    id: String,
    #[serde(default)]
    user: Option<AccountUser>,
}

#[derive(Debug, Deserialize)]
struct AccountUser {
    name: String,
}

pub struct AzSession {
    flags: AzGlobalFlags,
}

impl AzSession {
    pub fn new(flags: AzGlobalFlags) -> Self {
        Self { flags }
    }
}

impl SessionApi for AzSession {
    fn authenticate(&self, subscription_id: &str) -> Result<Session> {
        // `account show` reads the cached login; it fails when the token is
        // missing or expired, or when the account cannot see the subscription.
        let flags = AzGlobalFlags {
            subscription_id: Some(subscription_id.to_string()),
            ..self.flags.clone()
        };
        let account: AccountInfo = AzCommand::new(&flags)
            .args(["account", "show"])
            .execute_json()
            .map_err(|e| match e {
                WsError::Auth(msg) => WsError::Auth(msg),
                other => WsError::Auth(other.to_string()),
            })?;

        if !account.id.eq_ignore_ascii_case(subscription_id) {
            return Err(WsError::Auth(format!(
                "Signed-in context resolved to subscription {} instead of {}",
                account.id, subscription_id
            )));
        }

        let account_name = account.user.map(|u| u.name);
        info!(subscription = %subscription_id, account = ?account_name, "Authenticated");
        Ok(Session {
            subscription_id: account.id,
            account: account_name,
        })
    }
}

pub struct AzResourceGroups {
    flags: AzGlobalFlags,
}

impl AzResourceGroups {
    pub fn new(flags: AzGlobalFlags) -> Self {
        Self { flags }
    }
}

impl ResourceGroupApi for AzResourceGroups {
    fn exists(&self, name: &str) -> Result<bool> {
        let stdout = AzCommand::new(&self.flags)
            .args(["group", "exists"])
            .opt("--name", name)
            .raw_output()
            .execute_with_output()?;
        let exists = stdout.trim().eq_ignore_ascii_case("true");
        debug!(group = %name, exists, "Probed resource group");
        Ok(exists)
    }

    fn create(&self, name: &str, region: &str) -> Result<()> {
        AzCommand::new(&self.flags)
            .args(["group", "create"])
            .opt("--name", name)
            .opt("--location", region)
            .execute()
    }

    fn delete(&self, name: &str) -> Result<()> {
        AzCommand::new(&self.flags)
            .args(["group", "delete", "--yes", "--no-wait"])
            .opt("--name", name)
            .raw_output()
            .execute()
    }
}

//! Top-level error type for the mlws CLI.
//!
//! Library crates return their own typed errors; this module only decides how
//! they are shown and which exit code the process ends with.

use thiserror::Error;

use mlws_core::error::WsError;
use mlws_messages::{msg, MESSAGES};
use mlws_orchestrator::OrchestratorError;
use mlws_provider::error::user_friendly;

/// Exit code when the key vault name could not be reclaimed in time.
pub const EXIT_NAME_LOCKED: i32 = 2;
pub const EXIT_FAILURE: i32 = 1;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),

    #[error(transparent)]
    Provider(#[from] WsError),
}

pub type CliResult<T> = std::result::Result<T, CliError>;

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Orchestrator(err) if err.is_name_locked() => EXIT_NAME_LOCKED,
            _ => EXIT_FAILURE,
        }
    }

    /// Message shown to the user, with a next step where one is known.
    pub fn user_message(&self) -> String {
        match self {
            CliError::Orchestrator(OrchestratorError::NameLocked { name, attempts }) => msg!(
                MESSAGES.common.error_name_locked,
                name = name,
                attempts = attempts.to_string()
            ),
            CliError::Orchestrator(OrchestratorError::Provider(err)) | CliError::Provider(err) => {
                msg!(MESSAGES.common.error_generic, error = user_friendly(err))
            }
            other => msg!(MESSAGES.common.error_generic, error = other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_locked_exits_with_two() {
        let err = CliError::from(OrchestratorError::NameLocked {
            name: "demo-kv".to_string(),
            attempts: 12,
        });
        assert_eq!(err.exit_code(), 2);
        let text = err.user_message();
        assert!(text.contains("demo-kv"));
        assert!(text.contains("12 checks"));
    }

    #[test]
    fn test_provider_errors_exit_with_one() {
        let err = CliError::from(OrchestratorError::from(WsError::Dependency(
            "az (Azure CLI)".to_string(),
        )));
        assert_eq!(err.exit_code(), 1);
        assert!(err.user_message().contains("az login"));
    }

    #[test]
    fn test_config_errors_exit_with_one() {
        let err = CliError::from(WsError::Config("region must not be empty".to_string()));
        assert_eq!(err.exit_code(), 1);
        assert!(err.user_message().contains("region must not be empty"));
    }
}

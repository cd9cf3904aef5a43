use thiserror::Error;

use mlws_core::error::WsError;

pub type Result<T> = std::result::Result<T, OrchestratorError>;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// The vault name stayed reserved for the whole attempt budget.
    #[error("Key vault name '{name}' is still reserved after {attempts} availability checks")]
    NameLocked { name: String, attempts: u32 },

    #[error(transparent)]
    Provider(#[from] WsError),

    #[error("Confirmation failed: {0}")]
    Confirmation(String),
}

impl OrchestratorError {
    pub fn is_name_locked(&self) -> bool {
        matches!(self, OrchestratorError::NameLocked { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_locked_is_distinct_from_provider_errors() {
        let locked = OrchestratorError::NameLocked {
            name: "demo-kv".to_string(),
            attempts: 12,
        };
        assert!(locked.is_name_locked());
        assert_eq!(
            locked.to_string(),
            "Key vault name 'demo-kv' is still reserved after 12 availability checks"
        );

        let provider: OrchestratorError = WsError::Provider("denied".to_string()).into();
        assert!(!provider.is_name_locked());
        assert_eq!(provider.to_string(), "Provider error: denied");
    }
}

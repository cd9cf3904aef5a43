use std::fmt::{self, Display, Formatter};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WsError {
    Auth(String),
    Config(String),
    Provider(String),
    Command(String),
    Dependency(String),
    Serialization(String),
}

impl Display for WsError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            WsError::Auth(s) => {
                write!(f, "Authentication failed: {}\n\n", s)?;
                write!(f, "Fix:\n")?;
                write!(f, "  • Run: az login\n")?;
                write!(f, "  • Verify the subscription id with: az account list")
            }
            WsError::Config(s) => write!(f, "Configuration error: {}", s),
            WsError::Provider(s) => write!(f, "Provider error: {}", s),
            WsError::Command(s) => write!(f, "Command failed: {}", s),
            WsError::Dependency(s) => write!(f, "Dependency not found: {}", s),
            WsError::Serialization(s) => write!(f, "Serialization error: {}", s),
        }
    }
}

impl From<serde_yaml_ng::Error> for WsError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        WsError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for WsError {
    fn from(err: serde_json::Error) -> Self {
        WsError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let err = WsError::Provider("quota exceeded".to_string());
        assert_eq!(err.to_string(), "Provider error: quota exceeded");
    }

    #[test]
    fn test_auth_error_includes_fix_hint() {
        let err = WsError::Auth("token expired".to_string());
        let text = err.to_string();
        assert!(text.starts_with("Authentication failed: token expired"));
        assert!(text.contains("az login"));
    }

    #[test]
    fn test_json_error_converts_to_serialization() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: WsError = json_err.into();
        assert!(matches!(err, WsError::Serialization(_)));
    }
}

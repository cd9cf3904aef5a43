//! User-facing rendering of provider failures.
//!
//! Provider calls fail with [`WsError`]; this module turns the common cases
//! into a message with a concrete next step.

use mlws_core::error::WsError;

const AZ_NOT_INSTALLED: &str = "The Azure CLI (az) is not installed or not on PATH";
const INSTALL_AZ: &str = "Install it from https://aka.ms/installazurecli and run: az login";
const PERMISSION_DENIED: &str = "The signed-in account is not allowed to perform this operation";
const CHECK_ROLE: &str = "Check your role assignment on the subscription or resource group";
const QUOTA_EXCEEDED: &str = "The subscription quota for this resource type is exhausted";
const CHANGE_REGION: &str = "Try another region with --region, or request a quota increase";
const ML_EXTENSION_MISSING: &str = "The Azure CLI 'ml' extension is missing";
const INSTALL_ML_EXTENSION: &str = "Install it with: az extension add --name ml";

/// Convert a provider error to a message with a suggestion when one is known.
pub fn user_friendly(err: &WsError) -> String {
    match err {
        WsError::Dependency(dep) if dep.contains("az") => {
            format!("{}\n💡 {}", AZ_NOT_INSTALLED, INSTALL_AZ)
        }
        WsError::Provider(msg) | WsError::Command(msg)
            if msg.contains("AuthorizationFailed") || msg.contains("does not have authorization") =>
        {
            format!("{}\n   {}\n💡 {}", PERMISSION_DENIED, msg, CHECK_ROLE)
        }
        WsError::Provider(msg) | WsError::Command(msg)
            if msg.contains("QuotaExceeded") || msg.contains("quota") =>
        {
            format!("{}\n   {}\n💡 {}", QUOTA_EXCEEDED, msg, CHANGE_REGION)
        }
        WsError::Provider(msg) | WsError::Command(msg)
            if msg.contains("'ml' is misspelled or not recognized") =>
        {
            format!("{}\n💡 {}", ML_EXTENSION_MISSING, INSTALL_ML_EXTENSION)
        }
        _ => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_cli_suggests_install() {
        let err = WsError::Dependency("az".to_string());
        let text = user_friendly(&err);
        assert!(text.contains("not installed"));
        assert!(text.contains("az login"));
    }

    #[test]
    fn test_authorization_failure_keeps_original_message() {
        let err = WsError::Provider("(AuthorizationFailed) client 'x' denied".to_string());
        let text = user_friendly(&err);
        assert!(text.contains("role assignment"));
        assert!(text.contains("client 'x' denied"));
    }

    #[test]
    fn test_other_errors_pass_through() {
        let err = WsError::Provider("boom".to_string());
        assert_eq!(user_friendly(&err), "Provider error: boom");
    }
}

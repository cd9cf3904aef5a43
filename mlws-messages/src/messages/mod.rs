//! Central registry for all user-facing message templates.
//!
//! - `provision` - `mlws create` output
//! - `teardown` - `mlws destroy` output
//! - `common` - shared messages (session, status, errors)
//!
//! ```rust
//! use mlws_messages::MESSAGES;
//!
//! let msg = MESSAGES.provision.success;
//! ```

mod common;
mod provision;
mod teardown;

pub use common::{CommonMessages, COMMON_MESSAGES};
pub use provision::{ProvisionMessages, PROVISION_MESSAGES};
pub use teardown::{TeardownMessages, TEARDOWN_MESSAGES};

pub struct Messages {
    pub provision: ProvisionMessages,
    pub teardown: TeardownMessages,
    pub common: CommonMessages,
}

pub const MESSAGES: Messages = Messages {
    provision: PROVISION_MESSAGES,
    teardown: TEARDOWN_MESSAGES,
    common: COMMON_MESSAGES,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_status_lines_carry_exactly_one_glyph() {
        for template in [MESSAGES.provision.success, MESSAGES.teardown.success] {
            assert_eq!(template.matches('✅').count(), 1, "{template}");
            assert!(!template.contains('✓'), "{template}");
        }
    }

    #[test]
    fn test_error_templates_leave_the_glyph_to_the_printer() {
        for template in [MESSAGES.common.error_generic, MESSAGES.common.error_name_locked] {
            assert!(!template.contains('❌'), "{template}");
        }
    }
}

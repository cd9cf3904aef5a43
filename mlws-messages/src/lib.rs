//! mlws-messages
//!
//! Centralized messaging for the mlws CLI: user-facing templates plus the
//! `msg!` builder that fills their `{placeholders}`.

pub mod builder;
pub mod macros;
pub mod messages;

pub use messages::MESSAGES;

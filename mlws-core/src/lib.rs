pub mod error;
pub mod identity;
pub mod naming;
pub mod output_macros;

// Re-export the identity and naming entry points for convenience
pub use identity::{ExistenceState, ResourceKind, WorkspaceIdentity, DEFAULT_REGION};
pub use naming::derive_name;

//! Local persisted state for the beta overlay.
//!
//! The rotation core never touches storage; this module is the file-backed
//! collaborator the CLI uses to remember which question a day already showed.

pub mod store;

// Re-export commonly used types
pub use store::{BetaState, StateError};

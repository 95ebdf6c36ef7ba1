//! Lifecycle error types

use thiserror::Error;
use ursgen_domain::UrsStatus;

/// Errors from lifecycle transitions.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The document is not in a status that permits the action
    #[error("cannot {action} a document in status {status}")]
    InvalidTransition {
        /// What was attempted
        action: String,
        /// Current document status
        status: UrsStatus,
    },

    /// No approval slot exists for the role
    #[error("no approval role named '{0}' on this document")]
    UnknownRole(String),

    /// The role has already recorded a decision
    #[error("role '{0}' has already recorded a decision")]
    AlreadyDecided(String),
}

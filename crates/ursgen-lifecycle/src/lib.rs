//! ursgen Document Lifecycle
//!
//! Status state machine, field-level updates with version history, and
//! the approval workflow for requirements documents.
//!
//! The state machine is deliberately small: `draft` is the only editable
//! entry point, `submit` fixes the approval roster and moves to
//! `in_review`, and from there decisions drive the document to `approved`
//! (every role approves) or `rejected` (any role rejects). A rejection is
//! final for that review round; the owner re-drafts via an explicit
//! status edit.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod approval;
mod error;
mod update;

#[cfg(test)]
mod test_support;

pub use approval::{record_decision, submit_for_approval, Decision, DEFAULT_ROSTER};
pub use error::LifecycleError;
pub use update::{apply_update, DocumentUpdate};

//! Clarifier error types

use thiserror::Error;

/// Errors that can occur during clarification
#[derive(Error, Debug)]
pub enum ClarifierError {
    /// No chunks to analyze
    #[error("no chunks provided")]
    NoChunks,

    /// An answer referenced a question that does not exist
    #[error("unknown question id: {0}")]
    UnknownQuestion(String),
}

//! Generator error types

use thiserror::Error;
use ursgen_llm::CompletionError;

/// Errors that can occur during document generation
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// No chunks to generate from
    #[error("no chunks provided")]
    NoChunks,

    /// The completion service failed outright
    #[error("completion failed: {0}")]
    Upstream(#[from] CompletionError),
}

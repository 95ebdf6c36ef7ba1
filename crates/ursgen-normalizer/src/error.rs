//! Normalizer error types

use thiserror::Error;
use ursgen_llm::CompletionError;

/// Errors that can occur during fact extraction
#[derive(Error, Debug)]
pub enum NormalizerError {
    /// No chunks to extract from
    #[error("no chunks provided")]
    NoChunks,

    /// The completion service failed outright
    #[error("completion failed: {0}")]
    Completion(#[from] CompletionError),
}

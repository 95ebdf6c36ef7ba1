//! Pipeline error taxonomy

use thiserror::Error;
use ursgen_clarifier::ClarifierError;
use ursgen_generator::GeneratorError;
use ursgen_lifecycle::LifecycleError;
use ursgen_llm::CompletionError;
use ursgen_normalizer::NormalizerError;
use ursgen_store::StoreError;

/// Errors surfaced by pipeline operations.
///
/// Malformed model output is never an error; stages fail closed and
/// report warnings. Only transport failures reach callers as `Upstream`.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The request cannot be processed as given
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced resource does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The completion service failed after retries
    #[error("completion service error: {0}")]
    Upstream(#[from] CompletionError),

    /// Storage failure
    #[error("store error: {0}")]
    Store(StoreError),

    /// Document lifecycle rule violated
    #[error("lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),
}

impl From<StoreError> for PipelineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => PipelineError::NotFound(id),
            other => PipelineError::Store(other),
        }
    }
}

impl From<NormalizerError> for PipelineError {
    fn from(err: NormalizerError) -> Self {
        match err {
            NormalizerError::NoChunks => {
                PipelineError::Validation("session has no chunks".to_string())
            }
            NormalizerError::Completion(inner) => PipelineError::Upstream(inner),
        }
    }
}

impl From<ClarifierError> for PipelineError {
    fn from(err: ClarifierError) -> Self {
        match err {
            ClarifierError::NoChunks => {
                PipelineError::Validation("session has no chunks".to_string())
            }
            ClarifierError::UnknownQuestion(id) => {
                PipelineError::Validation(format!("unknown question id: {}", id))
            }
        }
    }
}

impl From<GeneratorError> for PipelineError {
    fn from(err: GeneratorError) -> Self {
        match err {
            GeneratorError::NoChunks => {
                PipelineError::Validation("session has no chunks".to_string())
            }
            GeneratorError::Upstream(inner) => PipelineError::Upstream(inner),
        }
    }
}

//! Core normalization stage

use crate::error::NormalizerError;
use crate::parser::parse_facts_response;
use crate::prompt;
use std::sync::Arc;
use tracing::{info, warn};
use ursgen_domain::{NormalizedFacts, SourceChunk};
use ursgen_llm::{CompletionContent, CompletionService, CompletionStats};

/// Result of one normalization run.
#[derive(Debug)]
pub struct NormalizeOutcome {
    /// Extracted facts, entities, gaps, summary
    pub facts: NormalizedFacts,
    /// Non-fatal problems encountered
    pub warnings: Vec<String>,
    /// Completion telemetry for the audit trail
    pub stats: CompletionStats,
}

/// Stage 1: extracts typed, cited facts from chunks.
pub struct Normalizer<C: CompletionService> {
    service: Arc<C>,
}

impl<C: CompletionService> Normalizer<C> {
    /// Create a normalizer over a completion service.
    pub fn new(service: Arc<C>) -> Self {
        Self { service }
    }

    /// Run fact extraction over the given chunks.
    ///
    /// Output that is not a JSON object fails closed to an empty fact set
    /// with a warning; only transport failures are errors.
    pub async fn normalize(
        &self,
        chunks: &[SourceChunk],
    ) -> Result<NormalizeOutcome, NormalizerError> {
        if chunks.is_empty() {
            return Err(NormalizerError::NoChunks);
        }

        info!(chunk_count = chunks.len(), "starting fact extraction");

        let user_prompt = prompt::build_user_prompt(chunks);
        let completion = self
            .service
            .complete(prompt::SYSTEM_PROMPT, &user_prompt, true)
            .await?;

        let mut warnings = Vec::new();
        let facts = match &completion.content {
            CompletionContent::Json(value) => parse_facts_response(value),
            CompletionContent::Text(raw) => {
                warn!("extraction output was not JSON, failing closed to empty fact set");
                warnings.push(format!(
                    "extraction output was not valid JSON ({} chars), no facts recorded",
                    raw.len()
                ));
                NormalizedFacts::default()
            }
        };

        info!(
            facts = facts.facts.len(),
            gaps = facts.gaps_identified.len(),
            "fact extraction complete"
        );

        Ok(NormalizeOutcome {
            stats: completion.stats(&user_prompt),
            facts,
            warnings,
        })
    }
}

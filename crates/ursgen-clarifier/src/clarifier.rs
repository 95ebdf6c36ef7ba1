//! Core clarification stage

use crate::error::ClarifierError;
use crate::heuristics::rule_based_questions;
use crate::parser::parse_questions_response;
use crate::prompt;
use crate::scoring::completeness_score;
use std::sync::Arc;
use tracing::{info, warn};
use ursgen_domain::{ClarifyingQuestion, NormalizedFacts, SourceChunk};
use ursgen_llm::{CompletionContent, CompletionService, CompletionStats};

/// Result of one clarification run.
#[derive(Debug)]
pub struct ClarifyOutcome {
    /// Questions to put to the stakeholders
    pub questions: Vec<ClarifyingQuestion>,
    /// How complete the input looks, in `[0.0, 1.0]`
    pub completeness_score: f64,
    /// Non-fatal problems encountered
    pub warnings: Vec<String>,
    /// Completion telemetry; absent on the rule-based path
    pub stats: Option<CompletionStats>,
}

/// Stage 2: generates clarifying questions and a completeness score.
///
/// Without a completion service the clarifier runs the deterministic
/// rule-based path. With one, it asks the model and falls back to the
/// rules when the output is unusable.
pub struct Clarifier<C: CompletionService> {
    service: Option<Arc<C>>,
}

impl<C: CompletionService> Clarifier<C> {
    /// Completion-backed clarifier.
    pub fn new(service: Arc<C>) -> Self {
        Self {
            service: Some(service),
        }
    }

    /// Rule-based clarifier, no model involved.
    pub fn rule_based() -> Self {
        Self { service: None }
    }

    /// Generate questions and score completeness.
    pub async fn clarify(
        &self,
        chunks: &[SourceChunk],
        facts: &NormalizedFacts,
    ) -> Result<ClarifyOutcome, ClarifierError> {
        if chunks.is_empty() {
            return Err(ClarifierError::NoChunks);
        }
        let total_content_len: usize = chunks.iter().map(|c| c.content.len()).sum();

        let mut warnings = Vec::new();
        let mut stats = None;

        let questions = match &self.service {
            None => rule_based_questions(chunks),
            Some(service) => {
                let user_prompt = prompt::build_user_prompt(chunks, facts);
                match service.complete(prompt::SYSTEM_PROMPT, &user_prompt, true).await {
                    Ok(completion) => {
                        stats = Some(completion.stats(&user_prompt));
                        match &completion.content {
                            CompletionContent::Json(value) => parse_questions_response(value),
                            CompletionContent::Text(_) => {
                                warn!("question output was not JSON, falling back to rules");
                                warnings.push(
                                    "question generation output was not valid JSON, used rule-based questions"
                                        .to_string(),
                                );
                                rule_based_questions(chunks)
                            }
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "question generation failed, falling back to rules");
                        warnings.push(format!(
                            "question generation failed ({}), used rule-based questions",
                            e
                        ));
                        rule_based_questions(chunks)
                    }
                }
            }
        };

        let completeness = completeness_score(&questions, total_content_len);
        info!(
            questions = questions.len(),
            completeness, "clarification complete"
        );

        Ok(ClarifyOutcome {
            questions,
            completeness_score: completeness,
            warnings,
            stats,
        })
    }
}

//! Core document generation stage

use crate::error::GeneratorError;
use crate::parser;
use crate::prompt;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};
use ursgen_domain::{
    NormalizedFacts, Session, SourceChunk, Urs, UrsMetadata, UrsStatus, VersionEntry,
};
use ursgen_llm::{CompletionContent, CompletionService, CompletionStats};

/// Result of one generation run.
#[derive(Debug)]
pub struct GenerateOutcome {
    /// The assembled document, status `draft`
    pub urs: Urs,
    /// Non-fatal problems encountered during assembly
    pub warnings: Vec<String>,
    /// Assumption references and unvalidated scope assumptions
    pub assumptions_made: usize,
    /// Functional requirements at low confidence
    pub low_confidence_requirements: usize,
    /// Completion telemetry for the audit trail
    pub stats: CompletionStats,
}

/// Stage 3: synthesizes a complete URS draft from chunks and facts.
///
/// Every structural guarantee (requirement ids, "The system shall"
/// phrasing, at least one acceptance criterion, source references on
/// every requirement) is enforced here, not trusted from the model.
pub struct Generator<C: CompletionService> {
    service: Arc<C>,
}

impl<C: CompletionService> Generator<C> {
    /// Create a generator over a completion service.
    pub fn new(service: Arc<C>) -> Self {
        Self { service }
    }

    /// Generate a draft document for the session.
    ///
    /// Output that is not a JSON object fails closed to a near-empty
    /// document with a single placeholder requirement; only transport
    /// failures are errors.
    pub async fn generate(
        &self,
        session: &Session,
        chunks: &[SourceChunk],
    ) -> Result<GenerateOutcome, GeneratorError> {
        if chunks.is_empty() {
            return Err(GeneratorError::NoChunks);
        }

        info!(
            urs_id = %session.urs_id,
            chunk_count = chunks.len(),
            "starting document generation"
        );

        let facts = session.facts.clone().unwrap_or_default();
        let user_prompt =
            prompt::build_user_prompt(&session.title, &session.department, chunks, &facts);
        let completion = self
            .service
            .complete(prompt::SYSTEM_PROMPT, &user_prompt, true)
            .await?;

        let mut warnings = Vec::new();
        let value = match &completion.content {
            CompletionContent::Json(value) => value.clone(),
            CompletionContent::Text(raw) => {
                warn!("synthesis output was not JSON, assembling placeholder document");
                warnings.push(format!(
                    "synthesis output was not valid JSON ({} chars), document built from defaults",
                    raw.len()
                ));
                Value::Object(serde_json::Map::new())
            }
        };

        let urs = assemble(session, chunks, &facts, &value, &mut warnings);

        let assumptions_made = urs.assumption_count();
        let low_confidence_requirements = urs.low_confidence_count();
        if assumptions_made > 0 {
            warnings.push(format!(
                "{} assumption(s) made; review the scope assumptions and any requirement citing an assumption reference",
                assumptions_made
            ));
        }

        info!(
            urs_id = %session.urs_id,
            functional = urs.functional_requirements.len(),
            non_functional = urs.non_functional_requirements.len(),
            assumptions = assumptions_made,
            "document generation complete"
        );

        Ok(GenerateOutcome {
            urs,
            warnings,
            assumptions_made,
            low_confidence_requirements,
            stats: completion.stats(&user_prompt),
        })
    }
}

/// Map the loose synthesis value onto the strict schema.
fn assemble(
    session: &Session,
    chunks: &[SourceChunk],
    facts: &NormalizedFacts,
    value: &Value,
    warnings: &mut Vec<String>,
) -> Urs {
    let pool = parser::reference_pool(chunks);
    let now = Utc::now();

    let mut functional_requirements =
        parser::parse_functional_requirements(value, &pool, warnings);
    if functional_requirements.is_empty() {
        warn!("synthesis produced no functional requirements, inserting placeholder");
        warnings.push(
            "no functional requirements produced, inserted a placeholder for elaboration"
                .to_string(),
        );
        functional_requirements.push(parser::fallback_requirement(&pool));
    }

    Urs {
        metadata: UrsMetadata {
            id: session.urs_id.clone(),
            title: session.title.clone(),
            requestor: session.requestor.clone(),
            department: session.department.clone(),
            status: UrsStatus::Draft,
            owner: session.requestor.clone(),
            data_classification: session.data_classification,
            created_at: now,
            updated_at: now,
            tags: vec![],
        },
        executive_summary: parser::parse_executive_summary(value, &pool, &facts.summary),
        problem_statement: parser::parse_problem_statement(value, &pool),
        users_and_personas: parser::parse_personas(value),
        scope: parser::parse_scope(value),
        functional_requirements,
        non_functional_requirements: parser::parse_nfrs(value, &pool, warnings),
        risks_and_open_questions: None,
        success_metrics: parser::parse_success_metrics(value),
        version_history: vec![VersionEntry {
            version: "0.1".to_string(),
            date: now,
            author: session.requestor.name.clone(),
            changes: "Initial draft generated from stakeholder inputs".to_string(),
        }],
        approvals: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ursgen_domain::{DataClassification, Person, Priority, SourceType};
    use ursgen_llm::MockService;

    fn chunk(id: &str, content: &str) -> SourceChunk {
        SourceChunk {
            chunk_id: id.to_string(),
            source_id: "s".to_string(),
            source_type: SourceType::Document,
            source_name: "notes.txt".to_string(),
            content: content.to_string(),
            content_hash: "0".repeat(16),
            page_number: None,
            start_offset: None,
            end_offset: None,
            data_classification: DataClassification::Internal,
            created_at: Utc::now(),
        }
    }

    fn session() -> Session {
        Session::new(
            "URS-2026-0001".to_string(),
            "s".to_string(),
            "Invoice automation".to_string(),
            Person::new("Dana Reyes".to_string(), "dana@example.com".to_string()),
            "Finance".to_string(),
            DataClassification::Internal,
        )
    }

    fn block_on<F: std::future::Future>(fut: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(fut)
    }

    #[test]
    fn no_chunks_is_an_error() {
        let generator = Generator::new(Arc::new(MockService::default()));
        let err = block_on(generator.generate(&session(), &[])).unwrap_err();
        assert!(matches!(err, GeneratorError::NoChunks));
    }

    #[test]
    fn assembles_a_draft_from_json_output() {
        let response = r#"{
            "executive_summary": { "summary": "Automate invoice entry.", "business_value": "Saves 10 hours weekly." },
            "problem_statement": { "current_state": "Manual rekeying.", "pain_points": ["Rekeying"], "desired_state": "Automated capture." },
            "functional_requirements": [
                { "description": "The system shall capture invoices from email.", "priority": "must",
                  "acceptance_criteria": ["Invoices arriving by email appear within 2 minutes"], "confidence": "high" }
            ]
        }"#;
        let generator = Generator::new(Arc::new(MockService::new(response)));
        let outcome =
            block_on(generator.generate(&session(), &[chunk("s-chunk-0000", "invoices")]))
                .unwrap();
        let urs = &outcome.urs;
        assert_eq!(urs.metadata.id, "URS-2026-0001");
        assert_eq!(urs.metadata.status, UrsStatus::Draft);
        assert_eq!(urs.functional_requirements.len(), 1);
        assert_eq!(urs.functional_requirements[0].requirement_id, "FR-001");
        assert_eq!(urs.functional_requirements[0].priority, Priority::Must);
        assert_eq!(urs.version_history.len(), 1);
        assert_eq!(urs.version_history[0].version, "0.1");
        assert_eq!(outcome.assumptions_made, 0);
    }

    #[test]
    fn non_json_output_yields_placeholder_document() {
        let generator = Generator::new(Arc::new(MockService::new("not json at all")));
        let outcome =
            block_on(generator.generate(&session(), &[chunk("s-chunk-0000", "invoices")]))
                .unwrap();
        assert_eq!(outcome.urs.functional_requirements.len(), 1);
        assert!(outcome.urs.functional_requirements[0]
            .description
            .starts_with("The system shall"));
        assert!(outcome
            .warnings
            .iter()
            .any(|w| w.contains("not valid JSON")));
    }

    #[test]
    fn empty_requirement_list_gets_placeholder() {
        let generator =
            Generator::new(Arc::new(MockService::new(r#"{"functional_requirements": []}"#)));
        let outcome =
            block_on(generator.generate(&session(), &[chunk("s-chunk-0000", "invoices")]))
                .unwrap();
        assert_eq!(outcome.urs.functional_requirements.len(), 1);
        assert!(outcome.warnings.iter().any(|w| w.contains("placeholder")));
    }

    #[test]
    fn assumption_references_are_counted() {
        let response = r#"{
            "functional_requirements": [
                { "description": "The system shall capture invoices.", "confidence": "high" },
                { "description": "The system shall archive records.", "confidence": "high" }
            ]
        }"#;
        let generator = Generator::new(Arc::new(MockService::new(response)));
        // Only one chunk, so the second requirement falls outside the pool.
        let outcome =
            block_on(generator.generate(&session(), &[chunk("s-chunk-0000", "invoices")]))
                .unwrap();
        assert_eq!(outcome.assumptions_made, 1);
        assert_eq!(outcome.low_confidence_requirements, 1);
        assert!(outcome.warnings.iter().any(|w| w.contains("assumption")));
    }

    #[test]
    fn transport_failure_propagates() {
        let mut svc = MockService::default();
        svc.add_error("Project title");
        let generator = Generator::new(Arc::new(svc));
        let err = block_on(generator.generate(&session(), &[chunk("c", "text")])).unwrap_err();
        assert!(matches!(err, GeneratorError::Upstream(_)));
    }
}

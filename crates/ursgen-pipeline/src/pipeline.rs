//! The four-stage pipeline orchestrator

use crate::error::PipelineError;
use chrono::{Datelike, Utc};
use serde_json::json;
use std::sync::{Arc, Mutex};
use tracing::info;
use ursgen_audit::{AuditAction, AuditEvent, AuditSink, LlmTelemetry};
use ursgen_chunker::{Chunker, ChunkerConfig, SourceMeta};
use ursgen_clarifier::{Clarifier, ClarifyOutcome};
use ursgen_domain::ids::{format_chunk_id, format_urs_id};
use ursgen_domain::{
    Answer, ClarifyingQuestion, DataClassification, Person, Session, SessionStatus, SourceType,
    Urs, UrsStatus,
};
use ursgen_generator::{GenerateOutcome, Generator};
use ursgen_lifecycle::{Decision, DocumentUpdate};
use ursgen_llm::{CompletionService, CompletionStats};
use ursgen_normalizer::{NormalizeOutcome, Normalizer};
use ursgen_qa::{QaEngine, QaReport};
use ursgen_store::{ChunkStore, DocumentStore, QuestionStore, SessionStore};

/// One piece of source material to ingest.
#[derive(Debug, Clone)]
pub struct SourceInput {
    /// Kind of material
    pub source_type: SourceType,
    /// Filename or input label
    pub source_name: String,
    /// The raw text
    pub content: String,
}

/// Everything needed to open a session.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    /// Working title for the document
    pub title: String,
    /// Who is asking
    pub requestor: Person,
    /// Requesting department
    pub department: String,
    /// Data handling classification for everything in the session
    pub data_classification: DataClassification,
    /// Source material, at least one input with usable text
    pub inputs: Vec<SourceInput>,
}

/// Result of answer submission, re-exported shape from the clarifier.
pub use ursgen_clarifier::AnswerOutcome;

/// Year-keyed counter for minting `URS-YYYY-NNNN` ids.
///
/// Reservation happens under one lock, so concurrent ingests can never
/// mint the same id. The sequence restarts at 1 when the year changes.
struct UrsSequence {
    inner: Mutex<(i32, u32)>,
}

impl UrsSequence {
    fn new() -> Self {
        Self {
            inner: Mutex::new((0, 0)),
        }
    }

    fn next(&self, year: i32) -> u32 {
        let mut state = self.inner.lock().unwrap();
        if state.0 != year {
            *state = (year, 0);
        }
        state.1 += 1;
        state.1
    }
}

/// Fixed stores and stage drivers behind a single entry point.
///
/// All state lives in in-memory registries shared through `Arc`, so a
/// pipeline can be cloned across request handlers cheaply. No registry
/// lock is held across an await point; stages run on owned snapshots.
pub struct Pipeline<C: CompletionService> {
    chunks: Arc<ChunkStore>,
    sessions: Arc<SessionStore>,
    questions: Arc<QuestionStore>,
    documents: Arc<DocumentStore>,
    chunker: Chunker,
    normalizer: Normalizer<C>,
    clarifier: Clarifier<C>,
    generator: Generator<C>,
    qa: QaEngine,
    audit: Arc<dyn AuditSink>,
    sequence: UrsSequence,
}

impl<C: CompletionService> Pipeline<C> {
    /// Create a pipeline with default chunking and review settings.
    pub fn new(service: Arc<C>, audit: Arc<dyn AuditSink>) -> Self {
        Self::with_chunker_config(service, audit, ChunkerConfig::default())
    }

    /// Create a pipeline with a specific chunker configuration.
    pub fn with_chunker_config(
        service: Arc<C>,
        audit: Arc<dyn AuditSink>,
        chunker_config: ChunkerConfig,
    ) -> Self {
        Self {
            chunks: Arc::new(ChunkStore::new()),
            sessions: Arc::new(SessionStore::new()),
            questions: Arc::new(QuestionStore::new()),
            documents: Arc::new(DocumentStore::new()),
            chunker: Chunker::new(chunker_config),
            normalizer: Normalizer::new(Arc::clone(&service)),
            clarifier: Clarifier::new(Arc::clone(&service)),
            generator: Generator::new(service),
            qa: QaEngine::default(),
            audit,
            sequence: UrsSequence::new(),
        }
    }

    /// Open a session: assign a document id, chunk and store the inputs.
    ///
    /// Inputs that reduce to no usable text are rejected before anything
    /// is stored.
    pub fn ingest(&self, request: IngestRequest) -> Result<Session, PipelineError> {
        let source_id = format!("src-{}", &uuid::Uuid::new_v4().simple().to_string()[..8]);

        let mut all_chunks = Vec::new();
        for input in &request.inputs {
            let meta = SourceMeta {
                source_id: source_id.clone(),
                source_type: input.source_type,
                source_name: input.source_name.clone(),
                data_classification: request.data_classification,
            };
            for mut chunk in self.chunker.chunk(&meta, &input.content) {
                // Chunk indices run continuously across inputs.
                chunk.chunk_id = format_chunk_id(&source_id, all_chunks.len());
                all_chunks.push(chunk);
            }
        }
        if all_chunks.is_empty() {
            return Err(PipelineError::Validation(
                "no usable text in any input".to_string(),
            ));
        }

        let year = Utc::now().year();
        let urs_id = format_urs_id(year, self.sequence.next(year));

        let mut session = Session::new(
            urs_id,
            source_id,
            request.title,
            request.requestor,
            request.department,
            request.data_classification,
        );
        session.chunk_ids = all_chunks.iter().map(|c| c.chunk_id.clone()).collect();

        for chunk in all_chunks {
            self.chunks.insert(chunk)?;
        }
        self.sessions.insert(session.clone())?;

        info!(
            session_id = %session.session_id,
            urs_id = %session.urs_id,
            chunks = session.chunk_ids.len(),
            "session opened"
        );
        self.audit.record(
            AuditEvent::new(
                AuditAction::Ingest,
                "session",
                &session.session_id,
                session.data_classification,
            )
            .with_metadata(json!({
                "urs_id": session.urs_id,
                "inputs": request.inputs.len(),
                "chunks": session.chunk_ids.len(),
            })),
        );
        Ok(session)
    }

    /// Stage 1: extract facts and store them on the session.
    pub async fn normalize(&self, session_id: &str) -> Result<NormalizeOutcome, PipelineError> {
        let session = self.sessions.get(session_id)?;
        let chunks = self.chunks.get_many(&session.chunk_ids)?;

        let outcome = self.normalizer.normalize(&chunks).await?;

        self.sessions.update(session_id, |s| {
            s.facts = Some(outcome.facts.clone());
            s.status = SessionStatus::Normalized;
        })?;

        self.audit.record(
            AuditEvent::new(
                AuditAction::Normalize,
                "session",
                session_id,
                session.data_classification,
            )
            .with_metadata(json!({
                "facts": outcome.facts.facts.len(),
                "gaps": outcome.facts.gaps_identified.len(),
                "warnings": outcome.warnings.len(),
            }))
            .with_llm(telemetry(&outcome.stats)),
        );
        Ok(outcome)
    }

    /// Stage 2: generate clarifying questions and a completeness score.
    ///
    /// Question ids are namespaced by the session source so questions
    /// from concurrent sessions never collide in the store.
    pub async fn clarify(&self, session_id: &str) -> Result<ClarifyOutcome, PipelineError> {
        let session = self.sessions.get(session_id)?;
        let chunks = self.chunks.get_many(&session.chunk_ids)?;
        let facts = session.facts.clone().unwrap_or_default();

        let mut outcome = self.clarifier.clarify(&chunks, &facts).await?;
        for question in &mut outcome.questions {
            question.question_id = format!("{}-{}", session.source_id, question.question_id);
            // Re-clarifying a session regenerates the same ids.
            if !self.questions.contains(&question.question_id) {
                self.questions.insert(question.clone())?;
            }
        }

        let question_ids: Vec<String> = outcome
            .questions
            .iter()
            .map(|q| q.question_id.clone())
            .collect();
        self.sessions.update(session_id, |s| {
            s.question_ids = question_ids.clone();
            s.status = SessionStatus::Clarifying;
        })?;

        let mut event = AuditEvent::new(
            AuditAction::Clarify,
            "session",
            session_id,
            session.data_classification,
        )
        .with_metadata(json!({
            "questions": outcome.questions.len(),
            "completeness_score": outcome.completeness_score,
            "warnings": outcome.warnings.len(),
        }));
        if let Some(stats) = &outcome.stats {
            event = event.with_llm(telemetry(stats));
        }
        self.audit.record(event);
        Ok(outcome)
    }

    /// Fold stakeholder answers back into the session as new chunks.
    pub fn submit_answers(
        &self,
        session_id: &str,
        answers: &[Answer],
    ) -> Result<AnswerOutcome, PipelineError> {
        let session = self.sessions.get(session_id)?;
        let questions: Vec<ClarifyingQuestion> = session
            .question_ids
            .iter()
            .map(|id| self.questions.get(id))
            .collect::<Result<_, _>>()?;

        // Folding runs under the session's write lock so concurrent
        // submissions cannot allocate the same chunk ids. A scratch copy
        // keeps a failed batch from leaving partial state behind.
        let outcome = self.sessions.update_with(session_id, |s| {
            let mut scratch = s.clone();
            let outcome = ursgen_clarifier::submit_answers(&mut scratch, &questions, answers)?;
            *s = scratch;
            Ok::<_, ursgen_clarifier::ClarifierError>(outcome)
        })??;
        for chunk in &outcome.new_chunks {
            self.chunks.insert(chunk.clone())?;
        }

        self.audit.record(
            AuditEvent::new(
                AuditAction::Answer,
                "session",
                session_id,
                session.data_classification,
            )
            .with_metadata(json!({
                "answers_submitted": outcome.answers_submitted,
                "remaining_questions": outcome.remaining_questions,
            })),
        );
        Ok(outcome)
    }

    /// Stage 3: synthesize the document and commit it to the store.
    ///
    /// The document is stored only once fully assembled; a failure leaves
    /// no partial document behind.
    pub async fn generate(&self, session_id: &str) -> Result<GenerateOutcome, PipelineError> {
        let session = self.sessions.get(session_id)?;
        let chunks = self.chunks.get_many(&session.chunk_ids)?;

        let outcome = self.generator.generate(&session, &chunks).await?;

        let urs_id = outcome.urs.metadata.id.clone();
        // Regeneration replaces the previous draft.
        match self.documents.update(&urs_id, |d| *d = outcome.urs.clone()) {
            Ok(()) => {}
            Err(ursgen_store::StoreError::NotFound(_)) => {
                self.documents.insert(outcome.urs.clone())?;
            }
            Err(e) => return Err(e.into()),
        }
        self.sessions
            .update(session_id, |s| s.status = SessionStatus::Generated)?;

        self.audit.record(
            AuditEvent::new(
                AuditAction::Generate,
                "document",
                &urs_id,
                session.data_classification,
            )
            .with_metadata(json!({
                "functional_requirements": outcome.urs.functional_requirements.len(),
                "assumptions_made": outcome.assumptions_made,
                "low_confidence_requirements": outcome.low_confidence_requirements,
            }))
            .with_llm(telemetry(&outcome.stats)),
        );
        Ok(outcome)
    }

    /// Stage 4: review a stored document.
    pub fn review(&self, urs_id: &str) -> Result<QaReport, PipelineError> {
        let urs = self.documents.get(urs_id)?;
        let report = self.qa.review(&urs);

        self.audit.record(
            AuditEvent::new(
                AuditAction::Review,
                "document",
                urs_id,
                urs.metadata.data_classification,
            )
            .with_metadata(json!({
                "issues": report.issues.len(),
                "blocking": report.blocking_issues_count,
                "overall_score": report.scores.overall,
                "ready_for_approval": report.ready_for_approval,
            })),
        );
        Ok(report)
    }

    /// Apply a field-level update to a stored document.
    pub fn update_document(
        &self,
        urs_id: &str,
        update: DocumentUpdate,
        author: &str,
    ) -> Result<Urs, PipelineError> {
        let (changed, urs) = self.documents.update_with(urs_id, |d| {
            let changed = ursgen_lifecycle::apply_update(d, update, author);
            (changed, d.clone())
        })?;

        self.audit.record(
            AuditEvent::new(
                AuditAction::Update,
                "document",
                urs_id,
                urs.metadata.data_classification,
            )
            .with_metadata(json!({ "changed_fields": changed })),
        );
        Ok(urs)
    }

    /// Move a draft document into review, fixing the approval roster.
    pub fn submit_for_approval(
        &self,
        urs_id: &str,
        roles: &[String],
    ) -> Result<Urs, PipelineError> {
        let urs = self.documents.update_with(urs_id, |d| {
            ursgen_lifecycle::submit_for_approval(d, roles)?;
            Ok::<_, ursgen_lifecycle::LifecycleError>(d.clone())
        })??;

        self.audit.record(
            AuditEvent::new(
                AuditAction::Submit,
                "document",
                urs_id,
                urs.metadata.data_classification,
            )
            .with_metadata(json!({
                "roles": urs.approvals.iter().map(|a| a.role.clone()).collect::<Vec<_>>(),
            })),
        );
        Ok(urs)
    }

    /// Record one role's approval decision.
    pub fn record_approval(
        &self,
        urs_id: &str,
        decision: Decision,
    ) -> Result<UrsStatus, PipelineError> {
        let role = decision.role.clone();
        let approved = decision.approved;
        // Deciding under the write lock keeps two roles' decisions from
        // overwriting each other.
        let (status, classification) = self.documents.update_with(urs_id, |d| {
            let status = ursgen_lifecycle::record_decision(d, decision)?;
            Ok::<_, ursgen_lifecycle::LifecycleError>((status, d.metadata.data_classification))
        })??;

        self.audit.record(
            AuditEvent::new(
                AuditAction::ApprovalDecision,
                "document",
                urs_id,
                classification,
            )
            .with_metadata(json!({
                "role": role,
                "approved": approved,
                "status": status.to_string(),
            })),
        );
        Ok(status)
    }

    /// Fetch one document.
    pub fn get_document(&self, urs_id: &str) -> Result<Urs, PipelineError> {
        Ok(self.documents.get(urs_id)?)
    }

    /// Fetch one session.
    pub fn get_session(&self, session_id: &str) -> Result<Session, PipelineError> {
        Ok(self.sessions.get(session_id)?)
    }

    /// List stored documents, newest first, with optional filters.
    pub fn list_documents(&self, filter: &DocumentFilter) -> Vec<Urs> {
        let mut documents: Vec<Urs> = self
            .documents
            .list()
            .into_iter()
            .filter(|d| {
                filter
                    .status
                    .map_or(true, |status| d.metadata.status == status)
            })
            .filter(|d| {
                filter
                    .department
                    .as_deref()
                    .map_or(true, |dept| d.metadata.department == dept)
            })
            .collect();
        documents.sort_by(|a, b| b.metadata.created_at.cmp(&a.metadata.created_at));
        documents
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit.unwrap_or(usize::MAX))
            .collect()
    }
}

/// Filters for [`Pipeline::list_documents`].
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    /// Keep only documents in this status
    pub status: Option<UrsStatus>,
    /// Keep only documents from this department
    pub department: Option<String>,
    /// Maximum number of documents to return
    pub limit: Option<usize>,
    /// Number of documents to skip
    pub offset: usize,
}

fn telemetry(stats: &CompletionStats) -> LlmTelemetry {
    LlmTelemetry {
        model: stats.model.clone(),
        input_tokens: stats.input_tokens,
        output_tokens: stats.output_tokens,
        latency_ms: stats.latency_ms,
        request_hash: Some(stats.request_hash.clone()),
        response_hash: Some(stats.response_hash.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::UrsSequence;
    use std::collections::HashSet;
    use std::sync::{Arc, Barrier};

    #[test]
    fn sequence_counts_up_within_a_year() {
        let seq = UrsSequence::new();
        assert_eq!(seq.next(2026), 1);
        assert_eq!(seq.next(2026), 2);
        assert_eq!(seq.next(2026), 3);
    }

    #[test]
    fn sequence_restarts_when_the_year_changes() {
        let seq = UrsSequence::new();
        seq.next(2026);
        seq.next(2026);
        assert_eq!(seq.next(2027), 1);
    }

    #[test]
    fn concurrent_reservations_never_collide() {
        let seq = Arc::new(UrsSequence::new());
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let seq = Arc::clone(&seq);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    (0..100).map(|_| seq.next(2026)).collect::<Vec<u32>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for n in handle.join().unwrap() {
                assert!(seen.insert(n));
            }
        }
        assert_eq!(seen.len(), 800);
    }
}

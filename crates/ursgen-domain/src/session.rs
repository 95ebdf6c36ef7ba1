//! Intake session tracking.
//!
//! A session carries one source through the pipeline: ingest, normalize,
//! clarify, generate. The session remembers which stage it has reached and
//! holds the normalized facts between stages.

use crate::chunk::DataClassification;
use crate::fact::NormalizedFacts;
use crate::urs::Person;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Pipeline stage the session has reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Chunks stored, nothing extracted yet
    Ingested,
    /// Facts extracted
    Normalized,
    /// Clarifying questions produced, some may be unanswered
    Clarifying,
    /// Document generated and committed
    Generated,
}

/// One intake session tied to a single source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Session id (UUID)
    pub session_id: String,
    /// Target document id, assigned at session creation
    pub urs_id: String,
    /// Source id shared by all of this session's chunks
    pub source_id: String,
    /// Working title for the document
    pub title: String,
    /// Who submitted the material
    pub requestor: Person,
    /// Requesting department
    pub department: String,
    /// Data handling classification inherited by chunks and document
    pub data_classification: DataClassification,
    /// Ids of stored chunks, in order
    pub chunk_ids: Vec<String>,
    /// Ids of clarifying questions raised for this session
    #[serde(default)]
    pub question_ids: Vec<String>,
    /// Ids of questions that have received an answer
    #[serde(default)]
    pub answered_question_ids: Vec<String>,
    /// Stage reached
    pub status: SessionStatus,
    /// Extraction output, present once normalized
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facts: Option<NormalizedFacts>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Start a new session. The document id is assigned here so that a
    /// requestor can reference it before generation completes.
    pub fn new(
        urs_id: String,
        source_id: String,
        title: String,
        requestor: Person,
        department: String,
        data_classification: DataClassification,
    ) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            urs_id,
            source_id,
            title,
            requestor,
            department,
            data_classification,
            chunk_ids: Vec::new(),
            question_ids: Vec::new(),
            answered_question_ids: Vec::new(),
            status: SessionStatus::Ingested,
            facts: None,
            created_at: Utc::now(),
        }
    }

    /// Year component used when minting the document id.
    pub fn year(&self) -> i32 {
        self.created_at.year()
    }

    /// Questions raised but not yet answered. Answering the same question
    /// twice never drives this below zero.
    pub fn remaining_question_count(&self) -> usize {
        self.question_ids
            .iter()
            .filter(|id| !self.answered_question_ids.contains(id))
            .count()
    }
}

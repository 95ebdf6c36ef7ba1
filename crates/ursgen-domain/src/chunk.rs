//! Source chunks - the atomic unit of traceability

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of source material a chunk was cut from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// Uploaded document (PDF, DOCX, plain text)
    Document,
    /// Email thread
    Email,
    /// Meeting transcript or notes
    MeetingNotes,
    /// Interview transcript
    Interview,
    /// Screenshot run through OCR
    Screenshot,
    /// External link content
    Link,
    /// Free-form text typed by the requestor (includes clarification answers)
    UserInput,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceType::Document => "document",
            SourceType::Email => "email",
            SourceType::MeetingNotes => "meeting_notes",
            SourceType::Interview => "interview",
            SourceType::Screenshot => "screenshot",
            SourceType::Link => "link",
            SourceType::UserInput => "user_input",
        };
        write!(f, "{}", s)
    }
}

/// Data handling classification carried on chunks and documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DataClassification {
    /// Standard handling
    #[default]
    #[serde(rename = "INTERNAL")]
    Internal,
    /// Enhanced handling, full audit trail
    #[serde(rename = "CONFIDENTIAL")]
    Confidential,
}

impl fmt::Display for DataClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataClassification::Internal => write!(f, "INTERNAL"),
            DataClassification::Confidential => write!(f, "CONFIDENTIAL"),
        }
    }
}

/// An immutable segment of source text with a stable identifier.
///
/// Chunks are created once at ingestion and never mutated afterwards.
/// Every downstream fact and requirement references chunks by id, never by
/// ownership. Chunk ids are deterministic (`{source_id}-chunk-{NNNN}`), so
/// re-chunking identical input produces identical ids and hashes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceChunk {
    /// Deterministic id, `{source_id}-chunk-{NNNN}`
    pub chunk_id: String,

    /// Parent source document id
    pub source_id: String,

    /// Kind of source material
    pub source_type: SourceType,

    /// Original filename or input label
    pub source_name: String,

    /// The chunk text
    pub content: String,

    /// 16-hex-char SHA-256 prefix of `content`, for de-duplication
    pub content_hash: String,

    /// Page number for paged documents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,

    /// Byte offset of the chunk start within the cleaned source text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_offset: Option<usize>,

    /// Byte offset of the chunk end within the cleaned source text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_offset: Option<usize>,

    /// Data handling classification
    pub data_classification: DataClassification,

    /// When the chunk was created
    pub created_at: DateTime<Utc>,
}

//! Audit event structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use ursgen_domain::DataClassification;

/// What kind of operation an event records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Source material ingested and chunked
    Ingest,
    /// Stage 1 fact extraction
    Normalize,
    /// Stage 2 question generation
    Clarify,
    /// Clarification answers submitted
    Answer,
    /// Stage 3 document generation
    Generate,
    /// Stage 4 quality review
    Review,
    /// Document fields updated
    Update,
    /// Document submitted for approval
    Submit,
    /// An approval role decided
    ApprovalDecision,
    /// A raw model call (telemetry only)
    LlmCall,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuditAction::Ingest => "ingest",
            AuditAction::Normalize => "normalize",
            AuditAction::Clarify => "clarify",
            AuditAction::Answer => "answer",
            AuditAction::Generate => "generate",
            AuditAction::Review => "review",
            AuditAction::Update => "update",
            AuditAction::Submit => "submit",
            AuditAction::ApprovalDecision => "approval_decision",
            AuditAction::LlmCall => "llm_call",
        };
        write!(f, "{}", s)
    }
}

/// Model-call telemetry attached to stage events.
///
/// Prompt and response payloads are never stored; only their hashes go
/// into the trail, enough to prove what was sent without retaining it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmTelemetry {
    /// Model identifier
    pub model: String,
    /// Prompt tokens
    pub input_tokens: u64,
    /// Completion tokens
    pub output_tokens: u64,
    /// Wall-clock latency
    pub latency_ms: u64,
    /// 16-hex-char SHA-256 prefix of the request payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_hash: Option<String>,
    /// 16-hex-char SHA-256 prefix of the response payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_hash: Option<String>,
}

/// One entry in the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event id (UUID v7, time-ordered)
    pub id: String,
    /// When the operation happened
    pub timestamp: DateTime<Utc>,
    /// What kind of operation
    pub action: AuditAction,
    /// Kind of resource acted on, e.g. `session` or `document`
    pub resource_type: String,
    /// Id of the resource acted on
    pub resource_id: String,
    /// Classification of the data involved
    pub data_classification: DataClassification,
    /// Operation-specific details
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub metadata: Value,
    /// Model-call telemetry, when the operation called a model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm: Option<LlmTelemetry>,
}

impl AuditEvent {
    /// Create an event for an operation on a resource.
    pub fn new(
        action: AuditAction,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        data_classification: DataClassification,
    ) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            timestamp: Utc::now(),
            action,
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            data_classification,
            metadata: Value::Null,
            llm: None,
        }
    }

    /// Attach operation-specific metadata.
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// Attach model-call telemetry.
    pub fn with_llm(mut self, llm: LlmTelemetry) -> Self {
        self.llm = Some(llm);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn action_serializes_snake_case() {
        let json = serde_json::to_string(&AuditAction::ApprovalDecision).unwrap();
        assert_eq!(json, "\"approval_decision\"");
    }

    #[test]
    fn builder_attaches_metadata_and_telemetry() {
        let event = AuditEvent::new(
            AuditAction::Generate,
            "document",
            "URS-2026-0001",
            DataClassification::Internal,
        )
        .with_metadata(json!({"functional_requirements": 3}))
        .with_llm(LlmTelemetry {
            model: "mock".to_string(),
            input_tokens: 100,
            output_tokens: 50,
            latency_ms: 12,
            request_hash: Some("1c1bfc46dd95b9b2".to_string()),
            response_hash: None,
        });
        assert_eq!(event.metadata["functional_requirements"], 3);
        assert_eq!(event.llm.as_ref().unwrap().model, "mock");
    }

    #[test]
    fn event_ids_are_time_ordered() {
        let first = AuditEvent::new(
            AuditAction::Ingest,
            "session",
            "s1",
            DataClassification::Internal,
        );
        let second = AuditEvent::new(
            AuditAction::Ingest,
            "session",
            "s2",
            DataClassification::Internal,
        );
        assert!(first.id < second.id);
    }
}

//! Clarifying questions and answers (Stage 2 types)

use serde::{Deserialize, Serialize};

/// Why a clarifying question is being asked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    /// Critical information not provided
    MissingInfo,
    /// Conflicting statements found in sources
    Contradiction,
    /// Multiple valid interpretations possible
    Ambiguity,
    /// Boundaries of the requirement not defined
    ScopeUnclear,
    /// Relative importance not stated
    PriorityUnclear,
    /// Success criteria not defined
    AcceptanceUnclear,
}

/// Question priority; weights feed the completeness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionPriority {
    /// Blocks requirement definition
    High,
    /// Important but assumptions can stand in
    Medium,
    /// Can proceed with reasonable defaults
    Low,
}

impl QuestionPriority {
    /// Weight subtracted from the completeness baseline per outstanding
    /// question of this priority.
    pub fn weight(&self) -> f64 {
        match self {
            QuestionPriority::High => 0.4,
            QuestionPriority::Medium => 0.1,
            QuestionPriority::Low => 0.05,
        }
    }
}

/// A clarifying question produced by Stage 2.
///
/// Questions are consumed by answer submission, which turns each
/// question/answer pair into a new synthetic [`crate::SourceChunk`] so the
/// answer re-enters the traceability graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClarifyingQuestion {
    /// Unique question id, e.g. `q-1f3a9c2e`
    pub question_id: String,

    /// The question to ask the stakeholder
    pub question: String,

    /// Why the question is being asked
    pub context: String,

    /// Chunks that prompted the question
    #[serde(default)]
    pub related_chunk_ids: Vec<String>,

    /// Question category
    pub category: QuestionCategory,

    /// Question priority
    pub priority: QuestionPriority,

    /// Optional multiple-choice options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_options: Option<Vec<String>>,
}

/// A stakeholder answer to a clarifying question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// Id of the question being answered
    pub question_id: String,
    /// The answer text
    pub answer: String,
    /// Optional extra nuance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_context: Option<String>,
}

impl Answer {
    /// Render this answer as chunk content, preserving the question for
    /// context: `Q: ...\nA: ...` plus an optional `Context:` line.
    pub fn to_chunk_content(&self, question: &str) -> String {
        let mut content = format!("Q: {}\nA: {}", question, self.answer);
        if let Some(extra) = &self.additional_context {
            content.push_str("\nContext: ");
            content.push_str(extra);
        }
        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_weights() {
        assert_eq!(QuestionPriority::High.weight(), 0.4);
        assert_eq!(QuestionPriority::Medium.weight(), 0.1);
        assert_eq!(QuestionPriority::Low.weight(), 0.05);
    }

    #[test]
    fn answer_chunk_content_includes_question() {
        let answer = Answer {
            question_id: "q-1".to_string(),
            answer: "Internal employees only".to_string(),
            additional_context: None,
        };
        let content = answer.to_chunk_content("Who are the primary users?");
        assert_eq!(content, "Q: Who are the primary users?\nA: Internal employees only");
    }

    #[test]
    fn answer_chunk_content_includes_context_line() {
        let answer = Answer {
            question_id: "q-1".to_string(),
            answer: "Q2".to_string(),
            additional_context: Some("Hard deadline from compliance".to_string()),
        };
        let content = answer.to_chunk_content("When is the deadline?");
        assert!(content.ends_with("\nContext: Hard deadline from compliance"));
    }

    #[test]
    fn category_wire_format() {
        assert_eq!(
            serde_json::to_string(&QuestionCategory::ScopeUnclear).unwrap(),
            "\"scope_unclear\""
        );
        let p: QuestionPriority = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(p, QuestionPriority::High);
    }
}

//! Answer submission
//!
//! Answers become new source chunks so that generated requirements can
//! cite them like any other input.

use crate::error::ClarifierError;
use chrono::Utc;
use tracing::debug;
use ursgen_chunker::content_hash;
use ursgen_domain::{Answer, ClarifyingQuestion, Session, SourceChunk, SourceType};

/// Result of submitting a batch of answers.
#[derive(Debug)]
pub struct AnswerOutcome {
    /// Chunks created from the answers, to be stored by the caller
    pub new_chunks: Vec<SourceChunk>,
    /// Answers accepted in this batch (duplicates excluded)
    pub answers_submitted: usize,
    /// Questions still waiting for an answer
    pub remaining_questions: usize,
    /// True when every question has been answered
    pub ready_to_generate: bool,
}

/// Fold answers into the session.
///
/// Each new answer produces a Q/A chunk continuing the session's chunk id
/// sequence. Re-answering an already answered question is a no-op, so
/// resubmitting the same batch is safe.
pub fn submit_answers(
    session: &mut Session,
    questions: &[ClarifyingQuestion],
    answers: &[Answer],
) -> Result<AnswerOutcome, ClarifierError> {
    let mut new_chunks = Vec::new();
    let mut submitted = 0usize;

    for answer in answers {
        let question = questions
            .iter()
            .find(|q| q.question_id == answer.question_id)
            .ok_or_else(|| ClarifierError::UnknownQuestion(answer.question_id.clone()))?;

        if session
            .answered_question_ids
            .contains(&answer.question_id)
        {
            debug!(question_id = %answer.question_id, "question already answered, skipping");
            continue;
        }

        let content = answer.to_chunk_content(&question.question);
        let index = session.chunk_ids.len() + new_chunks.len();
        let chunk_id = ursgen_domain::ids::format_chunk_id(&session.source_id, index);
        new_chunks.push(SourceChunk {
            chunk_id,
            source_id: session.source_id.clone(),
            source_type: SourceType::UserInput,
            source_name: "Clarification answers".to_string(),
            content_hash: content_hash(&content),
            content,
            page_number: None,
            start_offset: None,
            end_offset: None,
            data_classification: session.data_classification,
            created_at: Utc::now(),
        });
        session
            .answered_question_ids
            .push(answer.question_id.clone());
        submitted += 1;
    }

    for chunk in &new_chunks {
        session.chunk_ids.push(chunk.chunk_id.clone());
    }

    let remaining = session.remaining_question_count();
    Ok(AnswerOutcome {
        new_chunks,
        answers_submitted: submitted,
        remaining_questions: remaining,
        ready_to_generate: remaining == 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ursgen_domain::{
        DataClassification, Person, QuestionCategory, QuestionPriority,
    };

    fn question(id: &str, text: &str) -> ClarifyingQuestion {
        ClarifyingQuestion {
            question_id: id.to_string(),
            question: text.to_string(),
            context: String::new(),
            related_chunk_ids: vec![],
            category: QuestionCategory::MissingInfo,
            priority: QuestionPriority::Medium,
            suggested_options: None,
        }
    }

    fn session_with_questions(ids: &[&str]) -> Session {
        let mut session = Session::new(
            "URS-2026-0001".to_string(),
            "src-1".to_string(),
            "Test".to_string(),
            Person::new("Dana", "dana@example.com"),
            "Finance".to_string(),
            DataClassification::Internal,
        );
        session.chunk_ids = vec!["src-1-chunk-0000".to_string()];
        session.question_ids = ids.iter().map(|s| s.to_string()).collect();
        session
    }

    #[test]
    fn answers_become_chunks_with_sequential_ids() {
        let mut session = session_with_questions(&["q-001", "q-002"]);
        let questions = vec![
            question("q-001", "Who are the users?"),
            question("q-002", "What is the deadline?"),
        ];
        let answers = vec![
            Answer {
                question_id: "q-001".to_string(),
                answer: "Finance clerks.".to_string(),
                additional_context: None,
            },
            Answer {
                question_id: "q-002".to_string(),
                answer: "End of Q3.".to_string(),
                additional_context: Some("Fiscal calendar.".to_string()),
            },
        ];

        let outcome = submit_answers(&mut session, &questions, &answers).unwrap();
        assert_eq!(outcome.answers_submitted, 2);
        assert_eq!(outcome.remaining_questions, 0);
        assert!(outcome.ready_to_generate);
        assert_eq!(outcome.new_chunks[0].chunk_id, "src-1-chunk-0001");
        assert_eq!(outcome.new_chunks[1].chunk_id, "src-1-chunk-0002");
        assert!(outcome.new_chunks[0]
            .content
            .starts_with("Q: Who are the users?\nA: Finance clerks."));
        assert!(outcome.new_chunks[1].content.contains("Context: Fiscal calendar."));
        assert_eq!(session.chunk_ids.len(), 3);
    }

    #[test]
    fn resubmission_is_idempotent() {
        let mut session = session_with_questions(&["q-001"]);
        let questions = vec![question("q-001", "Who?")];
        let answers = vec![Answer {
            question_id: "q-001".to_string(),
            answer: "Clerks.".to_string(),
            additional_context: None,
        }];

        let first = submit_answers(&mut session, &questions, &answers).unwrap();
        assert_eq!(first.answers_submitted, 1);

        let second = submit_answers(&mut session, &questions, &answers).unwrap();
        assert_eq!(second.answers_submitted, 0);
        assert!(second.new_chunks.is_empty());
        assert_eq!(second.remaining_questions, 0);
        assert_eq!(session.chunk_ids.len(), 2);
    }

    #[test]
    fn unknown_question_is_rejected() {
        let mut session = session_with_questions(&["q-001"]);
        let questions = vec![question("q-001", "Who?")];
        let answers = vec![Answer {
            question_id: "q-999".to_string(),
            answer: "x".to_string(),
            additional_context: None,
        }];
        let err = submit_answers(&mut session, &questions, &answers).unwrap_err();
        assert!(matches!(err, ClarifierError::UnknownQuestion(_)));
    }

    #[test]
    fn partial_answers_leave_questions_open() {
        let mut session = session_with_questions(&["q-001", "q-002"]);
        let questions = vec![question("q-001", "Who?"), question("q-002", "When?")];
        let answers = vec![Answer {
            question_id: "q-001".to_string(),
            answer: "Clerks.".to_string(),
            additional_context: None,
        }];
        let outcome = submit_answers(&mut session, &questions, &answers).unwrap();
        assert_eq!(outcome.remaining_questions, 1);
        assert!(!outcome.ready_to_generate);
    }
}

//! Deterministic, rule-based question generation
//!
//! Used when no completion service is configured and as the fallback when
//! model output is unusable. Scans the aggregated chunk text for absent or
//! risky topics and synthesizes one targeted question each.

use ursgen_domain::{ClarifyingQuestion, QuestionCategory, QuestionPriority, SourceChunk};

/// Generate questions from keyword heuristics over the chunk text.
pub fn rule_based_questions(chunks: &[SourceChunk]) -> Vec<ClarifyingQuestion> {
    let text = chunks
        .iter()
        .map(|c| c.content.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    let all_chunk_ids: Vec<String> = chunks.iter().map(|c| c.chunk_id.clone()).collect();

    let mut questions: Vec<ClarifyingQuestion> = Vec::new();

    if !text.contains("user") && !text.contains("persona") {
        questions.push(ClarifyingQuestion {
            question_id: format!("q-{:03}", questions.len() + 1),
            question: "Who are the primary users of this system?".to_string(),
            context: "The input does not identify who will use the system.".to_string(),
            related_chunk_ids: all_chunk_ids.clone(),
            category: QuestionCategory::MissingInfo,
            priority: QuestionPriority::High,
            suggested_options: Some(vec![
                "Internal staff".to_string(),
                "External customers".to_string(),
                "Both internal and external users".to_string(),
            ]),
        });
    }

    if !text.contains("deadline") && !text.contains("timeline") && !text.contains("date") {
        questions.push(ClarifyingQuestion {
            question_id: format!("q-{:03}", questions.len() + 1),
            question: "Is there a target date or deadline for this work?".to_string(),
            context: "No timeline information was found in the input.".to_string(),
            related_chunk_ids: all_chunk_ids.clone(),
            category: QuestionCategory::MissingInfo,
            priority: QuestionPriority::Medium,
            suggested_options: None,
        });
    }

    if !text.contains("budget") && !text.contains("cost") {
        questions.push(ClarifyingQuestion {
            question_id: format!("q-{:03}", questions.len() + 1),
            question: "Are there budget or cost constraints to respect?".to_string(),
            context: "No budget information was found in the input.".to_string(),
            related_chunk_ids: all_chunk_ids.clone(),
            category: QuestionCategory::MissingInfo,
            priority: QuestionPriority::Low,
            suggested_options: None,
        });
    }

    // Exclusion words suggest a scope boundary worth confirming.
    if text.contains(" not ") || text.contains("except") || text.contains("exclude") {
        questions.push(ClarifyingQuestion {
            question_id: format!("q-{:03}", questions.len() + 1),
            question: "The input mentions exclusions. Can you confirm exactly what is out of scope?"
                .to_string(),
            context: "Exclusion language was found; the scope boundary may be ambiguous."
                .to_string(),
            related_chunk_ids: all_chunk_ids,
            category: QuestionCategory::ScopeUnclear,
            priority: QuestionPriority::High,
            suggested_options: None,
        });
    }

    questions
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ursgen_domain::{DataClassification, SourceType};

    fn chunk(content: &str) -> SourceChunk {
        SourceChunk {
            chunk_id: "s-chunk-0000".to_string(),
            source_id: "s".to_string(),
            source_type: SourceType::UserInput,
            source_name: "notes".to_string(),
            content: content.to_string(),
            content_hash: "0".repeat(16),
            page_number: None,
            start_offset: None,
            end_offset: None,
            data_classification: DataClassification::Internal,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn sparse_input_raises_all_gap_questions() {
        let questions = rule_based_questions(&[chunk("The invoices pile up.")]);
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0].priority, QuestionPriority::High);
        assert!(questions[0].suggested_options.is_some());
        assert_eq!(questions[1].priority, QuestionPriority::Medium);
        assert_eq!(questions[2].priority, QuestionPriority::Low);
    }

    #[test]
    fn covered_topics_raise_no_questions() {
        let content =
            "Finance users need this by a fixed date. The budget is approved. Deadline is firm.";
        let questions = rule_based_questions(&[chunk(content)]);
        assert!(questions.is_empty());
    }

    #[test]
    fn exclusion_words_trigger_scope_question() {
        let questions =
            rule_based_questions(&[chunk("Users need reports, except archived ones. Budget set. Date set.")]);
        let scope: Vec<_> = questions
            .iter()
            .filter(|q| q.category == QuestionCategory::ScopeUnclear)
            .collect();
        assert_eq!(scope.len(), 1);
        assert_eq!(scope[0].priority, QuestionPriority::High);
    }

    #[test]
    fn question_ids_are_sequential() {
        let questions = rule_based_questions(&[chunk("Nothing specific here.")]);
        let ids: Vec<_> = questions.iter().map(|q| q.question_id.as_str()).collect();
        assert_eq!(ids, vec!["q-001", "q-002", "q-003"]);
    }
}

//! Permissive parsing of question-generation output

use serde_json::Value;
use tracing::warn;
use ursgen_domain::{ClarifyingQuestion, QuestionCategory, QuestionPriority};

/// Parse model output into questions.
///
/// Unknown categories default to `missing_info` and unknown priorities to
/// `medium`; a question without text is dropped with a warning.
pub fn parse_questions_response(value: &Value) -> Vec<ClarifyingQuestion> {
    let Some(items) = value.get("questions").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut questions = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        let Some(obj) = item.as_object() else {
            warn!(index = idx, "dropping non-object question");
            continue;
        };
        let Some(question) = obj.get("question").and_then(Value::as_str) else {
            warn!(index = idx, "dropping question without text");
            continue;
        };

        let category = obj
            .get("category")
            .cloned()
            .and_then(|v| serde_json::from_value::<QuestionCategory>(v).ok())
            .unwrap_or(QuestionCategory::MissingInfo);
        let priority = obj
            .get("priority")
            .cloned()
            .and_then(|v| serde_json::from_value::<QuestionPriority>(v).ok())
            .unwrap_or(QuestionPriority::Medium);

        questions.push(ClarifyingQuestion {
            question_id: obj
                .get("question_id")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("q-{:03}", idx + 1)),
            question: question.to_string(),
            context: obj
                .get("context")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            related_chunk_ids: string_list(obj.get("related_chunk_ids")),
            category,
            priority,
            suggested_options: obj.get("suggested_options").and_then(Value::as_array).map(
                |items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                },
            ),
        });
    }
    questions
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_full_question() {
        let value = json!({
            "questions": [{
                "question_id": "q-007",
                "question": "Which ERP system is in use?",
                "context": "Integration target unclear.",
                "related_chunk_ids": ["s-chunk-0001"],
                "category": "ambiguity",
                "priority": "high",
                "suggested_options": ["SAP", "Oracle"]
            }]
        });
        let questions = parse_questions_response(&value);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question_id, "q-007");
        assert_eq!(questions[0].category, QuestionCategory::Ambiguity);
        assert_eq!(questions[0].priority, QuestionPriority::High);
        assert_eq!(
            questions[0].suggested_options,
            Some(vec!["SAP".to_string(), "Oracle".to_string()])
        );
    }

    #[test]
    fn unknown_category_and_priority_default() {
        let value = json!({
            "questions": [{
                "question": "What now?",
                "category": "existential",
                "priority": "cosmic"
            }]
        });
        let questions = parse_questions_response(&value);
        assert_eq!(questions[0].category, QuestionCategory::MissingInfo);
        assert_eq!(questions[0].priority, QuestionPriority::Medium);
        // Missing id is assigned positionally.
        assert_eq!(questions[0].question_id, "q-001");
    }

    #[test]
    fn question_without_text_is_dropped() {
        let value = json!({
            "questions": [
                { "context": "no question field" },
                { "question": "A real question?" }
            ]
        });
        let questions = parse_questions_response(&value);
        assert_eq!(questions.len(), 1);
    }

    #[test]
    fn missing_questions_key_is_empty() {
        assert!(parse_questions_response(&json!({})).is_empty());
    }
}

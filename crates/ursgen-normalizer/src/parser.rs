//! Permissive parsing of extraction output

use serde_json::Value;
use tracing::warn;
use ursgen_domain::{Confidence, EntitySet, Fact, FactType, Gap, GapType, NormalizedFacts};

/// Parse extraction output into [`NormalizedFacts`].
///
/// Individually broken facts are skipped with a warning. The caller is
/// responsible for handing in top-level JSON; anything else fails closed
/// upstream.
pub fn parse_facts_response(value: &Value) -> NormalizedFacts {
    let mut result = NormalizedFacts::default();

    if let Some(items) = value.get("facts").and_then(Value::as_array) {
        for (idx, item) in items.iter().enumerate() {
            match parse_fact(item, idx) {
                Ok(fact) => match fact.validate() {
                    Ok(()) => result.facts.push(fact),
                    Err(e) => warn!(index = idx, error = %e, "dropping fact failing citation rules"),
                },
                Err(e) => warn!(index = idx, error = %e, "dropping unparsable fact"),
            }
        }
    }

    if let Some(entities) = value.get("entities") {
        result.entities = EntitySet {
            people: string_list(entities.get("people")),
            systems: string_list(entities.get("systems")),
            departments: string_list(entities.get("departments")),
            processes: string_list(entities.get("processes")),
        };
    }

    if let Some(items) = value.get("gaps_identified").and_then(Value::as_array) {
        for (idx, item) in items.iter().enumerate() {
            match parse_gap(item) {
                Ok(gap) => result.gaps_identified.push(gap),
                Err(e) => warn!(index = idx, error = %e, "dropping unparsable gap"),
            }
        }
    }

    if let Some(summary) = value.get("summary").and_then(Value::as_str) {
        result.summary = summary.to_string();
    }

    result
}

fn parse_fact(item: &Value, idx: usize) -> Result<Fact, String> {
    let obj = item.as_object().ok_or("fact is not an object")?;

    let fact_type: FactType = obj
        .get("fact_type")
        .cloned()
        .ok_or("missing fact_type")
        .and_then(|v| serde_json::from_value(v).map_err(|_| "unknown fact_type"))?;

    let content = obj
        .get("content")
        .and_then(Value::as_str)
        .ok_or("missing content")?
        .to_string();

    // Absent confidence defaults to explicit; the citation invariant then
    // rejects uncited facts.
    let confidence: Confidence = match obj.get("confidence") {
        Some(v) => serde_json::from_value(v.clone()).map_err(|_| "unknown confidence")?,
        None => Confidence::Explicit,
    };

    Ok(Fact {
        fact_id: obj
            .get("fact_id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("fact-{:03}", idx + 1)),
        fact_type,
        content,
        source_chunk_ids: string_list(obj.get("source_chunk_ids")),
        confidence,
        inference_reason: obj
            .get("inference_reason")
            .and_then(Value::as_str)
            .map(str::to_string),
        entities_mentioned: string_list(obj.get("entities_mentioned")),
    })
}

fn parse_gap(item: &Value) -> Result<Gap, String> {
    let obj = item.as_object().ok_or("gap is not an object")?;
    let gap_type: GapType = obj
        .get("gap_type")
        .cloned()
        .ok_or("missing gap_type")
        .and_then(|v| serde_json::from_value(v).map_err(|_| "unknown gap_type"))?;
    let description = obj
        .get("description")
        .and_then(Value::as_str)
        .ok_or("missing description")?
        .to_string();
    Ok(Gap {
        gap_type,
        description,
        related_chunk_ids: string_list(obj.get("related_chunk_ids")),
    })
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
    fn parses_well_formed_output() {
        let value = json!({
            "facts": [{
                "fact_id": "fact-001",
                "fact_type": "pain_point",
                "content": "Invoices are retyped by hand.",
                "source_chunk_ids": ["s-chunk-0000"],
                "confidence": "explicit",
                "entities_mentioned": ["AP team"]
            }],
            "entities": { "people": [], "systems": ["SAP"], "departments": ["Finance"], "processes": [] },
            "gaps_identified": [{
                "gap_type": "missing_info",
                "description": "No volume figures.",
                "related_chunk_ids": []
            }],
            "summary": "Manual invoice entry causes errors."
        });
        let facts = parse_facts_response(&value);
        assert_eq!(facts.facts.len(), 1);
        assert_eq!(facts.facts[0].fact_type, FactType::PainPoint);
        assert_eq!(facts.entities.systems, vec!["SAP"]);
        assert_eq!(facts.gaps_identified.len(), 1);
        assert_eq!(facts.summary, "Manual invoice entry causes errors.");
    }

    #[test]
    fn unknown_fact_type_is_skipped() {
        let value = json!({
            "facts": [
                { "fact_type": "vibe", "content": "x", "source_chunk_ids": ["c"] },
                { "fact_type": "goal", "content": "Reduce errors.", "source_chunk_ids": ["c"] }
            ]
        });
        let facts = parse_facts_response(&value);
        assert_eq!(facts.facts.len(), 1);
        assert_eq!(facts.facts[0].fact_type, FactType::Goal);
    }

    #[test]
    fn uncited_explicit_fact_is_dropped() {
        let value = json!({
            "facts": [
                { "fact_type": "requirement", "content": "Must be fast.", "source_chunk_ids": [] }
            ]
        });
        let facts = parse_facts_response(&value);
        assert!(facts.facts.is_empty());
    }

    #[test]
    fn inferred_fact_needs_a_reason() {
        let value = json!({
            "facts": [
                { "fact_type": "assumption", "content": "Users are internal.", "confidence": "inferred" },
                { "fact_type": "assumption", "content": "Volume will grow.", "confidence": "inferred",
                  "inference_reason": "Growth mentioned across chunks." }
            ]
        });
        let facts = parse_facts_response(&value);
        assert_eq!(facts.facts.len(), 1);
        assert_eq!(facts.facts[0].content, "Volume will grow.");
    }

    #[test]
    fn missing_fact_id_is_assigned() {
        let value = json!({
            "facts": [
                { "fact_type": "context", "content": "Runs on-prem.", "source_chunk_ids": ["c"] }
            ]
        });
        let facts = parse_facts_response(&value);
        assert_eq!(facts.facts[0].fact_id, "fact-001");
    }

    #[test]
    fn empty_object_parses_to_empty_facts() {
        let facts = parse_facts_response(&json!({}));
        assert!(facts.facts.is_empty());
        assert!(facts.summary.is_empty());
    }
}

//! Prompt construction for fact extraction

use ursgen_domain::SourceChunk;

/// System prompt for the extraction stage.
pub const SYSTEM_PROMPT: &str = r#"You are a requirements analyst extracting facts from stakeholder input.

Extract discrete facts from the provided source chunks. Each fact must be one of:
requirement, constraint, context, pain_point, goal, stakeholder, process, assumption.

Rules:
- Never invent information. Every explicit fact must cite the chunk ids it came from.
- Mark a fact as "inferred" only when it follows clearly from the text, and say why in inference_reason.
- Record every person, system, department, and process mentioned.
- Record gaps: missing information, ambiguous statements, contradictions between chunks.

Respond with a single JSON object:
{
  "facts": [
    {
      "fact_id": "fact-001",
      "fact_type": "pain_point",
      "content": "...",
      "source_chunk_ids": ["..."],
      "confidence": "explicit" or "inferred",
      "inference_reason": "... (inferred facts only)",
      "entities_mentioned": ["..."]
    }
  ],
  "entities": {
    "people": [], "systems": [], "departments": [], "processes": []
  },
  "gaps_identified": [
    { "gap_type": "missing_info" | "ambiguous" | "contradictory", "description": "...", "related_chunk_ids": [] }
  ],
  "summary": "one-paragraph synthesis of the input"
}"#;

/// Build the user prompt listing each chunk with its provenance.
pub fn build_user_prompt(chunks: &[SourceChunk]) -> String {
    let mut prompt = String::from("Source chunks to analyze:\n\n");
    for chunk in chunks {
        prompt.push_str(&format!(
            "CHUNK ID: {}\nSOURCE: {} ({})\nCONTENT:\n{}\n\n---\n\n",
            chunk.chunk_id, chunk.source_name, chunk.source_type, chunk.content
        ));
    }
    prompt.push_str("Extract the facts as specified.");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ursgen_domain::{DataClassification, SourceType};

    #[test]
    fn user_prompt_lists_every_chunk() {
        let chunk = SourceChunk {
            chunk_id: "s-chunk-0000".to_string(),
            source_id: "s".to_string(),
            source_type: SourceType::MeetingNotes,
            source_name: "kickoff".to_string(),
            content: "We lose invoices weekly.".to_string(),
            content_hash: "0".repeat(16),
            page_number: None,
            start_offset: None,
            end_offset: None,
            data_classification: DataClassification::Internal,
            created_at: Utc::now(),
        };
        let prompt = build_user_prompt(&[chunk]);
        assert!(prompt.contains("CHUNK ID: s-chunk-0000"));
        assert!(prompt.contains("kickoff (meeting_notes)"));
        assert!(prompt.contains("We lose invoices weekly."));
    }
}

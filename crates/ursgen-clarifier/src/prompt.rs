//! Prompt construction for question generation

use ursgen_chunker::merge_chunks;
use ursgen_domain::{NormalizedFacts, SourceChunk};

/// System prompt for the clarification stage.
pub const SYSTEM_PROMPT: &str = r#"You are a requirements analyst reviewing extracted facts for gaps.

Generate clarifying questions a business analyst would ask before writing a
requirements document. Focus on missing information, contradictions between
sources, ambiguous statements, unclear scope boundaries, unclear priorities,
and missing acceptance conditions.

Respond with a single JSON object:
{
  "questions": [
    {
      "question_id": "q-001",
      "question": "...",
      "context": "why this question matters",
      "related_chunk_ids": ["..."],
      "category": "missing_info" | "contradiction" | "ambiguity" | "scope_unclear" | "priority_unclear" | "acceptance_unclear",
      "priority": "high" | "medium" | "low",
      "suggested_options": ["..."] (optional)
    }
  ]
}

Ask only questions the input cannot answer. Fewer, sharper questions beat many
generic ones."#;

/// Build the user prompt from facts, entities, gaps, and raw chunks.
pub fn build_user_prompt(chunks: &[SourceChunk], facts: &NormalizedFacts) -> String {
    let mut prompt = String::new();

    if !facts.summary.is_empty() {
        prompt.push_str(&format!("Input summary: {}\n\n", facts.summary));
    }

    if !facts.facts.is_empty() {
        prompt.push_str("Extracted facts:\n");
        for fact in &facts.facts {
            prompt.push_str(&format!("- [{}] {}\n", fact.fact_type, fact.content));
        }
        prompt.push('\n');
    }

    let entities = &facts.entities;
    if !entities.people.is_empty()
        || !entities.systems.is_empty()
        || !entities.departments.is_empty()
    {
        prompt.push_str(&format!(
            "Known entities: people {:?}, systems {:?}, departments {:?}\n\n",
            entities.people, entities.systems, entities.departments
        ));
    }

    if !facts.gaps_identified.is_empty() {
        prompt.push_str("Gaps already identified during extraction:\n");
        for gap in &facts.gaps_identified {
            prompt.push_str(&format!("- {}\n", gap.description));
        }
        prompt.push('\n');
    }

    prompt.push_str("Source chunks:\n\n");
    prompt.push_str(&merge_chunks(chunks));
    prompt.push_str("\n\nGenerate the clarifying questions as specified.");
    prompt
}

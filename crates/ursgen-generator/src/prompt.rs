//! Prompt construction for document synthesis

use ursgen_domain::{NormalizedFacts, SourceChunk};

/// System prompt for the generation stage.
pub const SYSTEM_PROMPT: &str = r#"You are a senior business analyst writing a User Requirements Specification.

Synthesize the facts and source material into a complete document. Write
functional requirement descriptions as "The system shall ..." statements and
give every requirement testable acceptance criteria.

Respond with a single JSON object:
{
  "executive_summary": { "summary": "...", "business_value": "..." },
  "problem_statement": {
    "current_state": "...",
    "pain_points": [ { "description": "...", "impact": "...", "frequency": "..." } ],
    "desired_state": "..."
  },
  "users_and_personas": [
    { "name": "...", "role": "...", "goals": [ "..." ], "pain_points": [ "..." ] }
  ],
  "scope": {
    "in_scope": [ { "item": "...", "rationale": "..." } ],
    "out_of_scope": [ { "item": "...", "rationale": "..." } ],
    "assumptions": [ { "assumption": "...", "risk_if_wrong": "..." } ],
    "constraints": [ "..." ]
  },
  "functional_requirements": [
    {
      "description": "The system shall ...",
      "priority": "must" | "should" | "could",
      "rationale": "...",
      "acceptance_criteria": [ "..." or { "criterion": "...", "test_method": "manual|automated|review|demo" } ],
      "confidence": "high" | "medium" | "low"
    }
  ],
  "non_functional_requirements": [
    {
      "description": "...",
      "category": "performance" | "scalability" | "availability" | "security" | "usability" | "accessibility" | "maintainability" | "compliance" | "interoperability",
      "priority": "must" | "should" | "could",
      "target_metric": "...",
      "measurement_method": "..."
    }
  ],
  "success_metrics": [
    { "name": "...", "baseline": "...", "target": "...", "measurement_method": "..." }
  ]
}

Base every statement on the provided material. Do not invent capabilities
nobody asked for."#;

/// Build the user prompt from facts and chunk content.
pub fn build_user_prompt(
    title: &str,
    department: &str,
    chunks: &[SourceChunk],
    facts: &NormalizedFacts,
) -> String {
    let mut prompt = format!(
        "Project title: {}\nRequesting department: {}\n\n",
        title, department
    );

    if !facts.summary.is_empty() {
        prompt.push_str(&format!("Input summary: {}\n\n", facts.summary));
    }
    if !facts.facts.is_empty() {
        prompt.push_str("Extracted facts:\n");
        for fact in &facts.facts {
            prompt.push_str(&format!(
                "- [{}] {} (sources: {})\n",
                fact.fact_type,
                fact.content,
                fact.source_chunk_ids.join(", ")
            ));
        }
        prompt.push('\n');
    }

    prompt.push_str("Source chunks:\n\n");
    for chunk in chunks {
        prompt.push_str(&format!("[{}] {}\n\n", chunk.chunk_id, chunk.content));
    }
    prompt.push_str("Write the User Requirements Specification as specified.");
    prompt
}

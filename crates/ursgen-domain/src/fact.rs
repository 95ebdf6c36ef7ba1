//! Facts - typed, source-cited statements extracted from chunks (Stage 1 output)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of an extracted fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactType {
    /// Something the system must do or have
    Requirement,
    /// A limitation or restriction on the solution
    Constraint,
    /// Background information about the current state
    Context,
    /// A problem or frustration with the current state
    PainPoint,
    /// A desired outcome or objective
    Goal,
    /// Information about users or affected parties
    Stakeholder,
    /// Description of a workflow or procedure
    Process,
    /// Something implied but not explicitly stated
    Assumption,
}

impl fmt::Display for FactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FactType::Requirement => "requirement",
            FactType::Constraint => "constraint",
            FactType::Context => "context",
            FactType::PainPoint => "pain_point",
            FactType::Goal => "goal",
            FactType::Stakeholder => "stakeholder",
            FactType::Process => "process",
            FactType::Assumption => "assumption",
        };
        write!(f, "{}", s)
    }
}

/// Whether a fact was explicitly stated or inferred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Explicitly stated in the sources
    Explicit,
    /// Inferred; requires an inference reason
    Inferred,
}

/// A single extracted fact with source citations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    /// Unique id within a normalization run, e.g. `FACT-001`
    pub fact_id: String,

    /// Fact category
    pub fact_type: FactType,

    /// The extracted statement
    pub content: String,

    /// Chunk ids this fact was found in
    #[serde(default)]
    pub source_chunk_ids: Vec<String>,

    /// Explicit or inferred
    pub confidence: Confidence,

    /// Required when `confidence` is `Inferred`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inference_reason: Option<String>,

    /// Entities (people, systems, departments) referenced by the fact
    #[serde(default)]
    pub entities_mentioned: Vec<String>,
}

impl Fact {
    /// Check the citation invariant.
    ///
    /// An explicit fact must cite at least one source chunk; an inferred
    /// fact must explain the inference. Facts violating either rule are
    /// dropped by the normalizer rather than stored.
    pub fn validate(&self) -> Result<(), String> {
        if self.content.trim().is_empty() {
            return Err("fact content is empty".to_string());
        }
        match self.confidence {
            Confidence::Explicit if self.source_chunk_ids.is_empty() => {
                Err("explicit fact has no source_chunk_ids".to_string())
            }
            Confidence::Inferred
                if self
                    .inference_reason
                    .as_deref()
                    .map_or(true, |r| r.trim().is_empty()) =>
            {
                Err("inferred fact has no inference_reason".to_string())
            }
            _ => Ok(()),
        }
    }
}

/// Entities extracted alongside facts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySet {
    /// People and roles mentioned
    #[serde(default)]
    pub people: Vec<String>,
    /// Systems and tools mentioned
    #[serde(default)]
    pub systems: Vec<String>,
    /// Departments and teams mentioned
    #[serde(default)]
    pub departments: Vec<String>,
    /// Business processes mentioned
    #[serde(default)]
    pub processes: Vec<String>,
}

/// Kind of information gap identified during normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapType {
    /// Critical information not provided
    MissingInfo,
    /// Multiple interpretations possible
    Ambiguous,
    /// Conflicting statements across sources
    Contradictory,
}

/// An identified gap, fed into the clarifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    /// Gap category
    pub gap_type: GapType,
    /// What is missing, ambiguous, or contradictory
    pub description: String,
    /// Chunks where the gap was noticed
    #[serde(default)]
    pub related_chunk_ids: Vec<String>,
}

/// Complete Stage 1 output: facts plus entities, gaps, and a summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFacts {
    /// Extracted facts
    #[serde(default)]
    pub facts: Vec<Fact>,
    /// Entities mentioned across all chunks
    #[serde(default)]
    pub entities: EntitySet,
    /// Gaps identified during extraction
    #[serde(default)]
    pub gaps_identified: Vec<Gap>,
    /// Short summary of the overall request
    #[serde(default)]
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact(confidence: Confidence, ids: Vec<&str>, reason: Option<&str>) -> Fact {
        Fact {
            fact_id: "FACT-001".to_string(),
            fact_type: FactType::PainPoint,
            content: "Finance team spends 3 hours daily on manual invoice entry".to_string(),
            source_chunk_ids: ids.into_iter().map(String::from).collect(),
            confidence,
            inference_reason: reason.map(String::from),
            entities_mentioned: vec!["finance team".to_string()],
        }
    }

    #[test]
    fn explicit_fact_requires_sources() {
        assert!(fact(Confidence::Explicit, vec!["c-1"], None).validate().is_ok());
        assert!(fact(Confidence::Explicit, vec![], None).validate().is_err());
    }

    #[test]
    fn inferred_fact_requires_reason() {
        assert!(fact(Confidence::Inferred, vec![], Some("implied by workflow description"))
            .validate()
            .is_ok());
        assert!(fact(Confidence::Inferred, vec![], None).validate().is_err());
        assert!(fact(Confidence::Inferred, vec![], Some("  ")).validate().is_err());
    }

    #[test]
    fn empty_content_rejected() {
        let mut f = fact(Confidence::Explicit, vec!["c-1"], None);
        f.content = "   ".to_string();
        assert!(f.validate().is_err());
    }

    #[test]
    fn fact_type_wire_format() {
        assert_eq!(serde_json::to_string(&FactType::PainPoint).unwrap(), "\"pain_point\"");
        let t: FactType = serde_json::from_str("\"goal\"").unwrap();
        assert_eq!(t, FactType::Goal);
    }

    #[test]
    fn normalized_facts_tolerates_missing_fields() {
        // Completion services omit empty sections; all are defaulted.
        let parsed: NormalizedFacts = serde_json::from_str("{\"summary\": \"ok\"}").unwrap();
        assert!(parsed.facts.is_empty());
        assert_eq!(parsed.summary, "ok");
    }
}

//! QA report types

use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious an issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Blocks approval
    Critical,
    /// Should be fixed before approval
    Warning,
    /// Worth considering
    Suggestion,
}

impl Severity {
    /// Score penalty applied per issue of this severity.
    pub fn penalty(&self) -> f64 {
        match self {
            Severity::Critical => 15.0,
            Severity::Warning => 5.0,
            Severity::Suggestion => 1.0,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::Warning => write!(f, "warning"),
            Severity::Suggestion => write!(f, "suggestion"),
        }
    }
}

/// What kind of problem an issue describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    /// Requirement has no acceptance criteria
    MissingAcceptanceCriteria,
    /// Subjective wording without a concrete referent
    VagueLanguage,
    /// Criterion cannot be verified as written
    Untestable,
    /// Statement rests on an unvalidated assumption
    Assumption,
    /// Statements conflict with each other
    Contradiction,
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IssueCategory::MissingAcceptanceCriteria => "missing_acceptance_criteria",
            IssueCategory::VagueLanguage => "vague_language",
            IssueCategory::Untestable => "untestable",
            IssueCategory::Assumption => "assumption",
            IssueCategory::Contradiction => "contradiction",
        };
        write!(f, "{}", s)
    }
}

/// One finding from the review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaIssue {
    /// Issue severity
    pub severity: Severity,
    /// Issue category, drives score routing
    pub category: IssueCategory,
    /// Where in the document, e.g. `FR-003` or `scope.assumptions[1]`
    pub location: String,
    /// What is wrong
    pub description: String,
    /// How to fix it, when a fix is obvious
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Per-dimension quality scores, each in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaScores {
    /// Are all sections filled in
    pub completeness: f64,
    /// Is the wording precise
    pub clarity: f64,
    /// Can the requirements be verified
    pub testability: f64,
    /// Do statements trace back to sources
    pub traceability: f64,
    /// Weighted overall score
    pub overall: f64,
}

/// The full review result for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaReport {
    /// All findings, in document order
    pub issues: Vec<QaIssue>,
    /// Dimension scores
    pub scores: QaScores,
    /// True when nothing blocks approval
    pub ready_for_approval: bool,
    /// Number of critical issues
    pub blocking_issues_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_penalties() {
        assert_eq!(Severity::Critical.penalty(), 15.0);
        assert_eq!(Severity::Warning.penalty(), 5.0);
        assert_eq!(Severity::Suggestion.penalty(), 1.0);
    }

    #[test]
    fn category_serializes_snake_case() {
        let json = serde_json::to_string(&IssueCategory::MissingAcceptanceCriteria).unwrap();
        assert_eq!(json, "\"missing_acceptance_criteria\"");
        assert_eq!(IssueCategory::VagueLanguage.to_string(), "vague_language");
    }
}

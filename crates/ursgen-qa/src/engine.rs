//! The review engine

use crate::checks::{find_vague_term, is_measurable};
use crate::config::QaConfig;
use crate::report::{IssueCategory, QaIssue, QaReport, Severity};
use crate::scoring::score_issues;
use tracing::info;
use ursgen_domain::{ConfidenceLevel, FunctionalRequirement, Urs};

/// Stage 4: deterministic quality review of a generated document.
///
/// Every check is independent; a requirement can accumulate several
/// findings. Review never mutates the document.
pub struct QaEngine {
    config: QaConfig,
}

impl Default for QaEngine {
    fn default() -> Self {
        Self::new(QaConfig::default())
    }
}

impl QaEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: QaConfig) -> Self {
        Self { config }
    }

    /// Review a document and produce a report.
    pub fn review(&self, urs: &Urs) -> QaReport {
        let mut issues = Vec::new();

        for requirement in &urs.functional_requirements {
            self.review_requirement(requirement, &mut issues);
        }

        if self.config.check_vague_language {
            if let Some(term) = find_vague_term(&urs.executive_summary.summary) {
                issues.push(QaIssue {
                    severity: Severity::Suggestion,
                    category: IssueCategory::VagueLanguage,
                    location: "executive_summary".to_string(),
                    description: format!("Executive summary uses the vague term \"{}\"", term),
                    suggestion: Some("Replace with a concrete statement".to_string()),
                });
            }
        }

        if self.config.check_assumptions {
            for (idx, assumption) in urs.scope.assumptions.iter().enumerate() {
                if !assumption.is_validated {
                    let location = assumption
                        .assumption_id
                        .clone()
                        .unwrap_or_else(|| format!("scope.assumptions[{}]", idx));
                    issues.push(QaIssue {
                        severity: Severity::Warning,
                        category: IssueCategory::Assumption,
                        location,
                        description: format!(
                            "Unvalidated assumption: {}",
                            assumption.assumption
                        ),
                        suggestion: Some(
                            "Confirm with the stakeholder who can validate it".to_string(),
                        ),
                    });
                }
            }
        }

        let scores = score_issues(&issues);
        let blocking_issues_count = issues
            .iter()
            .filter(|i| i.severity == Severity::Critical)
            .count();

        info!(
            urs_id = %urs.metadata.id,
            issues = issues.len(),
            blocking = blocking_issues_count,
            overall = scores.overall,
            "review complete"
        );

        QaReport {
            ready_for_approval: blocking_issues_count == 0,
            issues,
            scores,
            blocking_issues_count,
        }
    }

    fn review_requirement(
        &self,
        requirement: &FunctionalRequirement,
        issues: &mut Vec<QaIssue>,
    ) {
        let id = &requirement.requirement_id;

        if self.config.check_shall_phrasing
            && !requirement.description.starts_with("The system shall")
        {
            issues.push(QaIssue {
                severity: Severity::Warning,
                category: IssueCategory::VagueLanguage,
                location: id.clone(),
                description: "Requirement is not phrased as \"The system shall ...\""
                    .to_string(),
                suggestion: Some(
                    "Rephrase the requirement to start with \"The system shall\"".to_string(),
                ),
            });
        }

        if self.config.check_traceability {
            if requirement.source_references.is_empty() {
                issues.push(QaIssue {
                    severity: Severity::Warning,
                    category: IssueCategory::Assumption,
                    location: id.clone(),
                    description: "Requirement has no source references".to_string(),
                    suggestion: Some(
                        "Link the requirement to the source material it came from".to_string(),
                    ),
                });
            }
            if requirement.confidence_level == ConfidenceLevel::Low {
                issues.push(QaIssue {
                    severity: Severity::Warning,
                    category: IssueCategory::Assumption,
                    location: id.clone(),
                    description: "Requirement is marked low confidence".to_string(),
                    suggestion: Some("Confirm the requirement with the requestor".to_string()),
                });
            }
        }

        if self.config.check_acceptance_criteria && requirement.acceptance_criteria.is_empty() {
            issues.push(QaIssue {
                severity: Severity::Critical,
                category: IssueCategory::MissingAcceptanceCriteria,
                location: id.clone(),
                description: "Requirement has no acceptance criteria".to_string(),
                suggestion: Some("Add at least one verifiable criterion".to_string()),
            });
        } else {
            for (k, criterion) in requirement.acceptance_criteria.iter().enumerate() {
                let location = criterion
                    .criterion_id
                    .clone()
                    .unwrap_or_else(|| format!("{} criterion {}", id, k + 1));
                if self.config.check_vague_language {
                    if let Some(term) = find_vague_term(&criterion.criterion) {
                        issues.push(QaIssue {
                            severity: Severity::Warning,
                            category: IssueCategory::Untestable,
                            location: location.clone(),
                            description: format!(
                                "Criterion uses the vague term \"{}\"",
                                term
                            ),
                            suggestion: Some(
                                "State an observable, measurable outcome".to_string(),
                            ),
                        });
                    }
                }
                if self.config.check_measurability && !is_measurable(&criterion.criterion) {
                    issues.push(QaIssue {
                        severity: Severity::Suggestion,
                        category: IssueCategory::Untestable,
                        location,
                        description: "Criterion has no measurable target".to_string(),
                        suggestion: Some(
                            "Add a number or comparative target (e.g. \"within 5 seconds\")"
                                .to_string(),
                        ),
                    });
                }
            }
        }

        if self.config.check_vague_language {
            if let Some(term) = find_vague_term(&requirement.description) {
                issues.push(QaIssue {
                    severity: Severity::Warning,
                    category: IssueCategory::VagueLanguage,
                    location: id.clone(),
                    description: format!(
                        "Requirement description uses the vague term \"{}\"",
                        term
                    ),
                    suggestion: Some("Replace with a concrete, testable statement".to_string()),
                });
            }
        }
    }
}

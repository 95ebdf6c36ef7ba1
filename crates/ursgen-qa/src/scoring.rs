//! Dimension scoring from review findings

use crate::report::{IssueCategory, QaIssue, QaScores};

const W_COMPLETENESS: f64 = 0.25;
const W_CLARITY: f64 = 0.25;
const W_TESTABILITY: f64 = 0.30;
const W_TRACEABILITY: f64 = 0.20;

/// Score four quality dimensions from the issue list.
///
/// Each dimension starts at 100 and loses the severity penalty for every
/// issue routed to it; an issue category can tax more than one dimension.
pub fn score_issues(issues: &[QaIssue]) -> QaScores {
    let mut completeness: f64 = 100.0;
    let mut clarity: f64 = 100.0;
    let mut testability: f64 = 100.0;
    let mut traceability: f64 = 100.0;

    for issue in issues {
        let penalty = issue.severity.penalty();
        match issue.category {
            IssueCategory::MissingAcceptanceCriteria => {
                completeness -= penalty;
                testability -= penalty;
            }
            IssueCategory::VagueLanguage => clarity -= penalty,
            IssueCategory::Untestable => testability -= penalty,
            IssueCategory::Assumption => traceability -= penalty,
            IssueCategory::Contradiction => {
                clarity -= penalty;
                completeness -= penalty;
            }
        }
    }

    let completeness = completeness.clamp(0.0, 100.0);
    let clarity = clarity.clamp(0.0, 100.0);
    let testability = testability.clamp(0.0, 100.0);
    let traceability = traceability.clamp(0.0, 100.0);

    QaScores {
        completeness,
        clarity,
        testability,
        traceability,
        overall: W_COMPLETENESS * completeness
            + W_CLARITY * clarity
            + W_TESTABILITY * testability
            + W_TRACEABILITY * traceability,
    }
}

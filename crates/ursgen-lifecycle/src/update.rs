//! Field-level document updates with version history

use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use ursgen_domain::urs::SuccessMetric;
use ursgen_domain::{
    ExecutiveSummary, FunctionalRequirement, NonFunctionalRequirement, ProblemStatement, Scope,
    Urs, UrsStatus, VersionEntry,
};

/// A partial edit; only the present fields change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DocumentUpdate {
    /// New title
    pub title: Option<String>,
    /// Replacement executive summary
    pub executive_summary: Option<ExecutiveSummary>,
    /// Replacement problem statement
    pub problem_statement: Option<ProblemStatement>,
    /// Replacement scope section
    pub scope: Option<Scope>,
    /// Replacement functional requirement list
    pub functional_requirements: Option<Vec<FunctionalRequirement>>,
    /// Replacement non-functional requirement list
    pub non_functional_requirements: Option<Vec<NonFunctionalRequirement>>,
    /// Replacement success metrics
    pub success_metrics: Option<Vec<SuccessMetric>>,
    /// Replacement tags
    pub tags: Option<Vec<String>>,
    /// Explicit status change, applied as-is
    pub status: Option<UrsStatus>,
}

/// Apply an update, bump `updated_at`, append a version entry naming the
/// changed fields.
///
/// Content edits never change the document status; demoting an approved
/// document back to draft takes an explicit `status` value in the update.
/// Returns the list of changed field names (empty when the update was a
/// no-op, in which case no version entry is appended).
pub fn apply_update(urs: &mut Urs, update: DocumentUpdate, author: &str) -> Vec<String> {
    let mut changed = Vec::new();

    if let Some(title) = update.title {
        urs.metadata.title = title;
        changed.push("title".to_string());
    }
    if let Some(summary) = update.executive_summary {
        urs.executive_summary = summary;
        changed.push("executive_summary".to_string());
    }
    if let Some(statement) = update.problem_statement {
        urs.problem_statement = statement;
        changed.push("problem_statement".to_string());
    }
    if let Some(scope) = update.scope {
        urs.scope = scope;
        changed.push("scope".to_string());
    }
    if let Some(requirements) = update.functional_requirements {
        urs.functional_requirements = requirements;
        changed.push("functional_requirements".to_string());
    }
    if let Some(requirements) = update.non_functional_requirements {
        urs.non_functional_requirements = requirements;
        changed.push("non_functional_requirements".to_string());
    }
    if let Some(metrics) = update.success_metrics {
        urs.success_metrics = metrics;
        changed.push("success_metrics".to_string());
    }
    if let Some(tags) = update.tags {
        urs.metadata.tags = tags;
        changed.push("tags".to_string());
    }
    if let Some(status) = update.status {
        urs.metadata.status = status;
        changed.push("status".to_string());
    }

    if changed.is_empty() {
        return changed;
    }

    let now = Utc::now();
    urs.metadata.updated_at = now;
    urs.version_history.push(VersionEntry {
        version: format!("0.{}", urs.version_history.len() + 1),
        date: now,
        author: author.to_string(),
        changes: format!("Updated: {}", changed.join(", ")),
    });

    info!(
        urs_id = %urs.metadata.id,
        fields = changed.len(),
        "document updated"
    );
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::draft_urs;
    use crate::{record_decision, submit_for_approval, Decision};

    #[test]
    fn update_bumps_version_and_names_fields() {
        let mut urs = draft_urs();
        let before = urs.version_history.len();
        let changed = apply_update(
            &mut urs,
            DocumentUpdate {
                title: Some("Invoice automation v2".to_string()),
                tags: Some(vec!["finance".to_string()]),
                ..Default::default()
            },
            "Dana Reyes",
        );
        assert_eq!(changed, vec!["title", "tags"]);
        assert_eq!(urs.metadata.title, "Invoice automation v2");
        assert_eq!(urs.version_history.len(), before + 1);
        let entry = urs.version_history.last().unwrap();
        assert_eq!(entry.version, format!("0.{}", before + 1));
        assert!(entry.changes.contains("title"));
    }

    #[test]
    fn empty_update_is_a_no_op() {
        let mut urs = draft_urs();
        let updated_at = urs.metadata.updated_at;
        let changed = apply_update(&mut urs, DocumentUpdate::default(), "Dana Reyes");
        assert!(changed.is_empty());
        assert_eq!(urs.metadata.updated_at, updated_at);
        assert!(urs.version_history.is_empty());
    }

    #[test]
    fn content_edits_do_not_demote_an_approved_document() {
        let mut urs = draft_urs();
        let roles = vec!["Business Owner".to_string()];
        submit_for_approval(&mut urs, &roles).unwrap();
        record_decision(
            &mut urs,
            Decision {
                role: "Business Owner".to_string(),
                approved: true,
                approver_name: "Sam Ortiz".to_string(),
                approver_email: "sam@example.com".to_string(),
                comments: None,
            },
        )
        .unwrap();
        assert_eq!(urs.metadata.status, UrsStatus::Approved);

        apply_update(
            &mut urs,
            DocumentUpdate {
                title: Some("Renamed after approval".to_string()),
                ..Default::default()
            },
            "Dana Reyes",
        );
        assert_eq!(urs.metadata.status, UrsStatus::Approved);
    }

    #[test]
    fn explicit_status_edit_demotes() {
        let mut urs = draft_urs();
        urs.metadata.status = UrsStatus::Approved;
        apply_update(
            &mut urs,
            DocumentUpdate {
                status: Some(UrsStatus::Draft),
                ..Default::default()
            },
            "Dana Reyes",
        );
        assert_eq!(urs.metadata.status, UrsStatus::Draft);
    }
}

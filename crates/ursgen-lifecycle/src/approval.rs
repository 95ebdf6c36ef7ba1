//! Approval workflow

use crate::error::LifecycleError;
use chrono::Utc;
use tracing::info;
use ursgen_domain::{Approval, ApprovalStatus, Urs, UrsStatus};

/// Default approval roster applied when the caller names no roles.
pub const DEFAULT_ROSTER: &[&str] = &["Business Owner", "Technical Lead", "Quality Assurance"];

/// One decision to record against an approval role.
#[derive(Debug, Clone)]
pub struct Decision {
    /// Role the decision is for
    pub role: String,
    /// True to approve, false to reject
    pub approved: bool,
    /// Who decided
    pub approver_name: String,
    /// Approver contact
    pub approver_email: String,
    /// Free-form comments
    pub comments: Option<String>,
}

/// Move a draft document into review, fixing the approval roster.
///
/// An empty `roles` slice selects [`DEFAULT_ROSTER`]. Any status other
/// than `draft` is rejected; the roster cannot change once fixed.
pub fn submit_for_approval(urs: &mut Urs, roles: &[String]) -> Result<(), LifecycleError> {
    if urs.metadata.status != UrsStatus::Draft {
        return Err(LifecycleError::InvalidTransition {
            action: "submit".to_string(),
            status: urs.metadata.status,
        });
    }

    urs.approvals = if roles.is_empty() {
        DEFAULT_ROSTER.iter().map(|r| Approval::pending(*r)).collect()
    } else {
        roles.iter().map(|r| Approval::pending(r.clone())).collect()
    };
    urs.metadata.status = UrsStatus::InReview;
    urs.metadata.updated_at = Utc::now();

    info!(
        urs_id = %urs.metadata.id,
        roles = urs.approvals.len(),
        "document submitted for approval"
    );
    Ok(())
}

/// Record one role's decision and recompute the overall status.
///
/// Any rejection moves the document to `rejected` immediately; only a
/// full set of approvals moves it to `approved`. A role decides once.
pub fn record_decision(urs: &mut Urs, decision: Decision) -> Result<UrsStatus, LifecycleError> {
    if urs.metadata.status != UrsStatus::InReview {
        return Err(LifecycleError::InvalidTransition {
            action: "record a decision on".to_string(),
            status: urs.metadata.status,
        });
    }

    let approval = urs
        .approvals
        .iter_mut()
        .find(|a| a.role == decision.role)
        .ok_or_else(|| LifecycleError::UnknownRole(decision.role.clone()))?;
    if approval.status != ApprovalStatus::Pending {
        return Err(LifecycleError::AlreadyDecided(decision.role));
    }

    approval.status = if decision.approved {
        ApprovalStatus::Approved
    } else {
        ApprovalStatus::Rejected
    };
    approval.approver_name = Some(decision.approver_name);
    approval.approver_email = Some(decision.approver_email);
    approval.comments = decision.comments;
    approval.date = Some(Utc::now());

    let any_rejected = urs
        .approvals
        .iter()
        .any(|a| a.status == ApprovalStatus::Rejected);
    let all_approved = urs
        .approvals
        .iter()
        .all(|a| a.status == ApprovalStatus::Approved);
    urs.metadata.status = if any_rejected {
        UrsStatus::Rejected
    } else if all_approved {
        UrsStatus::Approved
    } else {
        UrsStatus::InReview
    };
    urs.metadata.updated_at = Utc::now();

    info!(
        urs_id = %urs.metadata.id,
        status = %urs.metadata.status,
        "approval decision recorded"
    );
    Ok(urs.metadata.status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::draft_urs;

    fn decide(role: &str, approved: bool) -> Decision {
        Decision {
            role: role.to_string(),
            approved,
            approver_name: "Sam Ortiz".to_string(),
            approver_email: "sam@example.com".to_string(),
            comments: None,
        }
    }

    #[test]
    fn submit_fixes_default_roster() {
        let mut urs = draft_urs();
        submit_for_approval(&mut urs, &[]).unwrap();
        assert_eq!(urs.metadata.status, UrsStatus::InReview);
        let roles: Vec<&str> = urs.approvals.iter().map(|a| a.role.as_str()).collect();
        assert_eq!(
            roles,
            vec!["Business Owner", "Technical Lead", "Quality Assurance"]
        );
        assert!(urs
            .approvals
            .iter()
            .all(|a| a.status == ApprovalStatus::Pending));
    }

    #[test]
    fn submit_rejects_non_draft() {
        let mut urs = draft_urs();
        submit_for_approval(&mut urs, &[]).unwrap();
        let err = submit_for_approval(&mut urs, &[]).unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
    }

    #[test]
    fn all_approvals_move_to_approved() {
        let mut urs = draft_urs();
        let roles = vec!["Business Owner".to_string(), "Technical Lead".to_string()];
        submit_for_approval(&mut urs, &roles).unwrap();

        let status = record_decision(&mut urs, decide("Business Owner", true)).unwrap();
        assert_eq!(status, UrsStatus::InReview);
        let status = record_decision(&mut urs, decide("Technical Lead", true)).unwrap();
        assert_eq!(status, UrsStatus::Approved);
    }

    #[test]
    fn one_rejection_rejects_immediately() {
        let mut urs = draft_urs();
        submit_for_approval(&mut urs, &[]).unwrap();
        let status = record_decision(&mut urs, decide("Technical Lead", false)).unwrap();
        assert_eq!(status, UrsStatus::Rejected);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let mut urs = draft_urs();
        submit_for_approval(&mut urs, &[]).unwrap();
        let err = record_decision(&mut urs, decide("Chief Vibes Officer", true)).unwrap_err();
        assert!(matches!(err, LifecycleError::UnknownRole(_)));
    }

    #[test]
    fn double_decision_is_rejected() {
        let mut urs = draft_urs();
        submit_for_approval(&mut urs, &[]).unwrap();
        record_decision(&mut urs, decide("Business Owner", true)).unwrap();
        let err = record_decision(&mut urs, decide("Business Owner", true)).unwrap_err();
        assert!(matches!(err, LifecycleError::AlreadyDecided(_)));
    }

    #[test]
    fn decisions_require_in_review() {
        let mut urs = draft_urs();
        let err = record_decision(&mut urs, decide("Business Owner", true)).unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
    }
}

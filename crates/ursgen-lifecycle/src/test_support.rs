//! Shared fixtures for lifecycle tests

use chrono::Utc;
use ursgen_domain::{
    AcceptanceCriterion, ConfidenceLevel, DataClassification, ExecutiveSummary,
    FunctionalRequirement, Person, Priority, ProblemStatement, Scope, Urs, UrsMetadata,
    UrsStatus,
};

pub fn draft_urs() -> Urs {
    let now = Utc::now();
    let person = Person::new("Dana Reyes".to_string(), "dana@example.com".to_string());
    Urs {
        metadata: UrsMetadata {
            id: "URS-2026-0001".to_string(),
            title: "Invoice automation".to_string(),
            requestor: person.clone(),
            department: "Finance".to_string(),
            status: UrsStatus::Draft,
            owner: person,
            data_classification: DataClassification::Internal,
            created_at: now,
            updated_at: now,
            tags: vec![],
        },
        executive_summary: ExecutiveSummary {
            summary: "Automate invoice entry.".to_string(),
            business_value: "Saves 10 hours weekly.".to_string(),
            source_references: vec![],
        },
        problem_statement: ProblemStatement {
            current_state: "Manual rekeying.".to_string(),
            pain_points: vec![],
            desired_state: "Automated capture.".to_string(),
            source_references: vec![],
        },
        users_and_personas: vec![],
        scope: Scope::default(),
        functional_requirements: vec![FunctionalRequirement {
            requirement_id: "FR-001".to_string(),
            priority: Priority::Must,
            description: "The system shall capture invoices from email.".to_string(),
            rationale: None,
            acceptance_criteria: vec![AcceptanceCriterion {
                criterion_id: Some("FR-001-AC1".to_string()),
                criterion: "Invoices appear in the queue within 2 minutes".to_string(),
                test_method: None,
            }],
            source_references: vec![],
            confidence_level: ConfidenceLevel::High,
            related_requirements: vec![],
            user_stories: vec![],
        }],
        non_functional_requirements: vec![],
        risks_and_open_questions: None,
        success_metrics: vec![],
        version_history: vec![],
        approvals: vec![],
    }
}

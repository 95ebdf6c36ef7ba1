//! Mapping loose synthesis output onto the strict URS schema

use serde_json::Value;
use tracing::warn;
use ursgen_domain::ids::{format_fr_id, format_nfr_id};
use ursgen_domain::{
    AcceptanceCriterion, Assumption, ConfidenceLevel, ExecutiveSummary, FunctionalRequirement,
    NfrCategory, NonFunctionalRequirement, PainPoint, Priority, ProblemStatement, Scope,
    SourceChunk, SourceReference,
};
use ursgen_domain::urs::{Persona, ScopeItem, SuccessMetric};

const EXCERPT_LIMIT: usize = 200;

/// Build the reference pool from the first chunks (up to 3), with
/// excerpts truncated for readability.
pub(crate) fn reference_pool(chunks: &[SourceChunk]) -> Vec<SourceReference> {
    chunks
        .iter()
        .take(3)
        .map(|chunk| {
            let excerpt = if chunk.content.chars().count() > EXCERPT_LIMIT {
                let cut: String = chunk.content.chars().take(EXCERPT_LIMIT).collect();
                format!("{}...", cut)
            } else {
                chunk.content.clone()
            };
            SourceReference {
                chunk_id: chunk.chunk_id.clone(),
                source_type: Some(chunk.source_type.to_string()),
                source_name: Some(chunk.source_name.clone()),
                excerpt: Some(excerpt),
                is_assumption: false,
            }
        })
        .collect()
}

/// References for the requirement at `idx`: the first three requirements
/// cycle through the pool, later ones past the pool get an assumption
/// marker.
fn references_for(idx: usize, pool: &[SourceReference]) -> Vec<SourceReference> {
    if pool.is_empty() || (idx >= pool.len() && idx > 2) {
        vec![SourceReference::assumption()]
    } else {
        vec![pool[idx % pool.len()].clone()]
    }
}

/// Parse functional requirements, applying every schema normalization.
pub(crate) fn parse_functional_requirements(
    value: &Value,
    pool: &[SourceReference],
    warnings: &mut Vec<String>,
) -> Vec<FunctionalRequirement> {
    let Some(items) = value
        .get("functional_requirements")
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    let mut requirements = Vec::new();
    for item in items {
        let Some(obj) = item.as_object() else {
            warnings.push("skipped non-object functional requirement".to_string());
            continue;
        };
        let Some(description) = obj.get("description").and_then(Value::as_str) else {
            warnings.push("skipped functional requirement without description".to_string());
            continue;
        };

        let idx = requirements.len();
        let requirement_id = format_fr_id(idx as u32 + 1);
        let description = FunctionalRequirement::normalize_description(description);
        let acceptance_criteria =
            parse_criteria(obj.get("acceptance_criteria"), &requirement_id, &description);

        let mut requirement = FunctionalRequirement {
            requirement_id,
            priority: Priority::from_loose(
                obj.get("priority").and_then(Value::as_str).unwrap_or(""),
            ),
            description,
            rationale: obj
                .get("rationale")
                .and_then(Value::as_str)
                .map(str::to_string),
            acceptance_criteria,
            source_references: references_for(idx, pool),
            confidence_level: ConfidenceLevel::from_loose(
                obj.get("confidence").and_then(Value::as_str).unwrap_or(""),
            ),
            related_requirements: vec![],
            user_stories: vec![],
        };
        requirement.enforce_confidence_floor();
        requirements.push(requirement);
    }
    requirements
}

/// Accept criteria as plain strings or objects; guarantee at least one.
fn parse_criteria(
    value: Option<&Value>,
    requirement_id: &str,
    description: &str,
) -> Vec<AcceptanceCriterion> {
    let mut criteria = Vec::new();
    if let Some(items) = value.and_then(Value::as_array) {
        for item in items {
            let parsed = match item {
                Value::String(s) if !s.trim().is_empty() => Some(AcceptanceCriterion {
                    criterion_id: None,
                    criterion: s.trim().to_string(),
                    test_method: None,
                }),
                Value::Object(obj) => {
                    obj.get("criterion")
                        .and_then(Value::as_str)
                        .map(|criterion| AcceptanceCriterion {
                            criterion_id: None,
                            criterion: criterion.to_string(),
                            test_method: obj
                                .get("test_method")
                                .and_then(Value::as_str)
                                .map(str::to_string),
                        })
                }
                _ => None,
            };
            if let Some(criterion) = parsed {
                criteria.push(criterion);
            }
        }
    }

    if criteria.is_empty() {
        criteria.push(AcceptanceCriterion {
            criterion_id: None,
            criterion: format!("Stakeholder review confirms: {}", description),
            test_method: Some("review".to_string()),
        });
    }

    for (k, criterion) in criteria.iter_mut().enumerate() {
        criterion.criterion_id = Some(format!("{}-AC{}", requirement_id, k + 1));
    }
    criteria
}

/// The requirement synthesized when the model produced none.
pub(crate) fn fallback_requirement(pool: &[SourceReference]) -> FunctionalRequirement {
    let description =
        "The system shall address the needs described in the stakeholder inputs.".to_string();
    FunctionalRequirement {
        requirement_id: format_fr_id(1),
        priority: Priority::Should,
        acceptance_criteria: parse_criteria(None, "FR-001", &description),
        description,
        rationale: Some("Placeholder pending requirement elaboration.".to_string()),
        source_references: references_for(0, pool),
        confidence_level: ConfidenceLevel::Medium,
        related_requirements: vec![],
        user_stories: vec![],
    }
}

/// Parse non-functional requirements; unknown categories are skipped.
pub(crate) fn parse_nfrs(
    value: &Value,
    pool: &[SourceReference],
    warnings: &mut Vec<String>,
) -> Vec<NonFunctionalRequirement> {
    let Some(items) = value
        .get("non_functional_requirements")
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    let mut requirements = Vec::new();
    for item in items {
        let Some(obj) = item.as_object() else {
            continue;
        };
        let Some(description) = obj.get("description").and_then(Value::as_str) else {
            warnings.push("skipped non-functional requirement without description".to_string());
            continue;
        };
        let category: NfrCategory = match obj
            .get("category")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
        {
            Some(category) => category,
            None => {
                warn!("skipping non-functional requirement with unknown category");
                warnings.push(format!(
                    "skipped non-functional requirement with unknown category: {}",
                    description
                ));
                continue;
            }
        };

        let idx = requirements.len();
        requirements.push(NonFunctionalRequirement {
            requirement_id: format_nfr_id(idx as u32 + 1),
            category,
            description: description.to_string(),
            target_metric: obj
                .get("target_metric")
                .and_then(Value::as_str)
                .map(str::to_string),
            measurement_method: obj
                .get("measurement_method")
                .and_then(Value::as_str)
                .map(str::to_string),
            priority: Priority::from_loose(
                obj.get("priority").and_then(Value::as_str).unwrap_or(""),
            ),
            source_references: references_for(idx, pool),
            confidence_level: ConfidenceLevel::from_loose(
                obj.get("confidence").and_then(Value::as_str).unwrap_or(""),
            ),
        });
    }
    requirements
}

/// Executive summary with documented defaults for missing fields.
pub(crate) fn parse_executive_summary(
    value: &Value,
    pool: &[SourceReference],
    facts_summary: &str,
) -> ExecutiveSummary {
    let section = value.get("executive_summary");
    let summary = section
        .and_then(|s| s.get("summary"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| {
            (!facts_summary.is_empty()).then(|| facts_summary.to_string())
        })
        .unwrap_or_else(|| {
            "Requirements document generated from stakeholder inputs.".to_string()
        });
    ExecutiveSummary {
        summary,
        business_value: section
            .and_then(|s| s.get("business_value"))
            .and_then(Value::as_str)
            .unwrap_or("To be quantified with stakeholders.")
            .to_string(),
        source_references: pool.to_vec(),
    }
}

/// Problem statement; pain points carry the first pool reference.
pub(crate) fn parse_problem_statement(
    value: &Value,
    pool: &[SourceReference],
) -> ProblemStatement {
    let section = value.get("problem_statement");
    let first_ref: Vec<SourceReference> = pool.first().cloned().into_iter().collect();

    let mut pain_points = Vec::new();
    if let Some(items) = section
        .and_then(|s| s.get("pain_points"))
        .and_then(Value::as_array)
    {
        for item in items {
            let parsed = match item {
                Value::String(s) => Some(PainPoint {
                    description: s.clone(),
                    impact: None,
                    frequency: None,
                    source_references: first_ref.clone(),
                }),
                Value::Object(obj) => obj
                    .get("description")
                    .and_then(Value::as_str)
                    .map(|description| PainPoint {
                        description: description.to_string(),
                        impact: obj.get("impact").and_then(Value::as_str).map(str::to_string),
                        frequency: obj
                            .get("frequency")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                        source_references: first_ref.clone(),
                    }),
                _ => None,
            };
            if let Some(pain_point) = parsed {
                pain_points.push(pain_point);
            }
        }
    }

    ProblemStatement {
        current_state: section
            .and_then(|s| s.get("current_state"))
            .and_then(Value::as_str)
            .unwrap_or("Current process details were not provided.")
            .to_string(),
        pain_points,
        desired_state: section
            .and_then(|s| s.get("desired_state"))
            .and_then(Value::as_str)
            .unwrap_or("Desired future state to be refined with stakeholders.")
            .to_string(),
        source_references: pool.to_vec(),
    }
}

/// Scope section; items and assumptions accepted as strings or objects.
pub(crate) fn parse_scope(value: &Value) -> Scope {
    let section = value.get("scope");

    let items = |key: &str| -> Vec<ScopeItem> {
        section
            .and_then(|s| s.get(key))
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| match entry {
                        Value::String(s) => Some(ScopeItem {
                            item: s.clone(),
                            rationale: None,
                        }),
                        Value::Object(obj) => {
                            obj.get("item").and_then(Value::as_str).map(|item| ScopeItem {
                                item: item.to_string(),
                                rationale: obj
                                    .get("rationale")
                                    .and_then(Value::as_str)
                                    .map(str::to_string),
                            })
                        }
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    };

    let assumptions = section
        .and_then(|s| s.get("assumptions"))
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .enumerate()
                .filter_map(|(idx, entry)| {
                    let (assumption, risk) = match entry {
                        Value::String(s) => (Some(s.clone()), None),
                        Value::Object(obj) => (
                            obj.get("assumption")
                                .and_then(Value::as_str)
                                .map(str::to_string),
                            obj.get("risk_if_wrong")
                                .and_then(Value::as_str)
                                .map(str::to_string),
                        ),
                        _ => (None, None),
                    };
                    assumption.map(|assumption| Assumption {
                        assumption_id: Some(format!("A-{:03}", idx + 1)),
                        assumption,
                        is_validated: false,
                        validated_by: None,
                        risk_if_wrong: risk,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Scope {
        in_scope: items("in_scope"),
        out_of_scope: items("out_of_scope"),
        assumptions,
        dependencies: vec![],
        constraints: section
            .and_then(|s| s.get("constraints"))
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    }
}

/// User personas; entries without a name are dropped.
pub(crate) fn parse_personas(value: &Value) -> Vec<Persona> {
    value
        .get("users_and_personas")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .enumerate()
                .filter_map(|(idx, item)| {
                    let obj = item.as_object()?;
                    let name = obj.get("name").and_then(Value::as_str)?;
                    Some(Persona {
                        persona_id: format!("P-{:03}", idx + 1),
                        name: name.to_string(),
                        role: obj
                            .get("role")
                            .and_then(Value::as_str)
                            .unwrap_or("Stakeholder")
                            .to_string(),
                        goals: string_items(obj.get("goals")),
                        pain_points: string_items(obj.get("pain_points")),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn string_items(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Success metrics block.
pub(crate) fn parse_success_metrics(value: &Value) -> Vec<SuccessMetric> {
    value
        .get("success_metrics")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .enumerate()
                .filter_map(|(idx, item)| {
                    let obj = item.as_object()?;
                    let name = obj.get("name").and_then(Value::as_str)?;
                    Some(SuccessMetric {
                        metric_id: format!("SM-{:03}", idx + 1),
                        name: name.to_string(),
                        baseline: obj
                            .get("baseline")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                        target: obj
                            .get("target")
                            .and_then(Value::as_str)
                            .unwrap_or("To be defined")
                            .to_string(),
                        measurement_method: obj
                            .get("measurement_method")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

//! Loose-string coercion for model output.
//!
//! Language models emit priority and confidence labels in many spellings.
//! These tables map the common ones onto the closed enums; anything
//! unrecognized falls back to the middle value.

use crate::urs::{ConfidenceLevel, Priority};

impl Priority {
    /// Map a loose label onto MoSCoW. Unrecognized input becomes `Should`.
    pub fn from_loose(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "must" | "must have" | "critical" | "high" | "mandatory" | "required" => {
                Priority::Must
            }
            "should" | "should have" | "important" | "medium" => Priority::Should,
            "could" | "could have" | "nice to have" | "low" | "optional" | "enhancement" => {
                Priority::Could
            }
            _ => Priority::Should,
        }
    }
}

impl ConfidenceLevel {
    /// Map a loose label onto a confidence level. Unrecognized input
    /// becomes `Medium`.
    pub fn from_loose(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "high" | "explicit" | "certain" => ConfidenceLevel::High,
            "low" | "inferred" | "assumed" | "uncertain" => ConfidenceLevel::Low,
            _ => ConfidenceLevel::Medium,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_synonyms() {
        assert_eq!(Priority::from_loose("CRITICAL"), Priority::Must);
        assert_eq!(Priority::from_loose("must have"), Priority::Must);
        assert_eq!(Priority::from_loose("important"), Priority::Should);
        assert_eq!(Priority::from_loose("nice to have"), Priority::Could);
        assert_eq!(Priority::from_loose("enhancement"), Priority::Could);
    }

    #[test]
    fn priority_defaults_to_should() {
        assert_eq!(Priority::from_loose("whatever"), Priority::Should);
        assert_eq!(Priority::from_loose(""), Priority::Should);
    }

    #[test]
    fn confidence_synonyms() {
        assert_eq!(ConfidenceLevel::from_loose("explicit"), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_loose("Assumed"), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_loose("medium"), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_loose("???"), ConfidenceLevel::Medium);
    }
}

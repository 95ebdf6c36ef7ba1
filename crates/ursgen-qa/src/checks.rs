//! Text-level checks shared across review rules

use regex::Regex;
use std::sync::LazyLock;

/// Subjective terms that make a requirement or criterion unverifiable.
const VAGUE_TERMS: &[&str] = &[
    "fast",
    "quick",
    "slow",
    "easy",
    "simple",
    "user-friendly",
    "intuitive",
    "seamless",
    "efficient",
    "effective",
    "modern",
    "appropriate",
    "reasonable",
    "adequate",
    "sufficient",
    "good",
    "best",
    "optimal",
    "flexible",
    "scalable",
    "robust",
    "etc",
    "and so on",
    "as needed",
    "if necessary",
    "when appropriate",
];

static VAGUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = VAGUE_TERMS
        .iter()
        .map(|term| regex::escape(term))
        .collect::<Vec<_>>()
        .join("|");
    // Panic-free: the pattern is built from escaped literals.
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).unwrap()
});

static MEASURABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+|less than|more than|within|between|at least").unwrap()
});

/// First vague term found in `text`, lowercased, if any.
pub fn find_vague_term(text: &str) -> Option<String> {
    VAGUE_RE.find(text).map(|m| m.as_str().to_lowercase())
}

/// Whether `text` contains a number or comparative phrase that makes it
/// measurable.
pub fn is_measurable(text: &str) -> bool {
    MEASURABLE_RE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_vague_terms_case_insensitively() {
        assert_eq!(
            find_vague_term("The UI must feel Intuitive to everyone"),
            Some("intuitive".to_string())
        );
        assert_eq!(
            find_vague_term("Handle records as needed"),
            Some("as needed".to_string())
        );
        assert_eq!(find_vague_term("Process 500 invoices per hour"), None);
    }

    #[test]
    fn vague_match_respects_word_boundaries() {
        // "fastest" and "stretch" must not match "fast" / "etc".
        assert_eq!(find_vague_term("the fastest path"), None);
        assert_eq!(find_vague_term("stretch goals"), None);
    }

    #[test]
    fn measurability_detection() {
        assert!(is_measurable("completes within 5 seconds"));
        assert!(is_measurable("at least one approver signs off"));
        assert!(is_measurable("99 percent of uploads succeed"));
        assert!(!is_measurable("export works correctly"));
    }
}

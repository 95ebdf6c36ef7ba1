//! Review configuration

/// Which checks the engine runs.
#[derive(Debug, Clone)]
pub struct QaConfig {
    /// Flag requirements not phrased as "The system shall"
    pub check_shall_phrasing: bool,
    /// Flag requirements without source references and low-confidence ones
    pub check_traceability: bool,
    /// Flag requirements without acceptance criteria
    pub check_acceptance_criteria: bool,
    /// Scan descriptions, criteria and summary for vague terms
    pub check_vague_language: bool,
    /// Flag criteria without a quantity or comparative phrase
    pub check_measurability: bool,
    /// Flag unvalidated scope assumptions
    pub check_assumptions: bool,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            check_shall_phrasing: true,
            check_traceability: true,
            check_acceptance_criteria: true,
            check_vague_language: true,
            check_measurability: true,
            check_assumptions: true,
        }
    }
}

impl QaConfig {
    /// Only the checks that can block approval.
    pub fn blocking_only() -> Self {
        Self {
            check_shall_phrasing: false,
            check_traceability: false,
            check_acceptance_criteria: true,
            check_vague_language: false,
            check_measurability: false,
            check_assumptions: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_enables_everything() {
        let config = QaConfig::default();
        assert!(config.check_shall_phrasing);
        assert!(config.check_measurability);
    }

    #[test]
    fn blocking_only_keeps_criteria_check() {
        let config = QaConfig::blocking_only();
        assert!(config.check_acceptance_criteria);
        assert!(!config.check_vague_language);
    }
}

//! Completeness scoring

use ursgen_domain::ClarifyingQuestion;

/// Score how complete the input is, in `[0.0, 1.0]`.
///
/// Each open question subtracts its priority weight from a base of 1.0,
/// floored at 0.3; richer input earns back up to 0.2 (one point per 50
/// characters). No questions at all means a perfect 1.0. At fixed content
/// volume the score never increases when high-priority questions are
/// added.
pub fn completeness_score(questions: &[ClarifyingQuestion], total_content_len: usize) -> f64 {
    if questions.is_empty() {
        return 1.0;
    }
    let deduction: f64 = questions.iter().map(|q| q.priority.weight()).sum();
    let base = (1.0 - deduction).max(0.3);
    let content_bonus = (total_content_len as f64 / 10_000.0).min(0.2);
    (base + content_bonus).min(1.0)
}

//! The result of scoring one request.

use std::collections::BTreeMap;

use align_signals::{ContextFlags, PrincipleKey};
use serde::{Deserialize, Serialize};

/// Per-principle scores for one request.
///
/// Scores are in `[0, 1]`, where 1.0 means no concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthicsAssessment {
    /// Raw score per principle.
    pub scores: BTreeMap<PrincipleKey, f64>,
    /// Score multiplied by the profile weight.
    pub weighted_scores: BTreeMap<PrincipleKey, f64>,
    /// Weighted mean over principles with non-zero weight.
    pub overall_score: f64,
    /// Principles scoring below the violation threshold, in ALIGN order.
    pub violations: Vec<PrincipleKey>,
    /// Framing the scores were adjusted for.
    pub context: ContextFlags,
    /// Categories that contributed penalties.
    pub matched_categories: Vec<String>,
    /// Confidence in the assessment, in `[0.1, 0.95]`.
    pub confidence: f64,
}

impl EthicsAssessment {
    /// Score of one principle.
    pub fn score(&self, principle: PrincipleKey) -> f64 {
        self.scores.get(&principle).copied().unwrap_or(1.0)
    }

    /// The lowest-scoring principle. Ties resolve to ALIGN order.
    pub fn lowest(&self) -> Option<(PrincipleKey, f64)> {
        self.scores
            .iter()
            .map(|(p, s)| (*p, *s))
            .fold(None, |lowest, (p, s)| match lowest {
                Some((_, best)) if best <= s => lowest,
                _ => Some((p, s)),
            })
    }

    /// Returns true if any principle is violated.
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Returns true if the principle is violated.
    pub fn is_violated(&self, principle: PrincipleKey) -> bool {
        self.violations.contains(&principle)
    }

    /// Share of the weighted score total contributed by one principle.
    ///
    /// Zero when every weighted score is zero.
    pub fn contribution(&self, principle: PrincipleKey) -> f64 {
        let total: f64 = self.weighted_scores.values().sum();
        if total <= 0.0 {
            return 0.0;
        }
        self.weighted_scores.get(&principle).copied().unwrap_or(0.0) / total
    }

    /// Returns true if every number in the assessment is finite.
    pub fn is_finite(&self) -> bool {
        self.overall_score.is_finite()
            && self.confidence.is_finite()
            && self.scores.values().all(|s| s.is_finite())
            && self.weighted_scores.values().all(|s| s.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment(scores: [f64; 5]) -> EthicsAssessment {
        let scores: BTreeMap<_, _> = PrincipleKey::ALL.into_iter().zip(scores).collect();
        EthicsAssessment {
            weighted_scores: scores.clone(),
            scores,
            overall_score: 0.0,
            violations: Vec::new(),
            context: ContextFlags::default(),
            matched_categories: Vec::new(),
            confidence: 0.8,
        }
    }

    #[test]
    fn test_lowest_prefers_canonical_order_on_ties() {
        let a = assessment([1.0, 0.4, 0.4, 1.0, 1.0]);
        assert_eq!(a.lowest(), Some((PrincipleKey::Learning, 0.4)));
    }

    #[test]
    fn test_contribution_sums_to_one() {
        let a = assessment([1.0, 0.5, 0.25, 1.0, 0.25]);
        let sum: f64 = PrincipleKey::ALL.iter().map(|p| a.contribution(*p)).sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!((a.contribution(PrincipleKey::Awareness) - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_contribution_all_zero() {
        let a = assessment([0.0; 5]);
        assert_eq!(a.contribution(PrincipleKey::Integrity), 0.0);
    }

    #[test]
    fn test_is_finite() {
        let mut a = assessment([1.0; 5]);
        assert!(a.is_finite());
        a.overall_score = f64::NAN;
        assert!(!a.is_finite());
    }
}

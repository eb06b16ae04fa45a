//! Ethics scorer.
//!
//! Turns extracted signals into one score per principle. Every principle
//! starts at the baseline and loses points for each signal that names it:
//!
//! ```text
//! penalty(primary)   = penalty_scale × strength
//! penalty(secondary) = penalty_scale × strength × secondary_ratio
//! penalty(all)      += critical_spread × strength      (critical signals only)
//! ```
//!
//! Context adjustments are applied before thresholding:
//!
//! | Framing | Effect |
//! |---------|--------|
//! | hypothetical | every penalty × `hypothetical_factor` |
//! | harm negated | negatable signals contribute nothing |
//! | question | integrity deduction × `question_integrity_factor` |
//!
//! Weights never scale penalties. They only enter the overall score, so
//! raising one weight can only raise that principle's share of the total.

pub mod assessment;

use std::collections::BTreeMap;

use align_signals::{ContextFlags, PrincipleKey, SignalExtractor, SignalSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use assessment::EthicsAssessment;

use crate::error::EthicsError;
use crate::profile::WeightProfile;
use crate::Result;

/// Scores in this band count as ambiguous for confidence purposes.
const AMBIGUOUS_BAND: std::ops::RangeInclusive<f64> = 0.4..=0.6;

/// Scorer parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Starting score of every principle.
    pub baseline: f64,
    /// Multiplier from signal strength to score deduction.
    pub penalty_scale: f64,
    /// Share of the penalty taken by a secondary principle.
    pub secondary_ratio: f64,
    /// Deduction per unit strength applied to all principles by critical signals.
    pub critical_spread: f64,
    /// Penalty multiplier for hypothetical framing.
    pub hypothetical_factor: f64,
    /// Integrity deduction multiplier for question framing.
    pub question_integrity_factor: f64,
    /// Scores below this are violations.
    pub violation_threshold: f64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            baseline: 1.0,
            penalty_scale: 2.0,
            secondary_ratio: 0.5,
            critical_spread: 1.0,
            hypothetical_factor: 0.5,
            question_integrity_factor: 0.75,
            violation_threshold: 0.5,
        }
    }
}

impl ScorerConfig {
    /// Checks every parameter is finite and in range.
    pub fn validate(&self) -> Result<()> {
        let unit = [
            ("secondary_ratio", self.secondary_ratio),
            ("hypothetical_factor", self.hypothetical_factor),
            ("question_integrity_factor", self.question_integrity_factor),
            ("violation_threshold", self.violation_threshold),
        ];
        for (name, value) in unit {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(EthicsError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        for (name, value) in [
            ("penalty_scale", self.penalty_scale),
            ("critical_spread", self.critical_spread),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EthicsError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        if !self.baseline.is_finite() || self.baseline <= 0.0 || self.baseline > 1.0 {
            return Err(EthicsError::InvalidConfig(format!(
                "baseline must be within (0, 1], got {}",
                self.baseline
            )));
        }
        Ok(())
    }
}

/// Scores requests against the five principles.
///
/// Stateless between calls: the same inputs always produce the same
/// assessment.
#[derive(Debug, Clone)]
pub struct EthicsScorer {
    extractor: SignalExtractor,
    config: ScorerConfig,
}

impl EthicsScorer {
    /// Creates a scorer with the default configuration.
    pub fn new(extractor: SignalExtractor) -> Self {
        Self {
            extractor,
            config: ScorerConfig::default(),
        }
    }

    /// Creates a scorer with a validated configuration.
    pub fn with_config(extractor: SignalExtractor, config: ScorerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { extractor, config })
    }

    /// Returns a copy using a different violation threshold, clamped to `[0, 1]`.
    pub fn with_violation_threshold(mut self, threshold: f64) -> Self {
        self.config.violation_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Extracts signals from `text` and scores them.
    pub fn assess(&self, text: &str, flags: &ContextFlags, profile: &WeightProfile) -> EthicsAssessment {
        let signals = self.extractor.extract(text);
        self.assess_signals(&signals, flags, profile)
    }

    /// Scores already extracted signals.
    pub fn assess_signals(
        &self,
        signals: &SignalSet,
        flags: &ContextFlags,
        profile: &WeightProfile,
    ) -> EthicsAssessment {
        let deductions = self.deductions(signals, flags);

        let mut scores = BTreeMap::new();
        let mut weighted_scores = BTreeMap::new();
        for principle in PrincipleKey::ALL {
            let score = (self.config.baseline - deductions[principle.index()]).clamp(0.0, 1.0);
            scores.insert(principle, score);
            weighted_scores.insert(principle, score * profile.weight(principle));
        }

        let overall_score = overall(&scores, profile);
        let violations: Vec<PrincipleKey> = PrincipleKey::ALL
            .into_iter()
            .filter(|p| scores[p] < self.config.violation_threshold)
            .collect();

        let ambiguous = scores.values().filter(|s| AMBIGUOUS_BAND.contains(*s)).count();
        let confidence = (0.8 + (0.05 * signals.len() as f64).min(0.2) - 0.05 * ambiguous as f64)
            .clamp(0.1, 0.95);

        debug!(
            overall = overall_score,
            violations = ?violations,
            "ethics assessment computed"
        );

        EthicsAssessment {
            scores,
            weighted_scores,
            overall_score,
            violations,
            context: *flags,
            matched_categories: signals.categories().into_iter().map(String::from).collect(),
            confidence,
        }
    }

    /// Total deduction per principle, indexed in ALIGN order.
    fn deductions(&self, signals: &SignalSet, flags: &ContextFlags) -> [f64; 5] {
        let c = &self.config;
        let framing = if flags.hypothetical { c.hypothetical_factor } else { 1.0 };
        let mut deductions = [0.0; 5];

        for signal in signals {
            if flags.harm_negated && signal.negatable {
                debug!(category = %signal.category, "penalty cancelled by explicit negation");
                continue;
            }

            let penalty = c.penalty_scale * signal.strength * framing;
            deductions[signal.primary.index()] += penalty;
            if let Some(secondary) = signal.secondary {
                deductions[secondary.index()] += penalty * c.secondary_ratio;
            }

            if signal.is_critical() {
                let spread = c.critical_spread * signal.strength * framing;
                for deduction in deductions.iter_mut() {
                    *deduction += spread;
                }
            }
        }

        if flags.question {
            deductions[PrincipleKey::Integrity.index()] *= c.question_integrity_factor;
        }
        deductions
    }
}

/// Weighted mean over principles with non-zero weight.
///
/// Falls back to the plain mean when every weight is zero.
fn overall(scores: &BTreeMap<PrincipleKey, f64>, profile: &WeightProfile) -> f64 {
    let (numerator, denominator) = scores
        .iter()
        .map(|(p, s)| (profile.weight(*p), *s))
        .filter(|(w, _)| *w > 0.0)
        .fold((0.0, 0.0), |(num, den), (w, s)| (num + w * s, den + w));

    if denominator > 0.0 {
        numerator / denominator
    } else {
        scores.values().sum::<f64>() / scores.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> EthicsScorer {
        EthicsScorer::new(SignalExtractor::new().unwrap())
    }

    fn flags_for(text: &str) -> ContextFlags {
        SignalExtractor::new().unwrap().context_flags(text)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_clean_text_scores_baseline() {
        let a = scorer().assess("Wie spät ist es?", &ContextFlags::default(), &WeightProfile::default());
        assert!(a.scores.values().all(|s| close(*s, 1.0)));
        assert!(close(a.overall_score, 1.0));
        assert!(!a.has_violations());
        assert!(a.matched_categories.is_empty());
    }

    #[test]
    fn test_harm_scores_below_half() {
        let text = "Ich will ihm schaden.";
        let a = scorer().assess(text, &flags_for(text), &WeightProfile::default());
        assert!(close(a.score(PrincipleKey::Awareness), 0.0));
        assert!(close(a.score(PrincipleKey::Nurturing), 0.1));
        assert!(close(a.score(PrincipleKey::Learning), 0.55));
        assert!(close(a.overall_score, 0.35));
        assert_eq!(a.violations, vec![PrincipleKey::Awareness, PrincipleKey::Nurturing]);
    }

    #[test]
    fn test_question_dampens_integrity_only() {
        let text = "Soll ich lügen um zu helfen?";
        let flags = flags_for(text);
        assert!(flags.question);
        let a = scorer().assess(text, &flags, &WeightProfile::default());
        assert!(close(a.score(PrincipleKey::Integrity), 0.4));
        assert!(close(a.score(PrincipleKey::Nurturing), 0.3));
        assert!(close(a.score(PrincipleKey::Learning), 0.65));
        assert!(a.is_violated(PrincipleKey::Integrity));
        assert!(a.is_violated(PrincipleKey::Nurturing));
        assert!(!a.is_violated(PrincipleKey::Learning));
    }

    #[test]
    fn test_hypothetical_halves_penalty() {
        let s = scorer();
        let profile = WeightProfile::default();
        let plain = ContextFlags::default();
        let hypothetical = ContextFlags { hypothetical: true, ..ContextFlags::default() };

        let direct = s.assess("lügen", &plain, &profile);
        let framed = s.assess("lügen", &hypothetical, &profile);
        let direct_loss = 1.0 - direct.score(PrincipleKey::Integrity);
        let framed_loss = 1.0 - framed.score(PrincipleKey::Integrity);
        assert!(close(framed_loss, direct_loss * 0.5));
    }

    #[test]
    fn test_negated_harm_cancels_penalty() {
        let text = "Ich will niemandem schaden";
        let flags = flags_for(text);
        assert!(flags.harm_negated);
        let a = scorer().assess(text, &flags, &WeightProfile::default());
        assert!(close(a.score(PrincipleKey::Awareness), 1.0));
        assert!(a.matched_categories.contains(&"harm".to_string()));
    }

    #[test]
    fn test_scores_are_floored_at_zero() {
        let text = "schaden verletzen lügen manipulieren diskriminieren";
        let a = scorer().assess(text, &ContextFlags::default(), &WeightProfile::default());
        assert!(a.scores.values().all(|s| (0.0..=1.0).contains(s)));
        assert!(close(a.score(PrincipleKey::Integrity), 0.0));
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let s = scorer();
        let text = "Soll ich meine Daten verschweigen?";
        let flags = flags_for(text);
        let profile = WeightProfile::strict();
        assert_eq!(s.assess(text, &flags, &profile), s.assess(text, &flags, &profile));
    }

    #[test]
    fn test_zero_weight_excluded_from_overall() {
        let text = "Ich will ihm schaden.";
        let profile = WeightProfile::from_weights([0.0, 1.0, 1.0, 1.0, 0.0]).unwrap();
        let a = scorer().assess(text, &flags_for(text), &profile);
        assert!(close(a.overall_score, 0.55));
    }

    #[test]
    fn test_all_zero_weights_fall_back_to_plain_mean() {
        let text = "Ich will ihm schaden.";
        let profile = WeightProfile::from_weights([0.0; 5]).unwrap();
        let a = scorer().assess(text, &flags_for(text), &profile);
        assert!(close(a.overall_score, 0.35));
    }

    #[test]
    fn test_raising_weight_never_lowers_contribution() {
        let s = scorer();
        let text = "Soll ich lügen um zu helfen?";
        let flags = flags_for(text);
        for principle in PrincipleKey::ALL {
            let base = s.assess(text, &flags, &WeightProfile::default());
            let raised_profile = WeightProfile::default().with_weight(principle, 3.0).unwrap();
            let raised = s.assess(text, &flags, &raised_profile);
            assert!(
                raised.contribution(principle) >= base.contribution(principle) - 1e-12,
                "contribution of {} dropped",
                principle
            );
        }
    }

    #[test]
    fn test_secondary_ratio_is_configurable() {
        let config = ScorerConfig { secondary_ratio: 1.0, ..ScorerConfig::default() };
        let s = EthicsScorer::with_config(SignalExtractor::new().unwrap(), config).unwrap();
        let a = s.assess("helfen", &ContextFlags::default(), &WeightProfile::default());
        assert!(close(a.score(PrincipleKey::Nurturing), a.score(PrincipleKey::Learning)));
    }

    #[test]
    fn test_violation_threshold_override() {
        let s = scorer().with_violation_threshold(0.7);
        let a = s.assess("helfen", &ContextFlags::default(), &WeightProfile::default());
        // learning = 1 - 0.35, nurturing = 1 - 0.7
        assert_eq!(a.violations, vec![PrincipleKey::Learning, PrincipleKey::Nurturing]);
    }

    #[test]
    fn test_confidence_bounds() {
        let s = scorer();
        let clean = s.assess("hallo", &ContextFlags::default(), &WeightProfile::default());
        assert!(close(clean.confidence, 0.8));
        let heavy = s.assess(
            "schaden lügen daten helfen manipulieren",
            &ContextFlags::default(),
            &WeightProfile::default(),
        );
        assert!((0.1..=0.95).contains(&heavy.confidence));
    }

    #[test]
    fn test_config_validation() {
        assert!(ScorerConfig::default().validate().is_ok());
        let bad = ScorerConfig { secondary_ratio: 1.5, ..ScorerConfig::default() };
        assert!(matches!(bad.validate(), Err(EthicsError::InvalidConfig(_))));
        let bad = ScorerConfig { penalty_scale: f64::INFINITY, ..ScorerConfig::default() };
        assert!(bad.validate().is_err());
        let bad = ScorerConfig { baseline: 0.0, ..ScorerConfig::default() };
        assert!(bad.validate().is_err());
    }
}

//! Fast/deep path routing.
//!
//! Every request is routed exactly once, from `Undecided` to one of two
//! terminal paths:
//!
//! ```text
//!                    ┌────────────┐
//!                    │ Undecided  │
//!                    └─────┬──────┘
//!          forcing reason? │ or > 1 soft reason?
//!             ┌────────────┴────────────┐
//!             ▼ no                      ▼ yes
//!      ┌─────────────┐           ┌─────────────┐
//!      │    Fast     │           │    Deep     │
//!      └─────────────┘           └─────────────┘
//! ```
//!
//! ## Reasons
//!
//! | Reason | Kind |
//! |--------|------|
//! | conflict category matched | forcing |
//! | contrast connective ("aber", "however") | forcing |
//! | explicit ethical vocabulary | forcing |
//! | multi-clause text | forcing |
//! | long text | soft |
//! | decision question ("soll ich") | soft |
//! | purpose connective ("um zu") | soft |
//!
//! A question mark on its own is not a reason.

use std::fmt;

use align_signals::{SignalSet, TextFeatures};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EthicsError;
use crate::Result;

/// Which pipeline a request takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    /// Template response, no scoring.
    Fast,
    /// Scoring and consequence simulation.
    Deep,
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKind::Fast => write!(f, "FAST"),
            PathKind::Deep => write!(f, "DEEP"),
        }
    }
}

/// Why a request was routed the way it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum RouteReason {
    /// A conflict category matched.
    CategoryMatch(String),
    /// A contrast connective was found.
    ContrastConnective(String),
    /// Explicit ethical vocabulary was found.
    EthicalVocabulary(String),
    /// The text has this many clauses.
    MultiClause(usize),
    /// The text has this many characters.
    LongText(usize),
    /// The text asks for a decision.
    DecisionQuestion,
    /// A purpose connective was found.
    PurposeConnective(String),
}

impl RouteReason {
    /// Forcing reasons send a request to the deep path on their own.
    pub fn is_forcing(&self) -> bool {
        matches!(
            self,
            RouteReason::CategoryMatch(_)
                | RouteReason::ContrastConnective(_)
                | RouteReason::EthicalVocabulary(_)
                | RouteReason::MultiClause(_)
        )
    }
}

impl fmt::Display for RouteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CategoryMatch(c) => write!(f, "conflict category '{}' matched", c),
            Self::ContrastConnective(w) => write!(f, "contrast connective '{}'", w),
            Self::EthicalVocabulary(w) => write!(f, "ethical vocabulary '{}'", w),
            Self::MultiClause(n) => write!(f, "{} clauses", n),
            Self::LongText(n) => write!(f, "long text ({} chars)", n),
            Self::DecisionQuestion => write!(f, "asks for a decision"),
            Self::PurposeConnective(w) => write!(f, "purpose connective '{}'", w),
        }
    }
}

/// Outcome of routing one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// Chosen path.
    pub path: PathKind,
    /// Confidence in the choice, in `[0, 1]`.
    pub confidence: f64,
    /// Reasons found, forcing reasons first.
    pub reasons: Vec<RouteReason>,
}

impl RoutingDecision {
    /// Returns true for the fast path.
    pub fn is_fast(&self) -> bool {
        self.path == PathKind::Fast
    }

    /// Returns true for the deep path.
    pub fn is_deep(&self) -> bool {
        self.path == PathKind::Deep
    }

    /// Human-readable reasoning trace.
    pub fn reasoning(&self) -> Vec<String> {
        if self.reasons.is_empty() {
            return vec!["no ambiguity signals".to_string()];
        }
        self.reasons.iter().map(ToString::to_string).collect()
    }
}

/// Router thresholds and confidence model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Texts at least this long (in characters) count as long.
    pub short_text_threshold: usize,
    /// Texts with at least this many clauses count as multi-clause.
    pub multi_clause_threshold: usize,
    /// Most soft reasons tolerated on the fast path.
    pub max_soft_reasons: usize,
    /// Fast-path confidence with no reasons at all.
    pub fast_confidence: f64,
    /// Fast-path confidence lost per soft reason.
    pub soft_reason_penalty: f64,
    /// Deep-path confidence with a single reason.
    pub deep_confidence: f64,
    /// Deep-path confidence lost per additional reason.
    pub ambiguity_penalty: f64,
    /// Lower bound of deep-path confidence.
    pub min_confidence: f64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            short_text_threshold: 80,
            multi_clause_threshold: 3,
            max_soft_reasons: 1,
            fast_confidence: 0.95,
            soft_reason_penalty: 0.05,
            deep_confidence: 0.9,
            ambiguity_penalty: 0.08,
            min_confidence: 0.5,
        }
    }
}

impl RouterConfig {
    /// Checks confidences are in `[0, 1]` and thresholds are positive.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("fast_confidence", self.fast_confidence),
            ("soft_reason_penalty", self.soft_reason_penalty),
            ("deep_confidence", self.deep_confidence),
            ("ambiguity_penalty", self.ambiguity_penalty),
            ("min_confidence", self.min_confidence),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(EthicsError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.short_text_threshold == 0 || self.multi_clause_threshold == 0 {
            return Err(EthicsError::InvalidConfig(
                "routing thresholds must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Decides between the fast and deep path. Pure.
#[derive(Debug, Clone, Default)]
pub struct PathRouter {
    config: RouterConfig,
}

impl PathRouter {
    /// Create a router with default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a router with a validated configuration
    pub fn with_config(config: RouterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Route one request.
    pub fn route(&self, signals: &SignalSet, features: &TextFeatures) -> RoutingDecision {
        let c = &self.config;

        let mut forcing: Vec<RouteReason> = signals
            .categories()
            .into_iter()
            .map(|name| RouteReason::CategoryMatch(name.to_string()))
            .collect();
        forcing.extend(features.contrast_connectives.iter().cloned().map(RouteReason::ContrastConnective));
        forcing.extend(features.ethical_terms.iter().cloned().map(RouteReason::EthicalVocabulary));
        if features.clause_count >= c.multi_clause_threshold {
            forcing.push(RouteReason::MultiClause(features.clause_count));
        }

        let mut soft = Vec::new();
        if features.char_len >= c.short_text_threshold {
            soft.push(RouteReason::LongText(features.char_len));
        }
        if features.decision_question {
            soft.push(RouteReason::DecisionQuestion);
        }
        soft.extend(features.purpose_connectives.iter().cloned().map(RouteReason::PurposeConnective));

        let decision = if forcing.is_empty() && soft.len() <= c.max_soft_reasons {
            RoutingDecision {
                path: PathKind::Fast,
                confidence: (c.fast_confidence - c.soft_reason_penalty * soft.len() as f64).clamp(0.0, 1.0),
                reasons: soft,
            }
        } else {
            let total = forcing.len() + soft.len();
            let confidence = c.deep_confidence - c.ambiguity_penalty * total.saturating_sub(1) as f64;
            forcing.extend(soft);
            RoutingDecision {
                path: PathKind::Deep,
                confidence: confidence.max(c.min_confidence).clamp(0.0, 1.0),
                reasons: forcing,
            }
        };

        debug!(
            path = %decision.path,
            confidence = decision.confidence,
            reasons = decision.reasons.len(),
            "request routed"
        );
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use align_signals::SignalExtractor;

    fn route(text: &str) -> RoutingDecision {
        let extractor = SignalExtractor::new().unwrap();
        PathRouter::new().route(&extractor.extract(text), &extractor.features(text))
    }

    #[test]
    fn test_simple_question_goes_fast() {
        let decision = route("Wie spät ist es?");
        assert!(decision.is_fast());
        assert!((decision.confidence - 0.95).abs() < 1e-9);
        assert!(decision.reasons.is_empty());
    }

    #[test]
    fn test_category_forces_deep() {
        let decision = route("schaden");
        assert!(decision.is_deep());
        assert_eq!(decision.reasons, vec![RouteReason::CategoryMatch("harm".to_string())]);
        assert!((decision.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_contrast_connective_forces_deep() {
        let decision = route("Ich mag Kaffee, aber keinen Tee");
        assert!(decision.is_deep());
        assert!(decision.reasons.contains(&RouteReason::ContrastConnective("aber".to_string())));
    }

    #[test]
    fn test_ethical_vocabulary_forces_deep() {
        assert!(route("Is this moral").is_deep());
    }

    #[test]
    fn test_multi_clause_forces_deep() {
        let decision = route("Ich gehe heim, esse etwas und schlafe");
        assert!(decision.is_deep());
        assert!(decision.reasons.contains(&RouteReason::MultiClause(3)));
    }

    #[test]
    fn test_single_soft_reason_stays_fast() {
        let decision = route("Should I take the bus");
        assert!(decision.is_fast());
        assert_eq!(decision.reasons, vec![RouteReason::DecisionQuestion]);
        assert!((decision.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_two_soft_reasons_go_deep() {
        let decision = route("Should I take the bus in order to arrive early");
        assert!(decision.is_deep());
        assert_eq!(decision.reasons.len(), 2);
        assert!((decision.confidence - 0.82).abs() < 1e-9);
    }

    #[test]
    fn test_decision_with_conflict() {
        let decision = route("Soll ich lügen um zu helfen?");
        assert!(decision.is_deep());
        // dependency, truth, decision question, purpose connective
        assert_eq!(decision.reasons.len(), 4);
        assert!(decision.reasons[0].is_forcing());
        assert!((decision.confidence - 0.66).abs() < 1e-9);
    }

    #[test]
    fn test_deep_confidence_is_floored() {
        let decision = route(
            "schaden, lügen, daten, helfen, manipulieren, aber moralisch ein dilemma, jedoch ethisch",
        );
        assert!(decision.is_deep());
        assert!((decision.confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_routing_is_pure() {
        assert_eq!(route("Soll ich lügen?"), route("Soll ich lügen?"));
    }

    #[test]
    fn test_reasoning_trace() {
        assert_eq!(route("Wie spät ist es?").reasoning(), vec!["no ambiguity signals"]);
        let trace = route("schaden").reasoning();
        assert_eq!(trace, vec!["conflict category 'harm' matched"]);
    }

    #[test]
    fn test_config_validation() {
        let bad = RouterConfig { fast_confidence: 1.2, ..RouterConfig::default() };
        assert!(PathRouter::with_config(bad).is_err());
        let bad = RouterConfig { short_text_threshold: 0, ..RouterConfig::default() };
        assert!(PathRouter::with_config(bad).is_err());
    }
}

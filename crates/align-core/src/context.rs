//! Per-request context.

use align_signals::PrincipleKey;
use serde::{Deserialize, Serialize};

/// Numeric settings a single request may override.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    /// Simulation depth limit. Clamped to the ceiling.
    pub max_depth: Option<usize>,
    /// Weighted risk above this requires an alternative response.
    pub risk_threshold: Option<f64>,
    /// Scores below this are violations, for scoring and simulation alike.
    pub violation_threshold: Option<f64>,
    /// Per-level dampening of child risk.
    pub dampening_base: Option<f64>,
}

impl ConfigOverrides {
    /// Returns true if nothing is overridden.
    pub fn is_empty(&self) -> bool {
        self.max_depth.is_none()
            && self.risk_threshold.is_none()
            && self.violation_threshold.is_none()
            && self.dampening_base.is_none()
    }

    /// Returns the name of the first non-finite value, if any.
    pub(crate) fn non_finite(&self) -> Option<&'static str> {
        [
            ("risk_threshold", self.risk_threshold),
            ("violation_threshold", self.violation_threshold),
            ("dampening_base", self.dampening_base),
        ]
        .into_iter()
        .find(|(_, v)| v.is_some_and(|v| !v.is_finite()))
        .map(|(name, _)| name)
    }
}

/// Everything the caller knows about a request besides its text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestContext {
    /// Per-request configuration overrides.
    pub overrides: ConfigOverrides,
    /// Long-horizon risk estimate from an outer planner, in `[0, 1]`.
    pub long_horizon_risk: Option<f64>,
    /// Principle the caller treats as primary.
    pub anchor: Option<PrincipleKey>,
    /// Principles that lost in an earlier trade-off.
    pub tradeoffs: Vec<PrincipleKey>,
    /// Draft response to simulate together with the request.
    pub draft_response: Option<String>,
}

impl RequestContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the simulation depth limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.overrides.max_depth = Some(max_depth);
        self
    }

    /// Overrides the risk threshold.
    pub fn with_risk_threshold(mut self, threshold: f64) -> Self {
        self.overrides.risk_threshold = Some(threshold);
        self
    }

    /// Overrides the violation threshold.
    pub fn with_violation_threshold(mut self, threshold: f64) -> Self {
        self.overrides.violation_threshold = Some(threshold);
        self
    }

    /// Overrides the dampening base.
    pub fn with_dampening_base(mut self, base: f64) -> Self {
        self.overrides.dampening_base = Some(base);
        self
    }

    /// Adds a long-horizon risk estimate.
    pub fn with_long_horizon_risk(mut self, risk: f64) -> Self {
        self.long_horizon_risk = Some(risk);
        self
    }

    /// Sets the anchor principle.
    pub fn with_anchor(mut self, anchor: PrincipleKey) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Sets the trade-off losers.
    pub fn with_tradeoffs(mut self, tradeoffs: Vec<PrincipleKey>) -> Self {
        self.tradeoffs = tradeoffs;
        self
    }

    /// Adds a draft response.
    pub fn with_draft_response(mut self, draft: impl Into<String>) -> Self {
        self.draft_response = Some(draft.into());
        self
    }

    /// The text the simulator explores: the request, joined with the draft
    /// response when there is one.
    pub fn simulation_seed(&self, text: &str) -> String {
        match &self.draft_response {
            Some(draft) if !draft.trim().is_empty() => format!("{text} -> {draft}"),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_empty_by_default() {
        assert!(RequestContext::new().overrides.is_empty());
        assert!(!RequestContext::new().with_max_depth(1).overrides.is_empty());
    }

    #[test]
    fn test_non_finite_detection() {
        let ctx = RequestContext::new().with_risk_threshold(f64::NAN);
        assert_eq!(ctx.overrides.non_finite(), Some("risk_threshold"));
        assert_eq!(RequestContext::new().with_risk_threshold(0.4).overrides.non_finite(), None);
    }

    #[test]
    fn test_simulation_seed() {
        let ctx = RequestContext::new();
        assert_eq!(ctx.simulation_seed("frage"), "frage");
        let ctx = ctx.with_draft_response("antwort");
        assert_eq!(ctx.simulation_seed("frage"), "frage -> antwort");
        let blank = RequestContext::new().with_draft_response("  ");
        assert_eq!(blank.simulation_seed("frage"), "frage");
    }

    #[test]
    fn test_context_deserializes_partially() {
        let ctx: RequestContext =
            serde_json::from_str(r#"{"anchor": "integrity", "overrides": {"max_depth": 1}}"#).unwrap();
        assert_eq!(ctx.anchor, Some(PrincipleKey::Integrity));
        assert_eq!(ctx.overrides.max_depth, Some(1));
        assert!(ctx.tradeoffs.is_empty());
    }
}

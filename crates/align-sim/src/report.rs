//! Simulation results and risk summaries.

use align_signals::PrincipleKey;
use serde::{Deserialize, Serialize};

/// Outcome of exploring one action and its follow-ups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Principles in conflict anywhere in the explored tree, deduplicated,
    /// in order of discovery.
    pub conflicts: Vec<PrincipleKey>,
    /// Risk level in `[0, 1]`.
    pub risk_level: f64,
    /// Deepest level explored, never above the configured maximum.
    pub depth: usize,
    /// Confidence in `[confidence_floor, 1]`.
    pub confidence: f64,
    /// Whether some branch stopped at the depth limit.
    pub depth_exhausted: bool,
    /// Categories matched anywhere in the tree, deduplicated.
    pub patterns_matched: Vec<String>,
    /// Follow-up actions spawned directly by this node.
    pub follow_ups: usize,
    /// Nodes explored, this one included.
    pub nodes_visited: usize,
}

impl SimulationResult {
    /// Result of a node at the depth limit.
    pub(crate) fn exhausted(depth: usize, confidence: f64) -> Self {
        Self {
            conflicts: Vec::new(),
            risk_level: 0.0,
            depth,
            confidence,
            depth_exhausted: true,
            patterns_matched: Vec::new(),
            follow_ups: 0,
            nodes_visited: 1,
        }
    }

    /// Returns true if any conflict was found.
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Returns true if risk and confidence are finite.
    pub fn is_finite(&self) -> bool {
        self.risk_level.is_finite() && self.confidence.is_finite()
    }
}

/// Profile-weighted view of a simulation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    /// Risk scaled by the mean weight of the conflicted principles, in `[0, 1]`.
    pub weighted_risk: f64,
    /// Weighted risk exceeded the risk threshold.
    pub requires_alternative: bool,
    /// First conflict found, if any.
    pub main_conflict: Option<PrincipleKey>,
    /// Human-readable explanation.
    pub explanation: String,
}

/// Builds the explanation text for a result.
pub(crate) fn explain(result: &SimulationResult, requires_alternative: bool) -> String {
    let mut parts = Vec::new();

    match result.conflicts.split_first() {
        None => parts.push("No ethical conflicts identified".to_string()),
        Some((main, [])) => parts.push(format!("Main conflict area: {}", main)),
        Some((main, rest)) => parts.push(format!(
            "Main conflict area: {} (+{} more)",
            main,
            rest.len()
        )),
    }

    let percent = result.risk_level * 100.0;
    if result.risk_level >= 0.7 {
        parts.push(format!("High risk ({:.0}%)", percent));
    } else if result.risk_level >= 0.4 {
        parts.push(format!("Moderate risk ({:.0}%)", percent));
    } else if result.has_conflicts() {
        parts.push(format!("Low risk ({:.0}%)", percent));
    }

    if result.confidence < 0.8 {
        parts.push(format!("Limited confidence ({:.0}%)", result.confidence * 100.0));
    }
    if result.depth_exhausted {
        parts.push("Simulation stopped at the depth limit".to_string());
    }
    if requires_alternative {
        parts.push("An alternative response is recommended".to_string());
    }

    parts.join(". ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(conflicts: Vec<PrincipleKey>, risk: f64, confidence: f64) -> SimulationResult {
        SimulationResult {
            conflicts,
            risk_level: risk,
            depth: 1,
            confidence,
            depth_exhausted: false,
            patterns_matched: Vec::new(),
            follow_ups: 0,
            nodes_visited: 1,
        }
    }

    #[test]
    fn test_explain_no_conflicts() {
        assert_eq!(explain(&result(vec![], 0.0, 1.0), false), "No ethical conflicts identified");
    }

    #[test]
    fn test_explain_high_risk() {
        let r = result(vec![PrincipleKey::Integrity, PrincipleKey::Nurturing], 0.9, 0.9);
        let text = explain(&r, true);
        assert!(text.starts_with("Main conflict area: integrity (+1 more)"));
        assert!(text.contains("High risk (90%)"));
        assert!(text.ends_with("An alternative response is recommended"));
    }

    #[test]
    fn test_explain_low_confidence_and_depth() {
        let mut r = result(vec![PrincipleKey::Learning], 0.2, 0.6);
        r.depth_exhausted = true;
        let text = explain(&r, false);
        assert!(text.contains("Low risk (20%)"));
        assert!(text.contains("Limited confidence (60%)"));
        assert!(text.contains("depth limit"));
    }

    #[test]
    fn test_exhausted_constructor() {
        let r = SimulationResult::exhausted(3, 0.8);
        assert!(r.depth_exhausted);
        assert!(!r.has_conflicts());
        assert_eq!(r.risk_level, 0.0);
        assert_eq!(r.depth, 3);
    }
}

//! Recursive consequence simulator.
//!
//! Explores an action and the follow-up actions its conflicts imply, up to
//! a fixed depth. Each node:
//!
//! 1. stops at the depth limit with zero risk and a fixed confidence,
//! 2. matches the action against the category library,
//! 3. folds in upstream scores, trade-offs, anchor and long-horizon risk
//!    (root only),
//! 4. recurses into every follow-up at `depth + 1`, dampening child risk,
//! 5. decays confidence per follow-up,
//! 6. clamps risk to `[0, 1]` and floors confidence.
//!
//! Recursion uses the call stack. The depth is bounded by
//! [`MAX_DEPTH_CEILING`](crate::MAX_DEPTH_CEILING), so the stack is too.

use std::sync::Arc;

use align_ethics::{EthicsAssessment, WeightProfile};
use align_signals::{CategoryLibrary, PrincipleKey};
use tracing::{debug, trace, warn};

use crate::config::SimulatorConfig;
use crate::error::Result;
use crate::report::{explain, RiskSummary, SimulationResult};

/// What the earlier pipeline stages know about a request.
///
/// Only the root node sees the upstream context; follow-ups are simulated
/// on their text alone.
#[derive(Debug, Clone, Default)]
pub struct Upstream<'a> {
    /// Per-principle scores from the ethics scorer.
    pub assessment: Option<&'a EthicsAssessment>,
    /// Long-horizon risk estimate in `[0, 1]`.
    pub long_horizon_risk: Option<f64>,
    /// Principle the caller treats as primary.
    pub anchor: Option<PrincipleKey>,
    /// Principles that lost in an earlier trade-off.
    pub tradeoffs: Vec<PrincipleKey>,
}

impl<'a> Upstream<'a> {
    /// Upstream context carrying an ethics assessment.
    pub fn from_assessment(assessment: &'a EthicsAssessment) -> Self {
        Self {
            assessment: Some(assessment),
            ..Self::default()
        }
    }

    /// Sets the long-horizon risk estimate.
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
}

/// Depth-bounded consequence explorer.
///
/// Holds no mutable state: one instance can serve any number of concurrent
/// requests.
#[derive(Debug, Clone)]
pub struct ConsequenceSimulator {
    library: Arc<CategoryLibrary>,
    config: SimulatorConfig,
}

impl ConsequenceSimulator {
    /// Creates a simulator with the default configuration.
    pub fn new(library: Arc<CategoryLibrary>) -> Self {
        Self {
            library,
            config: SimulatorConfig::default(),
        }
    }

    /// Creates a simulator with a validated configuration.
    pub fn with_config(library: Arc<CategoryLibrary>, config: SimulatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { library, config })
    }

    /// Same library, different configuration.
    pub fn reconfigured(&self, config: SimulatorConfig) -> Result<Self> {
        Self::with_config(Arc::clone(&self.library), config)
    }

    /// The active configuration.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Simulates `action` from the root.
    pub fn simulate(&self, action: &str, upstream: &Upstream<'_>) -> SimulationResult {
        let result = self.simulate_at(action, upstream, 0);
        debug!(
            risk = result.risk_level,
            depth = result.depth,
            conflicts = ?result.conflicts,
            nodes = result.nodes_visited,
            "consequence simulation finished"
        );
        result
    }

    /// Simulates `action` as if it were found at `depth`.
    pub fn simulate_at(&self, action: &str, upstream: &Upstream<'_>, depth: usize) -> SimulationResult {
        let c = &self.config;
        if depth >= c.max_depth {
            trace!(depth, "depth limit reached");
            return SimulationResult::exhausted(depth.min(c.max_depth), c.exhausted_confidence);
        }

        let mut conflicts: Vec<PrincipleKey> = Vec::new();
        let mut patterns: Vec<String> = Vec::new();
        let mut follow_ups: Vec<String> = Vec::new();
        let mut risk = 0.0;

        for category in self.library.matching(action) {
            for principle in category.principles() {
                push_unique(&mut conflicts, principle);
            }
            push_unique(&mut patterns, category.name.clone());
            follow_ups.push(category.follow_up.clone());
            risk += category.risk_weight;
        }

        if let Some(assessment) = upstream.assessment {
            for (&principle, &score) in &assessment.scores {
                if score < c.violation_threshold {
                    push_unique(&mut conflicts, principle);
                    risk += (c.violation_threshold - score) * c.low_score_risk_factor;
                    if score < c.critical_threshold {
                        follow_ups.push(format!("critically low {} score", principle));
                    }
                }
            }
        }

        for &principle in &upstream.tradeoffs {
            if push_unique(&mut conflicts, principle) {
                risk += c.tradeoff_risk;
            }
        }

        if let Some(anchor) = upstream.anchor {
            if conflicts.contains(&anchor) {
                risk += c.anchor_risk;
                follow_ups.push(format!("conflict with anchor principle {}", anchor));
            }
        }

        let mut risk: f64 = risk.min(1.0);

        if let Some(horizon) = upstream.long_horizon_risk.filter(|r| r.is_finite()) {
            if horizon > c.long_horizon_trigger {
                risk = risk.max(horizon * c.long_horizon_factor);
                push_unique(&mut conflicts, PrincipleKey::Awareness);
            }
        }

        let mut confidence: f64 = 1.0;
        let mut deepest = depth;
        let mut exhausted = false;
        let mut nodes = 1;
        let dampening = c.dampening_base.powi(depth as i32 + 1);
        let direct = follow_ups.len();

        for follow_up in &follow_ups {
            let child = self.simulate_at(follow_up, &Upstream::default(), depth + 1);
            for principle in child.conflicts {
                push_unique(&mut conflicts, principle);
            }
            for pattern in child.patterns_matched {
                push_unique(&mut patterns, pattern);
            }
            risk = risk.max(child.risk_level * dampening);
            confidence *= c.confidence_decay;
            deepest = deepest.max(child.depth);
            exhausted |= child.depth_exhausted;
            nodes += child.nodes_visited;
        }

        trace!(depth, risk, follow_ups = direct, "node explored");

        SimulationResult {
            conflicts,
            risk_level: risk.clamp(0.0, 1.0),
            depth: deepest,
            confidence: confidence.max(c.confidence_floor),
            depth_exhausted: exhausted,
            patterns_matched: patterns,
            follow_ups: direct,
            nodes_visited: nodes,
        }
    }

    /// Weighs a result by the profile and decides whether an alternative
    /// response is required.
    pub fn summarize(&self, result: &SimulationResult, profile: &WeightProfile) -> RiskSummary {
        let mean_weight = profile.mean_of(&result.conflicts).unwrap_or(1.0);
        let weighted_risk = (result.risk_level * mean_weight).clamp(0.0, 1.0);
        let requires_alternative = weighted_risk > self.config.risk_threshold;

        if requires_alternative {
            warn!(
                weighted_risk,
                threshold = self.config.risk_threshold,
                "simulated risk exceeds threshold"
            );
        }

        RiskSummary {
            weighted_risk,
            requires_alternative,
            main_conflict: result.conflicts.first().copied(),
            explanation: explain(result, requires_alternative),
        }
    }
}

/// Appends `item` unless present. Returns true if it was added.
fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) -> bool {
    if items.contains(&item) {
        false
    } else {
        items.push(item);
        true
    }
}

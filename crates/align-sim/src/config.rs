//! # Simulator Configuration
//!
//! ## Risk Model
//!
//! | Source | Contribution |
//! |--------|--------------|
//! | matched category | its risk weight |
//! | upstream score below `violation_threshold` | `(threshold - score) × low_score_risk_factor` |
//! | upstream trade-off loser | `tradeoff_risk` |
//! | upstream anchor principle in conflict | `anchor_risk` |
//! | long-horizon estimate above `long_horizon_trigger` | at least `estimate × long_horizon_factor` |
//! | follow-up at depth `d + 1` | child risk × `dampening_base^(d + 1)` |
//!
//! ## Depth Budget
//!
//! Recursion depth is bounded twice: by `max_depth` from configuration and by
//! the compile-time [`MAX_DEPTH_CEILING`]. A configuration above the ceiling
//! is rejected.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Hard upper bound on `max_depth`.
pub const MAX_DEPTH_CEILING: usize = 8;

/// Lowest allowed `confidence_floor`.
pub const MIN_CONFIDENCE_FLOOR: f64 = 0.5;

/// Consequence simulator parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Depth at which exploration stops.
    pub max_depth: usize,
    /// Per-level dampening of child risk.
    pub dampening_base: f64,
    /// Confidence multiplier per explored follow-up.
    pub confidence_decay: f64,
    /// Lowest confidence a result can report.
    pub confidence_floor: f64,
    /// Confidence reported by a node at the depth limit.
    pub exhausted_confidence: f64,
    /// Upstream scores below this become conflicts.
    pub violation_threshold: f64,
    /// Upstream scores below this also spawn a follow-up.
    pub critical_threshold: f64,
    /// Risk per point of score below the violation threshold.
    pub low_score_risk_factor: f64,
    /// Long-horizon estimates above this raise risk.
    pub long_horizon_trigger: f64,
    /// Share of the long-horizon estimate kept as risk.
    pub long_horizon_factor: f64,
    /// Risk added per upstream trade-off loser.
    pub tradeoff_risk: f64,
    /// Risk added when the anchor principle is in conflict.
    pub anchor_risk: f64,
    /// Weighted risk above this requires an alternative response.
    pub risk_threshold: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            dampening_base: 0.8,
            confidence_decay: 0.95,
            confidence_floor: 0.5,
            exhausted_confidence: 0.8,
            violation_threshold: 0.5,
            critical_threshold: 0.3,
            low_score_risk_factor: 0.5,
            long_horizon_trigger: 0.5,
            long_horizon_factor: 0.7,
            tradeoff_risk: 0.15,
            anchor_risk: 0.2,
            risk_threshold: 0.7,
        }
    }
}

impl SimulatorConfig {
    /// Sets the maximum depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the dampening base.
    pub fn with_dampening_base(mut self, base: f64) -> Self {
        self.dampening_base = base;
        self
    }

    /// Sets the risk threshold.
    pub fn with_risk_threshold(mut self, threshold: f64) -> Self {
        self.risk_threshold = threshold;
        self
    }

    /// Sets the violation threshold.
    pub fn with_violation_threshold(mut self, threshold: f64) -> Self {
        self.violation_threshold = threshold;
        self
    }

    /// Checks the depth ceiling and numeric ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth > MAX_DEPTH_CEILING {
            return Err(SimError::DepthCeilingExceeded {
                requested: self.max_depth,
                ceiling: MAX_DEPTH_CEILING,
            });
        }

        if !self.dampening_base.is_finite() || self.dampening_base <= 0.0 || self.dampening_base > 1.0 {
            return Err(SimError::InvalidParameter {
                name: "dampening_base",
                value: self.dampening_base,
            });
        }

        let unit = [
            ("confidence_decay", self.confidence_decay),
            ("confidence_floor", self.confidence_floor),
            ("exhausted_confidence", self.exhausted_confidence),
            ("violation_threshold", self.violation_threshold),
            ("critical_threshold", self.critical_threshold),
            ("low_score_risk_factor", self.low_score_risk_factor),
            ("long_horizon_trigger", self.long_horizon_trigger),
            ("long_horizon_factor", self.long_horizon_factor),
            ("tradeoff_risk", self.tradeoff_risk),
            ("anchor_risk", self.anchor_risk),
            ("risk_threshold", self.risk_threshold),
        ];
        for (name, value) in unit {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(SimError::InvalidParameter { name, value });
            }
        }

        if self.confidence_floor < MIN_CONFIDENCE_FLOOR {
            return Err(SimError::InvalidParameter {
                name: "confidence_floor",
                value: self.confidence_floor,
            });
        }
        if self.exhausted_confidence < self.confidence_floor {
            return Err(SimError::InvalidParameter {
                name: "exhausted_confidence",
                value: self.exhausted_confidence,
            });
        }
        Ok(())
    }
}

//! Decision records returned by the engine.

use std::fmt;

use align_ethics::{EthicsAssessment, PathKind, RoutingDecision};
use align_signals::PrincipleKey;
use align_sim::{RiskSummary, SimulationResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How the response should be delivered.
///
/// - `Normal`: answer as usual
/// - `Cautious`: answer, but point out the conflict
/// - `Refusal`: decline and suggest an alternative
/// - `Clarification`: the request was empty or unreadable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseTone {
    /// No concerns.
    #[default]
    Normal,
    /// Conflicts worth mentioning.
    Cautious,
    /// Conflicts severe enough to decline.
    Refusal,
    /// Nothing to evaluate.
    Clarification,
}

impl ResponseTone {
    /// Tone for the lowest principle score of an assessment.
    pub fn from_lowest_score(score: f64, refusal_below: f64, cautious_up_to: f64) -> Self {
        if score < refusal_below {
            Self::Refusal
        } else if score <= cautious_up_to {
            Self::Cautious
        } else {
            Self::Normal
        }
    }
}

impl fmt::Display for ResponseTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Normal => "normal",
            Self::Cautious => "cautious",
            Self::Refusal => "refusal",
            Self::Clarification => "clarification",
        };
        f.write_str(s)
    }
}

/// The outcome of one request.
///
/// Always produced, including for empty input and internal failures.
/// Optional parts are absent when the path that fills them was not taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    /// Unique decision id.
    pub id: Uuid,
    /// When the decision was made.
    pub timestamp: DateTime<Utc>,
    /// Path the request took.
    pub path: PathKind,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Response text.
    pub response: String,
    /// Response tone.
    pub tone: ResponseTone,
    /// Router output. Absent for clarification records.
    pub routing: Option<RoutingDecision>,
    /// Deep path only.
    pub ethics: Option<EthicsAssessment>,
    /// Deep path only.
    pub simulation: Option<SimulationResult>,
    /// Deep path only.
    pub risk: Option<RiskSummary>,
    /// Assessment violations followed by simulated conflicts, deduplicated.
    pub violations: Vec<PrincipleKey>,
    /// The deep path failed and this is a generic cautious record.
    pub fallback: bool,
}

impl DecisionRecord {
    /// New record with a fresh id and timestamp. Everything optional is empty.
    pub(crate) fn new(path: PathKind, confidence: f64, response: String, tone: ResponseTone) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            path,
            confidence: confidence.clamp(0.0, 1.0),
            response,
            tone,
            routing: None,
            ethics: None,
            simulation: None,
            risk: None,
            violations: Vec::new(),
            fallback: false,
        }
    }

    /// Returns true if the request took the fast path.
    pub fn is_fast(&self) -> bool {
        self.path == PathKind::Fast
    }

    /// Returns true if the request took the deep path.
    pub fn is_deep(&self) -> bool {
        self.path == PathKind::Deep
    }

    /// Returns true if this is a fallback record.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// Returns true if the risk summary asks for an alternative response.
    pub fn requires_alternative(&self) -> bool {
        self.risk.as_ref().is_some_and(|r| r.requires_alternative)
    }

    /// Returns true if `principle` is among the merged violations.
    pub fn is_violated(&self, principle: PrincipleKey) -> bool {
        self.violations.contains(&principle)
    }
}

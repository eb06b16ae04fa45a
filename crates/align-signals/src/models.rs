//! # Core Types for Signal Extraction
//!
//! This module defines the data types shared by the extractor, the scorer
//! and the simulator: conflict categories, the signals they produce when a
//! request mentions them, and the errors raised while loading a category
//! library.
//!
//! ## Design Principles
//!
//! 1. **Closed principle set** - every signal points at one or two [`PrincipleKey`]s
//! 2. **Literal detection** - a category matches on trigger substrings, nothing more
//! 3. **Serializable** - all types derive Serde traits for logging and audit trails

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::principle::PrincipleKey;

/// How severe a conflict category is.
///
/// Critical categories affect every principle, not only the ones they name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Penalizes the named principles only.
    #[default]
    Warning,
    /// Penalizes the named principles and spreads to all others.
    Critical,
}

/// A named family of ethically loaded phrases.
///
/// Categories are configuration: they are loaded once, validated by
/// [`CategoryLibrary`](crate::CategoryLibrary) and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictCategory {
    /// Unique category name (e.g. `"harm"`).
    pub name: String,
    /// Trigger substrings, matched case-insensitively.
    pub triggers: Vec<String>,
    /// Principle that takes the full penalty.
    pub primary: PrincipleKey,
    /// Principle that takes a reduced share of the penalty.
    #[serde(default)]
    pub secondary: Option<PrincipleKey>,
    /// Signal strength and direct simulation risk, in `[0, 1]`.
    pub risk_weight: f64,
    /// Severity class.
    #[serde(default)]
    pub severity: Severity,
    /// Whether an explicit negation ("without harming") cancels the signal.
    #[serde(default)]
    pub negatable: bool,
    /// Downstream action explored by the consequence simulator.
    pub follow_up: String,
}

impl ConflictCategory {
    /// Creates a warning-level category without a secondary principle.
    pub fn new(
        name: impl Into<String>,
        primary: PrincipleKey,
        risk_weight: f64,
        follow_up: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            triggers: Vec::new(),
            primary,
            secondary: None,
            risk_weight,
            severity: Severity::Warning,
            negatable: false,
            follow_up: follow_up.into(),
        }
    }

    /// Adds trigger substrings.
    pub fn with_triggers<I, S>(mut self, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.triggers.extend(triggers.into_iter().map(Into::into));
        self
    }

    /// Sets the secondary principle.
    pub fn with_secondary(mut self, secondary: PrincipleKey) -> Self {
        self.secondary = Some(secondary);
        self
    }

    /// Marks the category as critical.
    pub fn critical(mut self) -> Self {
        self.severity = Severity::Critical;
        self
    }

    /// Marks the category as cancellable by explicit negation.
    pub fn negatable(mut self) -> Self {
        self.negatable = true;
        self
    }

    /// Principles named by this category, primary first.
    pub fn principles(&self) -> impl Iterator<Item = PrincipleKey> + '_ {
        std::iter::once(self.primary).chain(self.secondary)
    }
}

/// One matched category in a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Name of the matched category.
    pub category: String,
    /// Principle taking the full penalty.
    pub primary: PrincipleKey,
    /// Principle taking a reduced share.
    pub secondary: Option<PrincipleKey>,
    /// Signal strength (the category risk weight).
    pub strength: f64,
    /// Severity of the matched category.
    pub severity: Severity,
    /// Whether explicit negation cancels the signal.
    pub negatable: bool,
    /// Follow-up action for the simulator.
    pub follow_up: String,
}

impl From<&ConflictCategory> for Signal {
    fn from(category: &ConflictCategory) -> Self {
        Self {
            category: category.name.clone(),
            primary: category.primary,
            secondary: category.secondary,
            strength: category.risk_weight,
            severity: category.severity,
            negatable: category.negatable,
            follow_up: category.follow_up.clone(),
        }
    }
}

impl Signal {
    /// Returns true for critical-severity signals.
    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}

/// All signals extracted from one request, in library order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalSet {
    signals: Vec<Signal>,
}

impl SignalSet {
    /// Creates a signal set from already matched signals.
    pub fn new(signals: Vec<Signal>) -> Self {
        Self { signals }
    }

    /// Returns true when no category matched.
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Number of matched categories.
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    /// Iterates over the signals.
    pub fn iter(&self) -> std::slice::Iter<'_, Signal> {
        self.signals.iter()
    }

    /// Names of the matched categories.
    pub fn categories(&self) -> Vec<&str> {
        self.signals.iter().map(|s| s.category.as_str()).collect()
    }

    /// Returns true if the named category matched.
    pub fn contains(&self, category: &str) -> bool {
        self.signals.iter().any(|s| s.category == category)
    }

    /// Groups matches by principle: principle -> [(category, strength)].
    ///
    /// Both primary and secondary principles are listed.
    pub fn by_principle(&self) -> BTreeMap<PrincipleKey, Vec<(&str, f64)>> {
        let mut grouped: BTreeMap<PrincipleKey, Vec<(&str, f64)>> = BTreeMap::new();
        for signal in &self.signals {
            let entry = (signal.category.as_str(), signal.strength);
            grouped.entry(signal.primary).or_default().push(entry);
            if let Some(secondary) = signal.secondary {
                grouped.entry(secondary).or_default().push(entry);
            }
        }
        grouped
    }

    /// Sum of all signal strengths.
    pub fn total_strength(&self) -> f64 {
        self.signals.iter().map(|s| s.strength).sum()
    }
}

impl<'a> IntoIterator for &'a SignalSet {
    type Item = &'a Signal;
    type IntoIter = std::slice::Iter<'a, Signal>;

    fn into_iter(self) -> Self::IntoIter {
        self.signals.iter()
    }
}

/// Errors raised while building a category library or phrase matcher.
#[derive(Debug, Error)]
pub enum CategoryError {
    /// A category has no trigger phrases.
    #[error("category '{0}' has no triggers")]
    EmptyTriggers(String),

    /// A trigger is empty or whitespace only.
    #[error("category '{0}' contains a blank trigger")]
    BlankTrigger(String),

    /// Risk weight outside `[0, 1]` or not finite.
    #[error("category '{name}' has invalid risk weight {weight}")]
    InvalidRiskWeight {
        /// Category name
        name: String,
        /// Offending weight
        weight: f64,
    },

    /// A category has no follow-up action.
    #[error("category '{0}' has an empty follow-up")]
    EmptyFollowUp(String),

    /// Two categories share a name.
    #[error("duplicate category '{0}'")]
    DuplicateCategory(String),

    /// A principle name could not be parsed.
    #[error("unknown principle '{0}'")]
    UnknownPrinciple(String),

    /// A trigger matcher failed to compile.
    #[error("pattern compilation failed: {0}")]
    Pattern(#[from] regex::Error),

    /// A library file could not be parsed.
    #[error("invalid category library: {0}")]
    Parse(#[from] serde_json::Error),
}

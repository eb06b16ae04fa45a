//! The decision engine.
//!
//! Wires extractor, router, scorer and simulator together and turns every
//! request into a [`DecisionRecord`]:
//!
//! ```text
//! text ──▶ extract ──▶ route ──┬── Fast ──▶ template response
//!                              │
//!                              └── Deep ──▶ assess ──▶ simulate ──▶ summarize
//!                                                                     │
//!                                            tone + merged violations ◀┘
//! ```
//!
//! The deep path runs inside a guard. An `Err` or a panic there becomes a
//! fallback record instead of reaching the caller.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use align_ethics::{EthicsScorer, PathKind, PathRouter, RoutingDecision, WeightProfile};
use align_signals::{CategoryLibrary, PrincipleKey, SignalExtractor, SignalSet};
use align_sim::{ConsequenceSimulator, Upstream, MAX_DEPTH_CEILING};
use tracing::{debug, error, info, warn};

use crate::config::EngineConfig;
use crate::context::{ConfigOverrides, RequestContext};
use crate::error::EngineError;
use crate::record::{DecisionRecord, ResponseTone};
use crate::response;
use crate::source::WeightProfileSource;
use crate::Result;

/// Smallest dampening base an override can set.
const MIN_DAMPENING: f64 = 0.01;

/// The ALIGN decision engine.
///
/// Immutable after construction and `Send + Sync`; share it by reference
/// or through an `Arc`.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    extractor: SignalExtractor,
    scorer: EthicsScorer,
    router: PathRouter,
    simulator: ConsequenceSimulator,
}

impl Engine {
    /// Creates an engine from a configuration.
    ///
    /// Fails if the configuration is invalid or the category library named
    /// by `categories_path` cannot be loaded.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let library = match &config.categories_path {
            Some(path) => {
                let json = std::fs::read_to_string(path)?;
                let library = CategoryLibrary::from_json(&json)?;
                info!(path = %path.display(), categories = library.len(), "custom category library loaded");
                library
            }
            None => CategoryLibrary::builtin()?,
        };
        let library = Arc::new(library);

        let extractor = SignalExtractor::with_library(Arc::clone(&library))?;
        let scorer = EthicsScorer::with_config(extractor.clone(), config.scorer.clone())?;
        let router = PathRouter::with_config(config.router.clone())?;
        let simulator = ConsequenceSimulator::with_config(library, config.simulation.clone())?;

        debug!(
            max_depth = config.simulation.max_depth,
            categories = extractor.library().len(),
            "engine initialized"
        );

        Ok(Self {
            config,
            extractor,
            scorer,
            router,
            simulator,
        })
    }

    /// Creates an engine with the default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(EngineConfig::default())
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The category library in use.
    pub fn categories(&self) -> &CategoryLibrary {
        self.extractor.library()
    }

    /// Decides on one request.
    ///
    /// Never fails. Empty input yields a clarification record and internal
    /// failures yield a fallback record.
    pub fn decide(&self, text: &str, profile: &WeightProfile, ctx: &RequestContext) -> DecisionRecord {
        if !text.chars().any(char::is_alphanumeric) {
            let record = DecisionRecord::new(
                PathKind::Fast,
                self.config.router.fast_confidence,
                response::clarification().to_string(),
                ResponseTone::Clarification,
            );
            info!(id = %record.id, "empty request, asking for clarification");
            return record;
        }

        let signals = self.extractor.extract(text);
        let features = self.extractor.features(text);
        let routing = self.router.route(&signals, &features);

        let record = match routing.path {
            PathKind::Fast => self.fast_record(text, routing),
            PathKind::Deep => match guarded(|| self.run_deep(text, &signals, profile, ctx, &routing)) {
                Ok(record) => record,
                Err(e) => {
                    error!(error = %e, "deep path failed, returning fallback");
                    self.fallback_record(routing)
                }
            },
        };

        info!(
            id = %record.id,
            path = %record.path,
            tone = %record.tone,
            confidence = record.confidence,
            violations = ?record.violations,
            fallback = record.fallback,
            "decision made"
        );
        record
    }

    /// Validates raw weights, then decides.
    ///
    /// Returns [`EngineError::InvalidProfile`] before any routing or scoring
    /// if a principle is missing, unknown, negative or not finite.
    pub fn decide_with_weights<K: AsRef<str>>(
        &self,
        text: &str,
        weights: &BTreeMap<K, f64>,
        ctx: &RequestContext,
    ) -> Result<DecisionRecord> {
        let profile = WeightProfile::from_named(weights)?;
        Ok(self.decide(text, &profile, ctx))
    }

    /// Loads a named profile from `source`, then decides.
    pub fn decide_with_source(
        &self,
        text: &str,
        source: &dyn WeightProfileSource,
        name: &str,
        ctx: &RequestContext,
    ) -> Result<DecisionRecord> {
        let profile = source.load(name)?;
        Ok(self.decide(text, &profile, ctx))
    }

    fn fast_record(&self, text: &str, routing: RoutingDecision) -> DecisionRecord {
        let mut record = DecisionRecord::new(
            PathKind::Fast,
            routing.confidence,
            response::fast_response(text, self.config.responses.snippet_chars),
            ResponseTone::Normal,
        );
        record.routing = Some(routing);
        record
    }

    fn fallback_record(&self, routing: RoutingDecision) -> DecisionRecord {
        let confidence = routing.confidence.min(self.config.responses.fallback_confidence);
        let mut record = DecisionRecord::new(
            PathKind::Deep,
            confidence,
            response::fallback().to_string(),
            ResponseTone::Cautious,
        );
        record.routing = Some(routing);
        record.fallback = true;
        record
    }

    fn run_deep(
        &self,
        text: &str,
        signals: &SignalSet,
        profile: &WeightProfile,
        ctx: &RequestContext,
        routing: &RoutingDecision,
    ) -> Result<DecisionRecord> {
        if let Some(name) = ctx.overrides.non_finite() {
            return Err(EngineError::Internal(format!("override {name} is not a finite number")));
        }
        let long_horizon_risk = match ctx.long_horizon_risk {
            Some(risk) if !risk.is_finite() => {
                return Err(EngineError::Internal("long-horizon risk is not a finite number".into()))
            }
            Some(risk) => Some(clamp_override("long_horizon_risk", risk, 0.0, 1.0)),
            None => None,
        };

        let (scorer, simulator) = self.configured(&ctx.overrides)?;

        let flags = self.extractor.context_flags(text);
        let assessment = scorer.assess_signals(signals, &flags, profile);
        if !assessment.is_finite() {
            return Err(EngineError::Internal("ethics assessment is not finite".into()));
        }

        let seed = ctx.simulation_seed(text);
        let upstream = Upstream {
            assessment: Some(&assessment),
            long_horizon_risk,
            anchor: ctx.anchor,
            tradeoffs: ctx.tradeoffs.clone(),
        };
        let simulation = simulator.simulate(&seed, &upstream);
        if !simulation.is_finite() {
            return Err(EngineError::Internal("simulation result is not finite".into()));
        }
        let risk = simulator.summarize(&simulation, profile);

        let mut violations: Vec<PrincipleKey> = assessment.violations.clone();
        for &principle in &simulation.conflicts {
            if !violations.contains(&principle) {
                violations.push(principle);
            }
        }

        let lowest = assessment.lowest();
        let responses = &self.config.responses;
        let mut tone = ResponseTone::from_lowest_score(
            lowest.map_or(1.0, |(_, score)| score),
            responses.refusal_below,
            responses.cautious_up_to,
        );
        if tone == ResponseTone::Normal && (risk.requires_alternative || !violations.is_empty()) {
            tone = ResponseTone::Cautious;
        }

        let main_violation = lowest.map(|(principle, _)| principle);
        let text_response = response::deep_response(text, responses.snippet_chars, tone, main_violation);
        let confidence = routing.confidence.min(simulation.confidence);

        debug!(
            overall = assessment.overall_score,
            risk = simulation.risk_level,
            weighted_risk = risk.weighted_risk,
            depth = simulation.depth,
            "deep path finished"
        );

        let mut record = DecisionRecord::new(PathKind::Deep, confidence, text_response, tone);
        record.routing = Some(routing.clone());
        record.ethics = Some(assessment);
        record.simulation = Some(simulation);
        record.risk = Some(risk);
        record.violations = violations;
        Ok(record)
    }

    /// Scorer and simulator with per-request overrides applied.
    fn configured(
        &self,
        overrides: &ConfigOverrides,
    ) -> Result<(Cow<'_, EthicsScorer>, Cow<'_, ConsequenceSimulator>)> {
        if overrides.is_empty() {
            return Ok((Cow::Borrowed(&self.scorer), Cow::Borrowed(&self.simulator)));
        }

        let mut scorer = Cow::Borrowed(&self.scorer);
        let mut sim_config = self.simulator.config().clone();

        if let Some(depth) = overrides.max_depth {
            if depth > MAX_DEPTH_CEILING {
                warn!(requested = depth, ceiling = MAX_DEPTH_CEILING, "max_depth override clamped");
            }
            sim_config.max_depth = depth.min(MAX_DEPTH_CEILING);
        }
        if let Some(threshold) = overrides.risk_threshold {
            sim_config.risk_threshold = clamp_override("risk_threshold", threshold, 0.0, 1.0);
        }
        if let Some(threshold) = overrides.violation_threshold {
            let threshold = clamp_override("violation_threshold", threshold, 0.0, 1.0);
            sim_config.violation_threshold = threshold;
            scorer = Cow::Owned(self.scorer.clone().with_violation_threshold(threshold));
        }
        if let Some(base) = overrides.dampening_base {
            sim_config.dampening_base = clamp_override("dampening_base", base, MIN_DAMPENING, 1.0);
        }

        let simulator = self.simulator.reconfigured(sim_config)?;
        Ok((scorer, Cow::Owned(simulator)))
    }
}

/// Clamps a finite caller-supplied value into range, warning if it moved.
fn clamp_override(name: &str, value: f64, min: f64, max: f64) -> f64 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        warn!(setting = name, value, clamped, "request value out of range, clamped");
    }
    clamped
}

/// Runs `f`, turning a panic into [`EngineError::Internal`].
fn guarded<T>(f: impl FnOnce() -> Result<T>) -> Result<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(EngineError::Internal(format!("panic in deep path: {message}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        Engine::with_defaults().unwrap()
    }

    fn decide(text: &str) -> DecisionRecord {
        engine().decide(text, &WeightProfile::default(), &RequestContext::new())
    }

    #[test]
    fn test_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }

    #[test]
    fn test_guarded_catches_panic() {
        let result: Result<()> = guarded(|| panic!("boom"));
        match result {
            Err(EngineError::Internal(msg)) => assert!(msg.contains("boom")),
            other => panic!("expected internal error, got {:?}", other),
        }
        assert_eq!(guarded(|| Ok(7)).unwrap(), 7);
    }

    #[test]
    fn test_empty_input_asks_for_clarification() {
        for text in ["", "   ", "?!...", "\n\t"] {
            let record = decide(text);
            assert!(record.is_fast());
            assert_eq!(record.tone, ResponseTone::Clarification);
            assert!(record.routing.is_none());
            assert!(record.ethics.is_none());
        }
    }

    #[test]
    fn test_fast_record() {
        let record = decide("Wie spät ist es?");
        assert!(record.is_fast());
        assert!((record.confidence - 0.95).abs() < 1e-9);
        assert!(record.ethics.is_none());
        assert!(record.simulation.is_none());
        assert!(record.violations.is_empty());
        assert_eq!(record.tone, ResponseTone::Normal);
    }

    #[test]
    fn test_deep_record() {
        let record = decide("Soll ich lügen um zu helfen?");
        assert!(record.is_deep());
        assert!(!record.is_fallback());
        let ethics = record.ethics.as_ref().unwrap();
        assert!(ethics.score(PrincipleKey::Integrity) < 0.5);
        assert!(record.is_violated(PrincipleKey::Integrity));
        assert_eq!(record.tone, ResponseTone::Cautious);
        let routing = record.routing.as_ref().unwrap();
        let simulation = record.simulation.as_ref().unwrap();
        assert!(record.confidence <= routing.confidence);
        assert!(record.confidence <= simulation.confidence);
    }

    #[test]
    fn test_harm_is_refused() {
        let record = decide("schaden");
        assert_eq!(record.tone, ResponseTone::Refusal);
        assert!(record.response.contains("harmed"));
    }

    #[test]
    fn test_violation_override_applies_to_both_stages() {
        let ctx = RequestContext::new().with_violation_threshold(0.0).with_max_depth(0);
        let record = engine().decide("Soll ich lügen?", &WeightProfile::default(), &ctx);
        assert!(record.is_deep());
        assert!(record.violations.is_empty());
    }

    #[test]
    fn test_out_of_range_overrides_are_clamped() {
        let ctx = RequestContext::new()
            .with_max_depth(100)
            .with_risk_threshold(4.0)
            .with_dampening_base(-1.0)
            .with_long_horizon_risk(3.0);
        let record = engine().decide("lügen", &WeightProfile::default(), &ctx);
        assert!(!record.is_fallback());
        assert!(record.simulation.unwrap().depth <= MAX_DEPTH_CEILING);
        assert!(!record.risk.unwrap().requires_alternative);
    }

    #[test]
    fn test_non_finite_context_falls_back() {
        let ctx = RequestContext::new().with_long_horizon_risk(f64::NAN);
        let record = engine().decide("lügen", &WeightProfile::default(), &ctx);
        assert!(record.is_fallback());
        assert!(record.is_deep());
        assert_eq!(record.tone, ResponseTone::Cautious);
        assert!(record.confidence <= 0.5);
        assert!(record.ethics.is_none());
    }
}

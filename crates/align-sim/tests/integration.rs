//! # Integration Tests
//!
//! Scorer and simulator working together on realistic requests.
//!
//! These tests verify that upstream assessments, custom libraries and
//! configuration limits interact the way the pipeline expects.

use std::sync::Arc;

use align_ethics::{EthicsScorer, WeightProfile};
use align_signals::{CategoryLibrary, ConflictCategory, PrincipleKey, SignalExtractor};
use align_sim::{ConsequenceSimulator, SimError, SimulatorConfig, Upstream, MAX_DEPTH_CEILING};

fn builtin() -> Arc<CategoryLibrary> {
    Arc::new(CategoryLibrary::builtin().unwrap())
}

// ============================================================================
// Upstream Assessment Tests
// ============================================================================

#[test]
fn test_assessment_feeds_simulation() {
    let text = "Soll ich lügen um zu helfen?";
    let extractor = SignalExtractor::new().unwrap();
    let flags = extractor.context_flags(text);
    let assessment = EthicsScorer::new(extractor).assess(text, &flags, &WeightProfile::default());

    let simulator = ConsequenceSimulator::new(builtin());
    let bare = simulator.simulate(text, &Upstream::default());
    let seeded = simulator.simulate(text, &Upstream::from_assessment(&assessment));

    assert!(seeded.risk_level > bare.risk_level);
    assert!(seeded.conflicts.contains(&PrincipleKey::Integrity));
    assert!(seeded.depth > 0);
}

#[test]
fn test_strict_profile_raises_weighted_risk() {
    let simulator = ConsequenceSimulator::new(builtin());
    let result = simulator.simulate("Soll ich meine Kunden täuschen?", &Upstream::default());

    let default = simulator.summarize(&result, &WeightProfile::default());
    let strict = simulator.summarize(&result, &WeightProfile::strict());
    assert!(strict.weighted_risk > default.weighted_risk);
}

// ============================================================================
// Consequence Chain Tests
// ============================================================================

#[test]
fn test_custom_library_chain_reaches_depth_limit() {
    // a -> b -> c -> a -> ... never terminates on its own
    let categories = vec![
        ConflictCategory::new("a", PrincipleKey::Integrity, 0.2, "step beta").with_triggers(["alpha"]),
        ConflictCategory::new("b", PrincipleKey::Governance, 0.3, "step gamma").with_triggers(["beta"]),
        ConflictCategory::new("c", PrincipleKey::Learning, 0.9, "step alpha").with_triggers(["gamma"]),
    ];
    let library = Arc::new(CategoryLibrary::new(categories).unwrap());

    for max_depth in 0..=MAX_DEPTH_CEILING {
        let config = SimulatorConfig::default().with_max_depth(max_depth);
        let simulator = ConsequenceSimulator::with_config(Arc::clone(&library), config).unwrap();
        let result = simulator.simulate("alpha", &Upstream::default());

        assert_eq!(result.depth, max_depth);
        assert!(result.depth_exhausted);
        assert_eq!(result.nodes_visited, max_depth + 1);
        assert!((0.0..=1.0).contains(&result.risk_level));
        assert!(result.confidence >= 0.5);
    }
}

#[test]
fn test_deep_risk_is_dampened_per_level() {
    let categories = vec![
        ConflictCategory::new("a", PrincipleKey::Integrity, 0.1, "step beta").with_triggers(["alpha"]),
        ConflictCategory::new("b", PrincipleKey::Governance, 1.0, "quiet").with_triggers(["beta"]),
    ];
    let library = Arc::new(CategoryLibrary::new(categories).unwrap());
    let simulator = ConsequenceSimulator::new(library);

    let result = simulator.simulate("alpha", &Upstream::default());
    assert!((result.risk_level - 0.8).abs() < 1e-9);
    assert_eq!(result.conflicts, vec![PrincipleKey::Integrity, PrincipleKey::Governance]);
}

#[test]
fn test_confidence_decays_with_follow_ups() {
    let simulator = ConsequenceSimulator::new(builtin());
    let one = simulator.simulate("lügen", &Upstream::default());
    let many = simulator.simulate("lügen, daten und schaden", &Upstream::default());
    assert!(many.confidence < one.confidence);
    assert!(many.confidence >= 0.5);
}

// ============================================================================
// Configuration Tests
// ============================================================================

#[test]
fn test_ceiling_rejected_at_construction() {
    let config = SimulatorConfig::default().with_max_depth(MAX_DEPTH_CEILING + 5);
    let err = ConsequenceSimulator::with_config(builtin(), config).unwrap_err();
    assert!(matches!(err, SimError::DepthCeilingExceeded { .. }));
}

#[test]
fn test_lower_risk_threshold_requires_alternative() {
    let config = SimulatorConfig::default().with_risk_threshold(0.3);
    let simulator = ConsequenceSimulator::with_config(builtin(), config).unwrap();
    let result = simulator.simulate("lügen", &Upstream::default());
    assert!(simulator.summarize(&result, &WeightProfile::default()).requires_alternative);
}

#[test]
fn test_result_serializes() {
    let simulator = ConsequenceSimulator::new(builtin());
    let result = simulator.simulate("helfen", &Upstream::default());
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["conflicts"][0], "nurturing");
    assert_eq!(json["depth"], 2);
}

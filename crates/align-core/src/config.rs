//! Configuration types for the ALIGN engine.

use std::path::{Path, PathBuf};

use align_ethics::{RouterConfig, ScorerConfig};
use align_sim::SimulatorConfig;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::Result;

/// Configuration for the decision engine.
///
/// Every section has defaults, so a partial JSON document such as
/// `{"simulation": {"max_depth": 2}}` is a complete configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ethics scorer configuration.
    pub scorer: ScorerConfig,

    /// Path router configuration.
    pub router: RouterConfig,

    /// Consequence simulator configuration.
    pub simulation: SimulatorConfig,

    /// Response assembly settings.
    pub responses: ResponseConfig,

    /// JSON file with a custom category library. Built-in library if unset.
    pub categories_path: Option<PathBuf>,
}

/// Response assembly settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseConfig {
    /// Characters of the request quoted in responses.
    pub snippet_chars: usize,

    /// Lowest principle score below this yields a refusal.
    pub refusal_below: f64,

    /// Lowest principle score up to this yields a cautious response.
    pub cautious_up_to: f64,

    /// Upper bound on the confidence of fallback records.
    pub fallback_confidence: f64,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            snippet_chars: 50,
            refusal_below: 0.3,
            cautious_up_to: 0.7,
            fallback_confidence: 0.5,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.scorer
            .validate()
            .map_err(|e| EngineError::Config(format!("scorer: {e}")))?;
        self.router
            .validate()
            .map_err(|e| EngineError::Config(format!("router: {e}")))?;
        self.simulation.validate()?;

        let r = &self.responses;
        if r.snippet_chars == 0 {
            return Err(EngineError::Config("responses: snippet_chars must be positive".into()));
        }
        for (name, value) in [
            ("refusal_below", r.refusal_below),
            ("cautious_up_to", r.cautious_up_to),
            ("fallback_confidence", r.fallback_confidence),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(EngineError::Config(format!(
                    "responses: {name} must be within [0, 1], got {value}"
                )));
            }
        }
        if r.refusal_below > r.cautious_up_to {
            return Err(EngineError::Config(
                "responses: refusal_below must not exceed cautious_up_to".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.simulation.max_depth, 3);
        assert_eq!(config.router.short_text_threshold, 80);
        assert_eq!(config.responses.snippet_chars, 50);
        assert!(config.categories_path.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed = EngineConfig::from_json(&json).unwrap();
        assert_eq!(parsed.simulation, config.simulation);
        assert_eq!(parsed.scorer, config.scorer);
    }

    #[test]
    fn test_partial_config() {
        let config = EngineConfig::from_json(r#"{"simulation": {"max_depth": 2}}"#).unwrap();
        assert_eq!(config.simulation.max_depth, 2);
        assert!((config.simulation.dampening_base - 0.8).abs() < f64::EPSILON);
        assert!((config.scorer.penalty_scale - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_sections_rejected() {
        let mut config = EngineConfig::default();
        config.simulation.max_depth = 50;
        assert!(matches!(config.validate(), Err(EngineError::Simulation(_))));

        let mut config = EngineConfig::default();
        config.scorer.secondary_ratio = 2.0;
        assert!(matches!(config.validate(), Err(EngineError::Config(_))));

        let mut config = EngineConfig::default();
        config.responses.refusal_below = 0.9;
        assert!(matches!(config.validate(), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("align.json");
        std::fs::write(&path, r#"{"router": {"short_text_threshold": 40}}"#).unwrap();
        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.router.short_text_threshold, 40);

        let missing = EngineConfig::from_file(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(EngineError::Io(_))));
    }
}

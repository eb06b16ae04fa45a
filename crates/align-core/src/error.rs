//! Error types for the ALIGN engine.

use align_ethics::EthicsError;
use align_signals::CategoryError;
use align_sim::SimError;
use thiserror::Error;

/// Core error type for engine operations.
///
/// Only construction and profile handling can fail. Once an [`Engine`]
/// exists, every request yields a [`DecisionRecord`].
///
/// [`Engine`]: crate::Engine
/// [`DecisionRecord`]: crate::DecisionRecord
#[derive(Debug, Error)]
pub enum EngineError {
    /// Weight profile failed validation.
    #[error("Invalid weight profile: {0}")]
    InvalidProfile(#[from] EthicsError),

    /// Named profile does not exist in the source.
    #[error("Weight profile '{0}' not found")]
    ProfileNotFound(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Category library failed validation.
    #[error("Category library error: {0}")]
    Categories(#[from] CategoryError),

    /// Simulator configuration was rejected.
    #[error("Simulator error: {0}")]
    Simulation(#[from] SimError),

    /// Reading a configuration or profile file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration or profile file is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unexpected failure while scoring or simulating.
    #[error("Internal computation error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use align_signals::PrincipleKey;

    #[test]
    fn test_invalid_profile_from_ethics_error() {
        let err: EngineError = EthicsError::MissingPrinciple(PrincipleKey::Learning).into();
        assert!(matches!(err, EngineError::InvalidProfile(_)));
        assert!(err.to_string().contains("learning"));
    }

    #[test]
    fn test_profile_not_found_display() {
        let err = EngineError::ProfileNotFound("lenient".to_string());
        assert_eq!(err.to_string(), "Weight profile 'lenient' not found");
    }

    #[test]
    fn test_simulation_error_passthrough() {
        let err: EngineError = SimError::DepthCeilingExceeded {
            requested: 12,
            ceiling: 8,
        }
        .into();
        assert!(err.to_string().contains("12"));
    }
}

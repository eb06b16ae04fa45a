//! Error types for principle scoring.
//!
//! Weight profiles and scorer configurations are validated on
//! construction; these are the ways validation can fail.

use align_signals::PrincipleKey;
use thiserror::Error;

/// Errors raised while validating profiles and scorer configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EthicsError {
    /// A principle has no weight.
    #[error("weight profile is missing principle '{0}'")]
    MissingPrinciple(PrincipleKey),

    /// A weight key does not name a principle.
    #[error("weight profile contains unknown principle '{0}'")]
    UnknownPrinciple(String),

    /// The same principle was given twice (e.g. "Integrity" and "integrity").
    #[error("weight profile lists principle '{0}' more than once")]
    DuplicatePrinciple(PrincipleKey),

    /// A weight is below zero.
    #[error("weight for '{principle}' must not be negative, got {weight}")]
    NegativeWeight {
        /// Offending principle
        principle: PrincipleKey,
        /// Offending weight
        weight: f64,
    },

    /// A weight is NaN or infinite.
    #[error("weight for '{0}' is not a finite number")]
    NonFiniteWeight(PrincipleKey),

    /// A scorer or router parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_principle_display() {
        let err = EthicsError::MissingPrinciple(PrincipleKey::Nurturing);
        assert!(err.to_string().contains("nurturing"));
    }

    #[test]
    fn test_negative_weight_display() {
        let err = EthicsError::NegativeWeight {
            principle: PrincipleKey::Integrity,
            weight: -0.5,
        };
        assert!(err.to_string().contains("integrity"));
        assert!(err.to_string().contains("-0.5"));
    }

    #[test]
    fn test_unknown_principle_display() {
        let err = EthicsError::UnknownPrinciple("honesty".to_string());
        assert!(err.to_string().contains("honesty"));
    }

    #[test]
    fn test_invalid_config_display() {
        let err = EthicsError::InvalidConfig("penalty_scale must be finite".to_string());
        assert!(err.to_string().contains("penalty_scale"));
    }
}

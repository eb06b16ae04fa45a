//! Error types for the consequence simulator.
//!
//! Simulation itself never fails; only configuration can be rejected.

use thiserror::Error;

/// Result type alias for simulator operations.
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors raised while validating simulator configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Requested recursion depth is above the static ceiling.
    ///
    /// The ceiling bounds stack usage regardless of configuration.
    #[error("max depth {requested} exceeds the ceiling of {ceiling}")]
    DepthCeilingExceeded {
        /// Requested maximum depth
        requested: usize,
        /// Static ceiling
        ceiling: usize,
    },

    /// A numeric parameter is out of range or not finite.
    #[error("invalid simulator parameter {name}: {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f64,
    },
}

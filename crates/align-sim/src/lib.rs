//! # ALIGN Consequence Simulator
//!
//! Depth-bounded recursive exploration of what an action could lead to.
//! Catches second-order conflicts that a single scoring pass misses.
//!
//! ## Model
//!
//! An action matches conflict categories. Each match adds risk, names the
//! principles in conflict and proposes a follow-up action. Follow-ups are
//! explored in turn, one level deeper, until nothing matches or the depth
//! limit is reached. Deeper findings are dampened geometrically.
//!
//! ## Components
//!
//! | Component | Purpose |
//! |-----------|---------|
//! | [`ConsequenceSimulator`] | Recursive exploration and risk summary |
//! | [`SimulatorConfig`] | Depth, dampening, thresholds and risk weights |
//! | [`Upstream`] | Scores and hints from earlier pipeline stages |
//! | [`SimulationResult`] | Conflicts, risk, depth and confidence |
//! | [`RiskSummary`] | Profile-weighted risk and explanation |
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use align_ethics::WeightProfile;
//! use align_signals::{CategoryLibrary, PrincipleKey};
//! use align_sim::{ConsequenceSimulator, Upstream};
//!
//! let library = Arc::new(CategoryLibrary::builtin().unwrap());
//! let simulator = ConsequenceSimulator::new(library);
//!
//! let result = simulator.simulate("helfen", &Upstream::default());
//! assert!(result.conflicts.contains(&PrincipleKey::Nurturing));
//! assert!(result.depth <= simulator.config().max_depth);
//!
//! let summary = simulator.summarize(&result, &WeightProfile::default());
//! assert!(!summary.requires_alternative);
//! ```
//!
//! ## Guarantees
//!
//! - `depth <= max_depth <= MAX_DEPTH_CEILING`
//! - `risk_level` is within `[0, 1]`
//! - `confidence` never drops below the configured floor, itself at least 0.5
//! - Simulation never fails and holds no state between calls

mod config;
mod error;
mod report;
mod simulator;

pub use config::{SimulatorConfig, MAX_DEPTH_CEILING, MIN_CONFIDENCE_FLOOR};
pub use error::{Result, SimError};
pub use report::{RiskSummary, SimulationResult};
pub use simulator::{ConsequenceSimulator, Upstream};

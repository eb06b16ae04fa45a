//! # ALIGN Core
//!
//! Decision assembler for the ALIGN ethics engine.
//! Orchestrates signal extraction, path routing, principle scoring and
//! consequence simulation behind one [`Engine`].
//!
//! ## Pipeline
//!
//! Every request is routed first. Plain requests take the fast path and get
//! a template response; anything ethically loaded or ambiguous takes the
//! deep path:
//!
//! | Stage | Component | Output |
//! |-------|-----------|--------|
//! | Signals | `align-signals` | Matched categories, text features, framing |
//! | Routing | `align-ethics` | Fast or Deep, with reasons |
//! | Scoring | `align-ethics` | Per-principle scores and violations |
//! | Simulation | `align-sim` | Conflicts and risk of the action and its follow-ups |
//! | Assembly | [`Engine`] | [`DecisionRecord`] |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         ALIGN CORE                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │                    ┌─────────────────┐                          │
//! │   WeightProfile ──▶│     Engine      │◀── RequestContext        │
//! │                    └────────┬────────┘                          │
//! │                             │                                   │
//! │         ┌───────────────────┼───────────────────┐               │
//! │         ▼                   ▼                   ▼               │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐          │
//! │  │   Signal    │    │ Path Router │    │ Consequence │          │
//! │  │  Extractor  │    │  + Scorer   │    │  Simulator  │          │
//! │  └─────────────┘    └─────────────┘    └─────────────┘          │
//! │                             │                                   │
//! │                             ▼                                   │
//! │                      DecisionRecord ──▶ GovernanceSink (host)   │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use align_core::{Engine, PathKind, RequestContext, ResponseTone, WeightProfile};
//!
//! let engine = Engine::with_defaults()?;
//!
//! let record = engine.decide("Wie spät ist es?", &WeightProfile::default(), &RequestContext::new());
//! assert_eq!(record.path, PathKind::Fast);
//!
//! let record = engine.decide("schaden", &WeightProfile::strict(), &RequestContext::new());
//! assert_eq!(record.tone, ResponseTone::Refusal);
//! # Ok::<(), align_core::EngineError>(())
//! ```
//!
//! ## Failure Model
//!
//! - Construction validates configuration and may fail
//! - Raw weights are validated before any work is done
//! - Once running, every request yields a record
//! - Failures inside the deep path yield a cautious fallback record

mod config;
mod context;
mod engine;
mod error;
mod governance;
mod record;
mod response;
mod source;

pub use config::{EngineConfig, ResponseConfig};
pub use context::{ConfigOverrides, RequestContext};
pub use engine::Engine;
pub use error::EngineError;
pub use governance::{BasicGovernance, GovernanceSink, Intervention, UserRole};
pub use record::{DecisionRecord, ResponseTone};
pub use source::{JsonDirSource, PresetSource, WeightProfileSource};

// Re-export component types for convenience
pub use align_ethics::{EthicsAssessment, PathKind, RoutingDecision, WeightProfile};
pub use align_signals::{CategoryLibrary, PrincipleKey};
pub use align_sim::{RiskSummary, SimulationResult};

/// Core result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

//! # ALIGN Ethics
//!
//! Weighted principle scoring and fast/deep path routing.
//!
//! ## Overview
//!
//! Requests enter the ALIGN pipeline as signals and features extracted by
//! `align-signals`. This crate decides how much attention each request gets
//! and, for requests that deserve it, how each of the five principles fares.
//!
//! | Component | Purpose |
//! |-----------|---------|
//! | [`WeightProfile`] | Validated per-principle weights with named presets |
//! | [`EthicsScorer`] | Per-principle scores, overall score and violations |
//! | [`PathRouter`] | Pure fast/deep routing with a reasoning trace |
//!
//! ## Scoring Model
//!
//! Each principle starts at 1.0. Matched categories subtract a penalty
//! proportional to their strength from the principles they name; critical
//! categories subtract a smaller amount from every principle. Hypothetical
//! framing halves penalties, explicit negation of harm cancels harm
//! penalties, and question framing softens the integrity deduction.
//!
//! The overall score is the weighted mean of the principle scores. Weights
//! never change the scores themselves.
//!
//! ## Architecture
//!
//! ```text
//!   SignalSet + TextFeatures          SignalSet + ContextFlags + WeightProfile
//!             │                                       │
//!             ▼                                       ▼
//!      ┌─────────────┐                        ┌──────────────┐
//!      │ PATH ROUTER │──── Deep ─────────────▶│ETHICS SCORER │
//!      └──────┬──────┘                        └──────┬───────┘
//!             │ Fast                                 │
//!             ▼                                      ▼
//!      RoutingDecision                       EthicsAssessment
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use align_ethics::{EthicsScorer, PathRouter, WeightProfile};
//! use align_signals::{PrincipleKey, SignalExtractor};
//!
//! let extractor = SignalExtractor::new()?;
//! let text = "Soll ich lügen um zu helfen?";
//!
//! let routing = PathRouter::new().route(&extractor.extract(text), &extractor.features(text));
//! assert!(routing.is_deep());
//!
//! let scorer = EthicsScorer::new(extractor.clone());
//! let assessment = scorer.assess(text, &extractor.context_flags(text), &WeightProfile::default());
//! assert!(assessment.is_violated(PrincipleKey::Integrity));
//! # Ok::<(), align_signals::CategoryError>(())
//! ```

pub mod error;
pub mod profile;
pub mod router;
pub mod scorer;

pub use error::EthicsError;
pub use profile::{WeightProfile, PRESET_NAMES};
pub use router::{PathKind, PathRouter, RouteReason, RouterConfig, RoutingDecision};
pub use scorer::{EthicsAssessment, EthicsScorer, ScorerConfig};

/// Result type for scoring and profile operations.
pub type Result<T> = std::result::Result<T, EthicsError>;

//! # ALIGN Signals - Pattern Signal Extraction
//!
//! The first stage of the ALIGN decision pipeline. It reads a short
//! natural-language request and reports, without any interpretation, which
//! ethically loaded phrase families it mentions and how it is framed.
//!
//! ## Purpose
//!
//! This crate provides three capabilities used by every later stage:
//!
//! 1. **Conflict Category Library** - A validated, read-only set of phrase
//!    families, each tied to one or two ALIGN principles, a risk weight and a
//!    follow-up action for consequence simulation.
//!
//! 2. **Signal Extraction** - Case-insensitive trigger matching that turns a
//!    request into a [`SignalSet`].
//!
//! 3. **Text Features and Context Flags** - Literal detection of connectives,
//!    ethical vocabulary, clause structure, and question, hypothetical or
//!    harm-negating framing.
//!
//! ## The Five Principles
//!
//! | Principle | Typical triggers |
//! |-----------|------------------|
//! | Awareness | harm, danger, manipulation |
//! | Learning | autonomy, dependency |
//! | Integrity | lying, concealment, discrimination, manipulation |
//! | Governance | personal data, surveillance, discrimination |
//! | Nurturing | harm, dependency |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      SIGNAL EXTRACTOR                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  ┌──────────────────────┐        ┌──────────────────────────┐   │
//! │  │   CATEGORY LIBRARY   │        │      TEXT ANALYZER       │   │
//! │  │                      │        │                          │   │
//! │  │ one regex per        │        │ connectives, vocabulary, │   │
//! │  │ category (triggers)  │        │ clauses, framing         │   │
//! │  └──────────┬───────────┘        └─────────┬────────────────┘   │
//! │             │                              │                    │
//! │             ▼                              ▼                    │
//! │      ┌─────────────┐          ┌──────────────┐ ┌────────────┐   │
//! │      │  SignalSet  │          │ TextFeatures │ │ContextFlags│   │
//! │      └─────────────┘          └──────────────┘ └────────────┘   │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use align_signals::{PrincipleKey, SignalExtractor};
//!
//! let extractor = SignalExtractor::new()?;
//!
//! let signals = extractor.extract("Soll ich lügen?");
//! assert!(signals.contains("truth"));
//! assert!(signals.by_principle().contains_key(&PrincipleKey::Integrity));
//!
//! let flags = extractor.context_flags("Soll ich lügen?");
//! assert!(flags.question);
//! # Ok::<(), align_signals::CategoryError>(())
//! ```

pub mod extractor;
pub mod features;
pub mod library;
pub mod models;
pub mod principle;

pub use extractor::SignalExtractor;
pub use features::{ContextFlags, PhraseSet, TextAnalyzer, TextFeatures};
pub use library::{builtin_categories, CategoryLibrary};
pub use models::{CategoryError, ConflictCategory, Severity, Signal, SignalSet};
pub use principle::PrincipleKey;

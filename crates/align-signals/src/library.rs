//! # Conflict Category Library
//!
//! The fixed vocabulary of ethically loaded phrases shared by the signal
//! extractor and the consequence simulator.
//!
//! ## Built-in Categories
//!
//! | Category | Primary | Secondary | Risk | Severity |
//! |----------|---------|-----------|------|----------|
//! | privacy | governance | - | 0.30 | warning |
//! | autonomy | learning | - | 0.25 | warning |
//! | dependency | nurturing | learning | 0.35 | warning |
//! | truth | integrity | - | 0.40 | warning |
//! | harm | awareness | nurturing | 0.45 | critical, negatable |
//! | discrimination | integrity | governance | 0.50 | warning |
//! | manipulation | integrity | awareness | 0.40 | warning |
//!
//! Triggers are German and English stems matched as plain substrings, so
//! `"lüg"` catches "lügen" and "Lüge" but not "gelogen". There is no
//! stemming and no semantic analysis.
//!
//! Each category's follow-up is a short description of the downstream
//! action the simulator explores next. Follow-ups may themselves match other
//! categories, which is how consequence chains form (dependency leads to
//! loss of own decisions, which the autonomy category picks up).

use regex::Regex;
use std::collections::HashSet;

use crate::models::{CategoryError, ConflictCategory};
use crate::principle::PrincipleKey;

/// A category paired with its compiled trigger matcher.
#[derive(Debug, Clone)]
struct CompiledCategory {
    category: ConflictCategory,
    matcher: Regex,
}

/// Validated, immutable set of conflict categories.
///
/// Construction validates every category and compiles one case-insensitive
/// matcher per category. Once built, a library is read-only and can be
/// shared freely between threads.
#[derive(Debug, Clone)]
pub struct CategoryLibrary {
    entries: Vec<CompiledCategory>,
}

impl CategoryLibrary {
    /// Builds a library from category definitions.
    ///
    /// # Errors
    ///
    /// Returns an error if a category has no triggers, a blank trigger, a
    /// risk weight outside `[0, 1]`, an empty follow-up, or a duplicate name.
    pub fn new(categories: Vec<ConflictCategory>) -> Result<Self, CategoryError> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(categories.len());

        for category in categories {
            validate(&category)?;
            if !seen.insert(category.name.clone()) {
                return Err(CategoryError::DuplicateCategory(category.name));
            }
            let matcher = compile_triggers(&category.triggers)?;
            entries.push(CompiledCategory { category, matcher });
        }

        Ok(Self { entries })
    }

    /// The built-in German/English library.
    pub fn builtin() -> Result<Self, CategoryError> {
        Self::new(builtin_categories())
    }

    /// Parses a JSON array of categories and validates it.
    pub fn from_json(json: &str) -> Result<Self, CategoryError> {
        let categories: Vec<ConflictCategory> = serde_json::from_str(json)?;
        Self::new(categories)
    }

    /// Categories whose triggers occur in `text`, in library order.
    pub fn matching<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a ConflictCategory> + 'a {
        self.entries
            .iter()
            .filter(move |entry| entry.matcher.is_match(text))
            .map(|entry| &entry.category)
    }

    /// Looks up a category by name.
    pub fn get(&self, name: &str) -> Option<&ConflictCategory> {
        self.iter().find(|c| c.name == name)
    }

    /// Iterates over all categories.
    pub fn iter(&self) -> impl Iterator<Item = &ConflictCategory> {
        self.entries.iter().map(|entry| &entry.category)
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the library has no categories.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate(category: &ConflictCategory) -> Result<(), CategoryError> {
    if category.triggers.is_empty() {
        return Err(CategoryError::EmptyTriggers(category.name.clone()));
    }
    if category.triggers.iter().any(|t| t.trim().is_empty()) {
        return Err(CategoryError::BlankTrigger(category.name.clone()));
    }
    if !category.risk_weight.is_finite() || !(0.0..=1.0).contains(&category.risk_weight) {
        return Err(CategoryError::InvalidRiskWeight {
            name: category.name.clone(),
            weight: category.risk_weight,
        });
    }
    if category.follow_up.trim().is_empty() {
        return Err(CategoryError::EmptyFollowUp(category.name.clone()));
    }
    Ok(())
}

/// One alternation of escaped literals, case-insensitive and Unicode-aware.
fn compile_triggers(triggers: &[String]) -> Result<Regex, CategoryError> {
    let alternation = triggers
        .iter()
        .map(|t| regex::escape(t.trim()))
        .collect::<Vec<_>>()
        .join("|");
    Ok(Regex::new(&format!("(?i)(?:{alternation})"))?)
}

/// Definitions of the built-in categories.
pub fn builtin_categories() -> Vec<ConflictCategory> {
    vec![
        ConflictCategory::new(
            "privacy",
            PrincipleKey::Governance,
            0.30,
            "users could lose trust in the service",
        )
        .with_triggers([
            "daten", "privat", "speicher", "überwach", "aufzeichn", "track",
            "personal data", "private", "surveil", "spy on",
        ]),
        ConflictCategory::new(
            "autonomy",
            PrincipleKey::Learning,
            0.25,
            "reduced personal responsibility",
        )
        .with_triggers([
            "entscheid", "autonom", "selbstbestimm", "bevormund", "kontroll",
            "own decision", "autonomy", "decide for", "control over",
        ]),
        ConflictCategory::new(
            "dependency",
            PrincipleKey::Nurturing,
            0.35,
            "dependency replaces own decisions",
        )
        .with_secondary(PrincipleKey::Learning)
        .with_triggers([
            "hilf", "helfen", "lösung", "erledige", "übernehm", "komplett",
            "help", "do it for me", "solve it for me",
        ]),
        ConflictCategory::new(
            "truth",
            PrincipleKey::Integrity,
            0.40,
            "loss of trust on disclosure",
        )
        .with_triggers([
            "lüg", "verschweig", "verheimlich", "täusch", "betrüg", "fälsch",
            "lying", "lie to", "deceiv", "mislead", "conceal", "cheat",
        ]),
        ConflictCategory::new(
            "harm",
            PrincipleKey::Awareness,
            0.45,
            "physical or psychological damage to others",
        )
        .with_secondary(PrincipleKey::Nurturing)
        .with_triggers([
            "schaden", "schädig", "schädlich", "verletz", "gefahr", "gefährd",
            "harm", "hurt", "injur", "danger",
        ])
        .critical()
        .negatable(),
        ConflictCategory::new(
            "discrimination",
            PrincipleKey::Integrity,
            0.50,
            "unequal treatment of affected groups",
        )
        .with_secondary(PrincipleKey::Governance)
        .with_triggers([
            "rasse", "geschlecht", "religion", "herkunft", "benachteilig",
            "diskrimin", "discriminat", "racis", "ethnic",
        ]),
        ConflictCategory::new(
            "manipulation",
            PrincipleKey::Integrity,
            0.40,
            "loss of freedom of choice",
        )
        .with_secondary(PrincipleKey::Awareness)
        .with_triggers([
            "manipul", "beeinfluss", "überred", "trick", "lenk",
            "persuade", "coerce", "pressure",
        ]),
    ]
}

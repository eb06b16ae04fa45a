//! # Text Features and Context Flags
//!
//! Lightweight, literal phrase detection over the request text. Two views
//! are produced:
//!
//! - [`TextFeatures`] feed the path router: length, clause structure,
//!   connectives and explicit ethical vocabulary.
//! - [`ContextFlags`] feed the ethics scorer: question, hypothetical and
//!   harm-negation framing, plus informational flags.
//!
//! ## Phrase Matching
//!
//! Phrases are matched case-insensitively on word boundaries. Two kinds of
//! phrase sets exist:
//!
//! | Kind | Boundary | Example |
//! |------|----------|---------|
//! | words | both sides | `"but"` matches "but", not "butter" |
//! | stems | leading only | `"moral"` matches "moral" and "moralisch" |
//!
//! ## Clause Counting
//!
//! A clause is a segment between punctuation (`, ; : . ! ?`) or a
//! coordinating conjunction (und, oder, weil, denn, and, or, because) that
//! contains at least one alphanumeric character.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::CategoryError;

const DECISION_PHRASES: &[&str] = &[
    "soll ich", "sollte ich", "darf ich", "should i", "may i", "ought i",
];

const QUESTION_PHRASES: &[&str] = &[
    "soll ich", "sollte ich", "darf ich", "kann ich", "should i", "may i",
    "can i", "is it ok", "ist es ok",
];

const HYPOTHETICAL_PHRASES: &[&str] = &[
    "wenn", "falls", "angenommen", "hypothetisch", "stell dir vor",
    "if", "suppose", "supposing", "imagine", "hypothetically", "what if",
];

const HARM_NEGATION_PHRASES: &[&str] = &[
    "ohne zu schaden", "ohne jemandem zu schaden", "ohne zu verletzen",
    "ohne jemanden zu verletzen", "nicht schaden", "nicht zu schaden",
    "niemandem schaden", "niemandem zu schaden", "kein schaden", "keinen schaden",
    "without harm", "without harming", "without hurting", "without causing harm",
    "no harm", "not harm", "not hurt", "never harm", "harmless",
];

const CONTRAST_CONNECTIVES: &[&str] = &[
    "aber", "jedoch", "allerdings", "dennoch", "trotzdem", "einerseits",
    "andererseits", "obwohl", "but", "however", "although", "nevertheless",
    "on the other hand", "whereas",
];

const PURPOSE_CONNECTIVES: &[&str] = &["um zu", "damit", "in order to", "so that"];

const ETHICAL_STEMS: &[&str] = &[
    "ethi", "moral", "gewissen", "dilemma", "gerecht", "ungerecht",
    "verantwortung", "richtig oder falsch", "conscience", "fair", "unfair",
    "right or wrong",
];

const EDUCATIONAL_STEMS: &[&str] = &[
    "erklär", "lern", "versteh", "schul", "explain", "learn", "understand",
    "teach", "school",
];

const EMERGENCY_STEMS: &[&str] = &[
    "notfall", "dringend", "sofort", "lebensgefahr", "emergency", "urgent",
    "immediately",
];

const CHILDREN_WORDS: &[&str] = &[
    "kinder", "kindern", "mein kind", "meinem kind", "sohn", "tochter",
    "minderjährig", "child", "children", "kids", "minor", "teenager",
];

/// Case-insensitive phrase matcher compiled from a word list.
#[derive(Debug, Clone)]
pub struct PhraseSet {
    matcher: Regex,
}

impl PhraseSet {
    /// Phrases bounded by word boundaries on both sides.
    pub fn words(phrases: &[&str]) -> Result<Self, CategoryError> {
        Self::compile(phrases, r"\b")
    }

    /// Phrases bounded on the leading side only, so they match word stems.
    pub fn stems(phrases: &[&str]) -> Result<Self, CategoryError> {
        Self::compile(phrases, "")
    }

    fn compile(phrases: &[&str], trailing: &str) -> Result<Self, CategoryError> {
        let alternation = phrases
            .iter()
            .map(|p| regex::escape(p).replace(' ', r"\s+"))
            .collect::<Vec<_>>()
            .join("|");
        let matcher = Regex::new(&format!(r"(?i)\b(?:{alternation}){trailing}"))?;
        Ok(Self { matcher })
    }

    /// Returns true if any phrase occurs.
    pub fn is_match(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }

    /// Distinct matched phrases, lower-cased, in order of first occurrence.
    pub fn find_all(&self, text: &str) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        for m in self.matcher.find_iter(text) {
            let phrase = m.as_str().to_lowercase();
            if !found.contains(&phrase) {
                found.push(phrase);
            }
        }
        found
    }
}

/// Structural features of a request used for routing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextFeatures {
    /// Length in characters (not bytes).
    pub char_len: usize,
    /// Number of whitespace-separated words.
    pub word_count: usize,
    /// Number of clauses.
    pub clause_count: usize,
    /// Whether the text contains a question mark.
    pub has_question_mark: bool,
    /// Whether the text asks for a decision ("soll ich", "should i").
    pub decision_question: bool,
    /// Contrast connectives found ("aber", "however").
    pub contrast_connectives: Vec<String>,
    /// Purpose connectives found ("um zu", "in order to").
    pub purpose_connectives: Vec<String>,
    /// Explicit ethical vocabulary found ("moral", "dilemma").
    pub ethical_terms: Vec<String>,
}

/// Framing of a request, as seen by the ethics scorer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextFlags {
    /// Phrased as a question.
    pub question: bool,
    /// Phrased hypothetically.
    pub hypothetical: bool,
    /// Explicitly negates harm ("without harming anyone").
    pub harm_negated: bool,
    /// Educational context. Informational only.
    pub educational: bool,
    /// Emergency context. Informational only.
    pub emergency: bool,
    /// Mentions children or minors. Informational only.
    pub involves_children: bool,
}

/// Compiled phrase sets for feature and flag detection.
#[derive(Debug, Clone)]
pub struct TextAnalyzer {
    decision: PhraseSet,
    question: PhraseSet,
    hypothetical: PhraseSet,
    harm_negation: PhraseSet,
    contrast: PhraseSet,
    purpose: PhraseSet,
    ethical: PhraseSet,
    educational: PhraseSet,
    emergency: PhraseSet,
    children: PhraseSet,
    clause_break: Regex,
}

impl TextAnalyzer {
    /// Compiles the built-in German/English phrase sets.
    pub fn new() -> Result<Self, CategoryError> {
        Ok(Self {
            decision: PhraseSet::words(DECISION_PHRASES)?,
            question: PhraseSet::words(QUESTION_PHRASES)?,
            hypothetical: PhraseSet::words(HYPOTHETICAL_PHRASES)?,
            harm_negation: PhraseSet::words(HARM_NEGATION_PHRASES)?,
            contrast: PhraseSet::words(CONTRAST_CONNECTIVES)?,
            purpose: PhraseSet::words(PURPOSE_CONNECTIVES)?,
            ethical: PhraseSet::stems(ETHICAL_STEMS)?,
            educational: PhraseSet::stems(EDUCATIONAL_STEMS)?,
            emergency: PhraseSet::stems(EMERGENCY_STEMS)?,
            children: PhraseSet::words(CHILDREN_WORDS)?,
            clause_break: Regex::new(r"(?i)[,;:!?]+|\.+(?:\s+|$)|\b(?:und|oder|weil|denn|and|or|because)\b")?,
        })
    }

    /// Computes routing features.
    pub fn features(&self, text: &str) -> TextFeatures {
        TextFeatures {
            char_len: text.chars().count(),
            word_count: text.split_whitespace().count(),
            clause_count: self.clause_count(text),
            has_question_mark: text.contains('?'),
            decision_question: self.decision.is_match(text),
            contrast_connectives: self.contrast.find_all(text),
            purpose_connectives: self.purpose.find_all(text),
            ethical_terms: self.ethical.find_all(text),
        }
    }

    /// Computes scoring context flags.
    pub fn context_flags(&self, text: &str) -> ContextFlags {
        ContextFlags {
            question: text.contains('?') || self.question.is_match(text),
            hypothetical: self.hypothetical.is_match(text),
            harm_negated: self.harm_negation.is_match(text),
            educational: self.educational.is_match(text),
            emergency: self.emergency.is_match(text),
            involves_children: self.children.is_match(text),
        }
    }

    /// Number of non-empty clauses.
    pub fn clause_count(&self, text: &str) -> usize {
        self.clause_break
            .split(text)
            .filter(|segment| segment.chars().any(char::is_alphanumeric))
            .count()
    }
}

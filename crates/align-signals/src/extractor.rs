//! Pattern signal extractor
//!
//! Combines the category library and the text analyzer behind one
//! read-only interface.

use std::sync::Arc;

use tracing::debug;

use crate::features::{ContextFlags, TextAnalyzer, TextFeatures};
use crate::library::CategoryLibrary;
use crate::models::{CategoryError, Signal, SignalSet};

/// Extracts conflict signals, routing features and context flags from text.
///
/// Cloning is cheap: the library and analyzer are shared.
#[derive(Debug, Clone)]
pub struct SignalExtractor {
    library: Arc<CategoryLibrary>,
    analyzer: Arc<TextAnalyzer>,
}

impl SignalExtractor {
    /// Create an extractor over the built-in library
    pub fn new() -> Result<Self, CategoryError> {
        Self::with_library(Arc::new(CategoryLibrary::builtin()?))
    }

    /// Create an extractor over a custom library
    pub fn with_library(library: Arc<CategoryLibrary>) -> Result<Self, CategoryError> {
        Ok(Self {
            library,
            analyzer: Arc::new(TextAnalyzer::new()?),
        })
    }

    /// The shared category library
    pub fn library(&self) -> &Arc<CategoryLibrary> {
        &self.library
    }

    /// Match every category against the text.
    ///
    /// Never fails. No match yields an empty set.
    pub fn extract(&self, text: &str) -> SignalSet {
        let signals: Vec<Signal> = self.library.matching(text).map(Signal::from).collect();
        if !signals.is_empty() {
            debug!(
                categories = ?signals.iter().map(|s| s.category.as_str()).collect::<Vec<_>>(),
                "conflict signals extracted"
            );
        }
        SignalSet::new(signals)
    }

    /// Routing features for the text
    pub fn features(&self, text: &str) -> TextFeatures {
        self.analyzer.features(text)
    }

    /// Scoring context flags for the text
    pub fn context_flags(&self, text: &str) -> ContextFlags {
        self.analyzer.context_flags(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConflictCategory;
    use crate::principle::PrincipleKey;

    #[test]
    fn test_clean_input_has_no_signals() {
        let extractor = SignalExtractor::new().unwrap();
        assert!(extractor.extract("Wie spät ist es?").is_empty());
        assert!(extractor.extract("").is_empty());
    }

    #[test]
    fn test_harm_signal() {
        let extractor = SignalExtractor::new().unwrap();
        let signals = extractor.extract("Wie kann ich jemandem schaden?");
        assert_eq!(signals.categories(), vec!["harm"]);
        let signal = signals.iter().next().unwrap();
        assert_eq!(signal.primary, PrincipleKey::Awareness);
        assert_eq!(signal.secondary, Some(PrincipleKey::Nurturing));
        assert!(signal.is_critical());
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let extractor = SignalExtractor::new().unwrap();
        let text = "Soll ich meine Daten verschweigen?";
        assert_eq!(extractor.extract(text), extractor.extract(text));
    }

    #[test]
    fn test_custom_library() {
        let category = ConflictCategory::new("gambling", PrincipleKey::Nurturing, 0.3, "debt")
            .with_triggers(["casino"]);
        let library = Arc::new(CategoryLibrary::new(vec![category]).unwrap());
        let extractor = SignalExtractor::with_library(library).unwrap();
        assert!(extractor.extract("Casino tonight").contains("gambling"));
        assert!(extractor.extract("schaden").is_empty());
    }

    #[test]
    fn test_clones_share_library() {
        let extractor = SignalExtractor::new().unwrap();
        let clone = extractor.clone();
        assert!(Arc::ptr_eq(extractor.library(), clone.library()));
    }
}

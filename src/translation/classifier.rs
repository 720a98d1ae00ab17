/*!
 * Skip classifier.
 *
 * Decides whether a piece of text is natural language worth sending to the
 * provider, or machine-facing content (ids, numbers, paths, URLs) that must be
 * left alone.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::ClassifierConfig;

// Integers and decimals with optional sign and group separators
static NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d[\d,._ ]*)?\d$|^[+-]?\d*[.,]\d+$").expect("numeric pattern is valid")
});

static DRIVE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]:\\").expect("drive pattern is valid"));

/// Compiled classifier rules
#[derive(Debug, Clone)]
pub struct SkipClassifier {
    min_length: usize,
    identifier: Regex,
    prefixes: Vec<String>,
    suffixes: Vec<String>,
}

impl SkipClassifier {
    /// Compile the classifier from configuration
    pub fn new(config: &ClassifierConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            min_length: config.min_length,
            identifier: Regex::new(&config.identifier_pattern)?,
            prefixes: config.technical_prefixes.clone(),
            suffixes: config.technical_suffixes.clone(),
        })
    }

    /// Whether `text` must be left untranslated
    pub fn should_skip(&self, text: &str) -> bool {
        let trimmed = text.trim();

        if trimmed.chars().count() < self.min_length.max(1) {
            return true;
        }

        if NUMERIC.is_match(trimmed) {
            return true;
        }

        if trimmed.contains("://")
            || trimmed.starts_with("www.")
            || trimmed.contains('@')
            || trimmed.contains('/')
            || trimmed.contains('\\')
            || DRIVE_PREFIX.is_match(trimmed)
        {
            return true;
        }

        if trimmed.matches('_').count() >= 2 && self.identifier.is_match(trimmed) {
            return true;
        }

        self.prefixes.iter().any(|p| trimmed.starts_with(p.as_str()))
            || self.suffixes.iter().any(|s| trimmed.ends_with(s.as_str()))
    }
}

impl Default for SkipClassifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default()).expect("default identifier pattern is valid")
    }
}

//! Immutable analysis configuration with per-call overrides.
//!
//! Defaults live in `const` tables and are merged into a [`Vocabulary`]
//! at call time. Nothing here is global mutable state, so configs can
//! be shared freely across concurrent runs.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::sentiment::SentimentLexicon;

/// Default English stop words used by significant-word extraction.
///
/// Only tokens longer than 2 characters reach the filter, so 1–2 letter
/// function words are omitted.
const STOP_WORDS_EN: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "your", "all", "can", "had", "her", "was",
    "one", "our", "out", "has", "have", "him", "his", "how", "its", "may", "new", "now", "old",
    "see", "two", "way", "who", "did", "get", "let", "say", "she", "too", "use", "that", "this",
    "with", "they", "them", "their", "then", "than", "from", "will", "would", "there", "what",
    "which", "when", "where", "while", "also", "been", "being", "both", "each", "into", "like",
    "more", "most", "much", "must", "only", "other", "over", "same", "some", "such", "very",
    "well", "were", "about", "after", "again", "before", "between", "here", "just", "make",
    "many", "these", "those", "under", "because", "should", "could", "does", "doing", "any",
];

/// German function words that would otherwise read as significant.
const STOP_WORDS_DE: &[&str] = &[
    "der", "die", "das", "und", "oder", "aber", "nicht", "ein", "eine", "einen", "mit", "für",
    "von", "auf", "ist", "sind", "auch", "als", "bei", "nach", "wie", "noch", "nur", "zum",
    "zur", "den", "dem", "des", "sich", "wird", "werden", "kann", "können", "haben", "hat",
];

/// French function words.
const STOP_WORDS_FR: &[&str] = &[
    "les", "des", "une", "dans", "pour", "avec", "sur", "par", "pas", "est", "sont", "mais",
    "aussi", "plus", "tout", "tous", "comme", "que", "qui", "vous", "nous", "leur", "ces",
    "cette", "son", "ses", "aux", "ont", "être", "fait", "peut",
];

/// Spanish function words.
const STOP_WORDS_ES: &[&str] = &[
    "los", "las", "una", "con", "por", "para", "del", "que", "como", "más", "pero", "sus",
    "este", "esta", "son", "ser", "hay", "muy", "también", "sin", "sobre", "entre", "cuando",
    "todo", "todos", "puede", "tiene", "hacer", "está",
];

/// Fixed synonym groups for concept-level word overlap.
///
/// These are tuning data, not an extension point: the clusterer's
/// behavior depends on them, so overrides go through
/// [`AnalysisConfig::synonym_groups`] explicitly.
const SYNONYM_GROUPS: &[&[&str]] = &[
    &["good", "great", "excellent", "best", "top", "leading", "superior"],
    &["bad", "poor", "weak", "inferior", "worst"],
    &["cheap", "affordable", "inexpensive", "budget"],
    &["expensive", "costly", "premium", "pricey"],
    &["fast", "quick", "rapid", "speedy"],
    &["easy", "simple", "straightforward", "intuitive"],
    &["hard", "difficult", "complex", "complicated"],
    &["popular", "common", "widespread", "mainstream"],
    &["software", "tool", "platform", "application", "app", "solution"],
    &["company", "business", "firm", "organization", "vendor", "provider"],
    &["task", "project", "work", "workflow"],
    &["track", "monitor", "manage", "organize"],
    &["recommend", "suggest", "advise", "propose"],
    &["price", "cost", "pricing", "fee"],
    &["feature", "capability", "functionality", "function"],
    &["customer", "client", "user", "consumer"],
];

/// Optional overrides consumed by the analysis pipeline.
///
/// Every field defaults to "use the built-in tables"; a populated field
/// replaces or extends the corresponding default at resolution time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// BCP-47-ish language tag (`"en"`, `"de"`, `"fr"`, `"es"`). A
    /// non-English tag extends the English stop-word set with the
    /// matching built-in list.
    #[serde(default)]
    pub language: Option<String>,

    /// Additional stop words merged into the resolved set.
    #[serde(default)]
    pub extra_stop_words: Vec<String>,

    /// Full replacement for the built-in synonym groups.
    #[serde(default)]
    pub synonym_groups: Option<Vec<Vec<String>>>,

    /// Full replacement for the built-in sentiment indicator lists.
    #[serde(default)]
    pub sentiment: Option<SentimentLexicon>,
}

impl AnalysisConfig {
    /// Resolve this config into an owned [`Vocabulary`].
    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary::from_config(self)
    }

    /// Resolve the sentiment lexicon (override or built-in defaults).
    pub fn sentiment_lexicon(&self) -> SentimentLexicon {
        self.sentiment.clone().unwrap_or_default()
    }
}

/// Resolved, immutable word tables used by tokenization and similarity.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    stop_words: HashSet<String>,
    synonym_groups: Vec<Vec<String>>,
}

impl Vocabulary {
    fn from_config(cfg: &AnalysisConfig) -> Self {
        let mut stop_words: HashSet<String> =
            STOP_WORDS_EN.iter().map(|w| w.to_string()).collect();

        let extra: &[&str] = match cfg.language.as_deref() {
            Some("de") => STOP_WORDS_DE,
            Some("fr") => STOP_WORDS_FR,
            Some("es") => STOP_WORDS_ES,
            _ => &[],
        };
        stop_words.extend(extra.iter().map(|w| w.to_string()));
        stop_words.extend(cfg.extra_stop_words.iter().map(|w| w.to_lowercase()));

        let synonym_groups = match &cfg.synonym_groups {
            Some(groups) => groups
                .iter()
                .map(|g| g.iter().map(|w| w.to_lowercase()).collect())
                .collect(),
            None => SYNONYM_GROUPS
                .iter()
                .map(|g| g.iter().map(|w| w.to_string()).collect())
                .collect(),
        };

        Self {
            stop_words,
            synonym_groups,
        }
    }

    /// Whether `word` (already lowercased) is a stop word.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Index of the synonym group containing `word`, if any.
    pub fn synonym_group_of(&self, word: &str) -> Option<usize> {
        self.synonym_groups
            .iter()
            .position(|g| g.iter().any(|w| w == word))
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Vocabulary::from_config(&AnalysisConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_extends_stop_words() {
        let en = AnalysisConfig::default().vocabulary();
        assert!(!en.is_stop_word("oder"));

        let de = AnalysisConfig {
            language: Some("de".into()),
            ..Default::default()
        }
        .vocabulary();
        assert!(de.is_stop_word("oder"));
        // The English base set stays in place.
        assert!(de.is_stop_word("the"));
    }

    #[test]
    fn extra_stop_words_are_lowercased() {
        let vocab = AnalysisConfig {
            extra_stop_words: vec!["Basically".into()],
            ..Default::default()
        }
        .vocabulary();
        assert!(vocab.is_stop_word("basically"));
    }

    #[test]
    fn synonym_override_replaces_builtin_groups() {
        let vocab = AnalysisConfig {
            synonym_groups: Some(vec![vec!["alpha".into(), "beta".into()]]),
            ..Default::default()
        }
        .vocabulary();
        assert_eq!(vocab.synonym_group_of("alpha"), Some(0));
        assert_eq!(vocab.synonym_group_of("great"), None);
    }
}

//! Keyword-count sentiment classification.
//!
//! Two deliberately separate algorithms live here:
//!
//! - [`classify`] — whole-word, case-insensitive counting with a ×1.5
//!   dominance threshold, used on full normalized responses;
//! - [`classify_snippet`] — plain substring containment with a `>` tie
//!   threshold, used on short context windows where word-boundary
//!   regexes cost more than they buy.
//!
//! The two serve different precision/performance tradeoffs and must not
//! be unified.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Default positive indicators.
const POSITIVE_EN: &[&str] = &[
    "excellent", "great", "best", "leading", "innovative", "trusted", "reliable", "recommended",
    "outstanding", "popular", "successful", "powerful", "impressive", "strong", "robust",
    "seamless", "intuitive", "efficient", "affordable",
];

/// Default negative indicators.
const NEGATIVE_EN: &[&str] = &[
    "bad", "poor", "worst", "unreliable", "outdated", "expensive", "difficult", "weak",
    "limited", "problematic", "slow", "disappointing", "lacking", "inferior", "failing",
    "clunky", "confusing", "buggy",
];

/// Dominance factor: one polarity must exceed the other by ×1.5.
const DOMINANCE: f64 = 1.5;

/// Sentiment label for one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// Positive/negative indicator word lists.
///
/// Cloneable value type; overriding it never mutates shared state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentLexicon {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

impl Default for SentimentLexicon {
    fn default() -> Self {
        Self {
            positive: POSITIVE_EN.iter().map(|w| w.to_string()).collect(),
            negative: NEGATIVE_EN.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// Classify a full response text.
///
/// Counts whole-word, case-insensitive occurrences of each indicator.
/// Positive iff positive-count > negative-count × 1.5; negative iff the
/// inverse holds; neutral otherwise. Pure and total.
pub fn classify(text: &str, lexicon: &SentimentLexicon) -> Sentiment {
    let pos = count_whole_words(text, &lexicon.positive) as f64;
    let neg = count_whole_words(text, &lexicon.negative) as f64;

    if pos > neg * DOMINANCE {
        Sentiment::Positive
    } else if neg > pos * DOMINANCE {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Classify a short context snippet.
///
/// Substring containment instead of word boundaries, and a plain `>`
/// comparison instead of the ×1.5 dominance factor.
pub fn classify_snippet(snippet: &str, lexicon: &SentimentLexicon) -> Sentiment {
    let lowered = snippet.to_lowercase();
    let pos = lexicon
        .positive
        .iter()
        .filter(|w| lowered.contains(w.to_lowercase().as_str()))
        .count();
    let neg = lexicon
        .negative
        .iter()
        .filter(|w| lowered.contains(w.to_lowercase().as_str()))
        .count();

    if pos > neg {
        Sentiment::Positive
    } else if neg > pos {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

fn count_whole_words(text: &str, words: &[String]) -> usize {
    words
        .iter()
        .map(|w| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(w));
            // Escaped indicator words always form a valid pattern.
            let re = Regex::new(&pattern).unwrap();
            re.find_iter(text).count()
        })
        .sum()
}

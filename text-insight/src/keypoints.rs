//! Heuristic key-point extraction: pick the salient sentences of one
//! response.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

/// Maximum key points returned per response.
const MAX_KEY_POINTS: usize = 10;
/// Sentences outside this length band are discarded.
const MIN_SENTENCE_LEN: usize = 20;
const MAX_SENTENCE_LEN: usize = 300;

/// Importance keywords with their score weights. Matching is substring,
/// case-insensitive, so "recommended" also triggers "recommend".
const IMPORTANCE_KEYWORDS: &[(&str, i32)] = &[
    ("recommend", 3),
    ("important", 2),
    ("must", 2),
    ("essential", 2),
    ("critical", 2),
    ("best", 2),
    ("leading", 2),
    ("key", 1),
    ("should", 1),
    ("top", 1),
];

lazy_static! {
    /// Sentence-terminal punctuation.
    static ref RE_SENTENCE_SPLIT: Regex = Regex::new(r"[.!?]+").unwrap();
    /// Percentage figures ("87%", "12.5 %").
    static ref RE_PERCENT: Regex = Regex::new(r"\d+(?:\.\d+)?\s*%").unwrap();
    /// Currency figures ("$40", "€12.50", "30 USD").
    static ref RE_CURRENCY: Regex =
        Regex::new(r"[$€£]\s*\d|\d+(?:\.\d+)?\s*(?:USD|EUR|GBP|dollars|euros)").unwrap();
}

/// Extract up to 10 salient sentences from `text`, best first.
///
/// Sentences shorter than 20 or longer than 300 characters are dropped.
/// Each survivor is scored by weighted importance-keyword hits plus +2
/// for a percentage pattern and +2 for a currency pattern. The sort is
/// stable: equal scores keep their original order. Zero-score sentences
/// stay eligible, so short responses still yield key points.
pub fn extract_key_points(text: &str) -> Vec<String> {
    let mut scored: Vec<(i32, String)> = RE_SENTENCE_SPLIT
        .split(text)
        .map(str::trim)
        .filter(|s| {
            let len = s.chars().count();
            len >= MIN_SENTENCE_LEN && len <= MAX_SENTENCE_LEN
        })
        .map(|s| (score_sentence(s), s.to_string()))
        .collect();

    trace!("extract_key_points: {} candidate sentences", scored.len());

    // Stable by construction: sort_by with a pure key comparison.
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored
        .into_iter()
        .take(MAX_KEY_POINTS)
        .map(|(_, s)| s)
        .collect()
}

fn score_sentence(sentence: &str) -> i32 {
    let lowered = sentence.to_lowercase();
    let mut score = 0;
    for (kw, weight) in IMPORTANCE_KEYWORDS {
        if lowered.contains(kw) {
            score += weight;
        }
    }
    if RE_PERCENT.is_match(sentence) {
        score += 2;
    }
    if RE_CURRENCY.is_match(sentence) {
        score += 2;
    }
    score
}

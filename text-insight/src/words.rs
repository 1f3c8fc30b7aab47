//! Significant-word extraction and the fuzzy similarity predicate.
//!
//! The predicate is lexical by design (no embeddings): two texts are
//! similar when their stop-word-filtered token sets overlap directly,
//! through shared stems, or through membership in the same synonym
//! group. The weights and the acceptance threshold are fixed tuning
//! constants carried over from the reference behavior.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::Vocabulary;

/// Weight of a stem-level (shared prefix) word match.
const STEM_WEIGHT: f64 = 0.8;
/// Weight of a concept-level (synonym group) word match.
const CONCEPT_WEIGHT: f64 = 0.7;
/// Minimal weighted-overlap ratio for two texts to count as similar.
const SIMILARITY_THRESHOLD: f64 = 0.3;

lazy_static! {
    /// Word-ish tokens: letters/digits plus inner hyphens.
    static ref RE_TOKEN: Regex = Regex::new(r"[\p{L}\p{N}]+(?:-[\p{L}\p{N}]+)*").unwrap();
    /// Characters allowed in a canonical cluster key.
    static ref RE_KEY_STRIP: Regex = Regex::new(r"[^\p{L}\p{N}\s-]").unwrap();
    static ref RE_KEY_SPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Lowercase tokens longer than 2 characters that are not stop words.
///
/// Order of first appearance is preserved and duplicates are dropped,
/// so the result behaves as an insertion-ordered set.
pub fn significant_words(text: &str, vocab: &Vocabulary) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for m in RE_TOKEN.find_iter(&text.to_lowercase()) {
        let tok = m.as_str();
        if tok.chars().count() <= 2 || vocab.is_stop_word(tok) {
            continue;
        }
        if !out.iter().any(|w| w == tok) {
            out.push(tok.to_string());
        }
    }
    out
}

/// Canonical key for cluster representatives: lowercase, keep only
/// letters/digits/space/hyphen (Unicode-aware), collapse whitespace.
pub fn canonical_key(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = RE_KEY_STRIP.replace_all(&lowered, "");
    RE_KEY_SPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Fuzzy similarity between two texts, wording-independent.
///
/// Weighted overlap = direct + 0.8 × stem + 0.7 × concept, normalized
/// by the smaller significant-word set. Texts with an empty significant
/// set are never similar to anything.
pub fn similar(a: &str, b: &str, vocab: &Vocabulary) -> bool {
    let wa = significant_words(a, vocab);
    let wb = significant_words(b, vocab);
    if wa.is_empty() || wb.is_empty() {
        return false;
    }

    let direct = wa.iter().filter(|w| wb.contains(w)).count() as f64;
    let stem = stem_overlap(&wa, &wb) as f64;
    let concept = concept_overlap(&wa, &wb, vocab) as f64;

    let score = direct + STEM_WEIGHT * stem + CONCEPT_WEIGHT * concept;
    let ratio = score / wa.len().min(wb.len()) as f64;
    ratio >= SIMILARITY_THRESHOLD
}

/// Count words of `a` sharing a prefix with some distinct word of `b`.
///
/// Both words must be at least 5 characters; the compared prefix length
/// is `min(5, floor(0.6 × min(len_a, len_b)))`. The first matching word
/// of `b` wins per word of `a`.
fn stem_overlap(a: &[String], b: &[String]) -> usize {
    let mut count = 0;
    for wa in a {
        let la = wa.chars().count();
        if la < 5 {
            continue;
        }
        let hit = b.iter().any(|wb| {
            if wb == wa {
                return false;
            }
            let lb = wb.chars().count();
            if lb < 5 {
                return false;
            }
            let plen = 5.min((0.6 * la.min(lb) as f64).floor() as usize);
            plen > 0 && prefix(wa, plen) == prefix(wb, plen)
        });
        if hit {
            count += 1;
        }
    }
    count
}

/// Count words of `a` that share a synonym group with some word of `b`.
fn concept_overlap(a: &[String], b: &[String], vocab: &Vocabulary) -> usize {
    a.iter()
        .filter(|wa| {
            vocab
                .synonym_group_of(wa)
                .is_some_and(|g| b.iter().any(|wb| vocab.synonym_group_of(wb) == Some(g)))
        })
        .count()
}

fn prefix(word: &str, chars: usize) -> String {
    word.chars().take(chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::default()
    }

    #[test]
    fn significant_words_filter_and_dedup() {
        let words = significant_words("The CRM is the best CRM for sales teams", &vocab());
        assert_eq!(words, vec!["crm", "best", "sales", "teams"]);
    }

    #[test]
    fn canonical_key_strips_punctuation() {
        assert_eq!(
            canonical_key("  Asana is GREAT, for task-tracking! "),
            "asana is great for task-tracking"
        );
    }

    #[test]
    fn identical_meaning_different_wording_is_similar() {
        assert!(similar(
            "Asana is great for task tracking",
            "Asana works great for tracking tasks",
            &vocab()
        ));
    }

    #[test]
    fn unrelated_texts_are_not_similar() {
        assert!(!similar(
            "Salesforce dominates enterprise CRM pricing",
            "Trello offers kanban boards",
            &vocab()
        ));
    }

    #[test]
    fn empty_significant_set_is_never_similar() {
        assert!(!similar("it is", "it is", &vocab()));
    }

    #[test]
    fn stem_overlap_requires_five_chars_and_distinct_words() {
        // "tracking" vs "tracker": prefix min(5, floor(0.6*7)=4) = 4 -> "trac".
        assert_eq!(
            stem_overlap(&["tracking".into()], &["tracker".into()]),
            1
        );
        // Identical words are direct matches, not stem matches.
        assert_eq!(stem_overlap(&["tracking".into()], &["tracking".into()]), 0);
        // Short words never stem-match.
        assert_eq!(stem_overlap(&["task".into()], &["tasks".into()]), 0);
    }

    #[test]
    fn concept_overlap_uses_synonym_groups() {
        assert_eq!(
            concept_overlap(&["excellent".into()], &["great".into()], &vocab()),
            1
        );
        assert_eq!(
            concept_overlap(&["excellent".into()], &["kanban".into()], &vocab()),
            0
        );
    }
}

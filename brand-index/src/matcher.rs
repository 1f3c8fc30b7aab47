//! Multi-word brand span detection over a validated database.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::db::BrandDatabase;
use crate::error::Result;

/// Longest span (in tokens) tried at each start position.
const MAX_SPAN_TOKENS: usize = 3;
/// Default cap on detection results.
const DEFAULT_MAX_RESULTS: usize = 50;
/// Default context-window radius in characters.
const DEFAULT_CONTEXT_RADIUS: usize = 50;

lazy_static! {
    /// Word tokens including inner hyphens/dots ("Monday.com",
    /// "Rolls-Royce"); trailing sentence punctuation never attaches.
    static ref RE_TOKEN: Regex = Regex::new(r"\w+(?:[.-]\w+)*").unwrap();
}

/// Match certainty tier, ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// One detected brand span in a specific text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandOccurrence {
    /// The text exactly as written in the source.
    pub text: String,
    /// Canonical (case-preserving) database name.
    pub canonical: String,
    pub confidence: Confidence,
    /// Byte offset of the first matched character.
    pub start: usize,
    /// Byte offset one past the last matched character.
    pub end: usize,
}

/// Detection knobs.
#[derive(Debug, Clone)]
pub struct DetectOptions {
    /// Drop occurrences below this tier.
    pub min_confidence: Confidence,
    /// Cap on the number of returned occurrences.
    pub max_results: usize,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            min_confidence: Confidence::Low,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// Knobs for [`BrandMatcher::analyze`].
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub detect: DetectOptions,
    /// Attach a context window per occurrence.
    pub include_contexts: bool,
    /// Context radius in characters on each side of the span.
    pub context_radius: usize,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            detect: DetectOptions::default(),
            include_contexts: true,
            context_radius: DEFAULT_CONTEXT_RADIUS,
        }
    }
}

/// Detections grouped under one canonical brand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandMention {
    pub brand: String,
    pub count: usize,
    pub occurrences: Vec<BrandOccurrence>,
    /// Context windows, parallel to `occurrences`; empty when contexts
    /// were not requested.
    pub contexts: Vec<String>,
}

/// Aggregate output of [`BrandMatcher::analyze`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandReport {
    /// Distinct brands found.
    pub total_brands: usize,
    /// Total occurrences across all brands.
    pub total_mentions: usize,
    /// Mention groups, most-mentioned first.
    pub mentions: Vec<BrandMention>,
    /// Most-mentioned brand, `None` when nothing matched.
    pub top_brand: Option<String>,
}

/// Detector over one immutable [`BrandDatabase`].
#[derive(Debug, Clone)]
pub struct BrandMatcher {
    db: BrandDatabase,
}

impl BrandMatcher {
    /// Wrap a validated database.
    ///
    /// Validation happens at [`BrandDatabase`] construction, so this is
    /// infallible; use [`BrandMatcher::from_json_str`] to build from a
    /// raw document in one step.
    pub fn new(db: BrandDatabase) -> Self {
        Self { db }
    }

    /// Parse, validate and wrap a JSON database document.
    ///
    /// # Errors
    /// Any [`crate::BrandIndexError`] from parsing or validation; a
    /// malformed document never makes it to detection calls.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(Self::new(BrandDatabase::from_json_str(json)?))
    }

    /// Borrow the underlying database.
    pub fn database(&self) -> &BrandDatabase {
        &self.db
    }

    /// Case-insensitive exact membership test.
    pub fn is_known(&self, text: &str) -> bool {
        self.db.canonical_for(&text.to_lowercase()).is_some()
    }

    /// Confidence tier for a name, `None` when unknown.
    ///
    /// High if the canonical name is in the high-confidence set; Low if
    /// the lowercased original text is an ignored dictionary word;
    /// Medium for any other known name.
    pub fn confidence_of(&self, text: &str) -> Option<Confidence> {
        let lower = text.to_lowercase();
        self.db.canonical_for(&lower)?;
        if self.db.is_high_confidence(&lower) {
            Some(Confidence::High)
        } else if self.db.is_ignored_term(&lower) {
            Some(Confidence::Low)
        } else {
            Some(Confidence::Medium)
        }
    }

    /// Detect brand spans in `text`, ordered by start offset.
    ///
    /// At every token position, spans of 1, 2 and 3 tokens (joined by a
    /// single space) are tried in that order and each qualifying span is
    /// recorded. Deduplication is by exact `(start, end)` span only, so
    /// a 1-token and a 3-token match starting at the same position both
    /// survive when their end offsets differ. This non-greedy-longest
    /// behavior is part of the output contract: downstream mention
    /// counts depend on it.
    pub fn detect(&self, text: &str, opts: &DetectOptions) -> Vec<BrandOccurrence> {
        let tokens: Vec<(usize, usize, &str)> = RE_TOKEN
            .find_iter(text)
            .map(|m| (m.start(), m.end(), m.as_str()))
            .collect();

        let mut out: Vec<BrandOccurrence> = Vec::new();
        for i in 0..tokens.len() {
            for len in 1..=MAX_SPAN_TOKENS {
                if i + len > tokens.len() {
                    break;
                }
                let joined = tokens[i..i + len]
                    .iter()
                    .map(|t| t.2)
                    .collect::<Vec<_>>()
                    .join(" ");
                let lower = joined.to_lowercase();
                let Some(canonical) = self.db.canonical_for(&lower) else {
                    continue;
                };

                let start = tokens[i].0;
                let end = tokens[i + len - 1].1;
                if out.iter().any(|o| o.start == start && o.end == end) {
                    continue;
                }

                let confidence = if self.db.is_high_confidence(&lower) {
                    Confidence::High
                } else if self.db.is_ignored_term(&lower) {
                    Confidence::Low
                } else {
                    Confidence::Medium
                };

                out.push(BrandOccurrence {
                    text: text[start..end].to_string(),
                    canonical: canonical.to_string(),
                    confidence,
                    start,
                    end,
                });
            }
        }

        out.retain(|o| o.confidence >= opts.min_confidence);
        out.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));
        out.truncate(opts.max_results);

        trace!("detect: {} occurrences", out.len());
        out
    }

    /// Group detections by canonical name into a mention report.
    pub fn analyze(&self, text: &str, opts: &AnalyzeOptions) -> BrandReport {
        let occurrences = self.detect(text, &opts.detect);
        let total_mentions = occurrences.len();

        // Group preserving first-seen order before the count sort.
        let mut groups: Vec<BrandMention> = Vec::new();
        for occ in occurrences {
            let context = opts
                .include_contexts
                .then(|| context_window(text, occ.start, occ.end, opts.context_radius));
            match groups.iter_mut().find(|g| g.brand == occ.canonical) {
                Some(g) => {
                    g.count += 1;
                    if let Some(c) = context {
                        g.contexts.push(c);
                    }
                    g.occurrences.push(occ);
                }
                None => groups.push(BrandMention {
                    brand: occ.canonical.clone(),
                    count: 1,
                    contexts: context.into_iter().collect(),
                    occurrences: vec![occ],
                }),
            }
        }

        groups.sort_by(|a, b| b.count.cmp(&a.count));
        let top_brand = groups.first().map(|g| g.brand.clone());

        BrandReport {
            total_brands: groups.len(),
            total_mentions,
            mentions: groups,
            top_brand,
        }
    }

    /// Case-insensitive prefix autocomplete over canonical names,
    /// alphabetically sorted and capped at `limit`.
    pub fn suggest(&self, partial: &str, limit: usize) -> Vec<String> {
        let prefix = partial.to_lowercase();
        if prefix.is_empty() {
            return Vec::new();
        }
        let mut names: Vec<String> = self
            .db
            .canonical_names()
            .filter(|n| n.to_lowercase().starts_with(&prefix))
            .map(|n| n.to_string())
            .collect();
        names.sort();
        names.truncate(limit);
        names
    }
}

/// Extract a context window around `[start, end)` with ellipsis markers
/// when the window is truncated on either side.
pub fn context_window(text: &str, start: usize, end: usize, radius: usize) -> String {
    let from = floor_char_boundary(text, start.saturating_sub(radius));
    let to = ceil_char_boundary(text, (end + radius).min(text.len()));

    let mut out = String::new();
    if from > 0 {
        out.push_str("...");
    }
    out.push_str(&text[from..to]);
    if to < text.len() {
        out.push_str("...");
    }
    out
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx < text.len() && !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{BrandDatabase, DatabaseMeta};

    fn matcher() -> BrandMatcher {
        let meta = DatabaseMeta {
            version: "1.0.0".into(),
            generated_at: "2025-01-01T00:00:00Z".into(),
            sources: vec![],
            total_raw: 6,
            total_filtered: 6,
            ignored_terms: vec!["slack".into()],
        };
        let db = BrandDatabase::new(
            meta,
            vec![
                "Salesforce".into(),
                "HubSpot".into(),
                "Slack".into(),
                "Monday.com".into(),
                "General Motors".into(),
                "General Motors Company".into(),
            ],
            vec!["Salesforce".into(), "HubSpot".into()],
        )
        .unwrap();
        BrandMatcher::new(db)
    }

    #[test]
    fn detects_two_brands_in_order_with_offsets() {
        let text = "I recommend Salesforce and HubSpot";
        let occs = matcher().detect(text, &DetectOptions::default());
        assert_eq!(occs.len(), 2);

        assert_eq!(occs[0].canonical, "Salesforce");
        assert_eq!(occs[0].confidence, Confidence::High);
        assert_eq!(&text[occs[0].start..occs[0].end], "Salesforce");

        assert_eq!(occs[1].canonical, "HubSpot");
        assert_eq!(occs[1].confidence, Confidence::High);
        assert_eq!(&text[occs[1].start..occs[1].end], "HubSpot");

        assert!(occs[0].end <= occs[1].start, "spans must not overlap");
    }

    #[test]
    fn case_insensitive_with_canonical_name() {
        let occs = matcher().detect("try SALESFORCE today", &DetectOptions::default());
        assert_eq!(occs.len(), 1);
        assert_eq!(occs[0].text, "SALESFORCE");
        assert_eq!(occs[0].canonical, "Salesforce");
    }

    #[test]
    fn ignored_term_demotes_to_low() {
        let m = matcher();
        assert_eq!(m.confidence_of("Slack"), Some(Confidence::Low));
        assert_eq!(m.confidence_of("Monday.com"), Some(Confidence::Medium));
        assert_eq!(m.confidence_of("Nothing Known"), None);

        let occs = m.detect(
            "We use Slack daily",
            &DetectOptions {
                min_confidence: Confidence::Medium,
                max_results: 10,
            },
        );
        assert!(occs.is_empty(), "low-confidence match must be filtered");
    }

    #[test]
    fn dotted_token_matches_single_span() {
        let occs = matcher().detect("Monday.com rules scheduling", &DetectOptions::default());
        assert_eq!(occs.len(), 1);
        assert_eq!(occs[0].canonical, "Monday.com");
        assert_eq!(occs[0].start, 0);
    }

    #[test]
    fn same_start_different_length_spans_both_survive() {
        // "General Motors" (2 tokens) and "General Motors Company"
        // (3 tokens) start at the same offset; exact-span dedup keeps
        // both. Preserved behavior, not a bug to fix.
        let text = "General Motors Company builds cars";
        let occs = matcher().detect(text, &DetectOptions::default());
        assert_eq!(occs.len(), 2);
        assert_eq!(occs[0].canonical, "General Motors");
        assert_eq!(occs[1].canonical, "General Motors Company");
        assert_eq!(occs[0].start, occs[1].start);
        assert!(occs[0].end < occs[1].end);
    }

    #[test]
    fn analyze_groups_counts_and_contexts() {
        let text = "Salesforce leads. HubSpot follows Salesforce closely.";
        let report = matcher().analyze(text, &AnalyzeOptions::default());
        assert_eq!(report.total_brands, 2);
        assert_eq!(report.total_mentions, 3);
        assert_eq!(report.top_brand.as_deref(), Some("Salesforce"));
        assert_eq!(report.mentions[0].count, 2);
        assert_eq!(report.mentions[0].contexts.len(), 2);
    }

    #[test]
    fn analyze_empty_text_yields_empty_report() {
        let report = matcher().analyze("", &AnalyzeOptions::default());
        assert_eq!(report.total_mentions, 0);
        assert!(report.top_brand.is_none());
        assert!(report.mentions.is_empty());
    }

    #[test]
    fn suggest_prefix_sorted_and_capped() {
        let m = matcher();
        assert_eq!(m.suggest("s", 10), vec!["Salesforce", "Slack"]);
        assert_eq!(m.suggest("s", 1), vec!["Salesforce"]);
        assert_eq!(m.suggest("hub", 10), vec!["HubSpot"]);
        assert!(m.suggest("", 10).is_empty());
        assert!(m.suggest("zzz", 10).is_empty());
    }

    #[test]
    fn context_window_adds_ellipses_when_truncated() {
        let text = "aaaaaaaaaa TARGET bbbbbbbbbb";
        let w = context_window(text, 11, 17, 4);
        assert_eq!(w, "...aaa TARGET bbb...");

        // Full-width window has no markers.
        let w = context_window(text, 11, 17, 100);
        assert_eq!(w, text);
    }
}

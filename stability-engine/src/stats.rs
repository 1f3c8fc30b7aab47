//! Numeric layer: overlap, entropy, concentration and score formulas.
//!
//! All functions are total over their documented domains; degenerate
//! inputs (empty distributions, single responses) take the documented
//! fallback values instead of dividing by zero.

use std::collections::HashSet;

use text_insight::{Sentiment, Vocabulary, significant_words};
use tracing::trace;

use crate::types::{BrandMentionStats, ResponseRecord, SentimentDistribution};

/// Weight of semantic overlap in the consistency score.
const W_OVERLAP: f64 = 0.4;
/// Weight of the brand-variance component.
const W_VARIANCE: f64 = 0.3;
/// Weight of the core-message component.
const W_CORE: f64 = 0.3;

/// Jaccard similarity of two string collections, as sets.
///
/// Two empty sets are identical (1.0); one empty set against a
/// non-empty one yields 0.0.
pub fn jaccard<S: AsRef<str>>(a: &[S], b: &[S]) -> f64 {
    let sa: HashSet<&str> = a.iter().map(AsRef::as_ref).collect();
    let sb: HashSet<&str> = b.iter().map(AsRef::as_ref).collect();
    if sa.is_empty() && sb.is_empty() {
        return 1.0;
    }
    let intersection = sa.intersection(&sb).count() as f64;
    let union = sa.union(&sb).count() as f64;
    if union == 0.0 { 0.0 } else { intersection / union }
}

/// Mean pairwise Jaccard overlap of the responses' significant-word
/// sets, as a 0–100 percentage. Fewer than 2 responses ⇒ 100.
pub fn semantic_overlap(records: &[ResponseRecord], vocab: &Vocabulary) -> f64 {
    if records.len() < 2 {
        return 100.0;
    }

    let word_sets: Vec<Vec<String>> = records
        .iter()
        .map(|r| significant_words(&r.text, vocab))
        .collect();

    let mut sum = 0.0;
    let mut pairs = 0usize;
    for i in 0..word_sets.len() {
        for j in (i + 1)..word_sets.len() {
            sum += jaccard(&word_sets[i], &word_sets[j]) * 100.0;
            pairs += 1;
        }
    }

    let overlap = sum / pairs as f64;
    trace!("semantic_overlap: {:.1}% over {} pairs", overlap, pairs);
    overlap
}

/// Shannon entropy of a distribution of non-negative counts, in bits.
///
/// `−Σ p·log2(p)` with `p = count/total`; zero-count buckets contribute
/// nothing and an empty/zero distribution has entropy 0.
pub fn shannon_entropy(counts: &[f64]) -> f64 {
    let total: f64 = counts.iter().filter(|&&c| c > 0.0).sum();
    if total <= 0.0 {
        return 0.0;
    }
    counts
        .iter()
        .filter(|&&c| c > 0.0)
        .map(|&c| {
            let p = c / total;
            -p * p.log2()
        })
        .sum()
}

/// Entropy normalized by `log2` of the number of non-zero buckets;
/// 0 when one or fewer buckets carry mass.
pub fn normalized_entropy(counts: &[f64]) -> f64 {
    let non_zero = counts.iter().filter(|&&c| c > 0.0).count();
    if non_zero <= 1 {
        return 0.0;
    }
    shannon_entropy(counts) / (non_zero as f64).log2()
}

/// Gini coefficient of a non-negative distribution, clamped to [0, 1].
///
/// Standard rank-weighted formula over values sorted ascending; 0 for
/// an empty or all-zero distribution.
pub fn gini(values: &[f64]) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    let sum: f64 = values.iter().sum();
    if sum <= 0.0 {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64 + 1.0) * v)
        .sum();

    let g = (2.0 * weighted) / (n as f64 * sum) - (n as f64 + 1.0) / n as f64;
    g.clamp(0.0, 1.0)
}

/// Shared brands and case-insensitive Jaccard index of two brand sets.
pub fn brand_overlap(a: &[String], b: &[String]) -> (Vec<String>, f64) {
    let la: Vec<String> = a.iter().map(|s| s.to_lowercase()).collect();
    let lb: Vec<String> = b.iter().map(|s| s.to_lowercase()).collect();
    let sb: HashSet<&str> = lb.iter().map(String::as_str).collect();

    // Report shared names in `a`'s casing, preserving `a`'s order.
    let mut shared = Vec::new();
    for (orig, lower) in a.iter().zip(&la) {
        if sb.contains(lower.as_str()) && !shared.contains(orig) {
            shared.push(orig.clone());
        }
    }
    (shared, jaccard(&la, &lb))
}

/// Mention-count statistics over the run's responses.
///
/// `contexts` carries every individual mention context, run-wide, in
/// iteration order.
pub fn brand_mention_stats(records: &[ResponseRecord], contexts: Vec<String>) -> BrandMentionStats {
    let counts: Vec<usize> = records.iter().map(|r| r.brand_mentions.len()).collect();
    if counts.is_empty() {
        return BrandMentionStats {
            contexts,
            ..Default::default()
        };
    }

    let total: usize = counts.iter().sum();
    let mean = total as f64 / counts.len() as f64;
    let variance = counts
        .iter()
        .map(|&c| (c as f64 - mean).powi(2))
        .sum::<f64>()
        / counts.len() as f64;

    BrandMentionStats {
        total,
        min: *counts.iter().min().unwrap(),
        max: *counts.iter().max().unwrap(),
        mean,
        variance,
        std_dev: variance.sqrt(),
        contexts,
    }
}

/// Percentage of responses per sentiment label.
pub fn sentiment_distribution(records: &[ResponseRecord]) -> SentimentDistribution {
    if records.is_empty() {
        return SentimentDistribution::default();
    }
    let n = records.len() as f64;
    let count = |s: Sentiment| records.iter().filter(|r| r.sentiment == s).count() as f64;

    SentimentDistribution {
        positive_pct: count(Sentiment::Positive) / n * 100.0,
        neutral_pct: count(Sentiment::Neutral) / n * 100.0,
        negative_pct: count(Sentiment::Negative) / n * 100.0,
    }
}

/// Weighted consistency score, 0–100.
///
/// `round(0.4·overlap + 0.3·varianceScore + 0.3·coreScore)` where
/// `varianceScore = max(0, 100 − (variance/5)·100)` and
/// `coreScore = min(100, coreCount·20)`.
pub fn consistency_score(semantic_overlap: f64, brand_variance: f64, core_count: usize) -> u32 {
    let variance_score = (100.0 - (brand_variance / 5.0) * 100.0).max(0.0);
    let core_score = (core_count as f64 * 20.0).min(100.0);

    let score = W_OVERLAP * semantic_overlap + W_VARIANCE * variance_score + W_CORE * core_score;
    score.round().clamp(0.0, 100.0) as u32
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use text_insight::Sentiment;

    use super::*;
    use crate::types::ResponseRecord;

    fn record(iteration: u32, text: &str, sentiment: Sentiment) -> ResponseRecord {
        ResponseRecord {
            iteration,
            raw_text: text.into(),
            text: text.into(),
            latency_ms: 100,
            timestamp: Utc::now(),
            sentiment,
            key_points: vec![],
            brand_mentions: vec![],
            citations: vec![],
        }
    }

    #[test]
    fn jaccard_reference_values() {
        assert!((jaccard(&["a", "b", "c"], &["b", "c", "d"]) - 0.5).abs() < 1e-9);
        assert!((jaccard::<&str>(&[], &[]) - 1.0).abs() < 1e-9);
        assert!((jaccard(&["a"], &[]) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn entropy_reference_values() {
        assert!((shannon_entropy(&[5.0, 5.0, 5.0, 5.0]) - 2.0).abs() < 1e-9);
        assert_eq!(shannon_entropy(&[]), 0.0);
        assert_eq!(shannon_entropy(&[10.0]), 0.0);
    }

    #[test]
    fn normalized_entropy_bounds() {
        // Uniform over 4 buckets: 2.0 / log2(4) = 1.0.
        assert!((normalized_entropy(&[5.0, 5.0, 5.0, 5.0]) - 1.0).abs() < 1e-9);
        assert_eq!(normalized_entropy(&[10.0]), 0.0);
        assert_eq!(normalized_entropy(&[]), 0.0);
    }

    #[test]
    fn gini_reference_values() {
        assert!(gini(&[10.0, 10.0, 10.0, 10.0]).abs() < 1e-9);
        assert!(gini(&[100.0, 1.0, 1.0, 1.0]) > 0.5);
        assert_eq!(gini(&[]), 0.0);
        assert_eq!(gini(&[0.0, 0.0]), 0.0);

        for dist in [&[1.0, 2.0, 3.0][..], &[9.0][..], &[0.5, 100.0][..]] {
            let g = gini(dist);
            assert!((0.0..=1.0).contains(&g), "gini out of range: {g}");
        }
    }

    #[test]
    fn semantic_overlap_of_identical_texts_is_full() {
        let vocab = Vocabulary::default();
        let records = vec![
            record(1, "Asana tracks projects well", Sentiment::Neutral),
            record(2, "Asana tracks projects well", Sentiment::Neutral),
        ];
        assert!((semantic_overlap(&records, &vocab) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn semantic_overlap_single_response_is_full() {
        let vocab = Vocabulary::default();
        let records = vec![record(1, "anything", Sentiment::Neutral)];
        assert_eq!(semantic_overlap(&records, &vocab), 100.0);
    }

    #[test]
    fn brand_overlap_is_case_insensitive() {
        let a = vec!["Asana".to_string(), "Trello".to_string()];
        let b = vec!["asana".to_string(), "Notion".to_string()];
        let (shared, j) = brand_overlap(&a, &b);
        assert_eq!(shared, vec!["Asana"]);
        assert!((j - (1.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn mention_stats_population_variance() {
        let mut records = vec![
            record(1, "x", Sentiment::Neutral),
            record(2, "x", Sentiment::Neutral),
        ];
        records[0].brand_mentions = vec![occurrence(); 2];
        records[1].brand_mentions = vec![occurrence(); 4];

        let stats = brand_mention_stats(&records, vec![]);
        assert_eq!(stats.total, 6);
        assert_eq!(stats.min, 2);
        assert_eq!(stats.max, 4);
        assert!((stats.mean - 3.0).abs() < 1e-9);
        assert!((stats.variance - 1.0).abs() < 1e-9);
        assert!((stats.std_dev - 1.0).abs() < 1e-9);
    }

    fn occurrence() -> brand_index::BrandOccurrence {
        brand_index::BrandOccurrence {
            text: "Asana".into(),
            canonical: "Asana".into(),
            confidence: brand_index::Confidence::High,
            start: 0,
            end: 5,
        }
    }

    #[test]
    fn sentiment_distribution_percentages() {
        let records = vec![
            record(1, "x", Sentiment::Positive),
            record(2, "x", Sentiment::Positive),
            record(3, "x", Sentiment::Neutral),
            record(4, "x", Sentiment::Negative),
        ];
        let dist = sentiment_distribution(&records);
        assert!((dist.positive_pct - 50.0).abs() < 1e-9);
        assert!((dist.neutral_pct - 25.0).abs() < 1e-9);
        assert!((dist.negative_pct - 25.0).abs() < 1e-9);
    }

    #[test]
    fn consistency_score_components() {
        // Perfect run: full overlap, zero variance, 5+ core messages.
        assert_eq!(consistency_score(100.0, 0.0, 5), 100);
        // No overlap, wild variance, nothing core.
        assert_eq!(consistency_score(0.0, 10.0, 0), 0);
        // Mixed: 0.4·50 + 0.3·100 + 0.3·40 = 62.
        assert_eq!(consistency_score(50.0, 0.0, 2), 62);
    }
}

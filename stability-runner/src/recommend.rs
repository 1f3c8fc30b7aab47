//! Advisory recommendation strings derived from run statistics.
//!
//! Pure text generation over already-computed numbers; nothing here
//! feeds back into the analysis.

use stability_engine::{
    BrandMentionStats, ClassifiedMessages, ModelDistribution, ModelPairOverlap,
    SentimentDistribution, UniversalMessages,
};

/// Consistency score below which a run is flagged unstable.
const LOW_CONSISTENCY: u32 = 50;
/// Mean mention count below which a tracked brand counts as sparse.
const SPARSE_MENTIONS: f64 = 1.0;
/// Negative-sentiment share (percent) that triggers a flag.
const NEGATIVE_SHARE: f64 = 30.0;
/// Normalized entropy above which a brand distribution is dispersed.
const HIGH_ENTROPY: f64 = 0.75;
/// Mean pairwise Jaccard below which cross-model overlap is low.
const LOW_OVERLAP: f64 = 0.3;

/// Recommendations for a single-model stability run.
pub fn for_run(
    consistency_score: u32,
    messages: &ClassifiedMessages,
    brand: Option<&str>,
    brand_stats: &BrandMentionStats,
    sentiment: &SentimentDistribution,
) -> Vec<String> {
    let mut out = Vec::new();

    if consistency_score < LOW_CONSISTENCY {
        out.push(format!(
            "Consistency score is low ({consistency_score}/100): answers vary substantially \
             between runs. Consider a more specific prompt or a lower temperature."
        ));
    }

    if messages.core.is_empty() {
        out.push(
            "No core message appeared across iterations; the model does not converge on a \
             stable answer for this prompt."
                .to_string(),
        );
    }

    if let Some(brand) = brand {
        if brand_stats.mean < SPARSE_MENTIONS {
            out.push(format!(
                "\"{brand}\" is mentioned {:.1} times per answer on average; its visibility \
                 for this prompt is weak.",
                brand_stats.mean
            ));
        }
    }

    if sentiment.negative_pct >= NEGATIVE_SHARE {
        out.push(format!(
            "{:.0}% of answers carry negative sentiment; review how the prompt's subject is \
             being characterized.",
            sentiment.negative_pct
        ));
    }

    out
}

/// Recommendations for a cross-model experiment.
pub fn for_experiment(
    universal_brands: &[String],
    overlaps: &[ModelPairOverlap],
    distributions: &[ModelDistribution],
    messages: &UniversalMessages,
) -> Vec<String> {
    let mut out = Vec::new();

    if universal_brands.is_empty() {
        out.push(
            "No brand is mentioned by every model; brand visibility for this prompt is \
             model-dependent."
                .to_string(),
        );
    }

    if !overlaps.is_empty() {
        let mean = overlaps.iter().map(|o| o.jaccard).sum::<f64>() / overlaps.len() as f64;
        if mean < LOW_OVERLAP {
            out.push(format!(
                "Cross-model brand overlap is low (mean Jaccard {mean:.2}); different models \
                 surface largely different brands."
            ));
        }
    }

    for dist in distributions {
        if dist.normalized_entropy > HIGH_ENTROPY {
            out.push(format!(
                "{} spreads its mentions across many brands (normalized entropy {:.2}); no \
                 single brand dominates its answers.",
                dist.model, dist.normalized_entropy
            ));
        }
    }

    if messages.universal.is_empty() {
        out.push(
            "The models share no universal core message; their answers diverge in substance, \
             not just wording."
                .to_string(),
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_runs_produce_no_noise() {
        let messages = ClassifiedMessages {
            core: vec![stability_engine::classify::CoreMessage {
                message: "asana handles tasks well".into(),
                frequency_pct: 100.0,
            }],
            ..Default::default()
        };
        let recs = for_run(
            90,
            &messages,
            None,
            &BrandMentionStats::default(),
            &SentimentDistribution {
                positive_pct: 80.0,
                neutral_pct: 20.0,
                negative_pct: 0.0,
            },
        );
        assert!(recs.is_empty());
    }

    #[test]
    fn low_score_and_missing_core_are_both_flagged() {
        let recs = for_run(
            30,
            &ClassifiedMessages::default(),
            Some("Asana"),
            &BrandMentionStats::default(),
            &SentimentDistribution::default(),
        );
        assert_eq!(recs.len(), 3);
        assert!(recs[0].contains("30/100"));
        assert!(recs[2].contains("Asana"));
    }
}

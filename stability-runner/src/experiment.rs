//! Cross-model experiment: the same prompt, several providers.
//!
//! Each configured model executes a full stability run sequentially;
//! a model whose run fails entirely is logged and skipped, so one dead
//! provider never kills the experiment. On top of the per-model results
//! the experiment compares coarse brand sets (pairwise overlap,
//! universal brands, per-model entropy/Gini) and merges core messages
//! into universal vs. partial agreement.

use std::collections::HashMap;

use brand_index::BrandMatcher;
use lazy_static::lazy_static;
use regex::Regex;
use stability_engine::{
    BrandFrequency, ExperimentResult, ModelBrandProfile, ModelDistribution, ModelPairOverlap,
    PartialMessage, ResponseRecord, UniversalMessages, brand_overlap, gini, normalized_entropy,
    shannon_entropy,
};
use text_insight::{Vocabulary, similar};
use tracing::{info, warn};

use crate::backend::QueryBackend;
use crate::errors::{Result, RunError};
use crate::observer::RunObserver;
use crate::options::RunOptions;
use crate::recommend;
use crate::run::run_with_records;

/// One participating model: display label plus its query backend.
#[derive(Debug)]
pub struct ExperimentModel<B> {
    pub label: String,
    pub backend: B,
}

/// Well-known brand names matched verbatim (word-bounded,
/// case-insensitive) before the generic capitalized-phrase fallback.
const CURATED_BRANDS: &[&str] = &[
    "Asana",
    "Trello",
    "Notion",
    "Jira",
    "ClickUp",
    "Monday.com",
    "Basecamp",
    "Wrike",
    "Airtable",
    "Smartsheet",
    "Salesforce",
    "HubSpot",
    "Zoho",
    "Pipedrive",
    "Microsoft",
    "Google",
    "Apple",
    "Amazon",
    "IBM",
    "Oracle",
    "SAP",
    "Slack",
    "Zoom",
    "Adobe",
    "Shopify",
];

/// Cap on brands reported per model profile.
const MAX_PROFILE_BRANDS: usize = 20;

lazy_static! {
    static ref RE_CURATED: Vec<(&'static str, Regex)> = CURATED_BRANDS
        .iter()
        .map(|name| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(name));
            (*name, Regex::new(&pattern).unwrap())
        })
        .collect();
    /// Capitalized word or run of capitalized words, dots and hyphens
    /// allowed inside a word ("Monday.com", "Hewlett-Packard").
    static ref RE_CAPITALIZED: Regex =
        Regex::new(r"\b[A-Z][A-Za-z0-9]*(?:[.-][A-Za-z0-9]+)*(?:\s+[A-Z][A-Za-z0-9]*(?:[.-][A-Za-z0-9]+)*)*")
            .unwrap();
}

/// Run the experiment over all configured models.
///
/// # Errors
/// - configuration errors from option validation, before any query
/// - [`RunError::EmptyExperiment`] when no model produced a result
pub async fn run_experiment<B, O>(
    models: &[ExperimentModel<B>],
    options: &RunOptions,
    matcher: Option<&BrandMatcher>,
    observer: &O,
) -> Result<ExperimentResult>
where
    B: QueryBackend,
    O: RunObserver,
{
    // Fail on bad options up front rather than per model.
    options.validated()?;
    let vocab = options.analysis.vocabulary();

    info!(models = models.len(), "cross-model experiment started");

    let mut labels = Vec::new();
    let mut results = Vec::new();
    let mut model_brands = Vec::new();
    let mut distributions = Vec::new();
    let mut core_per_model: Vec<(String, Vec<String>)> = Vec::new();

    for model in models {
        let mut per_model = options.clone();
        per_model.model = model.label.clone();

        match run_with_records(&model.backend, &per_model, matcher, observer).await {
            Ok((result, records)) => {
                let brands = extract_brands(&records, &vocab);
                let counts: Vec<f64> = brands.iter().map(|b| b.count as f64).collect();

                distributions.push(ModelDistribution {
                    model: model.label.clone(),
                    entropy: shannon_entropy(&counts),
                    normalized_entropy: normalized_entropy(&counts),
                    gini: gini(&counts),
                });
                model_brands.push(ModelBrandProfile {
                    model: model.label.clone(),
                    brands,
                });
                core_per_model.push((
                    model.label.clone(),
                    result.messages.core.iter().map(|c| c.message.clone()).collect(),
                ));
                labels.push(model.label.clone());
                results.push(result);
            }
            Err(err) => {
                warn!(model = %model.label, error = %err, "model run failed, skipping");
            }
        }
    }

    if results.is_empty() {
        return Err(RunError::EmptyExperiment);
    }

    let overlaps = pairwise_overlaps(&model_brands);
    let universal_brands = universal_brands(&model_brands);
    let messages = merge_core_messages(&core_per_model, &vocab);
    let recommendations =
        recommend::for_experiment(&universal_brands, &overlaps, &distributions, &messages);

    info!(
        models = labels.len(),
        universal_brands = universal_brands.len(),
        universal_messages = messages.universal.len(),
        "cross-model experiment finished"
    );

    Ok(ExperimentResult {
        prompt: options.prompt.clone(),
        models: labels,
        results,
        model_brands,
        overlaps,
        universal_brands,
        distributions,
        messages,
        recommendations,
    })
}

/// Coarse brand extraction over one model's responses.
///
/// Curated names are matched case-insensitively and reported under
/// their canonical casing; everything else falls back to capitalized
/// phrases with stop words trimmed off the front. Counts are keyed
/// case-insensitively; most frequent first, name as tiebreak.
fn extract_brands(records: &[ResponseRecord], vocab: &Vocabulary) -> Vec<BrandFrequency> {
    let mut counts: HashMap<String, (String, usize)> = HashMap::new();
    let mut bump = |display: &str| {
        let entry = counts
            .entry(display.to_lowercase())
            .or_insert_with(|| (display.to_string(), 0));
        entry.1 += 1;
    };

    for record in records {
        let mut covered: Vec<(usize, usize)> = Vec::new();

        for (name, re) in RE_CURATED.iter() {
            for m in re.find_iter(&record.text) {
                covered.push((m.start(), m.end()));
                bump(name);
            }
        }

        for m in RE_CAPITALIZED.find_iter(&record.text) {
            if covered.iter().any(|&(s, e)| m.start() < e && s < m.end()) {
                continue;
            }
            if let Some(candidate) = trim_phrase(m.as_str(), vocab) {
                bump(&candidate);
            }
        }
    }

    let mut brands: Vec<BrandFrequency> = counts
        .into_values()
        .map(|(name, count)| BrandFrequency { name, count })
        .collect();
    brands.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    brands.truncate(MAX_PROFILE_BRANDS);
    brands
}

/// Strip leading stop words from a capitalized phrase; reject phrases
/// that are nothing but stop words or too short to be a name.
fn trim_phrase(phrase: &str, vocab: &Vocabulary) -> Option<String> {
    let words: Vec<&str> = phrase
        .split_whitespace()
        .skip_while(|w| vocab.is_stop_word(&w.to_lowercase()))
        .collect();
    if words.is_empty() {
        return None;
    }
    let trimmed = words.join(" ");
    if trimmed.chars().count() < 3 || words.iter().all(|w| vocab.is_stop_word(&w.to_lowercase())) {
        return None;
    }
    Some(trimmed)
}

fn pairwise_overlaps(profiles: &[ModelBrandProfile]) -> Vec<ModelPairOverlap> {
    let names: Vec<Vec<String>> = profiles
        .iter()
        .map(|p| p.brands.iter().map(|b| b.name.clone()).collect())
        .collect();

    let mut out = Vec::new();
    for i in 0..profiles.len() {
        for j in (i + 1)..profiles.len() {
            let (shared_brands, jaccard) = brand_overlap(&names[i], &names[j]);
            out.push(ModelPairOverlap {
                model_a: profiles[i].model.clone(),
                model_b: profiles[j].model.clone(),
                shared_brands,
                jaccard,
            });
        }
    }
    out
}

/// Brands present in every model's profile, in the first model's casing
/// and order.
fn universal_brands(profiles: &[ModelBrandProfile]) -> Vec<String> {
    let Some(first) = profiles.first() else {
        return Vec::new();
    };

    first
        .brands
        .iter()
        .filter(|b| {
            let lower = b.name.to_lowercase();
            profiles[1..].iter().all(|p| {
                p.brands
                    .iter()
                    .any(|other| other.name.to_lowercase() == lower)
            })
        })
        .map(|b| b.name.clone())
        .collect()
}

/// Merge the models' core messages into universal vs. partial buckets.
///
/// A message is universal when every model has a similar core message,
/// partial when at least two (but not all) do. Model-specific messages
/// are omitted. Later messages similar to an already-bucketed one are
/// folded into it rather than listed again.
fn merge_core_messages(
    per_model: &[(String, Vec<String>)],
    vocab: &Vocabulary,
) -> UniversalMessages {
    let total = per_model.len();
    let mut out = UniversalMessages::default();
    let mut seen: Vec<String> = Vec::new();

    for (_, messages) in per_model {
        for message in messages {
            if seen.iter().any(|s| similar(s, message, vocab)) {
                continue;
            }
            seen.push(message.clone());

            let models: Vec<String> = per_model
                .iter()
                .filter(|(_, other)| other.iter().any(|o| similar(message, o, vocab)))
                .map(|(label, _)| label.clone())
                .collect();

            if models.len() == total {
                out.universal.push(message.clone());
            } else if models.len() >= 2 {
                out.partial.push(PartialMessage {
                    message: message.clone(),
                    models,
                });
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use text_insight::{AnalysisConfig, Sentiment};

    use super::*;

    fn record(text: &str) -> ResponseRecord {
        ResponseRecord {
            iteration: 1,
            raw_text: text.into(),
            text: text.into(),
            latency_ms: 10,
            timestamp: Utc::now(),
            sentiment: Sentiment::Neutral,
            key_points: vec![],
            brand_mentions: vec![],
            citations: vec![],
        }
    }

    fn vocab() -> Vocabulary {
        AnalysisConfig::default().vocabulary()
    }

    #[test]
    fn curated_brands_win_over_the_fallback() {
        let records = vec![record(
            "Both asana and Trello work, though Asana scales better.",
        )];
        let brands = extract_brands(&records, &vocab());

        let asana = brands.iter().find(|b| b.name == "Asana").unwrap();
        assert_eq!(asana.count, 2, "lowercase mention still counts");
        assert!(brands.iter().any(|b| b.name == "Trello"));
    }

    #[test]
    fn capitalized_fallback_catches_unlisted_names() {
        let records = vec![record("Teamwork Projects is a lesser-known option.")];
        let brands = extract_brands(&records, &vocab());
        assert!(brands.iter().any(|b| b.name == "Teamwork Projects"));
    }

    #[test]
    fn stop_word_phrases_are_rejected() {
        let records = vec![record("The And But are not brands here.")];
        let brands = extract_brands(&records, &vocab());
        assert!(!brands.iter().any(|b| b.name.eq_ignore_ascii_case("the")));
    }

    #[test]
    fn universal_brand_requires_every_model() {
        let profiles = vec![
            ModelBrandProfile {
                model: "a".into(),
                brands: vec![
                    BrandFrequency { name: "Asana".into(), count: 3 },
                    BrandFrequency { name: "Trello".into(), count: 1 },
                ],
            },
            ModelBrandProfile {
                model: "b".into(),
                brands: vec![BrandFrequency { name: "asana".into(), count: 2 }],
            },
        ];
        assert_eq!(universal_brands(&profiles), vec!["Asana"]);
    }

    #[test]
    fn core_messages_split_into_universal_and_partial() {
        let per_model = vec![
            (
                "a".to_string(),
                vec![
                    "asana handles task tracking well".to_string(),
                    "trello offers kanban boards".to_string(),
                ],
            ),
            (
                "b".to_string(),
                vec![
                    "asana handles tracking tasks well".to_string(),
                    "notion shines for documentation".to_string(),
                ],
            ),
            (
                "c".to_string(),
                vec![
                    "asana handles task tracking nicely".to_string(),
                    "trello offers kanban boards too".to_string(),
                ],
            ),
        ];
        let merged = merge_core_messages(&per_model, &vocab());

        assert_eq!(merged.universal, vec!["asana handles task tracking well"]);
        assert_eq!(merged.partial.len(), 1);
        assert_eq!(merged.partial[0].message, "trello offers kanban boards");
        assert_eq!(merged.partial[0].models, vec!["a", "c"]);
    }
}

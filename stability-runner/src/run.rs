//! Single-model stability run.
//!
//! The loop is sequential on purpose: iterations of the same prompt
//! against the same model are the unit of comparison, and interleaving
//! them would blur latency numbers and provider-side rate behavior.
//! Per-iteration failures are isolated; only a fully failed run is an
//! error.

use std::time::Instant;

use brand_index::{BrandMatcher, BrandOccurrence, Confidence, context_window};
use chrono::Utc;
use llm_query::QueryRequest;
use regex::Regex;
use stability_engine::{
    ResponseRecord, RunMetadata, SearchCitation, StabilityResult, brand_mention_stats,
    classify_clusters, cluster_responses, consistency_score, semantic_overlap,
    sentiment_distribution,
};
use text_insight::{classify, extract_key_points, normalize};
use tracing::{debug, info, warn};

use crate::backend::QueryBackend;
use crate::errors::{IterationFailure, Result, RunError};
use crate::observer::RunObserver;
use crate::options::RunOptions;
use crate::recommend;
use crate::variations::brand_variations;

/// Context radius for brand mention windows, chars per side.
const MENTION_CONTEXT_RADIUS: usize = 50;

/// Execute one stability run: query the backend `iterations` times,
/// analyze the successful responses, assemble the result.
///
/// Failed iterations are recorded, reported through `observer.on_error`
/// and skipped; the resulting metadata counts only successful
/// iterations. A fixed delay separates iterations (never appended after
/// the last).
///
/// # Errors
/// - [`RunError::Config`] for invalid options, before any query
/// - [`RunError::AllIterationsFailed`] when not a single iteration
///   produced a response
pub async fn run_stability<B, O>(
    backend: &B,
    options: &RunOptions,
    matcher: Option<&BrandMatcher>,
    observer: &O,
) -> Result<StabilityResult>
where
    B: QueryBackend,
    O: RunObserver,
{
    let (result, _records) = run_with_records(backend, options, matcher, observer).await?;
    Ok(result)
}

/// Like [`run_stability`], but also hands back the response records for
/// callers that analyze across runs (the cross-model experiment).
pub(crate) async fn run_with_records<B, O>(
    backend: &B,
    options: &RunOptions,
    matcher: Option<&BrandMatcher>,
    observer: &O,
) -> Result<(StabilityResult, Vec<ResponseRecord>)>
where
    B: QueryBackend,
    O: RunObserver,
{
    let options = options.validated()?;
    let requested = options.iterations;
    let started = Instant::now();

    info!(
        model = %options.model,
        iterations = requested,
        search_mode = options.search_mode,
        brand = options.brand.as_deref().unwrap_or("-"),
        "stability run started"
    );

    let lexicon = options.analysis.sentiment_lexicon();
    let brand_patterns = options
        .brand
        .as_deref()
        .map(|brand| (brand.to_string(), variation_patterns(brand)));

    let request = QueryRequest {
        prompt: options.prompt.clone(),
        temperature: options.temperature,
        max_tokens: options.max_tokens,
        search_mode: options.search_mode,
    };

    let mut records: Vec<ResponseRecord> = Vec::new();
    let mut failures: Vec<IterationFailure> = Vec::new();

    for iteration in 1..=requested {
        match backend.query(&request).await {
            Ok(outcome) => {
                let text = normalize(&outcome.text);
                let sentiment = classify(&text, &lexicon);
                let key_points = extract_key_points(&text);
                let brand_mentions = match &brand_patterns {
                    Some((brand, patterns)) => {
                        detect_tracked_brand(&text, brand, patterns, matcher)
                    }
                    None => Vec::new(),
                };

                debug!(
                    iteration,
                    latency_ms = outcome.latency_ms,
                    key_points = key_points.len(),
                    brand_mentions = brand_mentions.len(),
                    ?sentiment,
                    "iteration completed"
                );

                records.push(ResponseRecord {
                    iteration,
                    raw_text: outcome.text,
                    text,
                    latency_ms: outcome.latency_ms,
                    timestamp: Utc::now(),
                    sentiment,
                    key_points,
                    brand_mentions,
                    citations: outcome
                        .citations
                        .into_iter()
                        .map(|c| SearchCitation {
                            url: c.url,
                            title: c.title,
                            snippet: c.snippet,
                        })
                        .collect(),
                });
            }
            Err(err) => {
                let failure = IterationFailure::from_query_error(iteration, &err);
                warn!(
                    iteration,
                    error = %failure.message,
                    "iteration failed, continuing"
                );
                observer.on_error(&failure);
                failures.push(failure);
            }
        }

        observer.on_progress(iteration, requested);

        if iteration < requested && options.delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(options.delay_ms)).await;
        }
    }

    if records.is_empty() {
        return Err(RunError::AllIterationsFailed {
            attempted: requested,
            first_message: failures
                .first()
                .map(|f| f.message.clone())
                .unwrap_or_default(),
        });
    }

    let result = assemble_result(&options, requested, &records, started.elapsed().as_millis() as u64);
    info!(
        model = %options.model,
        consistency = result.consistency_score,
        iterations = result.metadata.iterations,
        failed = failures.len(),
        execution_time_ms = result.metadata.execution_time_ms,
        "stability run finished"
    );
    Ok((result, records))
}

/// Run the statistics pipeline over the successful responses.
fn assemble_result(
    options: &RunOptions,
    requested: u32,
    records: &[ResponseRecord],
    execution_time_ms: u64,
) -> StabilityResult {
    let vocab = options.analysis.vocabulary();

    let clusters = cluster_responses(records, &vocab);
    let messages = classify_clusters(&clusters, records.len() as u32);
    let overlap = semantic_overlap(records, &vocab);

    let contexts: Vec<String> = records
        .iter()
        .flat_map(|r| {
            r.brand_mentions
                .iter()
                .map(|m| context_window(&r.text, m.start, m.end, MENTION_CONTEXT_RADIUS))
        })
        .collect();
    let brand_stats = brand_mention_stats(records, contexts);
    let sentiment = sentiment_distribution(records);

    let score = consistency_score(overlap, brand_stats.variance, messages.core.len());
    let recommendations = recommend::for_run(
        score,
        &messages,
        options.brand.as_deref(),
        &brand_stats,
        &sentiment,
    );

    StabilityResult {
        consistency_score: score,
        semantic_overlap: overlap,
        messages,
        brand_stats,
        sentiment,
        recommendations,
        metadata: RunMetadata {
            prompt: options.prompt.clone(),
            model: options.model.clone(),
            iterations: records.len() as u32,
            requested_iterations: requested,
            execution_time_ms,
            search_mode: options.search_mode,
        },
    }
}

/// Compile one whole-word case-insensitive pattern per brand variation.
fn variation_patterns(brand: &str) -> Vec<Regex> {
    brand_variations(brand)
        .iter()
        .filter_map(|v| Regex::new(&format!(r"(?i)\b{}\b", regex::escape(v))).ok())
        .collect()
}

/// Find tracked-brand mentions in one normalized response text.
///
/// Confidence comes from the dictionary matcher when one is supplied;
/// unknown names default to Medium (the caller asked for this brand
/// explicitly, so it is not a dictionary word). Overlapping variation
/// hits dedup by start offset, widest span wins.
fn detect_tracked_brand(
    text: &str,
    brand: &str,
    patterns: &[Regex],
    matcher: Option<&BrandMatcher>,
) -> Vec<BrandOccurrence> {
    let mut found: Vec<BrandOccurrence> = Vec::new();

    for pattern in patterns {
        for m in pattern.find_iter(text) {
            let confidence = matcher
                .and_then(|mx| mx.confidence_of(m.as_str()))
                .unwrap_or(Confidence::Medium);
            found.push(BrandOccurrence {
                text: m.as_str().to_string(),
                canonical: brand.to_string(),
                confidence,
                start: m.start(),
                end: m.end(),
            });
        }
    }

    found.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
    found.dedup_by_key(|m| m.start);
    found
}

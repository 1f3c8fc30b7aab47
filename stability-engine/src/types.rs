//! Result data model for stability runs and cross-model experiments.
//!
//! All types here are plain serializable data (no cyclic references,
//! no callbacks) — they are the sole output contract consumed by
//! presentation layers.

use brand_index::BrandOccurrence;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use text_insight::Sentiment;

/// One grounded-search citation attached to a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCitation {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
}

/// One LLM reply to one iteration of a fixed prompt.
///
/// Created once per successful query and immutable thereafter. Owned by
/// the orchestrator for the duration of a run; never shared across
/// runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseRecord {
    /// Iteration index, 1-based and unique within a run.
    pub iteration: u32,
    /// Raw model output, exactly as returned.
    pub raw_text: String,
    /// Markdown-stripped prose used by all downstream analysis.
    pub text: String,
    pub latency_ms: u64,
    pub timestamp: DateTime<Utc>,
    pub sentiment: Sentiment,
    pub key_points: Vec<String>,
    /// Tracked-brand mentions found in this response.
    pub brand_mentions: Vec<BrandOccurrence>,
    #[serde(default)]
    pub citations: Vec<SearchCitation>,
}

/// Mention-count statistics over all responses of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandMentionStats {
    pub total: usize,
    pub min: usize,
    pub max: usize,
    pub mean: f64,
    /// Population variance of per-response mention counts.
    pub variance: f64,
    pub std_dev: f64,
    /// Context windows of every individual mention, run-wide.
    pub contexts: Vec<String>,
}

/// Share of responses per sentiment label, in percent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive_pct: f64,
    pub neutral_pct: f64,
    pub negative_pct: f64,
}

/// Run metadata echoed into the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub prompt: String,
    pub model: String,
    /// Number of SUCCESSFUL iterations backing the result.
    pub iterations: u32,
    /// Iterations originally requested (after clamping).
    pub requested_iterations: u32,
    pub execution_time_ms: u64,
    pub search_mode: bool,
}

/// Aggregate stability view for one model/prompt pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilityResult {
    /// Weighted consistency score, 0–100.
    pub consistency_score: u32,
    /// Mean pairwise semantic overlap, 0–100.
    pub semantic_overlap: f64,
    pub messages: crate::classify::ClassifiedMessages,
    pub brand_stats: BrandMentionStats,
    pub sentiment: SentimentDistribution,
    /// Advisory free-text strings derived from the numbers.
    pub recommendations: Vec<String>,
    pub metadata: RunMetadata,
}

/// Brand with its mention count in one model's responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandFrequency {
    pub name: String,
    pub count: usize,
}

/// Coarse brand profile extracted from one model's responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBrandProfile {
    pub model: String,
    /// Unique brands with counts, most frequent first.
    pub brands: Vec<BrandFrequency>,
}

/// Pairwise cross-model brand overlap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPairOverlap {
    pub model_a: String,
    pub model_b: String,
    pub shared_brands: Vec<String>,
    /// Case-insensitive Jaccard index over the two brand sets, 0–1.
    pub jaccard: f64,
}

/// Entropy/Gini summary of one model's brand distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDistribution {
    pub model: String,
    pub entropy: f64,
    pub normalized_entropy: f64,
    pub gini: f64,
}

/// A core message shared by only a subset of models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartialMessage {
    pub message: String,
    pub models: Vec<String>,
}

/// Core messages split into all-model vs. subset agreement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UniversalMessages {
    /// Messages with a similar core message in every model.
    pub universal: Vec<String>,
    pub partial: Vec<PartialMessage>,
}

/// Aggregate over multiple per-model stability runs for one prompt.
///
/// Composed from copies of the underlying per-model results; nothing
/// aliases back into them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentResult {
    pub prompt: String,
    pub models: Vec<String>,
    pub results: Vec<StabilityResult>,
    pub model_brands: Vec<ModelBrandProfile>,
    pub overlaps: Vec<ModelPairOverlap>,
    /// Brands present in every model's profile.
    pub universal_brands: Vec<String>,
    pub distributions: Vec<ModelDistribution>,
    pub messages: UniversalMessages,
    pub recommendations: Vec<String>,
}

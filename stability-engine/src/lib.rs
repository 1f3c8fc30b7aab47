//! Cross-response clustering and stability statistics.
//!
//! This crate turns the per-response artifacts produced upstream
//! (normalized text, key points, brand mentions, sentiment) into the
//! aggregate view of a run:
//!
//! 1. [`cluster_key_points`] merges near-duplicate key points across
//!    iterations into frequency-counted clusters (greedy, insertion
//!    ordered — see the module docs in [`cluster`]).
//! 2. [`classify_clusters`] buckets clusters into core / variable /
//!    outlier messages by appearance frequency.
//! 3. [`stats`] supplies the numeric layer: pairwise Jaccard overlap,
//!    Shannon entropy, Gini concentration, mention statistics and the
//!    weighted consistency score.
//!
//! Everything here is pure computation over owned data; the crate has
//! no transport and no async.

pub mod classify;
pub mod cluster;
pub mod stats;
pub mod types;

pub use classify::{ClassifiedMessages, classify_clusters};
pub use cluster::{MessageCluster, cluster_key_points, cluster_responses};
pub use stats::{
    brand_mention_stats, brand_overlap, consistency_score, gini, jaccard, normalized_entropy,
    semantic_overlap, sentiment_distribution, shannon_entropy,
};
pub use types::{
    BrandFrequency, BrandMentionStats, ExperimentResult, ModelBrandProfile, ModelDistribution,
    ModelPairOverlap, PartialMessage, ResponseRecord, RunMetadata, SearchCitation,
    SentimentDistribution, StabilityResult, UniversalMessages,
};

//! Lexical text analysis primitives for LLM answer stability runs.
//!
//! This crate is deliberately transport-free and embedding-free: every
//! operation here is a pure function over strings plus an immutable
//! configuration value. It provides:
//!
//! - [`normalize`] — markdown stripping into plain prose (idempotent),
//! - [`classify`] / [`classify_snippet`] — keyword-count sentiment,
//! - [`extract_key_points`] — salient-sentence selection per response,
//! - [`significant_words`] / [`similar`] — the stop-word-filtered
//!   tokenization and the fuzzy similarity predicate used by the
//!   cross-response clusterer and the cross-model runner,
//! - [`AnalysisConfig`] / [`Vocabulary`] — defaults with per-call
//!   overrides (no shared mutable state).

mod config;
mod keypoints;
mod normalize;
mod sentiment;
mod words;

pub use config::{AnalysisConfig, Vocabulary};
pub use keypoints::extract_key_points;
pub use normalize::normalize;
pub use sentiment::{Sentiment, SentimentLexicon, classify, classify_snippet};
pub use words::{canonical_key, significant_words, similar};

//! Dictionary-backed brand detection.
//!
//! A [`BrandDatabase`] is an immutable document (canonical names, a
//! high-confidence subset, ignored dictionary words, provenance meta)
//! validated once at construction. A [`BrandMatcher`] owns exactly one
//! database and exposes:
//!
//! - [`BrandMatcher::is_known`] — case-insensitive exact membership,
//! - [`BrandMatcher::confidence_of`] — tier lookup,
//! - [`BrandMatcher::detect`] — multi-word span detection with offsets,
//! - [`BrandMatcher::analyze`] — grouped mention report with context
//!   windows,
//! - [`BrandMatcher::suggest`] — prefix autocomplete.
//!
//! Replacing the database means constructing a new matcher; there is no
//! runtime mutation, so matchers are safe to share read-only across
//! concurrent callers.

mod db;
mod error;
mod matcher;

pub use db::{BrandDatabase, DatabaseMeta, DatabaseSource};
pub use error::{BrandIndexError, Result};
pub use matcher::{
    AnalyzeOptions, BrandMatcher, BrandMention, BrandOccurrence, BrandReport, Confidence,
    DetectOptions, context_window,
};

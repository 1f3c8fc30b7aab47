//! Brand database document: schema, loaders, validation.
//!
//! The document layout follows the upstream data pipeline output:
//! a `meta` block with provenance (sources, counts, license, ignored
//! terms), a `brands` list of canonical names, and a `high_confidence`
//! subset. The database is immutable after construction; schema
//! violations are fatal here, never deferred to detection calls.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BrandIndexError, Result};

/// One upstream source the database was built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSource {
    pub name: String,
    pub url: String,
    pub count: usize,
    pub license: String,
}

/// Provenance metadata for a database snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseMeta {
    pub version: String,
    pub generated_at: String,
    #[serde(default)]
    pub sources: Vec<DatabaseSource>,
    #[serde(default)]
    pub total_raw: usize,
    #[serde(default)]
    pub total_filtered: usize,
    /// Dictionary words that are also brand names; matches against
    /// these are demoted to low confidence.
    #[serde(default)]
    pub ignored_terms: Vec<String>,
}

/// Raw document shape as serialized on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BrandDocument {
    meta: DatabaseMeta,
    brands: Vec<String>,
    #[serde(default)]
    high_confidence: Vec<String>,
}

/// Validated, immutable brand dictionary.
///
/// Keeps the canonical (case-preserving) names plus derived lookup
/// structures: a lowercase → canonical map, the lowercase
/// high-confidence set and the lowercase ignored-terms set.
#[derive(Debug, Clone)]
pub struct BrandDatabase {
    meta: DatabaseMeta,
    canonical: Vec<String>,
    lookup: HashMap<String, usize>,
    high_confidence: HashSet<String>,
    ignored: HashSet<String>,
}

impl BrandDatabase {
    /// Build and validate a database from its parts.
    ///
    /// # Errors
    /// [`BrandIndexError::InvalidDatabase`] when the name list is
    /// empty, contains blank entries, or `high_confidence` names are
    /// missing from `brands`.
    pub fn new(
        meta: DatabaseMeta,
        brands: Vec<String>,
        high_confidence: Vec<String>,
    ) -> Result<Self> {
        if brands.is_empty() {
            return Err(BrandIndexError::InvalidDatabase(
                "brand list is empty".into(),
            ));
        }
        if let Some(bad) = brands.iter().find(|b| b.trim().is_empty()) {
            return Err(BrandIndexError::InvalidDatabase(format!(
                "blank brand entry: {bad:?}"
            )));
        }

        let mut canonical = Vec::with_capacity(brands.len());
        let mut lookup = HashMap::with_capacity(brands.len());
        for name in brands {
            let key = name.to_lowercase();
            // First occurrence wins; later case-variants map to it.
            lookup.entry(key).or_insert_with(|| {
                canonical.push(name.clone());
                canonical.len() - 1
            });
        }

        let mut high = HashSet::with_capacity(high_confidence.len());
        for name in &high_confidence {
            let key = name.to_lowercase();
            if !lookup.contains_key(&key) {
                return Err(BrandIndexError::InvalidDatabase(format!(
                    "high_confidence entry {name:?} is not in brands"
                )));
            }
            high.insert(key);
        }

        let ignored = meta
            .ignored_terms
            .iter()
            .map(|t| t.to_lowercase())
            .collect();

        debug!(
            brands = canonical.len(),
            high_confidence = high.len(),
            "brand database validated"
        );

        Ok(Self {
            meta,
            canonical,
            lookup,
            high_confidence: high,
            ignored,
        })
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: BrandDocument = serde_json::from_str(json)?;
        Self::new(doc.meta, doc.brands, doc.high_confidence)
    }

    /// Read, parse and validate a JSON document from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Provenance block.
    pub fn meta(&self) -> &DatabaseMeta {
        &self.meta
    }

    /// Number of canonical names.
    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }

    /// Canonical (case-preserving) name for a lowercase key.
    pub(crate) fn canonical_for(&self, lower: &str) -> Option<&str> {
        self.lookup.get(lower).map(|&i| self.canonical[i].as_str())
    }

    pub(crate) fn is_high_confidence(&self, lower: &str) -> bool {
        self.high_confidence.contains(lower)
    }

    pub(crate) fn is_ignored_term(&self, lower: &str) -> bool {
        self.ignored.contains(lower)
    }

    /// Iterate canonical names (for autocomplete).
    pub(crate) fn canonical_names(&self) -> impl Iterator<Item = &str> {
        self.canonical.iter().map(String::as_str)
    }
}

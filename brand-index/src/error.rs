//! Typed errors for the brand-index crate.
//!
//! Every variant is a construction-time failure: detection itself never
//! errors (absence of matches yields empty structures).

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, BrandIndexError>;

/// Errors raised while building a [`crate::BrandDatabase`] or
/// [`crate::BrandMatcher`].
#[derive(Debug, Error)]
pub enum BrandIndexError {
    /// The document parsed but violates the schema contract.
    #[error("invalid brand database: {0}")]
    InvalidDatabase(String),

    /// The document could not be parsed as JSON.
    #[error("brand database parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The database file could not be read.
    #[error("brand database io error: {0}")]
    Io(#[from] std::io::Error),
}

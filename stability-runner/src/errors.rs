//! Unified error handling for the run orchestrator.
//!
//! The taxonomy keeps three failure classes apart:
//!
//! 1. configuration errors — fatal before any query is sent,
//! 2. per-iteration failures — isolated, collected, surfaced through
//!    the observer, never returned as errors,
//! 3. all-iterations-failed — fatal after the loop, distinguishable
//!    from (1) so callers can tell "bad setup" from "provider down".

use serde::Serialize;
use thiserror::Error;

/// Unified result alias for the crate.
pub type Result<T> = std::result::Result<T, RunError>;

/// Top-level error of a stability run or experiment.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RunError {
    /// Run options rejected before any work began.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Query client construction failed (missing credential, bad
    /// endpoint). Also a pre-run configuration failure.
    #[error(transparent)]
    Client(#[from] llm_query::LlmQueryError),

    /// Every iteration of the run failed; no result can be built.
    #[error(
        "[Stability Runner] all {attempted} iterations failed; first failure: {first_message}"
    )]
    AllIterationsFailed {
        attempted: u32,
        first_message: String,
    },

    /// Every model of a cross-model experiment failed.
    #[error("[Stability Runner] no model produced a usable result")]
    EmptyExperiment,
}

/// Pre-run validation failures of [`crate::RunOptions`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Iteration count 0 is meaningless, not "do nothing".
    #[error("[Stability Runner] iteration count must be at least 1")]
    ZeroIterations,

    /// An empty prompt cannot be queried.
    #[error("[Stability Runner] prompt must not be empty")]
    EmptyPrompt,
}

/// One failed iteration, recorded and reported but never fatal on its
/// own.
#[derive(Debug, Clone, Serialize)]
pub struct IterationFailure {
    /// 1-based iteration index.
    pub iteration: u32,
    /// Display form of the underlying error.
    pub message: String,
    /// Provider label when the failure is attributable to one.
    pub provider: Option<String>,
}

impl IterationFailure {
    pub(crate) fn from_query_error(iteration: u32, err: &llm_query::LlmQueryError) -> Self {
        let provider = match err {
            llm_query::LlmQueryError::Provider(p) => Some(p.provider.to_string()),
            _ => None,
        };
        Self {
            iteration,
            message: err.to_string(),
            provider,
        }
    }
}

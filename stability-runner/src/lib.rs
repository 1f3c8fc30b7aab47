//! Orchestrator for answer-stability analysis.
//!
//! Single high-level entry per analysis kind:
//!
//! 1. **[`run_stability`] — single-model run**
//!    - Validate options (iteration count, prompt, clamping)
//!    - Query the injected backend once per iteration, sequentially,
//!      with a fixed delay between iterations
//!    - Per success: normalize → sentiment → key points → tracked-brand
//!      mentions → immutable response record
//!    - Per failure: record, notify the observer, continue
//!    - Cluster, classify and score the surviving responses into a
//!      [`stability_engine::StabilityResult`]
//!
//! 2. **[`run_experiment`] — cross-model run**
//!    - One full stability run per configured model (failures isolate)
//!    - Coarse brand profiles, pairwise overlap, universal brands,
//!      per-model entropy/Gini
//!    - Universal vs. partial core messages across models
//!
//! The crate uses `tracing` for stage logging and avoids `async-trait`
//! and heap trait objects: the query seam is a plain `async fn` trait
//! ([`QueryBackend`]) implemented by the enum client from `llm-query`,
//! and the runner is generic over it.

pub mod backend;
pub mod errors;
pub mod experiment;
pub mod observer;
pub mod options;
mod recommend;
pub mod run;
pub mod variations;

pub use backend::QueryBackend;
pub use errors::{ConfigError, IterationFailure, Result, RunError};
pub use experiment::{ExperimentModel, run_experiment};
pub use observer::{NoopObserver, RunObserver};
pub use options::{MAX_ITERATIONS, RunOptions};
pub use run::run_stability;
pub use variations::brand_variations;

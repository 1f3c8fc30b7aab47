//! Progress/error observer for long-running analysis loops.

use crate::errors::IterationFailure;

/// Callbacks fired by the run loop.
///
/// Default implementations are no-ops so callers override only what
/// they care about. The runner always calls `on_progress` after each
/// iteration, completed or failed; `on_error` fires only on failures.
pub trait RunObserver {
    /// An iteration finished (successfully or not).
    ///
    /// Failed iterations count toward `done` so a progress display
    /// reaches `total` even on a lossy run; the failure itself arrives
    /// separately through [`RunObserver::on_error`].
    fn on_progress(&self, _done: u32, _total: u32) {}

    /// An iteration failed and was skipped.
    fn on_error(&self, _failure: &IterationFailure) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

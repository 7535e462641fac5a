//! Event loop errors

use thiserror::Error;

/// Errors raised while driving queued work
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoopError {
    /// A single drain executed `limit` microtasks and the queue was still not empty
    #[error("microtask budget of {limit} exhausted in a single drain")]
    MicrotaskBudgetExceeded {
        /// Configured per-drain limit
        limit: usize,
    },

    /// `run_until` ran out of work before its condition held
    #[error("event loop stalled with the awaited condition unmet")]
    Stalled,
}

//! Unified error types for the runtime.
//!
//! Rejection payloads belong to the caller and are never converted into
//! [`Error`]. They surface through [`AwaitError::Rejected`] instead.

use deferred_concurrency::LoopError;
use thiserror::Error;

/// Errors raised by the runtime itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// All queued work ran out before the awaited computation settled
    #[error("stalled: {0}")]
    Stalled(String),

    /// A single drain exceeded the configured microtask budget
    #[error("microtask budget of {limit} exceeded")]
    BudgetExceeded {
        /// Configured per-drain limit
        limit: usize,
    },

    /// Internal error (bug or invariant violation)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if the awaited computation could never settle.
    pub fn is_stalled(&self) -> bool {
        matches!(self, Error::Stalled(_))
    }

    /// Check if a runaway chain hit the microtask budget.
    pub fn is_budget_exceeded(&self) -> bool {
        matches!(self, Error::BudgetExceeded { .. })
    }
}

impl From<LoopError> for Error {
    fn from(e: LoopError) -> Self {
        match e {
            LoopError::MicrotaskBudgetExceeded { limit } => Error::BudgetExceeded { limit },
            LoopError::Stalled => {
                Error::Stalled("no microtask or timer left to settle the computation".into())
            }
        }
    }
}

/// Failure of [`Runtime::block_on`](crate::Runtime::block_on).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AwaitError<E> {
    /// The computation rejected
    #[error("rejected: {0:?}")]
    Rejected(E),

    /// The runtime failed before the computation settled
    #[error(transparent)]
    Runtime(#[from] Error),
}

impl<E> AwaitError<E> {
    /// The rejection payload, if the computation rejected.
    pub fn rejection(&self) -> Option<&E> {
        match self {
            AwaitError::Rejected(e) => Some(e),
            AwaitError::Runtime(_) => None,
        }
    }

    /// Consume into the rejection payload, if any.
    pub fn into_rejection(self) -> Option<E> {
        match self {
            AwaitError::Rejected(e) => Some(e),
            AwaitError::Runtime(_) => None,
        }
    }
}

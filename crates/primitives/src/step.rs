//! Handler results
//!
//! A chain handler decides how the derived computation settles by returning a
//! [`Step`]. Only `Step::Adopt` flattens: the derived computation waits for
//! the returned one and takes over its outcome.

use crate::deferred::Deferred;
use deferred_core::Outcome;

/// What a chain handler produced
pub enum Step<T, E> {
    /// Fulfill the derived computation with a plain value
    Value(T),
    /// Wait for another computation and adopt its outcome
    Adopt(Deferred<T, E>),
    /// Reject the derived computation
    Raise(E),
}

impl<T, E> From<Result<T, E>> for Step<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(v) => Step::Value(v),
            Err(e) => Step::Raise(e),
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Step<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        match outcome {
            Outcome::Fulfilled(v) => Step::Value(v),
            Outcome::Rejected(e) => Step::Raise(e),
        }
    }
}

impl<T, E> From<Deferred<T, E>> for Step<T, E> {
    fn from(deferred: Deferred<T, E>) -> Self {
        Step::Adopt(deferred)
    }
}

impl<T: std::fmt::Debug, E: std::fmt::Debug> std::fmt::Debug for Step<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Step::Adopt(d) => f.debug_tuple("Adopt").field(&d.id()).finish(),
            Step::Raise(e) => f.debug_tuple("Raise").field(e).finish(),
        }
    }
}

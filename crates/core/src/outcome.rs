//! Terminal outcome of a settled computation

use crate::types::Status;

/// Settled value of a deferred computation
///
/// Exactly one of the two paths is ever taken for a given computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T, E> {
    /// Success payload
    Fulfilled(T),
    /// Failure payload
    Rejected(E),
}

impl<T, E> Outcome<T, E> {
    /// Terminal status matching this outcome
    pub fn status(&self) -> Status {
        match self {
            Outcome::Fulfilled(_) => Status::Fulfilled,
            Outcome::Rejected(_) => Status::Rejected,
        }
    }

    /// True for `Fulfilled`
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Outcome::Fulfilled(_))
    }

    /// True for `Rejected`
    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected(_))
    }

    /// Borrow both payloads
    pub fn as_ref(&self) -> Outcome<&T, &E> {
        match self {
            Outcome::Fulfilled(v) => Outcome::Fulfilled(v),
            Outcome::Rejected(e) => Outcome::Rejected(e),
        }
    }

    /// Success payload, if any
    pub fn fulfilled(self) -> Option<T> {
        match self {
            Outcome::Fulfilled(v) => Some(v),
            Outcome::Rejected(_) => None,
        }
    }

    /// Failure payload, if any
    pub fn rejected(self) -> Option<E> {
        match self {
            Outcome::Fulfilled(_) => None,
            Outcome::Rejected(e) => Some(e),
        }
    }

    /// Convert into a `Result`
    pub fn into_result(self) -> Result<T, E> {
        self.into()
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(v) => Outcome::Fulfilled(v),
            Err(e) => Outcome::Rejected(e),
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        match outcome {
            Outcome::Fulfilled(v) => Ok(v),
            Outcome::Rejected(e) => Err(e),
        }
    }
}

//! Identity and lifecycle types
//!
//! - [`DeferredId`]: Unique identifier allocated for every deferred computation
//! - [`Status`]: Monotonic lifecycle state of a computation

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Unique identifier for a deferred computation
///
/// Ids are allocated from a process-wide counter, so two computations never
/// share an id. They are used in:
/// - Log fields for settlement and dispatch
/// - Unhandled-rejection reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DeferredId(u64);

impl DeferredId {
    /// Allocate the next id
    ///
    /// # Examples
    ///
    /// ```
    /// use deferred_core::DeferredId;
    ///
    /// let a = DeferredId::next();
    /// let b = DeferredId::next();
    /// assert!(b > a);
    /// ```
    pub fn next() -> Self {
        DeferredId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw counter value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for DeferredId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Deferred({})", self.0)
    }
}

/// Lifecycle state of a deferred computation
///
/// Transitions are one-way: `Pending → Fulfilled` or `Pending → Rejected`.
/// A settled status never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Not yet settled
    Pending,
    /// Settled with a success payload
    Fulfilled,
    /// Settled with a failure payload
    Rejected,
}

impl Status {
    /// True once the computation has left `Pending`
    pub fn is_settled(&self) -> bool {
        !matches!(self, Status::Pending)
    }

    /// True for `Fulfilled`
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Status::Fulfilled)
    }

    /// True for `Rejected`
    pub fn is_rejected(&self) -> bool {
        matches!(self, Status::Rejected)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Pending => write!(f, "pending"),
            Status::Fulfilled => write!(f, "fulfilled"),
            Status::Rejected => write!(f, "rejected"),
        }
    }
}

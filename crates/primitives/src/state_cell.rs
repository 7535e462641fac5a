//! StateCell: single-writer settle-once cell
//!
//! Holds the status, the settled outcome and the queue of continuations
//! registered while pending.
//!
//! ## Design
//!
//! The cell is a guarded state transition:
//! - `Pending(continuations)` → `Settled(outcome)` happens at most once
//! - A second `settle` is a silent no-op and reports `AlreadySettled`
//! - Continuations are handed back to the caller instead of being run, so the
//!   lock is never held while user code executes
//! - A rejection that reaches no continuation is flagged unhandled; reporting
//!   and withdrawing that flag both happen under the lock
//!
//! ## Silent double settlement
//!
//! Calling `settle` twice is almost always a programming error, but it is not
//! reported as one. The first outcome stays in place and later calls are only
//! visible in `trace` logs.

use deferred_core::{DeferredId, Outcome, Status};
use parking_lot::Mutex;

/// Callback receiving the outcome of a settled cell
pub type Continuation<T, E> = Box<dyn FnOnce(Outcome<T, E>) + Send + 'static>;

enum CellState<T, E> {
    Pending(Vec<Continuation<T, E>>),
    Settled {
        outcome: Outcome<T, E>,
        unhandled: bool,
    },
}

/// Result of a [`StateCell::settle`] call
pub enum SettleResult<T, E> {
    /// This call settled the cell; the drained continuations, in registration order
    Settled(Vec<Continuation<T, E>>),
    /// The cell was already settled; nothing changed
    AlreadySettled,
}

impl<T, E> SettleResult<T, E> {
    /// True if this call performed the transition
    pub fn is_settled(&self) -> bool {
        matches!(self, SettleResult::Settled(_))
    }
}

/// Result of a [`StateCell::subscribe`] call
pub enum Subscription<T, E> {
    /// Cell is pending; the continuation will be returned by `settle`
    Queued,
    /// Cell is already settled; the continuation is handed back with the outcome
    Ready(Continuation<T, E>, Outcome<T, E>),
}

/// Settle-once state cell
pub struct StateCell<T, E> {
    id: DeferredId,
    state: Mutex<CellState<T, E>>,
}

impl<T, E> StateCell<T, E> {
    /// Identifier of this cell
    pub fn id(&self) -> DeferredId {
        self.id
    }
}

impl<T: Clone, E: Clone> StateCell<T, E> {
    /// Create a pending cell with a fresh id
    pub fn new() -> Self {
        StateCell {
            id: DeferredId::next(),
            state: Mutex::new(CellState::Pending(Vec::new())),
        }
    }

    /// Current status
    pub fn status(&self) -> Status {
        match &*self.state.lock() {
            CellState::Pending(_) => Status::Pending,
            CellState::Settled { outcome, .. } => outcome.status(),
        }
    }

    /// Settled outcome, if any
    pub fn outcome(&self) -> Option<Outcome<T, E>> {
        match &*self.state.lock() {
            CellState::Pending(_) => None,
            CellState::Settled { outcome, .. } => Some(outcome.clone()),
        }
    }

    /// Number of continuations waiting for settlement
    pub fn pending_continuations(&self) -> usize {
        match &*self.state.lock() {
            CellState::Pending(continuations) => continuations.len(),
            CellState::Settled { .. } => 0,
        }
    }

    /// True while the cell holds a rejection nobody has observed
    pub fn is_unhandled(&self) -> bool {
        matches!(&*self.state.lock(), CellState::Settled { unhandled: true, .. })
    }

    /// Transition to `outcome` if still pending
    ///
    /// A rejection with no registered continuation is flagged unhandled and
    /// `on_unhandled` runs before the lock is released.
    pub fn settle<R>(&self, outcome: Outcome<T, E>, on_unhandled: R) -> SettleResult<T, E>
    where
        R: FnOnce(DeferredId),
    {
        let status = outcome.status();
        let mut state = self.state.lock();
        let unhandled = match &*state {
            CellState::Settled { outcome: current, .. } => {
                tracing::trace!(
                    deferred = %self.id,
                    current = %current.status(),
                    ignored = %status,
                    "settle ignored, already settled"
                );
                return SettleResult::AlreadySettled;
            }
            CellState::Pending(continuations) => continuations.is_empty() && status.is_rejected(),
        };

        match std::mem::replace(&mut *state, CellState::Settled { outcome, unhandled }) {
            CellState::Pending(continuations) => {
                tracing::trace!(
                    deferred = %self.id,
                    %status,
                    continuations = continuations.len(),
                    "settled"
                );
                if unhandled {
                    on_unhandled(self.id);
                }
                SettleResult::Settled(continuations)
            }
            CellState::Settled { .. } => SettleResult::AlreadySettled,
        }
    }

    /// Register a continuation
    ///
    /// Subscribing to an unhandled rejection clears the flag and runs
    /// `on_handled` before the lock is released.
    pub fn subscribe<H>(
        &self,
        continuation: Continuation<T, E>,
        on_handled: H,
    ) -> Subscription<T, E>
    where
        H: FnOnce(DeferredId),
    {
        let mut state = self.state.lock();
        match &mut *state {
            CellState::Pending(continuations) => {
                continuations.push(continuation);
                Subscription::Queued
            }
            CellState::Settled { outcome, unhandled } => {
                if std::mem::take(unhandled) {
                    on_handled(self.id);
                }
                Subscription::Ready(continuation, outcome.clone())
            }
        }
    }

    /// Clear the unhandled flag without registering a continuation
    ///
    /// Returns `true` if the flag was set; `on_handled` runs under the lock.
    pub fn mark_handled<H>(&self, on_handled: H) -> bool
    where
        H: FnOnce(DeferredId),
    {
        let mut state = self.state.lock();
        match &mut *state {
            CellState::Settled { unhandled, .. } => {
                if std::mem::take(unhandled) {
                    on_handled(self.id);
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }
}

impl<T: Clone, E: Clone> Default for StateCell<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

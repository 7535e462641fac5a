//! Deferred computation handle and chain builder
//!
//! ## Dispatch
//!
//! Every chaining call (`then`, `then_with`, `catch`, `finally` and the
//! `*_step` variants) creates a derived computation and registers a single
//! continuation on the source. When the source settles:
//!
//! ```text
//! Fulfilled(v) + fulfillment handler  → handler(v)
//! Rejected(e)  + rejection handler    → handler(e)
//! no matching handler                 → derived adopts the source outcome
//! ```
//!
//! The handler result settles the derived computation:
//! `Ok`/`Step::Value` fulfills it, `Err`/`Step::Raise` rejects it and
//! `Step::Adopt` makes it wait for, then copy, another computation.
//!
//! Handlers never run inside the chaining call, even on an already settled
//! source; they are queued on the scheduler and run when it drains.

use crate::resolver::Resolver;
use crate::state_cell::{Continuation, StateCell, Subscription};
use crate::step::Step;
use crate::Payload;
use deferred_concurrency::SharedScheduler;
use deferred_core::{DeferredId, Outcome, Status};
use std::sync::Arc;

/// Handle to a deferred computation
///
/// Cloning the handle does not create a new computation; all clones observe
/// the same state cell.
pub struct Deferred<T, E> {
    cell: Arc<StateCell<T, E>>,
    scheduler: SharedScheduler,
}

impl<T, E> Clone for Deferred<T, E> {
    fn clone(&self) -> Self {
        Deferred {
            cell: Arc::clone(&self.cell),
            scheduler: Arc::clone(&self.scheduler),
        }
    }
}

impl<T, E> Deferred<T, E> {
    /// Identifier of this computation
    pub fn id(&self) -> DeferredId {
        self.cell.id()
    }

    /// Scheduler this computation dispatches continuations to
    pub fn scheduler(&self) -> &SharedScheduler {
        &self.scheduler
    }
}

impl<T: Payload, E: Payload> Deferred<T, E> {
    /// Start a computation
    ///
    /// `setup` runs synchronously, before `new` returns, with the resolver of
    /// the new computation. Returning `Err(e)` from `setup` rejects with `e`
    /// unless the resolver was already used.
    ///
    /// Computations created inside `setup` are independent: settling them,
    /// or chaining on them, never settles this one. Only this computation's
    /// own resolver does.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let greeting = Deferred::new(&scheduler, |resolver| {
    ///     resolver.fulfill("hello");
    ///     Ok(())
    /// });
    /// ```
    pub fn new<F>(scheduler: &SharedScheduler, setup: F) -> Self
    where
        F: FnOnce(Resolver<T, E>) -> Result<(), E>,
    {
        let (deferred, resolver) = Self::pending(scheduler);
        if let Err(fault) = setup(resolver.clone()) {
            if !resolver.reject(fault) {
                tracing::trace!(
                    deferred = %deferred.id(),
                    "setup fault after settlement ignored"
                );
            }
        }
        deferred
    }

    /// A pending computation together with its resolver
    pub fn pending(scheduler: &SharedScheduler) -> (Self, Resolver<T, E>) {
        let cell = Arc::new(StateCell::new());
        let resolver = Resolver::new(Arc::clone(&cell), Arc::clone(scheduler));
        let deferred = Deferred {
            cell,
            scheduler: Arc::clone(scheduler),
        };
        (deferred, resolver)
    }

    /// An already fulfilled computation
    pub fn fulfilled(scheduler: &SharedScheduler, value: T) -> Self {
        let (deferred, resolver) = Self::pending(scheduler);
        resolver.fulfill(value);
        deferred
    }

    /// An already rejected computation
    pub fn rejected(scheduler: &SharedScheduler, reason: E) -> Self {
        let (deferred, resolver) = Self::pending(scheduler);
        resolver.reject(reason);
        deferred
    }

    /// Current status
    pub fn status(&self) -> Status {
        self.cell.status()
    }

    /// True once settled
    pub fn is_settled(&self) -> bool {
        self.cell.status().is_settled()
    }

    /// Settled outcome, if any
    pub fn outcome(&self) -> Option<Outcome<T, E>> {
        self.cell.outcome()
    }

    /// Run `on_fulfilled` with the success payload
    ///
    /// A rejection skips the handler and passes through unchanged.
    pub fn then<U, F>(&self, on_fulfilled: F) -> Deferred<U, E>
    where
        U: Payload,
        F: FnOnce(T) -> Result<U, E> + Send + 'static,
    {
        self.chain(move |value| Step::from(on_fulfilled(value)), Step::Raise)
    }

    /// Run `on_fulfilled` or `on_rejected`, whichever path the source takes
    pub fn then_with<U, F, R>(&self, on_fulfilled: F, on_rejected: R) -> Deferred<U, E>
    where
        U: Payload,
        F: FnOnce(T) -> Result<U, E> + Send + 'static,
        R: FnOnce(E) -> Result<U, E> + Send + 'static,
    {
        self.chain(
            move |value| Step::from(on_fulfilled(value)),
            move |reason| Step::from(on_rejected(reason)),
        )
    }

    /// Run `on_rejected` with the failure payload
    ///
    /// A fulfillment skips the handler and passes through unchanged. Returning
    /// `Ok` recovers the chain; returning `Err` rejects again.
    pub fn catch<R>(&self, on_rejected: R) -> Deferred<T, E>
    where
        R: FnOnce(E) -> Result<T, E> + Send + 'static,
    {
        self.chain(Step::Value, move |reason| Step::from(on_rejected(reason)))
    }

    /// Run `on_settled` on either path
    ///
    /// The derived computation keeps the source outcome. The one exception is
    /// `on_settled` returning `Err(f)`, which rejects the derived computation
    /// with `f` instead.
    pub fn finally<F>(&self, on_settled: F) -> Deferred<T, E>
    where
        F: FnOnce() -> Result<(), E> + Send + 'static,
    {
        let (next, resolver) = Deferred::pending(&self.scheduler);
        self.subscribe(Box::new(move |outcome| {
            let step = match on_settled() {
                Ok(()) => Step::from(outcome),
                Err(fault) => Step::Raise(fault),
            };
            resolver.resolve_step(step);
        }));
        next
    }

    /// Like [`then`](Self::then), but the handler may return a computation to adopt
    pub fn then_step<U, F>(&self, on_fulfilled: F) -> Deferred<U, E>
    where
        U: Payload,
        F: FnOnce(T) -> Step<U, E> + Send + 'static,
    {
        self.chain(on_fulfilled, Step::Raise)
    }

    /// Like [`then_with`](Self::then_with), but handlers may return a computation to adopt
    pub fn then_step_with<U, F, R>(&self, on_fulfilled: F, on_rejected: R) -> Deferred<U, E>
    where
        U: Payload,
        F: FnOnce(T) -> Step<U, E> + Send + 'static,
        R: FnOnce(E) -> Step<U, E> + Send + 'static,
    {
        self.chain(on_fulfilled, on_rejected)
    }

    /// Like [`catch`](Self::catch), but the handler may return a computation to adopt
    pub fn catch_step<R>(&self, on_rejected: R) -> Deferred<T, E>
    where
        R: FnOnce(E) -> Step<T, E> + Send + 'static,
    {
        self.chain(Step::Value, on_rejected)
    }

    fn chain<U, F, R>(&self, on_fulfilled: F, on_rejected: R) -> Deferred<U, E>
    where
        U: Payload,
        F: FnOnce(T) -> Step<U, E> + Send + 'static,
        R: FnOnce(E) -> Step<U, E> + Send + 'static,
    {
        let (next, resolver) = Deferred::pending(&self.scheduler);
        self.subscribe(Box::new(move |outcome| {
            let step = match outcome {
                Outcome::Fulfilled(value) => on_fulfilled(value),
                Outcome::Rejected(reason) => on_rejected(reason),
            };
            resolver.resolve_step(step);
        }));
        next
    }

    /// Register a continuation, queueing it immediately if already settled
    pub(crate) fn subscribe(&self, continuation: Continuation<T, E>) {
        let scheduler = &self.scheduler;
        match self.cell.subscribe(continuation, |id| scheduler.revoke_unhandled(id)) {
            Subscription::Queued => {}
            Subscription::Ready(continuation, outcome) => {
                scheduler.enqueue(Box::new(move || continuation(outcome)));
            }
        }
    }

    /// Treat a rejection as observed without attaching a handler
    ///
    /// Withdraws the unhandled report made when this computation rejected
    /// with no continuation. Returns `true` if a report was withdrawn.
    pub fn mark_handled(&self) -> bool {
        let scheduler = &self.scheduler;
        self.cell.mark_handled(|id| scheduler.revoke_unhandled(id))
    }
}

impl<T, E> std::fmt::Debug for Deferred<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Deferred").field(&self.id().as_u64()).finish()
    }
}

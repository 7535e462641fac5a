//! Resolver: the settle capabilities handed to a setup procedure
//!
//! A `Resolver` is bound to one [`StateCell`]. It is clonable and `Send`, so
//! a setup procedure can move it into timer callbacks or into the setup
//! procedure of another, unrelated computation. Whatever path calls it first
//! decides the outcome; every later call returns `false` and changes nothing.

use crate::state_cell::{Continuation, SettleResult, StateCell};
use crate::step::Step;
use crate::Payload;
use deferred_concurrency::SharedScheduler;
use deferred_core::{DeferredId, Outcome};
use std::sync::Arc;

/// Settle capabilities for one deferred computation
pub struct Resolver<T, E> {
    cell: Arc<StateCell<T, E>>,
    scheduler: SharedScheduler,
}

impl<T, E> Clone for Resolver<T, E> {
    fn clone(&self) -> Self {
        Resolver {
            cell: Arc::clone(&self.cell),
            scheduler: Arc::clone(&self.scheduler),
        }
    }
}

impl<T: Payload, E: Payload> Resolver<T, E> {
    pub(crate) fn new(cell: Arc<StateCell<T, E>>, scheduler: SharedScheduler) -> Self {
        Resolver { cell, scheduler }
    }

    /// Id of the computation this resolver settles
    pub fn id(&self) -> DeferredId {
        self.cell.id()
    }

    /// True once the computation has settled, by this resolver or a clone
    pub fn is_settled(&self) -> bool {
        self.cell.status().is_settled()
    }

    /// Settle with a success payload
    ///
    /// Returns `true` if this call settled the computation. A `false` return
    /// is not an error: the computation had already settled and keeps its
    /// first outcome.
    pub fn fulfill(&self, value: T) -> bool {
        self.settle(Outcome::Fulfilled(value))
    }

    /// Settle with a failure payload
    ///
    /// Returns `true` if this call settled the computation.
    pub fn reject(&self, reason: E) -> bool {
        self.settle(Outcome::Rejected(reason))
    }

    /// Settle with an explicit outcome
    pub fn settle(&self, outcome: Outcome<T, E>) -> bool {
        let scheduler = &self.scheduler;
        match self.cell.settle(outcome.clone(), |id| scheduler.report_unhandled(id)) {
            SettleResult::AlreadySettled => false,
            SettleResult::Settled(continuations) => {
                dispatch(scheduler, continuations, &outcome);
                true
            }
        }
    }

    /// Apply a handler result
    pub(crate) fn resolve_step(&self, step: Step<T, E>) {
        match step {
            Step::Value(v) => {
                self.fulfill(v);
            }
            Step::Raise(e) => {
                self.reject(e);
            }
            Step::Adopt(inner) => {
                if inner.id() == self.id() {
                    tracing::warn!(
                        deferred = %self.id(),
                        "Handler returned its own derived computation, it will never settle"
                    );
                    return;
                }
                let resolver = self.clone();
                inner.subscribe(Box::new(move |outcome| {
                    resolver.settle(outcome);
                }));
            }
        }
    }
}

/// Queue every continuation with its own copy of the outcome
pub(crate) fn dispatch<T: Payload, E: Payload>(
    scheduler: &SharedScheduler,
    continuations: Vec<Continuation<T, E>>,
    outcome: &Outcome<T, E>,
) {
    for continuation in continuations {
        let outcome = outcome.clone();
        scheduler.enqueue(Box::new(move || continuation(outcome)));
    }
}

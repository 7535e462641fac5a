//! Combinators over groups of computations
//!
//! - [`all`]: every input fulfills, or the first rejection wins
//! - [`all_settled`]: wait for every input, keep each outcome
//! - [`race`]: the first input to settle wins

use crate::deferred::Deferred;
use crate::Payload;
use deferred_concurrency::SharedScheduler;
use deferred_core::Outcome;
use parking_lot::Mutex;
use std::sync::Arc;

struct Slots<V> {
    values: Vec<Option<V>>,
    remaining: usize,
}

impl<V> Slots<V> {
    fn new(len: usize) -> Self {
        Slots {
            values: (0..len).map(|_| None).collect(),
            remaining: len,
        }
    }

    /// Fill slot `index`; returns every value once the last slot is filled
    fn fill(&mut self, index: usize, value: V) -> Option<Vec<V>> {
        if self.values[index].is_none() {
            self.remaining -= 1;
        }
        self.values[index] = Some(value);
        if self.remaining == 0 {
            Some(self.values.drain(..).flatten().collect())
        } else {
            None
        }
    }
}

/// Fulfill with every value, in input order, once all inputs fulfill
///
/// Rejects with the first rejection observed. An empty input fulfills with an
/// empty vector.
pub fn all<T: Payload, E: Payload>(
    scheduler: &SharedScheduler,
    inputs: &[Deferred<T, E>],
) -> Deferred<Vec<T>, E> {
    let (combined, resolver) = Deferred::pending(scheduler);
    if inputs.is_empty() {
        resolver.fulfill(Vec::new());
        return combined;
    }

    let slots = Arc::new(Mutex::new(Slots::new(inputs.len())));
    for (index, input) in inputs.iter().enumerate() {
        let slots = Arc::clone(&slots);
        let resolver = resolver.clone();
        input.subscribe(Box::new(move |outcome| match outcome {
            Outcome::Fulfilled(value) => {
                let complete = slots.lock().fill(index, value);
                if let Some(values) = complete {
                    resolver.fulfill(values);
                }
            }
            Outcome::Rejected(reason) => {
                resolver.reject(reason);
            }
        }));
    }
    combined
}

/// Fulfill with every outcome, in input order, once all inputs settle
///
/// Never rejects.
pub fn all_settled<T: Payload, E: Payload>(
    scheduler: &SharedScheduler,
    inputs: &[Deferred<T, E>],
) -> Deferred<Vec<Outcome<T, E>>, E> {
    let (combined, resolver) = Deferred::pending(scheduler);
    if inputs.is_empty() {
        resolver.fulfill(Vec::new());
        return combined;
    }

    let slots = Arc::new(Mutex::new(Slots::new(inputs.len())));
    for (index, input) in inputs.iter().enumerate() {
        let slots = Arc::clone(&slots);
        let resolver = resolver.clone();
        input.subscribe(Box::new(move |outcome| {
            let complete = slots.lock().fill(index, outcome);
            if let Some(outcomes) = complete {
                resolver.fulfill(outcomes);
            }
        }));
    }
    combined
}

/// Adopt the outcome of whichever input settles first
///
/// An empty input never settles.
pub fn race<T: Payload, E: Payload>(
    scheduler: &SharedScheduler,
    inputs: &[Deferred<T, E>],
) -> Deferred<T, E> {
    let (winner, resolver) = Deferred::pending(scheduler);
    for input in inputs {
        let resolver = resolver.clone();
        input.subscribe(Box::new(move |outcome| {
            resolver.settle(outcome);
        }));
    }
    winner
}

//! Microtask queue
//!
//! FIFO queue of continuation tasks. Tasks are popped one at a time with the
//! queue lock released before the task runs, so a running task may enqueue
//! more work (which lands at the back of the same drain).
//!
//! The queue also records computations that rejected with nobody listening.
//! A report is revoked as soon as a continuation attaches.

use crate::error::LoopError;
use crate::scheduler::{Scheduler, Task};
use deferred_core::DeferredId;
use parking_lot::Mutex;
use std::collections::{BTreeSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

/// Deterministic FIFO scheduler drained by the caller
pub struct MicrotaskQueue {
    tasks: Mutex<VecDeque<Task>>,

    /// Rejected computations with no continuation, ordered by allocation
    unhandled: Mutex<BTreeSet<DeferredId>>,

    track_unhandled: bool,

    total_enqueued: AtomicU64,
    total_executed: AtomicU64,
}

impl MicrotaskQueue {
    /// Create an empty queue with rejection tracking enabled
    pub fn new() -> Self {
        Self::with_tracking(true)
    }

    /// Create an empty queue, choosing whether to track unhandled rejections
    pub fn with_tracking(track_unhandled: bool) -> Self {
        MicrotaskQueue {
            tasks: Mutex::new(VecDeque::new()),
            unhandled: Mutex::new(BTreeSet::new()),
            track_unhandled,
            total_enqueued: AtomicU64::new(0),
            total_executed: AtomicU64::new(0),
        }
    }

    /// Number of tasks waiting to run
    pub fn pending_count(&self) -> usize {
        self.tasks.lock().len()
    }

    /// True when no task is waiting
    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }

    /// Tasks enqueued over the queue's lifetime
    pub fn total_enqueued(&self) -> u64 {
        self.total_enqueued.load(Ordering::Relaxed)
    }

    /// Tasks executed over the queue's lifetime
    pub fn total_executed(&self) -> u64 {
        self.total_executed.load(Ordering::Relaxed)
    }

    /// Pop and run the oldest task
    ///
    /// Returns `false` if the queue was empty.
    pub fn run_next(&self) -> bool {
        // Lock is released at the end of this statement, before the task runs
        let next = self.tasks.lock().pop_front();
        match next {
            Some(task) => {
                task();
                self.total_executed.fetch_add(1, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    /// Run tasks until the queue is empty, including tasks enqueued while draining
    pub fn drain(&self) -> usize {
        let mut executed = 0;
        while self.run_next() {
            executed += 1;
        }
        if executed > 0 {
            tracing::debug!(executed, "microtask queue drained");
        }
        executed
    }

    /// Like [`drain`](Self::drain) but stops after `limit` tasks
    ///
    /// # Errors
    ///
    /// [`LoopError::MicrotaskBudgetExceeded`] if `limit` tasks ran and work
    /// remains. The remaining tasks stay queued.
    pub fn drain_bounded(&self, limit: usize) -> Result<usize, LoopError> {
        let mut executed = 0;
        while executed < limit {
            if !self.run_next() {
                break;
            }
            executed += 1;
        }
        if executed == limit && !self.is_empty() {
            tracing::error!(
                limit,
                pending = self.pending_count(),
                "Microtask budget exhausted - possible self-requeueing chain"
            );
            return Err(LoopError::MicrotaskBudgetExceeded { limit });
        }
        if executed > 0 {
            tracing::debug!(executed, "microtask queue drained");
        }
        Ok(executed)
    }

    /// Computations currently rejected with no continuation, oldest first
    pub fn unhandled_rejections(&self) -> Vec<DeferredId> {
        self.unhandled.lock().iter().copied().collect()
    }

    /// Whether unhandled rejections are being recorded
    pub fn tracks_unhandled(&self) -> bool {
        self.track_unhandled
    }
}

impl Default for MicrotaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for MicrotaskQueue {
    fn enqueue(&self, task: Task) {
        self.tasks.lock().push_back(task);
        self.total_enqueued.fetch_add(1, Ordering::Relaxed);
    }

    fn report_unhandled(&self, id: DeferredId) {
        if !self.track_unhandled {
            return;
        }
        tracing::warn!(deferred = %id, "Rejection with no handler attached");
        self.unhandled.lock().insert(id);
    }

    fn revoke_unhandled(&self, id: DeferredId) {
        if self.unhandled.lock().remove(&id) {
            tracing::debug!(deferred = %id, "Previously unhandled rejection now handled");
        }
    }
}

//! Scheduler seam
//!
//! Every deferred computation holds a [`SharedScheduler`] and hands its
//! continuations to it instead of running them inline. Swapping the
//! implementation swaps the deferred-execution facility: the stock
//! [`MicrotaskQueue`](crate::MicrotaskQueue) is a deterministic FIFO that the
//! caller drains explicitly.

use deferred_core::DeferredId;
use std::sync::Arc;

/// Unit of deferred work
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Shared, type-erased scheduler handle
pub type SharedScheduler = Arc<dyn Scheduler>;

/// Accepts tasks for later execution
///
/// Implementations must run tasks in the order they were enqueued and must
/// never run a task from inside `enqueue`.
pub trait Scheduler: Send + Sync {
    /// Queue a task to run after the current synchronous code completes
    fn enqueue(&self, task: Task);

    /// A computation rejected with no continuation attached
    fn report_unhandled(&self, _id: DeferredId) {}

    /// A continuation was attached to (or an await observed) a computation
    /// previously reported as unhandled
    fn revoke_unhandled(&self, _id: DeferredId) {}
}

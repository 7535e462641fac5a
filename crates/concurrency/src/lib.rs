//! Concurrency layer for deferred computations
//!
//! This crate implements single-threaded cooperative scheduling with:
//! - Scheduler: Injectable `enqueue(task)` seam used by every computation
//! - MicrotaskQueue: FIFO continuation queue with unhandled-rejection tracking
//! - TimerQueue: Deterministic macrotasks on a virtual clock
//! - EventLoop: Drains microtasks, then fires timers one at a time

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod event_loop;
pub mod microtask;
pub mod scheduler;
pub mod timer;

pub use error::LoopError;
pub use event_loop::{EventLoop, LoopConfig, LoopStats};
pub use microtask::MicrotaskQueue;
pub use scheduler::{Scheduler, SharedScheduler, Task};
pub use timer::{TimerHandle, TimerId, TimerQueue, VirtualClock};

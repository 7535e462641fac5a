//! Event loop coordinating microtasks and timers
//!
//! One turn of the loop:
//!
//! ```text
//! 1. Drain the microtask queue (bounded by microtask_budget)
//! 2. Pop the earliest timer, advance the virtual clock to its due time
//! 3. Run the timer callback
//! 4. Drain the microtask queue again
//! ```
//!
//! Microtasks always run to exhaustion before the next timer fires, so every
//! continuation triggered by a timer is observed before time moves on.

use crate::error::LoopError;
use crate::microtask::MicrotaskQueue;
use crate::scheduler::SharedScheduler;
use crate::timer::{TimerHandle, TimerQueue};
use deferred_core::DeferredId;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Default cap on microtasks executed by a single drain
pub const DEFAULT_MICROTASK_BUDGET: usize = 1_000_000;

/// Event loop configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopConfig {
    /// Maximum microtasks executed in one drain before the loop gives up
    pub microtask_budget: usize,
    /// Initial virtual clock time
    pub start_at_ms: u64,
    /// Record rejections that reach a computation with no continuation
    pub track_unhandled_rejections: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        LoopConfig {
            microtask_budget: DEFAULT_MICROTASK_BUDGET,
            start_at_ms: 0,
            track_unhandled_rejections: true,
        }
    }
}

/// Counters describing the work an event loop has done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoopStats {
    /// Microtasks executed
    pub microtasks_executed: u64,
    /// Timers fired
    pub timers_fired: u64,
    /// Virtual clock time
    pub now_ms: u64,
}

/// Single-threaded driver for microtasks and timers
pub struct EventLoop {
    microtasks: Arc<MicrotaskQueue>,
    timers: Arc<Mutex<TimerQueue>>,
    config: LoopConfig,
    timers_fired: AtomicU64,
}

impl EventLoop {
    /// Create an event loop with default configuration
    pub fn new() -> Self {
        Self::with_config(LoopConfig::default())
    }

    /// Create an event loop with explicit configuration
    pub fn with_config(config: LoopConfig) -> Self {
        EventLoop {
            microtasks: Arc::new(MicrotaskQueue::with_tracking(
                config.track_unhandled_rejections,
            )),
            timers: Arc::new(Mutex::new(TimerQueue::new(config.start_at_ms))),
            config,
            timers_fired: AtomicU64::new(0),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Scheduler handle to give to new computations
    pub fn scheduler(&self) -> SharedScheduler {
        self.microtasks.clone()
    }

    /// The underlying microtask queue
    pub fn microtasks(&self) -> &Arc<MicrotaskQueue> {
        &self.microtasks
    }

    /// Handle for scheduling timers
    pub fn timers(&self) -> TimerHandle {
        TimerHandle::new(Arc::clone(&self.timers))
    }

    /// Current virtual time
    pub fn now_ms(&self) -> u64 {
        self.timers.lock().now_ms()
    }

    /// True if any microtask or timer is waiting
    pub fn has_pending_work(&self) -> bool {
        !self.microtasks.is_empty() || !self.timers.lock().is_empty()
    }

    /// Drain the microtask queue within the configured budget
    pub fn run_microtasks(&self) -> Result<usize, LoopError> {
        self.microtasks.drain_bounded(self.config.microtask_budget)
    }

    /// Fire the earliest timer, if any
    ///
    /// Does not drain microtasks afterwards; see [`turn`](Self::turn).
    pub fn fire_next_timer(&self) -> bool {
        // Lock is released before the callback runs so it may schedule timers
        let next = self.timers.lock().pop_next();
        match next {
            Some((id, due, task)) => {
                tracing::debug!(timer = id.as_u64(), due_ms = due, "timer fired");
                task();
                self.timers_fired.fetch_add(1, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    /// Run one turn: drain microtasks, fire one timer, drain again
    ///
    /// Returns `true` if a timer fired.
    pub fn turn(&self) -> Result<bool, LoopError> {
        self.run_microtasks()?;
        let fired = self.fire_next_timer();
        if fired {
            self.run_microtasks()?;
        }
        Ok(fired)
    }

    /// Run until no microtask or timer remains
    pub fn run(&self) -> Result<LoopStats, LoopError> {
        while self.turn()? {}
        Ok(self.stats())
    }

    /// Run until `done` holds
    ///
    /// `done` is checked after every microtask drain.
    ///
    /// # Errors
    ///
    /// - [`LoopError::Stalled`] if all work ran out before `done` held
    /// - [`LoopError::MicrotaskBudgetExceeded`] from any drain
    pub fn run_until<F>(&self, mut done: F) -> Result<(), LoopError>
    where
        F: FnMut() -> bool,
    {
        loop {
            self.run_microtasks()?;
            if done() {
                return Ok(());
            }
            if !self.fire_next_timer() {
                tracing::debug!(now_ms = self.now_ms(), "event loop stalled");
                return Err(LoopError::Stalled);
            }
        }
    }

    /// Snapshot of loop counters
    pub fn stats(&self) -> LoopStats {
        LoopStats {
            microtasks_executed: self.microtasks.total_executed(),
            timers_fired: self.timers_fired.load(Ordering::Relaxed),
            now_ms: self.now_ms(),
        }
    }

    /// Computations rejected with no continuation attached
    pub fn unhandled_rejections(&self) -> Vec<DeferredId> {
        self.microtasks.unhandled_rejections()
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

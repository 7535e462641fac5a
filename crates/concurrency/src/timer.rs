//! Deterministic timer service
//!
//! Timers are macrotasks ordered by `(due_ms, registration seq)` on a
//! [`VirtualClock`]. Nothing sleeps: the event loop pops the earliest timer
//! and moves the clock forward to its due time.

use crate::scheduler::Task;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Monotonic millisecond clock advanced only by the event loop
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now_ms: u64,
}

impl VirtualClock {
    /// Clock starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock starting at `now_ms`
    pub fn starting_at(now_ms: u64) -> Self {
        VirtualClock { now_ms }
    }

    /// Current time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Move to `target_ms`; earlier targets are ignored
    pub fn advance_to(&mut self, target_ms: u64) {
        if target_ms > self.now_ms {
            self.now_ms = target_ms;
        }
    }
}

/// Identifier returned when a timer is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    /// Registration sequence number
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Pending timers keyed by due time, then registration order
pub struct TimerQueue {
    clock: VirtualClock,
    next_seq: u64,
    timers: BTreeMap<(u64, u64), Task>,
}

impl TimerQueue {
    /// Empty queue with its clock at `start_ms`
    pub fn new(start_ms: u64) -> Self {
        TimerQueue {
            clock: VirtualClock::starting_at(start_ms),
            next_seq: 0,
            timers: BTreeMap::new(),
        }
    }

    /// Current virtual time
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Schedule `task` to fire `delay_ms` after the current virtual time
    pub fn schedule_after(&mut self, delay_ms: u64, task: Task) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let due = self.clock.now_ms().saturating_add(delay_ms);
        self.timers.insert((due, seq), task);
        TimerId(seq)
    }

    /// Number of timers not yet fired
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// True when no timer is pending
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Due time of the earliest pending timer
    pub fn next_due(&self) -> Option<u64> {
        self.timers.keys().next().map(|(due, _)| *due)
    }

    /// Remove the earliest timer and advance the clock to its due time
    pub fn pop_next(&mut self) -> Option<(TimerId, u64, Task)> {
        let key = *self.timers.keys().next()?;
        let task = self.timers.remove(&key)?;
        let (due, seq) = key;
        self.clock.advance_to(due);
        Some((TimerId(seq), due, task))
    }
}

/// Clonable handle for scheduling timers from setup procedures and handlers
#[derive(Clone)]
pub struct TimerHandle {
    queue: Arc<Mutex<TimerQueue>>,
}

impl TimerHandle {
    pub(crate) fn new(queue: Arc<Mutex<TimerQueue>>) -> Self {
        TimerHandle { queue }
    }

    /// Run `callback` once `delay_ms` of virtual time has passed
    pub fn schedule_after<F>(&self, delay_ms: u64, callback: F) -> TimerId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = self.queue.lock().schedule_after(delay_ms, Box::new(callback));
        tracing::trace!(timer = id.as_u64(), delay_ms, "timer scheduled");
        id
    }

    /// Current virtual time
    pub fn now_ms(&self) -> u64 {
        self.queue.lock().now_ms()
    }

    /// Number of timers not yet fired
    pub fn pending_count(&self) -> usize {
        self.queue.lock().len()
    }
}

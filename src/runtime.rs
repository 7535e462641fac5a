//! Runtime: owns the event loop that drives every computation it creates.

use crate::error::{AwaitError, Error, Result};
use deferred_concurrency::{EventLoop, LoopConfig, LoopStats, SharedScheduler, TimerHandle};
use deferred_core::{DeferredId, Outcome};
use deferred_primitives::{Deferred, Payload, Resolver};

/// Single-threaded runtime for deferred computations.
///
/// Handlers attached to computations created here run only while the runtime
/// is driven, through [`run`](Self::run) or [`block_on`](Self::block_on).
///
/// # Example
///
/// ```ignore
/// use deferred::prelude::*;
///
/// let rt = Runtime::new();
/// let timers = rt.timers();
/// let greeting = rt.deferred(move |resolver| {
///     timers.schedule_after(250, move || {
///         resolver.fulfill("async success!");
///     });
///     Ok(())
/// });
///
/// let shout = greeting.then(|s: &str| Ok::<_, Fault>(s.to_uppercase()));
/// assert_eq!(rt.block_on(&shout)?, "ASYNC SUCCESS!");
/// ```
pub struct Runtime {
    event_loop: EventLoop,
}

impl Runtime {
    /// Create a runtime with default settings.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for runtime configuration.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let rt = Runtime::builder()
    ///     .microtask_budget(10_000)
    ///     .start_at_ms(1_000)
    ///     .build();
    /// ```
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Active configuration
    pub fn config(&self) -> &LoopConfig {
        self.event_loop.config()
    }

    /// Start a computation on this runtime.
    ///
    /// See [`Deferred::new`] for the contract of `setup`.
    pub fn deferred<T, E, F>(&self, setup: F) -> Deferred<T, E>
    where
        T: Payload,
        E: Payload,
        F: FnOnce(Resolver<T, E>) -> std::result::Result<(), E>,
    {
        Deferred::new(&self.scheduler(), setup)
    }

    /// A pending computation together with its resolver
    pub fn pending<T: Payload, E: Payload>(&self) -> (Deferred<T, E>, Resolver<T, E>) {
        Deferred::pending(&self.scheduler())
    }

    /// An already fulfilled computation
    pub fn fulfilled<T: Payload, E: Payload>(&self, value: T) -> Deferred<T, E> {
        Deferred::fulfilled(&self.scheduler(), value)
    }

    /// An already rejected computation
    pub fn rejected<T: Payload, E: Payload>(&self, reason: E) -> Deferred<T, E> {
        Deferred::rejected(&self.scheduler(), reason)
    }

    /// Scheduler handle for computations built directly with [`Deferred`]
    pub fn scheduler(&self) -> SharedScheduler {
        self.event_loop.scheduler()
    }

    /// Handle for scheduling timers on the virtual clock
    pub fn timers(&self) -> TimerHandle {
        self.event_loop.timers()
    }

    /// Current virtual time
    pub fn now_ms(&self) -> u64 {
        self.event_loop.now_ms()
    }

    /// Drain microtasks and fire timers until no work remains.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BudgetExceeded`] if a single drain runs away.
    pub fn run(&self) -> Result<LoopStats> {
        self.event_loop.run().map_err(Error::from)
    }

    /// Drive the runtime until `deferred` settles and return its outcome.
    ///
    /// Awaiting a computation counts as handling it, so a rejection returned
    /// here is removed from [`unhandled_rejections`](Self::unhandled_rejections).
    /// Work queued behind the settlement stays queued.
    ///
    /// # Errors
    ///
    /// - [`AwaitError::Rejected`] if the computation rejected
    /// - [`AwaitError::Runtime`] with [`Error::Stalled`] if no queued work
    ///   can settle it
    /// - [`AwaitError::Runtime`] with [`Error::BudgetExceeded`] if a drain
    ///   runs away
    pub fn block_on<T: Payload, E: Payload>(
        &self,
        deferred: &Deferred<T, E>,
    ) -> std::result::Result<T, AwaitError<E>> {
        self.event_loop
            .run_until(|| deferred.is_settled())
            .map_err(|e| {
                tracing::debug!(deferred = %deferred.id(), error = %e, "block_on failed");
                AwaitError::Runtime(Error::from(e))
            })?;

        match deferred.outcome() {
            Some(Outcome::Fulfilled(value)) => Ok(value),
            Some(Outcome::Rejected(reason)) => {
                deferred.mark_handled();
                Err(AwaitError::Rejected(reason))
            }
            None => Err(AwaitError::Runtime(Error::Internal(format!(
                "{} reported settled but has no outcome",
                deferred.id()
            )))),
        }
    }

    /// Computations rejected with no continuation attached and never awaited
    pub fn unhandled_rejections(&self) -> Vec<DeferredId> {
        self.event_loop.unhandled_rejections()
    }

    /// Snapshot of event loop counters
    pub fn stats(&self) -> LoopStats {
        self.event_loop.stats()
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct RuntimeBuilder {
    config: LoopConfig,
}

impl RuntimeBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum microtasks executed by one drain.
    ///
    /// A chain that keeps requeueing itself trips this limit instead of
    /// spinning forever. Default: 1_000_000.
    pub fn microtask_budget(mut self, limit: usize) -> Self {
        self.config.microtask_budget = limit;
        self
    }

    /// Initial virtual clock time in milliseconds. Default: 0.
    pub fn start_at_ms(mut self, now_ms: u64) -> Self {
        self.config.start_at_ms = now_ms;
        self
    }

    /// Record rejections that reach a computation with no continuation.
    /// Default: enabled.
    pub fn track_unhandled_rejections(mut self, enabled: bool) -> Self {
        self.config.track_unhandled_rejections = enabled;
        self
    }

    /// Build the runtime.
    pub fn build(self) -> Runtime {
        tracing::debug!(
            microtask_budget = self.config.microtask_budget,
            start_at_ms = self.config.start_at_ms,
            track_unhandled = self.config.track_unhandled_rejections,
            "runtime created"
        );
        Runtime {
            event_loop: EventLoop::with_config(self.config),
        }
    }
}

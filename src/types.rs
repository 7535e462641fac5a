//! Public types re-exported from the workspace crates.

// Core value types
pub use deferred_core::{DeferredId, Fault, Outcome, Status};

// Computations and their capabilities
pub use deferred_primitives::{Deferred, Payload, Resolver, Step};

// Combinators
pub use deferred_primitives::{all, all_settled, race};

// Event loop types
pub use deferred_concurrency::{
    LoopConfig, LoopError, LoopStats, Scheduler, SharedScheduler, TimerHandle, TimerId,
};

//! # Deferred
//!
//! Single-assignment deferred computations with chainable continuations.
//!
//! A [`Deferred`] starts pending and settles exactly once, either fulfilled
//! with a value or rejected with a failure payload. Handlers attached with
//! `then`, `catch` and `finally` produce new computations, so chains read
//! top to bottom while their handlers run later, one at a time, in the order
//! they became ready.
//!
//! ## Quick Start
//!
//! ```ignore
//! use deferred::prelude::*;
//!
//! let rt = Runtime::new();
//!
//! let work: Deferred<i32, Fault> = rt.deferred(|resolver| {
//!     resolver.fulfill(20);
//!     Ok(())
//! });
//!
//! let answer = work
//!     .then(|v| Ok(v + 22))
//!     .catch(|_| Ok(0))
//!     .finally(|| Ok(()));
//!
//! assert_eq!(rt.block_on(&answer)?, 42);
//! ```
//!
//! ## Settle-once
//!
//! The first call to `fulfill` or `reject` wins. Later calls return `false`
//! and are otherwise ignored, without an error or a panic.
//!
//! ## Crates
//!
//! - `deferred-core`: [`Outcome`], [`Status`], [`DeferredId`], [`Fault`]
//! - `deferred-concurrency`: microtask queue, virtual-clock timers, event loop
//! - `deferred-primitives`: [`Deferred`], [`Resolver`], combinators

#![warn(missing_docs)]

mod error;
mod runtime;
mod types;

pub mod prelude;

// Re-export main entry points
pub use error::{AwaitError, Error, Result};
pub use runtime::{Runtime, RuntimeBuilder};

// Re-export types
pub use types::*;

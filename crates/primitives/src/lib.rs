//! Deferred computation primitive
//!
//! Components, leaf first:
//! - [`StateCell`]: Status, settled outcome and pending continuations
//! - [`Resolver`]: Settle-once capabilities handed to a setup procedure
//! - [`Deferred`]: Handle plus chain builder (`then`, `catch`, `finally`)
//! - [`combinators`]: `all`, `all_settled`, `race`
//!
//! ## Ordering
//!
//! Continuations never run inside the call that registers them. They are
//! queued on the computation's scheduler in registration order and run when
//! the owner of the scheduler drains it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod combinators;
pub mod deferred;
pub mod resolver;
pub mod state_cell;
pub mod step;

pub use combinators::{all, all_settled, race};
pub use deferred::Deferred;
pub use resolver::Resolver;
pub use state_cell::{Continuation, SettleResult, StateCell, Subscription};
pub use step::Step;

/// Bound shared by success and failure payloads
///
/// A settled payload is cloned once per continuation and may be carried to
/// another thread along with the handle.
pub trait Payload: Clone + Send + 'static {}

impl<T: Clone + Send + 'static> Payload for T {}

//! Core types for deferred computations
//!
//! This crate defines the vocabulary shared by every other layer:
//! - [`DeferredId`]: Process-unique identifier for a deferred computation
//! - [`Status`]: Pending / Fulfilled / Rejected lifecycle state
//! - [`Outcome`]: Terminal result of a settled computation
//! - [`Fault`]: Stock failure payload

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod fault;
pub mod outcome;
pub mod types;

pub use fault::Fault;
pub use outcome::Outcome;
pub use types::{DeferredId, Status};

//! Convenient imports.
//!
//! ```ignore
//! use deferred::prelude::*;
//!
//! let rt = Runtime::new();
//! let d: Deferred<&str, Fault> = rt.fulfilled("ready");
//! ```

// Main entry point
pub use crate::runtime::{Runtime, RuntimeBuilder};

// Error handling
pub use crate::error::{AwaitError, Error, Result};

// Computations
pub use crate::types::{Deferred, Resolver, Step};

// Core types
pub use crate::types::{DeferredId, Fault, Outcome, Status};

// Combinators
pub use crate::types::{all, all_settled, race};

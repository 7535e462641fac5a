//! Stock failure payload
//!
//! Deferred computations are generic over their failure type, but most code
//! just needs "an error with a message". [`Fault`] fills that role.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message-carrying failure raised by a setup procedure or handler
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct Fault {
    message: String,
}

impl Fault {
    /// Create a fault with the given message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The fault message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for Fault {
    fn from(message: &str) -> Self {
        Fault::new(message)
    }
}

impl From<String> for Fault {
    fn from(message: String) -> Self {
        Fault::new(message)
    }
}

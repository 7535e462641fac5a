//! Deferred Semantics Test Suite
//!
//! Behavioural tests for deferred computations driven through [`Runtime`].
//!
//! ## Modules
//!
//! - `nested`: computations created inside another computation's setup
//! - `chain`: then/catch/finally chains over a timer-resolved source
//! - `settlement`: settle-once behaviour
//! - `scheduling`: dispatch order, adoption, finally overrides
//! - `combinators`: all, all_settled, race
//! - `runtime`: configuration, budget and unhandled rejection tracking
//!
//! ## Running Tests
//!
//! ```bash
//! # Run the whole suite
//! cargo test --test deferred_semantics
//!
//! # Run the chain scenarios only, with logs
//! RUST_LOG=deferred=trace cargo test --test deferred_semantics chain::
//! ```

use std::sync::Arc;

use parking_lot::Mutex;

pub use deferred::prelude::*;

pub mod combinators;
pub mod settlement;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Initialize test logging if needed
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Handler result with the suite's failure payload
pub type Handled<T> = std::result::Result<T, Fault>;

/// Create a runtime with default settings
pub fn runtime() -> Runtime {
    init_test_logging();
    Runtime::new()
}

/// Records how often, and with which labels, it was invoked
///
/// Clones share one call log, so a recorder can be moved into any number of
/// handlers and inspected afterwards.
#[derive(Clone, Default)]
pub struct CallRecorder {
    calls: Arc<Mutex<Vec<Option<String>>>>,
}

impl CallRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a call carrying `label`
    pub fn record(&self, label: impl Into<String>) {
        self.calls.lock().push(Some(label.into()));
    }

    /// Record a call without a label
    pub fn record_call(&self) {
        self.calls.lock().push(None);
    }

    pub fn was_called(&self) -> bool {
        !self.calls.lock().is_empty()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn was_called_with(&self, label: &str) -> bool {
        self.calls
            .lock()
            .iter()
            .any(|call| call.as_deref() == Some(label))
    }

    /// Labels of labelled calls, in call order
    pub fn labels(&self) -> Vec<String> {
        self.calls.lock().iter().flatten().cloned().collect()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

/// Success and failure recorders, the pair every scenario observes
pub fn recorders() -> (CallRecorder, CallRecorder) {
    (CallRecorder::new(), CallRecorder::new())
}

#[test]
fn test_call_recorder_basics() {
    let recorder = CallRecorder::new();
    assert!(!recorder.was_called());

    recorder.record_call();
    recorder.record("labelled");
    let clone = recorder.clone();
    clone.record("from clone");

    assert_eq!(recorder.call_count(), 3);
    assert!(recorder.was_called_with("labelled"));
    assert!(recorder.was_called_with("from clone"));
    assert!(!recorder.was_called_with("missing"));
    assert_eq!(recorder.labels(), vec!["labelled", "from clone"]);

    recorder.clear();
    assert!(!clone.was_called());
}

//! Cooperative cancellation shared between the interrupt handler and workers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cheaply cloneable flag; every clone observes the same state.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Running converters are killed at their next poll.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

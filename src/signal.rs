//! Ctrl+C handling for headless runs.
//!
//! The first interrupt asks the active test run to stop; the run loop keeps
//! going until the tool has been reaped so the outcome is still recorded. A
//! second interrupt is the user insisting, and the caller may exit at once.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::{Result, RunnerError};

/// Counts SIGINT deliveries without blocking the run loop.
///
/// Cloning shares the underlying counter.
#[derive(Clone, Default)]
pub struct InterruptCounter {
    count: Arc<AtomicUsize>,
}

impl InterruptCounter {
    /// Create a counter and register it as the process SIGINT handler.
    ///
    /// # Errors
    ///
    /// Returns an error if a handler is already registered for this process.
    pub fn install() -> Result<Self> {
        let counter = Self::default();
        let count = Arc::clone(&counter.count);

        ctrlc::set_handler(move || {
            count.fetch_add(1, Ordering::SeqCst);
        })
        .map_err(|e| RunnerError::SignalHandler(e.to_string()))?;

        Ok(counter)
    }

    /// Number of interrupts received so far.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Whether at least one interrupt was received.
    pub fn stop_requested(&self) -> bool {
        self.count() >= 1
    }

    /// Whether the user interrupted again after the first stop request.
    pub fn force_requested(&self) -> bool {
        self.count() >= 2
    }

    #[cfg(test)]
    fn simulate(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

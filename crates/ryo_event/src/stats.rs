/// Statistics tracking for event channels
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Snapshot of a channel's dispatch counters.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStats {
    /// Sequential invocations since creation
    pub invocations: u64,
    /// Parallel invocations since creation
    pub parallel_invocations: u64,
    /// Handler calls made, including ones that failed or panicked
    pub handlers_called: u64,
    /// Handler calls that returned an error or panicked
    pub handler_failures: u64,
    /// Size of the active list after the most recent merge
    pub active_handlers: usize,
}

#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    invocations: AtomicU64,
    parallel_invocations: AtomicU64,
    handlers_called: AtomicU64,
    handler_failures: AtomicU64,
    active_handlers: AtomicUsize,
}

impl StatsCounters {
    pub(crate) fn record_invocation(&self, parallel: bool) {
        let counter = if parallel {
            &self.parallel_invocations
        } else {
            &self.invocations
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_calls(&self, called: usize, failed: usize) {
        self.handlers_called.fetch_add(called as u64, Ordering::Relaxed);
        self.handler_failures.fetch_add(failed as u64, Ordering::Relaxed);
    }

    pub(crate) fn set_active(&self, active: usize) {
        self.active_handlers.store(active, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> EventStats {
        EventStats {
            invocations: self.invocations.load(Ordering::Relaxed),
            parallel_invocations: self.parallel_invocations.load(Ordering::Relaxed),
            handlers_called: self.handlers_called.load(Ordering::Relaxed),
            handler_failures: self.handler_failures.load(Ordering::Relaxed),
            active_handlers: self.active_handlers.load(Ordering::Relaxed),
        }
    }
}

//! Counting completion barrier used by parallel dispatch.
//!
//! A barrier is created with a fixed count and hands out exactly that many
//! [`CompletionSignal`]s. Each signal decrements the count once, either
//! explicitly or when it is dropped, so a job that unwinds still counts as
//! finished. [`CompletionBarrier::wait`] blocks until the count reaches zero.

use crossbeam::sync::WaitGroup;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Blocks a caller until every outstanding [`CompletionSignal`] is gone.
#[derive(Debug)]
pub struct CompletionBarrier {
    group: WaitGroup,
    remaining: Arc<AtomicUsize>,
}

/// One unit of completion owed to a [`CompletionBarrier`].
#[derive(Debug)]
pub struct CompletionSignal {
    _ticket: WaitGroup,
    remaining: Arc<AtomicUsize>,
}

impl CompletionBarrier {
    /// Creates a barrier initialised to `count` and the signals that release it.
    pub fn new(count: usize) -> (Self, Vec<CompletionSignal>) {
        let group = WaitGroup::new();
        let remaining = Arc::new(AtomicUsize::new(count));
        let signals = (0..count)
            .map(|_| CompletionSignal {
                _ticket: group.clone(),
                remaining: Arc::clone(&remaining),
            })
            .collect();

        (Self { group, remaining }, signals)
    }

    /// Number of signals not yet delivered.
    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }

    /// Blocks the calling thread until every signal has been delivered.
    ///
    /// There is no timeout. A signal that is never delivered blocks forever.
    pub fn wait(self) {
        self.group.wait();
    }
}

impl CompletionSignal {
    /// Marks this unit of work as finished.
    pub fn signal(self) {}
}

impl Drop for CompletionSignal {
    fn drop(&mut self) {
        self.remaining.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Sequential and parallel dispatch
use super::core::Event;
use crate::barrier::CompletionBarrier;
use crate::error::{EventError, HandlerFailure};
use crate::stats::StatsCounters;
use crate::types::SenderId;
use crossbeam::queue::SegQueue;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{trace, warn};

impl<A> Event<A>
where
    A: Send + Sync + 'static,
{
    /// Delivers `arg` to every handler, one at a time, in subscription order,
    /// on the calling thread.
    ///
    /// Pending subscription changes are merged first. The first handler that
    /// returns an error stops the dispatch: later handlers are not called and
    /// the error is returned. A handler panic unwinds through this call.
    pub fn invoke(&self, sender: SenderId, arg: A) -> Result<(), EventError> {
        let handlers = self.merge();
        self.stats.record_invocation(false);
        trace!("📤 Invoking '{}' on {} handlers", self.name, handlers.len());

        let mut tally = CallTally::new(&self.stats);
        for (index, handler) in handlers.iter().enumerate() {
            tally.begin();
            let outcome = handler.call(sender, &arg);
            tally.finish(outcome.is_err());

            if let Err(source) = outcome {
                return Err(EventError::Handler {
                    channel: self.name.clone(),
                    failure: HandlerFailure::Error {
                        index,
                        handler: handler.label().into(),
                        source,
                    },
                });
            }
        }

        Ok(())
    }

    /// Delivers `arg` to every handler concurrently on the channel's worker
    /// pool and blocks until all of them have finished.
    ///
    /// Pending subscription changes are merged first. With no handlers this
    /// returns immediately without scheduling anything. Handlers run in no
    /// particular order. A handler that fails or panics does not stop the
    /// others; once every handler has finished, all failures are returned
    /// together in handler-list order.
    ///
    /// There is no timeout: a handler that never returns blocks the caller
    /// forever.
    pub fn invoke_parallel(&self, sender: SenderId, arg: A) -> Result<(), EventError> {
        let handlers = self.merge();
        self.stats.record_invocation(true);

        let dispatched = handlers.len();
        if dispatched == 0 {
            return Ok(());
        }
        trace!("📤 Fanning out '{}' to {} handlers", self.name, dispatched);

        let arg = Arc::new(arg);
        let failures = Arc::new(SegQueue::new());
        let (barrier, signals) = CompletionBarrier::new(dispatched);

        for ((index, handler), signal) in handlers.iter().enumerate().zip(signals) {
            let handler = handler.clone();
            let arg = Arc::clone(&arg);
            let failures = Arc::clone(&failures);

            self.pool.execute(Box::new(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler.call(sender, &arg)));
                let failure = match outcome {
                    Ok(Ok(())) => None,
                    Ok(Err(source)) => Some(HandlerFailure::Error {
                        index,
                        handler: handler.label().into(),
                        source,
                    }),
                    Err(payload) => Some(HandlerFailure::Panicked {
                        index,
                        handler: handler.label().into(),
                        message: panic_message(payload.as_ref()),
                    }),
                };
                if let Some(failure) = failure {
                    failures.push(failure);
                }
                signal.signal();
            }));
        }

        barrier.wait();

        let mut collected = Vec::with_capacity(failures.len());
        while let Some(failure) = failures.pop() {
            collected.push(failure);
        }
        collected.sort_by_key(HandlerFailure::index);
        self.stats.record_calls(dispatched, collected.len());

        if collected.is_empty() {
            return Ok(());
        }

        for failure in &collected {
            warn!("❌ Event '{}': {}", self.name, failure);
        }
        Err(EventError::Parallel {
            channel: self.name.clone(),
            dispatched,
            failures: collected,
        })
    }
}

/// Counts sequential handler calls and flushes them into the channel stats
/// when dropped, including while a handler panic unwinds through `invoke`.
/// A call still in flight at that point is counted as a failure.
struct CallTally<'a> {
    stats: &'a StatsCounters,
    called: usize,
    failed: usize,
    in_flight: bool,
}

impl<'a> CallTally<'a> {
    fn new(stats: &'a StatsCounters) -> Self {
        Self {
            stats,
            called: 0,
            failed: 0,
            in_flight: false,
        }
    }

    fn begin(&mut self) {
        self.called += 1;
        self.in_flight = true;
    }

    fn finish(&mut self, failed: bool) {
        self.in_flight = false;
        if failed {
            self.failed += 1;
        }
    }
}

impl Drop for CallTally<'_> {
    fn drop(&mut self) {
        let failed = self.failed + usize::from(self.in_flight);
        self.stats.record_calls(self.called, failed);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked with unknown payload".to_string()
    }
}

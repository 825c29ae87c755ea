/// Core Event channel implementation
use super::pending::PendingOps;
use crate::handler::Handler;
use crate::pool::{shared_pool, WorkerPool};
use crate::stats::{EventStats, StatsCounters};
use arc_swap::ArcSwap;
use compact_str::CompactString;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// A typed publish/subscribe channel for one kind of event.
///
/// Subscription changes never touch the active handler list directly. They are
/// queued and folded in at the start of the next [`invoke`](Event::invoke) or
/// [`invoke_parallel`](Event::invoke_parallel), so a dispatch always runs over
/// the exact list it merged, whatever other threads (or the handlers
/// themselves) subscribe or unsubscribe while it runs.
///
/// Channels are meant to be owned by the component that emits the event and
/// shared by reference with subscribers. Every operation takes `&self`.
pub struct Event<A> {
    /// Diagnostic label used in logs and errors
    pub(super) name: CompactString,
    /// Handler list as of the last merge; replaced wholesale, never edited
    pub(super) active: ArcSwap<Vec<Handler<A>>>,
    /// Subscribe/unsubscribe requests not yet merged
    pub(super) pending: PendingOps<A>,
    /// Serialises merges of concurrent invocations; never held by handlers
    pub(super) merge_lock: Mutex<()>,
    pub(super) stats: StatsCounters,
    /// Where parallel dispatch schedules handler jobs
    pub(super) pool: Arc<dyn WorkerPool>,
}

impl<A> Event<A> {
    /// Creates an unnamed channel on the shared worker pool.
    pub fn new() -> Self {
        Self::with_pool("", shared_pool())
    }

    /// Creates a named channel on the shared worker pool.
    pub fn named(name: &str) -> Self {
        Self::with_pool(name, shared_pool())
    }

    /// Creates a named channel that dispatches in parallel on `pool`.
    pub fn with_pool(name: &str, pool: Arc<dyn WorkerPool>) -> Self {
        Self {
            name: CompactString::new(name),
            active: ArcSwap::from_pointee(Vec::new()),
            pending: PendingOps::new(),
            merge_lock: Mutex::new(()),
            stats: StatsCounters::default(),
            pool,
        }
    }

    /// Registers `handler` starting with the next invocation.
    ///
    /// Never blocks. Subscribing the same handler twice makes it run twice.
    pub fn subscribe(&self, handler: &Handler<A>) {
        self.pending.push_addition(handler.clone());
    }

    /// Deregisters every registration of `handler` starting with the next
    /// invocation.
    ///
    /// Never blocks. Unsubscribing a handler that is not registered does
    /// nothing. A dispatch already in progress still runs the handler.
    pub fn unsubscribe(&self, handler: &Handler<A>) {
        self.pending.push_removal(handler.clone());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of handlers as of the last merge.
    pub fn handler_count(&self) -> usize {
        self.active.load().len()
    }

    /// Number of subscribe and unsubscribe requests waiting for the next merge.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn stats(&self) -> EventStats {
        self.stats.snapshot()
    }

    /// Folds pending requests into the active list and returns the list this
    /// dispatch must iterate.
    pub(super) fn merge(&self) -> Arc<Vec<Handler<A>>> {
        let _guard = self.merge_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.active.load_full();

        match self.pending.merge_into(&current) {
            Some(merged) => {
                debug!(
                    "🔀 Event '{}' merged +{} -{} -> {} handlers",
                    self.name,
                    merged.added,
                    merged.removed,
                    merged.handlers.len()
                );
                let next = Arc::new(merged.handlers);
                self.stats.set_active(next.len());
                self.active.store(Arc::clone(&next));
                next
            }
            None => current,
        }
    }
}

impl<A> Default for Event<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> std::fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("handlers", &self.handler_count())
            .field("pending", &self.pending_count())
            .field("pool_size", &self.pool.size())
            .finish()
    }
}

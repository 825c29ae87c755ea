/// Deferred subscription changes
use crate::handler::Handler;
use crossbeam::queue::SegQueue;
use std::collections::HashSet;

/// Subscribe/unsubscribe requests recorded since the last merge.
///
/// Both queues are lock-free and accept pushes from any thread, including
/// from inside a running handler.
pub(super) struct PendingOps<A> {
    additions: SegQueue<Handler<A>>,
    removals: SegQueue<Handler<A>>,
}

/// Result of folding pending requests into an active list.
pub(super) struct Merged<A> {
    pub handlers: Vec<Handler<A>>,
    pub added: usize,
    pub removed: usize,
}

impl<A> PendingOps<A> {
    pub fn new() -> Self {
        Self {
            additions: SegQueue::new(),
            removals: SegQueue::new(),
        }
    }

    pub fn push_addition(&self, handler: Handler<A>) {
        self.additions.push(handler);
    }

    pub fn push_removal(&self, handler: Handler<A>) {
        self.removals.push(handler);
    }

    pub fn len(&self) -> usize {
        self.additions.len() + self.removals.len()
    }

    /// Folds queued requests into `active`.
    ///
    /// Additions are appended in arrival order, then every handler equal to a
    /// queued removal is dropped, duplicates included. Removals are drained
    /// before additions so an unsubscribe racing with this merge is never
    /// consumed ahead of the subscribe it follows. Returns `None` when nothing
    /// was queued.
    pub fn merge_into(&self, active: &[Handler<A>]) -> Option<Merged<A>> {
        let mut removals = HashSet::new();
        while let Some(handler) = self.removals.pop() {
            removals.insert(handler);
        }

        let mut additions = Vec::new();
        while let Some(handler) = self.additions.pop() {
            additions.push(handler);
        }

        if removals.is_empty() && additions.is_empty() {
            return None;
        }

        let added = additions.len();
        let mut handlers = Vec::with_capacity(active.len() + added);
        handlers.extend_from_slice(active);
        handlers.extend(additions);

        let before = handlers.len();
        if !removals.is_empty() {
            handlers.retain(|h| !removals.contains(h));
        }

        Some(Merged {
            removed: before - handlers.len(),
            handlers,
            added,
        })
    }
}

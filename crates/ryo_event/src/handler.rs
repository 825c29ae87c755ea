//! Handler callbacks and their identity semantics.

use crate::error::HandlerError;
use crate::types::SenderId;
use compact_str::CompactString;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

type Callback<A> = dyn Fn(SenderId, &A) -> Result<(), HandlerError> + Send + Sync;

/// A callback registered on an [`Event`](crate::Event).
///
/// Handlers are cheap to clone and compare by identity: every clone of a
/// `Handler` is equal to the original, while two handlers built from the same
/// closure body are different handlers. Keep a clone around to unsubscribe
/// later.
///
/// ```rust
/// use ryo_event::{Event, Handler, SenderId};
///
/// let on_tick = Handler::infallible(|_sender, dt: &f64| {
///     assert!(*dt >= 0.0);
/// });
///
/// let ticks = Event::<f64>::named("tick");
/// ticks.subscribe(&on_tick);
/// ticks.invoke(SenderId::nil(), 0.016).unwrap();
/// ticks.unsubscribe(&on_tick);
/// ```
pub struct Handler<A> {
    callback: Arc<Callback<A>>,
    label: CompactString,
}

impl<A> Handler<A> {
    /// Wraps a fallible callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(SenderId, &A) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
            label: CompactString::default(),
        }
    }

    /// Wraps a fallible callback with a label used in logs and errors.
    pub fn named<F>(label: &str, callback: F) -> Self
    where
        F: Fn(SenderId, &A) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
            label: CompactString::new(label),
        }
    }

    /// Wraps a callback that cannot fail.
    pub fn infallible<F>(callback: F) -> Self
    where
        F: Fn(SenderId, &A) + Send + Sync + 'static,
    {
        Self::new(move |sender, arg| {
            callback(sender, arg);
            Ok(())
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub(crate) fn call(&self, sender: SenderId, arg: &A) -> Result<(), HandlerError> {
        (self.callback)(sender, arg)
    }

    #[inline]
    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.callback) as *const ()
    }
}

impl<A> Clone for Handler<A> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
            label: self.label.clone(),
        }
    }
}

impl<A> PartialEq for Handler<A> {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl<A> Eq for Handler<A> {}

impl<A> Hash for Handler<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl<A> fmt::Debug for Handler<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("label", &self.label)
            .field("addr", &self.addr())
            .finish()
    }
}

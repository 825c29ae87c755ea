//! Error types for event channels

use compact_str::CompactString;

/// Error returned by a handler callback.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// Handler rejected the event with a message
    #[error("{0}")]
    Failed(String),

    /// Any other error raised inside the handler
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HandlerError {
    /// Shorthand for [`HandlerError::Failed`].
    pub fn msg(message: impl Into<String>) -> Self {
        HandlerError::Failed(message.into())
    }
}

/// A single handler that did not complete successfully during a dispatch.
///
/// `index` is the handler's position in the active list of that dispatch and
/// `handler` its label (empty when the handler was registered unnamed).
#[derive(Debug, thiserror::Error)]
pub enum HandlerFailure {
    /// The handler returned an error
    #[error("handler #{index} '{handler}' failed: {source}")]
    Error {
        index: usize,
        handler: CompactString,
        #[source]
        source: HandlerError,
    },

    /// The handler panicked on a worker thread
    #[error("handler #{index} '{handler}' panicked: {message}")]
    Panicked {
        index: usize,
        handler: CompactString,
        message: String,
    },
}

impl HandlerFailure {
    /// Position of the failed handler in the dispatched list.
    pub fn index(&self) -> usize {
        match self {
            HandlerFailure::Error { index, .. } | HandlerFailure::Panicked { index, .. } => *index,
        }
    }

    pub fn handler(&self) -> &str {
        match self {
            HandlerFailure::Error { handler, .. } | HandlerFailure::Panicked { handler, .. } => {
                handler.as_str()
            }
        }
    }

    pub fn is_panic(&self) -> bool {
        matches!(self, HandlerFailure::Panicked { .. })
    }
}

/// Errors reported by [`Event::invoke`](crate::Event::invoke) and
/// [`Event::invoke_parallel`](crate::Event::invoke_parallel).
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// Sequential dispatch stopped at a failing handler
    #[error("event '{channel}' aborted: {failure}")]
    Handler {
        channel: CompactString,
        #[source]
        failure: HandlerFailure,
    },

    /// One or more handlers failed during parallel dispatch
    #[error("event '{channel}': {} of {dispatched} parallel handlers failed", failures.len())]
    Parallel {
        channel: CompactString,
        dispatched: usize,
        failures: Vec<HandlerFailure>,
    },
}

impl EventError {
    /// Every handler failure carried by this error, in handler-list order.
    pub fn failures(&self) -> &[HandlerFailure] {
        match self {
            EventError::Handler { failure, .. } => std::slice::from_ref(failure),
            EventError::Parallel { failures, .. } => failures,
        }
    }

    /// Label of the channel that reported the error.
    pub fn channel(&self) -> &str {
        match self {
            EventError::Handler { channel, .. } | EventError::Parallel { channel, .. } => {
                channel.as_str()
            }
        }
    }
}

/// Worker pool construction errors
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// Thread pool size must be greater than zero
    #[error("worker pool needs at least one thread")]
    NoThreads,

    /// Underlying thread pool could not be built
    #[error("worker pool build failed: {0}")]
    Build(#[from] rayon::ThreadPoolBuildError),
}

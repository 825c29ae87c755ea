//! # Ryo Event
//!
//! Typed publish/subscribe channels that decouple an emitter, usually a frame
//! loop, from any number of independent subscribers.
//!
//! ## Core Features
//!
//! - **Typed**: one [`Event<A>`] per event kind, carrying a payload of type `A`
//! - **Deferred subscriptions**: subscribe and unsubscribe never block and take
//!   effect at the start of the next dispatch, even when called from inside a
//!   running handler
//! - **Two dispatch modes**: ordered, sequential [`Event::invoke`] and
//!   concurrent [`Event::invoke_parallel`], which fans out to a worker pool and
//!   blocks until every handler has finished
//! - **No lost failures**: parallel handler errors and panics are collected and
//!   reported together once the dispatch completes
//!
//! ## Dispatch Cycle
//!
//! Each channel alternates between two states. While *accumulating*, requests
//! pile up in lock-free pending queues. An invocation *merges* them into the
//! active list (additions appended in order, then removals applied, removal
//! winning) and *dispatches* over that frozen list. Changes made while a
//! dispatch runs only affect the next one.
//!
//! ## Quick Start
//!
//! ```rust
//! use ryo_event::{Event, Handler, HandlerError, SenderId};
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use std::sync::Arc;
//!
//! #[derive(Debug, Clone, Copy)]
//! struct Update {
//!     delta_time: f64,
//! }
//!
//! let on_update = Event::<Update>::named("update");
//! let frames = Arc::new(AtomicU64::new(0));
//!
//! let counter = {
//!     let frames = Arc::clone(&frames);
//!     Handler::named("frame_counter", move |_sender, update: &Update| {
//!         if update.delta_time < 0.0 {
//!             return Err(HandlerError::msg("time went backwards"));
//!         }
//!         frames.fetch_add(1, Ordering::Relaxed);
//!         Ok(())
//!     })
//! };
//! on_update.subscribe(&counter);
//!
//! let window = SenderId::new();
//! on_update.invoke_parallel(window, Update { delta_time: 0.016 })?;
//! on_update.invoke(window, Update { delta_time: 0.016 })?;
//! assert_eq!(frames.load(Ordering::Relaxed), 2);
//!
//! on_update.unsubscribe(&counter);
//! # Ok::<(), ryo_event::EventError>(())
//! ```

pub mod barrier;
pub mod error;
pub mod handler;
pub mod pool;
pub mod stats;
pub mod types;

mod channel;

pub use barrier::{CompletionBarrier, CompletionSignal};
pub use channel::Event;
pub use error::{EventError, HandlerError, HandlerFailure, PoolError};
pub use handler::Handler;
pub use pool::{build_pool, shared_pool, Job, WorkerPool};
pub use stats::EventStats;
pub use types::SenderId;

/// Version of the event channel crate
pub const RYO_EVENT_VERSION: &str = env!("CARGO_PKG_VERSION");

//! Shutdown requests for the frame loop.
//!
//! Signal handlers, input and components all request a stop through the same
//! [`ShutdownHandle`]; the driver polls it once per frame.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// Shared flag asking the frame driver to stop after the current frame.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    requested: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }

    /// Asks the driver to close after the current frame.
    pub fn request(&self) {
        if !self.requested.swap(true, Ordering::AcqRel) {
            info!("🛑 Shutdown requested - closing after this frame");
        }
    }

    /// Withdraws a request, used when a close handler vetoes it.
    pub fn clear(&self) {
        self.requested.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_is_visible_to_clones() {
        let handle = ShutdownHandle::new();
        let clone = handle.clone();
        assert!(!clone.is_requested());

        handle.request();
        handle.request();
        assert!(clone.is_requested());

        clone.clear();
        assert!(!handle.is_requested());
    }
}

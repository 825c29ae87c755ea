//! Signal handling for graceful driver shutdown.
//!
//! Waits for a termination signal (SIGINT or SIGTERM on Unix, Ctrl+C on
//! Windows) and turns it into a shutdown request for the frame loop.

use crate::shutdown::ShutdownHandle;
use std::future::Future;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Spawns [`forward_signals`] on the runtime. A listener that fails to
/// install logs a warning and the task returns `false`.
pub fn spawn_listener(handle: ShutdownHandle) -> JoinHandle<bool> {
    tokio::spawn(report_failure(forward_signals(handle)))
}

/// Awaits `listener`, logging its error. Returns whether it succeeded.
async fn report_failure<F>(listener: F) -> bool
where
    F: Future<Output = Result<(), std::io::Error>>,
{
    match listener.await {
        Ok(()) => true,
        Err(e) => {
            warn!("⚠️ Signal handling unavailable, shutdown signals will be ignored: {e}");
            false
        }
    }
}

/// Waits for a termination signal, then requests shutdown through `handle`.
pub async fn forward_signals(handle: ShutdownHandle) -> Result<(), std::io::Error> {
    wait_for_signal().await?;
    info!("📡 Received shutdown signal - stopping frame loop");
    handle.request();
    Ok(())
}

async fn wait_for_signal() -> Result<(), std::io::Error> {
    #[cfg(unix)]
    {
        use signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => (),
            _ = sigterm.recv() => ()
        }
    }

    #[cfg(windows)]
    signal::ctrl_c().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::time::Duration;

    #[test_log::test(tokio::test)]
    async fn test_listener_failure_is_reported() {
        let failing = async { Err(io::Error::new(io::ErrorKind::Unsupported, "no signal driver")) };
        assert!(!report_failure(failing).await);
        assert!(report_failure(async { Ok(()) }).await);
    }

    #[tokio::test]
    async fn test_listener_waits_for_a_signal() {
        let handle = ShutdownHandle::new();
        let listener = spawn_listener(handle.clone());

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!handle.is_requested());
        listener.abort();
    }
}

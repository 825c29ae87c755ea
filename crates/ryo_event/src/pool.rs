//! Worker pools for parallel dispatch.
//!
//! [`Event::invoke_parallel`](crate::Event::invoke_parallel) only needs
//! something that can run a boxed job asynchronously. Rayon thread pools
//! implement [`WorkerPool`] directly; [`shared_pool`] returns the lazily
//! built process-wide pool that channels use unless given their own.
//!
//! Blocking on a parallel dispatch from inside a job running on the same pool
//! ties up one of its workers for the whole dispatch. Nesting deeper than the
//! pool has threads deadlocks.

use crate::error::PoolError;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::{debug, error};

/// A nullary unit of work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs jobs asynchronously on some set of threads.
pub trait WorkerPool: Send + Sync {
    /// Schedules `job` and returns without waiting for it.
    fn execute(&self, job: Job);

    /// Number of worker threads, for diagnostics.
    fn size(&self) -> usize;
}

impl WorkerPool for rayon::ThreadPool {
    fn execute(&self, job: Job) {
        self.spawn(job);
    }

    fn size(&self) -> usize {
        self.current_num_threads()
    }
}

static SHARED_POOL: Lazy<Arc<dyn WorkerPool>> = Lazy::new(|| {
    let threads = num_cpus::get().max(1);
    match build_pool(threads) {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Failed to build shared worker pool ({e}), falling back to rayon's global pool");
            Arc::new(GlobalRayon)
        }
    }
});

/// Returns the process-wide worker pool.
pub fn shared_pool() -> Arc<dyn WorkerPool> {
    Arc::clone(&SHARED_POOL)
}

/// Builds a dedicated pool with `threads` named workers.
pub fn build_pool(threads: usize) -> Result<Arc<dyn WorkerPool>, PoolError> {
    if threads == 0 {
        return Err(PoolError::NoThreads);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("ryo-worker-{i}"))
        .build()?;

    debug!("🧵 Built worker pool with {} threads", threads);
    Ok(Arc::new(pool))
}

/// Rayon's implicit global pool.
struct GlobalRayon;

impl WorkerPool for GlobalRayon {
    fn execute(&self, job: Job) {
        rayon::spawn(job);
    }

    fn size(&self) -> usize {
        rayon::current_num_threads()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel;
    use std::time::Duration;

    #[test]
    fn test_zero_threads_rejected() {
        assert!(matches!(build_pool(0), Err(PoolError::NoThreads)));
    }

    #[test]
    fn test_jobs_run_on_named_workers() {
        let pool = build_pool(2).unwrap();
        assert_eq!(pool.size(), 2);

        let (tx, rx) = channel::bounded(1);
        pool.execute(Box::new(move || {
            let name = std::thread::current().name().map(str::to_string);
            tx.send(name).unwrap();
        }));

        let name = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(name.unwrap().starts_with("ryo-worker-"));
    }

    #[test]
    fn test_shared_pool_is_reused() {
        let a = shared_pool();
        let b = shared_pool();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(a.size() >= 1);
    }
}

//! Fixed-size worker pool for map-reduce style simulation.
//!
//! [`WorkerPool`] owns a dedicated rayon thread pool with one thread per
//! worker. [`WorkerPool::map_reduce`] runs one task per worker index, blocks
//! until every task has finished, and folds the partial results in worker
//! order. The fold order never depends on thread scheduling, so floating-point
//! sums are reproducible.
//!
//! # Example
//!
//! ```rust
//! use pricer_pricing::pool::WorkerPool;
//!
//! let pool = WorkerPool::new(4).unwrap();
//! let total = pool.map_reduce(|worker| worker * 10, 0, |acc, part| acc + part);
//! assert_eq!(total, 60);
//! ```

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use thiserror::Error;

/// Worker count used when hardware parallelism cannot be detected.
pub const FALLBACK_WORKERS: usize = 2;

/// Failure to start a worker pool.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// A pool needs at least one worker.
    #[error("Worker pool needs at least one worker")]
    NoWorkers,

    /// The thread pool could not be built.
    #[error("Failed to build worker pool: {0}")]
    Build(String),
}

/// Number of workers matching the machine's available parallelism, or
/// [`FALLBACK_WORKERS`] when it cannot be determined.
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(FALLBACK_WORKERS)
}

/// A fixed set of worker threads.
///
/// Cloning is cheap: clones share the same threads.
#[derive(Clone)]
pub struct WorkerPool {
    pool: Arc<ThreadPool>,
    workers: usize,
}

impl WorkerPool {
    /// Starts a pool with `workers` threads.
    ///
    /// # Errors
    /// `PoolError::NoWorkers` for zero workers, `PoolError::Build` if the
    /// operating system refuses to start the threads.
    pub fn new(workers: usize) -> Result<Self, PoolError> {
        if workers == 0 {
            return Err(PoolError::NoWorkers);
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("mc-worker-{}", index))
            .build()
            .map_err(|e| PoolError::Build(e.to_string()))?;
        tracing::debug!(workers, "worker pool started");
        Ok(Self {
            pool: Arc::new(pool),
            workers,
        })
    }

    /// Number of workers.
    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs `map(worker)` for every worker index in `0..workers` on the
    /// pool, then folds the results with `reduce` starting from `init`.
    ///
    /// Blocks the caller until all tasks complete. Results are folded in
    /// ascending worker index.
    pub fn map_reduce<T, M, R>(&self, map: M, init: T, reduce: R) -> T
    where
        T: Send,
        M: Fn(usize) -> T + Send + Sync,
        R: FnMut(T, T) -> T,
    {
        let partials: Vec<T> = self
            .pool
            .install(|| (0..self.workers).into_par_iter().map(&map).collect());
        partials.into_iter().fold(init, reduce)
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.workers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[test]
    fn test_zero_workers_rejected() {
        assert_eq!(WorkerPool::new(0).unwrap_err(), PoolError::NoWorkers);
    }

    #[test]
    fn test_default_worker_count_is_positive() {
        assert!(default_worker_count() >= 1);
    }

    #[test]
    fn test_every_worker_index_runs_once() {
        let pool = WorkerPool::new(3).unwrap();
        let seen = Mutex::new(Vec::new());
        pool.map_reduce(
            |worker| {
                seen.lock().unwrap().push(worker);
            },
            (),
            |_, _| (),
        );
        let mut seen = seen.into_inner().unwrap();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn test_reduce_runs_in_worker_order() {
        let pool = WorkerPool::new(4).unwrap();
        let order = pool.map_reduce(
            |worker| vec![worker],
            Vec::new(),
            |mut acc, part| {
                acc.extend(part);
                acc
            },
        );
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_tasks_run_on_pool_threads() {
        let pool = WorkerPool::new(2).unwrap();
        let names = pool.map_reduce(
            |_| {
                let mut set = HashSet::new();
                set.insert(std::thread::current().name().map(str::to_string));
                set
            },
            HashSet::new(),
            |mut acc, part| {
                acc.extend(part);
                acc
            },
        );
        assert!(names
            .iter()
            .all(|name| name.as_deref().is_some_and(|n| n.starts_with("mc-worker-"))));
    }

    #[test]
    fn test_clones_share_threads() {
        let pool = WorkerPool::new(2).unwrap();
        let clone = pool.clone();
        assert!(Arc::ptr_eq(&pool.pool, &clone.pool));
        assert_eq!(format!("{:?}", clone), "WorkerPool { workers: 2 }");
    }
}

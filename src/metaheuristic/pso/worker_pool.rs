use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use std::thread;

/// Fixed set of worker threads the swarm is dispatched on once per cycle.
pub struct WorkerPool {
    pool: ThreadPool,
}

impl WorkerPool {
    /// `threads == 0` uses one thread more than the available cores.
    pub fn new(threads: usize) -> Result<Self, ThreadPoolBuildError> {
        let threads = if threads == 0 {
            thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
                + 1
        } else {
            threads
        };

        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("pso-worker-{}", i))
            .build()?;
        Ok(WorkerPool { pool })
    }

    /// Runs `task` once for every item and blocks until all of them are done.
    /// Results come back in item order.
    pub fn run_all<T, R, F>(&self, items: &mut [T], task: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(usize, &mut T) -> R + Sync + Send,
    {
        self.pool.install(|| {
            items
                .par_iter_mut()
                .enumerate()
                .map(|(i, item)| task(i, item))
                .collect()
        })
    }
}

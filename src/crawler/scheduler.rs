//! Worker pool bounding how many pages are parsed at once
//!
//! Crawl tasks themselves are cheap tokio tasks and may be arbitrarily many; a
//! task only needs a worker permit while it is parsing. A parent waiting on its
//! children holds no permit, so the children can always be scheduled.

use crate::RippleError;
use std::sync::Arc;
use std::thread;
use tokio::sync::{Semaphore, SemaphorePermit};

/// Clamps a requested worker count to the available hardware parallelism
///
/// The result is at least 1.
pub fn worker_count(requested: usize) -> usize {
    let available = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    requested.min(available).max(1)
}

/// Fixed-size pool of parse slots
#[derive(Debug, Clone)]
pub struct WorkerPool {
    /// Global semaphore for limiting concurrent parses
    semaphore: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    /// Creates a pool of `min(requested, available_parallelism)` workers
    pub fn new(requested: usize) -> Self {
        Self::with_exact_size(worker_count(requested))
    }

    /// Creates a pool of exactly `size` workers (at least 1)
    ///
    /// Mostly useful in tests that need more than one worker on a single-core
    /// machine.
    pub fn with_exact_size(size: usize) -> Self {
        let size = size.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    /// Number of workers in the pool
    pub fn size(&self) -> usize {
        self.size
    }

    /// Waits for a free worker; the slot is released when the permit drops
    pub async fn acquire(&self) -> Result<SemaphorePermit<'_>, RippleError> {
        Ok(self.semaphore.acquire().await?)
    }
}

//! Worker pool and category-ID generation.
//!
//! The pool owns a bounded queue of category IDs (capacity equal to the
//! worker count). A single producer pushes a strictly increasing ID
//! sequence and blocks on the queue when it is full, so it can never outrun
//! consumption by more than one queue depth. Each worker pulls one ID at a
//! time and runs the full category crawl to completion before requesting
//! the next.
//!
//! A category failure is logged and counted, and the worker moves on to the
//! next ID; one bad category never stops the pool.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{debug, info, instrument, warn};

use crate::crawler::{CategoryStats, Crawler};

/// Minimum allowed worker count.
const MIN_WORKERS: usize = 1;

/// Maximum allowed worker count.
const MAX_WORKERS: usize = 256;

/// Error type for worker pool construction.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Invalid worker count provided.
    #[error("invalid worker count {value}: must be between {MIN_WORKERS} and {MAX_WORKERS}")]
    InvalidWorkerCount {
        /// The invalid value that was provided.
        value: usize,
    },
}

/// Aggregate statistics from a pool run.
///
/// Uses atomic counters for thread-safe updates from concurrent workers.
#[derive(Debug, Default)]
pub struct CrawlStats {
    categories: AtomicUsize,
    failed: AtomicUsize,
    downloaded: AtomicUsize,
    skipped: AtomicUsize,
}

impl CrawlStats {
    /// Creates a new stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of categories crawled to completion.
    #[must_use]
    pub fn categories(&self) -> usize {
        self.categories.load(Ordering::SeqCst)
    }

    /// Returns the number of categories that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Returns the number of files downloaded.
    #[must_use]
    pub fn downloaded(&self) -> usize {
        self.downloaded.load(Ordering::SeqCst)
    }

    /// Returns the number of files skipped as already present.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped.load(Ordering::SeqCst)
    }

    /// Folds one completed category's counters into the aggregate.
    fn record_category(&self, category: &CategoryStats) {
        self.categories.fetch_add(1, Ordering::SeqCst);
        self.downloaded.fetch_add(category.downloaded, Ordering::SeqCst);
        self.skipped.fetch_add(category.skipped, Ordering::SeqCst);
    }

    /// Increments the failed-category counter.
    fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Creates a linked shutdown trigger/signal pair.
#[must_use]
pub fn shutdown_channel() -> (ShutdownTrigger, ShutdownSignal) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, ShutdownSignal { rx })
}

/// Fires the cooperative shutdown signal.
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    /// Requests shutdown. All signal clones observe it.
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }
}

/// Cooperative shutdown signal, checked at each queue push and each worker
/// iteration.
///
/// Dropping the trigger releases waiters the same as firing it, so a lost
/// trigger can never leave the pool waiting forever.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Returns true once shutdown has been requested.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Waits until shutdown is requested (or the trigger is dropped).
    pub async fn triggered(&mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// Inclusive category-ID range fed to the pool.
///
/// `end: None` reproduces the reference behavior of counting upward
/// forever; each ID's work stays finite through the paginator's own
/// termination heuristics.
#[derive(Debug, Clone, Copy)]
pub struct IdRange {
    /// First category ID.
    pub start: u64,
    /// Last category ID, or `None` for an unbounded sequence.
    pub end: Option<u64>,
}

/// Fixed-size pool of crawl workers draining one bounded ID queue.
#[derive(Debug)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// Creates a pool with the given worker count (also the queue capacity).
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidWorkerCount`] if the value is outside
    /// the valid range (1-256).
    #[instrument(level = "debug")]
    pub fn new(workers: usize) -> Result<Self, PoolError> {
        if !(MIN_WORKERS..=MAX_WORKERS).contains(&workers) {
            return Err(PoolError::InvalidWorkerCount { value: workers });
        }
        debug!(workers, "creating worker pool");
        Ok(Self { workers })
    }

    /// Returns the configured worker count.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs the pool until the ID range is exhausted or shutdown fires.
    ///
    /// Spawns one task per worker, generates IDs from `ids`, and waits for
    /// all workers to drain the queue. Individual category failures are
    /// logged, counted, and swallowed; they never abort the run.
    #[instrument(skip(self, crawler, shutdown), fields(workers = self.workers))]
    pub async fn run(
        &self,
        crawler: Arc<Crawler>,
        ids: IdRange,
        shutdown: ShutdownSignal,
    ) -> CrawlStats {
        let (tx, rx) = mpsc::channel::<u64>(self.workers);
        let rx = Arc::new(Mutex::new(rx));
        let stats = Arc::new(CrawlStats::new());

        info!(start_id = ids.start, end_id = ?ids.end, "starting crawl");

        let mut handles = Vec::with_capacity(self.workers);
        for worker_id in 0..self.workers {
            let crawler = Arc::clone(&crawler);
            let rx = Arc::clone(&rx);
            let stats = Arc::clone(&stats);
            let mut shutdown = shutdown.clone();

            handles.push(tokio::spawn(async move {
                loop {
                    if shutdown.is_triggered() {
                        break;
                    }

                    // Hold the receiver lock only while waiting for an ID,
                    // not while crawling.
                    let category_id = {
                        let mut rx = rx.lock().await;
                        tokio::select! {
                            id = rx.recv() => match id {
                                Some(id) => id,
                                None => break,
                            },
                            () = shutdown.triggered() => break,
                        }
                    };

                    debug!(worker_id, category_id, "worker picked up category");
                    match crawler.crawl_category(category_id).await {
                        Ok(category) => stats.record_category(&category),
                        Err(e) => {
                            warn!(
                                worker_id,
                                category_id,
                                error = %e,
                                "category crawl failed, continuing with next ID"
                            );
                            stats.increment_failed();
                        }
                    }
                }
                debug!(worker_id, "worker finished");
            }));
        }

        // Single producer: strictly increasing IDs, backpressured by the
        // bounded queue.
        let mut producer_shutdown = shutdown.clone();
        let mut id = ids.start;
        loop {
            if producer_shutdown.is_triggered() || ids.end.is_some_and(|end| id > end) {
                break;
            }
            tokio::select! {
                sent = tx.send(id) => {
                    if sent.is_err() {
                        break;
                    }
                }
                () = producer_shutdown.triggered() => break,
            }
            let Some(next) = id.checked_add(1) else { break };
            id = next;
        }
        drop(tx);

        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "worker task panicked");
            }
        }

        let stats = Arc::try_unwrap(stats).unwrap_or_else(|arc_stats| {
            // All workers have joined, so this branch should be unreachable;
            // rebuild from the atomic values if it is ever taken.
            let fresh = CrawlStats::new();
            fresh.categories.store(arc_stats.categories(), Ordering::SeqCst);
            fresh.failed.store(arc_stats.failed(), Ordering::SeqCst);
            fresh.downloaded.store(arc_stats.downloaded(), Ordering::SeqCst);
            fresh.skipped.store(arc_stats.skipped(), Ordering::SeqCst);
            fresh
        });

        info!(
            categories = stats.categories(),
            failed = stats.failed(),
            downloaded = stats.downloaded(),
            skipped = stats.skipped(),
            "crawl finished"
        );
        stats
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_rejects_zero_workers() {
        let result = WorkerPool::new(0);
        assert!(matches!(
            result,
            Err(PoolError::InvalidWorkerCount { value: 0 })
        ));
    }

    #[test]
    fn test_pool_rejects_oversized_worker_count() {
        assert!(WorkerPool::new(257).is_err());
        assert!(WorkerPool::new(256).is_ok());
    }

    #[test]
    fn test_crawl_stats_record_category_accumulates() {
        let stats = CrawlStats::new();
        stats.record_category(&CategoryStats {
            pages_fetched: 2,
            entries_seen: 12,
            downloaded: 10,
            skipped: 2,
        });
        stats.record_category(&CategoryStats {
            pages_fetched: 1,
            entries_seen: 3,
            downloaded: 1,
            skipped: 0,
        });
        assert_eq!(stats.categories(), 2);
        assert_eq!(stats.downloaded(), 11);
        assert_eq!(stats.skipped(), 2);
        assert_eq!(stats.failed(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_signal_observes_trigger() {
        let (trigger, mut signal) = shutdown_channel();
        assert!(!signal.is_triggered());

        trigger.trigger();
        signal.triggered().await;
        assert!(signal.is_triggered());
    }

    #[tokio::test]
    async fn test_shutdown_signal_released_when_trigger_dropped() {
        let (trigger, mut signal) = shutdown_channel();
        drop(trigger);
        // Must complete rather than wait forever.
        signal.triggered().await;
    }

    #[tokio::test]
    async fn test_shutdown_signal_clones_share_state() {
        let (trigger, signal) = shutdown_channel();
        let mut cloned = signal.clone();
        trigger.trigger();
        cloned.triggered().await;
        assert!(signal.is_triggered());
    }
}

//! Bulk fetch engine for concurrent batched downloads.
//!
//! This module provides the `BulkFetchEngine` which executes a batch of
//! independent fetch-and-persist operations using a semaphore-based
//! concurrency control pattern.
//!
//! # Overview
//!
//! The engine consumes a [`WorkBatch`] of (source URL, destination path)
//! pairs, dispatching each item exactly once to a caller-supplied
//! [`Fetch`] implementation, with a configurable concurrency ceiling.
//! One item's failure never cancels or corrupts sibling items: errors are
//! logged, recorded in the batch statistics, and the run continues.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use estat_dl_core::download::{BulkFetchEngine, HttpClient, TextFetcher, Transcoding, WorkBatch};
//! use estat_dl_core::progress::BatchProgress;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let batch = WorkBatch::from_pairs(
//!     vec!["https://example.com/page_0.csv".to_string()],
//!     vec!["./downloads/page_0.csv".into()],
//! )?;
//! let fetcher = Arc::new(TextFetcher::new(HttpClient::new(), Transcoding::utf8()));
//! let engine = BulkFetchEngine::new(10)?;
//! let progress = BatchProgress::hidden(batch.len() as u64);
//! let stats = engine.run_batch(batch, fetcher, &progress).await?;
//! println!("Completed: {}, Failed: {}", stats.completed(), stats.failed());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use super::constants::{MAX_CONCURRENCY, MIN_CONCURRENCY};
use super::fetchers::Fetch;
use crate::progress::BatchProgress;

/// Error type for bulk fetch engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// Source and destination sequences differ in length.
    #[error("mismatched batch: {sources} sources but {dests} destinations")]
    LengthMismatch {
        /// Number of source URLs supplied.
        sources: usize,
        /// Number of destination paths supplied.
        dests: usize,
    },

    /// Semaphore was closed unexpectedly.
    #[error("semaphore closed unexpectedly")]
    SemaphoreClosed,
}

/// One (source, destination) pair to be fetched and persisted.
///
/// Immutable once created; the engine only consumes items. The pairing is
/// fixed at dispatch time and unaffected by completion order.
#[derive(Debug, Clone)]
pub struct WorkItem {
    /// Source URL to fetch.
    pub source: String,
    /// Destination file path to write.
    pub dest: PathBuf,
}

/// The full ordered collection of work items for one engine invocation.
#[derive(Debug, Clone, Default)]
pub struct WorkBatch {
    items: Vec<WorkItem>,
}

impl WorkBatch {
    /// Builds a batch from parallel source and destination sequences.
    ///
    /// Item `i`'s source is paired with item `i`'s destination. The caller
    /// must ensure destination paths are disjoint across items.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::LengthMismatch`] when the sequences differ
    /// in length.
    pub fn from_pairs(
        sources: Vec<String>,
        dests: Vec<PathBuf>,
    ) -> Result<Self, EngineError> {
        if sources.len() != dests.len() {
            return Err(EngineError::LengthMismatch {
                sources: sources.len(),
                dests: dests.len(),
            });
        }
        let items = sources
            .into_iter()
            .zip(dests)
            .map(|(source, dest)| WorkItem { source, dest })
            .collect();
        Ok(Self { items })
    }

    /// Number of work items in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the work items in submission order.
    pub fn iter(&self) -> std::slice::Iter<'_, WorkItem> {
        self.items.iter()
    }
}

impl From<Vec<WorkItem>> for WorkBatch {
    fn from(items: Vec<WorkItem>) -> Self {
        Self { items }
    }
}

impl IntoIterator for WorkBatch {
    type Item = WorkItem;
    type IntoIter = std::vec::IntoIter<WorkItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// A failed work item: the (source, destination, reason) tuple returned to
/// the caller for optional re-runs.
#[derive(Debug, Clone)]
pub struct BatchFailure {
    /// Source URL that failed.
    pub source: String,
    /// Destination path the item would have written.
    pub dest: PathBuf,
    /// Human-readable failure reason.
    pub reason: String,
}

/// Statistics from a bulk fetch run.
///
/// Tracks completed and failed item counts during a `run_batch()`
/// invocation. Uses atomic counters for thread-safe updates from
/// concurrent fetch tasks; failed items additionally record their
/// (source, destination, reason) tuples.
#[derive(Debug, Default)]
pub struct BatchStats {
    completed: AtomicUsize,
    failed: AtomicUsize,
    failures: Mutex<Vec<BatchFailure>>,
}

impl BatchStats {
    /// Creates a new stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of successfully completed fetches.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Returns the number of failed fetches.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Returns the total number of items that reached a terminal outcome.
    #[must_use]
    pub fn total(&self) -> usize {
        self.completed() + self.failed()
    }

    /// Returns the recorded failures in completion order.
    ///
    /// # Panics
    ///
    /// Panics if a fetch task panicked while holding the failure lock,
    /// which the engine prevents by recording failures outside any
    /// user-supplied code path.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn failures(&self) -> Vec<BatchFailure> {
        self.failures.lock().unwrap().clone()
    }

    /// Increments the completed counter.
    fn record_completed(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    /// Increments the failed counter and records the failure tuple.
    #[allow(clippy::unwrap_used)]
    fn record_failed(&self, failure: BatchFailure) {
        self.failed.fetch_add(1, Ordering::SeqCst);
        self.failures.lock().unwrap().push(failure);
    }
}

/// Bulk fetch engine for concurrent batched downloads.
///
/// The engine uses a semaphore to limit the number of in-flight fetches,
/// preventing resource exhaustion and keeping the request pressure on the
/// API bounded.
///
/// # Concurrency Model
///
/// - Each fetch runs in its own Tokio task
/// - A semaphore permit is acquired before spawning each task
/// - Permits are released automatically when fetches complete (RAII)
/// - Items are dispatched in submission order; completion order is
///   unspecified
///
/// # Failure Model
///
/// - Per-item errors are contained at the item level and never cancel
///   sibling items that are in flight or queued
/// - There is no retry: a failed item's tuple is recorded in
///   [`BatchStats`] so the caller can decide what to re-run
/// - Task panics are logged; the remaining items still run to completion
#[derive(Debug)]
pub struct BulkFetchEngine {
    /// Semaphore for concurrency control.
    semaphore: Arc<Semaphore>,
    /// Configured concurrency limit.
    concurrency: usize,
}

impl BulkFetchEngine {
    /// Creates a new engine with the specified concurrency limit.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the value is outside
    /// the valid range (1-100).
    #[instrument(level = "debug")]
    pub fn new(concurrency: usize) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }

        debug!(concurrency, "creating bulk fetch engine");

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
        })
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Executes every item of the batch, bounded by the concurrency limit.
    ///
    /// This method:
    /// 1. Dispatches each work item exactly once, in submission order
    /// 2. Runs at most `concurrency` fetches at any instant
    /// 3. Ticks `progress` once per terminal outcome, success or failure
    /// 4. Returns only after all items have reached a terminal outcome
    ///
    /// An empty batch completes immediately with zero progress ticks.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SemaphoreClosed`] if the semaphore is closed.
    ///
    /// Note: individual fetch failures do NOT cause this method to error.
    /// They are logged, counted, and recorded in the returned stats.
    #[instrument(skip(self, batch, fetcher, progress), fields(items = batch.len()))]
    pub async fn run_batch(
        &self,
        batch: WorkBatch,
        fetcher: Arc<dyn Fetch>,
        progress: &BatchProgress,
    ) -> Result<BatchStats, EngineError> {
        let stats = Arc::new(BatchStats::new());
        let mut handles = Vec::with_capacity(batch.len());

        info!(items = batch.len(), "starting batch");

        for item in batch {
            // Acquire semaphore permit (blocks if at concurrency limit)
            let permit = self
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| EngineError::SemaphoreClosed)?;

            // Clone values for the spawned task
            let fetcher = Arc::clone(&fetcher);
            let stats = Arc::clone(&stats);
            let progress = progress.clone();

            handles.push(tokio::spawn(async move {
                // Permit is dropped when this block exits (RAII)
                let _permit = permit;

                match fetcher.fetch(&item.source, &item.dest).await {
                    Ok(()) => {
                        debug!(url = %item.source, path = %item.dest.display(), "fetch completed");
                        stats.record_completed();
                    }
                    Err(e) => {
                        warn!(
                            url = %item.source,
                            path = %item.dest.display(),
                            error = %e,
                            "fetch failed"
                        );
                        stats.record_failed(BatchFailure {
                            source: item.source,
                            dest: item.dest,
                            reason: e.to_string(),
                        });
                    }
                }

                progress.tick();
            }));
        }

        debug!(task_count = handles.len(), "waiting for fetches to complete");

        // Wait for all tasks to complete (full barrier)
        for handle in handles {
            // Ignore JoinError - task panics are logged but don't fail the batch
            if let Err(e) = handle.await {
                warn!(error = %e, "fetch task panicked");
            }
        }
        progress.finish();

        let completed = stats.completed();
        let failed = stats.failed();
        info!(
            completed,
            failed,
            total = completed + failed,
            "batch complete"
        );

        // All tasks are done, so we should have sole ownership of the Arc.
        // If not (which would be a bug), rebuild stats from the shared values.
        match Arc::try_unwrap(stats) {
            Ok(stats) => Ok(stats),
            Err(arc_stats) => {
                let new_stats = BatchStats::new();
                new_stats
                    .completed
                    .store(arc_stats.completed(), Ordering::SeqCst);
                new_stats.failed.store(arc_stats.failed(), Ordering::SeqCst);
                for failure in arc_stats.failures() {
                    #[allow(clippy::unwrap_used)]
                    new_stats.failures.lock().unwrap().push(failure);
                }
                Ok(new_stats)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_new_valid_concurrency() {
        // Test minimum valid value
        let engine = BulkFetchEngine::new(1).unwrap();
        assert_eq!(engine.concurrency(), 1);

        // Test default value
        let engine = BulkFetchEngine::new(10).unwrap();
        assert_eq!(engine.concurrency(), 10);

        // Test maximum valid value
        let engine = BulkFetchEngine::new(100).unwrap();
        assert_eq!(engine.concurrency(), 100);
    }

    #[test]
    fn test_engine_new_invalid_concurrency_zero() {
        let result = BulkFetchEngine::new(0);
        assert!(matches!(
            result,
            Err(EngineError::InvalidConcurrency { value: 0 })
        ));
    }

    #[test]
    fn test_engine_new_invalid_concurrency_too_high() {
        let result = BulkFetchEngine::new(101);
        assert!(matches!(
            result,
            Err(EngineError::InvalidConcurrency { value: 101 })
        ));
    }

    #[test]
    fn test_work_batch_from_pairs_pairs_positionally() {
        let batch = WorkBatch::from_pairs(
            vec!["http://a".to_string(), "http://b".to_string()],
            vec![PathBuf::from("/tmp/a"), PathBuf::from("/tmp/b")],
        )
        .unwrap();

        assert_eq!(batch.len(), 2);
        let items: Vec<_> = batch.iter().collect();
        assert_eq!(items[0].source, "http://a");
        assert_eq!(items[0].dest, PathBuf::from("/tmp/a"));
        assert_eq!(items[1].source, "http://b");
        assert_eq!(items[1].dest, PathBuf::from("/tmp/b"));
    }

    #[test]
    fn test_work_batch_from_pairs_rejects_length_mismatch() {
        let result = WorkBatch::from_pairs(
            vec!["http://a".to_string(), "http://b".to_string()],
            vec![PathBuf::from("/tmp/a")],
        );
        assert!(matches!(
            result,
            Err(EngineError::LengthMismatch {
                sources: 2,
                dests: 1
            })
        ));
    }

    #[test]
    fn test_work_batch_empty() {
        let batch = WorkBatch::from_pairs(vec![], vec![]).unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.len(), 0);
    }

    #[test]
    fn test_batch_stats_default() {
        let stats = BatchStats::default();
        assert_eq!(stats.completed(), 0);
        assert_eq!(stats.failed(), 0);
        assert_eq!(stats.total(), 0);
        assert!(stats.failures().is_empty());
    }

    #[test]
    fn test_batch_stats_record() {
        let stats = BatchStats::new();

        stats.record_completed();
        stats.record_completed();
        stats.record_failed(BatchFailure {
            source: "http://x".to_string(),
            dest: PathBuf::from("/tmp/x"),
            reason: "HTTP 500".to_string(),
        });

        assert_eq!(stats.completed(), 2);
        assert_eq!(stats.failed(), 1);
        assert_eq!(stats.total(), 3);

        let failures = stats.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].source, "http://x");
        assert_eq!(failures[0].reason, "HTTP 500");
    }

    #[test]
    fn test_batch_stats_thread_safe() {
        use std::thread;

        let stats = Arc::new(BatchStats::new());
        let mut handles = Vec::new();

        // Spawn multiple threads incrementing counters
        for _ in 0..10 {
            let stats = Arc::clone(&stats);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    stats.record_completed();
                    stats.record_failed(BatchFailure {
                        source: "http://x".to_string(),
                        dest: PathBuf::from("/tmp/x"),
                        reason: "boom".to_string(),
                    });
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        // 10 threads * 100 increments each
        assert_eq!(stats.completed(), 1000);
        assert_eq!(stats.failed(), 1000);
        assert_eq!(stats.total(), 2000);
        assert_eq!(stats.failures().len(), 1000);
    }

    #[test]
    fn test_engine_error_display() {
        let error = EngineError::InvalidConcurrency { value: 0 };
        let msg = error.to_string();
        assert!(msg.contains("invalid concurrency"));
        assert!(msg.contains("0"));
        assert!(msg.contains("1")); // min
        assert!(msg.contains("100")); // max

        let error = EngineError::LengthMismatch {
            sources: 3,
            dests: 2,
        };
        let msg = error.to_string();
        assert!(msg.contains("3"));
        assert!(msg.contains("2"));
    }
}

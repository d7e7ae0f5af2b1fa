//! Download engine for bounded concurrent file downloads.
//!
//! The orchestrator hands resolved targets to the engine one at a time;
//! each target becomes its own Tokio task, gated by a semaphore so at most
//! `concurrency` downloads are in flight. Finished tasks are reaped on each
//! enqueue, and [`DownloadEngine::finish`] is the join barrier that waits for
//! the rest and returns the run statistics.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, instrument, warn};

use super::client::{DownloadOutcome, Downloader};

/// Minimum allowed concurrency value.
const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
pub const MAX_CONCURRENCY: usize = 100;

/// Default concurrency if not specified.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Error type for download engine operations.
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

    /// Semaphore was closed unexpectedly.
    #[error("semaphore closed unexpectedly")]
    SemaphoreClosed,
}

/// A file reference after redirect resolution, ready to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Sanitized output filename.
    pub filename: String,
    /// Final URL after redirects.
    pub url: String,
}

impl ResolvedTarget {
    /// Creates a target.
    #[must_use]
    pub fn new(filename: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            url: url.into(),
        }
    }
}

/// Statistics from a download run.
///
/// Uses atomic counters for thread-safe updates from concurrent download tasks.
#[derive(Debug, Default)]
pub struct DownloadStats {
    written: AtomicUsize,
    skipped: AtomicUsize,
    failed: AtomicUsize,
}

impl DownloadStats {
    /// Creates a new stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of files written.
    #[must_use]
    pub fn written(&self) -> usize {
        self.written.load(Ordering::SeqCst)
    }

    /// Returns the number of targets skipped because the file existed.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped.load(Ordering::SeqCst)
    }

    /// Returns the number of failed downloads.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Returns the total number of targets processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.written() + self.skipped() + self.failed()
    }

    fn record(&self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Written { .. } => self.written.fetch_add(1, Ordering::SeqCst),
            DownloadOutcome::Skipped { .. } => self.skipped.fetch_add(1, Ordering::SeqCst),
        };
    }

    fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }

    fn snapshot(&self) -> Self {
        Self {
            written: AtomicUsize::new(self.written()),
            skipped: AtomicUsize::new(self.skipped()),
            failed: AtomicUsize::new(self.failed()),
        }
    }
}

/// Download engine with a semaphore-bounded worker pool.
///
/// # Concurrency Model
///
/// - Each download runs in its own Tokio task
/// - A semaphore permit is acquired before spawning, so `enqueue` waits
///   while the pool is full
/// - Permits are released automatically when downloads complete (RAII)
/// - Failures are logged and counted, never returned to the caller
#[derive(Debug)]
pub struct DownloadEngine {
    semaphore: Arc<Semaphore>,
    concurrency: usize,
    downloader: Downloader,
    output_dir: PathBuf,
    stats: Arc<DownloadStats>,
    tasks: JoinSet<()>,
    enqueued: usize,
}

impl DownloadEngine {
    /// Creates an engine writing into `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the value is outside
    /// the valid range (1-100).
    ///
    /// # Example
    ///
    /// ```
    /// use harvester_core::download::{DownloadEngine, Downloader};
    /// use std::path::Path;
    ///
    /// let engine = DownloadEngine::new(10, Downloader::new(), Path::new("PDFs")).unwrap();
    /// assert_eq!(engine.concurrency(), 10);
    /// ```
    #[instrument(level = "debug", skip(downloader))]
    pub fn new(
        concurrency: usize,
        downloader: Downloader,
        output_dir: &Path,
    ) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }

        debug!(concurrency, "creating download engine");

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
            downloader,
            output_dir: output_dir.to_path_buf(),
            stats: Arc::new(DownloadStats::new()),
            tasks: JoinSet::new(),
            enqueued: 0,
        })
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the number of targets enqueued so far.
    #[must_use]
    pub fn enqueued(&self) -> usize {
        self.enqueued
    }

    /// Returns the number of tasks not yet reaped.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Spawns a download task for `target`, waiting for a free slot first.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SemaphoreClosed`] if the semaphore is closed.
    pub async fn enqueue(&mut self, target: ResolvedTarget) -> Result<(), EngineError> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| EngineError::SemaphoreClosed)?;

        while let Some(result) = self.tasks.try_join_next() {
            self.record_join(result);
        }

        let downloader = self.downloader.clone();
        let stats = Arc::clone(&self.stats);
        let dest = self.output_dir.join(&target.filename);

        debug!(url = %target.url, path = %dest.display(), "enqueued download");

        self.enqueued += 1;
        self.tasks.spawn(async move {
            // Permit is dropped when this block exits (RAII)
            let _permit = permit;

            match downloader.download(&target.url, &dest).await {
                Ok(outcome) => stats.record(&outcome),
                Err(e) => {
                    warn!(url = %target.url, path = %dest.display(), error = %e, "download failed");
                    stats.increment_failed();
                }
            }
        });
        Ok(())
    }

    fn record_join(&self, result: Result<(), JoinError>) {
        // A panicked task counts as a failure but never fails the run
        if let Err(e) = result {
            warn!(error = %e, "download task panicked");
            self.stats.increment_failed();
        }
    }

    /// Waits for every enqueued download and returns the run statistics.
    pub async fn finish(mut self) -> DownloadStats {
        debug!(
            in_flight = self.tasks.len(),
            enqueued = self.enqueued,
            "waiting for downloads to complete"
        );

        while let Some(result) = self.tasks.join_next().await {
            self.record_join(result);
        }

        let stats = Arc::try_unwrap(self.stats).unwrap_or_else(|shared| shared.snapshot());
        info!(
            written = stats.written(),
            skipped = stats.skipped(),
            failed = stats.failed(),
            total = stats.total(),
            "downloads complete"
        );
        stats
    }
}

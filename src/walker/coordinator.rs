//! Run coordinator - orchestrates discovery, workers and progress
//!
//! The coordinator is responsible for:
//! - Validating the root path before any thread starts
//! - Setting up the work queue, the discoverer and the worker pool
//! - Starting the progress reporter
//! - Joining everything and producing the final `RunResult`
//!
//! Run lifecycle:
//!
//! ```text
//! NotStarted ──► Scanning & Processing ──► Draining ──► Complete
//!                (discoverer + workers)    (queue closed, workers finishing)
//! ```

use crate::config::RunConfig;
use crate::error::{Result, SidecarError, WorkerError};
use crate::progress::ProgressReporter;
use crate::walker::discovery::Discoverer;
use crate::walker::queue::WorkQueue;
use crate::walker::stats::RunStats;
use crate::walker::worker::Worker;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Files discovered
    pub total: u64,

    /// Files whose unit of work succeeded
    pub processed: u64,

    /// Files whose unit of work failed
    pub errored: u64,

    /// Wall-clock start
    pub started_at: DateTime<Utc>,

    /// Wall-clock end
    pub finished_at: DateTime<Utc>,

    /// Time taken for the run
    pub duration: Duration,
}

impl RunResult {
    /// A run succeeds only if no file failed
    pub fn is_success(&self) -> bool {
        self.errored == 0
    }
}

/// Coordinates one create or restore run
pub struct RunCoordinator {
    /// Configuration
    config: Arc<RunConfig>,

    /// Shared counters
    stats: Arc<RunStats>,
}

impl RunCoordinator {
    /// Create a new run coordinator
    pub fn new(config: RunConfig) -> Self {
        Self {
            config: Arc::new(config),
            stats: Arc::new(RunStats::new()),
        }
    }

    /// Get a handle on the live counters
    pub fn stats(&self) -> Arc<RunStats> {
        Arc::clone(&self.stats)
    }

    /// Run the pipeline to completion
    pub fn run(self) -> Result<RunResult> {
        let root = validate_root(&self.config.root)?;

        let started = Instant::now();
        let started_at = Utc::now();

        info!(
            mode = self.config.mode.name(),
            root = %root.display(),
            workers = self.config.worker_count,
            started_at = %started_at.to_rfc3339(),
            "Starting run"
        );

        let discoverer = Discoverer::new(&root, self.config.mode)?;
        let (queue, sender) = WorkQueue::new(self.config.queue_size);

        // Workers hold the only senders; the channel disconnects when the last one exits
        let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(0);

        let mut workers = Vec::with_capacity(self.config.worker_count);
        for id in 0..self.config.worker_count {
            workers.push(Worker::spawn(
                id,
                Arc::clone(&self.config),
                queue.receiver(),
                Arc::clone(&self.stats),
                done_tx.clone(),
            )?);
        }
        drop(done_tx);
        info!(count = workers.len(), "Workers spawned");

        let reporter = if self.config.show_progress {
            Some(ProgressReporter::new(Arc::clone(&self.stats), started).spawn(done_rx)?)
        } else {
            None
        };

        let discovery = discoverer
            .spawn(sender, Arc::clone(&self.stats))?
            .join()
            .map_err(|_| WorkerError::Panicked {
                name: "discovery".into(),
            })?;

        // Discovery has closed the queue; wait for the pool to drain it
        let mut panicked = None;
        for worker in workers {
            if let Err(e) = worker.join() {
                warn!(error = %e, "Worker failed to join cleanly");
                panicked.get_or_insert(e);
            }
        }

        let queue_stats = queue.stats();
        debug!(
            enqueued = queue_stats.enqueued.load(Ordering::Acquire),
            dequeued = queue_stats.dequeued.load(Ordering::Acquire),
            "Work queue drained"
        );

        if let Some(reporter) = reporter {
            reporter.join().map_err(|_| WorkerError::Panicked {
                name: "progress".into(),
            })?;
        }

        let duration = started.elapsed();
        let finished_at = Utc::now();
        let snapshot = self.stats.snapshot();

        if let Some(e) = panicked {
            return Err(e.into());
        }

        if let Err(e) = discovery {
            error!(
                error = %e,
                processed = snapshot.processed,
                errored = snapshot.errored,
                "Discovery failed; run aborted after draining queued files"
            );
            return Err(e.into());
        }

        debug_assert!(queue.is_drained());
        debug_assert!(snapshot.is_balanced());

        info!(
            total = snapshot.total,
            processed = snapshot.processed,
            errored = snapshot.errored,
            finished_at = %finished_at.to_rfc3339(),
            duration_secs = duration.as_secs(),
            "Run completed"
        );

        Ok(RunResult {
            total: snapshot.total,
            processed: snapshot.processed,
            errored: snapshot.errored,
            started_at,
            finished_at,
            duration,
        })
    }
}

/// Check that `root` exists and is a directory, returning its absolute form
pub fn validate_root(root: &Path) -> Result<PathBuf> {
    let invalid = |reason: &str| SidecarError::InvalidPath {
        path: root.to_path_buf(),
        reason: reason.to_string(),
    };

    if root.as_os_str().is_empty() {
        return Err(invalid("path is empty"));
    }

    let meta = std::fs::metadata(root).map_err(|_| invalid("path does not exist"))?;
    if !meta.is_dir() {
        return Err(invalid("path is not a directory"));
    }

    Ok(std::path::absolute(root)?)
}

//! Worker thread logic for the file pool
//!
//! Each worker:
//! - Pulls file tasks from the work queue (blocking, no polling)
//! - Runs the mode's unit of work on the file
//! - Counts the outcome; failures never leave the worker
//! - Exits once the queue is closed and empty
//!
//! Every worker holds a clone of the pool's `done` sender. When the last
//! worker exits, that channel disconnects, telling the reporter the pool
//! has drained.

use crate::config::{Mode, RunConfig};
use crate::error::{FileOutcome, WorkerError};
use crate::sidecar::{create_sidecar, restore_from_sidecar};
use crate::walker::queue::{FileTask, WorkGuard, WorkQueueReceiver};
use crate::walker::stats::RunStats;
use crossbeam_channel::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, trace, warn};

/// A worker thread that processes file tasks
pub struct Worker {
    /// Worker ID
    id: usize,

    /// Thread handle
    handle: Option<JoinHandle<u64>>,
}

impl Worker {
    /// Spawn a new worker thread
    pub fn spawn(
        id: usize,
        config: Arc<RunConfig>,
        queue_rx: WorkQueueReceiver,
        stats: Arc<RunStats>,
        done: Sender<()>,
    ) -> Result<Self, WorkerError> {
        let name = format!("worker-{}", id);

        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                let handled = worker_loop(id, &config, &queue_rx, &stats);
                drop(done);
                handled
            })
            .map_err(|e| WorkerError::SpawnFailed {
                name,
                reason: e.to_string(),
            })?;

        Ok(Self {
            id,
            handle: Some(handle),
        })
    }

    /// Wait for the worker to finish, returning how many files it handled
    pub fn join(mut self) -> Result<u64, WorkerError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| WorkerError::Panicked {
                name: format!("worker-{}", self.id),
            }),
            None => Ok(0),
        }
    }
}

/// Main worker loop
fn worker_loop(
    id: usize,
    config: &RunConfig,
    queue_rx: &WorkQueueReceiver,
    stats: &RunStats,
) -> u64 {
    debug!(worker = id, "Worker starting");

    let log_files = !config.show_progress;
    let mut handled = 0u64;

    while let Some(task) = queue_rx.recv() {
        // Mark as actively working
        let _guard = WorkGuard::new(queue_rx);

        let outcome = process_file(config.mode, &task, config.delete_sidecar);

        match &outcome {
            FileOutcome::Processed { path } => {
                stats.record_processed();
                if log_files {
                    info!(worker = id, path = %path.display(), "Processed");
                } else {
                    trace!(worker = id, path = %path.display(), "Processed");
                }
            }
            FileOutcome::Failed { path, error } => {
                stats.record_error();
                if log_files {
                    warn!(worker = id, path = %path.display(), error = %error, "Failed");
                } else {
                    debug!(worker = id, path = %path.display(), error = %error, "Failed");
                }
            }
        }

        handled += 1;
    }

    debug!(worker = id, files = handled, "Worker shutting down");
    handled
}

/// Run the unit of work for `mode` on one file
pub fn process_file(mode: Mode, task: &FileTask, delete_sidecar: bool) -> FileOutcome {
    let result = match mode {
        Mode::Create => create_sidecar(task.path()).map(|_| ()),
        Mode::Restore => restore_from_sidecar(task.path(), delete_sidecar).map(|_| ()),
    };

    (task.path.clone(), result).into()
}

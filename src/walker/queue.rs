//! Work queue of discovered files
//!
//! A crossbeam channel carries file tasks from the single discoverer to the
//! worker pool. The discoverer owns the only sender; when it is dropped the
//! channel disconnects, which is the one signal that no more work will ever
//! arrive. Workers block in `recv` and see `None` exactly when the queue is
//! closed and empty, so there is no polling of "done" flags.
//!
//! The queue is unbounded unless a capacity is given, in which case `send`
//! blocks while the queue is full (backpressure on the discoverer).

use crate::error::DiscoveryError;
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// A discovered file waiting to be processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    /// Absolute path to the file
    pub path: PathBuf,
}

impl FileTask {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// One-way "discovery complete" flag
///
/// Written once by the discoverer when its sender goes away, read by anyone.
#[derive(Debug, Default)]
pub struct DiscoveryStatus {
    complete: AtomicBool,
}

impl DiscoveryStatus {
    pub fn is_complete(&self) -> bool {
        self.complete.load(Ordering::Acquire)
    }

    fn mark_complete(&self) {
        self.complete.store(true, Ordering::Release);
    }
}

/// Statistics for the work queue
#[derive(Debug, Default)]
pub struct QueueStats {
    /// Total tasks enqueued
    pub enqueued: AtomicU64,

    /// Total tasks dequeued
    pub dequeued: AtomicU64,

    /// Tasks whose processing finished (guard dropped)
    pub finished: AtomicU64,
}

/// Work queue for file tasks
pub struct WorkQueue {
    /// Receiver for getting tasks
    receiver: Receiver<FileTask>,

    /// Discovery flag, flipped when the sender is dropped
    status: Arc<DiscoveryStatus>,

    /// Queue statistics
    stats: Arc<QueueStats>,
}

impl WorkQueue {
    /// Create a queue and its single producer handle
    pub fn new(capacity: Option<usize>) -> (Self, WorkQueueSender) {
        let (sender, receiver) = match capacity {
            Some(cap) => bounded(cap),
            None => unbounded(),
        };

        let status = Arc::new(DiscoveryStatus::default());
        let stats = Arc::new(QueueStats::default());

        let queue = Self {
            receiver,
            status: Arc::clone(&status),
            stats: Arc::clone(&stats),
        };

        let sender = WorkQueueSender {
            sender: Some(sender),
            status,
            stats,
        };

        (queue, sender)
    }

    /// Get a receiver for this queue (clone for each worker)
    pub fn receiver(&self) -> WorkQueueReceiver {
        WorkQueueReceiver {
            receiver: self.receiver.clone(),
            stats: Arc::clone(&self.stats),
        }
    }

    /// Get the discovery flag
    pub fn status(&self) -> Arc<DiscoveryStatus> {
        Arc::clone(&self.status)
    }

    /// Get queue statistics
    pub fn stats(&self) -> Arc<QueueStats> {
        Arc::clone(&self.stats)
    }

    /// Check if all work is complete
    ///
    /// Work is complete when:
    /// 1. Discovery has finished (read first: every enqueue happens before it)
    /// 2. Every enqueued task has finished processing
    pub fn is_drained(&self) -> bool {
        if !self.status.is_complete() {
            return false;
        }
        let enqueued = self.stats.enqueued.load(Ordering::Acquire);
        let finished = self.stats.finished.load(Ordering::Acquire);
        finished == enqueued
    }
}

/// The discoverer's producer handle
///
/// Not cloneable: dropping it (or calling `close`) publishes discovery
/// completion and disconnects the channel.
pub struct WorkQueueSender {
    sender: Option<Sender<FileTask>>,
    status: Arc<DiscoveryStatus>,
    stats: Arc<QueueStats>,
}

impl WorkQueueSender {
    /// Send a task, blocking only if a bounded queue is full
    pub fn send(&self, task: FileTask) -> Result<(), DiscoveryError> {
        let sender = self.sender.as_ref().ok_or(DiscoveryError::QueueClosed)?;
        sender.send(task).map_err(|_| DiscoveryError::QueueClosed)?;
        self.stats.enqueued.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    /// Finish discovery: no more tasks will be sent
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for WorkQueueSender {
    fn drop(&mut self) {
        self.status.mark_complete();
        // Disconnect after publishing so a closed channel implies a set flag
        self.sender.take();
    }
}

/// Handle for receiving tasks from the queue
#[derive(Clone)]
pub struct WorkQueueReceiver {
    receiver: Receiver<FileTask>,
    stats: Arc<QueueStats>,
}

impl WorkQueueReceiver {
    /// Receive a task from the queue
    ///
    /// Blocks until a task is available. Returns `None` once discovery has
    /// closed the queue and it is empty.
    pub fn recv(&self) -> Option<FileTask> {
        match self.receiver.recv() {
            Ok(task) => {
                self.stats.dequeued.fetch_add(1, Ordering::AcqRel);
                Some(task)
            }
            Err(_) => None,
        }
    }

    /// Try to receive a task without blocking
    pub fn try_recv(&self) -> Option<FileTask> {
        match self.receiver.try_recv() {
            Ok(task) => {
                self.stats.dequeued.fetch_add(1, Ordering::AcqRel);
                Some(task)
            }
            Err(_) => None,
        }
    }

    /// Mark the last dequeued task as finished
    fn finish_task(&self) {
        self.stats.finished.fetch_add(1, Ordering::AcqRel);
    }
}

/// RAII guard held for the duration of one unit of work
///
/// The task counts as finished when the guard drops, even if the unit of
/// work panicked.
pub struct WorkGuard<'a> {
    receiver: &'a WorkQueueReceiver,
}

impl<'a> WorkGuard<'a> {
    pub fn new(receiver: &'a WorkQueueReceiver) -> Self {
        Self { receiver }
    }
}

impl<'a> Drop for WorkGuard<'a> {
    fn drop(&mut self) {
        self.receiver.finish_task();
    }
}

//! Directory discovery
//!
//! Walks the root recursively on its own thread, matches file names against
//! the mode's glob, and feeds matches into the work queue. The walk is not
//! retried: the first I/O error ends discovery and is reported to the
//! coordinator as a run-level failure. Either way the queue sender is dropped
//! when discovery returns, so workers always see the queue close.

use crate::config::Mode;
use crate::error::{DiscoveryError, WorkerError};
use crate::sidecar::is_sidecar;
use crate::walker::queue::{FileTask, WorkQueueSender};
use crate::walker::stats::RunStats;
use globset::{Glob, GlobMatcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, trace};
use walkdir::WalkDir;

/// Recursive file finder for one run
#[derive(Debug, Clone)]
pub struct Discoverer {
    /// Directory to walk
    root: PathBuf,

    /// Compiled file name pattern
    matcher: GlobMatcher,

    /// Skip files that are themselves sidecars
    skip_sidecars: bool,
}

impl Discoverer {
    /// Build a discoverer for `mode` rooted at `root`
    pub fn new(root: impl Into<PathBuf>, mode: Mode) -> Result<Self, DiscoveryError> {
        let pattern = mode.pattern();
        let matcher = Glob::new(pattern)
            .map_err(|source| DiscoveryError::Pattern {
                pattern: pattern.to_string(),
                source,
            })?
            .compile_matcher();

        Ok(Self {
            root: root.into(),
            matcher,
            skip_sidecars: mode.skips_sidecars(),
        })
    }

    /// Whether a file at `path` should be queued
    pub fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        if self.skip_sidecars && is_sidecar(path) {
            return false;
        }
        self.matcher.is_match(name)
    }

    /// Walk the tree, queueing every match
    ///
    /// Consumes the sender; the queue is closed when this returns.
    /// Returns the number of files queued.
    pub fn run(&self, queue: WorkQueueSender, stats: &RunStats) -> Result<u64, DiscoveryError> {
        info!(root = %self.root.display(), pattern = %self.matcher.glob(), "Discovery starting");

        let mut queued = 0u64;

        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = entry.map_err(|source| {
                let path = source
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.root.clone());
                DiscoveryError::Walk { path, source }
            })?;

            if !entry.file_type().is_file() || !self.matches(entry.path()) {
                continue;
            }

            // Count before sending so a snapshot never sees finished > total
            stats.record_discovered();
            queue.send(FileTask::new(entry.into_path()))?;
            queued += 1;

            trace!(queued = queued, "File queued");
        }

        queue.close();

        info!(files = queued, "Discovery complete");
        Ok(queued)
    }

    /// Run discovery on a dedicated thread
    pub fn spawn(
        self,
        queue: WorkQueueSender,
        stats: Arc<RunStats>,
    ) -> Result<JoinHandle<Result<u64, DiscoveryError>>, WorkerError> {
        let name = "discovery".to_string();

        thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                let result = self.run(queue, &stats);
                if let Err(ref e) = result {
                    debug!(error = %e, "Discovery ended early");
                }
                result
            })
            .map_err(|e| WorkerError::SpawnFailed {
                name,
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::queue::WorkQueue;
    use std::fs;
    use tempfile::tempdir;

    fn drain(queue: &WorkQueue) -> Vec<PathBuf> {
        let receiver = queue.receiver();
        let mut paths = Vec::new();
        while let Some(task) = receiver.recv() {
            paths.push(task.path);
        }
        paths.sort();
        paths
    }

    #[test]
    fn test_matches_by_mode() {
        let create = Discoverer::new("/root", Mode::Create).unwrap();
        assert!(create.matches(Path::new("/root/a.txt")));
        assert!(create.matches(Path::new("/root/noext")));
        assert!(!create.matches(Path::new("/root/a.txt.meta")));

        let restore = Discoverer::new("/root", Mode::Restore).unwrap();
        assert!(restore.matches(Path::new("/root/a.txt.meta")));
        assert!(restore.matches(Path::new("/root/sub/b.meta")));
        assert!(!restore.matches(Path::new("/root/a.txt")));
        assert!(!restore.matches(Path::new("/root/a.metadata")));
    }

    #[test]
    fn test_discovers_nested_files() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b/c")).unwrap();
        fs::write(dir.path().join("top.txt"), b"1").unwrap();
        fs::write(dir.path().join("a/mid.txt"), b"2").unwrap();
        fs::write(dir.path().join("a/b/c/deep.txt"), b"3").unwrap();
        fs::write(dir.path().join("a/b/c/deep.txt.meta"), b"{}").unwrap();

        let (queue, sender) = WorkQueue::new(None);
        let stats = RunStats::new();
        let discoverer = Discoverer::new(dir.path(), Mode::Create).unwrap();

        let queued = discoverer.run(sender, &stats).unwrap();
        assert_eq!(queued, 3);
        assert_eq!(stats.total(), 3);
        assert!(queue.status().is_complete());

        let paths = drain(&queue);
        assert_eq!(
            paths,
            vec![
                dir.path().join("a/b/c/deep.txt"),
                dir.path().join("a/mid.txt"),
                dir.path().join("top.txt"),
            ]
        );
    }

    #[test]
    fn test_restore_discovers_only_sidecars() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("x.txt"), b"1").unwrap();
        fs::write(dir.path().join("x.txt.meta"), b"{}").unwrap();
        fs::write(dir.path().join("sub/y.meta"), b"{}").unwrap();

        let (queue, sender) = WorkQueue::new(None);
        let stats = RunStats::new();
        Discoverer::new(dir.path(), Mode::Restore)
            .unwrap()
            .run(sender, &stats)
            .unwrap();

        assert_eq!(
            drain(&queue),
            vec![dir.path().join("sub/y.meta"), dir.path().join("x.txt.meta")]
        );
    }

    #[test]
    fn test_missing_root_fails_and_closes_queue() {
        let dir = tempdir().unwrap();
        let (queue, sender) = WorkQueue::new(None);
        let stats = RunStats::new();

        let err = Discoverer::new(dir.path().join("nope"), Mode::Create)
            .unwrap()
            .run(sender, &stats)
            .unwrap_err();

        assert!(matches!(err, DiscoveryError::Walk { .. }));
        assert!(queue.status().is_complete());
        assert!(queue.receiver().recv().is_none());
    }

    #[test]
    fn test_directories_are_not_queued() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("folder.meta")).unwrap();

        let (queue, sender) = WorkQueue::new(None);
        let stats = RunStats::new();
        let queued = Discoverer::new(dir.path(), Mode::Restore)
            .unwrap()
            .run(sender, &stats)
            .unwrap();

        assert_eq!(queued, 0);
        assert!(drain(&queue).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_create_skips_symlinks_and_meta_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("real.txt"), b"1").unwrap();
        fs::write(dir.path().join("notes.meta"), b"user data").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("link")).unwrap();

        let (queue, sender) = WorkQueue::new(None);
        let stats = RunStats::new();
        let queued = Discoverer::new(dir.path(), Mode::Create)
            .unwrap()
            .run(sender, &stats)
            .unwrap();

        assert_eq!(queued, 1);
        assert_eq!(drain(&queue), vec![dir.path().join("real.txt")]);
    }
}

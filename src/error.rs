//! Error types for timestamp-sidecar
//!
//! Errors fall into two tiers:
//! - Run-level errors (`SidecarError`) abort the run and map to a failing exit code
//! - Per-file errors (`FileError`) are contained at the worker boundary and only
//!   increment the error counter
//!
//! Library code uses thiserror; the binary wraps these with anyhow context.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for a run
#[derive(Error, Debug)]
pub enum SidecarError {
    /// Root path missing or not a directory
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    /// Directory walk failed part way through
    #[error("Discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    /// Worker/concurrency errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    /// I/O errors outside of per-file processing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while enumerating the directory tree
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// The walker could not read a directory or entry
    #[error("Failed to walk '{path}': {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// The match pattern did not compile
    #[error("Invalid match pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// Every worker hung up before discovery finished
    #[error("Work queue closed before discovery finished")]
    QueueClosed,
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid worker count
    #[error("Invalid thread count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Invalid queue size
    #[error("Invalid queue size {size}: must be at least {min}")]
    InvalidQueueSize { size: usize, min: usize },
}

/// Worker thread errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Thread panicked
    #[error("Thread '{name}' panicked")]
    Panicked { name: String },

    /// Thread could not be started
    #[error("Failed to start thread '{name}': {reason}")]
    SpawnFailed { name: String, reason: String },
}

/// Failure processing one file or its sidecar
#[derive(Error, Debug)]
pub enum FileError {
    /// Could not read the source file's timestamps
    #[error("Failed to stat '{path}': {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not write the sidecar
    #[error("Failed to write sidecar '{path}': {source}")]
    WriteSidecar {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not read the sidecar
    #[error("Failed to read sidecar '{path}': {source}")]
    ReadSidecar {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Sidecar content is not a valid timestamp record
    #[error("Malformed sidecar '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Timestamp record could not be serialized
    #[error("Failed to encode timestamps for '{path}': {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Path handed to restore does not carry the sidecar suffix
    #[error("Not a sidecar file: '{path}'")]
    NotASidecar { path: PathBuf },

    /// The file the sidecar describes is gone
    #[error("Target file not found: '{path}'")]
    TargetMissing { path: PathBuf },

    /// Applying timestamps to the target failed
    #[error("Failed to set timestamps on '{path}': {source}")]
    ApplyTimes {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Removing the sidecar after a successful restore failed
    #[error("Failed to delete sidecar '{path}': {source}")]
    DeleteSidecar {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for SidecarError
pub type Result<T> = std::result::Result<T, SidecarError>;

/// Result type alias for FileError
pub type FileResult<T> = std::result::Result<T, FileError>;

/// Terminal outcome of one file
#[derive(Debug)]
pub enum FileOutcome {
    /// Unit of work succeeded
    Processed { path: PathBuf },

    /// Unit of work failed; counted, never retried
    Failed { path: PathBuf, error: FileError },
}

impl FileOutcome {
    /// Returns true if this outcome represents success
    pub fn is_success(&self) -> bool {
        matches!(self, FileOutcome::Processed { .. })
    }
}

impl From<(PathBuf, FileResult<()>)> for FileOutcome {
    fn from((path, result): (PathBuf, FileResult<()>)) -> Self {
        match result {
            Ok(()) => FileOutcome::Processed { path },
            Err(error) => FileOutcome::Failed { path, error },
        }
    }
}

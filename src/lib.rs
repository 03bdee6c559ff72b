//! timestamp-sidecar - File Timestamp Backup and Restore
//!
//! Saves the creation, last-write and last-access times of every file in a
//! directory tree into small `.meta` sidecar files next to each file, and
//! puts them back later.
//!
//! # Features
//!
//! - **Streaming Pipeline**: Discovery and processing overlap; workers start
//!   on the first file while the walk is still running.
//!
//! - **Parallel Workers**: A fixed pool of threads drains a shared crossbeam
//!   queue. Per-file failures are counted, never fatal.
//!
//! - **Exact Completion**: The discoverer closes the queue when the walk
//!   ends; workers exit on a closed, empty queue instead of polling flags.
//!
//! - **Safe Restore**: With `--delete`, a sidecar is removed only after all
//!   of its timestamps were applied.
//!
//! Only regular files are visited. Symbolic links are not followed or
//! processed, and create mode skips files whose names already end in `.meta`.
//!
//! # Sidecar format
//!
//! ```text
//! report.pdf.meta
//! {"c":"2021-03-04T05:06:07.123456789Z","w":"2021-03-04T05:06:07Z","a":"2024-01-01T00:00:00Z"}
//! ```
//!
//! # Example
//!
//! ```bash
//! # Save timestamps
//! timestamp-sidecar create --path /data/photos --threads 16
//!
//! # Put them back and clean up
//! timestamp-sidecar restore --path /data/photos --delete
//! ```

pub mod config;
pub mod error;
pub mod progress;
pub mod sidecar;
pub mod walker;

pub use config::{CliArgs, Mode, RunConfig};
pub use error::{FileError, FileOutcome, Result, SidecarError};
pub use sidecar::TimestampTriple;
pub use walker::{RunCoordinator, RunResult, RunStats};

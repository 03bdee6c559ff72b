//! Concurrent discovery and processing pipeline
//!
//! # Architecture
//!
//! ```text
//!                     ┌─────────────────────────┐
//!                     │       Discoverer        │
//!                     │  - walkdir + globset    │
//!                     │  - bumps `total`        │
//!                     └───────────┬─────────────┘
//!                                 │ FileTask
//!                     ┌───────────▼─────────────┐
//!                     │       Work Queue        │
//!                     │  (crossbeam channel,    │
//!                     │   closed by discoverer) │
//!                     └───────────┬─────────────┘
//!       ┌─────────────────────────┼─────────────────────────┐
//!       │                         │                         │
//! ┌─────▼─────┐             ┌─────▼─────┐             ┌─────▼─────┐
//! │  Worker 1 │             │  Worker 2 │             │  Worker N │
//! │  create / │             │  create / │             │  create / │
//! │  restore  │             │  restore  │             │  restore  │
//! └─────┬─────┘             └─────┬─────┘             └─────┬─────┘
//!       └────────────► RunStats (atomic counters) ◄─────────┘
//!                                 ▲
//!                        ProgressReporter (read-only)
//! ```

pub mod coordinator;
pub mod discovery;
pub mod queue;
pub mod stats;
pub mod worker;

pub use coordinator::{validate_root, RunCoordinator, RunResult};
pub use discovery::Discoverer;
pub use queue::{DiscoveryStatus, FileTask, WorkQueue};
pub use stats::{RunSnapshot, RunStats};
pub use worker::{process_file, Worker};

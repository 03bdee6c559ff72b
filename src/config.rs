//! Configuration types for timestamp-sidecar
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation
//! - The run mode and its discovery pattern

use crate::error::ConfigError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Maximum reasonable worker count
const MAX_WORKERS: usize = 512;

/// Minimum bounded queue size
const MIN_QUEUE_SIZE: usize = 1;

/// Default worker count
pub const DEFAULT_WORKERS: usize = 8;

/// Back up and restore file timestamps through .meta sidecar files
#[derive(Parser, Debug, Clone)]
#[command(
    name = "timestamp-sidecar",
    version,
    about = "Back up and restore file timestamps through .meta sidecar files",
    long_about = "Walks a directory tree and, for every file, writes a <file>.meta sidecar holding its\n\
                  creation, last-write and last-access times (create), or reads those sidecars back\n\
                  and re-applies the timestamps (restore).\n\n\
                  Only regular files are processed; symbolic links and special files are skipped.\n\
                  Create mode also skips files whose names end in .meta, so existing sidecars never\n\
                  get sidecars of their own.",
    after_help = "EXAMPLES:\n    \
        timestamp-sidecar create --path /data/photos\n    \
        timestamp-sidecar create -p /data/photos -t 16\n    \
        timestamp-sidecar restore --path /data/photos --delete\n    \
        timestamp-sidecar -q restore -p /data/photos  # per-file log lines instead of progress"
)]
pub struct CliArgs {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// Quiet mode - suppress the progress line and log each file instead
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Bound the work queue to NUM pending files (unbounded if not set)
    #[arg(long, global = true, value_name = "NUM")]
    pub queue_size: Option<usize>,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create file attributes metadata files
    Create(CommonArgs),

    /// Restore file attributes from metadata files
    Restore {
        #[command(flatten)]
        common: CommonArgs,

        /// Delete each metadata file after its timestamps were restored
        #[arg(short = 'd', long)]
        delete: bool,
    },
}

/// Arguments shared by both subcommands
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Folder to scan
    #[arg(short = 'p', long, value_name = "DIR")]
    pub path: PathBuf,

    /// Number of worker threads
    #[arg(short = 't', long, default_value_t = DEFAULT_WORKERS, value_name = "NUM")]
    pub threads: usize,
}

/// What a run does to each discovered file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Write a sidecar for every file
    Create,
    /// Apply every sidecar back onto its file
    Restore,
}

impl Mode {
    /// Filename pattern the discoverer matches in this mode
    pub fn pattern(self) -> &'static str {
        match self {
            Mode::Create => "*",
            Mode::Restore => "*.meta",
        }
    }

    /// Whether files that are themselves sidecars are skipped during discovery
    pub fn skips_sidecars(self) -> bool {
        matches!(self, Mode::Create)
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Mode::Create => "create",
            Mode::Restore => "restore",
        }
    }
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Create or restore
    pub mode: Mode,

    /// Directory tree to process
    pub root: PathBuf,

    /// Number of worker threads
    pub worker_count: usize,

    /// Delete sidecars after a successful restore
    pub delete_sidecar: bool,

    /// Work queue capacity (None = unbounded)
    pub queue_size: Option<usize>,

    /// Show the live progress line
    pub show_progress: bool,

    /// Verbose logging
    pub verbose: bool,
}

impl RunConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        let (mode, common, delete_sidecar) = match args.command {
            Command::Create(common) => (Mode::Create, common, false),
            Command::Restore { common, delete } => (Mode::Restore, common, delete),
        };

        // Validate worker count
        if common.threads == 0 || common.threads > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: common.threads,
                max: MAX_WORKERS,
            });
        }

        // Validate queue size
        if let Some(size) = args.queue_size {
            if size < MIN_QUEUE_SIZE {
                return Err(ConfigError::InvalidQueueSize {
                    size,
                    min: MIN_QUEUE_SIZE,
                });
            }
        }

        Ok(Self {
            mode,
            root: common.path,
            worker_count: common.threads,
            delete_sidecar,
            queue_size: args.queue_size,
            show_progress: !args.quiet,
            verbose: args.verbose,
        })
    }

    /// Configuration with defaults for the given mode and root
    pub fn new(mode: Mode, root: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            root: root.into(),
            worker_count: DEFAULT_WORKERS,
            delete_sidecar: false,
            queue_size: None,
            show_progress: false,
            verbose: false,
        }
    }

    /// Set the worker count
    pub fn workers(mut self, count: usize) -> Self {
        self.worker_count = count;
        self
    }

    /// Set the delete-after-restore flag
    pub fn delete_sidecar(mut self, delete: bool) -> Self {
        self.delete_sidecar = delete;
        self
    }

    /// Bound the work queue
    pub fn queue_size(mut self, size: Option<usize>) -> Self {
        self.queue_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_parse_create_defaults() {
        let config = RunConfig::from_args(parse(&["ts", "create", "--path", "/data"])).unwrap();
        assert_eq!(config.mode, Mode::Create);
        assert_eq!(config.root, PathBuf::from("/data"));
        assert_eq!(config.worker_count, DEFAULT_WORKERS);
        assert!(!config.delete_sidecar);
        assert!(config.show_progress);
        assert_eq!(config.queue_size, None);
    }

    #[test]
    fn test_parse_restore_short_flags() {
        let config =
            RunConfig::from_args(parse(&["ts", "restore", "-p", "/data", "-d", "-t", "3", "-q"]))
                .unwrap();
        assert_eq!(config.mode, Mode::Restore);
        assert!(config.delete_sidecar);
        assert_eq!(config.worker_count, 3);
        assert!(!config.show_progress);
    }

    #[test]
    fn test_path_is_required() {
        assert!(CliArgs::try_parse_from(["ts", "create"]).is_err());
        assert!(CliArgs::try_parse_from(["ts"]).is_err());
    }

    #[test]
    fn test_delete_only_on_restore() {
        assert!(CliArgs::try_parse_from(["ts", "create", "-p", "/d", "--delete"]).is_err());
    }

    #[test]
    fn test_invalid_worker_count() {
        let err = RunConfig::from_args(parse(&["ts", "create", "-p", "/d", "-t", "0"])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWorkerCount { count: 0, .. }));

        let err =
            RunConfig::from_args(parse(&["ts", "create", "-p", "/d", "-t", "513"])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWorkerCount { count: 513, .. }));
    }

    #[test]
    fn test_invalid_queue_size() {
        let err = RunConfig::from_args(parse(&["ts", "--queue-size", "0", "create", "-p", "/d"]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidQueueSize { size: 0, .. }));
    }

    #[test]
    fn test_long_help_states_exclusions() {
        use clap::CommandFactory;

        let help = CliArgs::command().render_long_help().to_string();
        assert!(help.contains("symbolic links"), "{help}");
        assert!(help.contains("names end in .meta"), "{help}");
    }

    #[test]
    fn test_mode_patterns() {
        assert_eq!(Mode::Create.pattern(), "*");
        assert_eq!(Mode::Restore.pattern(), "*.meta");
        assert!(Mode::Create.skips_sidecars());
        assert!(!Mode::Restore.skips_sidecars());
    }
}

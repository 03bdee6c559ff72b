//! Progress reporting for a run
//!
//! The reporter thread wakes once a second and redraws a single status line
//! in place using an indicatif bar. Nothing is drawn until discovery has
//! found at least one file. The loop ends when the worker pool's `done`
//! channel disconnects; a last snapshot is then drawn and the line is left
//! on screen.

use crate::config::RunConfig;
use crate::error::WorkerError;
use crate::walker::{RunResult, RunSnapshot, RunStats};
use chrono::{DateTime, Local, Utc};
use console::style;
use crossbeam_channel::{select, tick, Receiver};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Redraw interval
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Progress reporter that displays run status
pub struct ProgressReporter {
    /// Shared counters
    stats: Arc<RunStats>,

    /// Run start, for elapsed time
    started: Instant,

    /// Status line, created on the first non-empty snapshot
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new(stats: Arc<RunStats>, started: Instant) -> Self {
        Self {
            stats,
            started,
            bar: None,
        }
    }

    /// Run the reporter on its own thread until `done` disconnects
    pub fn spawn(self, done: Receiver<()>) -> Result<JoinHandle<()>, WorkerError> {
        let name = "progress".to_string();

        thread::Builder::new()
            .name(name.clone())
            .spawn(move || self.run(done))
            .map_err(|e| WorkerError::SpawnFailed {
                name,
                reason: e.to_string(),
            })
    }

    fn run(mut self, done: Receiver<()>) {
        let ticker = tick(TICK_INTERVAL);

        loop {
            select! {
                recv(ticker) -> _ => self.update(),
                recv(done) -> _ => break,
            }
        }

        self.update();
        self.finish();
    }

    /// Redraw the status line from the current counters
    pub fn update(&mut self) {
        let snapshot = self.stats.snapshot();
        if snapshot.total == 0 {
            return;
        }

        let line = format_status(&snapshot, self.started.elapsed());
        self.bar.get_or_insert_with(new_bar).set_message(line);
    }

    /// Leave the final line on screen, followed by a newline
    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.abandon();
        }
    }
}

fn new_bar() -> ProgressBar {
    let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stdout());

    bar.set_style(
        ProgressStyle::with_template("{msg}")
            .expect("Invalid progress template"),
    );

    bar
}

/// Render one status line
pub fn format_status(snapshot: &RunSnapshot, elapsed: Duration) -> String {
    format!(
        "total: {}  processed: {}  error: {}  remaining: {}  percent: {:05.2}%  elapsed: {}",
        snapshot.total,
        snapshot.processed,
        snapshot.errored,
        snapshot.remaining(),
        snapshot.percent_complete(),
        format_elapsed(elapsed),
    )
}

/// Format a duration as hh:mm:ss
fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| {
            chunk
                .iter()
                .rev()
                .map(|&b| b as char)
                .collect::<String>()
        })
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

/// The closing line of every run
pub fn summary_line(processed: u64, total: u64) -> String {
    format!("{} / {} complete!", processed, total)
}

/// Wall-clock time in the local zone, as shown in the header and summary
fn format_local(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Print a summary of the run
pub fn print_summary(result: &RunResult) {
    println!();
    println!(
        "  {} {}",
        style("Done:").bold(),
        format_local(result.finished_at)
    );
    println!(
        "  {} {:.1}s",
        style("Duration:").bold(),
        result.duration.as_secs_f64()
    );
    if result.errored > 0 {
        println!(
            "  {} {}",
            style("Errors:").yellow().bold(),
            format_number(result.errored)
        );
    }
    println!("{}", style("─".repeat(50)).dim());

    let line = summary_line(result.processed, result.total);
    if result.is_success() {
        println!("{}", style(line).green().bold());
    } else {
        println!("{}", style(line).yellow().bold());
    }
}

/// Print a header at the start of the run
pub fn print_header(config: &RunConfig, started_at: DateTime<Utc>) {
    println!();
    println!(
        "{} {}",
        style("timestamp-sidecar").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Mode:").bold(), config.mode.name());
    println!("  {} {}", style("Path:").bold(), config.root.display());
    println!("  {} {}", style("Workers:").bold(), config.worker_count);
    if config.delete_sidecar {
        println!("  {} yes", style("Delete sidecars:").bold());
    }
    println!("  {} {}", style("Starting:").bold(), format_local(started_at));
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "00:00:00");
        assert_eq!(format_elapsed(Duration::from_secs(61)), "00:01:01");
        assert_eq!(format_elapsed(Duration::from_secs(3 * 3600 + 25 * 60 + 7)), "03:25:07");
        assert_eq!(format_elapsed(Duration::from_millis(1999)), "00:00:01");
    }

    #[test]
    fn test_format_status() {
        let snapshot = RunSnapshot {
            total: 200,
            processed: 150,
            errored: 3,
        };
        assert_eq!(
            format_status(&snapshot, Duration::from_secs(75)),
            "total: 200  processed: 150  error: 3  remaining: 47  percent: 76.50%  elapsed: 00:01:15"
        );
    }

    #[test]
    fn test_format_status_pads_percent() {
        let snapshot = RunSnapshot {
            total: 1000,
            processed: 5,
            errored: 0,
        };
        let line = format_status(&snapshot, Duration::ZERO);
        assert!(line.contains("percent: 00.50%"), "{line}");

        let done = RunSnapshot {
            total: 4,
            processed: 4,
            errored: 0,
        };
        assert!(format_status(&done, Duration::ZERO).contains("percent: 100.00%"));
    }

    #[test]
    fn test_format_local() {
        let time = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let expected = time.with_timezone(&Local).naive_local().to_string();
        assert_eq!(format_local(time), expected);
        assert_eq!(format_local(time).len(), "2023-11-14 22:13:20".len());
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(summary_line(0, 0), "0 / 0 complete!");
        assert_eq!(summary_line(9, 10), "9 / 10 complete!");
    }

    #[test]
    fn test_reporter_draws_nothing_for_empty_run() {
        let stats = Arc::new(RunStats::new());
        let mut reporter = ProgressReporter::new(stats, Instant::now());
        reporter.update();
        assert!(reporter.bar.is_none());
    }

    #[test]
    fn test_reporter_stops_when_done_disconnects() {
        let stats = Arc::new(RunStats::new());
        let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(0);
        let handle = ProgressReporter::new(stats, Instant::now())
            .spawn(done_rx)
            .unwrap();

        drop(done_tx);
        handle.join().unwrap();
    }
}

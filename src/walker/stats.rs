//! Shared run counters
//!
//! One `RunStats` value is shared by `Arc` between the discoverer, the
//! workers and the progress reporter. Every counter only ever grows, and each
//! file bumps exactly one of them once: `total` when discovered, then
//! `processed` or `errored` when its unit of work finishes.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one run
#[derive(Debug, Default)]
pub struct RunStats {
    /// Files discovered
    total: AtomicU64,

    /// Files whose unit of work succeeded
    processed: AtomicU64,

    /// Files whose unit of work failed
    errored: AtomicU64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_discovered(&self) {
        self.total.fetch_add(1, Ordering::Release);
    }

    pub(crate) fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::Release);
    }

    pub(crate) fn record_error(&self) {
        self.errored.fetch_add(1, Ordering::Release);
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Acquire)
    }

    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Acquire)
    }

    pub fn errored(&self) -> u64 {
        self.errored.load(Ordering::Acquire)
    }

    /// Best-effort view of all three counters
    ///
    /// Outcomes are read before `total` so a snapshot never shows more
    /// finished files than discovered ones.
    pub fn snapshot(&self) -> RunSnapshot {
        let errored = self.errored();
        let processed = self.processed();
        let total = self.total();

        RunSnapshot {
            total,
            processed,
            errored,
        }
    }
}

/// Point-in-time copy of the run counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSnapshot {
    pub total: u64,
    pub processed: u64,
    pub errored: u64,
}

impl RunSnapshot {
    /// Files with a terminal outcome
    pub fn finished(&self) -> u64 {
        self.processed + self.errored
    }

    /// Files discovered but not yet finished
    pub fn remaining(&self) -> u64 {
        self.total.saturating_sub(self.finished())
    }

    /// Percent of discovered files finished, rounded to 2 decimal places
    pub fn percent_complete(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let percent = self.finished() as f64 / self.total as f64 * 100.0;
        (percent * 100.0).round() / 100.0
    }

    /// Every discovered file reached a terminal outcome
    pub fn is_balanced(&self) -> bool {
        self.total == self.finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_stats() {
        let stats = RunStats::new();

        stats.record_discovered();
        stats.record_discovered();
        stats.record_discovered();
        stats.record_processed();
        stats.record_error();

        let snap = stats.snapshot();
        assert_eq!(snap.total, 3);
        assert_eq!(snap.processed, 1);
        assert_eq!(snap.errored, 1);
        assert_eq!(snap.remaining(), 1);
        assert!(!snap.is_balanced());

        stats.record_processed();
        assert!(stats.snapshot().is_balanced());
    }

    #[test]
    fn test_percent_complete() {
        let snap = RunSnapshot {
            total: 3,
            processed: 1,
            errored: 0,
        };
        assert_eq!(snap.percent_complete(), 33.33);

        let snap = RunSnapshot {
            total: 3,
            processed: 1,
            errored: 1,
        };
        assert_eq!(snap.percent_complete(), 66.67);

        assert_eq!(RunSnapshot::default().percent_complete(), 0.0);
    }

    #[test]
    fn test_remaining_never_underflows() {
        // Independent reads can momentarily disagree
        let snap = RunSnapshot {
            total: 1,
            processed: 2,
            errored: 0,
        };
        assert_eq!(snap.remaining(), 0);
    }
}

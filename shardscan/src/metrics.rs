use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::info;

/// Run-wide counters shared by all workers
#[derive(Debug)]
pub struct ScanMetrics {
    started: Instant,
    files_scanned: AtomicU64,
    files_skipped: AtomicU64,
    lines_scanned: AtomicU64,
    matches_found: AtomicU64,
    workers_started: AtomicU64,
}

impl ScanMetrics {
    /// Creates a new ScanMetrics instance; the run clock starts now
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            files_scanned: AtomicU64::new(0),
            files_skipped: AtomicU64::new(0),
            lines_scanned: AtomicU64::new(0),
            matches_found: AtomicU64::new(0),
            workers_started: AtomicU64::new(0),
        }
    }

    /// Records a file that was read to the end
    pub fn record_file_scanned(&self) {
        self.files_scanned.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a file that was missing or abandoned part-way
    pub fn record_file_skipped(&self) {
        self.files_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Records lines read and matches recorded for one file
    pub fn record_lines(&self, lines: u64, matches: u64) {
        self.lines_scanned.fetch_add(lines, Ordering::Relaxed);
        self.matches_found.fetch_add(matches, Ordering::Relaxed);
    }

    /// Records a worker starting on its shard
    pub fn record_worker_started(&self) {
        self.workers_started.fetch_add(1, Ordering::Relaxed);
    }

    /// Gets a snapshot of the counters and the time elapsed so far
    pub fn get_stats(&self) -> ScanStats {
        ScanStats {
            files_scanned: self.files_scanned.load(Ordering::Relaxed),
            files_skipped: self.files_skipped.load(Ordering::Relaxed),
            lines_scanned: self.lines_scanned.load(Ordering::Relaxed),
            total_matches: self.matches_found.load(Ordering::Relaxed),
            workers_started: self.workers_started.load(Ordering::Relaxed),
            elapsed: self.started.elapsed(),
        }
    }

    /// Logs the current counters
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Scan stats:\n\
             Workers started: {}\n\
             Files scanned/skipped: {}/{}\n\
             Lines scanned: {}\n\
             Matches: {}\n\
             Elapsed: {:.3}s",
            stats.workers_started,
            stats.files_scanned,
            stats.files_skipped,
            stats.lines_scanned,
            stats.total_matches,
            stats.elapsed.as_secs_f64()
        );
    }
}

impl Default for ScanMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of the counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub files_scanned: u64,
    pub files_skipped: u64,
    pub lines_scanned: u64,
    pub total_matches: u64,
    pub workers_started: u64,
    /// Wall-clock time from the start of the run to the snapshot
    #[serde(default)]
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_tracking() {
        let metrics = ScanMetrics::new();

        metrics.record_file_scanned();
        metrics.record_file_scanned();
        metrics.record_file_skipped();

        let stats = metrics.get_stats();
        assert_eq!(stats.files_scanned, 2);
        assert_eq!(stats.files_skipped, 1);
    }

    #[test]
    fn test_line_and_match_tracking() {
        let metrics = ScanMetrics::new();

        metrics.record_lines(10, 3);
        metrics.record_lines(5, 0);

        let stats = metrics.get_stats();
        assert_eq!(stats.lines_scanned, 15);
        assert_eq!(stats.total_matches, 3);
    }

    #[test]
    fn test_elapsed_time_advances() {
        let metrics = ScanMetrics::new();
        std::thread::sleep(Duration::from_millis(5));

        let first = metrics.get_stats().elapsed;
        assert!(first >= Duration::from_millis(5));
        assert!(metrics.get_stats().elapsed >= first);
    }

    #[test]
    fn test_concurrent_updates() {
        let metrics = ScanMetrics::new();

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..100 {
                        metrics.record_lines(1, 1);
                    }
                });
            }
        });

        let stats = metrics.get_stats();
        assert_eq!(stats.lines_scanned, 400);
        assert_eq!(stats.total_matches, 400);
    }
}

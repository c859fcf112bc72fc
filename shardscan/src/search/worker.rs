use std::path::PathBuf;
use tracing::{debug, error, info_span, warn};

use super::scanner::{FileScan, LineScanner};
use crate::errors::SearchResult;
use crate::metrics::ScanMetrics;
use crate::results::{LocalResults, SharedResults};

/// What one worker did with its shard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub id: usize,
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub matches: usize,
}

/// Scans one shard into private results and merges them into the shared store once
#[derive(Debug)]
pub struct Worker<'a> {
    id: usize,
    scanner: LineScanner<'a>,
    metrics: &'a ScanMetrics,
}

impl<'a> Worker<'a> {
    pub fn new(id: usize, scanner: LineScanner<'a>, metrics: &'a ScanMetrics) -> Self {
        Self {
            id,
            scanner,
            metrics,
        }
    }

    /// Scans every file in `shard`, then merges into `shared`.
    ///
    /// File-level failures are logged and skipped; only a failed merge is returned.
    pub fn run(&self, shard: &[PathBuf], shared: &SharedResults) -> SearchResult<WorkerReport> {
        let span = info_span!("worker", id = self.id);
        let _enter = span.enter();

        self.metrics.record_worker_started();
        debug!("Searching {} files", shard.len());

        let mut local = LocalResults::new();
        let mut report = WorkerReport {
            id: self.id,
            ..WorkerReport::default()
        };

        for path in shard {
            let mut scan = FileScan::default();
            let outcome = self.scanner.scan_file(path, &mut local, &mut scan);
            self.metrics.record_lines(scan.lines, scan.matches);

            match outcome {
                Ok(()) => {
                    report.files_scanned += 1;
                    self.metrics.record_file_scanned();
                }
                Err(e) if e.is_access_error() => {
                    report.files_skipped += 1;
                    self.metrics.record_file_skipped();
                    warn!("Skipping file: {}", e);
                }
                Err(e) => {
                    report.files_skipped += 1;
                    self.metrics.record_file_skipped();
                    error!("Error processing file: {}", e);
                }
            }
        }

        report.matches = local.match_count();
        shared.merge(local)?;

        debug!(
            "Merged {} matches ({} files scanned, {} skipped)",
            report.matches, report.files_scanned, report.files_skipped
        );
        Ok(report)
    }
}

use rayon::prelude::*;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::{debug, info};

use super::scanner::LineScanner;
use super::shard::shard_files;
use super::worker::{Worker, WorkerReport};
use crate::config::{EncodingMode, SearchConfig};
use crate::errors::{SearchError, SearchResult};
use crate::metrics::ScanMetrics;
use crate::results::{KeywordHits, SearchOutput, SharedResults};
use crate::workspace::collect_files;

/// Runs a search described by `config`.
///
/// The scan list is `config.files` followed by the files found under `config.root_path`, if one
/// is set.
pub fn search(config: &SearchConfig) -> SearchResult<SearchOutput> {
    let mut files = config.files.clone();
    if let Some(root) = &config.root_path {
        let collected = collect_files(root, &config.file_extensions, &config.ignore_patterns)?;
        debug!("Collected {} files from {}", collected.len(), root.display());
        files.extend(collected);
    }

    search_shards(
        &files,
        &config.keywords,
        config.worker_count,
        config.encoding_mode,
    )
}

/// Searches `files` for `keywords` with `workers` concurrent workers.
///
/// Returns keyword to matching files, one entry per matching line. Keywords that match nothing
/// are absent. A worker count of zero is a configuration error.
pub fn search_files(
    files: &[PathBuf],
    keywords: &[String],
    workers: usize,
) -> SearchResult<KeywordHits> {
    let workers = NonZeroUsize::new(workers)
        .ok_or_else(|| SearchError::config_error("worker count must be at least 1"))?;
    search_shards(files, keywords, workers, EncodingMode::default()).map(SearchOutput::into_hits)
}

/// Shards `files`, runs one worker per non-empty shard and waits for all of them to merge
pub fn search_shards(
    files: &[PathBuf],
    keywords: &[String],
    workers: NonZeroUsize,
    encoding_mode: EncodingMode,
) -> SearchResult<SearchOutput> {
    info!(
        "Starting search for {} keywords in {} files with {} workers",
        keywords.len(),
        files.len(),
        workers
    );
    let metrics = ScanMetrics::new();

    if files.is_empty() || keywords.is_empty() {
        debug!("No files or no keywords provided, returning empty result");
        return Ok(SearchOutput::with_hits(KeywordHits::new(), metrics.get_stats()));
    }

    let shards: Vec<(usize, &[PathBuf])> = shard_files(files, workers)
        .into_iter()
        .enumerate()
        .filter(|(_, shard)| !shard.is_empty())
        .collect();
    debug!(
        "Planned {} non-empty shards ({} skipped)",
        shards.len(),
        workers.get() - shards.len()
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(shards.len())
        .thread_name(|i| format!("shardscan-worker-{}", i))
        .build()
        .map_err(|e| SearchError::ThreadPool(e.to_string()))?;

    let shared = SharedResults::new();
    let scanner = LineScanner::new(keywords, encoding_mode);

    let reports: Vec<WorkerReport> = pool.install(|| {
        shards
            .par_iter()
            .map(|&(id, shard)| Worker::new(id, scanner, &metrics).run(shard, &shared))
            .collect::<SearchResult<Vec<_>>>()
    })?;

    for report in &reports {
        debug!(
            "Worker {} finished: {} files scanned, {} skipped, {} matches",
            report.id, report.files_scanned, report.files_skipped, report.matches
        );
    }

    let hits = shared.into_inner()?;
    metrics.log_stats();
    let output = SearchOutput::with_hits(hits, metrics.get_stats());

    info!(
        "Search complete. Found {} matches for {} of {} keywords",
        output.total_matches(),
        output.hits.len(),
        keywords.len()
    );

    Ok(output)
}

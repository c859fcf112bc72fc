/// Result types for a keyword search.
///
/// Matches flow through two maps with the same shape, keyword to the list of files it was seen
/// in, one entry per matching line:
///
/// - [`LocalResults`] is owned by a single worker and grows without any locking while the worker
///   scans its shard.
/// - [`SharedResults`] is the one store every worker writes to. Each worker touches it exactly
///   once, in [`SharedResults::merge`], which moves its whole local map in under the lock.
///
/// Once every worker has merged, the orchestrator takes the map out with
/// [`SharedResults::into_inner`]; the store is consumed, so nothing can mutate it afterwards.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::trace;

use crate::errors::{SearchError, SearchResult};
use crate::metrics::ScanStats;

/// Keyword to matching files, one entry per matching line
pub type KeywordHits = HashMap<String, Vec<PathBuf>>;

/// Matches found by one worker, private to that worker until it merges
#[derive(Debug, Default)]
pub struct LocalResults {
    hits: KeywordHits,
}

impl LocalResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `path` to the list for `keyword`
    pub fn record(&mut self, keyword: &str, path: &Path) {
        match self.hits.get_mut(keyword) {
            Some(files) => files.push(path.to_path_buf()),
            None => {
                self.hits
                    .insert(keyword.to_string(), vec![path.to_path_buf()]);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Total number of recorded matches across all keywords
    pub fn match_count(&self) -> usize {
        self.hits.values().map(Vec::len).sum()
    }

    pub fn get(&self, keyword: &str) -> Option<&[PathBuf]> {
        self.hits.get(keyword).map(Vec::as_slice)
    }
}

/// The lock-protected store all workers merge into
#[derive(Debug, Default)]
pub struct SharedResults {
    inner: Mutex<KeywordHits>,
}

impl SharedResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves a worker's local matches into the store.
    ///
    /// The lock is held for one bulk copy and released when the guard drops, whether the copy
    /// finishes or unwinds.
    pub fn merge(&self, local: LocalResults) -> SearchResult<()> {
        if local.is_empty() {
            return Ok(());
        }

        let mut shared = self.inner.lock().map_err(|_| SearchError::LockPoisoned)?;
        for (keyword, mut files) in local.hits {
            trace!("Merging {} matches for '{}'", files.len(), keyword);
            shared.entry(keyword).or_default().append(&mut files);
        }
        Ok(())
    }

    /// Consumes the store once all workers are done
    pub fn into_inner(self) -> SearchResult<KeywordHits> {
        self.inner.into_inner().map_err(|_| SearchError::LockPoisoned)
    }
}

/// The outcome of a search run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchOutput {
    /// Keyword to matching files; keywords without matches are absent
    pub hits: KeywordHits,
    /// Counters collected while scanning
    pub stats: ScanStats,
}

impl SearchOutput {
    /// Creates a new empty search result
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_hits(hits: KeywordHits, stats: ScanStats) -> Self {
        Self { hits, stats }
    }

    /// Files recorded for `keyword`, one entry per matching line
    pub fn files_for(&self, keyword: &str) -> &[PathBuf] {
        self.hits.get(keyword).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of matching lines for `keyword`
    pub fn match_count(&self, keyword: &str) -> usize {
        self.files_for(keyword).len()
    }

    /// Total number of matching lines across all keywords
    pub fn total_matches(&self) -> usize {
        self.hits.values().map(Vec::len).sum()
    }

    /// Number of distinct files with at least one match
    pub fn files_with_matches(&self) -> usize {
        let mut files: Vec<&PathBuf> = self.hits.values().flatten().collect();
        files.sort();
        files.dedup();
        files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Keywords and their files in sorted order, for stable display
    pub fn sorted(&self) -> Vec<(&str, Vec<&Path>)> {
        let mut entries: Vec<(&str, Vec<&Path>)> = self
            .hits
            .iter()
            .map(|(keyword, files)| {
                let mut files: Vec<&Path> = files.iter().map(PathBuf::as_path).collect();
                files.sort();
                (keyword.as_str(), files)
            })
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn into_hits(self) -> KeywordHits {
        self.hits
    }
}

/// Filters applied to files collected from a directory.
///
/// Files given explicitly are always scanned; these filters only decide which files found
/// under a search root are added to the scan list.
use glob::Pattern;
use std::path::Path;
use tracing::debug;

use crate::errors::{SearchError, SearchResult};

// Extensions that are never worth scanning line by line
const BINARY_EXTENSIONS: &[&str] = &[
    "exe", "dll", "so", "dylib", "bin", "obj", "o", "class", "jar", "war", "ear", "png", "jpg",
    "jpeg", "gif", "bmp", "ico", "pdf", "doc", "docx", "xls", "xlsx", "zip", "tar", "gz", "7z",
    "rar",
];

/// Checks if a file's extension is in the allowed list (case-insensitive)
pub fn has_valid_extension(path: &Path, extensions: &Option<Vec<String>>) -> bool {
    let Some(exts) = extensions else {
        return true;
    };
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| exts.iter().any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext)))
}

/// Checks if a file is likely to be binary based on its extension
pub fn is_likely_binary(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            BINARY_EXTENSIONS
                .iter()
                .any(|bin_ext| bin_ext.eq_ignore_ascii_case(ext))
        })
}

/// Compiled extension and ignore-pattern filter
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    extensions: Option<Vec<String>>,
    ignore: Vec<Pattern>,
}

impl FileFilter {
    /// Compiles the ignore patterns, rejecting any that are not valid globs
    pub fn new(extensions: &Option<Vec<String>>, ignore_patterns: &[String]) -> SearchResult<Self> {
        let ignore = ignore_patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|e| {
                    SearchError::config_error(format!("Invalid ignore pattern '{}': {}", pattern, e))
                })
            })
            .collect::<SearchResult<Vec<_>>>()?;

        Ok(Self {
            extensions: extensions.clone(),
            ignore,
        })
    }

    /// Checks `path`, or its path relative to the search root, against the ignore patterns
    pub fn is_ignored(&self, path: &Path, relative: Option<&Path>) -> bool {
        let matches = |p: &Path| {
            let normalized = p.to_string_lossy().replace('\\', "/");
            self.ignore.iter().any(|pattern| pattern.matches(&normalized))
        };
        matches(path) || relative.is_some_and(matches)
    }

    /// Determines if a collected file should be scanned
    pub fn should_include(&self, path: &Path, relative: Option<&Path>) -> bool {
        if is_likely_binary(path) {
            debug!("Skipping likely binary file: {}", path.display());
            return false;
        }
        has_valid_extension(path, &self.extensions) && !self.is_ignored(path, relative)
    }
}

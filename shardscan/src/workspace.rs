use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::errors::{SearchError, SearchResult};
use crate::filters::FileFilter;

/// Collects the files under `root` to add to the scan list.
///
/// Hidden files and anything matched by `.gitignore`/`.ignore` are skipped, as are likely
/// binaries, files whose extension is not in `extensions` and files matching `ignore_patterns`.
/// Paths are returned sorted so that sharding the same tree is repeatable.
pub fn collect_files(
    root: &Path,
    extensions: &Option<Vec<String>>,
    ignore_patterns: &[String],
) -> SearchResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(SearchError::config_error(format!(
            "Search root is not a directory: {}",
            root.display()
        )));
    }

    let filter = FileFilter::new(extensions, ignore_patterns)?;

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .standard_filters(true)
        .require_git(false);

    debug!("Scanning directory: {}", root.display());
    let mut files: Vec<PathBuf> = builder
        .build()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .filter(|entry| {
            let path = entry.path();
            filter.should_include(path, path.strip_prefix(root).ok())
        })
        .map(|entry| {
            trace!("Adding file: {}", entry.path().display());
            entry.into_path()
        })
        .collect();

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_collect_files_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::create_dir_all(dir.path().join("build")).unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("sub/c.txt"), "c").unwrap();
        fs::write(dir.path().join("sub/d.rs"), "d").unwrap();
        fs::write(dir.path().join("build/e.txt"), "e").unwrap();
        fs::write(dir.path().join("image.png"), "png").unwrap();

        let files = collect_files(
            dir.path(),
            &Some(vec!["txt".to_string(), "png".to_string()]),
            &["build/**".to_string()],
        )
        .unwrap();

        assert_eq!(
            files,
            vec![
                dir.path().join("a.txt"),
                dir.path().join("b.txt"),
                dir.path().join("sub/c.txt"),
            ]
        );
    }

    #[test]
    fn test_hidden_files_skipped() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".secret.txt"), "x").unwrap();
        fs::write(dir.path().join("visible.txt"), "x").unwrap();

        let files = collect_files(dir.path(), &None, &[]).unwrap();
        assert_eq!(files, vec![dir.path().join("visible.txt")]);
    }

    #[test]
    fn test_missing_root_is_config_error() {
        let dir = tempdir().unwrap();
        let err = collect_files(&dir.path().join("nope"), &None, &[]).unwrap_err();
        assert!(matches!(err, SearchError::ConfigError(_)));
    }
}

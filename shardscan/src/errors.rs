/// Error types for shardscan.
///
/// Errors fall into two groups. File-level errors (`FileNotFound`, `PermissionDenied`,
/// `ReadError`, `EncodingError`) are produced by the line scanner and absorbed by the
/// worker that hit them: the worker logs the error and moves on to its next file, so they never
/// reach the caller of [`crate::search()`]. Run-level errors (`ConfigError`, `LockPoisoned`,
/// `ThreadPool`) abort the search and are returned to the caller.
///
/// ```rust,ignore
/// match shardscan::search_files(&files, &keywords, 0) {
///     Ok(hits) => // Process hits,
///     Err(SearchError::ConfigError(msg)) => // Zero workers requested,
///     Err(e) => // Fatal failure
/// }
/// ```
use std::path::PathBuf;
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur during search operations
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid UTF-8 in file {path}: {source}")]
    EncodingError {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Shared result store lock was poisoned")]
    LockPoisoned,
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(String),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl SearchError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    pub fn encoding_error(path: impl Into<PathBuf>, source: std::string::FromUtf8Error) -> Self {
        Self::EncodingError {
            path: path.into(),
            source,
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Maps an error from opening a file onto the file access variants.
    pub fn from_open(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::file_not_found(path),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::read_error(path, err),
        }
    }

    /// True for errors raised because a file could not be opened at all.
    pub fn is_access_error(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::PermissionDenied(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::Path;

    #[test]
    fn test_error_creation() {
        let path = Path::new("test.txt");
        let err = SearchError::file_not_found(path);
        assert!(matches!(err, SearchError::FileNotFound(_)));

        let err = SearchError::permission_denied(path);
        assert!(matches!(err, SearchError::PermissionDenied(_)));

        let err = SearchError::read_error(path, io::Error::new(io::ErrorKind::Other, "boom"));
        assert!(matches!(err, SearchError::ReadError { .. }));

        let err = SearchError::config_error("zero workers");
        assert!(matches!(err, SearchError::ConfigError(_)));
    }

    #[test]
    fn test_from_open_classification() {
        let path = Path::new("missing.txt");

        let err = SearchError::from_open(path, io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, SearchError::FileNotFound(_)));
        assert!(err.is_access_error());

        let err = SearchError::from_open(path, io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, SearchError::PermissionDenied(_)));
        assert!(err.is_access_error());

        let err = SearchError::from_open(path, io::Error::from(io::ErrorKind::InvalidData));
        assert!(matches!(err, SearchError::ReadError { .. }));
        assert!(!err.is_access_error());
    }

    #[test]
    fn test_error_messages() {
        let err = SearchError::config_error("worker count must be at least 1");
        assert_eq!(
            err.to_string(),
            "Configuration error: worker count must be at least 1"
        );

        let err = SearchError::file_not_found("test.txt");
        assert_eq!(err.to_string(), "File not found: test.txt");

        let err = SearchError::read_error(
            "data.txt",
            io::Error::new(io::ErrorKind::Other, "device gone"),
        );
        assert_eq!(err.to_string(), "Failed to read data.txt: device gone");
    }
}

use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::errors::SearchError;

/// Number of workers used when nothing else is configured
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// How the line scanner treats bytes that are not valid UTF-8
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingMode {
    /// Drop invalid byte sequences and keep scanning the line
    #[default]
    Ignore,
    /// Replace invalid byte sequences with U+FFFD
    Lossy,
    /// Stop scanning the file at the first invalid line
    FailFast,
}

impl FromStr for EncodingMode {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ignore" => Ok(EncodingMode::Ignore),
            "lossy" => Ok(EncodingMode::Lossy),
            "failfast" | "fail-fast" => Ok(EncodingMode::FailFast),
            other => Err(SearchError::config_error(format!(
                "Unknown encoding mode '{}' (expected ignore, lossy or failfast)",
                other
            ))),
        }
    }
}

impl From<ConfigError> for SearchError {
    fn from(err: ConfigError) -> Self {
        SearchError::config_error(err.to_string())
    }
}

impl fmt::Display for EncodingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EncodingMode::Ignore => "ignore",
            EncodingMode::Lossy => "lossy",
            EncodingMode::FailFast => "failfast",
        };
        f.write_str(name)
    }
}

/// Configuration for a keyword search run.
///
/// # Configuration Locations
///
/// Sources are layered in increasing order of precedence:
/// 1. Global `$CONFIG_DIR/shardscan/config.yaml`
/// 2. Local `.shardscan.yaml` in the current directory
/// 3. Custom config file specified via `--config`
///
/// Command-line values ([`CliOverrides`]) are applied last with [`SearchConfig::merge_with_cli`].
///
/// # Configuration Format
///
/// ```yaml
/// # Keywords to look for (literal, case-sensitive)
/// keywords: ["python", "javascript", "<html>"]
///
/// # Files to scan, in order
/// files: ["file1.txt", "file2.txt"]
///
/// # Optional directory whose files are appended to `files`
/// root_path: "docs"
/// file_extensions: ["txt", "md"]
/// ignore_patterns: ["**/*.min.js"]
///
/// # Number of concurrent workers (default: 4)
/// worker_count: 4
///
/// # ignore | lossy | failfast
/// encoding_mode: ignore
///
/// stats_only: false
/// log_level: "warn"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Keywords to search for
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Files to scan, in the order they are sharded
    #[serde(default)]
    pub files: Vec<PathBuf>,

    /// Optional directory whose files are added to the scan list
    #[serde(default)]
    pub root_path: Option<PathBuf>,

    /// Extensions to keep when collecting files from `root_path`
    #[serde(default)]
    pub file_extensions: Option<Vec<String>>,

    /// Glob patterns to skip when collecting files from `root_path`
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Number of concurrent workers
    #[serde(default = "default_worker_count")]
    pub worker_count: NonZeroUsize,

    /// Handling of invalid UTF-8 while scanning
    #[serde(default)]
    pub encoding_mode: EncodingMode,

    /// Whether to only show statistics instead of matching files
    #[serde(default)]
    pub stats_only: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

pub fn default_worker_count() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_WORKER_COUNT).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            files: Vec::new(),
            root_path: None,
            file_extensions: None,
            ignore_patterns: Vec::new(),
            worker_count: default_worker_count(),
            encoding_mode: EncodingMode::default(),
            stats_only: false,
            log_level: default_log_level(),
        }
    }
}

impl SearchConfig {
    /// Creates a config for the given files and keywords with default settings
    pub fn new(files: Vec<PathBuf>, keywords: Vec<String>) -> Self {
        Self {
            files,
            keywords,
            ..Self::default()
        }
    }

    /// Sets the worker count, rejecting zero
    pub fn with_workers(mut self, workers: usize) -> Result<Self, SearchError> {
        self.worker_count = NonZeroUsize::new(workers)
            .ok_or_else(|| SearchError::config_error("worker count must be at least 1"))?;
        Ok(self)
    }

    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration, layering an optional explicit file on top of the defaults.
    /// The explicit file must exist.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let default_files = [
            dirs::config_dir().map(|p| p.join("shardscan/config.yaml")),
            Some(PathBuf::from(".shardscan.yaml")),
        ];

        for path in default_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli_config: CliOverrides) -> Self {
        // CLI values take precedence over config file values
        if !cli_config.keywords.is_empty() {
            self.keywords = cli_config.keywords;
        }
        if !cli_config.files.is_empty() {
            self.files = cli_config.files;
        }
        if cli_config.root_path.is_some() {
            self.root_path = cli_config.root_path;
        }
        if cli_config.file_extensions.is_some() {
            self.file_extensions = cli_config.file_extensions;
        }
        if !cli_config.ignore_patterns.is_empty() {
            self.ignore_patterns = cli_config.ignore_patterns;
        }
        if let Some(workers) = cli_config.worker_count {
            self.worker_count = workers;
        }
        if let Some(mode) = cli_config.encoding_mode {
            self.encoding_mode = mode;
        }
        if cli_config.stats_only {
            self.stats_only = true;
        }
        if let Some(level) = cli_config.log_level {
            self.log_level = level;
        }
        self
    }
}

/// Values given on the command line.
///
/// Empty lists and `None` leave the configuration file value in place; anything set wins,
/// including a value equal to the built-in default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub keywords: Vec<String>,
    pub files: Vec<PathBuf>,
    pub root_path: Option<PathBuf>,
    pub file_extensions: Option<Vec<String>>,
    pub ignore_patterns: Vec<String>,
    pub worker_count: Option<NonZeroUsize>,
    pub encoding_mode: Option<EncodingMode>,
    pub stats_only: bool,
    pub log_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let config_content = r#"
            keywords: ["python", "<html>"]
            files: ["a.txt", "b.txt"]
            root_path: "docs"
            file_extensions: ["txt", "md"]
            ignore_patterns: ["**/*.tmp"]
            worker_count: 8
            encoding_mode: lossy
            stats_only: true
            log_level: "debug"
        "#;

        let mut file = File::create(&config_path).unwrap();
        file.write_all(config_content.as_bytes()).unwrap();

        let config = SearchConfig::load_from(Some(&config_path)).unwrap();
        assert_eq!(config.keywords, vec!["python", "<html>"]);
        assert_eq!(
            config.files,
            vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]
        );
        assert_eq!(config.root_path, Some(PathBuf::from("docs")));
        assert_eq!(
            config.file_extensions,
            Some(vec!["txt".to_string(), "md".to_string()])
        );
        assert_eq!(config.ignore_patterns, vec!["**/*.tmp".to_string()]);
        assert_eq!(config.worker_count, NonZeroUsize::new(8).unwrap());
        assert_eq!(config.encoding_mode, EncodingMode::Lossy);
        assert!(config.stats_only);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_default_values() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        std::fs::write(&config_path, "keywords: [\"test\"]\n").unwrap();

        let config = SearchConfig::load_from(Some(&config_path)).unwrap();
        assert_eq!(config.keywords, vec!["test"]);
        assert!(config.files.is_empty());
        assert_eq!(config.root_path, None);
        assert_eq!(config.file_extensions, None);
        assert_eq!(config.worker_count.get(), DEFAULT_WORKER_COUNT);
        assert_eq!(config.encoding_mode, EncodingMode::Ignore);
        assert!(!config.stats_only);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_zero_workers_rejected_in_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        std::fs::write(&config_path, "worker_count: 0\n").unwrap();

        assert!(SearchConfig::load_from(Some(&config_path)).is_err());
    }

    #[test]
    fn test_with_workers() {
        let config = SearchConfig::new(vec![], vec![]);
        assert!(matches!(
            config.clone().with_workers(0),
            Err(SearchError::ConfigError(_))
        ));
        assert_eq!(config.with_workers(3).unwrap().worker_count.get(), 3);
    }

    #[test]
    fn test_merge_with_cli() {
        let config_file = SearchConfig {
            keywords: vec!["TODO".to_string()],
            files: vec![PathBuf::from("a.txt")],
            file_extensions: Some(vec!["rs".to_string()]),
            worker_count: NonZeroUsize::new(2).unwrap(),
            encoding_mode: EncodingMode::Lossy,
            log_level: "info".to_string(),
            ..SearchConfig::default()
        };

        let cli_config = CliOverrides {
            keywords: vec!["FIXME".to_string()],
            ignore_patterns: vec!["*.tmp".to_string()],
            worker_count: NonZeroUsize::new(8),
            stats_only: true,
            ..CliOverrides::default()
        };

        let merged = config_file.merge_with_cli(cli_config);
        assert_eq!(merged.keywords, vec!["FIXME"]); // CLI value
        assert_eq!(merged.files, vec![PathBuf::from("a.txt")]); // File value (CLI empty)
        assert_eq!(merged.file_extensions, Some(vec!["rs".to_string()])); // File value
        assert_eq!(merged.ignore_patterns, vec!["*.tmp".to_string()]); // CLI value
        assert_eq!(merged.worker_count.get(), 8); // CLI value
        assert_eq!(merged.encoding_mode, EncodingMode::Lossy); // File value (CLI unset)
        assert!(merged.stats_only); // CLI value
        assert_eq!(merged.log_level, "info"); // File value (CLI unset)
    }

    #[test]
    fn test_cli_default_values_still_override_file() {
        let config_file = SearchConfig {
            worker_count: NonZeroUsize::new(2).unwrap(),
            encoding_mode: EncodingMode::FailFast,
            log_level: "debug".to_string(),
            ..SearchConfig::default()
        };

        let cli_config = CliOverrides {
            worker_count: Some(default_worker_count()),
            encoding_mode: Some(EncodingMode::Ignore),
            log_level: Some(default_log_level()),
            ..CliOverrides::default()
        };

        let merged = config_file.merge_with_cli(cli_config);
        assert_eq!(merged.worker_count.get(), DEFAULT_WORKER_COUNT);
        assert_eq!(merged.encoding_mode, EncodingMode::Ignore);
        assert_eq!(merged.log_level, "warn");
    }

    #[test]
    fn test_encoding_mode_parse() {
        assert_eq!("ignore".parse::<EncodingMode>().unwrap(), EncodingMode::Ignore);
        assert_eq!("LOSSY".parse::<EncodingMode>().unwrap(), EncodingMode::Lossy);
        assert_eq!(
            "fail-fast".parse::<EncodingMode>().unwrap(),
            EncodingMode::FailFast
        );
        assert!("utf16".parse::<EncodingMode>().is_err());
        assert_eq!(EncodingMode::FailFast.to_string(), "failfast");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = SearchConfig::load_from(Some(Path::new("nonexistent.yaml")));
        assert!(result.is_err());
    }
}

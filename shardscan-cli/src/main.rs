use clap::{Parser, Subcommand};
use colored::Colorize;
use shardscan::{
    config::EncodingMode, results::SearchOutput, search, search::shard_files, CliOverrides,
    SearchConfig, SearchError,
};
use std::{num::NonZeroUsize, path::PathBuf};
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, SearchError>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
struct CliSearchConfig {
    /// Keyword to search for (can be specified multiple times)
    #[arg(short = 'k', long = "keyword")]
    keywords: Vec<String>,

    /// Files to search, in the order they are split between workers
    files: Vec<PathBuf>,

    /// Also search every file under this directory
    #[arg(short = 'd', long)]
    root: Option<PathBuf>,

    /// File extensions to collect from --root (e.g. txt,md,log)
    #[arg(short = 'e', long)]
    extensions: Option<String>,

    /// Patterns to ignore under --root (glob format)
    #[arg(short, long)]
    ignore: Vec<String>,

    /// Number of workers to use (default: 4)
    #[arg(short = 'j', long)]
    workers: Option<usize>,

    /// How to handle invalid UTF-8 sequences (ignore|lossy|failfast)
    #[arg(long)]
    encoding: Option<String>,

    /// Show only statistics, not matching files
    #[arg(short, long)]
    stats: bool,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search files for keywords
    Search(Box<CliSearchConfig>),

    /// Show how files would be split between workers
    Plan {
        /// Number of workers
        #[arg(short = 'j', long, default_value = "4")]
        workers: usize,

        /// Files to split
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search(args) => {
            let file_config = SearchConfig::load_from(args.config.as_deref())?;
            let cli_config = cli_overrides(&args)?;
            let config = file_config.merge_with_cli(cli_config);

            init_tracing(&config.log_level);
            tracing::debug!("Effective configuration: {:?}", config);

            let result = search(&config)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_search_results(&result, config.stats_only);
            }
            Ok(())
        }
        Commands::Plan { workers, files } => {
            let workers = non_zero_workers(workers)?;
            print_plan(&files, workers);
            Ok(())
        }
    }
}

/// Builds the CLI layer that is merged over the configuration files
fn cli_overrides(args: &CliSearchConfig) -> Result<CliOverrides> {
    let file_extensions = args.extensions.as_ref().map(|e| {
        e.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
    });

    Ok(CliOverrides {
        keywords: args.keywords.clone(),
        files: args.files.clone(),
        root_path: args.root.clone(),
        file_extensions,
        ignore_patterns: args.ignore.clone(),
        worker_count: args.workers.map(non_zero_workers).transpose()?,
        encoding_mode: args
            .encoding
            .as_deref()
            .map(str::parse::<EncodingMode>)
            .transpose()?,
        stats_only: args.stats,
        log_level: args.log_level.clone(),
    })
}

fn non_zero_workers(workers: usize) -> Result<NonZeroUsize> {
    NonZeroUsize::new(workers)
        .ok_or_else(|| SearchError::config_error("worker count must be at least 1"))
}

/// Sends diagnostics to stderr; RUST_LOG overrides the configured level
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn print_search_results(result: &SearchOutput, stats_only: bool) {
    if !stats_only {
        for (keyword, files) in result.sorted() {
            println!("\n{}", keyword.blue());

            let mut counts: Vec<(&std::path::Path, usize)> = Vec::new();
            for file in files {
                if let Some((last, count)) = counts.last_mut() {
                    if *last == file {
                        *count += 1;
                        continue;
                    }
                }
                counts.push((file, 1));
            }
            for (file, count) in counts {
                println!("  {} ({})", file.display(), count);
            }
        }
        println!();
    }

    println!(
        "Found {} matches for {} keywords in {} files",
        result.total_matches(),
        result.hits.len(),
        result.files_with_matches()
    );
    println!(
        "Execution time: {:.3}s",
        result.stats.elapsed.as_secs_f64()
    );
    if result.stats.files_skipped > 0 {
        println!(
            "{}",
            format!("Skipped {} unreadable files", result.stats.files_skipped).yellow()
        );
    }
}

fn print_plan(files: &[PathBuf], workers: NonZeroUsize) {
    for (id, shard) in shard_files(files, workers).iter().enumerate() {
        println!("worker {} ({} files)", id, shard.len());
        for file in *shard {
            println!("  {}", file.display());
        }
    }
}

/// Sharded keyword search.
///
/// A run splits the ordered file list into one contiguous shard per worker ([`shard`]), runs
/// each non-empty shard on its own thread of a dedicated rayon pool ([`engine`]), and has every
/// worker ([`worker`]) scan its files line by line ([`scanner`]) into private results before
/// merging them into the shared store in a single locked step.
///
/// ```rust,ignore
/// let files = vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")];
/// let keywords = vec!["python".to_string()];
/// let hits = shardscan::search_files(&files, &keywords, 2)?;
/// // {"python": ["a.txt", "a.txt"]} when a.txt has two matching lines
/// ```
pub mod engine;
pub mod scanner;
pub mod shard;
pub mod worker;

pub use engine::{search, search_files, search_shards};
pub use scanner::LineScanner;
pub use shard::{plan_shards, shard_files};
pub use worker::{Worker, WorkerReport};

pub mod config;
pub mod errors;
pub mod filters;
pub mod metrics;
pub mod results;
pub mod search;
pub mod workspace;

pub use config::{CliOverrides, EncodingMode, SearchConfig};
pub use errors::{SearchError, SearchResult};
pub use results::{KeywordHits, LocalResults, SearchOutput, SharedResults};
pub use search::{search, search_files};

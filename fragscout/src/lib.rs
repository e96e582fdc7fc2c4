pub mod config;
pub mod corpus;
pub mod errors;
pub mod filters;
pub mod metrics;
pub mod query;
pub mod results;
pub mod search;

pub use config::{EncodingMode, SearchConfig};
pub use corpus::{CorpusSource, LocalFs, MemoryCorpus};
pub use errors::{SearchError, SearchResult};
pub use query::{CaptureId, SearchQuery};
pub use results::{FileEntry, FileKind, MatchLocation, SearchOutput};
pub use search::{search, search_or_empty, search_with_source};

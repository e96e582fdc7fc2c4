//! Query compilation and the concurrent scan.
//!
//! A search runs in three stages:
//!
//! 1. [`PatternCompiler`] turns a [`SearchQuery`](crate::query::SearchQuery)
//!    into one [`CompiledPattern`]. Plain text is escaped before a whole-word
//!    query is wrapped in [`WordBoundary`] guards, and the real word is put in
//!    a named group so the guards can be stripped from reported spans.
//! 2. [`CorpusIndexer`](crate::corpus::CorpusIndexer) walks the corpus.
//! 3. [`ConcurrentScanner`] loads every document at once and, as each load
//!    completes, runs the pattern line by line through the extractor.
//!
//! ```rust,ignore
//! let config = SearchConfig::for_root("novel");
//! let query = SearchQuery::new("dragon").whole_word(true);
//! let output = fragscout::search::search(&config, &query).await?;
//! for m in output.sorted() {
//!     println!("{}:{}:{}", m.file.path.display(), m.line + 1, m.start_column);
//! }
//! ```
pub mod boundary;
pub mod compiler;
pub mod engine;
pub mod extractor;
pub mod scanner;

pub use boundary::WordBoundary;
pub use compiler::{CompiledPattern, PatternCompiler, PatternFlags};
pub use engine::{discover_with_source, search, search_or_empty, search_with_source};
pub use extractor::{match_document, LineMatch, LineMatches};
pub use scanner::ConcurrentScanner;

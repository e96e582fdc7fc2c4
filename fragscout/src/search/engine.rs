use std::sync::Arc;
use tracing::{debug, error, info};

use super::compiler::PatternCompiler;
use super::scanner::ConcurrentScanner;
use crate::config::SearchConfig;
use crate::corpus::{CorpusIndexer, CorpusSource, LocalFs};
use crate::errors::SearchResult;
use crate::filters::CorpusFilter;
use crate::metrics::SearchMetrics;
use crate::query::SearchQuery;
use crate::results::{FileEntry, SearchOutput};

/// Searches the corpus under `config.root_path`, read through `source`.
///
/// The pattern is compiled before any directory is listed, so an invalid
/// regex fails without touching the corpus. An empty query yields an empty
/// output.
pub async fn search_with_source(
    source: Arc<dyn CorpusSource>,
    config: &SearchConfig,
    query: &SearchQuery,
) -> SearchResult<SearchOutput> {
    info!(
        "Starting search for {:?} (regex: {}, ignore case: {}, whole word: {})",
        query.raw_text(),
        query.uses_regex(),
        query.is_case_insensitive(),
        query.is_whole_word()
    );

    if query.is_empty() {
        debug!("Empty query, returning empty result");
        return Ok(SearchOutput::new());
    }

    let metrics = SearchMetrics::new();
    let pattern = PatternCompiler::with_metrics(metrics.clone())
        .with_boundary(config.word_boundary())
        .compile(query)?;

    let filter = CorpusFilter::from_config(config)?;
    let indexer = CorpusIndexer::with_metrics(Arc::clone(&source), filter, metrics.clone());
    let files = indexer.discover(&config.root_path).await?;

    let scanner = ConcurrentScanner::with_metrics(source, metrics.clone());
    let output = scanner.scan(files, &pattern).await?;

    metrics.log_stats();

    info!(
        "Search complete. Found {} matches in {} files",
        output.total_matches, output.files_with_matches
    );

    Ok(output)
}

/// Searches the local file system
pub async fn search(config: &SearchConfig, query: &SearchQuery) -> SearchResult<SearchOutput> {
    let source = Arc::new(LocalFs::new(config.encoding_mode));
    search_with_source(source, config, query).await
}

/// Like [`search_with_source`], but any failure is logged and reported as an
/// empty output. Callers cannot tell "no matches" from "search failed" apart.
pub async fn search_or_empty(
    source: Arc<dyn CorpusSource>,
    config: &SearchConfig,
    query: &SearchQuery,
) -> SearchOutput {
    match search_with_source(source, config, query).await {
        Ok(output) => output,
        Err(e) => {
            error!("Search for {:?} failed: {}", query.raw_text(), e);
            SearchOutput::new()
        }
    }
}

/// Lists the recognized documents of the corpus without searching them
pub async fn discover_with_source(
    source: Arc<dyn CorpusSource>,
    config: &SearchConfig,
) -> SearchResult<Vec<FileEntry>> {
    let filter = CorpusFilter::from_config(config)?;
    CorpusIndexer::new(source, filter)
        .discover(&config.root_path)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::MemoryCorpus;
    use crate::errors::SearchError;
    use std::fs;
    use tempfile::tempdir;

    fn corpus() -> Arc<dyn CorpusSource> {
        Arc::new(
            MemoryCorpus::new("/novel")
                .with_file("chapters/one.wt", "The dragon slept.\nThe knight waited.")
                .with_file("notes/dragon.wtnote", "dragon: red, old")
                .with_file("cover.txt", "dragon dragon dragon"),
        )
    }

    #[tokio::test]
    async fn test_search_with_source() {
        let config = SearchConfig::for_root("/novel");
        let output = search_with_source(corpus(), &config, &SearchQuery::new("dragon"))
            .await
            .unwrap();

        assert_eq!(output.total_matches, 2);
        assert_eq!(output.files_scanned, 2);
        assert_eq!(output.files_with_matches, 2);
    }

    #[tokio::test]
    async fn test_configured_word_separators() {
        let source: Arc<dyn CorpusSource> = Arc::new(
            MemoryCorpus::new("/novel").with_file("one.wt", "path/dragon/lair\nred,dragon"),
        );
        let query = SearchQuery::new("dragon").whole_word(true);

        let default = SearchConfig::for_root("/novel");
        let output = search_with_source(Arc::clone(&source), &default, &query)
            .await
            .unwrap();
        assert_eq!(output.total_matches, 1);
        assert_eq!(output.matches[0].line, 1);

        let slashes = SearchConfig {
            word_separators: "/".to_string(),
            ..SearchConfig::for_root("/novel")
        };
        let output = search_with_source(source, &slashes, &query).await.unwrap();
        assert_eq!(output.total_matches, 1);
        assert_eq!(output.matches[0].line, 0);
        assert_eq!(output.matches[0].start_column, 5);
    }

    #[tokio::test]
    async fn test_empty_query() {
        let config = SearchConfig::for_root("/missing");
        let output = search_with_source(corpus(), &config, &SearchQuery::new(""))
            .await
            .unwrap();
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_pattern_before_discovery() {
        // The root does not exist, so reaching discovery would fail differently
        let config = SearchConfig::for_root("/missing");
        let query = SearchQuery::new("(unclosed").regex(true);
        let err = search_with_source(corpus(), &config, &query)
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidPattern(_)));
    }

    #[tokio::test]
    async fn test_search_or_empty_swallows_errors() {
        let source: Arc<dyn CorpusSource> = Arc::new(
            MemoryCorpus::new("/novel")
                .with_file("one.wt", "dragon")
                .with_bytes("two.wt", vec![0xff, 0xfe]),
        );
        let config = SearchConfig::for_root("/novel");
        let output = search_or_empty(source, &config, &SearchQuery::new("dragon")).await;
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn test_search_local_fs() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("one.wt"), "test line\ntest line 2\n").unwrap();
        fs::write(dir.path().join("skip.md"), "test").unwrap();

        let config = SearchConfig::for_root(dir.path());
        let output = search(&config, &SearchQuery::new("test")).await.unwrap();
        assert_eq!(output.files_with_matches, 1);
        assert_eq!(output.total_matches, 2);
    }

    #[tokio::test]
    async fn test_discover_with_source() {
        let config = SearchConfig::for_root("/novel");
        let files = discover_with_source(corpus(), &config).await.unwrap();
        assert_eq!(files.len(), 2);
    }
}

use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, trace, warn};

use super::compiler::CompiledPattern;
use super::extractor::match_document;
use crate::corpus::CorpusSource;
use crate::errors::{SearchError, SearchResult};
use crate::metrics::SearchMetrics;
use crate::results::{FileEntry, SearchOutput};

/// Loads every document at once and matches them as the loads complete.
///
/// There is no limit on in-flight loads: a corpus of N documents has N load
/// tasks pending at the same time. Documents are matched in completion order,
/// one at a time, by the loop in [`ConcurrentScanner::scan`], which is the only
/// writer of the output.
pub struct ConcurrentScanner {
    source: Arc<dyn CorpusSource>,
    metrics: SearchMetrics,
}

impl ConcurrentScanner {
    pub fn new(source: Arc<dyn CorpusSource>) -> Self {
        Self::with_metrics(source, SearchMetrics::new())
    }

    pub fn with_metrics(source: Arc<dyn CorpusSource>, metrics: SearchMetrics) -> Self {
        Self { source, metrics }
    }

    pub fn metrics(&self) -> &SearchMetrics {
        &self.metrics
    }

    /// Scans `files` with `pattern`.
    ///
    /// Fails closed: the first load error cancels the remaining loads and is
    /// returned, discarding every match collected so far.
    pub async fn scan(
        &self,
        files: Vec<FileEntry>,
        pattern: &CompiledPattern,
    ) -> SearchResult<SearchOutput> {
        debug!("Scanning {} documents for {}", files.len(), pattern.as_str());

        let mut pending = JoinSet::new();
        for entry in files {
            let source = Arc::clone(&self.source);
            pending.spawn(async move {
                let loaded = source.load_text(&entry.path).await;
                (entry, loaded)
            });
        }

        let mut output = SearchOutput::new();
        while let Some(joined) = pending.join_next().await {
            let (entry, loaded) = match joined {
                Ok(done) => done,
                Err(e) => {
                    pending.abort_all();
                    warn!("Load task failed, aborting scan: {}", e);
                    return Err(SearchError::scan_aborted(e.to_string()));
                }
            };

            let text = match loaded {
                Ok(text) => text,
                Err(e) => {
                    pending.abort_all();
                    warn!(
                        "Failed to load {}, aborting scan: {}",
                        entry.path.display(),
                        e
                    );
                    return Err(e);
                }
            };

            self.metrics.record_load(text.len() as u64);
            let (matches, lines) = match_document(&entry, &text, pattern);
            self.metrics
                .record_matching(lines as u64, matches.len() as u64);
            trace!(
                "{}: {} matches in {} lines",
                entry.path.display(),
                matches.len(),
                lines
            );
            output.add_file_matches(matches);
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{DirEntry, MemoryCorpus};
    use crate::query::SearchQuery;
    use crate::results::FileKind;
    use crate::search::compiler::PatternCompiler;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    fn fragment(path: &str) -> FileEntry {
        FileEntry::new(path, FileKind::Fragment)
    }

    fn compile(text: &str) -> CompiledPattern {
        PatternCompiler::new()
            .compile(&SearchQuery::new(text))
            .unwrap()
    }

    /// Delays loads of documents whose name starts with "slow"
    struct SlowCorpus(MemoryCorpus);

    #[async_trait]
    impl CorpusSource for SlowCorpus {
        async fn list_dir(&self, dir: &Path) -> SearchResult<Vec<DirEntry>> {
            self.0.list_dir(dir).await
        }

        async fn load_text(&self, path: &Path) -> SearchResult<String> {
            let slow = path
                .file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with("slow"));
            if slow {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            self.0.load_text(path).await
        }
    }

    #[tokio::test]
    async fn test_scan_collects_all_documents() {
        let corpus = MemoryCorpus::new("/c")
            .with_file("a.wt", "the dragon\nno match\nthe end")
            .with_file("b.wt", "nothing here")
            .with_file("c.wt", "the\nthe");
        let scanner = ConcurrentScanner::new(Arc::new(corpus));

        let output = scanner
            .scan(
                vec![fragment("/c/a.wt"), fragment("/c/b.wt"), fragment("/c/c.wt")],
                &compile("the"),
            )
            .await
            .unwrap();

        assert_eq!(output.total_matches, 4);
        assert_eq!(output.files_scanned, 3);
        assert_eq!(output.files_with_matches, 2);

        let grouped = output.by_file();
        let lines: Vec<usize> = grouped[Path::new("/c/a.wt")].iter().map(|m| m.line).collect();
        assert_eq!(lines, vec![0, 2]);
    }

    #[tokio::test]
    async fn test_scan_order_follows_completion() {
        let corpus = MemoryCorpus::new("/c")
            .with_file("slow.wt", "key")
            .with_file("fast.wt", "key");
        let scanner = ConcurrentScanner::new(Arc::new(SlowCorpus(corpus)));

        let output = scanner
            .scan(
                vec![fragment("/c/slow.wt"), fragment("/c/fast.wt")],
                &compile("key"),
            )
            .await
            .unwrap();

        let order: Vec<&PathBuf> = output.matches.iter().map(|m| &m.file.path).collect();
        assert_eq!(
            order,
            vec![&PathBuf::from("/c/fast.wt"), &PathBuf::from("/c/slow.wt")]
        );
    }

    #[tokio::test]
    async fn test_scan_fails_closed() {
        let corpus = MemoryCorpus::new("/c")
            .with_file("good.wt", "key key")
            .with_bytes("bad.wt", vec![b'k', 0xff]);
        let scanner = ConcurrentScanner::new(Arc::new(corpus));

        let err = scanner
            .scan(
                vec![fragment("/c/good.wt"), fragment("/c/bad.wt")],
                &compile("key"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::EncodingError { .. }));
    }

    #[tokio::test]
    async fn test_scan_missing_document() {
        let scanner = ConcurrentScanner::new(Arc::new(MemoryCorpus::new("/c")));
        let err = scanner
            .scan(vec![fragment("/c/gone.wt")], &compile("key"))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_scan_records_metrics() {
        let corpus = MemoryCorpus::new("/c").with_file("a.wt", "one key\ntwo key\nthree");
        let scanner = ConcurrentScanner::new(Arc::new(corpus));

        scanner
            .scan(vec![fragment("/c/a.wt")], &compile("key"))
            .await
            .unwrap();

        let stats = scanner.metrics().get_stats();
        assert_eq!(stats.files_loaded, 1);
        assert_eq!(stats.bytes_loaded, 21);
        assert_eq!(stats.lines_scanned, 3);
        assert_eq!(stats.matches_found, 2);
    }

    #[tokio::test]
    async fn test_scan_nothing() {
        let scanner = ConcurrentScanner::new(Arc::new(MemoryCorpus::new("/c")));
        let output = scanner.scan(vec![], &compile("key")).await.unwrap();
        assert!(output.is_empty());
        assert_eq!(output.files_scanned, 0);
    }
}

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};

use super::{CorpusSource, DirEntry, EntryKind};
use crate::errors::SearchResult;
use crate::filters::CorpusFilter;
use crate::metrics::SearchMetrics;
use crate::results::FileEntry;

/// Finds every corpus document under a root directory.
///
/// The walk is sequential and depth-first: each directory is listed once, and
/// a subdirectory is walked completely before its next sibling is looked at.
/// Latency therefore grows with tree depth times listing latency. Directory
/// cycles reachable through links are not detected.
pub struct CorpusIndexer {
    source: Arc<dyn CorpusSource>,
    filter: CorpusFilter,
    metrics: SearchMetrics,
}

impl CorpusIndexer {
    pub fn new(source: Arc<dyn CorpusSource>, filter: CorpusFilter) -> Self {
        Self::with_metrics(source, filter, SearchMetrics::new())
    }

    pub fn with_metrics(
        source: Arc<dyn CorpusSource>,
        filter: CorpusFilter,
        metrics: SearchMetrics,
    ) -> Self {
        Self {
            source,
            filter,
            metrics,
        }
    }

    async fn list(&self, dir: &Path) -> SearchResult<Vec<DirEntry>> {
        let entries = self.source.list_dir(dir).await?;
        self.metrics.record_directory_listed();
        Ok(entries)
    }

    /// Returns the recognized documents under `root`, in walk order.
    ///
    /// Fails if `root` or any directory below it cannot be listed.
    pub async fn discover(&self, root: &Path) -> SearchResult<Vec<FileEntry>> {
        debug!("Indexing corpus at {}", root.display());

        let mut files = Vec::new();
        let mut stack = vec![self.list(root).await?.into_iter()];

        while let Some(entries) = stack.last_mut() {
            let Some(entry) = entries.next() else {
                stack.pop();
                continue;
            };

            match entry.kind {
                EntryKind::Directory => {
                    let children = self.list(&entry.path).await?;
                    stack.push(children.into_iter());
                }
                EntryKind::File => {
                    let relative = entry.path.strip_prefix(root).unwrap_or(entry.path.as_path());
                    if let Some(kind) = self.filter.include(relative, &entry.name) {
                        trace!("Discovered {} {}", kind, entry.path.display());
                        self.metrics.record_file_discovered();
                        files.push(FileEntry::new(entry.path, kind));
                    }
                }
                EntryKind::Other => {
                    trace!("Skipping special entry {}", entry.path.display());
                }
            }
        }

        debug!("Discovered {} documents", files.len());
        Ok(files)
    }
}

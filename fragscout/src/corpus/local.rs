use async_trait::async_trait;
use std::path::Path;
use tracing::trace;

use super::{decode_bytes, CorpusSource, DirEntry, EntryKind};
use crate::config::EncodingMode;
use crate::errors::{SearchError, SearchResult};

/// Corpus source backed by the local file system.
///
/// Entry kinds come from the directory listing without following links, so
/// symlinks are reported as [`EntryKind::Other`] and never walked or loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs {
    encoding_mode: EncodingMode,
}

impl LocalFs {
    pub fn new(encoding_mode: EncodingMode) -> Self {
        Self { encoding_mode }
    }
}

fn kind_of(file_type: std::fs::FileType) -> EntryKind {
    if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    }
}

#[async_trait]
impl CorpusSource for LocalFs {
    async fn list_dir(&self, dir: &Path) -> SearchResult<Vec<DirEntry>> {
        let mut read_dir = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| SearchError::from_io(dir, e))?;

        let mut entries = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| SearchError::from_io(dir, e))?
        {
            let path = entry.path();
            let kind = entry
                .file_type()
                .await
                .map(kind_of)
                .map_err(|e| SearchError::from_io(&path, e))?;

            entries.push(DirEntry::new(
                entry.file_name().to_string_lossy().into_owned(),
                path,
                kind,
            ));
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        trace!("Listed {} entries in {}", entries.len(), dir.display());
        Ok(entries)
    }

    async fn load_text(&self, path: &Path) -> SearchResult<String> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| SearchError::from_io(path, e))?;
        decode_bytes(bytes, path, self.encoding_mode)
    }
}

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{decode_bytes, CorpusSource, DirEntry, EntryKind};
use crate::config::EncodingMode;
use crate::errors::{SearchError, SearchResult};

/// An in-memory corpus: document paths mapped to their raw bytes.
///
/// Directories exist implicitly as ancestors of documents; the root always
/// exists, even when empty.
#[derive(Debug, Clone, Default)]
pub struct MemoryCorpus {
    root: PathBuf,
    files: BTreeMap<PathBuf, Vec<u8>>,
    encoding_mode: EncodingMode,
}

impl MemoryCorpus {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: BTreeMap::new(),
            encoding_mode: EncodingMode::default(),
        }
    }

    pub fn with_encoding_mode(mut self, encoding_mode: EncodingMode) -> Self {
        self.encoding_mode = encoding_mode;
        self
    }

    /// Adds a text document at `relative` (relative to the root)
    pub fn with_file(self, relative: impl AsRef<Path>, text: impl Into<String>) -> Self {
        self.with_bytes(relative, text.into().into_bytes())
    }

    /// Adds a document with arbitrary, possibly undecodable, content
    pub fn with_bytes(mut self, relative: impl AsRef<Path>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(relative, bytes);
        self
    }

    pub fn insert(&mut self, relative: impl AsRef<Path>, bytes: impl Into<Vec<u8>>) {
        let path = self.root.join(relative);
        self.files.insert(path, bytes.into());
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[async_trait]
impl CorpusSource for MemoryCorpus {
    async fn list_dir(&self, dir: &Path) -> SearchResult<Vec<DirEntry>> {
        let mut exists = dir == self.root.as_path();
        let mut children: BTreeMap<String, DirEntry> = BTreeMap::new();

        for path in self.files.keys() {
            let Ok(rest) = path.strip_prefix(dir) else {
                continue;
            };
            let mut components = rest.components();
            let Some(first) = components.next() else {
                continue;
            };
            exists = true;

            let name = first.as_os_str().to_string_lossy().into_owned();
            let kind = if components.next().is_some() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            children
                .entry(name.clone())
                .or_insert_with(|| DirEntry::new(name.clone(), dir.join(&name), kind));
        }

        if !exists {
            return Err(SearchError::file_not_found(dir));
        }
        Ok(children.into_values().collect())
    }

    async fn load_text(&self, path: &Path) -> SearchResult<String> {
        let bytes = self
            .files
            .get(path)
            .ok_or_else(|| SearchError::file_not_found(path))?;
        decode_bytes(bytes.clone(), path, self.encoding_mode)
    }
}

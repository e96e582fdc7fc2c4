//! Access to the document corpus.
//!
//! The search core never touches the file system directly. It lists
//! directories and loads documents through a [`CorpusSource`], which lets a
//! host plug in its own virtual file system or in-memory buffers.

pub mod indexer;
pub mod local;
pub mod memory;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::config::EncodingMode;
use crate::errors::{SearchError, SearchResult};

pub use indexer::CorpusIndexer;
pub use local::LocalFs;
pub use memory::MemoryCorpus;

/// What a directory entry points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Other,
}

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
        }
    }
}

/// Directory listing and document loading, as provided by the host
#[async_trait]
pub trait CorpusSource: Send + Sync {
    /// Lists the direct children of `dir`
    async fn list_dir(&self, dir: &Path) -> SearchResult<Vec<DirEntry>>;

    /// Loads the full decoded text of the document at `path`
    async fn load_text(&self, path: &Path) -> SearchResult<String>;
}

/// Decodes document bytes according to the encoding mode
pub fn decode_bytes(bytes: Vec<u8>, path: &Path, encoding_mode: EncodingMode) -> SearchResult<String> {
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => match encoding_mode {
            EncodingMode::FailFast => Err(SearchError::encoding_error(path, err)),
            EncodingMode::Lossy => {
                warn!("Invalid UTF-8 replaced in file: {}", path.display());
                Ok(String::from_utf8_lossy(err.as_bytes()).into_owned())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_utf8() {
        let text = decode_bytes(
            "naïve".as_bytes().to_vec(),
            Path::new("a.wt"),
            EncodingMode::FailFast,
        )
        .unwrap();
        assert_eq!(text, "naïve");
    }

    #[test]
    fn test_decode_failfast() {
        let err = decode_bytes(vec![b'a', 0xff], Path::new("a.wt"), EncodingMode::FailFast)
            .unwrap_err();
        assert!(matches!(err, SearchError::EncodingError { ref path, .. } if path == Path::new("a.wt")));
    }

    #[test]
    fn test_decode_lossy() {
        let text = decode_bytes(vec![b'a', 0xff, b'b'], Path::new("a.wt"), EncodingMode::Lossy)
            .unwrap();
        assert_eq!(text, "a\u{FFFD}b");
    }
}

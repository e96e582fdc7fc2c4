/// Error types shared by every stage of a corpus search.
///
/// Failures fall into three families:
///
/// 1. **I/O**: a directory cannot be listed or a document cannot be read
///    (`FileNotFound`, `PermissionDenied`, `IoError`).
/// 2. **Patterns**: the query text does not compile (`InvalidPattern`), or the
///    capture identifier is not a usable group name (`InvalidCaptureId`).
/// 3. **Decoding**: a document is not valid UTF-8 (`EncodingError`).
///
/// Pattern errors surface from compilation before any file is touched. I/O and
/// decoding errors raised while scanning abort the whole scan:
/// ```rust,ignore
/// match search(&config, &query).await {
///     Ok(output) => // every match in the corpus,
///     Err(SearchError::InvalidPattern(msg)) => // nothing was scanned,
///     Err(e) => // the scan stopped, partial results were discarded
/// }
/// ```
use std::path::PathBuf;
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur during search operations
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("Invalid capture id: {0}")]
    InvalidCaptureId(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Scan aborted: {0}")]
    ScanAborted(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid UTF-8 in file {path}: {source}")]
    EncodingError {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },
}

impl SearchError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn invalid_pattern(msg: impl Into<String>) -> Self {
        Self::InvalidPattern(msg.into())
    }

    pub fn invalid_capture_id(id: impl Into<String>) -> Self {
        Self::InvalidCaptureId(id.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn scan_aborted(msg: impl Into<String>) -> Self {
        Self::ScanAborted(msg.into())
    }

    pub fn encoding_error(path: impl Into<PathBuf>, source: std::string::FromUtf8Error) -> Self {
        Self::EncodingError {
            path: path.into(),
            source,
        }
    }

    /// Maps an `io::Error` raised while touching `path` onto the most specific variant
    pub fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::file_not_found(path),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::IoError(err),
        }
    }

    /// True for the I/O family (unlistable directory or unreadable file)
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound(_) | Self::PermissionDenied(_) | Self::IoError(_)
        )
    }
}

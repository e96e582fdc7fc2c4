//! Query options as collected by the host.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::errors::{SearchError, SearchResult};

static NEXT_CAPTURE_ID: AtomicU64 = AtomicU64::new(0);

/// Name of the capture group that isolates the real match in whole-word mode.
///
/// Always a valid regex group name: an ASCII letter or `_` followed by ASCII
/// letters, digits or `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CaptureId(String);

impl CaptureId {
    /// Validates a caller-supplied identifier
    pub fn new(id: impl Into<String>) -> SearchResult<Self> {
        let id = id.into();
        let mut chars = id.chars();
        let valid_head = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if !valid_head || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(SearchError::invalid_capture_id(id));
        }
        Ok(Self(id))
    }

    /// A process-unique identifier
    pub fn generate() -> Self {
        let n = NEXT_CAPTURE_ID.fetch_add(1, Ordering::Relaxed);
        Self(format!("fragscout_match_{}", n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CaptureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw query text plus mode flags. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    raw_text: String,
    use_regex: bool,
    case_insensitive: bool,
    whole_word: bool,
    capture_id: CaptureId,
}

impl SearchQuery {
    /// A literal, case-sensitive query with a freshly generated capture id
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            use_regex: false,
            case_insensitive: false,
            whole_word: false,
            capture_id: CaptureId::generate(),
        }
    }

    pub fn regex(mut self, yes: bool) -> Self {
        self.use_regex = yes;
        self
    }

    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    pub fn whole_word(mut self, yes: bool) -> Self {
        self.whole_word = yes;
        self
    }

    pub fn with_capture_id(mut self, capture_id: CaptureId) -> Self {
        self.capture_id = capture_id;
        self
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn uses_regex(&self) -> bool {
        self.use_regex
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn is_whole_word(&self) -> bool {
        self.whole_word
    }

    pub fn capture_id(&self) -> &CaptureId {
        &self.capture_id
    }

    pub fn is_empty(&self) -> bool {
        self.raw_text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_id_validation() {
        assert!(CaptureId::new("searchResult").is_ok());
        assert!(CaptureId::new("_hit_2").is_ok());

        assert!(CaptureId::new("").is_err());
        assert!(CaptureId::new("2nd").is_err());
        assert!(CaptureId::new("has space").is_err());
        assert!(CaptureId::new("dash-ed").is_err());
        assert!(CaptureId::new("ünicode").is_err());
    }

    #[test]
    fn test_generated_ids_are_unique_and_valid() {
        let a = CaptureId::generate();
        let b = CaptureId::generate();
        assert_ne!(a, b);
        assert!(CaptureId::new(a.as_str()).is_ok());
        assert!(a.to_string().starts_with("fragscout_match_"));
    }

    #[test]
    fn test_query_builder() {
        let id = CaptureId::new("hit").unwrap();
        let query = SearchQuery::new("c.t")
            .regex(true)
            .case_insensitive(true)
            .whole_word(true)
            .with_capture_id(id.clone());

        assert_eq!(query.raw_text(), "c.t");
        assert!(query.uses_regex());
        assert!(query.is_case_insensitive());
        assert!(query.is_whole_word());
        assert_eq!(query.capture_id(), &id);
        assert!(!query.is_empty());
    }

    #[test]
    fn test_query_defaults() {
        let query = SearchQuery::new("");
        assert!(!query.uses_regex());
        assert!(!query.is_case_insensitive());
        assert!(!query.is_whole_word());
        assert!(query.is_empty());
    }
}

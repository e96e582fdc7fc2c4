use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::sync::Arc;
use tracing::debug;

use super::boundary::WordBoundary;
use super::extractor::LineMatches;
use crate::errors::{SearchError, SearchResult};
use crate::metrics::SearchMetrics;
use crate::query::{CaptureId, SearchQuery};

/// Upper bound on cached patterns; the cache is emptied when it is reached
const MAX_CACHED_PATTERNS: usize = 1024;

/// Cache identity of a pattern. The capture id is not part of it, so queries
/// that differ only in their id share one compiled regex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PatternKey {
    text: String,
    boundary: Option<String>,
    case_insensitive: bool,
}

#[derive(Debug, Clone)]
struct CachedPattern {
    regex: Arc<Regex>,
    capture_id: Option<CaptureId>,
}

static PATTERN_CACHE: Lazy<DashMap<PatternKey, CachedPattern>> = Lazy::new(DashMap::new);

/// Flags the pattern was compiled with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternFlags {
    /// Always set: the pattern is applied repeatedly along a line
    pub global: bool,
    pub case_insensitive: bool,
}

/// A query compiled once and shared by every document of a search.
///
/// `capture_id` is `Some` exactly when the query asked for whole words; the
/// named group then holds the word without its flanking separators.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Arc<Regex>,
    flags: PatternFlags,
    capture_id: Option<CaptureId>,
}

impl CompiledPattern {
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn flags(&self) -> PatternFlags {
        self.flags
    }

    pub fn capture_id(&self) -> Option<&CaptureId> {
        self.capture_id.as_ref()
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Lazily yields the matches of this pattern in one line
    pub fn find_in_line<'p, 'l>(&'p self, line: &'l str) -> LineMatches<'p, 'l> {
        LineMatches::new(self, line)
    }
}

/// Turns a [`SearchQuery`] into a [`CompiledPattern`]
#[derive(Debug, Clone, Default)]
pub struct PatternCompiler {
    boundary: WordBoundary,
    metrics: SearchMetrics,
}

impl PatternCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(metrics: SearchMetrics) -> Self {
        Self {
            boundary: WordBoundary::default(),
            metrics,
        }
    }

    pub fn with_boundary(mut self, boundary: WordBoundary) -> Self {
        self.boundary = boundary;
        self
    }

    fn text_for(query: &SearchQuery) -> String {
        if query.uses_regex() {
            query.raw_text().to_string()
        } else {
            regex::escape(query.raw_text())
        }
    }

    fn key_for(&self, query: &SearchQuery) -> PatternKey {
        PatternKey {
            text: Self::text_for(query),
            boundary: query.is_whole_word().then(|| self.boundary.pattern()),
            case_insensitive: query.is_case_insensitive(),
        }
    }

    /// Builds the final regex source for `query`
    pub fn source_for(&self, query: &SearchQuery) -> String {
        // Escape first so the boundary syntax added below stays live
        let text = Self::text_for(query);

        if query.is_whole_word() {
            let boundary = self.boundary.pattern();
            format!(
                "{}(?P<{}>{}){}",
                boundary,
                query.capture_id(),
                text,
                boundary
            )
        } else {
            text
        }
    }

    /// Compiles `query`, failing with `InvalidPattern` if the text is not a valid regex.
    ///
    /// On a cache hit the returned pattern keeps the capture id it was first
    /// compiled with, which may differ from `query.capture_id()`.
    pub fn compile(&self, query: &SearchQuery) -> SearchResult<CompiledPattern> {
        let key = self.key_for(query);
        let case_insensitive = key.case_insensitive;

        let cached = PATTERN_CACHE.get(&key).map(|entry| entry.clone());
        let cached = match cached {
            Some(cached) => {
                self.metrics.record_cache_lookup(true);
                cached
            }
            None => {
                let source = self.source_for(query);
                debug!("Compiling pattern: {}", source);
                let regex = RegexBuilder::new(&source)
                    .case_insensitive(case_insensitive)
                    .build()
                    .map_err(|e| SearchError::invalid_pattern(e.to_string()))?;
                self.metrics.record_cache_lookup(false);

                let cached = CachedPattern {
                    regex: Arc::new(regex),
                    capture_id: query
                        .is_whole_word()
                        .then(|| query.capture_id().clone()),
                };
                if PATTERN_CACHE.len() >= MAX_CACHED_PATTERNS {
                    debug!("Pattern cache full, clearing {} entries", PATTERN_CACHE.len());
                    PATTERN_CACHE.clear();
                }
                PATTERN_CACHE.insert(key, cached.clone());
                cached
            }
        };

        Ok(CompiledPattern {
            regex: cached.regex,
            flags: PatternFlags {
                global: true,
                case_insensitive,
            },
            capture_id: cached.capture_id,
        })
    }
}

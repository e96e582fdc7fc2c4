/// Recognition and exclusion rules for corpus documents.
///
/// A file is a corpus document iff its name, compared case-insensitively,
/// ends with a fragment or note extension, or equals the config file name.
/// Ignore patterns and scopes narrow that set further; both are matched
/// against the path relative to the corpus root with `/` separators.
use glob::Pattern;
use std::path::{Path, PathBuf};

use crate::config::SearchConfig;
use crate::errors::{SearchError, SearchResult};
use crate::results::FileKind;

#[derive(Debug, Clone)]
pub struct CorpusFilter {
    fragment_suffixes: Vec<String>,
    note_suffixes: Vec<String>,
    config_file_name: String,
    ignore_patterns: Vec<Pattern>,
    scopes: Vec<PathBuf>,
}

impl Default for CorpusFilter {
    fn default() -> Self {
        Self {
            fragment_suffixes: vec![".wt".to_string()],
            note_suffixes: vec![".wtnote".to_string()],
            config_file_name: ".config".to_string(),
            ignore_patterns: Vec::new(),
            scopes: Vec::new(),
        }
    }
}

fn suffixes(extensions: &[String]) -> Vec<String> {
    extensions
        .iter()
        .map(|ext| format!(".{}", ext.trim_start_matches('.').to_lowercase()))
        .collect()
}

impl CorpusFilter {
    /// Builds the filter described by `config`
    pub fn from_config(config: &SearchConfig) -> SearchResult<Self> {
        let ignore_patterns = config
            .ignore_patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| {
                    SearchError::config_error(format!("invalid ignore pattern '{}': {}", p, e))
                })
            })
            .collect::<SearchResult<Vec<_>>>()?;

        Ok(Self {
            fragment_suffixes: suffixes(&config.fragment_extensions),
            note_suffixes: suffixes(&config.note_extensions),
            config_file_name: config.config_file_name.to_lowercase(),
            ignore_patterns,
            scopes: config.scopes.clone(),
        })
    }

    /// Determines the document kind for a file name, if it is recognized
    pub fn classify(&self, file_name: &str) -> Option<FileKind> {
        let name = file_name.to_lowercase();
        if name == self.config_file_name {
            return Some(FileKind::Config);
        }
        // Longest suffix wins so overlapping extension lists stay unambiguous
        let mut best: Option<(usize, FileKind)> = None;
        let kinds = self
            .note_suffixes
            .iter()
            .map(|s| (s, FileKind::Note))
            .chain(self.fragment_suffixes.iter().map(|s| (s, FileKind::Fragment)));
        for (suffix, kind) in kinds {
            if name.ends_with(suffix.as_str()) && best.map_or(true, |(len, _)| suffix.len() > len)
            {
                best = Some((suffix.len(), kind));
            }
        }
        best.map(|(_, kind)| kind)
    }

    /// Checks a root-relative path against the ignore patterns
    pub fn should_ignore(&self, relative: &Path) -> bool {
        if self.ignore_patterns.is_empty() {
            return false;
        }
        let normalized = relative.to_string_lossy().replace('\\', "/");
        self.ignore_patterns.iter().any(|p| p.matches(&normalized))
    }

    /// Checks that a root-relative path lies inside one of the scopes
    pub fn in_scope(&self, relative: &Path) -> bool {
        self.scopes.is_empty() || self.scopes.iter().any(|scope| relative.starts_with(scope))
    }

    /// Full inclusion decision for a file found at `relative`
    pub fn include(&self, relative: &Path, file_name: &str) -> Option<FileKind> {
        let kind = self.classify(file_name)?;
        if self.should_ignore(relative) || !self.in_scope(relative) {
            return None;
        }
        Some(kind)
    }
}

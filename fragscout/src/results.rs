/// Search result types.
///
/// A search produces a flat list of [`MatchLocation`]s. Matches from one
/// document keep their line/column order, but documents complete in whatever
/// order their loads finish, so the list as a whole carries no file order.
/// Use [`SearchOutput::by_file`] or [`SearchOutput::sorted`] when a stable
/// presentation is needed.
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Kind of a recognized corpus document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Fragment,
    Note,
    Config,
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FileKind::Fragment => "fragment",
            FileKind::Note => "note",
            FileKind::Config => "config",
        };
        f.write_str(label)
    }
}

/// Identity of one discovered document
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FileEntry {
    /// Path handed back to the corpus source when loading
    pub path: PathBuf,
    /// Document kind determined at discovery time
    pub kind: FileKind,
}

impl FileEntry {
    pub fn new(path: impl Into<PathBuf>, kind: FileKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Path relative to `root`, or the full path if it lies elsewhere
    pub fn relative_to(&self, root: &Path) -> &Path {
        self.path.strip_prefix(root).unwrap_or(self.path.as_path())
    }
}

/// A single match: one document, one line, a half-open character range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchLocation {
    pub file: FileEntry,
    /// 0-based line index
    pub line: usize,
    /// 0-based character offset of the first matched character
    pub start_column: usize,
    /// 0-based character offset one past the last matched character
    pub end_column: usize,
    /// The matched text, without any whole-word separators
    pub matched_text: String,
}

impl MatchLocation {
    pub fn len(&self) -> usize {
        self.end_column - self.start_column
    }

    pub fn is_empty(&self) -> bool {
        self.start_column >= self.end_column
    }
}

/// The complete result of one search
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchOutput {
    /// Every match, grouped per document in completion order
    pub matches: Vec<MatchLocation>,
    /// Total number of matches found
    pub total_matches: usize,
    /// Total number of documents scanned
    pub files_scanned: usize,
    /// Number of documents with at least one match
    pub files_with_matches: usize,
}

impl SearchOutput {
    /// Creates a new empty search output
    pub fn new() -> Self {
        Default::default()
    }

    /// Appends the matches of one scanned document
    pub fn add_file_matches(&mut self, matches: Vec<MatchLocation>) {
        self.files_scanned += 1;
        if !matches.is_empty() {
            self.total_matches += matches.len();
            self.files_with_matches += 1;
        }
        self.matches.extend(matches);
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Matches grouped by document path, in path order
    pub fn by_file(&self) -> BTreeMap<&Path, Vec<&MatchLocation>> {
        let mut grouped: BTreeMap<&Path, Vec<&MatchLocation>> = BTreeMap::new();
        for m in &self.matches {
            grouped.entry(m.file.path.as_path()).or_default().push(m);
        }
        grouped
    }

    /// Matches in (path, line, column) order
    pub fn sorted(&self) -> Vec<&MatchLocation> {
        let mut all: Vec<&MatchLocation> = self.matches.iter().collect();
        all.sort_by(|a, b| {
            (&a.file.path, a.line, a.start_column).cmp(&(&b.file.path, b.line, b.start_column))
        });
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(path: &str, line: usize, start: usize, end: usize, text: &str) -> MatchLocation {
        MatchLocation {
            file: FileEntry::new(path, FileKind::Fragment),
            line,
            start_column: start,
            end_column: end,
            matched_text: text.to_string(),
        }
    }

    #[test]
    fn test_match_creation() {
        let m = location("chapter1.wt", 42, 4, 9, "Hello");

        assert_eq!(m.line, 42);
        assert_eq!(m.len(), 5);
        assert!(!m.is_empty());
        assert_eq!(m.file.kind, FileKind::Fragment);
    }

    #[test]
    fn test_search_output_new() {
        let result = SearchOutput::new();
        assert_eq!(result.total_matches, 0);
        assert_eq!(result.files_scanned, 0);
        assert_eq!(result.files_with_matches, 0);
        assert!(result.is_empty());
    }

    #[test]
    fn test_search_output_add_file_matches() {
        let mut result = SearchOutput::new();

        result.add_file_matches(vec![
            location("a.wt", 0, 0, 5, "Hello"),
            location("a.wt", 1, 0, 5, "Hello"),
        ]);
        assert_eq!(result.total_matches, 2);
        assert_eq!(result.files_scanned, 1);
        assert_eq!(result.files_with_matches, 1);

        // A document without matches still counts as scanned
        result.add_file_matches(vec![]);
        assert_eq!(result.total_matches, 2);
        assert_eq!(result.files_scanned, 2);
        assert_eq!(result.files_with_matches, 1);
    }

    #[test]
    fn test_by_file_and_sorted() {
        let mut result = SearchOutput::new();
        result.add_file_matches(vec![
            location("b.wt", 3, 1, 2, "x"),
            location("b.wt", 3, 5, 6, "x"),
        ]);
        result.add_file_matches(vec![location("a.wt", 7, 0, 1, "x")]);

        let grouped = result.by_file();
        let paths: Vec<&Path> = grouped.keys().copied().collect();
        assert_eq!(paths, vec![Path::new("a.wt"), Path::new("b.wt")]);
        assert_eq!(grouped[Path::new("b.wt")].len(), 2);

        let sorted = result.sorted();
        assert_eq!(sorted[0].file.path, PathBuf::from("a.wt"));
        assert_eq!(sorted[1].start_column, 1);
        assert_eq!(sorted[2].start_column, 5);
    }

    #[test]
    fn test_relative_to() {
        let entry = FileEntry::new("/novel/data/chapters/one.wt", FileKind::Fragment);
        assert_eq!(
            entry.relative_to(Path::new("/novel")),
            Path::new("data/chapters/one.wt")
        );
        assert_eq!(
            entry.relative_to(Path::new("/elsewhere")),
            Path::new("/novel/data/chapters/one.wt")
        );
    }

    #[test]
    fn test_file_kind_display() {
        assert_eq!(FileKind::Fragment.to_string(), "fragment");
        assert_eq!(FileKind::Note.to_string(), "note");
        assert_eq!(FileKind::Config.to_string(), "config");
    }
}

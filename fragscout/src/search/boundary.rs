use std::collections::BTreeSet;

/// Separator characters recognized around whole words, besides whitespace
pub const DEFAULT_SEPARATORS: &[char] = &[
    '.', '?', ':', ';', ',', '(', ')', '!', '&', '+', '-', '"', '\'', '^', '_', '*', '~',
];

/// The set of characters that may flank a whole-word match.
///
/// The generated sub-pattern consumes exactly one separator character, or
/// matches the empty string at the start or end of the line. It is not a
/// zero-width assertion, so matches built with it include the separators and
/// callers must isolate the word through a capture group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordBoundary {
    separators: BTreeSet<char>,
    whitespace: bool,
}

impl Default for WordBoundary {
    fn default() -> Self {
        Self {
            separators: DEFAULT_SEPARATORS.iter().copied().collect(),
            whitespace: true,
        }
    }
}

impl WordBoundary {
    /// A boundary made of exactly `separators`, with or without whitespace
    pub fn new(separators: impl IntoIterator<Item = char>, whitespace: bool) -> Self {
        Self {
            separators: separators.into_iter().collect(),
            whitespace,
        }
    }

    /// Separators as a string, in character order
    pub fn separators(&self) -> String {
        self.separators.iter().collect()
    }

    /// Regex source for one boundary: `(?:^|[...]|$)`
    pub fn pattern(&self) -> String {
        let mut class = String::new();
        for c in &self.separators {
            class.push_str(&regex::escape(&c.to_string()));
        }
        if self.whitespace {
            class.push_str(r"\s");
        }

        if class.is_empty() {
            "(?:^|$)".to_string()
        } else {
            format!("(?:^|[{}]|$)", class)
        }
    }
}

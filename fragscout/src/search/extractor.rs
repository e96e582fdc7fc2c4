use std::ops::Range;

use super::compiler::CompiledPattern;
use crate::results::{FileEntry, MatchLocation};

/// One match inside a line, in character columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMatch<'l> {
    pub start_column: usize,
    pub end_column: usize,
    pub text: &'l str,
}

/// Converts increasing byte offsets of a line into character columns
#[derive(Debug, Clone, Copy, Default)]
struct ColumnCursor {
    byte: usize,
    column: usize,
}

impl ColumnCursor {
    fn advance_to(&mut self, line: &str, byte: usize) -> usize {
        if byte < self.byte {
            *self = Self::default();
        }
        self.column += line[self.byte..byte].chars().count();
        self.byte = byte;
        self.column
    }
}

/// Successive matches of a compiled pattern in one line.
///
/// The search position is an explicit cursor owned by this iterator, so a
/// compiled pattern can be shared by every line and document. Iteration stops
/// as soon as a match starts where the previous one started, which is what a
/// zero-width match does when the cursor cannot advance; at most
/// `line.len() + 1` matches are attempted.
#[derive(Debug)]
pub struct LineMatches<'p, 'l> {
    pattern: &'p CompiledPattern,
    line: &'l str,
    cursor: usize,
    last_start: Option<usize>,
    columns: ColumnCursor,
    finished: bool,
}

impl<'p, 'l> LineMatches<'p, 'l> {
    pub fn new(pattern: &'p CompiledPattern, line: &'l str) -> Self {
        Self {
            pattern,
            line,
            cursor: 0,
            last_start: None,
            columns: ColumnCursor::default(),
            finished: false,
        }
    }

    /// Next raw match as (full match range, real match range)
    fn next_raw(&self) -> Option<(Range<usize>, Range<usize>)> {
        let regex = self.pattern.regex();
        match self.pattern.capture_id() {
            Some(id) => {
                let caps = regex.captures_at(self.line, self.cursor)?;
                let full = caps.get(0)?.range();
                // Separators consumed by the boundary sit outside the named group
                let real = caps
                    .name(id.as_str())
                    .map(|m| m.range())
                    .unwrap_or(full.start..full.start);
                Some((full, real))
            }
            None => {
                let full = regex.find_at(self.line, self.cursor)?.range();
                Some((full.clone(), full))
            }
        }
    }
}

impl<'p, 'l> Iterator for LineMatches<'p, 'l> {
    type Item = LineMatch<'l>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            if self.cursor > self.line.len() {
                self.finished = true;
                break;
            }

            let Some((full, real)) = self.next_raw() else {
                self.finished = true;
                break;
            };

            if self.last_start == Some(full.start) {
                self.finished = true;
                break;
            }
            self.last_start = Some(full.start);
            self.cursor = full.end;

            if real.start < real.end {
                let start_column = self.columns.advance_to(self.line, real.start);
                let end_column = self.columns.advance_to(self.line, real.end);
                return Some(LineMatch {
                    start_column,
                    end_column,
                    text: &self.line[real],
                });
            }
        }
        None
    }
}

/// Runs `pattern` over every line of a document.
///
/// Returns the matches in ascending line and column order, plus the number of
/// lines scanned.
pub fn match_document(
    entry: &FileEntry,
    text: &str,
    pattern: &CompiledPattern,
) -> (Vec<MatchLocation>, usize) {
    let mut matches = Vec::new();
    let mut lines = 0;

    for (line_index, line) in text.lines().enumerate() {
        lines += 1;
        for m in pattern.find_in_line(line) {
            matches.push(MatchLocation {
                file: entry.clone(),
                line: line_index,
                start_column: m.start_column,
                end_column: m.end_column,
                matched_text: m.text.to_string(),
            });
        }
    }

    (matches, lines)
}

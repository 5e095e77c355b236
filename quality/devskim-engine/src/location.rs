//! Source locations
//!
//! Findings use 1-based lines and 0-based columns counted in UTF-16 code
//! units, which is what editors speaking LSP expect for `character`.

use serde::{Deserialize, Serialize};

/// A point in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// 1-based line
    pub line: u32,
    /// 0-based column in UTF-16 code units
    pub column: u32,
}

impl Location {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Maps byte offsets of a text to [`Location`]s
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.char_indices()
                .filter(|(_, c)| *c == '\n')
                .map(|(i, _)| i + 1),
        );
        Self { text, line_starts }
    }

    /// Location of a byte offset (clamped to the text length)
    pub fn location(&self, offset: usize) -> Location {
        let offset = offset.min(self.text.len());
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let start = self.line_starts[line_idx];
        let column: usize = self.text[start..offset]
            .chars()
            .map(char::len_utf16)
            .sum();

        Location::new(line_idx as u32 + 1, column as u32)
    }

    /// Text between a byte offset and the end of its line
    pub fn rest_of_line(&self, offset: usize) -> &'a str {
        let offset = offset.min(self.text.len());
        let tail = &self.text[offset..];
        let end = tail.find('\n').unwrap_or(tail.len());
        tail[..end].trim_end_matches('\r')
    }
}

//! Line-indexed view of the editor document
//!
//! Offsets follow the host editor: UTF-16 code units, with every line break
//! (`\n`, `\r\n` or a lone `\r`) counting as a single unit.

use serde::{Deserialize, Serialize};

/// One line of the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSpan {
    /// 1-based line number
    pub number: usize,
    /// Offset of the first character of the line
    pub from: usize,
    /// Offset just past the last character (line break excluded)
    pub to: usize,
}

impl LineSpan {
    pub fn len(&self) -> usize {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }
}

/// Minimal read interface the diagnostic adapter needs
pub trait TextCore {
    /// Number of lines (an empty document has one)
    fn line_count(&self) -> usize;

    /// Line by 1-based number
    fn line(&self, number: usize) -> Option<LineSpan>;

    /// Total length in offset units
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Line-offset table built from a snapshot of the document text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineTable {
    lines: Vec<LineSpan>,
    len: usize,
}

impl LineTable {
    pub fn from_str(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut offset = 0;
        let mut line_start = 0;
        let mut chars = text.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '\r' | '\n' => {
                    if ch == '\r' && chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    lines.push(LineSpan {
                        number: lines.len() + 1,
                        from: line_start,
                        to: offset,
                    });
                    offset += 1;
                    line_start = offset;
                }
                _ => offset += ch.len_utf16(),
            }
        }

        lines.push(LineSpan {
            number: lines.len() + 1,
            from: line_start,
            to: offset,
        });

        Self { lines, len: offset }
    }

    pub fn lines(&self) -> &[LineSpan] {
        &self.lines
    }
}

impl TextCore for LineTable {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, number: usize) -> Option<LineSpan> {
        number
            .checked_sub(1)
            .and_then(|index| self.lines.get(index))
            .copied()
    }

    fn len(&self) -> usize {
        self.len
    }
}

//! Source locations.
//!
//! A [`Position`] is what the lexer stamps on every token: a 1-based line, a
//! 0-based column and the absolute character index from the start of the
//! file. A [`Span`] is a half-open range of character indices, used when a
//! renderer needs to underline a region of the source.

use std::{fmt, ops::Range};

/// A point in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    line: u32,
    offset: u32,
    index: usize,
}

impl Position {
    /// Create a new position.
    ///
    /// # Arguments
    ///
    /// * `line` - 1-based line number
    /// * `offset` - 0-based character column within the line
    /// * `index` - 0-based character index from the start of the file
    pub fn new(line: u32, offset: u32, index: usize) -> Self {
        Self {
            line,
            offset,
            index,
        }
    }

    /// The position of the first character of a file.
    pub fn start() -> Self {
        Self::new(1, 0, 0)
    }

    /// Get the 1-based line number.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Get the 0-based column.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Get the absolute character index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Return the position reached after reading `text` from this position.
    ///
    /// Line breaks inside `text` move to the next line and reset the column.
    pub fn advance_over(&self, text: &str) -> Self {
        let mut next = *self;
        for c in text.chars() {
            next.index += 1;
            if c == '\n' {
                next.line += 1;
                next.offset = 0;
            } else {
                next.offset += 1;
            }
        }
        next
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.offset)
    }
}

/// A half-open range of character indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Create a new span from a range
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end.max(range.start),
        }
    }

    /// Get the start offset of the span
    pub fn start(&self) -> usize {
        self.start
    }

    /// Get the end offset of the span
    pub fn end(&self) -> usize {
        self.end
    }

    /// Get the length of the span
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Create a union of two spans (encompassing both)
    pub fn union(&self, other: Span) -> Span {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

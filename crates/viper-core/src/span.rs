//! Source location tracking for diagnostics.
//!
//! Provides [`Span`] to track where AST nodes start in the source text. The
//! code generator only ever reads the line, but the column is kept so errors
//! can point at the exact construct.

use std::fmt;

/// A span of source code, represented by its starting position.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Line number (1-indexed; 0 is reserved for synthesized entry code).
    pub line: u32,
    /// Column number (1-indexed, byte-based).
    pub col: u32,
    /// Length in bytes.
    pub len: u32,
}

impl Span {
    /// Create a new span from a line, column, and length.
    #[inline]
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self { line, col, len }
    }

    /// Create a zero-length span at a position.
    #[inline]
    pub fn point(line: u32, col: u32) -> Self {
        Self { line, col, len: 0 }
    }

    /// Create a zero-length span at the first column of a line.
    #[inline]
    pub fn line(line: u32) -> Self {
        Self::point(line, 1)
    }

    /// Whether this span is empty (zero length).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The length of this span in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Merge two spans into one that starts at the earlier one and covers both.
    ///
    /// Spans on different lines keep the first span's position and add the lengths.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        if self.line == other.line {
            let start_col = self.col.min(other.col);
            let end_col = (other.col + other.len).max(self.col + self.len);
            Span {
                line: self.line,
                col: start_col,
                len: end_col - start_col,
            }
        } else {
            Span {
                line: self.line,
                col: self.col,
                len: self.len + other.len,
            }
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

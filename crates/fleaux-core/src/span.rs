//! Source location tracking for error reporting.
//!
//! Provides [`Span`] to track where tokens and errors occur in source code.

use std::fmt;

/// A span of source code.
///
/// Carries both the byte range (`offset`, `len`) and the human-facing
/// `line:col` of its first byte, so diagnostics never need to re-scan the
/// source to locate an error.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the first byte from the start of the source.
    pub offset: u32,
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, byte-based).
    pub col: u32,
    /// Length in bytes.
    pub len: u32,
}

impl Span {
    /// Create a new span.
    #[inline]
    pub fn new(offset: u32, line: u32, col: u32, len: u32) -> Self {
        Self {
            offset,
            line,
            col,
            len,
        }
    }

    /// Create a zero-length span at a position.
    #[inline]
    pub fn point(offset: u32, line: u32, col: u32) -> Self {
        Self {
            offset,
            line,
            col,
            len: 0,
        }
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

    /// Byte offset one past the last byte of this span.
    #[inline]
    pub fn end(&self) -> u32 {
        self.offset + self.len
    }

    /// The byte range covered by this span, for slicing the source.
    #[inline]
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset as usize..self.end() as usize
    }

    /// Merge two spans into one covering both.
    ///
    /// The line and column come from whichever span starts first.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        let first = if self.offset <= other.offset { self } else { other };
        let end = self.end().max(other.end());
        Span {
            offset: first.offset,
            line: first.line,
            col: first.col,
            len: end - first.offset,
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

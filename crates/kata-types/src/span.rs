use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location span.
///
/// `start`/`end` are byte offsets into the original source text. The
/// iteration-guard transformer splices the source string at these offsets,
/// so they must stay stable against the *original* source for the lifetime
/// of one assessment attempt. `line`/`col` locate the start of the span and
/// are 1-based for human-readable error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub col: u32,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize, line: u32, col: u32) -> Self {
        Self {
            start,
            end,
            line,
            col,
        }
    }

    /// Create a zero-width span at a single position.
    pub fn point(offset: usize, line: u32, col: u32) -> Self {
        Self::new(offset, offset, line, col)
    }

    /// Merge two spans into one that covers both.
    ///
    /// The merged span starts at whichever span begins earlier and keeps
    /// that span's line/column.
    pub fn merge(self, other: Span) -> Span {
        let (line, col) = if self.start <= other.start {
            (self.line, self.col)
        } else {
            (other.line, other.col)
        };
        Span::new(
            self.start.min(other.start),
            self.end.max(other.end),
            line,
            col,
        )
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_point() {
        let s = Span::point(7, 1, 8);
        assert_eq!(s.start, 7);
        assert_eq!(s.end, 7);
        assert_eq!(s.line, 1);
        assert_eq!(s.col, 8);
    }

    #[test]
    fn test_span_merge() {
        let a = Span::new(4, 10, 1, 5);
        let b = Span::new(12, 20, 2, 3);
        let merged = a.merge(b);
        assert_eq!(merged.start, 4);
        assert_eq!(merged.end, 20);
        assert_eq!(merged.line, 1);
        assert_eq!(merged.col, 5);
    }

    #[test]
    fn test_span_merge_reversed() {
        let a = Span::new(12, 20, 2, 3);
        let b = Span::new(4, 10, 1, 5);
        let merged = a.merge(b);
        assert_eq!(merged.start, 4);
        assert_eq!(merged.end, 20);
        assert_eq!(merged.line, 1);
        assert_eq!(merged.col, 5);
    }

    #[test]
    fn test_span_display() {
        let s = Span::new(30, 38, 3, 7);
        assert_eq!(format!("{s}"), "3:7");
    }
}

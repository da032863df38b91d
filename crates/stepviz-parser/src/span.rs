//! Byte ranges into the parsed source.

use std::{fmt, ops::Range};

/// A byte range in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Creates a span from a byte range. A reversed range is normalized.
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start.min(range.end),
            end: range.start.max(range.end),
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both spans.
    pub fn union(&self, other: Span) -> Span {
        Self::new(self.start.min(other.start)..self.end.max(other.end))
    }

    /// Byte offset of a 1-based line and column as reported by `serde_json`.
    ///
    /// Positions past the end of the source resolve to the source length.
    pub fn offset_of(source: &str, line: usize, column: usize) -> usize {
        if line == 0 {
            return 0;
        }

        let line_start = source
            .split_inclusive('\n')
            .take(line - 1)
            .map(str::len)
            .sum::<usize>();

        let offset = line_start + column.saturating_sub(1);
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }

    /// One-character span at `offset`, or an empty span at the end of input.
    pub fn at(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let width = source[offset..].chars().next().map_or(0, char::len_utf8);
        Self::new(offset..offset + width)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_basics() {
        let span = Span::new(4..10);
        assert_eq!(span.start(), 4);
        assert_eq!(span.end(), 10);
        assert_eq!(span.len(), 6);
        assert!(!span.is_empty());
        assert!(Span::default().is_empty());
        assert_eq!(span.to_string(), "4..10");
    }

    #[test]
    fn test_span_union() {
        let span = Span::new(4..6).union(Span::new(1..3));
        assert_eq!(span, Span::new(1..6));
    }

    #[test]
    fn test_offset_of_line_and_column() {
        let source = "{\n  \"a\": 1,\n  \"b\": x\n}";
        // `x` on line 3, column 8
        let offset = Span::offset_of(source, 3, 8);
        assert_eq!(&source[offset..offset + 1], "x");
    }

    #[test]
    fn test_offset_of_clamps_to_source() {
        assert_eq!(Span::offset_of("{}", 9, 9), 2);
        assert_eq!(Span::offset_of("{}", 0, 0), 0);
    }

    #[test]
    fn test_span_at_end_of_input_is_empty() {
        assert!(Span::at("{}", 2).is_empty());
        assert_eq!(Span::at("{}", 0).len(), 1);
    }
}

//! Source locations.
//!
//! Offsets are bytes into the UTF-8 source. Lines are 1-indexed and columns
//! are 0-indexed byte columns, the same convention JavaScript tooling uses
//! for `loc`.

use serde::{Deserialize, Serialize};

/// A line/column position in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (0-indexed, in bytes).
    pub column: u32,
}

impl Position {
    /// Creates a new position.
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A half-open byte range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: u32,
    /// End byte offset (exclusive).
    pub end: u32,
}

impl Span {
    /// Creates a new span.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Creates an empty span at `offset`.
    #[inline]
    pub const fn empty(offset: u32) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Returns the length of the span in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Returns true if the span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if this span contains the given offset.
    #[inline]
    pub const fn contains(&self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Returns true if the two spans share at least one byte.
    #[inline]
    pub const fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns the smallest span covering both spans.
    #[inline]
    pub const fn merge(&self, other: &Span) -> Span {
        Span {
            start: if self.start < other.start {
                self.start
            } else {
                other.start
            },
            end: if self.end > other.end {
                self.end
            } else {
                other.end
            },
        }
    }

    /// The gap between the end of `self` and the start of `next`.
    ///
    /// Returns an empty span at `self.end` when the spans touch or overlap.
    #[inline]
    pub const fn gap_to(&self, next: &Span) -> Span {
        if next.start > self.end {
            Span::new(self.end, next.start)
        } else {
            Span::empty(self.end)
        }
    }

    /// Slices `source` with this span, returning `None` when out of bounds or
    /// not on a character boundary.
    pub fn slice<'s>(&self, source: &'s str) -> Option<&'s str> {
        source.get(self.start as usize..self.end as usize)
    }
}

/// Start and end positions of a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// Start position.
    pub start: Position,
    /// End position.
    pub end: Position,
}

impl Location {
    /// Creates a new location.
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// Maps byte offsets to line/column positions.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    line_starts: Vec<u32>,
    len: u32,
}

impl LineIndex {
    /// Builds the index for `source`.
    ///
    /// `\n`, `\r\n`, lone `\r`, U+2028 and U+2029 all terminate a line.
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        let bytes = source.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => line_starts.push(i as u32 + 1),
                b'\r' => {
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    line_starts.push(i as u32 + 1);
                }
                // U+2028 / U+2029 are encoded as E2 80 A8 / E2 80 A9
                0xE2 if bytes.get(i + 1) == Some(&0x80)
                    && matches!(bytes.get(i + 2), Some(0xA8 | 0xA9)) =>
                {
                    i += 2;
                    line_starts.push(i as u32 + 1);
                }
                _ => {}
            }
            i += 1;
        }

        Self {
            line_starts,
            len: source.len() as u32,
        }
    }

    /// Number of lines in the source.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Position of a byte offset. Offsets past the end clamp to the end.
    pub fn position(&self, offset: u32) -> Position {
        let offset = offset.min(self.len);
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        Position::new(line as u32, offset - line_start)
    }

    /// Location of a span.
    pub fn location(&self, span: Span) -> Location {
        Location::new(self.position(span.start), self.position(span.end))
    }
}

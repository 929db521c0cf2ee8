//! Source location spans.

use std::fmt;

/// Half-open byte range into a source file.
///
/// Layout: 8 bytes total. Token and AST nodes store spans; line/column
/// information is carried separately by [`SourcePos`] where diagnostics
/// need it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Dummy span for synthesized nodes.
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Length of the span in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merge two spans into one covering both.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Full source position: byte offset plus 1-based line and column.
///
/// Every diagnostic carries one of these. Tokens record their position so
/// later stages never have to re-scan the source.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct SourcePos {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

impl SourcePos {
    pub const fn new(offset: u32, line: u32, column: u32) -> Self {
        SourcePos {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

crate::static_assert_size!(Span, 8);
crate::static_assert_size!(SourcePos, 12);

#[cfg(test)]
mod tests;

//! Byte cursor over the source with line/column tracking.

use script_ir::SourcePos;

/// Cursor advancing byte-by-byte through the source.
///
/// Operates on bytes; multi-byte UTF-8 sequences only ever appear inside
/// string literals and comments, where the scanner copies them through
/// unchanged. Columns count bytes, matching the positions the parser
/// reports.
pub struct Cursor<'src> {
    source: &'src [u8],
    pos: usize,
    line: u32,
    column: u32,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Cursor {
            source: source.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Current byte, or 0 at end of input.
    #[inline]
    pub fn current(&self) -> u8 {
        self.source.get(self.pos).copied().unwrap_or(0)
    }

    /// Byte after the current one, or 0 past the end.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.source.get(self.pos + 1).copied().unwrap_or(0)
    }

    /// Full source position at the cursor.
    #[inline]
    pub fn source_pos(&self) -> SourcePos {
        SourcePos::new(self.pos as u32, self.line, self.column)
    }

    /// Advance one byte, updating line/column.
    #[inline]
    pub fn advance(&mut self) {
        if let Some(&b) = self.source.get(self.pos) {
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    /// Advance while `pred` holds for the current byte.
    pub fn advance_while(&mut self, pred: impl Fn(u8) -> bool) {
        while !self.at_end() && pred(self.current()) {
            self.advance();
        }
    }

    /// Text of the byte range `start..self.pos()`.
    pub fn slice_from(&self, start: usize) -> &'src str {
        // The scanner only slices at token boundaries, which are ASCII.
        std::str::from_utf8(&self.source[start..self.pos]).expect("token slice is valid UTF-8")
    }
}

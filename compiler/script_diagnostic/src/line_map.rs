//! Byte-offset to line/column translation.

use script_ir::SourcePos;

/// Precomputed line starts for one source file.
///
/// Built once per compilation; `pos(offset)` is a binary search.
pub struct LineMap {
    /// Byte offset of the first character of each line.
    line_starts: Vec<u32>,
}

impl LineMap {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i as u32 + 1);
            }
        }
        LineMap { line_starts }
    }

    /// Full source position (1-based line and column) of a byte offset.
    pub fn pos(&self, offset: u32) -> SourcePos {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        SourcePos::new(offset, line as u32 + 1, offset - self.line_starts[line] + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_positions() {
        let map = LineMap::new("abc\ndef");
        assert_eq!(map.pos(0), SourcePos::new(0, 1, 1));
        assert_eq!(map.pos(2), SourcePos::new(2, 1, 3));
    }

    #[test]
    fn subsequent_lines() {
        let map = LineMap::new("abc\ndef\n\nx");
        assert_eq!(map.pos(4), SourcePos::new(4, 2, 1));
        assert_eq!(map.pos(6), SourcePos::new(6, 2, 3));
        assert_eq!(map.pos(8), SourcePos::new(8, 3, 1));
        assert_eq!(map.pos(9), SourcePos::new(9, 4, 1));
    }
}

//! Token cursor with snapshot/rewind for speculative parsing.

use script_ir::{SourcePos, Token, TokenKind, TokenList};

/// Saved cursor state; restored to roll back a speculative parse.
///
/// The pending half-shift flag is part of the state: rewinding across a
/// template argument list must also undo the virtual `>>` split.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Snapshot {
    pos: usize,
    half_shift: bool,
}

/// Cursor over the token stream shared by every fragment of a parse.
pub struct ParserCursor<'t> {
    tokens: &'t TokenList,
    pos: usize,
    /// Set when an inner template argument list has terminated at a `>>`
    /// token without consuming it: the first `>` is spent, the enclosing
    /// list owns the second and consumes the token.
    half_shift: bool,
}

impl<'t> ParserCursor<'t> {
    pub fn new(tokens: &'t TokenList) -> Self {
        debug_assert!(
            matches!(tokens.get(tokens.len().wrapping_sub(1)).map(|t| t.kind), Some(TokenKind::Eof)),
            "token list must end with Eof"
        );
        ParserCursor {
            tokens,
            pos: 0,
            half_shift: false,
        }
    }

    /// The current token. The list always ends with `Eof`, so this never
    /// runs past the end.
    #[inline]
    pub fn current(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .unwrap_or_else(|| &self.tokens[self.tokens.len() - 1])
    }

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub fn at_eof(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    /// Position (offset/line/column) of the current token.
    pub fn source_pos(&self) -> SourcePos {
        let t = self.current();
        SourcePos::new(t.span.start, t.line, t.column)
    }

    /// Consume and return the current token.
    pub fn bump(&mut self) -> Token {
        let t = *self.current();
        if t.kind != TokenKind::Eof {
            self.pos += 1;
        }
        t
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pos: self.pos,
            half_shift: self.half_shift,
        }
    }

    pub fn restore(&mut self, snap: Snapshot) {
        self.pos = snap.pos;
        self.half_shift = snap.half_shift;
    }

    #[inline]
    pub fn half_shift(&self) -> bool {
        self.half_shift
    }

    pub fn set_half_shift(&mut self, on: bool) {
        self.half_shift = on;
    }
}

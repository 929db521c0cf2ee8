//! Fragments: bounded views of the token stream.
//!
//! A fragment never owns tokens; it is a value describing where the
//! current parser must stop. Child fragments are created on the callee's
//! stack frame and share the caller's cursor, so composition is strictly
//! LIFO.
//!
//! # The `>>` split
//!
//! A template argument list ends at `>` or `>>`. A single `>>` terminates
//! *two* nested lists: the inner list, on reaching it, reports its end
//! without consuming the token and flags the cursor (`half_shift`); the
//! enclosing list then recognizes the same `>>` as its own terminator and
//! consumes it. This is the only place the raw token stream is logically
//! rewritten.

use script_ir::{Span, Token, TokenKind};

use crate::cursor::ParserCursor;
use crate::error::{ParseRes, SyntaxError};
use script_diagnostic::ErrorCode;

/// Where the active parser must stop.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Frag {
    /// The whole token stream; ends at `Eof`.
    Script,
    /// Ends right before `end`. The caller consumes the sentinel when it
    /// releases the fragment (see [`consume_sentinel`](Frag::consume_sentinel)).
    Sentinel { end: TokenKind },
    /// One element of a comma-separated list bounded by `end`: stops at
    /// the next top-level comma or at `end`.
    ListItem { end: TokenKind },
    /// Template argument list: ends at `>` or `>>`.
    /// `depth` counts enclosing template argument lists including this
    /// one; it decides whether a `>>` can be split.
    TemplateList { depth: u8 },
    /// One template argument: ends at `,` or the list end.
    TemplateArg { depth: u8 },
}

impl Frag {
    /// Statement fragment: ends at `;`.
    pub fn stmt() -> Frag {
        Frag::Sentinel {
            end: TokenKind::Semicolon,
        }
    }

    /// True when the fragment is exhausted at the cursor's position.
    pub fn at_end(&self, cursor: &ParserCursor<'_>) -> bool {
        let kind = cursor.current_kind();
        if kind == TokenKind::Eof {
            return true;
        }
        match self {
            Frag::Script => false,
            Frag::Sentinel { end } => kind == *end,
            Frag::ListItem { end } => kind == TokenKind::Comma || kind == *end,
            Frag::TemplateList { .. } => {
                kind == TokenKind::Greater || kind == TokenKind::RightShift
            }
            Frag::TemplateArg { .. } => {
                kind == TokenKind::Comma
                    || kind == TokenKind::Greater
                    || kind == TokenKind::RightShift
            }
        }
    }

    /// Read one token, failing if the fragment has ended.
    pub fn read(&self, cursor: &mut ParserCursor<'_>) -> ParseRes<Token> {
        if self.at_end(cursor) {
            return Err(SyntaxError::new(
                ErrorCode::UnexpectedFragmentEnd,
                cursor.source_pos(),
            ));
        }
        Ok(cursor.bump())
    }

    /// Peek the current token, failing if the fragment has ended.
    pub fn peek(&self, cursor: &ParserCursor<'_>) -> ParseRes<Token> {
        if self.at_end(cursor) {
            return Err(SyntaxError::new(
                ErrorCode::UnexpectedFragmentEnd,
                cursor.source_pos(),
            ));
        }
        Ok(*cursor.current())
    }

    /// Consume the sentinel of a `Sentinel` fragment.
    pub fn consume_sentinel(&self, cursor: &mut ParserCursor<'_>) -> ParseRes<Token> {
        let Frag::Sentinel { end } = self else {
            panic!("consume_sentinel on a non-sentinel fragment");
        };
        let tok = cursor.bump();
        if tok.kind != *end {
            return Err(SyntaxError::unexpected_token(&tok, Some(*end)));
        }
        Ok(tok)
    }

    /// Advance past the comma terminating a list item, if present.
    pub fn consume_comma(&self, cursor: &mut ParserCursor<'_>) {
        debug_assert!(self.at_end(cursor));
        if cursor.current_kind() == TokenKind::Comma {
            cursor.bump();
        }
    }

    /// Consume the terminator of a template argument list, returning the
    /// effective `>` token (synthetic when split out of a `>>`).
    pub fn consume_template_end(&self, cursor: &mut ParserCursor<'_>) -> ParseRes<Token> {
        let Frag::TemplateList { depth } = *self else {
            panic!("consume_template_end on a non-template fragment");
        };
        debug_assert!(self.at_end(cursor));

        let tok = *cursor.current();
        match tok.kind {
            TokenKind::Greater => Ok(cursor.bump()),
            TokenKind::RightShift => {
                if cursor.half_shift() {
                    // The inner list spent the first `>`; this list owns
                    // the second half and consumes the token.
                    cursor.set_half_shift(false);
                    cursor.bump();
                    Ok(Token::new(
                        TokenKind::Greater,
                        Span::new(tok.span.start + 1, tok.span.end),
                        tok.line,
                        tok.column + 1,
                    ))
                } else if depth >= 2 {
                    // Split: take the first `>` virtually, leave the token
                    // for the enclosing list.
                    cursor.set_half_shift(true);
                    Ok(Token::new(
                        TokenKind::Greater,
                        Span::new(tok.span.start, tok.span.start + 1),
                        tok.line,
                        tok.column,
                    ))
                } else {
                    // `>>` closing a non-nested list: not a terminator.
                    Err(SyntaxError::unexpected_token(&tok, Some(TokenKind::Greater)))
                }
            }
            _ => Err(SyntaxError::unexpected_token(&tok, Some(TokenKind::Greater))),
        }
    }

    /// Child list-item fragment of a sentinel fragment.
    pub fn list_item(&self) -> Frag {
        match self {
            Frag::Sentinel { end } => Frag::ListItem { end: *end },
            _ => panic!("list_item on a non-sentinel fragment"),
        }
    }

    /// Child template-argument fragment of a template list.
    pub fn template_arg(&self) -> Frag {
        match self {
            Frag::TemplateList { depth } => Frag::TemplateArg { depth: *depth },
            _ => panic!("template_arg on a non-template fragment"),
        }
    }
}

#[cfg(test)]
mod tests;

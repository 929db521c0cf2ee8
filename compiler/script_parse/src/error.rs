//! Syntax errors.

use std::fmt;

use script_diagnostic::{Diagnostic, ErrorCode};
use script_ir::{SourcePos, Token, TokenKind};

/// Contextual data attached to a [`SyntaxError`].
#[derive(Clone, Debug, Default)]
pub enum SyntaxErrorKind {
    #[default]
    Plain,
    /// `{expected, actual}` token pair.
    UnexpectedToken {
        actual: TokenKind,
        expected: Option<TokenKind>,
    },
    /// A keyword that cannot appear here.
    Keyword { keyword: TokenKind },
}

/// A syntax error: error code, offending position, contextual data.
///
/// Raised out-of-band (as the `Err` arm of the parser's `Result`); the
/// statement being parsed is abandoned and the program parser recovers at
/// the next statement boundary.
#[derive(Clone, Debug)]
pub struct SyntaxError {
    pub code: ErrorCode,
    pub pos: SourcePos,
    pub detail: SyntaxErrorKind,
}

impl SyntaxError {
    pub fn new(code: ErrorCode, pos: SourcePos) -> Self {
        SyntaxError {
            code,
            pos,
            detail: SyntaxErrorKind::Plain,
        }
    }

    pub fn unexpected_token(actual: &Token, expected: Option<TokenKind>) -> Self {
        SyntaxError {
            code: ErrorCode::UnexpectedToken,
            pos: SourcePos::new(actual.span.start, actual.line, actual.column),
            detail: SyntaxErrorKind::UnexpectedToken {
                actual: actual.kind,
                expected,
            },
        }
    }

    pub fn at_token(code: ErrorCode, token: &Token) -> Self {
        SyntaxError {
            code,
            pos: SourcePos::new(token.span.start, token.line, token.column),
            detail: SyntaxErrorKind::UnexpectedToken {
                actual: token.kind,
                expected: None,
            },
        }
    }

    pub fn keyword(code: ErrorCode, token: &Token) -> Self {
        SyntaxError {
            code,
            pos: SourcePos::new(token.span.start, token.line, token.column),
            detail: SyntaxErrorKind::Keyword {
                keyword: token.kind,
            },
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code, self.to_string(), self.pos)
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            SyntaxErrorKind::Plain => write!(f, "syntax error ({})", self.code),
            SyntaxErrorKind::UnexpectedToken {
                actual,
                expected: Some(expected),
            } => write!(f, "expected {expected:?}, found {actual:?}"),
            SyntaxErrorKind::UnexpectedToken {
                actual,
                expected: None,
            } => write!(f, "unexpected token {actual:?}"),
            SyntaxErrorKind::Keyword { keyword } => {
                write!(f, "keyword {keyword:?} cannot appear here")
            }
        }
    }
}

impl std::error::Error for SyntaxError {}

pub type ParseRes<T> = Result<T, SyntaxError>;

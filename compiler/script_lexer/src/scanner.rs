//! The scanner: bytes in, tokens out.

use std::fmt;

use script_ir::{SourcePos, Span, StringInterner, Token, TokenKind, TokenList};

use crate::cursor::Cursor;

/// What went wrong while lexing.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum LexErrorKind {
    UnterminatedString,
    UnterminatedBlockComment,
    /// A digit outside the literal's base, e.g. `9` in an octal literal.
    InvalidDigit { digit: char },
    /// Numeric literal does not fit the value range.
    NumberOutOfRange,
    InvalidEscape { escape: char },
    UnexpectedCharacter { ch: char },
}

/// Lexer error: kind plus the position of the offending byte.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub pos: SourcePos,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LexErrorKind::UnterminatedString => {
                write!(f, "unterminated string literal at {}", self.pos)
            }
            LexErrorKind::UnterminatedBlockComment => {
                write!(f, "unterminated block comment at {}", self.pos)
            }
            LexErrorKind::InvalidDigit { digit } => {
                write!(f, "invalid digit '{digit}' in numeric literal at {}", self.pos)
            }
            LexErrorKind::NumberOutOfRange => {
                write!(f, "numeric literal out of range at {}", self.pos)
            }
            LexErrorKind::InvalidEscape { escape } => {
                write!(f, "invalid escape sequence '\\{escape}' at {}", self.pos)
            }
            LexErrorKind::UnexpectedCharacter { ch } => {
                write!(f, "unexpected character '{ch}' at {}", self.pos)
            }
        }
    }
}

impl std::error::Error for LexError {}

/// Tokenize `source`, interning identifier and string payloads.
///
/// On success the returned list always ends with an `Eof` token.
pub fn lex(source: &str, interner: &StringInterner) -> Result<TokenList, LexError> {
    let mut scanner = Scanner {
        cursor: Cursor::new(source),
        interner,
        tokens: TokenList::new(),
    };
    scanner.run()?;
    Ok(scanner.tokens)
}

struct Scanner<'src, 'i> {
    cursor: Cursor<'src>,
    interner: &'i StringInterner,
    tokens: TokenList,
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

impl Scanner<'_, '_> {
    fn run(&mut self) -> Result<(), LexError> {
        loop {
            self.skip_trivia()?;
            if self.cursor.at_end() {
                let pos = self.cursor.source_pos();
                self.tokens.push(Token::new(
                    TokenKind::Eof,
                    Span::new(pos.offset, pos.offset),
                    pos.line,
                    pos.column,
                ));
                return Ok(());
            }
            let token = self.next_token()?;
            self.tokens.push(token);
        }
    }

    /// Skip whitespace, `// ...` and `/* ... */` comments.
    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match self.cursor.current() {
                b' ' | b'\t' | b'\r' | b'\n' => self.cursor.advance(),
                b'/' if self.cursor.peek() == b'/' => {
                    self.cursor.advance_while(|b| b != b'\n');
                }
                b'/' if self.cursor.peek() == b'*' => {
                    let start = self.cursor.source_pos();
                    self.cursor.advance(); // '/'
                    self.cursor.advance(); // '*'
                    loop {
                        if self.cursor.at_end() {
                            return Err(LexError {
                                kind: LexErrorKind::UnterminatedBlockComment,
                                pos: start,
                            });
                        }
                        if self.cursor.current() == b'*' && self.cursor.peek() == b'/' {
                            self.cursor.advance();
                            self.cursor.advance();
                            break;
                        }
                        self.cursor.advance();
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        let pos = self.cursor.source_pos();
        let start = self.cursor.pos();

        let kind = match self.cursor.current() {
            b'0'..=b'9' => self.number(pos)?,
            b'"' => self.string(pos)?,
            b if is_ident_start(b) => self.identifier(start),
            _ => self.punctuator(pos)?,
        };

        let span = Span::new(start as u32, self.cursor.pos() as u32);
        Ok(Token::new(kind, span, pos.line, pos.column))
    }

    fn identifier(&mut self, start: usize) -> TokenKind {
        self.cursor.advance_while(is_ident_continue);
        let text = self.cursor.slice_from(start);
        keyword(text).unwrap_or_else(|| TokenKind::Ident(self.interner.intern(text)))
    }

    /// Scan a numeric literal. Handles the four integer bases, float
    /// detection (fraction, exponent or `f` suffix), and user-defined
    /// literal suffix absorption.
    fn number(&mut self, pos: SourcePos) -> Result<TokenKind, LexError> {
        let start = self.cursor.pos();

        if self.cursor.current() == b'0'
            && matches!(self.cursor.peek(), b'x' | b'X' | b'b' | b'B')
        {
            let base: u32 = if matches!(self.cursor.peek(), b'x' | b'X') {
                16
            } else {
                2
            };
            self.cursor.advance(); // '0'
            self.cursor.advance(); // base marker
            let digits_start = self.cursor.pos();
            self.cursor.advance_while(|b| (b as char).is_ascii_hexdigit());
            let digits = self.cursor.slice_from(digits_start);
            if let Some(bad) = digits.chars().find(|c| !c.is_digit(base)) {
                return Err(LexError {
                    kind: LexErrorKind::InvalidDigit { digit: bad },
                    pos,
                });
            }
            let value = i64::from_str_radix(digits, base).map_err(|_| LexError {
                kind: LexErrorKind::NumberOutOfRange,
                pos,
            })?;
            return self.finish_number(start, TokenKind::Int(value));
        }

        let mut is_float = false;

        self.cursor.advance_while(|b| b.is_ascii_digit());

        if self.cursor.current() == b'.' && self.cursor.peek().is_ascii_digit() {
            is_float = true;
            self.cursor.advance(); // '.'
            self.cursor.advance_while(|b| b.is_ascii_digit());
        }

        if matches!(self.cursor.current(), b'e' | b'E') {
            let after = self.cursor.peek();
            if after.is_ascii_digit() {
                is_float = true;
                self.cursor.advance(); // 'e'
                self.cursor.advance_while(|b| b.is_ascii_digit());
            } else if matches!(after, b'+' | b'-') {
                is_float = true;
                self.cursor.advance(); // 'e'
                self.cursor.advance(); // sign
                self.cursor.advance_while(|b| b.is_ascii_digit());
            }
        }

        let text = self.cursor.slice_from(start).to_owned();

        if is_float {
            let value: f64 = text.parse().map_err(|_| LexError {
                kind: LexErrorKind::NumberOutOfRange,
                pos,
            })?;
            // `f` suffix makes it single precision; a longer suffix makes
            // the whole literal user-defined.
            if self.cursor.current() == b'f' && !is_ident_continue(self.cursor.peek()) {
                self.cursor.advance();
                return Ok(TokenKind::Float {
                    bits: value.to_bits(),
                    single: true,
                });
            }
            return self.finish_number(
                start,
                TokenKind::Float {
                    bits: value.to_bits(),
                    single: false,
                },
            );
        }

        // Integer: decimal, or octal when it has a leading zero.
        let kind = if text.len() > 1 && text.starts_with('0') {
            if let Some(bad) = text.chars().find(|c| !c.is_digit(8)) {
                return Err(LexError {
                    kind: LexErrorKind::InvalidDigit { digit: bad },
                    pos,
                });
            }
            let value = i64::from_str_radix(&text, 8).map_err(|_| LexError {
                kind: LexErrorKind::NumberOutOfRange,
                pos,
            })?;
            TokenKind::Int(value)
        } else {
            // `f` alone suffixes a float even without a fraction part.
            if self.cursor.current() == b'f' && !is_ident_continue(self.cursor.peek()) {
                let value: f64 = text.parse().map_err(|_| LexError {
                    kind: LexErrorKind::NumberOutOfRange,
                    pos,
                })?;
                self.cursor.advance();
                return Ok(TokenKind::Float {
                    bits: value.to_bits(),
                    single: true,
                });
            }
            let value: i64 = text.parse().map_err(|_| LexError {
                kind: LexErrorKind::NumberOutOfRange,
                pos,
            })?;
            TokenKind::Int(value)
        };

        self.finish_number(start, kind)
    }

    /// A numeric immediately followed by an identifier start (no gap)
    /// becomes a user-defined literal spanning both parts.
    fn finish_number(&mut self, start: usize, kind: TokenKind) -> Result<TokenKind, LexError> {
        if is_ident_start(self.cursor.current()) {
            self.cursor.advance_while(is_ident_continue);
            let full = self.cursor.slice_from(start);
            return Ok(TokenKind::UserDefined(self.interner.intern(full)));
        }
        Ok(kind)
    }

    fn string(&mut self, pos: SourcePos) -> Result<TokenKind, LexError> {
        self.cursor.advance(); // opening quote
        let mut content = String::new();
        loop {
            if self.cursor.at_end() || self.cursor.current() == b'\n' {
                return Err(LexError {
                    kind: LexErrorKind::UnterminatedString,
                    pos,
                });
            }
            match self.cursor.current() {
                b'"' => {
                    self.cursor.advance();
                    return Ok(TokenKind::Str(self.interner.intern(&content)));
                }
                b'\\' => {
                    let escape_pos = self.cursor.source_pos();
                    self.cursor.advance();
                    let escaped = self.cursor.current();
                    self.cursor.advance();
                    match escaped {
                        b'n' => content.push('\n'),
                        b'r' => content.push('\r'),
                        b't' => content.push('\t'),
                        b'\\' => content.push('\\'),
                        b'"' => content.push('"'),
                        other => {
                            return Err(LexError {
                                kind: LexErrorKind::InvalidEscape {
                                    escape: other as char,
                                },
                                pos: escape_pos,
                            })
                        }
                    }
                }
                b => {
                    content.push(b as char);
                    self.cursor.advance();
                }
            }
        }
    }

    fn punctuator(&mut self, pos: SourcePos) -> Result<TokenKind, LexError> {
        use TokenKind::*;

        let b = self.cursor.current();
        let next = self.cursor.peek();
        self.cursor.advance();

        // Maximal munch: three-byte operators first, then two, then one.
        let two = |s: &mut Self, kind: TokenKind| {
            s.cursor.advance();
            kind
        };

        let kind = match (b, next) {
            (b'<', b'<') => {
                self.cursor.advance();
                if self.cursor.current() == b'=' {
                    self.cursor.advance();
                    LeftShiftEq
                } else {
                    LeftShift
                }
            }
            (b'>', b'>') => {
                self.cursor.advance();
                if self.cursor.current() == b'=' {
                    self.cursor.advance();
                    RightShiftEq
                } else {
                    RightShift
                }
            }
            (b'+', b'+') => two(self, PlusPlus),
            (b'-', b'-') => two(self, MinusMinus),
            (b'+', b'=') => two(self, PlusEq),
            (b'-', b'=') => two(self, MinusEq),
            (b'*', b'=') => two(self, StarEq),
            (b'/', b'=') => two(self, SlashEq),
            (b'%', b'=') => two(self, PercentEq),
            (b'&', b'&') => two(self, AmpAmp),
            (b'|', b'|') => two(self, PipePipe),
            (b'&', b'=') => two(self, AmpEq),
            (b'|', b'=') => two(self, PipeEq),
            (b'^', b'=') => two(self, CaretEq),
            (b'=', b'=') => two(self, EqEq),
            (b'!', b'=') => two(self, Neq),
            (b'<', b'=') => two(self, LessEq),
            (b'>', b'=') => two(self, GreaterEq),
            (b':', b':') => two(self, ColonColon),
            (b'+', _) => Plus,
            (b'-', _) => Minus,
            (b'*', _) => Star,
            (b'/', _) => Slash,
            (b'%', _) => Percent,
            (b'&', _) => Amp,
            (b'|', _) => Pipe,
            (b'^', _) => Caret,
            (b'=', _) => Eq,
            (b'!', _) => Not,
            (b'<', _) => Less,
            (b'>', _) => Greater,
            (b'~', _) => Tilde,
            (b'(', _) => LeftPar,
            (b')', _) => RightPar,
            (b'[', _) => LeftBracket,
            (b']', _) => RightBracket,
            (b'{', _) => LeftBrace,
            (b'}', _) => RightBrace,
            (b';', _) => Semicolon,
            (b':', _) => Colon,
            (b',', _) => Comma,
            (b'.', _) => Dot,
            (b'?', _) => QuestionMark,
            (other, _) => {
                return Err(LexError {
                    kind: LexErrorKind::UnexpectedCharacter { ch: other as char },
                    pos,
                })
            }
        };
        Ok(kind)
    }
}

/// Reserved-word table. Underscore-leading identifiers are never keywords.
fn keyword(text: &str) -> Option<TokenKind> {
    use TokenKind::*;
    let kind = match text {
        "auto" => Auto,
        "bool" => Bool,
        "break" => Break,
        "char" => Char,
        "class" => Class,
        "const" => Const,
        "continue" => Continue,
        "default" => Default,
        "delete" => Delete,
        "double" => Double,
        "else" => Else,
        "enum" => Enum,
        "explicit" => Explicit,
        "export" => Export,
        "false" => False,
        "float" => Float_,
        "for" => For,
        "friend" => Friend,
        "if" => If,
        "import" => Import,
        "int" => Int_,
        "mutable" => Mutable,
        "namespace" => Namespace,
        "operator" => Operator,
        "private" => Private,
        "protected" => Protected,
        "public" => Public,
        "return" => Return,
        "static" => Static,
        "struct" => Struct,
        "template" => Template,
        "this" => This,
        "true" => True,
        "typedef" => Typedef,
        "typename" => Typename,
        "using" => Using,
        "virtual" => Virtual,
        "void" => Void,
        "while" => While,
        _ => return None,
    };
    Some(kind)
}

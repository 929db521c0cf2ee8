//! The parser family. One [`Parser`] drives a translation unit; grammar
//! areas live in submodules as `impl Parser` blocks:
//!
//! - [`expr`]: operator-precedence expression parsing
//! - [`ident`]: identifiers (simple, operator, template-id, scoped)
//! - [`ty`]: qualified types and function signatures
//! - [`decl`]: declaration detection and parsing (the ambiguous cases)
//! - [`item`]: classes, enums, namespaces, templates, using, import
//! - [`lambda`]: lambda-vs-array disambiguation

mod decl;
mod expr;
mod ident;
mod item;
mod lambda;
mod ty;

pub use ident::IdentOptions;

use script_diagnostic::ErrorCode;
use script_ir::ast::{Module, Stmt, StmtKind};
use script_ir::{AstArena, ExprId, StmtId, StringInterner, Token, TokenKind, TokenList};

use crate::cursor::ParserCursor;
use crate::error::{ParseRes, SyntaxError};
use crate::fragment::Frag;

/// Output of [`parse`]: the module, its arena, and any syntax errors.
///
/// Errors are reported per top-level statement: after an error the parser
/// resynchronizes at the next statement boundary and keeps going, so one
/// run can surface several independent mistakes.
pub struct ParseResult {
    pub module: Module,
    pub arena: AstArena,
    pub errors: Vec<SyntaxError>,
}

impl ParseResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parse a whole translation unit.
pub fn parse(tokens: &TokenList, interner: &StringInterner) -> ParseResult {
    let mut parser = Parser::new(tokens, interner);
    let mut module = Module::default();
    let mut errors = Vec::new();

    while !parser.cursor.at_eof() {
        match parser.parse_statement(Frag::Script, StmtCtx::top_level()) {
            Ok(stmt) => {
                if let StmtKind::Declaration(decl) = &parser.arena.stmt(stmt).kind {
                    let decl = *decl;
                    module.declarations.push(decl);
                }
                module.statements.push(stmt);
            }
            Err(err) => {
                errors.push(err);
                module.has_errors = true;
                parser.resync();
            }
        }
    }

    module.has_errors = !errors.is_empty();
    ParseResult {
        module,
        arena: parser.arena,
        errors,
    }
}

/// Parse a single expression spanning the whole token stream.
pub fn parse_expression(
    tokens: &TokenList,
    interner: &StringInterner,
) -> Result<(AstArena, ExprId), SyntaxError> {
    let mut parser = Parser::new(tokens, interner);
    let expr = parser.parse_expr(Frag::Script)?;
    Ok((parser.arena, expr))
}

/// Statement-level context: whether class declarations are allowed here
/// and which class body (if any) encloses us.
#[derive(Copy, Clone, Debug)]
pub struct StmtCtx {
    /// Class/struct declarations are only allowed outside function bodies.
    pub allow_class_decl: bool,
}

impl StmtCtx {
    pub fn top_level() -> Self {
        StmtCtx {
            allow_class_decl: true,
        }
    }

    pub fn function_body() -> Self {
        StmtCtx {
            allow_class_decl: false,
        }
    }
}

pub(crate) struct Parser<'t, 'i> {
    pub(crate) cursor: ParserCursor<'t>,
    pub(crate) interner: &'i StringInterner,
    pub(crate) arena: AstArena,
    /// Number of template argument lists currently open; governs `>>`
    /// splitting.
    pub(crate) template_depth: u8,
}

impl<'t, 'i> Parser<'t, 'i> {
    pub(crate) fn new(tokens: &'t TokenList, interner: &'i StringInterner) -> Self {
        Parser {
            cursor: ParserCursor::new(tokens),
            interner,
            arena: AstArena::new(),
            template_depth: 0,
        }
    }

    /// Read a token and check its kind.
    pub(crate) fn expect(&mut self, frag: Frag, kind: TokenKind) -> ParseRes<Token> {
        let tok = frag.read(&mut self.cursor)?;
        if tok.kind != kind {
            return Err(SyntaxError::unexpected_token(&tok, Some(kind)));
        }
        Ok(tok)
    }

    /// Skip forward to the next statement boundary after an error:
    /// past the next `;` or `}` at bracket depth zero.
    pub(crate) fn resync(&mut self) {
        let mut depth: i32 = 0;
        while !self.cursor.at_eof() {
            let tok = self.cursor.bump();
            match tok.kind {
                TokenKind::LeftPar | TokenKind::LeftBracket | TokenKind::LeftBrace => depth += 1,
                TokenKind::RightPar | TokenKind::RightBracket => depth -= 1,
                TokenKind::RightBrace => {
                    depth -= 1;
                    if depth <= 0 {
                        return;
                    }
                }
                TokenKind::Semicolon if depth <= 0 => return,
                _ => {}
            }
        }
    }

    /// Statement dispatch on the leading token.
    pub(crate) fn parse_statement(&mut self, frag: Frag, ctx: StmtCtx) -> ParseRes<StmtId> {
        let tok = frag.peek(&self.cursor)?;
        match tok.kind {
            TokenKind::Semicolon => {
                let t = self.cursor.bump();
                Ok(self.alloc_stmt(StmtKind::Null, t.span))
            }
            TokenKind::Break => self.parse_break(frag),
            TokenKind::Continue => self.parse_continue(frag),
            TokenKind::Class | TokenKind::Struct => {
                if !ctx.allow_class_decl {
                    return Err(SyntaxError::keyword(ErrorCode::IllegalUseOfKeyword, &tok));
                }
                self.parse_class_statement(frag)
            }
            TokenKind::Enum => self.parse_enum_statement(frag),
            TokenKind::If => self.parse_if(frag, ctx),
            TokenKind::Return => self.parse_return(frag),
            TokenKind::Using => self.parse_using_statement(frag),
            TokenKind::While => self.parse_while(frag, ctx),
            TokenKind::For => self.parse_for(frag, ctx),
            TokenKind::LeftBrace => self.parse_compound(frag, ctx),
            TokenKind::Template => self.parse_template_statement(frag),
            TokenKind::Typedef => self.parse_typedef_statement(frag),
            TokenKind::Namespace => self.parse_namespace_statement(frag),
            TokenKind::Export | TokenKind::Import => self.parse_import_statement(frag),
            TokenKind::Friend => Err(SyntaxError::keyword(ErrorCode::IllegalUseOfKeyword, &tok)),
            _ => self.parse_ambiguous(frag),
        }
    }

    /// Default case: try declaration detection; on rejection rewind and
    /// parse an expression statement.
    fn parse_ambiguous(&mut self, frag: Frag) -> ParseRes<StmtId> {
        let snap = self.cursor.snapshot();

        match self.try_parse_declaration(frag, None)? {
            Some(decl) => {
                let span = self.arena.decl(decl).span;
                Ok(self.alloc_stmt(StmtKind::Declaration(decl), span))
            }
            None => {
                self.cursor.restore(snap);
                let stmt_frag = Frag::stmt();
                let expr = self.parse_expr(stmt_frag)?;
                let semi = stmt_frag.consume_sentinel(&mut self.cursor)?;
                let span = self.arena.expr(expr).span.merge(semi.span);
                Ok(self.alloc_stmt(StmtKind::Expression(expr), span))
            }
        }
    }

    fn parse_break(&mut self, frag: Frag) -> ParseRes<StmtId> {
        let kw = frag.read(&mut self.cursor)?;
        let semi = self.expect(frag, TokenKind::Semicolon)?;
        Ok(self.alloc_stmt(StmtKind::Break, kw.span.merge(semi.span)))
    }

    fn parse_continue(&mut self, frag: Frag) -> ParseRes<StmtId> {
        let kw = frag.read(&mut self.cursor)?;
        let semi = self.expect(frag, TokenKind::Semicolon)?;
        Ok(self.alloc_stmt(StmtKind::Continue, kw.span.merge(semi.span)))
    }

    fn parse_return(&mut self, frag: Frag) -> ParseRes<StmtId> {
        let kw = frag.read(&mut self.cursor)?;
        if self.cursor.current_kind() == TokenKind::Semicolon {
            let semi = self.cursor.bump();
            return Ok(self.alloc_stmt(StmtKind::Return { value: None }, kw.span.merge(semi.span)));
        }

        let stmt_frag = Frag::stmt();
        let value = self.parse_expr(stmt_frag)?;
        let semi = stmt_frag.consume_sentinel(&mut self.cursor)?;
        Ok(self.alloc_stmt(
            StmtKind::Return { value: Some(value) },
            kw.span.merge(semi.span),
        ))
    }

    pub(crate) fn parse_compound(&mut self, frag: Frag, ctx: StmtCtx) -> ParseRes<StmtId> {
        let lbrace = self.expect(frag, TokenKind::LeftBrace)?;

        let block = Frag::Sentinel {
            end: TokenKind::RightBrace,
        };
        let mut statements = Vec::new();
        while !block.at_end(&self.cursor) {
            statements.push(self.parse_statement(block, ctx)?);
        }
        let rbrace = block.consume_sentinel(&mut self.cursor)?;

        Ok(self.alloc_stmt(
            StmtKind::Compound(statements),
            lbrace.span.merge(rbrace.span),
        ))
    }

    fn parse_if(&mut self, frag: Frag, ctx: StmtCtx) -> ParseRes<StmtId> {
        let kw = frag.read(&mut self.cursor)?;
        self.expect(frag, TokenKind::LeftPar)?;

        let cond_frag = Frag::Sentinel {
            end: TokenKind::RightPar,
        };
        let cond = self.parse_expr(cond_frag)?;
        cond_frag.consume_sentinel(&mut self.cursor)?;

        let body = self.parse_statement(frag, ctx)?;

        let mut else_clause = None;
        if !frag.at_end(&self.cursor) && self.cursor.current_kind() == TokenKind::Else {
            self.cursor.bump();
            else_clause = Some(self.parse_statement(frag, ctx)?);
        }

        let end_span = else_clause
            .or(Some(body))
            .map(|s| self.arena.stmt(s).span)
            .unwrap_or(kw.span);
        Ok(self.alloc_stmt(
            StmtKind::If {
                cond,
                body,
                else_clause,
            },
            kw.span.merge(end_span),
        ))
    }

    fn parse_while(&mut self, frag: Frag, ctx: StmtCtx) -> ParseRes<StmtId> {
        let kw = frag.read(&mut self.cursor)?;
        self.expect(frag, TokenKind::LeftPar)?;

        let cond_frag = Frag::Sentinel {
            end: TokenKind::RightPar,
        };
        let cond = self.parse_expr(cond_frag)?;
        cond_frag.consume_sentinel(&mut self.cursor)?;

        let body = self.parse_statement(frag, ctx)?;
        let body_span = self.arena.stmt(body).span;
        Ok(self.alloc_stmt(StmtKind::While { cond, body }, kw.span.merge(body_span)))
    }

    fn parse_for(&mut self, frag: Frag, ctx: StmtCtx) -> ParseRes<StmtId> {
        let kw = frag.read(&mut self.cursor)?;
        self.expect(frag, TokenKind::LeftPar)?;

        // Init: declaration or expression statement, up to the first `;`.
        let init = {
            let snap = self.cursor.snapshot();
            match self.try_parse_declaration_as_variable(frag)? {
                Some(decl) => {
                    let span = self.arena.decl(decl).span;
                    self.alloc_stmt(StmtKind::Declaration(decl), span)
                }
                None => {
                    self.cursor.restore(snap);
                    let init_frag = Frag::stmt();
                    let expr = self.parse_expr(init_frag)?;
                    let semi = init_frag.consume_sentinel(&mut self.cursor)?;
                    let span = self.arena.expr(expr).span.merge(semi.span);
                    self.alloc_stmt(StmtKind::Expression(expr), span)
                }
            }
        };

        let cond_frag = Frag::stmt();
        let cond = self.parse_expr(cond_frag)?;
        cond_frag.consume_sentinel(&mut self.cursor)?;

        let step_frag = Frag::Sentinel {
            end: TokenKind::RightPar,
        };
        let step = self.parse_expr(step_frag)?;
        step_frag.consume_sentinel(&mut self.cursor)?;

        let body = self.parse_statement(frag, ctx)?;
        let body_span = self.arena.stmt(body).span;
        Ok(self.alloc_stmt(
            StmtKind::For {
                init,
                cond,
                step,
                body,
            },
            kw.span.merge(body_span),
        ))
    }

    pub(crate) fn alloc_stmt(&mut self, kind: StmtKind, span: script_ir::Span) -> StmtId {
        self.arena.alloc_stmt(Stmt { kind, span })
    }
}

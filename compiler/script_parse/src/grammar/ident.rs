//! Identifier parsing: simple names, operator names (including
//! `operator"" suffix`), template-ids and scoped ids.

use script_diagnostic::ErrorCode;
use script_ir::ast::{Ident, IdentKind, OperatorContext, OperatorId, TemplateArg};
use script_ir::{IdentId, Name, Span, Token, TokenKind};

use crate::error::{ParseRes, SyntaxError};
use crate::fragment::Frag;

use super::Parser;

/// Which identifier shapes the current parse position accepts.
#[derive(Copy, Clone, Debug)]
pub struct IdentOptions {
    pub template_ids: bool,
    pub qualified: bool,
    pub operator_names: bool,
}

impl IdentOptions {
    /// Only a simple name.
    pub fn only_simple() -> Self {
        IdentOptions {
            template_ids: false,
            qualified: false,
            operator_names: false,
        }
    }

    /// `a`, `a<T>`, `a::b` — the default in type positions and
    /// expressions.
    pub fn in_expression() -> Self {
        IdentOptions {
            template_ids: true,
            qualified: true,
            operator_names: false,
        }
    }

    /// Member names after `.`: simple or template-id.
    pub fn simple_or_template() -> Self {
        IdentOptions {
            template_ids: true,
            qualified: false,
            operator_names: false,
        }
    }

    /// Declarators: simple names and operator names.
    pub fn declarator() -> Self {
        IdentOptions {
            template_ids: false,
            qualified: false,
            operator_names: true,
        }
    }

    /// Declarators inside a template declaration: template-ids allowed.
    pub fn template_declarator() -> Self {
        IdentOptions {
            template_ids: true,
            qualified: false,
            operator_names: true,
        }
    }

    /// Retry after an unusable template-id operand: everything except
    /// template arguments.
    pub fn retry_plain() -> Self {
        IdentOptions {
            template_ids: false,
            qualified: true,
            operator_names: true,
        }
    }
}

impl Parser<'_, '_> {
    /// Parse an identifier according to `opts`.
    pub(crate) fn parse_ident(&mut self, frag: Frag, opts: IdentOptions) -> ParseRes<IdentId> {
        let t = frag.peek(&self.cursor)?;
        match t.kind {
            // Built-in type names and `auto`/`this` act as simple
            // identifiers; name lookup resolves them to types.
            TokenKind::Void
            | TokenKind::Bool
            | TokenKind::Char
            | TokenKind::Int_
            | TokenKind::Float_
            | TokenKind::Double
            | TokenKind::Auto
            | TokenKind::This => {
                self.cursor.bump();
                let name = self.interner.intern(keyword_text(t.kind));
                Ok(self.alloc_ident(IdentKind::Simple(name), t.span))
            }
            TokenKind::Operator => {
                if !opts.operator_names {
                    return Err(SyntaxError::unexpected_token(&t, None));
                }
                self.read_operator_name(frag)
            }
            TokenKind::Ident(name) => self.read_user_defined_name(frag, name, opts),
            _ => Err(SyntaxError::at_token(ErrorCode::ExpectedIdentifier, &t)),
        }
    }

    /// `operator+`, `operator()`, `operator[]`, `operator"" _suffix`.
    fn read_operator_name(&mut self, frag: Frag) -> ParseRes<IdentId> {
        let opkw = frag.read(&mut self.cursor)?;
        if frag.at_end(&self.cursor) {
            return Err(SyntaxError::new(
                ErrorCode::UnexpectedEndOfInput,
                self.cursor.source_pos(),
            ));
        }

        let op = *self.cursor.current();
        if let Some(id) = OperatorId::from_token(op.kind, OperatorContext::Any) {
            self.cursor.bump();
            return Ok(self.alloc_ident(IdentKind::Operator(id), opkw.span.merge(op.span)));
        }

        match op.kind {
            TokenKind::LeftPar => {
                let lp = self.cursor.bump();
                let rp = self.expect_raw(TokenKind::RightPar)?;
                // The two parens must be adjacent to form `operator()`.
                if lp.column + 1 != rp.column {
                    return Err(SyntaxError::unexpected_token(&lp, Some(TokenKind::RightPar)));
                }
                Ok(self.alloc_ident(
                    IdentKind::Operator(OperatorId::FunctionCall),
                    opkw.span.merge(rp.span),
                ))
            }
            TokenKind::LeftBracket => {
                let lb = self.cursor.bump();
                let rb = self.expect_raw(TokenKind::RightBracket)?;
                if lb.column + 1 != rb.column {
                    return Err(SyntaxError::unexpected_token(
                        &lb,
                        Some(TokenKind::RightBracket),
                    ));
                }
                Ok(self.alloc_ident(
                    IdentKind::Operator(OperatorId::Subscript),
                    opkw.span.merge(rb.span),
                ))
            }
            TokenKind::Str(content) => {
                // `operator"" _suffix`: the string must be empty.
                if !self.interner.resolve(content).is_empty() {
                    return Err(SyntaxError::at_token(
                        ErrorCode::ExpectedEmptyStringLiteral,
                        &op,
                    ));
                }
                self.cursor.bump();
                let suffix = self.parse_ident(frag, IdentOptions::only_simple())?;
                let suffix_name = self.simple_name(suffix)?;
                let span = opkw.span.merge(self.arena.ident(suffix).span);
                Ok(self.alloc_ident(IdentKind::LiteralOperator(suffix_name), span))
            }
            _ => Err(SyntaxError::at_token(ErrorCode::ExpectedOperatorSymbol, &op)),
        }
    }

    fn read_user_defined_name(
        &mut self,
        frag: Frag,
        name: Name,
        opts: IdentOptions,
    ) -> ParseRes<IdentId> {
        let base = frag.read(&mut self.cursor)?;

        let mut ret = self.alloc_ident(IdentKind::Simple(name), base.span);

        if frag.at_end(&self.cursor) {
            return Ok(ret);
        }

        if opts.template_ids && self.cursor.current_kind() == TokenKind::Less {
            // Speculative: `a < b` may be a comparison. Rewind on failure.
            let snap = self.cursor.snapshot();
            match self.read_template_arguments(name, &base) {
                Ok(id) => ret = id,
                Err(_) => {
                    self.cursor.restore(snap);
                    return Ok(ret);
                }
            }
        }

        if frag.at_end(&self.cursor) {
            return Ok(ret);
        }

        if opts.qualified && self.cursor.current_kind() == TokenKind::ColonColon {
            while self.cursor.current_kind() == TokenKind::ColonColon {
                self.cursor.bump();
                let rhs = self.parse_ident(
                    frag,
                    IdentOptions {
                        template_ids: true,
                        qualified: false,
                        operator_names: false,
                    },
                )?;
                let span = self
                    .arena
                    .ident(ret)
                    .span
                    .merge(self.arena.ident(rhs).span);
                ret = self.alloc_ident(IdentKind::Scoped { lhs: ret, rhs }, span);
                if frag.at_end(&self.cursor) {
                    break;
                }
            }
        }

        Ok(ret)
    }

    /// `name<arg, ...>` — called with the cursor on `<`.
    fn read_template_arguments(&mut self, name: Name, base: &Token) -> ParseRes<IdentId> {
        let _langle = self.expect_raw(TokenKind::Less)?;

        self.template_depth += 1;
        let result = self.read_template_argument_list(name, base);
        self.template_depth -= 1;
        result
    }

    fn read_template_argument_list(&mut self, name: Name, base: &Token) -> ParseRes<IdentId> {
        let list = Frag::TemplateList {
            depth: self.template_depth,
        };

        let mut args = Vec::new();
        while !list.at_end(&self.cursor) {
            let arg_frag = list.template_arg();
            args.push(self.parse_template_arg(arg_frag)?);
            arg_frag.consume_comma(&mut self.cursor);
        }

        let rangle = list.consume_template_end(&mut self.cursor)?;

        Ok(self.alloc_ident(
            IdentKind::Template { name, args },
            base.span.merge(rangle.span),
        ))
    }

    /// One template argument: a type when it parses as one and fills the
    /// fragment, otherwise an expression.
    pub(crate) fn parse_template_arg(&mut self, frag: Frag) -> ParseRes<TemplateArg> {
        let snap = self.cursor.snapshot();

        if self.detect_type(frag) {
            if let Ok(ty) = self.parse_qual_type(frag) {
                if frag.at_end(&self.cursor) {
                    return Ok(TemplateArg::Type(ty));
                }
            }
        }

        self.cursor.restore(snap);
        let expr = self.parse_expr(frag)?;
        Ok(TemplateArg::Expr(expr))
    }

    /// The name of a simple identifier; errors on any other shape.
    pub(crate) fn simple_name(&self, ident: IdentId) -> ParseRes<Name> {
        match self.arena.ident(ident).kind {
            IdentKind::Simple(name) => Ok(name),
            _ => Err(SyntaxError::new(
                ErrorCode::ExpectedIdentifier,
                script_ir::SourcePos::new(self.arena.ident(ident).span.start, 0, 0),
            )),
        }
    }

    pub(crate) fn alloc_ident(&mut self, kind: IdentKind, span: Span) -> IdentId {
        self.arena.alloc_ident(Ident { kind, span })
    }
}

/// Source text of the keyword tokens that can act as identifiers.
fn keyword_text(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Void => "void",
        TokenKind::Bool => "bool",
        TokenKind::Char => "char",
        TokenKind::Int_ => "int",
        TokenKind::Float_ => "float",
        TokenKind::Double => "double",
        TokenKind::Auto => "auto",
        TokenKind::This => "this",
        _ => unreachable!("not an identifier keyword"),
    }
}

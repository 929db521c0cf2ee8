//! Expression parsing.
//!
//! Expressions are collected as an alternating stream of operands and
//! infix operator tokens, then reduced by precedence. The conditional
//! operator is carried through the stream as two infix tokens (`?`, `:`)
//! and rebuilt into a ternary node during reduction.

use script_diagnostic::ErrorCode;
use script_ir::ast::{Expr, ExprKind, IdentKind, OperatorContext, OperatorId};
use script_ir::{ExprId, Span, Token, TokenKind};

use crate::error::{ParseRes, SyntaxError};
use crate::fragment::Frag;

use super::ident::IdentOptions;
use super::Parser;

/// An infix element of the operand/operator stream.
#[derive(Copy, Clone, Debug)]
enum InfixTok {
    Op(OperatorId, Token),
    Question(Token),
    Colon(Token),
}

impl InfixTok {
    /// Reduction precedence. `:` gets a pseudo-precedence below every real
    /// group so a `?` always reduces before the `:` that closes it.
    fn precedence(self) -> i32 {
        match self {
            InfixTok::Colon(_) => -66,
            InfixTok::Question(_) => OperatorId::Conditional.precedence() as i32,
            InfixTok::Op(op, _) => op.precedence() as i32,
        }
    }
}

impl Parser<'_, '_> {
    /// Parse a full expression inside `frag`.
    pub(crate) fn parse_expr(&mut self, frag: Frag) -> ParseRes<ExprId> {
        let mut operands = vec![self.read_operand(frag)?];
        let mut operators = Vec::new();

        while !frag.at_end(&self.cursor) {
            operators.push(self.read_binary_operator(frag)?);
            operands.push(self.read_operand(frag)?);
        }

        self.build_expression(&operands, &operators)
    }

    /// Parse a comma-separated expression list bounded by `end`.
    pub(crate) fn parse_expr_list(&mut self, end: TokenKind) -> ParseRes<Vec<ExprId>> {
        let sentinel = Frag::Sentinel { end };
        let mut out = Vec::new();
        while !sentinel.at_end(&self.cursor) {
            let item = sentinel.list_item();
            out.push(self.parse_expr(item)?);
            item.consume_comma(&mut self.cursor);
        }
        Ok(out)
    }

    /// Read one operand, including its postfix continuations (`++`, `--`,
    /// `.member`, calls, subscripts, brace construction).
    fn read_operand(&mut self, frag: Frag) -> ParseRes<ExprId> {
        let operand_start = self.cursor.snapshot();
        let t = frag.peek(&self.cursor)?;

        let mut operand: ExprId;

        if t.kind.is_operator() {
            if OperatorId::from_token(t.kind, OperatorContext::Prefix).is_none() {
                return Err(SyntaxError::at_token(ErrorCode::ExpectedPrefixOperator, &t));
            }
            self.cursor.bump();
            let op = OperatorId::from_token(t.kind, OperatorContext::Prefix).unwrap();
            let arg = self.read_operand(frag)?;
            let span = t.span.merge(self.arena.expr(arg).span);
            operand = self.alloc_expr(ExprKind::Unary { op, arg }, span);
        } else if t.kind == TokenKind::LeftPar {
            self.cursor.bump();
            if self.cursor.current_kind() == TokenKind::RightPar {
                return Err(SyntaxError::new(
                    ErrorCode::InvalidEmptyOperand,
                    self.cursor.source_pos(),
                ));
            }
            let inner = Frag::Sentinel {
                end: TokenKind::RightPar,
            };
            operand = self.parse_expr(inner)?;
            inner.consume_sentinel(&mut self.cursor)?;
        } else if t.kind == TokenKind::LeftBracket {
            operand = self.parse_lambda_or_array(frag)?;
        } else if t.kind == TokenKind::LeftBrace {
            let lbrace = self.cursor.bump();
            let elements = self.parse_expr_list(TokenKind::RightBrace)?;
            let rbrace = self.expect_raw(TokenKind::RightBrace)?;
            operand = self.alloc_expr(
                ExprKind::List { elements },
                lbrace.span.merge(rbrace.span),
            );
        } else if t.kind.is_literal() {
            self.cursor.bump();
            operand = self.literal_expr(&t);
        } else {
            let ident = self.parse_ident(frag, IdentOptions::in_expression())?;
            let span = self.arena.ident(ident).span;
            operand = self.alloc_expr(ExprKind::Ident(ident), span);
        }

        // Operand continuations.
        while !frag.at_end(&self.cursor) {
            let t = *self.cursor.current();
            match t.kind {
                TokenKind::PlusPlus | TokenKind::MinusMinus => {
                    self.cursor.bump();
                    let op = OperatorId::from_token(t.kind, OperatorContext::Postfix).unwrap();
                    let span = self.arena.expr(operand).span.merge(t.span);
                    operand = self.alloc_expr(ExprKind::Unary { op, arg: operand }, span);
                }
                TokenKind::Dot => {
                    self.cursor.bump();
                    let member =
                        self.parse_ident(frag, IdentOptions::simple_or_template())?;
                    let span = self
                        .arena
                        .expr(operand)
                        .span
                        .merge(self.arena.ident(member).span);
                    operand = self.alloc_expr(
                        ExprKind::MemberAccess {
                            object: operand,
                            member,
                        },
                        span,
                    );
                }
                TokenKind::LeftPar => {
                    self.cursor.bump();
                    let args = self.parse_expr_list(TokenKind::RightPar)?;
                    let rpar = self.expect_raw(TokenKind::RightPar)?;
                    let span = self.arena.expr(operand).span.merge(rpar.span);
                    operand = self.alloc_expr(
                        ExprKind::Call {
                            callee: operand,
                            args,
                        },
                        span,
                    );
                }
                TokenKind::LeftBracket => {
                    self.cursor.bump();
                    if self.cursor.current_kind() == TokenKind::RightBracket {
                        return Err(SyntaxError::new(
                            ErrorCode::InvalidEmptyBrackets,
                            self.cursor.source_pos(),
                        ));
                    }
                    let inner = Frag::Sentinel {
                        end: TokenKind::RightBracket,
                    };
                    let index = self.parse_expr(inner)?;
                    let rbracket = inner.consume_sentinel(&mut self.cursor)?;
                    let span = self.arena.expr(operand).span.merge(rbracket.span);
                    operand = self.alloc_expr(
                        ExprKind::Subscript {
                            array: operand,
                            index,
                        },
                        span,
                    );
                }
                TokenKind::LeftBrace => {
                    // `T{...}` — only after an identifier operand.
                    let ExprKind::Ident(ty) = &self.arena.expr(operand).kind else {
                        break;
                    };
                    let ty = *ty;
                    self.cursor.bump();
                    let args = self.parse_expr_list(TokenKind::RightBrace)?;
                    let rbrace = self.expect_raw(TokenKind::RightBrace)?;
                    let span = self.arena.expr(operand).span.merge(rbrace.span);
                    operand = self.alloc_expr(ExprKind::BraceConstruction { ty, args }, span);
                }
                kind if kind.is_operator()
                    || kind == TokenKind::QuestionMark
                    || kind == TokenKind::Colon =>
                {
                    break;
                }
                _ => {
                    // A template-id that turned out not to be usable as an
                    // operand (e.g. `a < b > c`): reparse the identifier
                    // without template arguments.
                    if self.operand_is_template_ident(operand) {
                        self.cursor.restore(operand_start);
                        let ident = self.parse_ident(frag, IdentOptions::retry_plain())?;
                        let span = self.arena.ident(ident).span;
                        operand = self.alloc_expr(ExprKind::Ident(ident), span);
                        continue;
                    }
                    return Err(SyntaxError::unexpected_token(&t, None));
                }
            }
        }

        Ok(operand)
    }

    fn operand_is_template_ident(&self, operand: ExprId) -> bool {
        match self.arena.expr(operand).kind {
            ExprKind::Ident(id) => matches!(self.arena.ident(id).kind, IdentKind::Template { .. }),
            _ => false,
        }
    }

    fn read_binary_operator(&mut self, frag: Frag) -> ParseRes<InfixTok> {
        debug_assert!(!frag.at_end(&self.cursor));
        let t = *self.cursor.current();

        if t.kind == TokenKind::QuestionMark {
            self.cursor.bump();
            return Ok(InfixTok::Question(t));
        }
        if t.kind == TokenKind::Colon {
            self.cursor.bump();
            return Ok(InfixTok::Colon(t));
        }

        if !t.kind.is_operator() && t.kind != TokenKind::Comma {
            return Err(SyntaxError::at_token(ErrorCode::ExpectedOperator, &t));
        }
        match OperatorId::from_token(t.kind, OperatorContext::Infix) {
            Some(op) => {
                self.cursor.bump();
                Ok(InfixTok::Op(op, t))
            }
            None => Err(SyntaxError::at_token(ErrorCode::ExpectedBinaryOperator, &t)),
        }
    }

    /// Precedence reduction over the collected streams.
    fn build_expression(
        &mut self,
        operands: &[ExprId],
        operators: &[InfixTok],
    ) -> ParseRes<ExprId> {
        if operands.len() == 1 {
            return Ok(operands[0]);
        }
        self.build_range(operands, operators)
    }

    fn build_range(&mut self, operands: &[ExprId], operators: &[InfixTok]) -> ParseRes<ExprId> {
        debug_assert_eq!(operands.len(), operators.len() + 1);
        if operators.is_empty() {
            return Ok(operands[0]);
        }

        // Find the loosest-binding operator; on a tie, left-associative
        // groups split at the later occurrence.
        let mut index = 0;
        let mut prec = operators[0].precedence();
        for (i, op) in operators.iter().enumerate().skip(1) {
            let p = op.precedence();
            if p > prec {
                index = i;
                prec = p;
            } else if p == prec
                && OperatorId::associativity(prec.clamp(1, 15) as u8)
                    == script_ir::ast::Associativity::LeftToRight
            {
                index = i;
            }
        }

        match operators[index] {
            InfixTok::Question(q) => {
                // Matching `:`: skip over colons belonging to nested `?`.
                let mut depth = 0usize;
                let mut matching = None;
                for (j, op) in operators.iter().enumerate().skip(index + 1) {
                    match op {
                        InfixTok::Question(_) => depth += 1,
                        InfixTok::Colon(_) if depth == 0 => {
                            matching = Some(j);
                            break;
                        }
                        InfixTok::Colon(_) => depth -= 1,
                        InfixTok::Op(..) => {}
                    }
                }
                let colon_index = matching.ok_or_else(|| {
                    SyntaxError::new(
                        ErrorCode::MissingConditionalColon,
                        script_ir::SourcePos::new(q.span.start, q.line, q.column),
                    )
                })?;

                let cond = self.build_range(&operands[..=index], &operators[..index])?;
                let on_true = self.build_range(
                    &operands[index + 1..=colon_index],
                    &operators[index + 1..colon_index],
                )?;
                let on_false = self.build_range(
                    &operands[colon_index + 1..],
                    &operators[colon_index + 1..],
                )?;

                let span = self
                    .arena
                    .expr(cond)
                    .span
                    .merge(self.arena.expr(on_false).span);
                Ok(self.alloc_expr(
                    ExprKind::Conditional {
                        cond,
                        on_true,
                        on_false,
                    },
                    span,
                ))
            }
            InfixTok::Colon(c) => Err(SyntaxError::unexpected_token(&c, None)),
            InfixTok::Op(op, _) => {
                let lhs = self.build_range(&operands[..=index], &operators[..index])?;
                let rhs = self.build_range(&operands[index + 1..], &operators[index + 1..])?;
                let span = self
                    .arena
                    .expr(lhs)
                    .span
                    .merge(self.arena.expr(rhs).span);
                Ok(self.alloc_expr(ExprKind::Binary { op, lhs, rhs }, span))
            }
        }
    }

    fn literal_expr(&mut self, t: &Token) -> ExprId {
        let kind = match t.kind {
            TokenKind::True => ExprKind::Bool(true),
            TokenKind::False => ExprKind::Bool(false),
            TokenKind::Int(v) => ExprKind::Int(v),
            TokenKind::Float { bits, single } => ExprKind::Float { bits, single },
            TokenKind::Str(name) => ExprKind::Str(name),
            TokenKind::UserDefined(name) => ExprKind::UserDefined(name),
            _ => unreachable!("literal_expr on a non-literal token"),
        };
        self.alloc_expr(kind, t.span)
    }

    /// Read a specific raw token (no fragment bound check); used right
    /// after a list loop where the closing token is known present.
    pub(crate) fn expect_raw(&mut self, kind: TokenKind) -> ParseRes<Token> {
        let tok = self.cursor.bump();
        if tok.kind != kind {
            return Err(SyntaxError::unexpected_token(&tok, Some(kind)));
        }
        Ok(tok)
    }

    pub(crate) fn alloc_expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.alloc_expr(Expr { kind, span })
    }
}

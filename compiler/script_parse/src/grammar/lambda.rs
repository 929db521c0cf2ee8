//! Lambda vs array-literal disambiguation.
//!
//! Both start with `[`. The bracket content is parsed speculatively as
//! array elements *and* as lambda captures; a `(` after the closing `]`
//! commits to a lambda, anything else to an array. The decision is
//! tri-state (`Undecided | Array | Lambda`) and can be forced early when
//! one interpretation fails while the other is still open.

use script_diagnostic::ErrorCode;
use script_ir::ast::{ExprKind, LambdaCapture, LambdaExpr};
use script_ir::{ExprId, TokenKind};

use crate::error::{ParseRes, SyntaxError};
use crate::fragment::Frag;

use super::ident::IdentOptions;
use super::{Parser, StmtCtx};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Decision {
    Undecided,
    Array,
    Lambda,
}

impl Parser<'_, '_> {
    /// Called with the cursor on `[`.
    pub(crate) fn parse_lambda_or_array(&mut self, frag: Frag) -> ParseRes<ExprId> {
        let lbracket = self.expect(frag, TokenKind::LeftBracket)?;

        let mut decision = Decision::Undecided;
        let mut elements: Vec<ExprId> = Vec::new();
        let mut captures: Vec<LambdaCapture> = Vec::new();

        let sentinel = Frag::Sentinel {
            end: TokenKind::RightBracket,
        };

        while !sentinel.at_end(&self.cursor) {
            let item = sentinel.list_item();
            let item_start = self.cursor.snapshot();

            if matches!(decision, Decision::Undecided | Decision::Array) {
                match self.parse_expr(item) {
                    Ok(elem) => elements.push(elem),
                    Err(err) => {
                        if decision == Decision::Array {
                            return Err(err);
                        }
                        decision = Decision::Lambda;
                        elements.clear();
                    }
                }
            }

            if matches!(decision, Decision::Undecided | Decision::Lambda) {
                let after_expr = self.cursor.snapshot();
                self.cursor.restore(item_start);

                if !self.detect_capture(item) {
                    if decision == Decision::Lambda {
                        return Err(SyntaxError::new(
                            ErrorCode::CouldNotParseLambdaCapture,
                            self.cursor.source_pos(),
                        ));
                    }
                    decision = Decision::Array;
                    captures.clear();
                    self.cursor.restore(after_expr);
                } else {
                    match self.parse_capture(item) {
                        Ok(cap) => captures.push(cap),
                        Err(err) => {
                            if decision == Decision::Lambda {
                                return Err(err);
                            }
                            decision = Decision::Array;
                            captures.clear();
                        }
                    }
                    if !item.at_end(&self.cursor) {
                        self.cursor.restore(after_expr);
                    }
                }
            }

            item.consume_comma(&mut self.cursor);
        }

        sentinel.consume_sentinel(&mut self.cursor)?;

        // A parameter list decides for the lambda; otherwise it is an
        // array literal.
        let is_lambda = !frag.at_end(&self.cursor)
            && self.cursor.current_kind() == TokenKind::LeftPar;

        if !is_lambda {
            if decision == Decision::Lambda {
                let t = *self.cursor.current();
                return Err(SyntaxError::unexpected_token(&t, Some(TokenKind::LeftPar)));
            }
            let end = self.cursor.current().span;
            return Ok(self.alloc_expr(
                ExprKind::Array { elements },
                lbracket.span.merge(end),
            ));
        }

        if decision == Decision::Array {
            let t = *self.cursor.current();
            return Err(SyntaxError::unexpected_token(&t, None));
        }

        // Parameters.
        self.expect_raw(TokenKind::LeftPar)?;
        let params_frag = Frag::Sentinel {
            end: TokenKind::RightPar,
        };
        let mut params = Vec::new();
        while !params_frag.at_end(&self.cursor) {
            let item = params_frag.list_item();
            params.push(self.parse_function_param(item)?);
            item.consume_comma(&mut self.cursor);
        }
        params_frag.consume_sentinel(&mut self.cursor)?;

        // Body.
        let next = frag.peek(&self.cursor)?;
        if next.kind != TokenKind::LeftBrace {
            return Err(SyntaxError::unexpected_token(
                &next,
                Some(TokenKind::LeftBrace),
            ));
        }
        let body = self.parse_compound(frag, StmtCtx::function_body())?;

        let end = self.arena.stmt(body).span;
        Ok(self.alloc_expr(
            ExprKind::Lambda(Box::new(LambdaExpr {
                captures,
                params,
                body,
            })),
            lbracket.span.merge(end),
        ))
    }

    /// Quick look: can the current item be a capture?
    fn detect_capture(&self, item: Frag) -> bool {
        if item.at_end(&self.cursor) {
            return false;
        }
        matches!(
            self.cursor.current_kind(),
            TokenKind::Eq | TokenKind::Amp | TokenKind::Ident(_)
        )
    }

    /// `=`, `&`, `name`, `&name`, `name = expr`.
    fn parse_capture(&mut self, item: Frag) -> ParseRes<LambdaCapture> {
        let t = item.peek(&self.cursor)?;

        if t.kind == TokenKind::Eq {
            self.cursor.bump();
            if !item.at_end(&self.cursor) {
                let t = *self.cursor.current();
                return Err(SyntaxError::unexpected_token(
                    &t,
                    Some(TokenKind::RightBracket),
                ));
            }
            return Ok(LambdaCapture::AllByValue);
        }

        let mut by_ref = false;
        if t.kind == TokenKind::Amp {
            self.cursor.bump();
            by_ref = true;
            if item.at_end(&self.cursor) {
                return Ok(LambdaCapture::AllByRef);
            }
        }

        let name_ident = self.parse_ident(item, IdentOptions::only_simple())?;
        let name = self.simple_name(name_ident)?;

        if item.at_end(&self.cursor) {
            return Ok(LambdaCapture::Named {
                by_ref,
                name,
                value: None,
            });
        }

        self.expect(item, TokenKind::Eq)?;
        let value = self.parse_expr(item)?;
        Ok(LambdaCapture::Named {
            by_ref,
            name,
            value: Some(value),
        })
    }
}

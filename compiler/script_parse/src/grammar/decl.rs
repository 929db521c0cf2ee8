//! Declaration detection and parsing.
//!
//! The parser cannot tell from the leading token whether an ambiguous
//! statement is a declaration or an expression (`a * b;`, `A(b);`,
//! `int f(x);`). Detection reads optional specifiers, a type specifier
//! and a declarator, committing to a decision as soon as one is forced:
//! constructor, destructor, cast operator, function, or variable. If no
//! decision can be made before a natural boundary, the caller rewinds
//! the cursor and parses an expression statement instead.
//!
//! `T name(...)` stays ambiguous even past the opening paren: the
//! contents are parsed *twice*, once as constructor arguments and once
//! as function parameters, until one interpretation fails.

use script_diagnostic::ErrorCode;
use script_ir::ast::{
    Decl, DeclKind, FunctionBody, FunctionDecl, FunctionKind, FunctionParam, IdentKind,
    Initializer, MemberInitializer, QualType, VariableDecl,
};
use script_ir::{DeclId, ExprId, IdentId, Span, TokenKind};

use crate::error::{ParseRes, SyntaxError};
use crate::fragment::Frag;

use super::ident::IdentOptions;
use super::{Parser, StmtCtx};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Decision {
    Undecided,
    NotADecl,
    Variable,
    Function,
    Constructor,
    Destructor,
    Cast,
}

impl Decision {
    fn is_function_like(self) -> bool {
        matches!(
            self,
            Decision::Function | Decision::Constructor | Decision::Destructor | Decision::Cast
        )
    }
}

/// Options for a declaration parse.
#[derive(Copy, Clone, Debug)]
pub(crate) struct DeclParseOpts {
    /// Set when parsing a class body; enables ctor/dtor/cast detection
    /// against this class name.
    pub class_name: Option<IdentId>,
    /// Allow template-ids in the declarator (used under `template<...>`).
    pub declarator_template_ids: bool,
}

impl DeclParseOpts {
    pub fn plain() -> Self {
        DeclParseOpts {
            class_name: None,
            declarator_template_ids: false,
        }
    }

    pub fn member_of(class_name: IdentId) -> Self {
        DeclParseOpts {
            class_name: Some(class_name),
            declarator_template_ids: false,
        }
    }
}

struct DeclBuilder {
    decision: Decision,
    opts: DeclParseOpts,
    start: Span,

    is_virtual: bool,
    is_static: bool,
    is_explicit: bool,

    ty: Option<QualType>,
    name: Option<IdentId>,

    // Function side.
    params: Vec<FunctionParam>,
    params_already_read: bool,
    kind: FunctionKind,
    is_const: bool,

    // Variable side.
    var_args: Vec<ExprId>,
}

impl DeclBuilder {
    fn new(opts: DeclParseOpts, start: Span) -> Self {
        DeclBuilder {
            decision: Decision::Undecided,
            opts,
            start,
            is_virtual: false,
            is_static: false,
            is_explicit: false,
            ty: None,
            name: None,
            params: Vec::new(),
            params_already_read: false,
            kind: FunctionKind::Regular,
            is_const: false,
            var_args: Vec::new(),
        }
    }

    fn in_class(&self) -> bool {
        self.opts.class_name.is_some()
    }
}

impl Parser<'_, '_> {
    /// Try to parse a declaration statement. Returns `Ok(None)` when the
    /// tokens do not form a declaration; the caller must rewind.
    pub(crate) fn try_parse_declaration(
        &mut self,
        frag: Frag,
        class_name: Option<IdentId>,
    ) -> ParseRes<Option<DeclId>> {
        let opts = match class_name {
            Some(name) => DeclParseOpts::member_of(name),
            None => DeclParseOpts::plain(),
        };
        self.try_parse_declaration_with(frag, opts)
    }

    pub(crate) fn try_parse_declaration_with(
        &mut self,
        frag: Frag,
        opts: DeclParseOpts,
    ) -> ParseRes<Option<DeclId>> {
        let start = self.cursor.current().span;
        let mut b = DeclBuilder::new(opts, start);

        if !self.detect_decl(frag, &mut b)? {
            return Ok(None);
        }
        self.parse_detected(frag, b).map(Some)
    }

    /// Declaration parse for `for`-init position: anything detected must
    /// be a variable.
    pub(crate) fn try_parse_declaration_as_variable(
        &mut self,
        frag: Frag,
    ) -> ParseRes<Option<DeclId>> {
        let start = self.cursor.current().span;
        let mut b = DeclBuilder::new(DeclParseOpts::plain(), start);

        if !self.detect_decl(frag, &mut b)? {
            return Ok(None);
        }
        if b.decision == Decision::Undecided {
            b.decision = Decision::Variable;
        }
        if b.decision != Decision::Variable {
            let t = *self.cursor.current();
            return Err(SyntaxError::unexpected_token(&t, None));
        }
        self.parse_detected(frag, b).map(Some)
    }

    /// Member declaration inside a class body; failure to detect is an
    /// error rather than a rewind.
    pub(crate) fn parse_member_declaration(
        &mut self,
        frag: Frag,
        class_name: IdentId,
    ) -> ParseRes<DeclId> {
        match self.try_parse_declaration_with(frag, DeclParseOpts::member_of(class_name))? {
            Some(decl) => Ok(decl),
            None => Err(SyntaxError::new(
                ErrorCode::ExpectedDeclaration,
                self.cursor.source_pos(),
            )),
        }
    }

    /// Declaration under `template<...>`: must be a function (class
    /// templates are dispatched before this).
    pub(crate) fn parse_template_function_decl(&mut self, frag: Frag) -> ParseRes<DeclId> {
        let start = self.cursor.current().span;
        let mut b = DeclBuilder::new(
            DeclParseOpts {
                class_name: None,
                declarator_template_ids: true,
            },
            start,
        );

        if !self.detect_decl(frag, &mut b)? {
            return Err(SyntaxError::new(
                ErrorCode::ExpectedDeclaration,
                self.cursor.source_pos(),
            ));
        }
        if b.decision == Decision::Undecided {
            b.decision = Decision::Function;
        }
        self.parse_detected(frag, b)
    }

    // === Detection ===

    fn detect_decl(&mut self, frag: Frag, b: &mut DeclBuilder) -> ParseRes<bool> {
        self.read_optional_specifiers(frag, b)?;

        if self.detect_before_type_specifier(frag, b)? {
            return Ok(true);
        }

        // Type specifier; failure means "not a declaration".
        match self.parse_qual_type(frag) {
            Ok(ty) => b.ty = Some(ty),
            Err(err) => {
                if b.decision != Decision::Undecided {
                    return Err(err);
                }
                b.decision = Decision::NotADecl;
                return Ok(false);
            }
        }

        if self.detect_before_declarator(frag, b) {
            return Ok(true);
        }

        // Declarator.
        let declarator_opts = if b.opts.declarator_template_ids {
            IdentOptions::template_declarator()
        } else {
            IdentOptions::declarator()
        };
        match self.parse_ident(frag, declarator_opts) {
            Ok(name) => b.name = Some(name),
            Err(err) => {
                if b.decision != Decision::Undecided {
                    return Err(err);
                }
                b.decision = Decision::NotADecl;
                return Ok(false);
            }
        }

        self.detect_from_declarator(b);

        if !frag.at_end(&self.cursor) && self.cursor.current_kind() == TokenKind::Semicolon {
            if b.decision == Decision::Undecided {
                b.decision = Decision::Variable;
            }
        }

        Ok(true)
    }

    fn read_optional_specifiers(&mut self, frag: Frag, b: &mut DeclBuilder) -> ParseRes<()> {
        if !frag.at_end(&self.cursor) && self.cursor.current_kind() == TokenKind::Virtual {
            let t = self.cursor.bump();
            if !b.in_class() {
                return Err(SyntaxError::keyword(ErrorCode::IllegalUseOfKeyword, &t));
            }
            b.is_virtual = true;
        }

        if !frag.at_end(&self.cursor) && self.cursor.current_kind() == TokenKind::Static {
            self.cursor.bump();
            b.is_static = true;
        }

        if !frag.at_end(&self.cursor) && self.cursor.current_kind() == TokenKind::Explicit {
            let t = self.cursor.bump();
            if !b.in_class() {
                return Err(SyntaxError::keyword(ErrorCode::IllegalUseOfKeyword, &t));
            }
            b.is_explicit = true;
        }

        Ok(())
    }

    /// Destructor, cast operator, and `explicit` constructor detection;
    /// these commit before any type specifier is read.
    fn detect_before_type_specifier(&mut self, frag: Frag, b: &mut DeclBuilder) -> ParseRes<bool> {
        if !b.in_class() {
            return Ok(false);
        }
        if self.detect_dtor(frag, b)? {
            return Ok(true);
        }
        if self.detect_cast(frag, b)? {
            return Ok(true);
        }
        self.detect_explicit_ctor(frag, b)
    }

    fn detect_dtor(&mut self, frag: Frag, b: &mut DeclBuilder) -> ParseRes<bool> {
        if frag.at_end(&self.cursor) || self.cursor.current_kind() != TokenKind::Tilde {
            return Ok(false);
        }
        self.cursor.bump();

        let name = self.parse_ident(frag, IdentOptions::simple_or_template())?;
        if !self.is_class_name(b, name) {
            return Err(SyntaxError::new(
                ErrorCode::ExpectedCurrentClassName,
                self.cursor.source_pos(),
            ));
        }

        b.decision = Decision::Destructor;
        b.name = Some(name);
        b.kind = FunctionKind::Destructor;
        Ok(true)
    }

    fn detect_cast(&mut self, frag: Frag, b: &mut DeclBuilder) -> ParseRes<bool> {
        if frag.at_end(&self.cursor) || self.cursor.current_kind() != TokenKind::Operator {
            return Ok(false);
        }

        let snap = self.cursor.snapshot();
        self.cursor.bump(); // `operator`

        // A cast target type never carries a signature suffix.
        match self.parse_qual_type_no_signature(frag) {
            Ok(target) => {
                b.decision = Decision::Cast;
                b.kind = FunctionKind::Cast { target };
                Ok(true)
            }
            Err(err) => {
                if b.is_explicit {
                    return Err(err);
                }
                // `operator+`, `operator()` etc. — not a cast; let the
                // declarator path read the operator name.
                self.cursor.restore(snap);
                Ok(false)
            }
        }
    }

    fn detect_explicit_ctor(&mut self, frag: Frag, b: &mut DeclBuilder) -> ParseRes<bool> {
        if !b.is_explicit {
            return Ok(false);
        }

        let snap = self.cursor.snapshot();
        let name = match self.parse_ident(frag, IdentOptions::in_expression()) {
            Ok(name) => name,
            Err(_) => {
                self.cursor.restore(snap);
                return Ok(false);
            }
        };
        if !self.is_class_name(b, name) || self.cursor.current_kind() != TokenKind::LeftPar {
            self.cursor.restore(snap);
            return Ok(false);
        }

        b.decision = Decision::Constructor;
        b.name = Some(name);
        b.kind = FunctionKind::Constructor {
            initializers: Vec::new(),
        };
        Ok(true)
    }

    /// Constructors misread as types: `A(int, int) : a(0) {}` parses its
    /// head as a function-signature type; `A(` parses as a class name
    /// about to be called.
    fn detect_before_declarator(&mut self, frag: Frag, b: &mut DeclBuilder) -> bool {
        if !b.in_class() || frag.at_end(&self.cursor) {
            return false;
        }

        let next = self.cursor.current_kind();
        let ty = b.ty.as_ref().expect("type specifier read");

        if let Some(sig) = &ty.signature {
            if matches!(
                next,
                TokenKind::Colon | TokenKind::LeftBrace | TokenKind::Eq
            ) && sig.return_type.is_simple()
            {
                if let Some(ret_ident) = sig.return_type.ident {
                    if self.is_class_name(b, ret_ident) {
                        b.decision = Decision::Constructor;
                        b.name = Some(ret_ident);
                        b.kind = FunctionKind::Constructor {
                            initializers: Vec::new(),
                        };
                        b.params = sig
                            .params
                            .iter()
                            .map(|p| FunctionParam {
                                ty: p.clone(),
                                name: None,
                                default_value: None,
                            })
                            .collect();
                        b.params_already_read = true;
                        b.ty = None;
                        return true;
                    }
                }
            }
        } else if next == TokenKind::LeftPar
            && ty.is_simple()
            && ty.ident.is_some()
            && self.is_class_name(b, ty.ident.unwrap())
        {
            b.decision = Decision::Constructor;
            b.name = ty.ident;
            b.kind = FunctionKind::Constructor {
                initializers: Vec::new(),
            };
            b.ty = None;
            return true;
        }

        false
    }

    fn detect_from_declarator(&mut self, b: &mut DeclBuilder) {
        let Some(name) = b.name else { return };
        match self.arena.ident(name).kind {
            IdentKind::Operator(_) | IdentKind::LiteralOperator(_) => {
                b.decision = Decision::Function;
            }
            _ => {
                if b.is_virtual {
                    b.decision = Decision::Function;
                }
            }
        }
    }

    fn is_class_name(&self, b: &DeclBuilder, name: IdentId) -> bool {
        let Some(class_name) = b.opts.class_name else {
            return false;
        };
        let candidate = match &self.arena.ident(name).kind {
            IdentKind::Simple(n) => *n,
            _ => return false,
        };
        match self.arena.ident(class_name).kind {
            IdentKind::Simple(n) | IdentKind::Template { name: n, .. } => n == candidate,
            _ => false,
        }
    }

    // === Parsing after detection ===

    fn parse_detected(&mut self, frag: Frag, mut b: DeclBuilder) -> ParseRes<DeclId> {
        match b.decision {
            Decision::NotADecl => unreachable!("parse_detected on NotADecl"),
            Decision::Destructor => self.parse_destructor(frag, b),
            Decision::Constructor => self.parse_constructor(frag, b),
            Decision::Cast | Decision::Function => self.parse_function_rest(frag, b),
            Decision::Variable => self.parse_variable_rest(frag, b),
            Decision::Undecided => {
                let next = frag.peek(&self.cursor)?;
                match next.kind {
                    TokenKind::LeftBrace | TokenKind::Eq => {
                        b.decision = Decision::Variable;
                        self.parse_variable_rest(frag, b)
                    }
                    TokenKind::LeftPar => self.parse_args_or_params(frag, b),
                    _ => Err(SyntaxError::unexpected_token(&next, None)),
                }
            }
        }
    }

    /// The still-ambiguous `T name( ... )` case: parse each list element
    /// both as a constructor argument and as a parameter declaration
    /// until one side fails, then finish as whatever survived.
    fn parse_args_or_params(&mut self, frag: Frag, mut b: DeclBuilder) -> ParseRes<DeclId> {
        self.expect(frag, TokenKind::LeftPar)?;

        let sentinel = Frag::Sentinel {
            end: TokenKind::RightPar,
        };

        while !sentinel.at_end(&self.cursor) {
            let item = sentinel.list_item();
            let item_start = self.cursor.snapshot();

            if matches!(b.decision, Decision::Undecided | Decision::Variable) {
                match self.parse_expr(item) {
                    Ok(expr) => b.var_args.push(expr),
                    Err(err) => {
                        if b.decision == Decision::Variable {
                            return Err(err);
                        }
                        b.decision = Decision::Function;
                    }
                }
            }

            let after_expr = self.cursor.snapshot();

            if matches!(b.decision, Decision::Undecided) || b.decision.is_function_like() {
                self.cursor.restore(item_start);
                match self.parse_function_param(item) {
                    Ok(param) => b.params.push(param),
                    Err(err) => {
                        if b.decision.is_function_like() {
                            return Err(err);
                        }
                        b.decision = Decision::Variable;
                    }
                }
            }

            if !item.at_end(&self.cursor) {
                self.cursor.restore(after_expr);
            }
            if !item.at_end(&self.cursor) {
                let t = *self.cursor.current();
                return Err(SyntaxError::unexpected_token(&t, None));
            }
            item.consume_comma(&mut self.cursor);
        }

        sentinel.consume_sentinel(&mut self.cursor)?;

        // `const` after the parameter list settles it: function.
        if !frag.at_end(&self.cursor) && self.cursor.current_kind() == TokenKind::Const {
            if b.decision == Decision::Variable {
                let t = *self.cursor.current();
                return Err(SyntaxError::unexpected_token(&t, None));
            }
            self.cursor.bump();
            b.is_const = true;
            b.decision = Decision::Function;
        }

        if let Some(body) = self.read_optional_special_body(frag, &mut b)? {
            b.decision = Decision::Function;
            return self.finish_function(b, body);
        }

        let next = frag.peek(&self.cursor)?;
        match next.kind {
            TokenKind::LeftBrace => {
                if b.decision == Decision::Variable {
                    return Err(SyntaxError::unexpected_token(&next, None));
                }
                b.decision = Decision::Function;
                let body = self.parse_function_body(frag)?;
                self.finish_function(b, FunctionBody::Block(body))
            }
            TokenKind::Semicolon => {
                if b.decision.is_function_like() {
                    return Err(SyntaxError::unexpected_token(
                        &next,
                        Some(TokenKind::LeftBrace),
                    ));
                }
                self.cursor.bump();
                let args = std::mem::take(&mut b.var_args);
                self.finish_variable(b, Initializer::Constructor(args))
            }
            _ => Err(SyntaxError::unexpected_token(&next, None)),
        }
    }

    fn parse_variable_rest(&mut self, frag: Frag, b: DeclBuilder) -> ParseRes<DeclId> {
        let init = match frag.peek(&self.cursor)?.kind {
            TokenKind::Eq => {
                self.cursor.bump();
                let stmt_frag = Frag::stmt();
                let expr = self.parse_expr(stmt_frag)?;
                Initializer::Assignment(expr)
            }
            TokenKind::LeftBrace => {
                self.cursor.bump();
                let args = self.parse_expr_list(TokenKind::RightBrace)?;
                self.expect_raw(TokenKind::RightBrace)?;
                Initializer::Brace(args)
            }
            TokenKind::LeftPar => {
                self.cursor.bump();
                let args = self.parse_expr_list(TokenKind::RightPar)?;
                self.expect_raw(TokenKind::RightPar)?;
                Initializer::Constructor(args)
            }
            TokenKind::Semicolon => Initializer::None,
            _ => {
                let t = *self.cursor.current();
                return Err(SyntaxError::unexpected_token(&t, None));
            }
        };

        self.expect(frag, TokenKind::Semicolon)?;
        self.finish_variable(b, init)
    }

    fn parse_function_rest(&mut self, frag: Frag, mut b: DeclBuilder) -> ParseRes<DeclId> {
        self.read_params(frag, &mut b)?;

        if !frag.at_end(&self.cursor) && self.cursor.current_kind() == TokenKind::Const {
            self.cursor.bump();
            b.is_const = true;
        }

        if let Some(body) = self.read_optional_special_body(frag, &mut b)? {
            return self.finish_function(b, body);
        }

        let body = self.parse_function_body(frag)?;
        self.finish_function(b, FunctionBody::Block(body))
    }

    fn parse_constructor(&mut self, frag: Frag, mut b: DeclBuilder) -> ParseRes<DeclId> {
        if !b.params_already_read {
            self.read_params(frag, &mut b)?;
        }

        let initializers = self.read_optional_member_initializers(frag)?;
        b.kind = FunctionKind::Constructor { initializers };

        if let Some(body) = self.read_optional_special_body(frag, &mut b)? {
            return self.finish_function(b, body);
        }

        let body = self.parse_function_body(frag)?;
        self.finish_function(b, FunctionBody::Block(body))
    }

    fn parse_destructor(&mut self, frag: Frag, mut b: DeclBuilder) -> ParseRes<DeclId> {
        self.expect(frag, TokenKind::LeftPar)?;
        self.expect(frag, TokenKind::RightPar)?;

        if let Some(body) = self.read_optional_special_body(frag, &mut b)? {
            return self.finish_function(b, body);
        }

        let body = self.parse_function_body(frag)?;
        self.finish_function(b, FunctionBody::Block(body))
    }

    fn read_params(&mut self, frag: Frag, b: &mut DeclBuilder) -> ParseRes<()> {
        self.expect(frag, TokenKind::LeftPar)?;

        let sentinel = Frag::Sentinel {
            end: TokenKind::RightPar,
        };
        while !sentinel.at_end(&self.cursor) {
            let item = sentinel.list_item();
            let param = self.parse_function_param(item)?;
            b.params.push(param);
            item.consume_comma(&mut self.cursor);
        }
        sentinel.consume_sentinel(&mut self.cursor)?;
        Ok(())
    }

    pub(crate) fn parse_function_param(&mut self, frag: Frag) -> ParseRes<FunctionParam> {
        let ty = self.parse_qual_type(frag)?;

        if frag.at_end(&self.cursor) {
            return Ok(FunctionParam {
                ty,
                name: None,
                default_value: None,
            });
        }

        let name_ident = self.parse_ident(frag, IdentOptions::only_simple())?;
        let name = self.simple_name(name_ident)?;

        if frag.at_end(&self.cursor) {
            return Ok(FunctionParam {
                ty,
                name: Some(name),
                default_value: None,
            });
        }

        self.expect(frag, TokenKind::Eq)?;
        let default_value = self.parse_expr(frag)?;
        Ok(FunctionParam {
            ty,
            name: Some(name),
            default_value: Some(default_value),
        })
    }

    /// `= delete;`, `= default;`, `= 0;` (pure virtual, members only).
    fn read_optional_special_body(
        &mut self,
        frag: Frag,
        b: &mut DeclBuilder,
    ) -> ParseRes<Option<FunctionBody>> {
        if b.decision == Decision::Variable {
            return Ok(None);
        }
        if frag.at_end(&self.cursor) || self.cursor.current_kind() != TokenKind::Eq {
            return Ok(None);
        }

        let snap = self.cursor.snapshot();
        self.cursor.bump(); // '='

        let next = *self.cursor.current();
        let body = match next.kind {
            TokenKind::Delete => {
                self.cursor.bump();
                FunctionBody::Deleted
            }
            TokenKind::Default => {
                self.cursor.bump();
                FunctionBody::Defaulted
            }
            TokenKind::Int(0) if b.in_class() => {
                self.cursor.bump();
                FunctionBody::Pure
            }
            _ => {
                self.cursor.restore(snap);
                return Ok(None);
            }
        };

        self.expect(frag, TokenKind::Semicolon)?;
        Ok(Some(body))
    }

    fn read_optional_member_initializers(
        &mut self,
        frag: Frag,
    ) -> ParseRes<Vec<MemberInitializer>> {
        let mut inits = Vec::new();
        if frag.at_end(&self.cursor) || self.cursor.current_kind() != TokenKind::Colon {
            return Ok(inits);
        }
        self.cursor.bump(); // ':'

        loop {
            let name = self.parse_ident(frag, IdentOptions::simple_or_template())?;

            match self.cursor.current_kind() {
                TokenKind::LeftBrace => {
                    self.cursor.bump();
                    let args = self.parse_expr_list(TokenKind::RightBrace)?;
                    self.expect_raw(TokenKind::RightBrace)?;
                    inits.push(MemberInitializer {
                        name,
                        brace_form: true,
                        args,
                    });
                }
                TokenKind::LeftPar => {
                    self.cursor.bump();
                    let args = self.parse_expr_list(TokenKind::RightPar)?;
                    self.expect_raw(TokenKind::RightPar)?;
                    inits.push(MemberInitializer {
                        name,
                        brace_form: false,
                        args,
                    });
                }
                _ => {
                    let t = *self.cursor.current();
                    return Err(SyntaxError::unexpected_token(&t, Some(TokenKind::LeftPar)));
                }
            }

            if self.cursor.current_kind() == TokenKind::LeftBrace {
                break;
            }
            self.expect(frag, TokenKind::Comma)?;
        }

        Ok(inits)
    }

    fn parse_function_body(&mut self, frag: Frag) -> ParseRes<script_ir::StmtId> {
        let next = frag.peek(&self.cursor)?;
        if next.kind != TokenKind::LeftBrace {
            return Err(SyntaxError::unexpected_token(
                &next,
                Some(TokenKind::LeftBrace),
            ));
        }
        self.parse_compound(frag, StmtCtx::function_body())
    }

    // === Finishers ===

    fn finish_variable(&mut self, b: DeclBuilder, init: Initializer) -> ParseRes<DeclId> {
        let name_id = b.name.expect("variable declarator");
        let name = self.simple_name(name_id)?;
        let end = self.cursor.current().span;

        let decl = Decl {
            kind: DeclKind::Variable(VariableDecl {
                ty: b.ty.expect("variable type"),
                name,
                is_static: b.is_static,
                init,
            }),
            span: b.start.merge(end),
        };
        Ok(self.arena.alloc_decl(decl))
    }

    fn finish_function(&mut self, b: DeclBuilder, body: FunctionBody) -> ParseRes<DeclId> {
        let end = self.cursor.current().span;

        // Cast operators have no declarator of their own; synthesize the
        // name from the decision for uniform storage.
        let name = match b.name {
            Some(name) => name,
            None => match &b.kind {
                FunctionKind::Cast { .. } => self.alloc_ident(
                    IdentKind::Simple(self.interner.intern("operator cast")),
                    b.start,
                ),
                _ => {
                    return Err(SyntaxError::new(
                        ErrorCode::ExpectedIdentifier,
                        self.cursor.source_pos(),
                    ))
                }
            },
        };

        let return_type = match &b.kind {
            FunctionKind::Constructor { .. } | FunctionKind::Destructor => None,
            FunctionKind::Cast { .. } => None,
            FunctionKind::Regular => b.ty.clone(),
        };

        let decl = Decl {
            kind: DeclKind::Function(FunctionDecl {
                name,
                return_type,
                params: b.params,
                body,
                kind: b.kind,
                is_virtual: b.is_virtual,
                is_static: b.is_static,
                is_explicit: b.is_explicit,
                is_const: b.is_const,
            }),
            span: b.start.merge(end),
        };
        Ok(self.arena.alloc_decl(decl))
    }
}

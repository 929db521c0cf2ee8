//! Item parsers: classes, enums, namespaces, templates, typedefs,
//! using-constructs and imports.

use script_diagnostic::ErrorCode;
use script_ir::ast::{
    AccessSpecifier, ClassDecl, ClassMember, Decl, DeclKind, EnumDecl, EnumValueDecl, IdentKind,
    StmtKind, TemplateDecl, TemplateParam, TemplateParamKind, UsingDecl,
};
use script_ir::{DeclId, StmtId, TokenKind};

use crate::error::{ParseRes, SyntaxError};
use crate::fragment::Frag;

use super::ident::IdentOptions;
use super::{Parser, StmtCtx};

impl Parser<'_, '_> {
    // === Classes ===

    pub(crate) fn parse_class_statement(&mut self, frag: Frag) -> ParseRes<StmtId> {
        let decl = self.parse_class_decl(frag, false)?;
        let span = self.arena.decl(decl).span;
        Ok(self.alloc_stmt(StmtKind::Declaration(decl), span))
    }

    /// `class Name (: Parent)? { members };`
    pub(crate) fn parse_class_decl(
        &mut self,
        frag: Frag,
        template_header: bool,
    ) -> ParseRes<DeclId> {
        let kw = frag.read(&mut self.cursor)?;
        debug_assert!(matches!(kw.kind, TokenKind::Class | TokenKind::Struct));

        let name_opts = if template_header {
            IdentOptions::simple_or_template()
        } else {
            IdentOptions::only_simple()
        };
        let name = self.parse_ident(frag, name_opts)?;

        let mut parent = None;
        if !frag.at_end(&self.cursor) && self.cursor.current_kind() == TokenKind::Colon {
            self.cursor.bump();
            parent = Some(self.parse_ident(frag, IdentOptions::in_expression())?);
        }

        self.expect(frag, TokenKind::LeftBrace)?;

        let body = Frag::Sentinel {
            end: TokenKind::RightBrace,
        };
        let mut members = Vec::new();
        let mut access = AccessSpecifier::Public;

        while !body.at_end(&self.cursor) {
            match self.cursor.current_kind() {
                TokenKind::Public | TokenKind::Protected | TokenKind::Private => {
                    let t = self.cursor.bump();
                    access = match t.kind {
                        TokenKind::Public => AccessSpecifier::Public,
                        TokenKind::Protected => AccessSpecifier::Protected,
                        _ => AccessSpecifier::Private,
                    };
                    self.expect(body, TokenKind::Colon)?;
                }
                TokenKind::Friend => {
                    let decl = self.parse_friend_decl(body)?;
                    members.push(ClassMember { access, decl });
                }
                TokenKind::Using => {
                    let decl = self.parse_using_decl(body)?;
                    members.push(ClassMember { access, decl });
                }
                TokenKind::Template => {
                    let decl = self.parse_template_decl(body)?;
                    members.push(ClassMember { access, decl });
                }
                TokenKind::Enum => {
                    let decl = self.parse_enum_decl(body)?;
                    members.push(ClassMember { access, decl });
                }
                _ => {
                    let decl = self.parse_member_declaration(body, name)?;
                    members.push(ClassMember { access, decl });
                }
            }
        }

        body.consume_sentinel(&mut self.cursor)?;
        let semi = self.expect(frag, TokenKind::Semicolon)?;

        Ok(self.arena.alloc_decl(Decl {
            kind: DeclKind::Class(ClassDecl {
                name,
                parent,
                members,
            }),
            span: kw.span.merge(semi.span),
        }))
    }

    fn parse_friend_decl(&mut self, frag: Frag) -> ParseRes<DeclId> {
        let kw = frag.read(&mut self.cursor)?;
        self.expect(frag, TokenKind::Class)?;
        let class_name = self.parse_ident(frag, IdentOptions::in_expression())?;
        let semi = self.expect(frag, TokenKind::Semicolon)?;

        Ok(self.arena.alloc_decl(Decl {
            kind: DeclKind::Friend { class_name },
            span: kw.span.merge(semi.span),
        }))
    }

    // === Enums ===

    pub(crate) fn parse_enum_statement(&mut self, frag: Frag) -> ParseRes<StmtId> {
        let decl = self.parse_enum_decl(frag)?;
        let span = self.arena.decl(decl).span;
        Ok(self.alloc_stmt(StmtKind::Declaration(decl), span))
    }

    /// `enum (class)? Name { a, b = expr, ... };`
    pub(crate) fn parse_enum_decl(&mut self, frag: Frag) -> ParseRes<DeclId> {
        let kw = frag.read(&mut self.cursor)?;
        debug_assert_eq!(kw.kind, TokenKind::Enum);

        let mut is_enum_class = false;
        if self.cursor.current_kind() == TokenKind::Class {
            self.cursor.bump();
            is_enum_class = true;
        }

        let name_ident = self.parse_ident(frag, IdentOptions::only_simple())?;
        let name = self.simple_name(name_ident)?;

        self.expect(frag, TokenKind::LeftBrace)?;

        let body = Frag::Sentinel {
            end: TokenKind::RightBrace,
        };
        let mut values = Vec::new();
        while !body.at_end(&self.cursor) {
            let item = body.list_item();
            if item.at_end(&self.cursor) {
                // Tolerate a trailing comma.
                item.consume_comma(&mut self.cursor);
                continue;
            }

            let value_ident = self.parse_ident(item, IdentOptions::only_simple())?;
            let value_name = self.simple_name(value_ident)?;

            let mut value = None;
            if !item.at_end(&self.cursor) {
                self.expect(item, TokenKind::Eq)?;
                value = Some(self.parse_expr(item)?);
            }

            values.push(EnumValueDecl {
                name: value_name,
                value,
            });
            item.consume_comma(&mut self.cursor);
        }

        body.consume_sentinel(&mut self.cursor)?;
        let semi = self.expect(frag, TokenKind::Semicolon)?;

        Ok(self.arena.alloc_decl(Decl {
            kind: DeclKind::Enum(EnumDecl {
                name,
                is_enum_class,
                values,
            }),
            span: kw.span.merge(semi.span),
        }))
    }

    // === Namespaces ===

    pub(crate) fn parse_namespace_statement(&mut self, frag: Frag) -> ParseRes<StmtId> {
        let kw = frag.read(&mut self.cursor)?;
        debug_assert_eq!(kw.kind, TokenKind::Namespace);

        let name_ident = self.parse_ident(frag, IdentOptions::only_simple())?;
        let name = self.simple_name(name_ident)?;

        // `namespace a = b;` — alias definition.
        if self.cursor.current_kind() == TokenKind::Eq {
            self.cursor.bump();
            let aliased = self.parse_ident(frag, IdentOptions::in_expression())?;
            let semi = self.expect(frag, TokenKind::Semicolon)?;
            let decl = self.arena.alloc_decl(Decl {
                kind: DeclKind::NamespaceAlias { name, aliased },
                span: kw.span.merge(semi.span),
            });
            return Ok(self.alloc_stmt(StmtKind::Declaration(decl), kw.span.merge(semi.span)));
        }

        self.expect(frag, TokenKind::LeftBrace)?;

        let body = Frag::Sentinel {
            end: TokenKind::RightBrace,
        };
        let mut declarations = Vec::new();
        while !body.at_end(&self.cursor) {
            declarations.push(self.parse_statement(body, StmtCtx::top_level())?);
        }
        let rbrace = body.consume_sentinel(&mut self.cursor)?;

        let span = kw.span.merge(rbrace.span);
        let decl = self.arena.alloc_decl(Decl {
            kind: DeclKind::Namespace { name, declarations },
            span,
        });
        Ok(self.alloc_stmt(StmtKind::Declaration(decl), span))
    }

    // === Typedef / using ===

    pub(crate) fn parse_typedef_statement(&mut self, frag: Frag) -> ParseRes<StmtId> {
        let kw = frag.read(&mut self.cursor)?;
        debug_assert_eq!(kw.kind, TokenKind::Typedef);

        let ty = self.parse_qual_type(frag)?;
        let name_ident = self.parse_ident(frag, IdentOptions::only_simple())?;
        let name = self.simple_name(name_ident)?;
        let semi = self.expect(frag, TokenKind::Semicolon)?;

        let span = kw.span.merge(semi.span);
        let decl = self.arena.alloc_decl(Decl {
            kind: DeclKind::Typedef { ty, name },
            span,
        });
        Ok(self.alloc_stmt(StmtKind::Declaration(decl), span))
    }

    pub(crate) fn parse_using_statement(&mut self, frag: Frag) -> ParseRes<StmtId> {
        let decl = self.parse_using_decl(frag)?;
        let span = self.arena.decl(decl).span;
        Ok(self.alloc_stmt(StmtKind::Declaration(decl), span))
    }

    /// `using namespace ns;` | `using ns::x;` | `using T = U;`
    fn parse_using_decl(&mut self, frag: Frag) -> ParseRes<DeclId> {
        let kw = frag.read(&mut self.cursor)?;
        debug_assert_eq!(kw.kind, TokenKind::Using);

        if self.cursor.current_kind() == TokenKind::Namespace {
            self.cursor.bump();
            let name = self.parse_ident(frag, IdentOptions::in_expression())?;
            let semi = self.expect(frag, TokenKind::Semicolon)?;
            return Ok(self.arena.alloc_decl(Decl {
                kind: DeclKind::Using(UsingDecl::Directive { name }),
                span: kw.span.merge(semi.span),
            }));
        }

        let name = self.parse_ident(frag, IdentOptions::in_expression())?;

        if matches!(self.arena.ident(name).kind, IdentKind::Scoped { .. }) {
            let semi = self.expect(frag, TokenKind::Semicolon)?;
            return Ok(self.arena.alloc_decl(Decl {
                kind: DeclKind::Using(UsingDecl::Declaration { name }),
                span: kw.span.merge(semi.span),
            }));
        }

        let alias_name = self.simple_name(name)?;
        self.expect(frag, TokenKind::Eq)?;
        let aliased = self.parse_ident(frag, IdentOptions::in_expression())?;
        let semi = self.expect(frag, TokenKind::Semicolon)?;

        Ok(self.arena.alloc_decl(Decl {
            kind: DeclKind::Using(UsingDecl::TypeAlias {
                name: alias_name,
                aliased,
            }),
            span: kw.span.merge(semi.span),
        }))
    }

    // === Imports ===

    /// `import a.b.c;` | `export import a.b.c;`
    pub(crate) fn parse_import_statement(&mut self, frag: Frag) -> ParseRes<StmtId> {
        let first = frag.read(&mut self.cursor)?;
        let export = first.kind == TokenKind::Export;
        let kw = if export {
            self.expect(frag, TokenKind::Import)?
        } else {
            first
        };
        debug_assert_eq!(kw.kind, TokenKind::Import);

        let mut names = Vec::new();
        let tok = frag.read(&mut self.cursor)?;
        let TokenKind::Ident(name) = tok.kind else {
            return Err(SyntaxError::at_token(ErrorCode::ExpectedIdentifier, &tok));
        };
        names.push(name);

        while self.cursor.current_kind() == TokenKind::Dot {
            self.cursor.bump();
            let tok = frag.read(&mut self.cursor)?;
            let TokenKind::Ident(name) = tok.kind else {
                return Err(SyntaxError::at_token(ErrorCode::ExpectedIdentifier, &tok));
            };
            names.push(name);
        }

        let semi = self.expect(frag, TokenKind::Semicolon)?;
        let span = first.span.merge(semi.span);
        let decl = self.arena.alloc_decl(Decl {
            kind: DeclKind::Import { export, names },
            span,
        });
        Ok(self.alloc_stmt(StmtKind::Declaration(decl), span))
    }

    // === Templates ===

    pub(crate) fn parse_template_statement(&mut self, frag: Frag) -> ParseRes<StmtId> {
        let decl = self.parse_template_decl(frag)?;
        let span = self.arena.decl(decl).span;
        Ok(self.alloc_stmt(StmtKind::Declaration(decl), span))
    }

    /// `template <typename T, int N = 4> class-or-function`
    pub(crate) fn parse_template_decl(&mut self, frag: Frag) -> ParseRes<DeclId> {
        let kw = frag.read(&mut self.cursor)?;
        debug_assert_eq!(kw.kind, TokenKind::Template);

        self.expect(frag, TokenKind::Less)?;

        self.template_depth += 1;
        let params = self.parse_template_params();
        self.template_depth -= 1;
        let params = params?;

        let declaration = if matches!(
            self.cursor.current_kind(),
            TokenKind::Class | TokenKind::Struct
        ) {
            self.parse_class_decl(frag, true)?
        } else {
            self.parse_template_function_decl(frag)?
        };

        let span = kw.span.merge(self.arena.decl(declaration).span);
        Ok(self.arena.alloc_decl(Decl {
            kind: DeclKind::Template(TemplateDecl {
                params,
                declaration,
            }),
            span,
        }))
    }

    fn parse_template_params(&mut self) -> ParseRes<Vec<TemplateParam>> {
        let list = Frag::TemplateList {
            depth: self.template_depth,
        };

        let mut params = Vec::new();
        while !list.at_end(&self.cursor) {
            let item = list.template_arg();
            params.push(self.parse_template_param(item)?);
            item.consume_comma(&mut self.cursor);
        }
        list.consume_template_end(&mut self.cursor)?;
        Ok(params)
    }

    fn parse_template_param(&mut self, frag: Frag) -> ParseRes<TemplateParam> {
        let kw = frag.read(&mut self.cursor)?;
        let kind = match kw.kind {
            TokenKind::Typename => TemplateParamKind::Type,
            TokenKind::Int_ => TemplateParamKind::Int,
            TokenKind::Bool => TemplateParamKind::Bool,
            _ => return Err(SyntaxError::unexpected_token(&kw, None)),
        };

        let name_tok = frag.read(&mut self.cursor)?;
        let TokenKind::Ident(name) = name_tok.kind else {
            return Err(SyntaxError::at_token(
                ErrorCode::ExpectedIdentifier,
                &name_tok,
            ));
        };

        if frag.at_end(&self.cursor) {
            return Ok(TemplateParam {
                kind,
                name,
                default_value: None,
            });
        }

        self.expect(frag, TokenKind::Eq)?;
        let default_value = Some(self.parse_template_arg(frag)?);

        Ok(TemplateParam {
            kind,
            name,
            default_value,
        })
    }
}

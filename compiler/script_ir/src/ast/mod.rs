//! The syntax tree.
//!
//! Nodes are immutable after construction and live in an [`AstArena`]
//! owned by the translation unit; children are referenced through id
//! newtypes. Identifiers, expressions, statements and declarations each
//! have their own arena category.

mod decl;
mod expr;
mod ident;
pub mod operators;
mod stmt;

pub use decl::{
    AccessSpecifier, ClassDecl, ClassMember, Decl, DeclKind, EnumDecl, EnumValueDecl,
    FunctionBody, FunctionDecl, FunctionKind, FunctionParam, Initializer, MemberInitializer,
    TemplateDecl, TemplateParam, TemplateParamKind, UsingDecl, VariableDecl,
};
pub use expr::{Expr, ExprKind, LambdaCapture, LambdaExpr};
pub use ident::{Ident, IdentKind, QualType, RefKind, Signature, TemplateArg};
pub use operators::{Associativity, OperatorContext, OperatorId};
pub use stmt::{Stmt, StmtKind};

use crate::{DeclId, StmtId};

/// A parsed translation unit: top-level statements plus the arena that
/// owns every node.
#[derive(Default)]
pub struct Module {
    /// Top-level statements, in source order.
    pub statements: Vec<StmtId>,
    /// Top-level declarations, in source order (subset of `statements`).
    pub declarations: Vec<DeclId>,
    /// Set when parsing reported at least one syntax error. The tree may
    /// then be incomplete; statements after the error point are missing.
    pub has_errors: bool,
}

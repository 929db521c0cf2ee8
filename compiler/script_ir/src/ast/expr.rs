//! Expression nodes.

use crate::{ExprId, IdentId, Name, Span, StmtId};

use super::decl::FunctionParam;
use super::operators::OperatorId;

/// An expression node.
#[derive(Clone, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    // Literals. Values are carried over from the token payloads.
    Bool(bool),
    Int(i64),
    Float { bits: u64, single: bool },
    Str(Name),
    /// User-defined literal, full text including the suffix.
    UserDefined(Name),

    /// Identifier in expression position.
    Ident(IdentId),

    /// Prefix or postfix unary operation; `op` is already position-specific
    /// (`PreIncrement` vs `PostIncrement`).
    Unary { op: OperatorId, arg: ExprId },

    /// Infix binary operation. Member access `a.b` is *not* represented
    /// here; see [`ExprKind::MemberAccess`].
    Binary {
        op: OperatorId,
        lhs: ExprId,
        rhs: ExprId,
    },

    /// `object.member`.
    MemberAccess { object: ExprId, member: IdentId },

    /// `cond ? on_true : on_false`.
    Conditional {
        cond: ExprId,
        on_true: ExprId,
        on_false: ExprId,
    },

    /// `callee(args...)`.
    Call { callee: ExprId, args: Vec<ExprId> },

    /// `array[index]`.
    Subscript { array: ExprId, index: ExprId },

    /// `T{args...}` — brace construction of a named type.
    BraceConstruction { ty: IdentId, args: Vec<ExprId> },

    /// `[e1, e2, ...]` — array literal.
    Array { elements: Vec<ExprId> },

    /// `{e1, e2, ...}` in expression position — an initializer list.
    List { elements: Vec<ExprId> },

    /// Lambda expression.
    Lambda(Box<LambdaExpr>),
}

/// A lambda: captures, parameters, body.
#[derive(Clone, Debug)]
pub struct LambdaExpr {
    pub captures: Vec<LambdaCapture>,
    pub params: Vec<FunctionParam>,
    /// Always a compound statement.
    pub body: StmtId,
}

/// One capture in a lambda's capture list.
#[derive(Clone, Debug)]
pub enum LambdaCapture {
    /// `[=]` — capture everything by value.
    AllByValue,
    /// `[&]` — capture everything by reference.
    AllByRef,
    /// `[x]` or `[&x]`, optionally with an initializer `[x = e]`.
    Named {
        by_ref: bool,
        name: Name,
        value: Option<ExprId>,
    },
}

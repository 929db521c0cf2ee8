//! Statement nodes.

use crate::{DeclId, ExprId, Span, StmtId};

#[derive(Clone, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum StmtKind {
    /// Lone `;`.
    Null,
    Expression(ExprId),
    Compound(Vec<StmtId>),
    If {
        cond: ExprId,
        body: StmtId,
        else_clause: Option<StmtId>,
    },
    While {
        cond: ExprId,
        body: StmtId,
    },
    For {
        /// Declaration or expression statement.
        init: StmtId,
        cond: ExprId,
        step: ExprId,
        body: StmtId,
    },
    Return {
        value: Option<ExprId>,
    },
    Break,
    Continue,
    Declaration(DeclId),
}

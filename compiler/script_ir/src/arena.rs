//! Arena storage for AST nodes.
//!
//! One arena per translation unit. Nodes are appended during parsing and
//! never mutated afterwards; ids are indices into the category vectors.

use crate::ast::{Decl, Expr, Ident, Stmt};
use crate::{DeclId, ExprId, IdentId, StmtId};

fn to_u32(len: usize, what: &str) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("arena capacity exceeded for {what}"))
}

/// Contiguous storage for every AST node of a translation unit.
#[derive(Default)]
pub struct AstArena {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    decls: Vec<Decl>,
    idents: Vec<Ident>,
}

impl AstArena {
    pub fn new() -> Self {
        AstArena::default()
    }

    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::from_raw(to_u32(self.exprs.len(), "expressions"));
        self.exprs.push(expr);
        id
    }

    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::from_raw(to_u32(self.stmts.len(), "statements"));
        self.stmts.push(stmt);
        id
    }

    pub fn alloc_decl(&mut self, decl: Decl) -> DeclId {
        let id = DeclId::from_raw(to_u32(self.decls.len(), "declarations"));
        self.decls.push(decl);
        id
    }

    pub fn alloc_ident(&mut self, ident: Ident) -> IdentId {
        let id = IdentId::from_raw(to_u32(self.idents.len(), "identifiers"));
        self.idents.push(ident);
        id
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    #[inline]
    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id.index()]
    }

    #[inline]
    pub fn ident(&self, id: IdentId) -> &Ident {
        &self.idents[id.index()]
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }
}

#[cfg(test)]
mod tests;

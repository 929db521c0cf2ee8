use crate::ast::{Expr, ExprKind, Stmt, StmtKind};
use crate::{AstArena, Span};

#[test]
fn ids_are_stable_and_sequential() {
    let mut arena = AstArena::new();
    let a = arena.alloc_expr(Expr {
        kind: ExprKind::Int(1),
        span: Span::new(0, 1),
    });
    let b = arena.alloc_expr(Expr {
        kind: ExprKind::Int(2),
        span: Span::new(2, 3),
    });
    assert_eq!(a.raw(), 0);
    assert_eq!(b.raw(), 1);
    assert!(matches!(arena.expr(a).kind, ExprKind::Int(1)));
    assert!(matches!(arena.expr(b).kind, ExprKind::Int(2)));
}

#[test]
fn categories_are_independent() {
    let mut arena = AstArena::new();
    let e = arena.alloc_expr(Expr {
        kind: ExprKind::Bool(true),
        span: Span::DUMMY,
    });
    let s = arena.alloc_stmt(Stmt {
        kind: StmtKind::Expression(e),
        span: Span::DUMMY,
    });
    assert_eq!(e.raw(), 0);
    assert_eq!(s.raw(), 0);
    assert!(matches!(arena.stmt(s).kind, StmtKind::Expression(id) if id == e));
}

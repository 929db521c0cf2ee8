use script_ir::SourcePos;

use crate::{Diagnostic, DiagnosticQueue, ErrorCode};

fn diag(code: ErrorCode, offset: u32) -> Diagnostic {
    Diagnostic::error(code, "test", SourcePos::new(offset, 1, offset + 1))
}

#[test]
fn take_sorted_orders_by_offset() {
    let mut queue = DiagnosticQueue::new();
    queue.push(diag(ErrorCode::CouldNotConvert, 30));
    queue.push(diag(ErrorCode::NoSuchMember, 10));
    queue.push(diag(ErrorCode::TypeNameInExpression, 20));

    let sorted = queue.take_sorted();
    let offsets: Vec<u32> = sorted.iter().map(|d| d.pos.offset).collect();
    assert_eq!(offsets, vec![10, 20, 30]);
}

#[test]
fn error_limit_drops_excess() {
    let mut queue = DiagnosticQueue::new();
    for i in 0..100 {
        queue.push(diag(ErrorCode::CouldNotConvert, i));
    }
    assert_eq!(queue.error_count(), 20);
    assert_eq!(queue.diagnostics().len(), 20);
}

#[test]
fn has_errors_ignores_warnings() {
    let mut queue = DiagnosticQueue::new();
    queue.push(Diagnostic::warning(
        ErrorCode::UnexpectedToken,
        "w",
        SourcePos::default(),
    ));
    assert!(!queue.has_errors());
    queue.push(diag(ErrorCode::UnexpectedToken, 0));
    assert!(queue.has_errors());
}

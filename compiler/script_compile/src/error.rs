//! Semantic errors.
//!
//! A `CompileError` aborts the function body being compiled; the module
//! compiler records it and moves on to the next declaration.

use script_diagnostic::{Diagnostic, ErrorCode, LineMap};
use script_ir::Span;

/// A semantic error: code, rendered message, offending span.
#[derive(Clone, Debug)]
pub struct CompileError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
}

impl CompileError {
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        CompileError {
            code,
            message: message.into(),
            span,
        }
    }

    pub fn to_diagnostic(&self, lines: &LineMap) -> Diagnostic {
        Diagnostic::error(self.code, self.message.clone(), lines.pos(self.span.start))
    }
}

pub type CompileRes<T> = Result<T, CompileError>;

//! The diagnostic record.

use script_ir::SourcePos;

use crate::ErrorCode;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Severity {
    Error,
    Warning,
}

/// One reported problem: code, rendered message, source position.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub pos: SourcePos,
}

impl Diagnostic {
    pub fn error(code: ErrorCode, message: impl Into<String>, pos: SourcePos) -> Self {
        Diagnostic {
            code,
            severity: Severity::Error,
            message: message.into(),
            pos,
        }
    }

    pub fn warning(code: ErrorCode, message: impl Into<String>, pos: SourcePos) -> Self {
        Diagnostic {
            code,
            severity: Severity::Warning,
            message: message.into(),
            pos,
        }
    }
}

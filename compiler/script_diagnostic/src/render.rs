//! Plain-text rendering of diagnostics.

use std::fmt::Write;

use crate::{Diagnostic, Severity};

/// Render a batch of diagnostics the way `scriptc` prints them:
///
/// ```text
/// error[E2032]: could not convert 'double' to 'int' --> 3:12
/// ```
pub fn render(file: &str, diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for d in diagnostics {
        let kind = match d.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        let _ = writeln!(
            out,
            "{kind}[{code}]: {msg}\n  --> {file}:{line}:{col}",
            code = d.code,
            msg = d.message,
            line = d.pos.line,
            col = d.pos.column,
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use script_ir::SourcePos;

    use super::*;
    use crate::ErrorCode;

    #[test]
    fn renders_code_message_and_position() {
        let d = Diagnostic::error(
            ErrorCode::CouldNotConvert,
            "could not convert 'double' to 'int'",
            SourcePos::new(42, 3, 12),
        );
        let text = render("test.lsc", &[d]);
        assert!(text.contains("error[E2032]"));
        assert!(text.contains("could not convert 'double' to 'int'"));
        assert!(text.contains("test.lsc:3:12"));
    }
}

//! The CLI commands. Exit code 0 on success, 1 on any compile error.

use script_diagnostic::{render, Diagnostic};
use script_ir::{StringInterner, TokenKind};

pub fn lex_file(path: &str) -> i32 {
    let Some(source) = read_source(path) else {
        return 1;
    };
    let interner = StringInterner::new();

    match script_lexer::lex(&source, &interner) {
        Ok(tokens) => {
            for token in tokens.iter() {
                if token.kind == TokenKind::Eof {
                    break;
                }
                println!(
                    "{:>4}:{:<3} {:?}",
                    token.line,
                    token.column,
                    token.kind
                );
            }
            0
        }
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

pub fn parse_file(path: &str) -> i32 {
    let Some(source) = read_source(path) else {
        return 1;
    };
    let interner = StringInterner::new();

    let tokens = match script_lexer::lex(&source, &interner) {
        Ok(tokens) => tokens,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };

    let result = script_parse::parse(&tokens, &interner);
    if result.has_errors() {
        let diagnostics: Vec<Diagnostic> = result
            .errors
            .iter()
            .map(script_parse::SyntaxError::to_diagnostic)
            .collect();
        eprint!("{}", render(path, &diagnostics));
        return 1;
    }

    println!(
        "{}: {} top-level statement(s), {} declaration(s)",
        path,
        result.module.statements.len(),
        result.module.declarations.len()
    );
    0
}

pub fn check_file(path: &str) -> i32 {
    let Some(source) = read_source(path) else {
        return 1;
    };
    let interner = StringInterner::new();

    let (_ts, output) = script_compile::compile_source(&source, &interner);
    if !output.diagnostics.is_empty() {
        eprint!("{}", render(path, &output.diagnostics));
    }
    if output.success {
        println!("{path}: ok");
        0
    } else {
        1
    }
}

/// `scriptc explain E2032` — a minimal catalogue lookup.
pub fn explain_code(code: &str) -> i32 {
    use script_diagnostic::ErrorCode::*;

    let all = [
        UnexpectedToken,
        UnexpectedEndOfInput,
        UnterminatedStringLiteral,
        UnterminatedBlockComment,
        InvalidNumericLiteral,
        ReturnStatementWithoutValue,
        ReturnStatementWithValue,
        CouldNotConvert,
        NarrowingConversionInBraceInitialization,
        CouldNotFindValidConstructor,
        CouldNotFindValidOperator,
        AmbiguousFunctionName,
        InaccessibleMember,
        CallToDeletedFunction,
        NoSuchMember,
        TypeNameInExpression,
        NamespaceNameInExpression,
        TemplateNamesAreNotExpressions,
    ];

    for c in all {
        if c.to_string() == code {
            println!("{c}: {c:?} ({:?} phase)", c.phase());
            return 0;
        }
    }
    eprintln!("unknown or undocumented error code '{code}'");
    1
}

fn read_source(path: &str) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(source) => Some(source),
        Err(err) => {
            eprintln!("cannot read '{path}': {err}");
            None
        }
    }
}

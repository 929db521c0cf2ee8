use proptest::prelude::*;

use script_ir::{StringInterner, TokenKind, TokenList};

use crate::{lex, LexErrorKind};

fn kinds(tokens: &TokenList) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind).collect()
}

#[test]
fn keywords_and_identifiers() {
    let interner = StringInterner::new();
    let tokens = lex("int n = size;", &interner).unwrap();
    let n = interner.intern("n");
    let size = interner.intern("size");
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Int_,
            TokenKind::Ident(n),
            TokenKind::Eq,
            TokenKind::Ident(size),
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn underscore_leading_identifier_is_not_a_keyword() {
    let interner = StringInterner::new();
    let tokens = lex("_int", &interner).unwrap();
    assert!(matches!(tokens[0].kind, TokenKind::Ident(_)));
}

#[test]
fn integer_bases() {
    let interner = StringInterner::new();
    let tokens = lex("10 010 0x1F 0b101", &interner).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Int(10));
    assert_eq!(tokens[1].kind, TokenKind::Int(8));
    assert_eq!(tokens[2].kind, TokenKind::Int(0x1F));
    assert_eq!(tokens[3].kind, TokenKind::Int(5));
}

#[test]
fn invalid_octal_digit_is_an_error() {
    let interner = StringInterner::new();
    let err = lex("09", &interner).unwrap_err();
    assert!(matches!(err.kind, LexErrorKind::InvalidDigit { digit: '9' }));
}

#[test]
fn float_forms() {
    let interner = StringInterner::new();
    let tokens = lex("3.14 1e10 2.5e-3 1f 3.14f", &interner).unwrap();
    assert!(matches!(tokens[0].kind, TokenKind::Float { single: false, .. }));
    assert!(matches!(tokens[1].kind, TokenKind::Float { single: false, .. }));
    assert!(matches!(tokens[2].kind, TokenKind::Float { single: false, .. }));
    assert!(matches!(tokens[3].kind, TokenKind::Float { single: true, .. }));
    assert!(matches!(tokens[4].kind, TokenKind::Float { single: true, .. }));
}

#[test]
fn user_defined_literal_spans_number_and_suffix() {
    let interner = StringInterner::new();
    let tokens = lex("90_deg", &interner).unwrap();
    let full = interner.intern("90_deg");
    assert_eq!(tokens[0].kind, TokenKind::UserDefined(full));
    assert_eq!(tokens[0].span.len(), 6);
}

#[test]
fn float_user_defined_literal() {
    let interner = StringInterner::new();
    let tokens = lex("2.5km", &interner).unwrap();
    let full = interner.intern("2.5km");
    assert_eq!(tokens[0].kind, TokenKind::UserDefined(full));
}

#[test]
fn string_escapes() {
    let interner = StringInterner::new();
    let tokens = lex(r#""a\tb\n\"q\"""#, &interner).unwrap();
    let content = interner.intern("a\tb\n\"q\"");
    assert_eq!(tokens[0].kind, TokenKind::Str(content));
}

#[test]
fn unterminated_string_reports_offset() {
    let interner = StringInterner::new();
    let err = lex("int a; \"oops", &interner).unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    assert_eq!(err.pos.offset, 7);
}

#[test]
fn unterminated_block_comment() {
    let interner = StringInterner::new();
    let err = lex("/* no end", &interner).unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnterminatedBlockComment);
}

#[test]
fn comments_are_skipped() {
    let interner = StringInterner::new();
    let tokens = lex("a // line\n /* block */ b", &interner).unwrap();
    assert_eq!(tokens.len(), 3); // a, b, eof
}

#[test]
fn maximal_munch_operators() {
    let interner = StringInterner::new();
    let tokens = lex("<<= >>= << >> <= >= == != && || :: ++ --", &interner).unwrap();
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::LeftShiftEq,
            TokenKind::RightShiftEq,
            TokenKind::LeftShift,
            TokenKind::RightShift,
            TokenKind::LessEq,
            TokenKind::GreaterEq,
            TokenKind::EqEq,
            TokenKind::Neq,
            TokenKind::AmpAmp,
            TokenKind::PipePipe,
            TokenKind::ColonColon,
            TokenKind::PlusPlus,
            TokenKind::MinusMinus,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn nested_template_close_lexes_as_right_shift() {
    let interner = StringInterner::new();
    let tokens = lex("Array<Array<int>>", &interner).unwrap();
    let last_op = &tokens[tokens.len() - 2];
    assert_eq!(last_op.kind, TokenKind::RightShift);
}

#[test]
fn line_and_column_tracking() {
    let interner = StringInterner::new();
    let tokens = lex("a\n  b", &interner).unwrap();
    assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
    assert_eq!((tokens[1].line, tokens[1].column), (2, 3));
}

#[test]
fn offsets_monotonically_increase() {
    let interner = StringInterner::new();
    let tokens = lex("int foo(double x) { return x + 1; }", &interner).unwrap();
    let mut prev = 0;
    for t in tokens.iter() {
        assert!(t.span.start >= prev);
        prev = t.span.end;
    }
}

/// Strategy producing small token-friendly source snippets.
fn source_strategy() -> impl Strategy<Value = String> {
    let word = prop::sample::select(vec![
        "int", "double", "foo", "_bar", "x1", "return", "class", "42", "010", "0x1F", "3.5",
        "\"txt\"", "+", "-", "<<", ">>", "::", "(", ")", "{", "}", ";", ",", "<", ">", "==",
    ]);
    prop::collection::vec(word, 0..40).prop_map(|words| {
        let mut s = String::new();
        for w in words {
            s.push_str(w);
            s.push(' ');
        }
        s
    })
}

proptest! {
    /// Concatenating every token's source text with single spaces between
    /// them re-lexes to the same token kinds: lexing is stable under its
    /// own round trip.
    #[test]
    fn round_trip_is_stable(src in source_strategy()) {
        let interner = StringInterner::new();
        let tokens = lex(&src, &interner).unwrap();

        let mut rebuilt = String::new();
        for t in tokens.iter() {
            if t.kind == TokenKind::Eof {
                break;
            }
            rebuilt.push_str(&src[t.span.start as usize..t.span.end as usize]);
            rebuilt.push(' ');
        }

        let again = lex(&rebuilt, &interner).unwrap();
        prop_assert_eq!(kinds(&tokens), kinds(&again));
    }

    /// Token spans never overlap and always move forward.
    #[test]
    fn spans_are_monotonic(src in source_strategy()) {
        let interner = StringInterner::new();
        let tokens = lex(&src, &interner).unwrap();
        let mut prev_end = 0u32;
        for t in tokens.iter() {
            prop_assert!(t.span.start >= prev_end);
            prev_end = t.span.end;
        }
    }
}

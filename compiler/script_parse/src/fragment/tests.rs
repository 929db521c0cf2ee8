use script_ir::{StringInterner, TokenKind};

use super::*;
use crate::cursor::ParserCursor;

fn tokens_of(src: &str) -> (StringInterner, script_ir::TokenList) {
    let interner = StringInterner::new();
    let tokens = script_lexer::lex(src, &interner).unwrap();
    (interner, tokens)
}

#[test]
fn sentinel_stops_before_its_token() {
    let (_i, tokens) = tokens_of("a b ; c");
    let mut cursor = ParserCursor::new(&tokens);
    let frag = Frag::stmt();

    assert!(!frag.at_end(&cursor));
    frag.read(&mut cursor).unwrap();
    frag.read(&mut cursor).unwrap();
    assert!(frag.at_end(&cursor));

    let semi = frag.consume_sentinel(&mut cursor).unwrap();
    assert_eq!(semi.kind, TokenKind::Semicolon);
    assert_eq!(cursor.current_kind(), TokenKind::Ident(_i.intern("c")));
}

#[test]
fn list_item_stops_at_comma_and_end() {
    let (_i, tokens) = tokens_of("a , b )");
    let mut cursor = ParserCursor::new(&tokens);
    let sentinel = Frag::Sentinel {
        end: TokenKind::RightPar,
    };

    let item = sentinel.list_item();
    item.read(&mut cursor).unwrap();
    assert!(item.at_end(&cursor));
    item.consume_comma(&mut cursor);

    let item2 = sentinel.list_item();
    item2.read(&mut cursor).unwrap();
    assert!(item2.at_end(&cursor));
    item2.consume_comma(&mut cursor); // no comma: no-op
    assert!(sentinel.at_end(&cursor));
}

#[test]
fn right_shift_terminates_two_nested_lists() {
    // Token stream of `A<B<int>>` after consuming `A <` and `B <`.
    let (_i, tokens) = tokens_of("int >>");
    let mut cursor = ParserCursor::new(&tokens);

    let inner = Frag::TemplateList { depth: 2 };
    let outer = Frag::TemplateList { depth: 1 };

    cursor.bump(); // `int`

    // Inner list ends at the `>>` and takes its first half.
    assert!(inner.at_end(&cursor));
    let first = inner.consume_template_end(&mut cursor).unwrap();
    assert_eq!(first.kind, TokenKind::Greater);
    assert_eq!(first.span.len(), 1);
    assert!(cursor.half_shift());

    // The `>>` token is still in the stream; the outer list consumes it
    // as its own `>`.
    assert_eq!(cursor.current_kind(), TokenKind::RightShift);
    assert!(outer.at_end(&cursor));
    let second = outer.consume_template_end(&mut cursor).unwrap();
    assert_eq!(second.kind, TokenKind::Greater);
    assert!(!cursor.half_shift());

    // Offsets are consistent with the original source: the two halves
    // are adjacent single bytes.
    assert_eq!(second.span.start, first.span.start + 1);
    assert_eq!(cursor.current_kind(), TokenKind::Eof);
}

#[test]
fn unnested_right_shift_is_an_error() {
    let (_i, tokens) = tokens_of(">>");
    let mut cursor = ParserCursor::new(&tokens);

    let list = Frag::TemplateList { depth: 1 };
    assert!(list.at_end(&cursor));
    assert!(list.consume_template_end(&mut cursor).is_err());
}

#[test]
fn snapshot_restores_half_shift() {
    let (_i, tokens) = tokens_of("int >>");
    let mut cursor = ParserCursor::new(&tokens);
    cursor.bump();

    let snap = cursor.snapshot();
    let inner = Frag::TemplateList { depth: 2 };
    inner.consume_template_end(&mut cursor).unwrap();
    assert!(cursor.half_shift());

    cursor.restore(snap);
    assert!(!cursor.half_shift());
    assert_eq!(cursor.current_kind(), TokenKind::RightShift);
}

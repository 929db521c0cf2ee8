use super::*;

#[test]
fn same_text_same_name() {
    let interner = StringInterner::new();
    let a = interner.intern("size");
    let b = interner.intern("size");
    assert_eq!(a, b);
    assert_eq!(interner.resolve(a), "size");
}

#[test]
fn distinct_texts_distinct_names() {
    let interner = StringInterner::new();
    let a = interner.intern("foo");
    let b = interner.intern("bar");
    assert_ne!(a, b);
    assert_eq!(interner.resolve(a), "foo");
    assert_eq!(interner.resolve(b), "bar");
}

#[test]
fn empty_string_is_pre_interned() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert_eq!(interner.resolve(Name::EMPTY), "");
}

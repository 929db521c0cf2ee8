use super::*;

#[test]
fn merge_covers_both() {
    let a = Span::new(4, 10);
    let b = Span::new(8, 20);
    assert_eq!(a.merge(b), Span::new(4, 20));
    assert_eq!(b.merge(a), Span::new(4, 20));
}

#[test]
fn len_and_empty() {
    assert_eq!(Span::new(3, 7).len(), 4);
    assert!(Span::new(5, 5).is_empty());
    assert!(!Span::new(5, 6).is_empty());
}

#[test]
fn display_is_line_colon_column() {
    let pos = SourcePos::new(42, 3, 7);
    assert_eq!(pos.to_string(), "3:7");
}

use super::*;

#[test]
fn base_type_strips_qualifiers() {
    let t = Type::cref(Type::INT);
    assert!(t.is_const());
    assert!(t.is_reference());
    assert_eq!(t.base_type(), Type::INT);
}

#[test]
fn base_type_keeps_category() {
    let cla = Type::new(42, TypeFlags::OBJECT);
    let r = Type::make_ref(cla).with_const();
    assert_eq!(r.base_type(), cla);
    assert!(r.base_type().is_object());
}

#[test]
fn const_ref_ordering_is_canonical() {
    // const T& built either way compares equal.
    let a = Type::make_ref(Type::DOUBLE).with_const();
    let b = Type::cref(Type::DOUBLE);
    assert_eq!(a, b);
}

#[test]
fn fundamental_classification() {
    assert!(Type::BOOLEAN.is_fundamental());
    assert!(Type::DOUBLE.is_fundamental());
    assert!(!Type::STRING.is_fundamental());
    assert!(!Type::new(20, TypeFlags::ENUM).is_fundamental());
    // Qualifiers do not change the classification.
    assert!(Type::cref(Type::INT).is_fundamental());
}

#[test]
fn rref_replaces_lvalue_ref() {
    let r = Type::make_ref(Type::INT);
    let rr = Type::rref(r);
    assert!(rr.is_rvalue_reference());
    assert!(!rr.is_reference());
}

#[test]
fn string_is_object() {
    assert!(Type::STRING.is_object());
    assert_eq!(Type::STRING.index(), BuiltIn::String as u32);
}

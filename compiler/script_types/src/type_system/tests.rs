use script_ir::{StringInterner, Type};

use crate::{register_builtins, Prototype, TypeSystem};

fn fresh() -> (StringInterner, TypeSystem) {
    let interner = StringInterner::new();
    let mut ts = TypeSystem::new(&interner);
    register_builtins(&mut ts, &interner);
    (interner, ts)
}

#[test]
fn inheritance_level_counts_parent_edges() {
    let (interner, mut ts) = fresh();
    let a = ts.register_class(interner.intern("A"), script_ir::NamespaceId::ROOT);
    let b = ts.register_class(interner.intern("B"), script_ir::NamespaceId::ROOT);
    let c = ts.register_class(interner.intern("C"), script_ir::NamespaceId::ROOT);
    ts.class_mut(b).parent = Some(a);
    ts.class_mut(c).parent = Some(b);

    assert_eq!(ts.inheritance_level(c, c), 0);
    assert_eq!(ts.inheritance_level(c, b), 1);
    assert_eq!(ts.inheritance_level(c, a), 2);
    assert_eq!(ts.inheritance_level(a, c), -1);

    let unrelated = ts.register_class(interner.intern("X"), script_ir::NamespaceId::ROOT);
    assert_eq!(ts.inheritance_level(c, unrelated), -1);
}

#[test]
fn function_types_are_interned() {
    let (_interner, mut ts) = fresh();
    let proto = Prototype::new(Type::INT, vec![Type::INT, Type::DOUBLE]);
    let a = ts.function_type(proto.clone());
    let b = ts.function_type(proto);
    assert_eq!(a, b);
    assert!(a.is_function());

    let other = ts.function_type(Prototype::new(Type::INT, vec![Type::INT]));
    assert_ne!(a, other);
}

#[test]
fn string_class_sits_on_its_reserved_row() {
    let (_interner, ts) = fresh();
    let class = ts.class_of(Type::STRING).expect("String is a class");
    assert_eq!(ts.class(class).ty, Type::STRING);
    assert!(!ts.class(class).constructors.is_empty());
}

#[test]
fn class_types_report_their_class() {
    let (interner, mut ts) = fresh();
    let a = ts.register_class(interner.intern("A"), script_ir::NamespaceId::ROOT);
    let ty = ts.class(a).ty;
    assert_eq!(ts.class_of(ty), Some(a));
    assert_eq!(ts.class_of(Type::cref(ty)), Some(a));
    assert_eq!(ts.class_of(Type::INT), None);
}

#[test]
fn type_name_rendering() {
    let (interner, mut ts) = fresh();
    assert_eq!(ts.type_name(Type::INT, &interner), "int");
    assert_eq!(ts.type_name(Type::cref(Type::DOUBLE), &interner), "const double&");

    let a = ts.register_class(interner.intern("Vec"), script_ir::NamespaceId::ROOT);
    let ty = ts.class(a).ty;
    assert_eq!(ts.type_name(ty, &interner), "Vec");

    let sig = ts.function_type(Prototype::new(Type::INT, vec![Type::BOOLEAN]));
    assert_eq!(ts.type_name(sig, &interner), "int(bool)");
}

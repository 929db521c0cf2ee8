use script_ir::{StringInterner, Type};

use crate::{instantiate_array, FunctionVariant, TypeSystem};

#[test]
fn array_members_are_installed() {
    let interner = StringInterner::new();
    let mut ts = TypeSystem::new(&interner);

    let class = instantiate_array(&mut ts, Type::INT, &interner);
    let def = ts.class(class);

    assert_eq!(def.constructors.len(), 3);
    assert!(def.destructor.is_some());
    assert_eq!(def.methods.len(), 2);
    assert_eq!(def.operators.len(), 3);

    // size() returns int and takes only `this`.
    let size = def
        .methods
        .iter()
        .copied()
        .find(|&f| ts.function(f).name() == Some(interner.intern("size")))
        .expect("size method");
    let proto = &ts.function(size).prototype;
    assert_eq!(proto.return_type, Type::INT);
    assert_eq!(proto.param_count(), 1);
    assert!(proto.has_implicit_object());
}

#[test]
fn subscript_overloads_differ_in_constness() {
    let interner = StringInterner::new();
    let mut ts = TypeSystem::new(&interner);

    let class = instantiate_array(&mut ts, Type::DOUBLE, &interner);
    let def = ts.class(class);

    let subscripts: Vec<_> = def
        .operators
        .iter()
        .copied()
        .filter(|&f| {
            matches!(
                ts.function(f).variant,
                FunctionVariant::Operator {
                    op: script_ir::ast::OperatorId::Subscript
                }
            )
        })
        .collect();
    assert_eq!(subscripts.len(), 2);

    let returns: Vec<Type> = subscripts
        .iter()
        .map(|&f| ts.function(f).prototype.return_type)
        .collect();
    assert!(returns.contains(&Type::make_ref(Type::DOUBLE)));
    assert!(returns.contains(&Type::cref(Type::DOUBLE)));
}

#[test]
fn size_constructor_is_explicit() {
    let interner = StringInterner::new();
    let mut ts = TypeSystem::new(&interner);

    let class = instantiate_array(&mut ts, Type::INT, &interner);
    let explicit_count = ts
        .class(class)
        .constructors
        .iter()
        .filter(|&&c| ts.function(c).is_explicit())
        .count();
    assert_eq!(explicit_count, 1);
}

use script_ir::{FunctionId, Name, NamespaceId, StringInterner, Type};
use script_types::{
    register_builtins, FunctionDef, FunctionFlags, FunctionVariant, Prototype, SymbolRef,
    TypeSystem,
};

use super::*;

fn fresh() -> (StringInterner, TypeSystem) {
    let interner = StringInterner::new();
    let mut ts = TypeSystem::new(&interner);
    register_builtins(&mut ts, &interner);
    (interner, ts)
}

fn free_fn(ts: &mut TypeSystem, name: Name, ret: Type, params: Vec<Type>) -> FunctionId {
    ts.add_function(FunctionDef {
        variant: FunctionVariant::Regular { name },
        flags: FunctionFlags::default(),
        prototype: Prototype::new(ret, params),
        enclosing: SymbolRef::Namespace(NamespaceId::ROOT),
        default_args: Vec::new(),
        body: None,
        native: None,
        source: None,
    })
}

#[test]
fn exact_match_beats_promotion() {
    let (interner, mut ts) = fresh();
    let name = interner.intern("f");
    let f_int = free_fn(&mut ts, name, Type::VOID, vec![Type::INT]);
    let f_double = free_fn(&mut ts, name, Type::VOID, vec![Type::DOUBLE]);

    let result = resolve_overloads(&ts, &[f_int, f_double], None, &[Type::INT]).unwrap();
    assert_eq!(result.function, f_int);

    let result = resolve_overloads(&ts, &[f_int, f_double], None, &[Type::DOUBLE]).unwrap();
    assert_eq!(result.function, f_double);
}

#[test]
fn wrong_arity_is_rejected() {
    let (interner, mut ts) = fresh();
    let name = interner.intern("f");
    let f = free_fn(&mut ts, name, Type::VOID, vec![Type::INT, Type::INT]);

    assert!(resolve_overloads(&ts, &[f], None, &[Type::INT]).is_none());
    assert_eq!(
        viability_status(&ts, f, None, &[Type::INT]),
        ViabilityStatus::IncorrectParameterCount
    );
}

#[test]
fn inconvertible_argument_is_rejected() {
    let (interner, mut ts) = fresh();
    let name = interner.intern("f");
    let cls = ts.register_class(interner.intern("C"), NamespaceId::ROOT);
    let c_ty = ts.class(cls).ty;
    let f = free_fn(&mut ts, name, Type::VOID, vec![c_ty]);

    assert!(resolve_overloads(&ts, &[f], None, &[Type::INT]).is_none());
    assert_eq!(
        viability_status(&ts, f, None, &[Type::INT]),
        ViabilityStatus::CouldNotConvertArgument
    );
}

#[test]
fn equal_candidates_are_ambiguous() {
    let (interner, mut ts) = fresh();
    let name = interner.intern("f");
    // Both require a promotion from int.
    let f_float = free_fn(&mut ts, name, Type::VOID, vec![Type::FLOAT]);
    let f_double = free_fn(&mut ts, name, Type::VOID, vec![Type::DOUBLE]);

    assert!(resolve_overloads(&ts, &[f_float, f_double], None, &[Type::INT]).is_none());
}

#[test]
fn later_dominating_candidate_clears_ambiguity() {
    let (interner, mut ts) = fresh();
    let name = interner.intern("f");
    let f_float = free_fn(&mut ts, name, Type::VOID, vec![Type::FLOAT]);
    let f_double = free_fn(&mut ts, name, Type::VOID, vec![Type::DOUBLE]);
    let f_int = free_fn(&mut ts, name, Type::VOID, vec![Type::INT]);

    // The exact match arrives after the ambiguous pair and wins.
    let result = resolve_overloads(&ts, &[f_float, f_double, f_int], None, &[Type::INT]).unwrap();
    assert_eq!(result.function, f_int);
}

#[test]
fn resolution_is_idempotent() {
    let (interner, mut ts) = fresh();
    let name = interner.intern("f");
    let f_int = free_fn(&mut ts, name, Type::VOID, vec![Type::INT]);
    let f_double = free_fn(&mut ts, name, Type::VOID, vec![Type::DOUBLE]);
    let candidates = [f_double, f_int];

    let first = resolve_overloads(&ts, &candidates, None, &[Type::INT]).map(|r| r.function);
    let second = resolve_overloads(&ts, &candidates, None, &[Type::INT]).map(|r| r.function);
    assert_eq!(first, second);
}

#[test]
fn default_arguments_extend_viability() {
    let (interner, mut ts) = fresh();
    let name = interner.intern("f");
    let f = ts.add_function(FunctionDef {
        variant: FunctionVariant::Regular { name },
        flags: FunctionFlags::default(),
        prototype: Prototype::new(Type::VOID, vec![Type::INT, Type::INT]),
        enclosing: SymbolRef::Namespace(NamespaceId::ROOT),
        // One trailing default argument (the expression id is irrelevant
        // to viability).
        default_args: vec![script_ir::ExprId::from_raw(0)],
        body: None,
        native: None,
        source: None,
    });

    assert!(resolve_overloads(&ts, &[f], None, &[Type::INT]).is_some());
    assert!(resolve_overloads(&ts, &[f], None, &[Type::INT, Type::INT]).is_some());
    assert!(resolve_overloads(&ts, &[f], None, &[]).is_none());
}

#[test]
fn implicit_object_must_bind_by_reference() {
    let (interner, mut ts) = fresh();
    let cls = ts.register_class(interner.intern("C"), NamespaceId::ROOT);
    let c_ty = ts.class(cls).ty;
    let name = interner.intern("m");
    let method = ts.add_function(FunctionDef {
        variant: FunctionVariant::Regular { name },
        flags: FunctionFlags::default(),
        prototype: Prototype::new(Type::VOID, vec![Prototype::this_param(c_ty, false)]),
        enclosing: SymbolRef::Class(cls),
        default_args: Vec::new(),
        body: None,
        native: None,
        source: None,
    });

    // A mutable object binds.
    assert!(resolve_overloads(&ts, &[method], Some(c_ty), &[]).is_some());
    // A const object cannot bind to a non-const `this`.
    assert!(resolve_overloads(&ts, &[method], Some(c_ty.with_const()), &[]).is_none());
}

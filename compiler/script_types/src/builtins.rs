//! Registration of the built-in operator set and the `String` class.
//!
//! Fundamental types get their operators as native functions in the root
//! namespace, so ordinary operator lookup and overload resolution handle
//! `1 + 2` the same way they handle user overloads.

use script_ir::ast::OperatorId;
use script_ir::{NamespaceId, StringInterner, Type};

use crate::function::{FunctionFlags, FunctionVariant, NativeTag};
use crate::prototype::Prototype;
use crate::scope::SymbolRef;
use crate::type_system::TypeSystem;

const NUMERIC: [Type; 5] = [
    Type::BOOLEAN,
    Type::CHAR,
    Type::INT,
    Type::FLOAT,
    Type::DOUBLE,
];

/// Install built-in operators and the `String` class. Called once per
/// engine, right after [`TypeSystem::new`].
pub fn register_builtins(ts: &mut TypeSystem, interner: &StringInterner) {
    register_numeric_operators(ts);
    register_string(ts, interner);
}

fn add_root_operator(ts: &mut TypeSystem, op: OperatorId, proto: Prototype) {
    let f = ts.make_native_fn(
        FunctionVariant::Operator { op },
        FunctionFlags::default(),
        proto,
        SymbolRef::Namespace(NamespaceId::ROOT),
        NativeTag::BuiltinOperator,
    );
    ts.namespace_mut(NamespaceId::ROOT).operators.push(f);
}

fn register_numeric_operators(ts: &mut TypeSystem) {
    use OperatorId::*;

    let arithmetic = [Addition, Subtraction, Multiplication, Division];
    let comparison = [Less, Greater, LessEqual, GreaterEqual, Equal, Inequal];
    let compound = [
        AdditionAssignment,
        SubtractionAssignment,
        MultiplicationAssignment,
        DivisionAssignment,
    ];

    for &t in &[Type::CHAR, Type::INT, Type::FLOAT, Type::DOUBLE] {
        for op in arithmetic {
            add_root_operator(ts, op, Prototype::new(t, vec![t, t]));
        }
        for op in compound {
            add_root_operator(
                ts,
                op,
                Prototype::new(Type::make_ref(t), vec![Type::make_ref(t), t]),
            );
        }
        // Unary sign operators.
        add_root_operator(ts, UnaryPlus, Prototype::new(t, vec![t]));
        add_root_operator(ts, UnaryMinus, Prototype::new(t, vec![t]));
        // Increment and decrement.
        add_root_operator(
            ts,
            PreIncrement,
            Prototype::new(Type::make_ref(t), vec![Type::make_ref(t)]),
        );
        add_root_operator(
            ts,
            PreDecrement,
            Prototype::new(Type::make_ref(t), vec![Type::make_ref(t)]),
        );
        add_root_operator(ts, PostIncrement, Prototype::new(t, vec![Type::make_ref(t)]));
        add_root_operator(ts, PostDecrement, Prototype::new(t, vec![Type::make_ref(t)]));
    }

    // Integer-only operators.
    for op in [Remainder, BitwiseAnd, BitwiseOr, BitwiseXor, LeftShift, RightShift] {
        add_root_operator(ts, op, Prototype::new(Type::INT, vec![Type::INT, Type::INT]));
    }
    for op in [
        RemainderAssignment,
        BitwiseAndAssignment,
        BitwiseOrAssignment,
        BitwiseXorAssignment,
        LeftShiftAssignment,
        RightShiftAssignment,
    ] {
        add_root_operator(
            ts,
            op,
            Prototype::new(
                Type::make_ref(Type::INT),
                vec![Type::make_ref(Type::INT), Type::INT],
            ),
        );
    }
    add_root_operator(
        ts,
        BitwiseNot,
        Prototype::new(Type::INT, vec![Type::INT]),
    );

    // Boolean logic.
    add_root_operator(
        ts,
        LogicalAnd,
        Prototype::new(Type::BOOLEAN, vec![Type::BOOLEAN, Type::BOOLEAN]),
    );
    add_root_operator(
        ts,
        LogicalOr,
        Prototype::new(Type::BOOLEAN, vec![Type::BOOLEAN, Type::BOOLEAN]),
    );
    add_root_operator(
        ts,
        LogicalNot,
        Prototype::new(Type::BOOLEAN, vec![Type::BOOLEAN]),
    );

    // Comparisons and assignment for every fundamental type.
    for &t in &NUMERIC {
        for op in comparison {
            add_root_operator(ts, op, Prototype::new(Type::BOOLEAN, vec![t, t]));
        }
        add_root_operator(
            ts,
            Assignment,
            Prototype::new(Type::make_ref(t), vec![Type::make_ref(t), t.with_const()]),
        );
    }
}

/// The built-in `String` class, pinned to its reserved type-table row.
fn register_string(ts: &mut TypeSystem, interner: &StringInterner) {
    let name = interner.intern("String");
    let class = ts.register_string_class(name);
    let string_ty = Type::STRING;

    let this = Prototype::this_param(string_ty, false);
    let const_this = Prototype::this_param(string_ty, true);
    let owner = SymbolRef::Class(class);

    let default_ctor = ts.make_native_fn(
        FunctionVariant::Constructor,
        FunctionFlags::default(),
        Prototype::new(Type::cref(string_ty), Vec::new()),
        owner,
        NativeTag::StringDefaultCtor,
    );
    let copy_ctor = ts.make_native_fn(
        FunctionVariant::Constructor,
        FunctionFlags::default(),
        Prototype::new(Type::cref(string_ty), vec![Type::cref(string_ty)]),
        owner,
        NativeTag::StringCopyCtor,
    );
    let dtor = ts.make_native_fn(
        FunctionVariant::Destructor,
        FunctionFlags::default(),
        Prototype::new(Type::VOID, vec![this]),
        owner,
        NativeTag::StringDtor,
    );
    let assign = ts.make_native_fn(
        FunctionVariant::Operator {
            op: OperatorId::Assignment,
        },
        FunctionFlags::default(),
        Prototype::new(
            Type::make_ref(string_ty),
            vec![this, Type::cref(string_ty)],
        ),
        owner,
        NativeTag::StringAssign,
    );

    {
        let def = ts.class_mut(class);
        def.constructors = vec![default_ctor, copy_ctor];
        def.destructor = Some(dtor);
        def.operators = vec![assign];
    }

    // Free operators in the root namespace.
    add_root_operator_tagged(
        ts,
        OperatorId::Addition,
        Prototype::new(string_ty, vec![Type::cref(string_ty), Type::cref(string_ty)]),
        NativeTag::StringConcat,
    );
    for op in [OperatorId::Equal, OperatorId::Inequal] {
        add_root_operator_tagged(
            ts,
            op,
            Prototype::new(
                Type::BOOLEAN,
                vec![Type::cref(string_ty), Type::cref(string_ty)],
            ),
            NativeTag::StringCompare,
        );
    }

    ts.namespace_mut(NamespaceId::ROOT).classes.insert(name, class);
}

fn add_root_operator_tagged(
    ts: &mut TypeSystem,
    op: OperatorId,
    proto: Prototype,
    tag: NativeTag,
) {
    let f = ts.make_native_fn(
        FunctionVariant::Operator { op },
        FunctionFlags::default(),
        proto,
        SymbolRef::Namespace(NamespaceId::ROOT),
        tag,
    );
    ts.namespace_mut(NamespaceId::ROOT).operators.push(f);
}

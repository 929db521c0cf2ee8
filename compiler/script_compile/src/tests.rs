//! End-to-end tests: source text through lexing, parsing and semantic
//! compilation.

use script_diagnostic::ErrorCode;
use script_ir::program::{CompiledBody, ProgExprKind};
use script_ir::{FunctionId, StringInterner};
use script_types::{FunctionVariant, TypeSystem};

use crate::{compile_source, CompileOutput};

fn compile_ok(src: &str) -> (StringInterner, TypeSystem, CompileOutput) {
    let interner = StringInterner::new();
    let (ts, output) = compile_source(src, &interner);
    assert!(
        output.success,
        "expected success for {src:?}, got {:#?}",
        output.diagnostics
    );
    (interner, ts, output)
}

fn compile_err(src: &str) -> (StringInterner, CompileOutput) {
    let interner = StringInterner::new();
    let (_ts, output) = compile_source(src, &interner);
    assert!(!output.success, "expected failure for {src:?}");
    (interner, output)
}

fn find_function(ts: &TypeSystem, interner: &StringInterner, name: &str) -> FunctionId {
    let name = interner.intern(name);
    for raw in 0.. {
        let id = FunctionId::from_raw(raw);
        let Some(def) = ts.try_function(id) else {
            panic!("no function named {:?}", interner.resolve(name))
        };
        if def.name() == Some(name) && def.source.is_some() {
            return id;
        }
    }
    unreachable!()
}

fn body_of(ts: &TypeSystem, f: FunctionId) -> &CompiledBody {
    ts.function(f).body.as_ref().expect("body compiled")
}

// === Scenario: integer arithmetic ===

#[test]
fn integer_arithmetic_builds_nested_operator_calls() {
    let (_i, ts, output) = compile_ok("int a = 1 + 2 * 3;");
    let script = output.script.expect("script body");

    // The initializer's root is a call to operator+ whose right operand
    // contains a call to operator*.
    let mut found = false;
    for (_, expr) in script.arena.exprs() {
        if let ProgExprKind::FunctionCall { function, args } = &expr.kind {
            if ts.function(*function).operator_id() == Some(script_ir::ast::OperatorId::Addition) {
                assert_eq!(args.len(), 2);
                let mut rhs = args[1];
                // Unwrap any conversion nodes.
                loop {
                    match &script.arena.expr(rhs).kind {
                        ProgExprKind::Copy { arg }
                        | ProgExprKind::FundamentalConversion { arg } => rhs = *arg,
                        _ => break,
                    }
                }
                let ProgExprKind::FunctionCall { function, .. } = &script.arena.expr(rhs).kind
                else {
                    panic!("rhs of + is not a call");
                };
                assert_eq!(
                    ts.function(*function).operator_id(),
                    Some(script_ir::ast::OperatorId::Multiplication)
                );
                found = true;
            }
        }
    }
    assert!(found, "no operator+ call in the script body");
}

// === Scenario: template >> terminator ===

#[test]
fn nested_array_template_compiles_and_size_resolves() {
    let (_i, _ts, output) = compile_ok("Array<Array<int>> aa;\nint n = aa.size();");
    assert_eq!(output.global_count, 2);
}

#[test]
fn array_subscript_and_resize() {
    compile_ok(
        "Array<int> a(4);\n\
         int f() { a.resize(8); return a[2]; }",
    );
}

// === Scenario: virtual dispatch ===

#[test]
fn virtual_call_goes_through_the_vtable() {
    let (interner, ts, _output) = compile_ok(
        "class A { virtual int f() { return 1; } };\n\
         class B : A { int f() { return 2; } };\n\
         int g(A & a) { return a.f(); }",
    );

    let g = find_function(&ts, &interner, "g");
    let body = body_of(&ts, g);
    let has_virtual_call = body
        .arena
        .exprs()
        .any(|(_, e)| matches!(e.kind, ProgExprKind::VirtualCall { .. }));
    assert!(has_virtual_call, "g must dispatch through the vtable");

    // B::f overrides A::f: same vtable slot, one slot total.
    let a_name = interner.intern("A");
    let b_name = interner.intern("B");
    let mut a_class = None;
    let mut b_class = None;
    for raw in 0.. {
        let id = script_ir::ClassId::from_raw(raw);
        let Some(def) = ts.try_class(id) else { break };
        if def.name == a_name {
            a_class = Some(id);
        }
        if def.name == b_name {
            b_class = Some(id);
        }
    }
    let (a_class, b_class) = (a_class.unwrap(), b_class.unwrap());
    assert_eq!(ts.class(a_class).vtable.len(), 1);
    assert_eq!(ts.class(b_class).vtable.len(), 1);
    assert_ne!(ts.class(a_class).vtable[0], ts.class(b_class).vtable[0]);
}

#[test]
fn non_virtual_method_call_is_direct() {
    let (interner, ts, _output) = compile_ok(
        "class A { int f() { return 1; } };\n\
         int g(A & a) { return a.f(); }",
    );
    let g = find_function(&ts, &interner, "g");
    let body = body_of(&ts, g);
    assert!(!body
        .arena
        .exprs()
        .any(|(_, e)| matches!(e.kind, ProgExprKind::VirtualCall { .. })));
}

// === Scenario: conversion-constructor selection ===

#[test]
fn converting_constructor_selection_prefers_exact_match() {
    let (_i, ts, output) = compile_ok(
        "class A { A(int x) { } A(bool x) { } };\n\
         A a = true;\n\
         A b = 1;",
    );
    let script = output.script.expect("script body");

    let mut ctor_params = Vec::new();
    for (_, expr) in script.arena.exprs() {
        if let ProgExprKind::ConstructorCall { constructor, .. } = &expr.kind {
            let def = ts.function(*constructor);
            if matches!(def.variant, FunctionVariant::Constructor)
                && def.prototype.param_count() == 2
            {
                ctor_params.push(def.prototype.param(1).base_type());
            }
        }
    }
    assert_eq!(ctor_params.len(), 2, "two converting constructions");
    assert_eq!(ctor_params[0], script_ir::Type::BOOLEAN, "A a = true picks A(bool)");
    assert_eq!(ctor_params[1], script_ir::Type::INT, "A b = 1 picks A(int)");
}

// === Scenario: narrowing rejection ===

#[test]
fn brace_initialization_rejects_narrowing() {
    let (_i, output) = compile_err("int a{3.14};");
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(
        output.diagnostics[0].code,
        ErrorCode::NarrowingConversionInBraceInitialization
    );
}

#[test]
fn paren_and_copy_initialization_allow_lossy_conversions() {
    compile_ok("int a(3.14);\nint b = 3.14;");
}

// === Scenario: return-type mismatch ===

#[test]
fn return_without_value_in_int_function() {
    let (_i, output) = compile_err("int foo() { return; }");
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].code, ErrorCode::ReturnStatementWithoutValue);
}

#[test]
fn return_with_value_in_void_function() {
    let (_i, output) = compile_err("void foo() { return 2; }");
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].code, ErrorCode::ReturnStatementWithValue);
}

// === Conversions in calls ===

#[test]
fn int_promotes_to_double_across_calls() {
    compile_ok("double half(double x) { return x / 2.0; }\ndouble r = half(3);");
}

#[test]
fn unrelated_types_do_not_convert() {
    let (_i, output) = compile_err("class A { A() { } };\nint f(A & a) { int x = a; return x; }");
    assert!(output
        .diagnostics
        .iter()
        .any(|d| d.code == ErrorCode::CouldNotConvert));
}

// === Overloads and default arguments ===

#[test]
fn default_arguments_fill_missing_parameters() {
    compile_ok("int add(int a, int b = 4) { return a + b; }\nint r = add(1);\nint s = add(1, 2);");
}

#[test]
fn ambiguous_call_is_rejected() {
    let (_i, output) = compile_err(
        "void f(float x) { }\n\
         void f(double x) { }\n\
         int main_entry() { f(1); return 0; }",
    );
    assert!(output
        .diagnostics
        .iter()
        .any(|d| d.code == ErrorCode::CouldNotFindValidMemberFunction));
}

// === Classes ===

#[test]
fn member_access_and_constructor_prologue() {
    compile_ok(
        "class Point {\n\
           int x;\n\
           int y;\n\
           Point(int a, int b) : x(a), y(b) { }\n\
           int sum() const { return x + y; }\n\
         };\n\
         Point p(1, 2);\n\
         int s = p.sum();",
    );
}

#[test]
fn delegating_constructor() {
    compile_ok(
        "class P {\n\
           int x;\n\
           P(int a) : x(a) { }\n\
           P() : P(0) { }\n\
         };\n\
         P p;",
    );
}

#[test]
fn inherited_member_offsets() {
    let (interner, ts, _output) = compile_ok(
        "class Base { int a; Base() : a(1) { } };\n\
         class Derived : Base {\n\
           int b;\n\
           Derived() : b(2) { }\n\
           int sum() { return a + b; }\n\
         };",
    );
    let sum = find_function(&ts, &interner, "sum");
    let body = body_of(&ts, sum);
    // `a` is attribute 0 (from Base), `b` is attribute 1.
    let mut indices: Vec<u16> = body
        .arena
        .exprs()
        .filter_map(|(_, e)| match e.kind {
            ProgExprKind::MemberAccess { index, .. } => Some(index),
            _ => None,
        })
        .collect();
    indices.sort_unstable();
    assert_eq!(indices, vec![0, 1]);
}

#[test]
fn private_members_are_inaccessible_outside() {
    let (_i, output) = compile_err(
        "class C {\n\
         private:\n\
           int secret;\n\
           C() : secret(0) { }\n\
         public:\n\
           int get() const { return secret; }\n\
         };\n\
         C c;\n\
         int x = c.secret;",
    );
    assert!(output
        .diagnostics
        .iter()
        .any(|d| d.code == ErrorCode::InaccessibleMember));
}

#[test]
fn deleted_function_calls_are_rejected() {
    let (_i, output) = compile_err(
        "class C { C() = default; C(const C & o) = delete; };\n\
         C a;\n\
         C b = a;",
    );
    assert!(output.diagnostics.iter().any(|d| {
        d.code == ErrorCode::CallToDeletedFunction || d.code == ErrorCode::CouldNotConvert
    }));
}

#[test]
fn cast_operator_enables_conversion() {
    compile_ok(
        "class Meters {\n\
           double v;\n\
           Meters(double x) : v(x) { }\n\
           operator double() const { return v; }\n\
         };\n\
         Meters m(2.5);\n\
         double d = m;",
    );
}

// === Operators ===

#[test]
fn user_defined_binary_operator() {
    compile_ok(
        "class Vec {\n\
           int x;\n\
           Vec(int a) : x(a) { }\n\
           Vec(const Vec & o) : x(o.x) { }\n\
           Vec operator+(const Vec & o) const { return Vec(x + o.x); }\n\
         };\n\
         Vec a(1);\n\
         Vec b(2);\n\
         Vec c = a + b;",
    );
}

#[test]
fn subscript_operator_overload() {
    compile_ok(
        "class Grid {\n\
           int data;\n\
           Grid() : data(0) { }\n\
           int operator[](int i) const { return data + i; }\n\
         };\n\
         Grid g;\n\
         int v = g[3];",
    );
}

#[test]
fn comparison_yields_bool() {
    compile_ok("bool b = 1 < 2;\nbool c = 1.5 >= 2.0;\nbool d = b == c;");
}

// === Conditional operator ===

#[test]
fn conditional_finds_common_type() {
    compile_ok("int pick(bool c) { return c ? 1 : 2; }");
    compile_ok("double pick2(bool c) { return c ? 1 : 2.5; }");
}

#[test]
fn conditional_without_common_type_fails() {
    let (_i, output) = compile_err(
        "class A { A() { } };\n\
         class B { B() { } };\n\
         void f(bool c) { A a; B b; c ? a : b; }",
    );
    assert!(output
        .diagnostics
        .iter()
        .any(|d| d.code == ErrorCode::CouldNotFindCommonType));
}

// === Enums ===

#[test]
fn enums_and_enum_to_int() {
    compile_ok(
        "enum Color { Red, Green = 4, Blue };\n\
         Color c = Green;\n\
         int v = c;",
    );
}

#[test]
fn enum_class_values_need_qualification() {
    compile_ok("enum class Mode { On, Off };\nMode m = Mode::On;");

    let (_i, output) = compile_err("enum class Mode { On, Off };\nMode m = On;");
    assert!(!output.success);
}

#[test]
fn enums_cannot_be_default_constructed() {
    let (_i, output) = compile_err("enum E { X };\nE e;");
    assert!(output
        .diagnostics
        .iter()
        .any(|d| d.code == ErrorCode::EnumerationsMustBeInitialized));
}

// === Variables and control flow ===

#[test]
fn auto_deduction() {
    compile_ok("auto x = 1;\nauto y = 2.5;\nint f() { auto z = x + 1; return z; }");
}

#[test]
fn auto_without_initializer_fails() {
    let (_i, output) = compile_err("auto x;");
    assert!(output
        .diagnostics
        .iter()
        .any(|d| d.code == ErrorCode::AutoMustBeUsedWithAssignment));
}

#[test]
fn auto_return_types_must_agree() {
    compile_ok("auto f(int n) { return n + 1; }");

    let (_i, output) = compile_err("auto f(bool c) { if (c) { return 1; } return 2.5; }");
    assert!(output
        .diagnostics
        .iter()
        .any(|d| d.code == ErrorCode::AutoReturnTypeMismatch));
}

#[test]
fn references_must_be_initialized() {
    let (_i, output) = compile_err("void f() { int & r; }");
    assert!(output
        .diagnostics
        .iter()
        .any(|d| d.code == ErrorCode::ReferencesMustBeInitialized));
}

#[test]
fn loops_and_jumps() {
    compile_ok(
        "int count() {\n\
           int n = 0;\n\
           for (int i = 0; i < 10; i = i + 1) {\n\
             if (i == 5) continue;\n\
             n = n + i;\n\
           }\n\
           while (n > 100) { n = n - 1; if (n == 50) break; }\n\
           return n;\n\
         }",
    );
}

#[test]
fn break_outside_loop_is_an_error() {
    let (_i, output) = compile_err("void f() { break; }");
    assert!(!output.success);
}

// === Functions as values ===

#[test]
fn function_variable_call() {
    compile_ok(
        "int add(int a, int b) { return a + b; }\n\
         int(int, int) op = add;\n\
         int r = op(1, 2);",
    );
}

// === User-defined literals ===

#[test]
fn literal_operator_resolution() {
    compile_ok(
        "double operator\"\" _km(double x) { return x * 1000.0; }\n\
         double d = 2.5_km;",
    );
}

#[test]
fn missing_literal_operator_is_an_error() {
    let (_i, output) = compile_err("int x = 90_deg;");
    assert!(output
        .diagnostics
        .iter()
        .any(|d| d.code == ErrorCode::CouldNotFindValidLiteralOperator));
}

// === Namespaces ===

#[test]
fn qualified_calls_into_namespaces() {
    compile_ok(
        "namespace math {\n\
           int abs(int x) { if (x < 0) { return 0 - x; } return x; }\n\
         }\n\
         int r = math::abs(0 - 4);",
    );
}

#[test]
fn using_directive_injects_names() {
    compile_ok(
        "namespace math { int one() { return 1; } }\n\
         using namespace math;\n\
         int r = one();",
    );
}

#[test]
fn typedef_and_type_alias() {
    compile_ok("typedef int Length;\nLength l = 4;\nusing Real = double;\nReal r = 1.5;");
}

// === Templates ===

#[test]
fn function_template_deduction() {
    compile_ok(
        "template<typename T> T first(T a, T b) { return a; }\n\
         int r = first(1, 2);",
    );
}

#[test]
fn class_template_instantiation() {
    compile_ok(
        "template<typename T> class Box {\n\
           T value;\n\
           Box(T v) : value(v) { }\n\
           T get() const { return value; }\n\
         };\n\
         Box<int> b(42);\n\
         int v = b.get();",
    );
}

#[test]
fn array_literal_builds_array_instance() {
    let (_i, ts, output) = compile_ok("Array<int> a = [1, 2, 3];");
    let script = output.script.expect("script body");
    let array_expr = script
        .arena
        .exprs()
        .find(|(_, e)| matches!(e.kind, ProgExprKind::ArrayConstruction { .. }))
        .expect("array construction node");
    assert!(ts.class_of(array_expr.1.ty).is_some());
}

#[test]
fn initializer_list_cannot_lead_an_array() {
    let (_i, output) = compile_err("Array<int> a = [{1, 2}, 3];");
    assert!(output
        .diagnostics
        .iter()
        .any(|d| d.code == ErrorCode::InitializerListAsFirstArrayElement));
}

// === Lambdas ===

#[test]
fn lambda_with_capture_compiles() {
    compile_ok(
        "int f() {\n\
           int base = 10;\n\
           auto add = [base](int x) { return base + x; };\n\
           return add(5);\n\
         }",
    );
}

// === Error batching ===

#[test]
fn sibling_functions_compile_despite_one_failure() {
    let (_i, output) = compile_err(
        "int bad() { return; }\n\
         int good() { return 1; }\n\
         int also_good() { return 2; }",
    );
    // Exactly the one failing body is reported.
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].code, ErrorCode::ReturnStatementWithoutValue);
}

// === Whole-tree invariants ===

#[test]
fn no_orphan_types_in_emitted_trees() {
    let (_i, ts, output) = compile_ok(
        "class P { int x; P(int a) : x(a) { } };\n\
         P p(4);\n\
         int y = p.x;",
    );
    let script = output.script.expect("script body");
    for (_, expr) in script.arena.exprs() {
        let ty = expr.ty;
        if ty.is_object() {
            assert!(ts.class_of(ty).is_some(), "orphan object type {ty:?}");
        } else if ty.is_enum() {
            assert!(ts.enum_of(ty).is_some(), "orphan enum type {ty:?}");
        } else if ty.is_function() {
            assert!(ts.signature_of(ty).is_some(), "orphan function type {ty:?}");
        }
    }
}

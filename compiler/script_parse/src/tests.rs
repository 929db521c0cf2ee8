use script_ir::ast::{
    DeclKind, ExprKind, FunctionBody, FunctionKind, IdentKind, Initializer, OperatorId, StmtKind,
    TemplateArg,
};
use script_ir::{AstArena, ExprId, StringInterner};

use crate::{parse, parse_expression, ParseResult};

fn parse_src(src: &str) -> (StringInterner, ParseResult) {
    let interner = StringInterner::new();
    let tokens = script_lexer::lex(src, &interner).unwrap();
    let result = parse(&tokens, &interner);
    (interner, result)
}

fn parse_ok(src: &str) -> (StringInterner, ParseResult) {
    let (interner, result) = parse_src(src);
    assert!(
        !result.has_errors(),
        "unexpected parse errors for {src:?}: {:?}",
        result.errors
    );
    (interner, result)
}

fn expr_of(src: &str) -> (AstArena, ExprId) {
    let interner = StringInterner::new();
    let tokens = script_lexer::lex(src, &interner).unwrap();
    parse_expression(&tokens, &interner).expect("expression parses")
}

#[test]
fn precedence_binds_multiplication_tighter() {
    let (arena, root) = expr_of("1 + 2 * 3");
    let ExprKind::Binary { op, rhs, .. } = &arena.expr(root).kind else {
        panic!("expected binary root");
    };
    assert_eq!(*op, OperatorId::Addition);
    let ExprKind::Binary { op: rhs_op, .. } = &arena.expr(*rhs).kind else {
        panic!("expected binary rhs");
    };
    assert_eq!(*rhs_op, OperatorId::Multiplication);
}

#[test]
fn left_associative_chains() {
    // (10 - 4) - 3
    let (arena, root) = expr_of("10 - 4 - 3");
    let ExprKind::Binary { op, lhs, rhs } = &arena.expr(root).kind else {
        panic!();
    };
    assert_eq!(*op, OperatorId::Subtraction);
    assert!(matches!(arena.expr(*lhs).kind, ExprKind::Binary { .. }));
    assert!(matches!(arena.expr(*rhs).kind, ExprKind::Int(3)));
}

#[test]
fn assignment_is_right_associative() {
    // a = (b = c)
    let (arena, root) = expr_of("a = b = c");
    let ExprKind::Binary { op, rhs, .. } = &arena.expr(root).kind else {
        panic!();
    };
    assert_eq!(*op, OperatorId::Assignment);
    assert!(matches!(
        arena.expr(*rhs).kind,
        ExprKind::Binary {
            op: OperatorId::Assignment,
            ..
        }
    ));
}

#[test]
fn conditional_rebuilds_as_ternary() {
    let (arena, root) = expr_of("a ? b + 1 : c");
    let ExprKind::Conditional { on_true, .. } = &arena.expr(root).kind else {
        panic!("expected conditional root, got {:?}", arena.expr(root).kind);
    };
    assert!(matches!(arena.expr(*on_true).kind, ExprKind::Binary { .. }));
}

#[test]
fn nested_conditionals() {
    // a ? b : (c ? d : e)
    let (arena, root) = expr_of("a ? b : c ? d : e");
    let ExprKind::Conditional { on_false, .. } = &arena.expr(root).kind else {
        panic!();
    };
    assert!(matches!(
        arena.expr(*on_false).kind,
        ExprKind::Conditional { .. }
    ));
}

#[test]
fn member_access_call_and_subscript_continuations() {
    let (arena, root) = expr_of("a.b(1)[2]");
    let ExprKind::Subscript { array, .. } = &arena.expr(root).kind else {
        panic!();
    };
    let ExprKind::Call { callee, .. } = &arena.expr(*array).kind else {
        panic!();
    };
    assert!(matches!(
        arena.expr(*callee).kind,
        ExprKind::MemberAccess { .. }
    ));
}

#[test]
fn prefix_and_postfix_increment() {
    let (arena, root) = expr_of("++a");
    assert!(matches!(
        arena.expr(root).kind,
        ExprKind::Unary {
            op: OperatorId::PreIncrement,
            ..
        }
    ));

    let (arena, root) = expr_of("a++");
    assert!(matches!(
        arena.expr(root).kind,
        ExprKind::Unary {
            op: OperatorId::PostIncrement,
            ..
        }
    ));
}

#[test]
fn variable_declaration_with_assignment() {
    let (interner, result) = parse_ok("int a = 1 + 2 * 3;");
    assert_eq!(result.module.declarations.len(), 1);
    let decl = result.arena.decl(result.module.declarations[0]);
    let DeclKind::Variable(var) = &decl.kind else {
        panic!("expected variable declaration");
    };
    assert_eq!(var.name, interner.intern("a"));
    assert!(matches!(var.init, Initializer::Assignment(_)));
}

#[test]
fn nested_template_arguments_split_right_shift() {
    let (interner, result) = parse_ok("Array<Array<int>> aa;");
    let decl = result.arena.decl(result.module.declarations[0]);
    let DeclKind::Variable(var) = &decl.kind else {
        panic!("expected variable declaration");
    };
    assert_eq!(var.name, interner.intern("aa"));

    let ident = var.ty.ident.expect("named type");
    let IdentKind::Template { name, args } = &result.arena.ident(ident).kind else {
        panic!("expected template-id type");
    };
    assert_eq!(*name, interner.intern("Array"));
    assert_eq!(args.len(), 1);

    // The single argument is itself Array<int>.
    let TemplateArg::Type(inner) = &args[0] else {
        panic!("expected type argument");
    };
    let inner_ident = inner.ident.expect("named inner type");
    let IdentKind::Template {
        name: inner_name,
        args: inner_args,
    } = &result.arena.ident(inner_ident).kind
    else {
        panic!("expected nested template-id");
    };
    assert_eq!(*inner_name, interner.intern("Array"));
    assert_eq!(inner_args.len(), 1);
}

#[test]
fn class_with_inheritance_and_virtual_method() {
    let (interner, result) = parse_ok(
        "class A { virtual int f() { return 1; } };\n\
         class B : A { int f() { return 2; } };",
    );
    assert_eq!(result.module.declarations.len(), 2);

    let DeclKind::Class(a) = &result.arena.decl(result.module.declarations[0]).kind else {
        panic!();
    };
    assert!(a.parent.is_none());
    assert_eq!(a.members.len(), 1);
    let DeclKind::Function(f) = &result.arena.decl(a.members[0].decl).kind else {
        panic!();
    };
    assert!(f.is_virtual);
    assert!(matches!(f.body, FunctionBody::Block(_)));

    let DeclKind::Class(b) = &result.arena.decl(result.module.declarations[1]).kind else {
        panic!();
    };
    let parent = b.parent.expect("B has a parent");
    assert!(matches!(
        result.arena.ident(parent).kind,
        IdentKind::Simple(n) if n == interner.intern("A")
    ));
}

#[test]
fn constructor_with_member_initializers() {
    let (_interner, result) = parse_ok("class P { int x; P() : x(0) { } };");
    let DeclKind::Class(p) = &result.arena.decl(result.module.declarations[0]).kind else {
        panic!();
    };
    let DeclKind::Function(ctor) = &result.arena.decl(p.members[1].decl).kind else {
        panic!("expected the constructor");
    };
    let FunctionKind::Constructor { initializers } = &ctor.kind else {
        panic!("expected constructor kind, got {:?}", ctor.kind);
    };
    assert_eq!(initializers.len(), 1);
}

#[test]
fn constructor_with_parameters_only() {
    // The `P(int, int) :` head first parses as a function-signature type;
    // detection must reinterpret it as a constructor.
    let (_interner, result) = parse_ok("class P { int a; int b; P(int, int) : a(0), b(0) { } };");
    let DeclKind::Class(p) = &result.arena.decl(result.module.declarations[0]).kind else {
        panic!();
    };
    let DeclKind::Function(ctor) = &result.arena.decl(p.members[2].decl).kind else {
        panic!();
    };
    assert!(matches!(ctor.kind, FunctionKind::Constructor { .. }));
    assert_eq!(ctor.params.len(), 2);
}

#[test]
fn destructor_and_cast_operator() {
    let (_interner, result) = parse_ok(
        "class R { ~R() { } operator int() const { return 0; } };",
    );
    let DeclKind::Class(r) = &result.arena.decl(result.module.declarations[0]).kind else {
        panic!();
    };
    let DeclKind::Function(dtor) = &result.arena.decl(r.members[0].decl).kind else {
        panic!();
    };
    assert!(matches!(dtor.kind, FunctionKind::Destructor));

    let DeclKind::Function(cast) = &result.arena.decl(r.members[1].decl).kind else {
        panic!();
    };
    assert!(matches!(cast.kind, FunctionKind::Cast { .. }));
    assert!(cast.is_const);
}

#[test]
fn operator_overload_declarations() {
    let (_interner, result) = parse_ok(
        "class V { int operator[](int i) { return i; } int operator()(int a, int b) { return a; } };",
    );
    let DeclKind::Class(v) = &result.arena.decl(result.module.declarations[0]).kind else {
        panic!();
    };
    let DeclKind::Function(sub) = &result.arena.decl(v.members[0].decl).kind else {
        panic!();
    };
    assert!(matches!(
        result.arena.ident(sub.name).kind,
        IdentKind::Operator(OperatorId::Subscript)
    ));
    let DeclKind::Function(call) = &result.arena.decl(v.members[1].decl).kind else {
        panic!();
    };
    assert!(matches!(
        result.arena.ident(call.name).kind,
        IdentKind::Operator(OperatorId::FunctionCall)
    ));
}

#[test]
fn literal_operator_declaration() {
    let (interner, result) = parse_ok("double operator\"\" _km(double x) { return x; }");
    let DeclKind::Function(f) = &result.arena.decl(result.module.declarations[0]).kind else {
        panic!();
    };
    assert!(matches!(
        result.arena.ident(f.name).kind,
        IdentKind::LiteralOperator(n) if n == interner.intern("_km")
    ));
}

#[test]
fn defaulted_deleted_and_pure_members() {
    let (_interner, result) = parse_ok(
        "class C { C() = default; C(const C & o) = delete; virtual int f() = 0; };",
    );
    let DeclKind::Class(c) = &result.arena.decl(result.module.declarations[0]).kind else {
        panic!();
    };
    let bodies: Vec<_> = c
        .members
        .iter()
        .map(|m| match &result.arena.decl(m.decl).kind {
            DeclKind::Function(f) => &f.body,
            other => panic!("unexpected member {other:?}"),
        })
        .collect();
    assert!(matches!(bodies[0], FunctionBody::Defaulted));
    assert!(matches!(bodies[1], FunctionBody::Deleted));
    assert!(matches!(bodies[2], FunctionBody::Pure));
}

#[test]
fn enum_declarations() {
    let (interner, result) = parse_ok("enum Color { Red, Green = 4, Blue };");
    let DeclKind::Enum(e) = &result.arena.decl(result.module.declarations[0]).kind else {
        panic!();
    };
    assert_eq!(e.name, interner.intern("Color"));
    assert!(!e.is_enum_class);
    assert_eq!(e.values.len(), 3);
    assert!(e.values[1].value.is_some());

    let (_interner, result) = parse_ok("enum class Mode { On, Off };");
    let DeclKind::Enum(e) = &result.arena.decl(result.module.declarations[0]).kind else {
        panic!();
    };
    assert!(e.is_enum_class);
}

#[test]
fn namespace_and_qualified_using() {
    let (_interner, result) = parse_ok(
        "namespace math { int abs(int x) { return x; } }\nusing math::abs;\nusing Real = double;",
    );
    assert_eq!(result.module.declarations.len(), 3);
    assert!(matches!(
        result.arena.decl(result.module.declarations[0]).kind,
        DeclKind::Namespace { .. }
    ));
    assert!(matches!(
        &result.arena.decl(result.module.declarations[1]).kind,
        DeclKind::Using(script_ir::ast::UsingDecl::Declaration { .. })
    ));
    assert!(matches!(
        &result.arena.decl(result.module.declarations[2]).kind,
        DeclKind::Using(script_ir::ast::UsingDecl::TypeAlias { .. })
    ));
}

#[test]
fn import_directives() {
    let (interner, result) = parse_ok("import a.b.c;\nexport import d;");
    let DeclKind::Import { export, names } =
        &result.arena.decl(result.module.declarations[0]).kind
    else {
        panic!();
    };
    assert!(!*export);
    assert_eq!(
        names,
        &vec![
            interner.intern("a"),
            interner.intern("b"),
            interner.intern("c")
        ]
    );
    let DeclKind::Import { export, .. } = &result.arena.decl(result.module.declarations[1]).kind
    else {
        panic!();
    };
    assert!(*export);
}

#[test]
fn class_template_declaration() {
    let (_interner, result) = parse_ok("template<typename T, int N = 4> class Buf { T data; };");
    let DeclKind::Template(t) = &result.arena.decl(result.module.declarations[0]).kind else {
        panic!();
    };
    assert_eq!(t.params.len(), 2);
    assert!(t.params[1].default_value.is_some());
    assert!(matches!(
        result.arena.decl(t.declaration).kind,
        DeclKind::Class(_)
    ));
}

#[test]
fn function_template_declaration() {
    let (_interner, result) = parse_ok("template<typename T> T max(T a, T b) { return a; }");
    let DeclKind::Template(t) = &result.arena.decl(result.module.declarations[0]).kind else {
        panic!();
    };
    assert!(matches!(
        result.arena.decl(t.declaration).kind,
        DeclKind::Function(_)
    ));
}

#[test]
fn lambda_vs_array_literal() {
    let (arena, root) = expr_of("[1, 2, 3]");
    assert!(matches!(arena.expr(root).kind, ExprKind::Array { .. }));

    let (arena, root) = expr_of("[x](int a) { return a; }");
    let ExprKind::Lambda(lambda) = &arena.expr(root).kind else {
        panic!("expected lambda");
    };
    assert_eq!(lambda.captures.len(), 1);
    assert_eq!(lambda.params.len(), 1);
}

#[test]
fn expression_statement_vs_declaration() {
    // `a * b;` cannot be a declaration (no declarator after `a *`).
    let (_interner, result) = parse_ok("a * b;");
    let stmt = result.arena.stmt(result.module.statements[0]);
    assert!(matches!(stmt.kind, StmtKind::Expression(_)));

    // `f(x);` is a call expression statement.
    let (_interner, result) = parse_ok("f(x);");
    let stmt = result.arena.stmt(result.module.statements[0]);
    assert!(matches!(stmt.kind, StmtKind::Expression(_)));
}

#[test]
fn control_flow_statements() {
    let (_interner, result) = parse_ok(
        "void f(int n) {\n\
           if (n < 0) { return; } else { n = 0; }\n\
           while (n < 10) { n = n + 1; if (n == 5) break; }\n\
           for (int i = 0; i < n; i = i + 1) { continue; }\n\
         }",
    );
    assert_eq!(result.module.declarations.len(), 1);
}

#[test]
fn brace_construction_expression() {
    let (arena, root) = expr_of("Point{1, 2}");
    assert!(matches!(
        arena.expr(root).kind,
        ExprKind::BraceConstruction { .. }
    ));
}

#[test]
fn error_recovery_surfaces_multiple_errors() {
    let (interner, result) = parse_src("int a = ;\nint b = 2;\nclass {};\nint c = 3;");
    assert!(result.has_errors());
    assert!(result.errors.len() >= 2);
    // The good declarations between the bad ones still made it in.
    let b = interner.intern("b");
    let c = interner.intern("c");
    for name in [b, c] {
        assert!(result
            .module
            .declarations
            .iter()
            .any(|&d| matches!(&result.arena.decl(d).kind, DeclKind::Variable(v) if v.name == name)));
    }
}

#[test]
fn default_arguments_in_function_declaration() {
    let (_interner, result) = parse_ok("int f(int a, int b = 4) { return a + b; }");
    let DeclKind::Function(f) = &result.arena.decl(result.module.declarations[0]).kind else {
        panic!();
    };
    assert_eq!(f.params.len(), 2);
    assert!(f.params[0].default_value.is_none());
    assert!(f.params[1].default_value.is_some());
}

#[test]
fn function_signature_type_variable() {
    let (_interner, result) = parse_ok("int(int, int) op = add;");
    let DeclKind::Variable(v) = &result.arena.decl(result.module.declarations[0]).kind else {
        panic!();
    };
    assert!(v.ty.signature.is_some());
}

#[test]
fn return_without_value() {
    let (_interner, result) = parse_ok("void f() { return; }");
    assert!(!result.has_errors());
}

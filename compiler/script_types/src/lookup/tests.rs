use script_ir::ast::{Ident, IdentKind, QualType, TemplateArg};
use script_ir::{AstArena, NamespaceId, Span, StringInterner, Type};

use crate::lookup::{Lookup, NameLookup, NoUserTemplates};
use crate::namespace::GlobalVariable;
use crate::scope::{ScopeKind, ScopeStack};
use crate::{register_builtins, TypeSystem};

struct Fixture {
    interner: StringInterner,
    ts: TypeSystem,
    arena: AstArena,
    scopes: ScopeStack,
}

impl Fixture {
    fn new() -> Self {
        let interner = StringInterner::new();
        let mut ts = TypeSystem::new(&interner);
        register_builtins(&mut ts, &interner);
        Fixture {
            interner,
            ts,
            arena: AstArena::new(),
            scopes: ScopeStack::new(),
        }
    }

    fn simple_ident(&mut self, text: &str) -> script_ir::IdentId {
        let name = self.interner.intern(text);
        self.arena.alloc_ident(Ident {
            kind: IdentKind::Simple(name),
            span: Span::DUMMY,
        })
    }
}

#[test]
fn builtin_type_names_short_circuit() {
    let mut fx = Fixture::new();
    let ident = fx.simple_ident("int");
    let root = fx.scopes.root();

    let mut inst = NoUserTemplates;
    let mut lookup = Lookup {
        scopes: &fx.scopes,
        ts: &mut fx.ts,
        arena: &fx.arena,
        interner: &fx.interner,
        instantiator: &mut inst,
    };
    let result = lookup.resolve(ident, root).unwrap();
    assert!(matches!(result, NameLookup::Type(t) if t == Type::INT));
}

#[test]
fn global_variables_resolve_with_type() {
    let mut fx = Fixture::new();
    let name = fx.interner.intern("answer");
    fx.ts
        .namespace_mut(NamespaceId::ROOT)
        .variables
        .insert(name, GlobalVariable { ty: Type::INT, index: 0 });

    let ident = fx.simple_ident("answer");
    let root = fx.scopes.root();
    let mut inst = NoUserTemplates;
    let mut lookup = Lookup {
        scopes: &fx.scopes,
        ts: &mut fx.ts,
        arena: &fx.arena,
        interner: &fx.interner,
        instantiator: &mut inst,
    };
    let result = lookup.resolve(ident, root).unwrap();
    assert!(matches!(result, NameLookup::GlobalVariable(0, t) if t == Type::INT));
}

#[test]
fn qualified_lookup_does_not_ascend() {
    let mut fx = Fixture::new();

    // Root has `x`; namespace `inner` does not. `inner::x` must fail even
    // though unqualified lookup from inside `inner` would find it.
    let x = fx.interner.intern("x");
    fx.ts
        .namespace_mut(NamespaceId::ROOT)
        .variables
        .insert(x, GlobalVariable { ty: Type::INT, index: 0 });
    let inner_name = fx.interner.intern("inner");
    let inner = fx.ts.add_namespace(inner_name, NamespaceId::ROOT);

    let lhs = fx.simple_ident("inner");
    let rhs = fx.simple_ident("x");
    let scoped = fx.arena.alloc_ident(Ident {
        kind: IdentKind::Scoped { lhs, rhs },
        span: Span::DUMMY,
    });

    let root = fx.scopes.root();
    let mut inst = NoUserTemplates;
    let mut lookup = Lookup {
        scopes: &fx.scopes,
        ts: &mut fx.ts,
        arena: &fx.arena,
        interner: &fx.interner,
        instantiator: &mut inst,
    };
    let result = lookup.resolve(scoped, root).unwrap();
    assert!(matches!(result, NameLookup::Unknown));

    // From inside `inner`, unqualified lookup ascends and finds root's x.
    let inner_scope = fx.scopes.push(root, ScopeKind::Namespace(inner));
    let mut inst = NoUserTemplates;
    let mut lookup = Lookup {
        scopes: &fx.scopes,
        ts: &mut fx.ts,
        arena: &fx.arena,
        interner: &fx.interner,
        instantiator: &mut inst,
    };
    let result = lookup.resolve_unqualified(x, inner_scope);
    assert!(matches!(result, NameLookup::GlobalVariable(0, _)));
}

#[test]
fn member_lookup_walks_bases_and_offsets() {
    let mut fx = Fixture::new();
    let base = fx
        .ts
        .register_class(fx.interner.intern("Base"), NamespaceId::ROOT);
    let derived = fx
        .ts
        .register_class(fx.interner.intern("Derived"), NamespaceId::ROOT);

    let a = fx.interner.intern("a");
    let b = fx.interner.intern("b");
    fx.ts.class_mut(base).data_members.push(crate::DataMember {
        ty: Type::INT,
        name: a,
        access: crate::AccessSpecifier::Public,
    });
    fx.ts.class_mut(derived).parent = Some(base);
    fx.ts.class_mut(derived).attributes_offset = 1;
    fx.ts.class_mut(derived).data_members.push(crate::DataMember {
        ty: Type::DOUBLE,
        name: b,
        access: crate::AccessSpecifier::Public,
    });

    let root = fx.scopes.root();
    let _ = root;
    let mut inst = NoUserTemplates;
    let mut lookup = Lookup {
        scopes: &fx.scopes,
        ts: &mut fx.ts,
        arena: &fx.arena,
        interner: &fx.interner,
        instantiator: &mut inst,
    };

    // Own member: absolute index includes the parent offset.
    assert!(matches!(lookup.member(b, derived), NameLookup::DataMember(1)));
    // Inherited member: found in the base, at the base's offset.
    assert!(matches!(lookup.member(a, derived), NameLookup::DataMember(0)));
}

#[test]
fn array_template_instantiation_is_cached() {
    let mut fx = Fixture::new();

    let int_qt = {
        let ident = fx.simple_ident("int");
        QualType::named(ident)
    };
    let args = vec![TemplateArg::Type(int_qt)];

    let root = fx.scopes.root();
    let template = fx.ts.array_template();
    let mut inst = NoUserTemplates;
    let mut lookup = Lookup {
        scopes: &fx.scopes,
        ts: &mut fx.ts,
        arena: &fx.arena,
        interner: &fx.interner,
        instantiator: &mut inst,
    };

    let first = lookup.instantiate(template, &args, root).unwrap();
    let second = lookup.instantiate(template, &args, root).unwrap();
    assert_eq!(first, second, "equal argument vectors share one instance");
}

#[test]
fn unscoped_enum_values_are_visible_in_namespace() {
    let mut fx = Fixture::new();
    let color = fx
        .ts
        .register_enum(fx.interner.intern("Color"), false, NamespaceId::ROOT);
    let red = fx.interner.intern("Red");
    fx.ts.enum_mut(color).add_value(red, 0);
    fx.ts
        .namespace_mut(NamespaceId::ROOT)
        .enums
        .insert(fx.interner.intern("Color"), color);

    let root = fx.scopes.root();
    let mut inst = NoUserTemplates;
    let mut lookup = Lookup {
        scopes: &fx.scopes,
        ts: &mut fx.ts,
        arena: &fx.arena,
        interner: &fx.interner,
        instantiator: &mut inst,
    };
    let result = lookup.resolve_unqualified(red, root);
    assert!(matches!(result, NameLookup::Enumerator(e, 0) if e == color));
}

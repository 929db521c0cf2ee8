//! The type table and symbol arenas.

use rustc_hash::FxHashMap;

use script_ir::{
    ClassId, EnumId, FunctionId, LambdaId, Name, NamespaceId, StringInterner, TemplateId, Type,
    TypeFlags,
};

use crate::class::ClassDef;
use crate::enum_::EnumDef;
use crate::function::{FunctionDef, FunctionFlags, FunctionVariant};
use crate::namespace::NamespaceDef;
use crate::prototype::Prototype;
use crate::template::{TemplateDef, TemplateKind, TemplateParamDef};

/// What a type-table row denotes.
#[derive(Copy, Clone, Debug)]
enum TypeEntry {
    /// Built-in fundamental types and reserved rows.
    Reserved,
    Class(ClassId),
    Enum(EnumId),
    /// Function-signature type; payload indexes `function_protos`.
    FunctionSig(u32),
    Closure(LambdaId),
}

/// One captured variable of a closure type.
#[derive(Clone, Debug)]
pub struct CaptureDef {
    pub name: Name,
    pub ty: Type,
    pub by_ref: bool,
}

/// A closure type synthesized for a lambda expression.
#[derive(Debug)]
pub struct ClosureDef {
    pub ty: Type,
    pub captures: Vec<CaptureDef>,
    /// The generated call operator.
    pub call_operator: Option<FunctionId>,
}

/// Owns the type table and every symbol of one engine.
///
/// Type ids are assigned lazily: registering a class or enum takes the
/// next free table row; function-signature types are interned so equal
/// prototypes share one row.
pub struct TypeSystem {
    entries: Vec<TypeEntry>,

    classes: Vec<ClassDef>,
    enums: Vec<EnumDef>,
    namespaces: Vec<NamespaceDef>,
    functions: Vec<FunctionDef>,
    templates: Vec<TemplateDef>,
    closures: Vec<ClosureDef>,

    function_protos: Vec<Prototype>,
    function_type_cache: FxHashMap<Prototype, Type>,
    /// Synthesized `operator=` per function-signature type.
    function_assignments: FxHashMap<Type, FunctionId>,

    /// The built-in `Array` class template.
    array_template: TemplateId,
}

impl TypeSystem {
    pub fn new(interner: &StringInterner) -> Self {
        let mut ts = TypeSystem {
            entries: vec![TypeEntry::Reserved; Type::FIRST_USER_INDEX as usize],
            classes: Vec::new(),
            enums: Vec::new(),
            namespaces: Vec::new(),
            functions: Vec::new(),
            templates: Vec::new(),
            closures: Vec::new(),
            function_protos: Vec::new(),
            function_type_cache: FxHashMap::default(),
            function_assignments: FxHashMap::default(),
            array_template: TemplateId::from_raw(0),
        };

        // Root namespace.
        ts.namespaces
            .push(NamespaceDef::new(Name::EMPTY, None));

        // The built-in Array<T> template lives in the root namespace.
        let array_name = interner.intern("Array");
        let t_name = interner.intern("T");
        let array_template = ts.add_template(TemplateDef::new(
            array_name,
            vec![TemplateParamDef {
                kind: script_ir::ast::TemplateParamKind::Type,
                name: t_name,
                default_value: None,
            }],
            TemplateKind::BuiltinArray,
            NamespaceId::ROOT,
        ));
        ts.array_template = array_template;
        ts.namespaces[0].templates.push(array_template);

        ts
    }

    // === Type table ===

    fn push_entry(&mut self, entry: TypeEntry) -> u32 {
        let index = u32::try_from(self.entries.len()).expect("type table overflow");
        assert!(index <= script_ir::TYPE_INDEX_MASK, "type table overflow");
        self.entries.push(entry);
        index
    }

    /// Class denoted by `ty`, when it is an object type.
    pub fn class_of(&self, ty: Type) -> Option<ClassId> {
        if !ty.is_object() {
            return None;
        }
        match self.entries.get(ty.index() as usize) {
            Some(TypeEntry::Class(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn enum_of(&self, ty: Type) -> Option<EnumId> {
        if !ty.is_enum() {
            return None;
        }
        match self.entries.get(ty.index() as usize) {
            Some(TypeEntry::Enum(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn closure_of(&self, ty: Type) -> Option<&ClosureDef> {
        if !ty.is_closure() {
            return None;
        }
        match self.entries.get(ty.index() as usize) {
            Some(TypeEntry::Closure(id)) => self.closures.get(id.index()),
            _ => None,
        }
    }

    /// Prototype of a function-signature type.
    pub fn signature_of(&self, ty: Type) -> Option<&Prototype> {
        if !ty.is_function() {
            return None;
        }
        match self.entries.get(ty.index() as usize) {
            Some(TypeEntry::FunctionSig(idx)) => self.function_protos.get(*idx as usize),
            _ => None,
        }
    }

    /// Intern a function-signature type.
    pub fn function_type(&mut self, proto: Prototype) -> Type {
        if let Some(&ty) = self.function_type_cache.get(&proto) {
            return ty;
        }
        let proto_index = u32::try_from(self.function_protos.len()).expect("proto overflow");
        self.function_protos.push(proto.clone());
        let index = self.push_entry(TypeEntry::FunctionSig(proto_index));
        let ty = Type::new(index, TypeFlags::FUNCTION);
        self.function_type_cache.insert(proto, ty);
        ty
    }

    // === Classes ===

    /// Register a new class; returns its id. The class's type handle is
    /// stored in the returned `ClassDef`.
    pub fn register_class(&mut self, name: Name, enclosing: NamespaceId) -> ClassId {
        let id = ClassId::from_raw(self.classes.len() as u32);
        let index = self.push_entry(TypeEntry::Class(id));
        let ty = Type::new(index, TypeFlags::OBJECT);
        self.classes.push(ClassDef::new(name, ty, enclosing));
        id
    }

    /// Register the built-in `String` class on its reserved table row.
    pub(crate) fn register_string_class(&mut self, name: Name) -> ClassId {
        let id = ClassId::from_raw(self.classes.len() as u32);
        self.entries[Type::STRING.index() as usize] = TypeEntry::Class(id);
        self.classes
            .push(ClassDef::new(name, Type::STRING, NamespaceId::ROOT));
        id
    }

    #[inline]
    pub fn class(&self, id: ClassId) -> &ClassDef {
        &self.classes[id.index()]
    }

    #[inline]
    pub fn class_mut(&mut self, id: ClassId) -> &mut ClassDef {
        &mut self.classes[id.index()]
    }

    /// Number of parent edges from `derived` up to `base`; 0 when equal,
    /// -1 when unrelated.
    pub fn inheritance_level(&self, derived: ClassId, base: ClassId) -> i32 {
        let mut depth = 0;
        let mut current = Some(derived);
        while let Some(id) = current {
            if id == base {
                return depth;
            }
            depth += 1;
            current = self.class(id).parent;
        }
        -1
    }

    /// A class is copy-constructible when it has a non-deleted
    /// constructor callable with `(const T&)`.
    ///
    /// Constructor prototypes carry only the declared parameters; the
    /// object under construction is a compiler convention, not a
    /// parameter.
    pub fn is_copy_constructible(&self, id: ClassId) -> bool {
        let class = self.class(id);
        class.constructors.iter().any(|&ctor| {
            let f = self.function(ctor);
            !f.is_deleted()
                && f.prototype.param_count() == 1
                && f.prototype.param(0).base_type() == class.ty
        })
    }

    /// The default constructor (callable with no arguments), if any.
    pub fn default_constructor(&self, id: ClassId) -> Option<FunctionId> {
        self.class(id).constructors.iter().copied().find(|&ctor| {
            let f = self.function(ctor);
            f.prototype.param_count() <= f.default_args.len()
        })
    }

    /// The copy constructor, if any.
    pub fn copy_constructor(&self, id: ClassId) -> Option<FunctionId> {
        let class_ty = self.class(id).ty;
        self.class(id).constructors.iter().copied().find(|&ctor| {
            let f = self.function(ctor);
            f.prototype.param_count() == 1 && f.prototype.param(0).base_type() == class_ty
        })
    }

    /// The destructor to run for values of `ty`, searching base classes.
    pub fn destructor_for(&self, ty: Type) -> Option<FunctionId> {
        let mut current = self.class_of(ty);
        while let Some(id) = current {
            if let Some(dtor) = self.class(id).destructor {
                return Some(dtor);
            }
            current = self.class(id).parent;
        }
        None
    }

    // === Enums ===

    pub fn register_enum(&mut self, name: Name, is_enum_class: bool, enclosing: NamespaceId) -> EnumId {
        let id = EnumId::from_raw(self.enums.len() as u32);
        let index = self.push_entry(TypeEntry::Enum(id));
        let ty = Type::new(index, TypeFlags::ENUM);
        self.enums
            .push(EnumDef::new(name, ty, is_enum_class, enclosing));
        id
    }

    #[inline]
    pub fn enum_(&self, id: EnumId) -> &EnumDef {
        &self.enums[id.index()]
    }

    #[inline]
    pub fn enum_mut(&mut self, id: EnumId) -> &mut EnumDef {
        &mut self.enums[id.index()]
    }

    // === Namespaces ===

    pub fn add_namespace(&mut self, name: Name, parent: NamespaceId) -> NamespaceId {
        let id = NamespaceId::from_raw(self.namespaces.len() as u32);
        self.namespaces.push(NamespaceDef::new(name, Some(parent)));
        self.namespaces[parent.index()].namespaces.insert(name, id);
        id
    }

    #[inline]
    pub fn namespace(&self, id: NamespaceId) -> &NamespaceDef {
        &self.namespaces[id.index()]
    }

    #[inline]
    pub fn namespace_mut(&mut self, id: NamespaceId) -> &mut NamespaceDef {
        &mut self.namespaces[id.index()]
    }

    // === Functions ===

    pub fn add_function(&mut self, def: FunctionDef) -> FunctionId {
        let id = FunctionId::from_raw(self.functions.len() as u32);
        self.functions.push(def);
        id
    }

    #[inline]
    pub fn function(&self, id: FunctionId) -> &FunctionDef {
        &self.functions[id.index()]
    }

    /// Bounds-checked access, for iteration over all functions.
    pub fn try_function(&self, id: FunctionId) -> Option<&FunctionDef> {
        self.functions.get(id.index())
    }

    /// Bounds-checked access, for iteration over all classes.
    pub fn try_class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.index())
    }

    #[inline]
    pub fn function_mut(&mut self, id: FunctionId) -> &mut FunctionDef {
        &mut self.functions[id.index()]
    }

    // === Templates ===

    pub fn add_template(&mut self, def: TemplateDef) -> TemplateId {
        let id = TemplateId::from_raw(self.templates.len() as u32);
        self.templates.push(def);
        id
    }

    #[inline]
    pub fn template(&self, id: TemplateId) -> &TemplateDef {
        &self.templates[id.index()]
    }

    #[inline]
    pub fn template_mut(&mut self, id: TemplateId) -> &mut TemplateDef {
        &mut self.templates[id.index()]
    }

    pub fn array_template(&self) -> TemplateId {
        self.array_template
    }

    // === Closures ===

    pub fn register_closure(&mut self, captures: Vec<CaptureDef>) -> (LambdaId, Type) {
        let id = LambdaId::from_raw(self.closures.len() as u32);
        let index = self.push_entry(TypeEntry::Closure(id));
        let ty = Type::new(index, TypeFlags::CLOSURE);
        self.closures.push(ClosureDef {
            ty,
            captures,
            call_operator: None,
        });
        (id, ty)
    }

    pub fn closure(&self, id: LambdaId) -> &ClosureDef {
        &self.closures[id.index()]
    }

    pub fn closure_mut(&mut self, id: LambdaId) -> &mut ClosureDef {
        &mut self.closures[id.index()]
    }

    /// The synthesized assignment operator of a function-signature type,
    /// created on first use.
    pub fn function_assignment(&mut self, ty: Type) -> FunctionId {
        let base = ty.base_type();
        if let Some(&f) = self.function_assignments.get(&base) {
            return f;
        }
        let proto = Prototype::new(
            Type::make_ref(base),
            vec![Type::make_ref(base), base.with_const()],
        );
        let f = self.make_native_fn(
            crate::function::FunctionVariant::Operator {
                op: script_ir::ast::OperatorId::Assignment,
            },
            crate::function::FunctionFlags::default(),
            proto,
            crate::scope::SymbolRef::Namespace(NamespaceId::ROOT),
            crate::function::NativeTag::FunctionAssign,
        );
        self.function_assignments.insert(base, f);
        f
    }

    /// Enclosing namespace of a type, for operator lookup: classes and
    /// enums report their declaration namespace, everything else the
    /// root.
    pub fn enclosing_namespace(&self, ty: Type) -> NamespaceId {
        if let Some(class) = self.class_of(ty) {
            self.class(class).enclosing_namespace
        } else if let Some(en) = self.enum_of(ty) {
            self.enum_(en).enclosing_namespace
        } else {
            NamespaceId::ROOT
        }
    }

    /// Human-readable name of a type, for diagnostics.
    pub fn type_name(&self, ty: Type, interner: &StringInterner) -> String {
        let mut out = String::new();
        if ty.is_const() {
            out.push_str("const ");
        }
        let base = match ty.index() {
            0 => "null".to_owned(),
            1 => "void".to_owned(),
            2 => "bool".to_owned(),
            3 => "char".to_owned(),
            4 => "int".to_owned(),
            5 => "float".to_owned(),
            6 => "double".to_owned(),
            7 if ty.is_object() => "String".to_owned(),
            8 => "initializer-list".to_owned(),
            9 => "auto".to_owned(),
            _ => {
                if let Some(id) = self.class_of(ty) {
                    interner.resolve(self.class(id).name).to_owned()
                } else if let Some(id) = self.enum_of(ty) {
                    interner.resolve(self.enum_(id).name).to_owned()
                } else if let Some(proto) = self.signature_of(ty) {
                    let mut s = self.type_name(proto.return_type, interner);
                    s.push('(');
                    for (i, p) in proto.params.iter().enumerate() {
                        if i > 0 {
                            s.push_str(", ");
                        }
                        s.push_str(&self.type_name(*p, interner));
                    }
                    s.push(')');
                    s
                } else if ty.is_closure() {
                    "<closure>".to_owned()
                } else {
                    format!("<type#{}>", ty.index())
                }
            }
        };
        out.push_str(&base);
        if ty.is_reference() {
            out.push('&');
        } else if ty.is_rvalue_reference() {
            out.push_str("&&");
        }
        out
    }

    /// Register a host-implemented function (no compiled body).
    pub fn make_native_fn(
        &mut self,
        variant: FunctionVariant,
        flags: FunctionFlags,
        prototype: Prototype,
        enclosing: crate::scope::SymbolRef,
        native: crate::function::NativeTag,
    ) -> FunctionId {
        self.add_function(FunctionDef {
            variant,
            flags: flags | FunctionFlags::NATIVE,
            prototype,
            enclosing,
            default_args: Vec::new(),
            body: None,
            native: Some(native),
            source: None,
        })
    }
}

#[cfg(test)]
mod tests;

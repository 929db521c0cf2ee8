//! Name lookup over the scope stack.
//!
//! [`Lookup`] bundles the immutable context a query needs (scope stack,
//! AST, interner) with the type system, which is mutable because looking
//! up a template-id may instantiate a class template. Instantiating a
//! *user* template requires compiling its members, which is a layer
//! above this crate; the [`TemplateInstantiator`] trait injects that
//! capability, while the built-in `Array<T>` template is handled here
//! directly.

use script_ir::ast::{IdentKind, OperatorId, QualType, RefKind, TemplateArg};
use script_ir::{
    AstArena, ClassId, EnumId, ExprId, FunctionId, Name, NamespaceId, StringInterner, TemplateId,
    Type, TypeFlags,
};

use crate::array::instantiate_array;
use crate::prototype::Prototype;
use crate::scope::{Scope, ScopeKind, ScopeStack};
use crate::template::{TemplateArgValue, TemplateInstance, TemplateKind};
use crate::type_system::TypeSystem;

/// Result of a name lookup: exactly one classification.
#[derive(Clone, Debug)]
pub enum NameLookup {
    Unknown,
    /// Overload set, possibly with function templates to complete from
    /// call arguments.
    Functions {
        functions: Vec<FunctionId>,
        templates: Vec<TemplateId>,
    },
    Type(Type),
    /// Absolute attribute index (parent members first).
    DataMember(usize),
    StaticDataMember(ClassId, Name),
    GlobalVariable(usize, Type),
    Enumerator(EnumId, i32),
    Namespace(NamespaceId),
    Template(TemplateId),
    TemplateParameter(TemplateArgValue),
}

/// Errors a lookup itself can produce (template-argument problems).
#[derive(Clone, Debug)]
pub enum LookupError {
    /// The qualifier of `a::b` does not name a scope.
    NotAScope,
    /// A template name was used without valid arguments.
    InvalidTemplateArgument,
    MissingTemplateArgument,
    /// A named type did not resolve.
    UnknownType(Name),
}

/// Instantiates user class templates on demand during lookup.
pub trait TemplateInstantiator {
    fn instantiate_class_template(
        &mut self,
        ts: &mut TypeSystem,
        template: TemplateId,
        args: &[TemplateArgValue],
    ) -> Result<ClassId, LookupError>;
}

/// An instantiator for contexts where user templates cannot occur.
pub struct NoUserTemplates;

impl TemplateInstantiator for NoUserTemplates {
    fn instantiate_class_template(
        &mut self,
        _ts: &mut TypeSystem,
        _template: TemplateId,
        _args: &[TemplateArgValue],
    ) -> Result<ClassId, LookupError> {
        Err(LookupError::InvalidTemplateArgument)
    }
}

/// Scope target of a qualified-name prefix.
#[derive(Copy, Clone, Debug)]
pub enum ScopeTarget {
    Namespace(NamespaceId),
    Class(ClassId),
    Enum(EnumId),
}

/// Lookup context.
pub struct Lookup<'a> {
    pub scopes: &'a ScopeStack,
    pub ts: &'a mut TypeSystem,
    pub arena: &'a AstArena,
    pub interner: &'a StringInterner,
    pub instantiator: &'a mut dyn TemplateInstantiator,
}

impl<'a> Lookup<'a> {
    /// Resolve an identifier in `scope`.
    pub fn resolve(
        &mut self,
        ident: script_ir::IdentId,
        scope: Scope,
    ) -> Result<NameLookup, LookupError> {
        match &self.arena.ident(ident).kind {
            IdentKind::Simple(name) => {
                if let Some(ty) = self.builtin_type(*name) {
                    return Ok(NameLookup::Type(ty));
                }
                Ok(self.resolve_unqualified(*name, scope))
            }
            IdentKind::Operator(op) => {
                let functions = self.scope_chain_operators(*op, scope);
                Ok(NameLookup::Functions {
                    functions,
                    templates: Vec::new(),
                })
            }
            IdentKind::LiteralOperator(suffix) => {
                let functions = self.literal_operators(*suffix, scope);
                Ok(NameLookup::Functions {
                    functions,
                    templates: Vec::new(),
                })
            }
            IdentKind::Template { name, args } => {
                let args = args.clone();
                self.resolve_template_id(*name, &args, scope)
            }
            IdentKind::Scoped { lhs, rhs } => {
                let (lhs, rhs) = (*lhs, *rhs);
                let Some(target) = self.resolve_scope_unqualified(lhs, scope)? else {
                    return Err(LookupError::NotAScope);
                };
                self.qualified(rhs, target, scope)
            }
        }
    }

    /// Built-in type names short-circuit before any symbol search.
    fn builtin_type(&self, name: Name) -> Option<Type> {
        let text = self.interner.resolve(name);
        let ty = match text {
            "void" => Type::VOID,
            "bool" => Type::BOOLEAN,
            "char" => Type::CHAR,
            "int" => Type::INT,
            "float" => Type::FLOAT,
            "double" => Type::DOUBLE,
            "auto" => Type::AUTO,
            "String" => Type::STRING,
            _ => return None,
        };
        Some(ty)
    }

    /// Unqualified lookup: search each scope node, innermost first; the
    /// first node producing a classification wins.
    pub fn resolve_unqualified(&mut self, name: Name, scope: Scope) -> NameLookup {
        let mut current = Some(scope);
        while let Some(s) = current {
            let kind = self.scopes.kind(s).clone();
            let found = self.lookup_in_kind(&kind, name);
            if !matches!(found, NameLookup::Unknown) {
                return found;
            }
            current = self.scopes.parent(s);
        }
        NameLookup::Unknown
    }

    fn lookup_in_kind(&mut self, kind: &ScopeKind, name: Name) -> NameLookup {
        match kind {
            ScopeKind::Namespace(ns) => self.lookup_in_namespace(*ns, name),
            ScopeKind::Class(class) => self.member(name, *class),
            ScopeKind::Enum(en) => match self.ts.enum_(*en).value(name) {
                Some(v) => NameLookup::Enumerator(*en, v),
                None => NameLookup::Unknown,
            },
            ScopeKind::TemplateArgs(bindings) => bindings
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| NameLookup::TemplateParameter(v.clone()))
                .unwrap_or(NameLookup::Unknown),
        }
    }

    fn lookup_in_namespace(&mut self, ns: NamespaceId, name: Name) -> NameLookup {
        let def = self.ts.namespace(ns);

        if let Some(functions) = def.functions.get(&name) {
            let functions = functions.clone();
            let templates = self.templates_named(ns, name, false);
            return NameLookup::Functions {
                functions,
                templates,
            };
        }
        if let Some(&class) = def.classes.get(&name) {
            return NameLookup::Type(self.ts.class(class).ty);
        }
        if let Some(&en) = def.enums.get(&name) {
            return NameLookup::Type(self.ts.enum_(en).ty);
        }
        if let Some(&ty) = def.typedefs.get(&name) {
            return NameLookup::Type(ty);
        }
        if let Some(var) = def.variables.get(&name) {
            return NameLookup::GlobalVariable(var.index, var.ty);
        }
        if let Some(&child) = def.namespaces.get(&name) {
            return NameLookup::Namespace(child);
        }
        if let Some(&alias) = def.aliases.get(&name) {
            return NameLookup::Namespace(alias);
        }

        // Enumerators of unscoped enums are visible in the enclosing
        // namespace.
        let enum_ids: Vec<EnumId> = def.enums.values().copied().collect();
        for en in enum_ids {
            let e = self.ts.enum_(en);
            if !e.is_enum_class {
                if let Some(v) = e.value(name) {
                    return NameLookup::Enumerator(en, v);
                }
            }
        }

        let templates = self.templates_named(ns, name, true);
        if let Some(&first) = templates.first() {
            return NameLookup::Template(first);
        }

        // `using namespace b;` directives widen the search.
        let directives = self.ts.namespace(ns).using_directives.clone();
        for used in directives {
            let found = self.lookup_in_namespace(used, name);
            if !matches!(found, NameLookup::Unknown) {
                return found;
            }
        }

        NameLookup::Unknown
    }

    fn templates_named(&self, ns: NamespaceId, name: Name, class_templates: bool) -> Vec<TemplateId> {
        self.ts
            .namespace(ns)
            .templates
            .iter()
            .copied()
            .filter(|&t| {
                let def = self.ts.template(t);
                def.name == name && (class_templates || !def.is_class_template())
            })
            .collect()
    }

    /// Member lookup: walk the class, then each base, collecting member
    /// functions until a data member is found at some depth, which stops
    /// the traversal.
    pub fn member(&mut self, name: Name, class: ClassId) -> NameLookup {
        let mut functions = Vec::new();
        let mut current = Some(class);

        while let Some(id) = current {
            let def = self.ts.class(id);

            for &f in &def.methods {
                if self.ts.function(f).name() == Some(name) {
                    functions.push(f);
                }
            }

            if let Some(local) = def.data_member_index(name) {
                if functions.is_empty() {
                    let def = self.ts.class(id);
                    return NameLookup::DataMember(def.attributes_offset + local);
                }
                break;
            }

            if self.ts.class(id).static_member(name).is_some() && functions.is_empty() {
                return NameLookup::StaticDataMember(id, name);
            }

            if !functions.is_empty() {
                break;
            }

            current = self.ts.class(id).parent;
        }

        if functions.is_empty() {
            NameLookup::Unknown
        } else {
            NameLookup::Functions {
                functions,
                templates: Vec::new(),
            }
        }
    }

    /// Lookup in a resolved scope, without parent traversal.
    pub fn qualified(
        &mut self,
        ident: script_ir::IdentId,
        target: ScopeTarget,
        instantiation_scope: Scope,
    ) -> Result<NameLookup, LookupError> {
        match &self.arena.ident(ident).kind {
            IdentKind::Simple(name) => Ok(match target {
                ScopeTarget::Namespace(ns) => self.lookup_in_namespace(ns, *name),
                ScopeTarget::Class(class) => self.member(*name, class),
                ScopeTarget::Enum(en) => match self.ts.enum_(en).value(*name) {
                    Some(v) => NameLookup::Enumerator(en, v),
                    None => NameLookup::Unknown,
                },
            }),
            IdentKind::Operator(op) => {
                let functions = match target {
                    ScopeTarget::Namespace(ns) => self.namespace_operators(ns, *op),
                    ScopeTarget::Class(class) => self.class_operators(class, *op),
                    ScopeTarget::Enum(_) => Vec::new(),
                };
                Ok(NameLookup::Functions {
                    functions,
                    templates: Vec::new(),
                })
            }
            IdentKind::Template { name, args } => {
                let args = args.clone();
                let ns = match target {
                    ScopeTarget::Namespace(ns) => ns,
                    _ => return Err(LookupError::NotAScope),
                };
                let Some(template) = self.find_template(ns, *name, false) else {
                    return Ok(NameLookup::Unknown);
                };
                let class = self.instantiate(template, &args, instantiation_scope)?;
                Ok(NameLookup::Type(self.ts.class(class).ty))
            }
            IdentKind::Scoped { lhs, rhs } => {
                let (lhs, rhs) = (*lhs, *rhs);
                let Some(inner) = self.resolve_scope_qualified(lhs, target)? else {
                    return Err(LookupError::NotAScope);
                };
                self.qualified(rhs, inner, instantiation_scope)
            }
            IdentKind::LiteralOperator(_) => Ok(NameLookup::Unknown),
        }
    }

    // === Scope resolution for qualified names ===

    /// Resolve the head of a qualified name to a scope, ascending.
    pub fn resolve_scope_unqualified(
        &mut self,
        ident: script_ir::IdentId,
        scope: Scope,
    ) -> Result<Option<ScopeTarget>, LookupError> {
        match &self.arena.ident(ident).kind {
            IdentKind::Simple(name) => {
                let name = *name;
                let mut current = Some(scope);
                while let Some(s) = current {
                    if let ScopeKind::Namespace(ns) = self.scopes.kind(s) {
                        if let Some(target) = self.child_scope(*ns, name) {
                            return Ok(Some(target));
                        }
                    }
                    current = self.scopes.parent(s);
                }
                Ok(None)
            }
            IdentKind::Template { name, args } => {
                let (name, args) = (*name, args.clone());
                let ns = self.scopes.enclosing_namespace(scope);
                let Some(template) = self.find_template_ascending(ns, name) else {
                    return Ok(None);
                };
                let class = self.instantiate(template, &args, scope)?;
                Ok(Some(ScopeTarget::Class(class)))
            }
            IdentKind::Scoped { lhs, rhs } => {
                let (lhs, rhs) = (*lhs, *rhs);
                match self.resolve_scope_unqualified(lhs, scope)? {
                    Some(target) => self.resolve_scope_qualified(rhs, target),
                    None => Ok(None),
                }
            }
            _ => Err(LookupError::NotAScope),
        }
    }

    fn resolve_scope_qualified(
        &mut self,
        ident: script_ir::IdentId,
        target: ScopeTarget,
    ) -> Result<Option<ScopeTarget>, LookupError> {
        match &self.arena.ident(ident).kind {
            IdentKind::Simple(name) => match target {
                ScopeTarget::Namespace(ns) => Ok(self.child_scope(ns, *name)),
                _ => Ok(None),
            },
            IdentKind::Template { name, args } => {
                let (name, args) = (*name, args.clone());
                let ScopeTarget::Namespace(ns) = target else {
                    return Ok(None);
                };
                let Some(template) = self.find_template(ns, name, false) else {
                    return Ok(None);
                };
                let class = self.instantiate(template, &args, self.scopes.root())?;
                Ok(Some(ScopeTarget::Class(class)))
            }
            _ => Err(LookupError::NotAScope),
        }
    }

    fn child_scope(&self, ns: NamespaceId, name: Name) -> Option<ScopeTarget> {
        let def = self.ts.namespace(ns);
        if let Some(&child) = def.namespaces.get(&name) {
            return Some(ScopeTarget::Namespace(child));
        }
        if let Some(&alias) = def.aliases.get(&name) {
            return Some(ScopeTarget::Namespace(alias));
        }
        if let Some(&class) = def.classes.get(&name) {
            return Some(ScopeTarget::Class(class));
        }
        if let Some(&en) = def.enums.get(&name) {
            return Some(ScopeTarget::Enum(en));
        }
        None
    }

    // === Templates ===

    fn find_template(&self, ns: NamespaceId, name: Name, ascend: bool) -> Option<TemplateId> {
        let mut current = Some(ns);
        while let Some(id) = current {
            let hit = self
                .ts
                .namespace(id)
                .templates
                .iter()
                .copied()
                .find(|&t| self.ts.template(t).name == name);
            if hit.is_some() {
                return hit;
            }
            if !ascend {
                return None;
            }
            current = self.ts.namespace(id).parent;
        }
        None
    }

    fn find_template_ascending(&self, ns: NamespaceId, name: Name) -> Option<TemplateId> {
        self.find_template(ns, name, true)
    }

    fn resolve_template_id(
        &mut self,
        name: Name,
        args: &[TemplateArg],
        scope: Scope,
    ) -> Result<NameLookup, LookupError> {
        let ns = self.scopes.enclosing_namespace(scope);
        let Some(template) = self.find_template_ascending(ns, name) else {
            return Ok(NameLookup::Unknown);
        };

        if !self.ts.template(template).is_class_template() {
            return Ok(NameLookup::Template(template));
        }

        let class = self.instantiate(template, args, scope)?;
        Ok(NameLookup::Type(self.ts.class(class).ty))
    }

    /// Instantiate a class template, using the canonical cache.
    pub fn instantiate(
        &mut self,
        template: TemplateId,
        args: &[TemplateArg],
        scope: Scope,
    ) -> Result<ClassId, LookupError> {
        let values = self.resolve_template_args(template, args, scope)?;
        self.instantiate_with_values(template, &values)
    }

    /// Instantiate with already-resolved argument values.
    pub fn instantiate_with_values(
        &mut self,
        template: TemplateId,
        values: &[TemplateArgValue],
    ) -> Result<ClassId, LookupError> {
        if let Some(instance) = self.ts.template(template).cached(values) {
            return match instance {
                TemplateInstance::Class(id) => Ok(id),
                TemplateInstance::Function(_) => Err(LookupError::InvalidTemplateArgument),
            };
        }

        let class = match self.ts.template(template).kind {
            TemplateKind::BuiltinArray => {
                let [TemplateArgValue::Type(element)] = values else {
                    return Err(LookupError::InvalidTemplateArgument);
                };
                instantiate_array(self.ts, *element, self.interner)
            }
            TemplateKind::Class { .. } => {
                self.instantiator
                    .instantiate_class_template(self.ts, template, values)?
            }
            TemplateKind::Function { .. } => return Err(LookupError::InvalidTemplateArgument),
        };

        self.ts
            .template_mut(template)
            .instances
            .insert(values.to_vec(), TemplateInstance::Class(class));
        Ok(class)
    }

    /// Resolve written template arguments against the parameter list,
    /// filling defaults.
    pub fn resolve_template_args(
        &mut self,
        template: TemplateId,
        args: &[TemplateArg],
        scope: Scope,
    ) -> Result<Vec<TemplateArgValue>, LookupError> {
        let params = self.ts.template(template).params.clone();
        let mut values = Vec::with_capacity(params.len());

        for (i, param) in params.iter().enumerate() {
            let value = match args.get(i) {
                Some(TemplateArg::Type(qt)) => {
                    let qt = qt.clone();
                    TemplateArgValue::Type(
                        self.resolve_qual_type(&qt, scope)
                            .map_err(|_| LookupError::InvalidTemplateArgument)?,
                    )
                }
                Some(TemplateArg::Expr(expr)) => self.const_eval_template_arg(*expr, scope)?,
                None => match &param.default_value {
                    Some(v) => v.clone(),
                    None => return Err(LookupError::MissingTemplateArgument),
                },
            };

            // Kind check.
            let ok = matches!(
                (&value, param.kind),
                (TemplateArgValue::Type(_), script_ir::ast::TemplateParamKind::Type)
                    | (TemplateArgValue::Int(_), script_ir::ast::TemplateParamKind::Int)
                    | (TemplateArgValue::Bool(_), script_ir::ast::TemplateParamKind::Bool)
            );
            if !ok {
                return Err(LookupError::InvalidTemplateArgument);
            }
            values.push(value);
        }

        Ok(values)
    }

    /// Constant evaluation of template-argument expressions: literals,
    /// unary minus, and bound template parameters.
    fn const_eval_template_arg(
        &mut self,
        expr: ExprId,
        scope: Scope,
    ) -> Result<TemplateArgValue, LookupError> {
        use script_ir::ast::ExprKind;
        match &self.arena.expr(expr).kind {
            ExprKind::Int(v) => Ok(TemplateArgValue::Int(*v)),
            ExprKind::Bool(v) => Ok(TemplateArgValue::Bool(*v)),
            ExprKind::Unary { op, arg } => {
                if *op != OperatorId::UnaryMinus {
                    return Err(LookupError::InvalidTemplateArgument);
                }
                match self.const_eval_template_arg(*arg, scope)? {
                    TemplateArgValue::Int(v) => Ok(TemplateArgValue::Int(-v)),
                    _ => Err(LookupError::InvalidTemplateArgument),
                }
            }
            ExprKind::Ident(id) => match self.resolve(*id, scope) {
                Ok(NameLookup::TemplateParameter(v)) => Ok(v),
                Ok(NameLookup::Type(t)) => Ok(TemplateArgValue::Type(t)),
                Ok(NameLookup::Enumerator(_, v)) => Ok(TemplateArgValue::Int(v as i64)),
                _ => Err(LookupError::InvalidTemplateArgument),
            },
            _ => Err(LookupError::InvalidTemplateArgument),
        }
    }

    // === Types ===

    /// Resolve a parsed type to a `Type` handle.
    pub fn resolve_qual_type(&mut self, qt: &QualType, scope: Scope) -> Result<Type, LookupError> {
        let mut ty = if let Some(sig) = &qt.signature {
            let ret = self.resolve_qual_type(&sig.return_type, scope)?;
            let params = sig
                .params
                .iter()
                .map(|p| self.resolve_qual_type(p, scope))
                .collect::<Result<Vec<_>, _>>()?;
            self.ts.function_type(Prototype::new(ret, params))
        } else {
            let ident = qt.ident.ok_or(LookupError::NotAScope)?;
            match self.resolve(ident, scope)? {
                NameLookup::Type(t) => t,
                NameLookup::TemplateParameter(TemplateArgValue::Type(t)) => t,
                _ => {
                    let name = self.arena.ident(ident).name().unwrap_or(Name::EMPTY);
                    return Err(LookupError::UnknownType(name));
                }
            }
        };

        if qt.is_const {
            ty = ty.with_const();
        }
        match qt.ref_kind {
            RefKind::None => {}
            RefKind::Ref => ty = ty.with_flag(TypeFlags::REF),
            RefKind::RefRef => ty = ty.with_flag(TypeFlags::RVALUE_REF),
        }
        Ok(ty)
    }

    // === Operators ===

    /// Operators visible from the scope chain: the first scope with any
    /// candidate wins.
    fn scope_chain_operators(&self, op: OperatorId, scope: Scope) -> Vec<FunctionId> {
        let mut current = Some(scope);
        while let Some(s) = current {
            let found = match self.scopes.kind(s) {
                ScopeKind::Namespace(ns) => self.namespace_operators(*ns, op),
                ScopeKind::Class(class) => self.class_operators(*class, op),
                _ => Vec::new(),
            };
            if !found.is_empty() {
                return found;
            }
            current = self.scopes.parent(s);
        }
        Vec::new()
    }

    fn namespace_operators(&self, ns: NamespaceId, op: OperatorId) -> Vec<FunctionId> {
        self.ts
            .namespace(ns)
            .operators
            .iter()
            .copied()
            .filter(|&f| self.ts.function(f).operator_id() == Some(op))
            .collect()
    }

    fn class_operators(&self, class: ClassId, op: OperatorId) -> Vec<FunctionId> {
        self.ts
            .class(class)
            .operators
            .iter()
            .copied()
            .filter(|&f| self.ts.function(f).operator_id() == Some(op))
            .collect()
    }

    /// Full operator candidate set: the scope chain, plus the operand
    /// types' classes (walking their bases) and enclosing namespaces.
    pub fn resolve_operator(
        &mut self,
        op: OperatorId,
        operand_types: &[Type],
        scope: Scope,
    ) -> Vec<FunctionId> {
        let mut result = self.scope_chain_operators(op, scope);
        for &ty in operand_types {
            self.type_operators(op, ty, &mut result);
        }
        result
    }

    fn type_operators(&mut self, op: OperatorId, ty: Type, out: &mut Vec<FunctionId>) {
        if ty.is_function() {
            if op == OperatorId::Assignment {
                out.push(self.ts.function_assignment(ty));
            }
            return;
        }
        if ty.is_closure() {
            if op == OperatorId::FunctionCall {
                if let Some(def) = self.ts.closure_of(ty) {
                    if let Some(f) = def.call_operator {
                        out.push(f);
                    }
                }
            }
            return;
        }
        if ty.is_enum() {
            if op == OperatorId::Assignment {
                if let Some(en) = self.ts.enum_of(ty) {
                    if let Some(f) = self.ts.enum_(en).assignment {
                        out.push(f);
                    }
                }
            }
            return;
        }

        if let Some(class) = self.ts.class_of(ty) {
            let mut current = Some(class);
            while let Some(id) = current {
                out.extend(self.class_operators(id, op));
                let ns = self.ts.class(id).enclosing_namespace;
                out.extend(self.namespace_operators(ns, op));
                current = self.ts.class(id).parent;
            }
        } else {
            let ns = self.ts.enclosing_namespace(ty);
            out.extend(self.namespace_operators(ns, op));
        }
    }

    /// Literal operators with `suffix`: the nearest enclosing scope that
    /// has any wins; overload resolution then runs within that set.
    pub fn literal_operators(&self, suffix: Name, scope: Scope) -> Vec<FunctionId> {
        let mut current = Some(scope);
        while let Some(s) = current {
            if let ScopeKind::Namespace(ns) = self.scopes.kind(s) {
                let found: Vec<FunctionId> = self
                    .ts
                    .namespace(*ns)
                    .literal_operators
                    .iter()
                    .copied()
                    .filter(|&f| {
                        matches!(
                            &self.ts.function(f).variant,
                            crate::function::FunctionVariant::LiteralOperator { suffix: s2 } if *s2 == suffix
                        )
                    })
                    .collect();
                if !found.is_empty() {
                    return found;
                }
            }
            current = self.scopes.parent(s);
        }
        Vec::new()
    }

    /// Call operators of a functor type: the class chain's `operator()`s
    /// or the closure's generated one.
    pub fn call_operators(&mut self, functor_ty: Type) -> Vec<FunctionId> {
        if functor_ty.is_closure() {
            return self
                .ts
                .closure_of(functor_ty)
                .and_then(|c| c.call_operator)
                .into_iter()
                .collect();
        }

        let mut current = self.ts.class_of(functor_ty);
        while let Some(id) = current {
            let ops = self.class_operators(id, OperatorId::FunctionCall);
            if !ops.is_empty() {
                return ops;
            }
            current = self.ts.class(id).parent;
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests;

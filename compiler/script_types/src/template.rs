//! Templates and their instantiation cache.

use rustc_hash::FxHashMap;

use script_ir::ast::TemplateParamKind;
use script_ir::{ClassId, DeclId, FunctionId, Name, NamespaceId, Type};

/// A concrete template argument.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TemplateArgValue {
    Type(Type),
    Int(i64),
    Bool(bool),
}

/// A template parameter with its optional default.
#[derive(Clone, Debug)]
pub struct TemplateParamDef {
    pub kind: TemplateParamKind,
    pub name: Name,
    pub default_value: Option<TemplateArgValue>,
}

/// What a template instantiates into.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum TemplateInstance {
    Class(ClassId),
    Function(FunctionId),
}

/// Template body: a user declaration in the AST, or the built-in
/// `Array<T>` whose members are installed natively.
#[derive(Copy, Clone, Debug)]
pub enum TemplateKind {
    Class { decl: DeclId },
    Function { decl: DeclId },
    BuiltinArray,
}

/// A class or function template.
///
/// Invariant: two instantiations with structurally equal argument
/// vectors return the same instance (the cache is canonical).
#[derive(Debug)]
pub struct TemplateDef {
    pub name: Name,
    pub params: Vec<TemplateParamDef>,
    pub kind: TemplateKind,
    pub enclosing_namespace: NamespaceId,
    pub instances: FxHashMap<Vec<TemplateArgValue>, TemplateInstance>,
}

impl TemplateDef {
    pub fn new(
        name: Name,
        params: Vec<TemplateParamDef>,
        kind: TemplateKind,
        enclosing_namespace: NamespaceId,
    ) -> Self {
        TemplateDef {
            name,
            params,
            kind,
            enclosing_namespace,
            instances: FxHashMap::default(),
        }
    }

    pub fn is_class_template(&self) -> bool {
        matches!(
            self.kind,
            TemplateKind::Class { .. } | TemplateKind::BuiltinArray
        )
    }

    pub fn cached(&self, args: &[TemplateArgValue]) -> Option<TemplateInstance> {
        self.instances.get(args).copied()
    }
}

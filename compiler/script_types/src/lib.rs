//! Type system and symbol tables for the libscript front end.
//!
//! A [`TypeSystem`] owns every symbol of an engine: the type table,
//! classes, enums, namespaces, functions, templates and closure types.
//! Symbols reference each other through ids; back-links (function to
//! enclosing class, class to enclosing namespace) are ids too, so the
//! graph stays cycle-free and serializable.
//!
//! Name lookup ([`lookup`]) classifies an identifier relative to a
//! [`Scope`] chain. Scopes are lightweight values; qualified lookup
//! (`a::b::x`) resolves the qualifier to a scope and then searches it
//! with ascent disabled, as a pure function.

mod array;
mod builtins;
mod class;
mod enum_;
mod function;
pub mod lookup;
mod namespace;
mod prototype;
mod scope;
mod template;
mod type_system;

pub use class::{ClassDef, DataMember, StaticDataMember};
pub use enum_::EnumDef;
pub use function::{FunctionDef, FunctionFlags, FunctionSource, FunctionVariant, NativeTag};
pub use lookup::{
    Lookup, LookupError, NameLookup, NoUserTemplates, ScopeTarget, TemplateInstantiator,
};
pub use array::instantiate_array;
pub use builtins::register_builtins;
pub use namespace::{GlobalVariable, NamespaceDef};
pub use prototype::Prototype;
pub use scope::{Scope, ScopeKind, ScopeStack, SymbolRef};
pub use template::{TemplateArgValue, TemplateDef, TemplateInstance, TemplateKind, TemplateParamDef};
pub use type_system::{CaptureDef, ClosureDef, TypeSystem};

pub use script_ir::ast::AccessSpecifier;

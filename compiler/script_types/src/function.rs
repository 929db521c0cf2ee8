//! Function symbols.

use bitflags::bitflags;

use script_ir::ast::{AccessSpecifier, OperatorId};
use script_ir::program::CompiledBody;
use script_ir::{ClassId, DeclId, ExprId, Name, NamespaceId};

use crate::prototype::Prototype;
use crate::scope::SymbolRef;
use crate::template::TemplateArgValue;

bitflags! {
    /// Specifier and state bits of a function symbol.
    #[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
    pub struct FunctionFlags: u16 {
        const STATIC = 1 << 0;
        const EXPLICIT = 1 << 1;
        const VIRTUAL = 1 << 2;
        const PURE = 1 << 3;
        const CONSTEXPR = 1 << 4;
        const DEFAULTED = 1 << 5;
        const DELETED = 1 << 6;
        /// Implemented by the host, not by a compiled body (`Array<T>`
        /// members, enum assignment, closure call operators).
        const NATIVE = 1 << 7;
        const PROTECTED = 1 << 8;
        const PRIVATE = 1 << 9;
    }
}

impl FunctionFlags {
    pub fn access(self) -> AccessSpecifier {
        if self.contains(FunctionFlags::PRIVATE) {
            AccessSpecifier::Private
        } else if self.contains(FunctionFlags::PROTECTED) {
            AccessSpecifier::Protected
        } else {
            AccessSpecifier::Public
        }
    }

    pub fn with_access(mut self, access: AccessSpecifier) -> Self {
        self.remove(FunctionFlags::PROTECTED | FunctionFlags::PRIVATE);
        match access {
            AccessSpecifier::Public => {}
            AccessSpecifier::Protected => self.insert(FunctionFlags::PROTECTED),
            AccessSpecifier::Private => self.insert(FunctionFlags::PRIVATE),
        }
        self
    }
}

/// Which native operation a [`FunctionFlags::NATIVE`] function performs.
///
/// The interpreter dispatches on this tag; the front end only needs it to
/// exist so the emitted program tree stays meaningful.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum NativeTag {
    ArrayDefaultCtor,
    ArrayCopyCtor,
    ArraySizeCtor,
    ArrayDtor,
    ArraySize,
    ArrayResize,
    ArrayAssign,
    ArraySubscript,
    ArraySubscriptConst,
    EnumAssign,
    ClosureCall,
    FunctionAssign,
    /// Built-in operator on fundamental types; the prototype carries the
    /// operand types and the variant the operator id.
    BuiltinOperator,
    StringDefaultCtor,
    StringCopyCtor,
    StringDtor,
    StringAssign,
    StringConcat,
    StringCompare,
}

/// The function variants.
#[derive(Clone, Debug)]
pub enum FunctionVariant {
    /// Free or member function with a plain name.
    Regular { name: Name },
    Constructor,
    Destructor,
    Operator { op: OperatorId },
    /// Conversion operator; the target is the prototype's return type.
    Cast,
    /// `operator"" _suffix`.
    LiteralOperator { suffix: Name },
}

/// Where a script function's body comes from, for deferred compilation.
///
/// The scope chain is reconstructed from these fields: root namespace up
/// to `namespace`, then bound template arguments, then the class.
#[derive(Clone, Debug)]
pub struct FunctionSource {
    pub decl: DeclId,
    pub namespace: NamespaceId,
    pub member_of: Option<ClassId>,
    pub template_args: Vec<(Name, TemplateArgValue)>,
}

/// A function symbol: variant, flags, prototype, owner, body.
#[derive(Debug)]
pub struct FunctionDef {
    pub variant: FunctionVariant,
    pub flags: FunctionFlags,
    pub prototype: Prototype,
    /// Enclosing class or namespace.
    pub enclosing: SymbolRef,
    /// Default argument expressions (AST), rightmost parameters first
    /// count; `defaults.len()` parameters at the end are optional.
    pub default_args: Vec<ExprId>,
    /// Compiled body; `None` until the body compiles, or for native /
    /// deleted / pure functions.
    pub body: Option<CompiledBody>,
    /// Set for NATIVE functions.
    pub native: Option<NativeTag>,
    /// Set for script functions whose body is compiled from the AST.
    pub source: Option<FunctionSource>,
}

impl FunctionDef {
    pub fn name(&self) -> Option<Name> {
        match &self.variant {
            FunctionVariant::Regular { name } => Some(*name),
            _ => None,
        }
    }

    pub fn is_constructor(&self) -> bool {
        matches!(self.variant, FunctionVariant::Constructor)
    }

    pub fn is_destructor(&self) -> bool {
        matches!(self.variant, FunctionVariant::Destructor)
    }

    pub fn is_cast(&self) -> bool {
        matches!(self.variant, FunctionVariant::Cast)
    }

    pub fn operator_id(&self) -> Option<OperatorId> {
        match &self.variant {
            FunctionVariant::Operator { op } => Some(*op),
            _ => None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.flags.contains(FunctionFlags::DELETED)
    }

    pub fn is_virtual(&self) -> bool {
        self.flags.contains(FunctionFlags::VIRTUAL)
    }

    pub fn is_static(&self) -> bool {
        self.flags.contains(FunctionFlags::STATIC)
    }

    pub fn is_explicit(&self) -> bool {
        self.flags.contains(FunctionFlags::EXPLICIT)
    }

    pub fn has_implicit_object(&self) -> bool {
        self.prototype.has_implicit_object()
    }

    /// Enclosing class for member functions.
    pub fn member_of(&self) -> Option<ClassId> {
        match self.enclosing {
            SymbolRef::Class(id) => Some(id),
            SymbolRef::Namespace(_) => None,
        }
    }
}

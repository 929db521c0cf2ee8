//! Index newtypes linking the AST, symbol tables and program trees.
//!
//! Every cross-arena reference in the front end is one of these 32-bit
//! handles. Back-links (e.g. a function to its enclosing class) are ids
//! too, which keeps the symbol graph cycle-free.

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn from_raw(raw: u32) -> Self {
                $name(raw)
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

define_id!(
    /// Expression node in an [`AstArena`](crate::AstArena).
    ExprId
);
define_id!(
    /// Statement node in an [`AstArena`](crate::AstArena).
    StmtId
);
define_id!(
    /// Declaration node in an [`AstArena`](crate::AstArena).
    DeclId
);
define_id!(
    /// Class symbol in the engine's symbol tables.
    ClassId
);
define_id!(
    /// Enum symbol.
    EnumId
);
define_id!(
    /// Namespace symbol. Id 0 is the root namespace.
    NamespaceId
);
define_id!(
    /// Function symbol (any variant: regular, ctor, dtor, operator, ...).
    FunctionId
);
define_id!(
    /// Class or function template.
    TemplateId
);
define_id!(
    /// Closure type synthesized for a lambda.
    LambdaId
);
define_id!(
    /// Identifier node in an [`AstArena`](crate::AstArena).
    IdentId
);
define_id!(
    /// Typed expression in a [`ProgramArena`](crate::program::ProgramArena).
    ProgExprId
);
define_id!(
    /// Typed statement in a [`ProgramArena`](crate::program::ProgramArena).
    ProgStmtId
);

impl NamespaceId {
    /// The root namespace, ancestor of every user-visible symbol.
    pub const ROOT: NamespaceId = NamespaceId::from_raw(0);
}

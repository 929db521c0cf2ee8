//! Core data structures shared by every stage of the libscript front end:
//!
//! - [`Span`] and [`SourcePos`] for source locations
//! - [`Name`] and [`StringInterner`] for interned identifiers
//! - [`Token`], [`TokenKind`] and [`TokenList`] for lexer output
//! - The flat AST ([`ast`]) and its arena ([`AstArena`])
//! - The 32-bit [`Type`] handle with its flag bits
//! - The typed program tree ([`program`]) emitted by the compiler
//!
//! # Design
//!
//! - **Intern everything**: identifiers become `Name(u32)`, types become
//!   `Type(u32)`.
//! - **Flatten everything**: AST and program nodes live in contiguous
//!   arenas and reference each other through `u32` index newtypes; no
//!   boxed graphs, no shared ownership between nodes.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
pub mod ast;
mod ids;
mod interner;
mod name;
pub mod program;
mod span;
mod token;
mod ty;

pub use arena::AstArena;
pub use ids::{
    ClassId, DeclId, EnumId, ExprId, FunctionId, IdentId, LambdaId, NamespaceId, ProgExprId,
    ProgStmtId, StmtId, TemplateId,
};
pub use interner::StringInterner;
pub use name::Name;
pub use span::{SourcePos, Span};
pub use token::{Token, TokenKind, TokenList};
pub use ty::{BuiltIn, Type, TypeFlags, TYPE_INDEX_MASK};

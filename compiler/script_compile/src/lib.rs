//! The semantic phase: declaration registration, expression checking,
//! statement compilation and the typed-program-tree emission.
//!
//! The entry point is [`compile`], which takes a parsed module and an
//! engine's [`TypeSystem`] and produces compiled function bodies plus a
//! diagnostic log. Within one function body, the first semantic error
//! aborts that body; sibling declarations keep compiling so one run can
//! report a batch of diagnostics.

pub mod conversion;
mod error;
mod expr;
mod module;
mod overload;
mod stmt;

pub use conversion::{Conversion, ConversionPolicy, ConversionRank, StandardConversion};
pub use error::CompileError;
pub use module::{compile, compile_source, CompileOutput};
pub use overload::{resolve_overloads, viability_status, OverloadResolution, ViabilityStatus};

#[cfg(test)]
mod tests;

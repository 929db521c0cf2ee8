//! Diagnostics for the libscript front end.
//!
//! Every error is an [`ErrorCode`] plus a rendered message and a source
//! position. Codes are stable and grouped by phase:
//! - `E1xxx`: syntax errors (lexer + parser)
//! - `E2xxx`: semantic errors (name lookup, types, overload resolution)
//!
//! Diagnostics are collected per script in a [`DiagnosticQueue`]; the
//! queue sorts them by position and enforces an error limit.

mod diagnostic;
mod error_code;
mod line_map;
pub mod queue;
mod render;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::{ErrorCode, Phase};
pub use line_map::LineMap;
pub use queue::DiagnosticQueue;
pub use render::render;

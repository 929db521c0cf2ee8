//! Parser for the script language.
//!
//! Parsing proceeds inside a stack of *fragments*: bounded views of the
//! token stream whose terminator is known in advance (a matching `)`,
//! `]`, `}`, a `;`, the next top-level comma of a list, or the end of a
//! template argument list). Fragments compose strictly LIFO on the call
//! stack; see [`fragment::Frag`].
//!
//! Statements are dispatched on their leading token. The ambiguous cases
//! (declaration vs expression, lambda vs array literal, constructor vs
//! function call) are resolved by speculative parsing: the cursor is
//! snapshotted, one interpretation is attempted, and on failure the
//! cursor rewinds and the alternative is parsed instead.

mod cursor;
mod error;
pub mod fragment;
mod grammar;

pub use cursor::ParserCursor;
pub use error::{SyntaxError, SyntaxErrorKind};
pub use grammar::{parse, parse_expression, ParseResult};

#[cfg(test)]
mod tests;

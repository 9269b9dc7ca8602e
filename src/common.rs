//! Contains common types that are shared by the lexer, the parser and the
//! passes that consume the parse tree.

pub mod diagnostics;
pub mod expr;
pub mod span;

//! Lexer, parser and evaluator for a small language of binary expressions:
//! numbers, identifiers, the operators `+ - * / ^ & | %` and parentheses.
//!
//! ```text
//! source --lexer--> tokens --parser--> Expr --rpn/eval--> postfix / value
//! ```

#![warn(clippy::all, clippy::pedantic)]

use thiserror::Error;

pub mod common;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod rpn;

/// Failure of [`parser::parse_source`]: whichever stage gave up first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
	#[error(transparent)]
	Lex(#[from] lexer::LexError),
	#[error(transparent)]
	Parse(#[from] parser::error::ParseError),
}

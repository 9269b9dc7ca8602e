use crate::{
	common::span::{Position, Span},
	lexer::{Punctuation, Token},
};
use derive_more::Display;
use itertools::Itertools;
use std::collections::BTreeSet;
use thiserror::Error;

/// What the parser was looking for when it gave up, grouped by the role the
/// token would have played.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Expected {
	#[display(fmt = "operand")]
	Operand,
	#[display(fmt = "operator")]
	Operator,
	#[display(fmt = "')'")]
	CloseParen,
	#[display(fmt = "end of input")]
	End,
}

impl Expected {
	fn of(token: Option<&Token>) -> Self {
		match token {
			None | Some(Token::EndOfInput) => Self::End,
			Some(Token::Operator(_)) => Self::Operator,
			Some(Token::Punctuation(Punctuation::RParen)) => Self::CloseParen,
			// an opening paren only ever starts a primary
			Some(Token::Number(_) | Token::Identifier(_) | Token::Punctuation(Punctuation::LParen)) => {
				Self::Operand
			}
		}
	}
}

/// The error threaded through the combinators. Alternatives failing at the
/// same token merge their expectations; the public [`ParseError`] is derived
/// from the survivor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
	span: Span,
	expected: BTreeSet<Expected>,
	found: Option<Token>,
}

impl SyntaxError {
	#[must_use]
	pub fn expected(span: Span, expected: Expected, found: Option<Token>) -> Self {
		Self {
			span,
			expected: BTreeSet::from([expected]),
			found,
		}
	}

	#[must_use]
	pub fn span(&self) -> &Span {
		&self.span
	}

	#[must_use]
	pub fn at_end(&self) -> bool {
		matches!(self.found, None | Some(Token::EndOfInput))
	}

	/// `unclosed` tells whether a `(` before this error was never closed.
	/// Running out of input with one open is an unmatched paren whatever was
	/// expected; otherwise a `)` or the end of input being expected means the
	/// enclosing expression was already complete.
	#[must_use]
	pub fn kind(&self, unclosed: bool) -> ParseErrorKind {
		if self.at_end() && unclosed {
			ParseErrorKind::UnmatchedParen
		} else if self.expected.contains(&Expected::End) || self.expected.contains(&Expected::CloseParen) {
			ParseErrorKind::TrailingInput
		} else if self.expected.contains(&Expected::Operator) {
			ParseErrorKind::ExpectedOperator
		} else {
			ParseErrorKind::ExpectedOperand
		}
	}

	/// `opened` is the innermost `(` still open before this error, if any.
	#[must_use]
	pub fn into_parse_error(self, opened: Option<Span>) -> ParseError {
		let kind = self.kind(opened.is_some());
		ParseError {
			kind,
			found: self.found.unwrap_or(Token::EndOfInput),
			expected: self.expected.into_iter().collect(),
			opened: if kind == ParseErrorKind::UnmatchedParen {
				opened
			} else {
				None
			},
			span: self.span,
		}
	}
}

impl chumsky::Error<Token> for SyntaxError {
	type Span = Span;
	type Label = &'static str;

	fn expected_input_found<Iter: IntoIterator<Item = Option<Token>>>(
		span: Self::Span,
		expected: Iter,
		found: Option<Token>,
	) -> Self {
		Self {
			span,
			expected: expected
				.into_iter()
				.map(|x| Expected::of(x.as_ref()))
				.collect(),
			found,
		}
	}

	fn with_label(self, _: Self::Label) -> Self {
		self
	}

	fn merge(mut self, other: Self) -> Self {
		self.expected.extend(other.expected);
		self
	}
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
	#[display(fmt = "expected an operand")]
	ExpectedOperand,
	#[display(fmt = "expected an operator")]
	ExpectedOperator,
	#[display(fmt = "unmatched parenthesis")]
	UnmatchedParen,
	#[display(fmt = "trailing input")]
	TrailingInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}, found {found}")]
pub struct ParseError {
	pub kind: ParseErrorKind,
	/// The offending token, or the empty end-of-input span.
	pub span: Span,
	pub found: Token,
	pub expected: Vec<Expected>,
	pub opened: Option<Span>,
}

impl ParseError {
	#[must_use]
	pub fn position(&self, source: &str) -> Position {
		self.span.position(source)
	}

	#[must_use]
	pub fn expected_list(&self) -> String {
		self.expected.iter().join(", ")
	}
}

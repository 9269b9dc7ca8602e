use self::{
	core::expr::expr,
	error::ParseError,
	precedence::PrecedenceTable,
	types::{CodeStream, Tail},
};
use crate::{
	common::{
		expr::Expr,
		span::{Span, Spanned, SpannedRaw},
	},
	lexer::{self, Punctuation, Token},
	Error,
};
use chumsky::{prelude::*, Stream};
use log::debug;

#[macro_use]
pub mod macros;
pub mod core;
pub mod error;
pub mod precedence;
pub mod types;

/// How bare operator applications may be chained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Chaining {
	/// At most one operator per unparenthesized expression: `a + b + c` is
	/// rejected with trailing input.
	#[default]
	Single,
	/// Any number of operators, grouped by the table.
	Precedence(PrecedenceTable),
}

impl Chaining {
	#[must_use]
	pub fn is_chained(&self) -> bool {
		matches!(self, Self::Precedence(_))
	}

	#[must_use]
	pub fn fold(&self, first: Expr, rest: Tail<Expr>) -> Expr {
		match self {
			Self::Single => rest
				.into_iter()
				.fold(first, |lhs, (op, rhs)| Expr::binary(lhs, op, rhs)),
			Self::Precedence(table) => table.fold(first, rest),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserConfig {
	pub chaining: Chaining,
}

impl ParserConfig {
	#[must_use]
	pub fn chained(table: PrecedenceTable) -> Self {
		Self {
			chaining: Chaining::Precedence(table),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutput {
	pub expr: Spanned<Expr>,
	/// Tokens consumed, not counting the end-of-input marker.
	pub tokens: usize,
}

pub fn parser(config: &ParserConfig) -> token_parser!(Expr) {
	span!(expr(config.chaining.clone())).then_ignore(just(Token::EndOfInput))
}

/// Innermost `(` that is still open when parsing stopped at `at`.
fn unclosed_paren(tokens: &[SpannedRaw<Token>], at: &Span) -> Option<Span> {
	let mut open = Vec::new();
	for (token, span) in tokens.iter().take_while(|(_, span)| span.start < at.start) {
		match token {
			Token::Punctuation(Punctuation::LParen) => open.push(span.clone()),
			Token::Punctuation(Punctuation::RParen) => {
				open.pop();
			}
			_ => {}
		}
	}
	open.pop()
}

/// Parses a whole token sequence as one expression.
///
/// # Errors
/// Fails with the first syntax error; nothing is returned for the tokens
/// that did parse.
pub fn parse(
	mut tokens: Vec<SpannedRaw<Token>>,
	config: &ParserConfig,
) -> Result<ParseOutput, ParseError> {
	let eoi = match tokens.last() {
		Some((Token::EndOfInput, span)) => span.clone(),
		Some((_, span)) => Span {
			file_id: span.file_id,
			start: span.end,
			end: span.end,
		},
		None => Span {
			file_id: 0,
			start: 0,
			end: 0,
		},
	};
	if !matches!(tokens.last(), Some((Token::EndOfInput, _))) {
		tokens.push((Token::EndOfInput, eoi.clone()));
	}
	let consumed = tokens.len() - 1;
	let stream: CodeStream = Stream::from_iter(eoi, tokens.clone().into_iter());

	match parser(config).parse(stream) {
		Ok(expr) => {
			debug!("parsed {consumed} tokens into `{expr}`");
			Ok(ParseOutput {
				expr,
				tokens: consumed,
			})
		}
		Err(errors) => {
			// no recovery is attempted, so the first error is the only one
			let Some(err) = errors.into_iter().next() else {
				unreachable!("a failed parse reports an error");
			};
			let opened = unclosed_paren(&tokens, err.span());
			let err = err.into_parse_error(opened);
			debug!("parse failed: {err} at {}", err.span);
			Err(err)
		}
	}
}

/// Lexes and parses `source` in one go.
///
/// # Errors
/// Either stage's first error.
pub fn parse_source(source: &str, file_id: usize, config: &ParserConfig) -> Result<ParseOutput, Error> {
	let tokens = lexer::lex(source, file_id)?;
	Ok(parse(tokens, config)?)
}

#[cfg(test)]
mod tests {
	use super::{error::ParseErrorKind, precedence::DEFAULT_PRECEDENCE, *};
	use crate::lexer::Operator;

	fn single(code: &str) -> Result<ParseOutput, Error> {
		let _ = env_logger::builder().is_test(true).try_init();
		parse_source(code, 0, &ParserConfig::default())
	}

	fn chained(code: &str) -> Result<ParseOutput, Error> {
		parse_source(code, 0, &ParserConfig::chained(DEFAULT_PRECEDENCE.clone()))
	}

	fn tree(code: &str) -> Expr {
		single(code).unwrap().expr.value
	}

	fn parse_err(result: Result<ParseOutput, Error>) -> ParseError {
		match result {
			Err(Error::Parse(err)) => err,
			other => panic!("expected a parse error, got {other:?}"),
		}
	}

	fn ident(name: &str) -> Expr {
		Expr::Identifier(name.into())
	}

	fn num(text: &str) -> Expr {
		Expr::NumberLiteral(text.into())
	}

	#[test]
	fn number_literal() {
		let out = single("12").unwrap();
		assert_eq!(out.expr.value, num("12"));
		assert_eq!(out.expr.span.range(), 0..2);
		assert_eq!(out.tokens, 1);
	}

	#[test]
	fn identifier() {
		assert_eq!(tree("  abc1 "), ident("abc1"));
	}

	#[test]
	fn bare_binary_op() {
		assert_eq!(
			tree("a+b"),
			Expr::BinaryOp {
				lhs: Box::new(ident("a")),
				op: Operator::Plus,
				rhs: Box::new(ident("b")),
				parenthesized: false,
			}
		);
	}

	#[test]
	fn parenthesized_binary_op() {
		let out = single("(a+b)").unwrap();
		assert_eq!(
			out.expr.value,
			Expr::BinaryOp {
				lhs: Box::new(ident("a")),
				op: Operator::Plus,
				rhs: Box::new(ident("b")),
				parenthesized: true,
			}
		);
		assert_eq!(out.expr.span.range(), 0..5);
		assert_eq!(out.tokens, 5);
	}

	#[test]
	fn every_operator_parses() {
		for op in Operator::ALL {
			let code = format!("x {op} 1");
			assert_eq!(tree(&code), Expr::binary(ident("x"), *op, num("1")));
		}
	}

	#[test]
	fn nested_parens_round_trip() {
		let first = tree("(1*(2+3))");
		assert_eq!(
			first,
			Expr::binary(
				num("1"),
				Operator::Star,
				Expr::binary(num("2"), Operator::Plus, num("3")).parenthesize()
			)
			.parenthesize()
		);
		let printed = first.to_string();
		assert_eq!(printed, "(1 * (2 + 3))");
		assert_eq!(tree(&printed), first);
	}

	#[test]
	fn parenthesized_operands_of_bare_op() {
		assert_eq!(
			tree("(a|b) % (c&d)"),
			Expr::binary(
				Expr::binary(ident("a"), Operator::Pipe, ident("b")).parenthesize(),
				Operator::Percent,
				Expr::binary(ident("c"), Operator::Amp, ident("d")).parenthesize()
			)
		);
	}

	#[test]
	fn missing_right_operand() {
		let err = parse_err(single("a+"));
		assert_eq!(err.kind, ParseErrorKind::ExpectedOperand);
		assert_eq!(err.found, Token::EndOfInput);
		assert_eq!(err.position("a+").offset, 2);
	}

	#[test]
	fn missing_left_operand() {
		let err = parse_err(single("*b"));
		assert_eq!(err.kind, ParseErrorKind::ExpectedOperand);
		assert_eq!(err.span.range(), 0..1);
	}

	#[test]
	fn empty_input_needs_an_operand() {
		assert_eq!(parse_err(single("")).kind, ParseErrorKind::ExpectedOperand);
	}

	#[test]
	fn unclosed_paren() {
		let err = parse_err(single("(a+b"));
		assert_eq!(err.kind, ParseErrorKind::UnmatchedParen);
		assert_eq!(err.span.range(), 4..4);
		assert_eq!(err.opened.map(|x| x.range()), Some(0..1));
	}

	#[test]
	fn unclosed_inner_paren_points_at_inner() {
		let err = parse_err(single("(1 * (2 + 3"));
		assert_eq!(err.kind, ParseErrorKind::UnmatchedParen);
		assert_eq!(err.opened.map(|x| x.range()), Some(5..6));
	}

	#[test]
	fn paren_without_operator() {
		let err = parse_err(single("(a)"));
		assert_eq!(err.kind, ParseErrorKind::ExpectedOperator);
		assert_eq!(err.found, Token::Punctuation(Punctuation::RParen));
		assert_eq!(err.span.range(), 2..3);
	}

	#[test]
	fn two_primaries_are_trailing_input() {
		let err = parse_err(single("1 2"));
		assert_eq!(err.kind, ParseErrorKind::TrailingInput);
		assert_eq!(err.found, Token::Number("2".into()));
		assert_eq!(err.position("1 2").offset, 2);
	}

	#[test]
	fn stray_close_paren_is_trailing_input() {
		let err = parse_err(single("a+b)"));
		assert_eq!(err.kind, ParseErrorKind::TrailingInput);
		assert_eq!(err.span.range(), 3..4);
	}

	#[test]
	fn single_mode_rejects_chains() {
		let err = parse_err(single("a+b+c"));
		assert_eq!(err.kind, ParseErrorKind::TrailingInput);
		assert_eq!(err.span.range(), 3..4);
	}

	#[test]
	fn chain_inside_balanced_parens_is_trailing_input() {
		let err = parse_err(single("(a+b+c)"));
		assert_eq!(err.kind, ParseErrorKind::TrailingInput);
		assert_eq!(err.span.range(), 4..5);
		assert_eq!(err.opened, None);
	}

	#[test]
	fn outer_paren_left_open() {
		let err = parse_err(single("((a+b)"));
		assert_eq!(err.kind, ParseErrorKind::UnmatchedParen);
		assert_eq!(err.span.range(), 6..6);
		assert_eq!(err.opened.map(|x| x.range()), Some(0..1));
	}

	#[test]
	fn open_paren_around_lone_operand() {
		let err = parse_err(single("(b"));
		assert_eq!(err.kind, ParseErrorKind::UnmatchedParen);
		assert_eq!(err.opened.map(|x| x.range()), Some(0..1));

		let err = parse_err(single("a + (b"));
		assert_eq!(err.kind, ParseErrorKind::UnmatchedParen);
		assert_eq!(err.span.range(), 6..6);
		assert_eq!(err.opened.map(|x| x.range()), Some(4..5));
	}

	#[test]
	fn lex_errors_surface_first() {
		assert!(matches!(
			single("a#b"),
			Err(Error::Lex(lexer::LexError::UnrecognizedCharacter { character: '#', .. }))
		));
	}

	#[test]
	fn chained_mode_uses_precedence() {
		let out = chained("a + b * c - d").unwrap();
		assert_eq!(
			out.expr.value,
			Expr::binary(
				Expr::binary(
					ident("a"),
					Operator::Plus,
					Expr::binary(ident("b"), Operator::Star, ident("c"))
				),
				Operator::Minus,
				ident("d")
			)
		);
		assert_eq!(out.tokens, 7);
		let printed = out.expr.value.to_string();
		assert_eq!(chained(&printed).unwrap().expr.value, out.expr.value);
	}

	#[test]
	fn chained_mode_inside_parens() {
		assert_eq!(
			chained("(a | b ^ c) * 2").unwrap().expr.value,
			Expr::binary(
				Expr::binary(
					ident("a"),
					Operator::Pipe,
					Expr::binary(ident("b"), Operator::Caret, ident("c"))
				)
				.parenthesize(),
				Operator::Star,
				num("2")
			)
		);
	}

	#[test]
	fn chained_mode_errors() {
		let err = parse_err(chained("(a + b"));
		assert_eq!(err.kind, ParseErrorKind::UnmatchedParen);
		let err = parse_err(chained("a + b *"));
		assert_eq!(err.kind, ParseErrorKind::ExpectedOperand);
		let err = parse_err(chained("a b"));
		assert_eq!(err.kind, ParseErrorKind::TrailingInput);
	}

	#[test]
	fn custom_table_changes_grouping() {
		let table = PrecedenceTable::flat();
		let out = parse_source("1 + 2 * 3", 0, &ParserConfig::chained(table)).unwrap();
		assert_eq!(
			out.expr.value,
			Expr::binary(
				Expr::binary(num("1"), Operator::Plus, num("2")),
				Operator::Star,
				num("3")
			)
		);
	}

	#[test]
	fn tokens_without_end_marker_are_accepted() {
		let mut tokens = lexer::lex("x % 3", 0).unwrap();
		tokens.pop();
		let out = parse(tokens, &ParserConfig::default()).unwrap();
		assert_eq!(out.expr.value, Expr::binary(ident("x"), Operator::Percent, num("3")));
	}
}

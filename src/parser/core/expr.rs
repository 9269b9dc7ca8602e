use crate::{
	common::expr::Expr,
	lexer::{Operator, Token},
	parser::{
		error::{Expected, SyntaxError},
		types::Tail,
		Chaining,
	},
};
use chumsky::{prelude::*, BoxedParser};

fn operand() -> token_parser_no_span!(Expr) {
	filter_map(|span, token| match token {
		Token::Number(text) => Ok(Expr::NumberLiteral(text)),
		Token::Identifier(name) => Ok(Expr::Identifier(name)),
		found => Err(SyntaxError::expected(span, Expected::Operand, Some(found))),
	})
}

fn operator() -> token_parser_no_span!(Operator) {
	filter_map(|span, token| match token {
		Token::Operator(op) => Ok(op),
		found => Err(SyntaxError::expected(span, Expected::Operator, Some(found))),
	})
}

/// `op primary` pairs. Without chaining at most one pair may follow (exactly
/// one when `required`), with chaining any number (at least one when
/// `required`).
fn tail<'a, P>(primary: P, chained: bool, required: bool) -> BoxedParser<'a, Token, Tail<Expr>, SyntaxError>
where
	P: Parser<Token, Expr, Error = SyntaxError> + 'a,
{
	let pair = operator().then(primary);
	match (chained, required) {
		(true, true) => pair.repeated().at_least(1).boxed(),
		(true, false) => pair.repeated().boxed(),
		(false, true) => pair.map(|pair| vec![pair]).boxed(),
		(false, false) => pair
			.or_not()
			.map(|pair| pair.into_iter().collect::<Tail<Expr>>())
			.boxed(),
	}
}

/// Parses a primary: a number, an identifier, or a parenthesized operator
/// application whose operands are primaries again.
pub fn primary(chaining: Chaining) -> token_parser_no_span!(Expr) {
	recursive(move |primary| {
		let chained = chaining.is_chained();
		let parenthesized = parened!(primary
			.clone()
			.then(tail(primary, chained, true)))
		.map(move |(first, rest)| chaining.fold(first, rest).parenthesize());

		choice((operand(), parenthesized))
	})
}

/// Parses `primary (op primary)*`, folding the chain with the configured
/// precedence. Bare applications are never marked parenthesized.
pub fn expr(chaining: Chaining) -> token_parser_no_span!(Expr) {
	let chained = chaining.is_chained();
	primary(chaining.clone())
		.then(tail(primary(chaining.clone()), chained, false))
		.map(move |(first, rest)| chaining.fold(first, rest))
}

use crate::{
	common::span::Span,
	eval::EvalError,
	lexer::LexError,
	parser::error::{ParseError, ParseErrorKind},
	Error,
};
use codespan_reporting::diagnostic::{Diagnostic, Label};

fn primary(span: &Span) -> Label<usize> {
	Label::primary(span.file_id, span.range())
}

#[must_use]
pub fn lex_error(err: &LexError) -> Diagnostic<usize> {
	match err {
		LexError::UnrecognizedCharacter { character, span } => Diagnostic::error()
			.with_message("could not parse token")
			.with_labels(vec![primary(span).with_message(format!("unrecognized character {character:?}"))]),
	}
}

#[must_use]
pub fn parse_error(err: &ParseError) -> Diagnostic<usize> {
	let mut labels = vec![primary(&err.span).with_message(match err.kind {
		ParseErrorKind::TrailingInput => "nothing may follow a complete expression".to_string(),
		_ => format!("found {}", err.found),
	})];
	if let Some(opened) = &err.opened {
		labels.push(
			Label::secondary(opened.file_id, opened.range()).with_message("opening delimiter here"),
		);
	}
	let mut diagnostic = Diagnostic::error()
		.with_message(err.kind.to_string())
		.with_labels(labels);
	if !err.expected.is_empty() {
		diagnostic = diagnostic.with_notes(vec![format!("expected one of {}", err.expected_list())]);
	}
	diagnostic
}

/// Evaluation errors carry no span, so the whole expression is labelled.
#[must_use]
pub fn eval_error(err: &EvalError, expr_span: &Span) -> Diagnostic<usize> {
	Diagnostic::error()
		.with_message("could not evaluate expression")
		.with_labels(vec![primary(expr_span).with_message(err.to_string())])
}

#[must_use]
pub fn error(err: &Error) -> Diagnostic<usize> {
	match err {
		Error::Lex(err) => lex_error(err),
		Error::Parse(err) => parse_error(err),
	}
}

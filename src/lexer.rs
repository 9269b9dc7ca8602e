use crate::common::span::{Span, SpannedRaw};
use chumsky::Span as _;
use derive_more::Display;
use log::trace;
use logos::{Lexer as LogosLexer, Logos, SpannedIter};
use std::{fmt::Display, iter::FusedIterator};
use thiserror::Error;

fn lex_to_str(lexer: &LogosLexer<'_, Token>) -> String {
	lexer.slice().to_string()
}

macro_rules! tok_venum {
	($vid:ident { $($match:expr => $to:ident,)* }) => {
		#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
		pub enum $vid { $($to,)* }

		impl $vid {
			pub const ALL: &'static [$vid] = &[$(Self::$to,)*];

			#[must_use]
			pub fn symbol(self) -> &'static str {
				match self { $(Self::$to => $match,)* }
			}

			#[must_use]
			pub fn from_symbol(symbol: &str) -> Option<Self> {
				match symbol {
					$($match => Some(Self::$to),)*
					_ => None,
				}
			}
		}

		impl Display for $vid {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				f.write_str(self.symbol())
			}
		}
	}
}

macro_rules! def_token {
	($($vid:ident { $($match:expr => $to:ident,)* })*) => {
		$(tok_venum!{$vid {$($match => $to,)*}})*

		#[derive(Logos, Debug, Display, PartialEq, Eq, Clone, Hash)]
		#[logos(skip r"[ \t\r\n]+")] // whitespace
		pub enum Token {
			/// A maximal run of decimal digits, kept as written.
			#[regex(r"[0-9]+", lex_to_str)]
			Number(String),
			/// A letter followed by any run of letters and digits.
			#[regex(r"[a-zA-Z][a-zA-Z0-9]*", lex_to_str)]
			Identifier(String),
			$(
				$(#[token($match, |_| $vid::$to)])*
				$vid($vid),
			)*
			/// Never produced by logos itself: [`Lexer`] appends it once the
			/// source is exhausted.
			#[display(fmt = "end of input")]
			EndOfInput,
		}
	};
}

def_token!(
	Operator {
		"+" => Plus,
		"-" => Minus,
		"*" => Star,
		"/" => Slash,
		"^" => Caret,
		"&" => Amp,
		"|" => Pipe,
		"%" => Percent,
	}

	Punctuation {
		"(" => LParen,
		")" => RParen,
	}
);

impl Token {
	#[must_use]
	pub fn as_operator(&self) -> Option<Operator> {
		match self {
			Self::Operator(op) => Some(*op),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
	#[error("unrecognized character {character:?}")]
	UnrecognizedCharacter { character: char, span: Span },
}

impl LexError {
	#[must_use]
	pub fn span(&self) -> &Span {
		match self {
			Self::UnrecognizedCharacter { span, .. } => span,
		}
	}
}

/// Lazily turns a source string into tokens. Yields a single
/// [`Token::EndOfInput`] after the last real token and nothing afterwards.
pub struct Lexer<'src> {
	inner: SpannedIter<'src, Token>,
	source: &'src str,
	file_id: usize,
	finished: bool,
}

impl<'src> Lexer<'src> {
	#[must_use]
	pub fn new(source: &'src str, file_id: usize) -> Self {
		Self {
			inner: Token::lexer(source).spanned(),
			source,
			file_id,
			finished: false,
		}
	}
}

impl Iterator for Lexer<'_> {
	type Item = Result<SpannedRaw<Token>, LexError>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.finished {
			return None;
		}
		let item = match self.inner.next() {
			Some((Ok(token), range)) => Ok((token, Span::new(self.file_id, range))),
			Some((Err(()), range)) => {
				// the error range may end inside a multi-byte char
				let character = self
					.source
					.get(range.start..)
					.and_then(|rest| rest.chars().next())
					.unwrap_or(char::REPLACEMENT_CHARACTER);
				Err(LexError::UnrecognizedCharacter {
					character,
					span: Span::new(self.file_id, range),
				})
			}
			None => {
				self.finished = true;
				let end = self.source.len();
				Ok((Token::EndOfInput, Span::new(self.file_id, end..end)))
			}
		};
		match &item {
			Ok((token, span)) => trace!("token {token:?} at {span}"),
			Err(err) => trace!("{err} at {}", err.span()),
		}
		Some(item)
	}
}

impl FusedIterator for Lexer<'_> {}

/// Lexes the whole source, `EndOfInput` included.
///
/// # Errors
/// Fails with the first character that starts no token.
pub fn lex(code: &str, file_id: usize) -> Result<Vec<SpannedRaw<Token>>, LexError> {
	Lexer::new(code, file_id).collect()
}

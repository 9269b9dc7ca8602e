use crate::{
	common::span::SpannedRaw,
	lexer::{Operator, Token},
};
use chumsky::Stream;
use std::vec::IntoIter;

pub type CodeStream<'a> = Stream<'a, Token, crate::common::span::Span, IntoIter<SpannedRaw<Token>>>;

/// The `op primary` pairs that follow the first operand of a chain.
pub type Tail<T> = Vec<(Operator, T)>;

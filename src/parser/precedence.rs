//! Binding levels for chained operator applications.
//!
//! The bare grammar has no precedence, so chaining (`a + b * c`) is only
//! possible once a table says how tightly each operator binds. Higher levels
//! bind tighter and every operator is left-associative.

use crate::{common::expr::Expr, lexer::Operator};
use lazy_static::lazy_static;
use std::collections::HashMap;
use thiserror::Error;

lazy_static! {
	pub static ref DEFAULT_PRECEDENCE: PrecedenceTable = PrecedenceTable::default();
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
	#[error("expected OP=LEVEL, found {0:?}")]
	MalformedOverride(String),
	#[error("unknown operator {0:?}")]
	UnknownOperator(String),
	#[error("invalid precedence level {0:?}")]
	InvalidLevel(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecedenceTable {
	levels: HashMap<Operator, u8>,
}

impl Default for PrecedenceTable {
	fn default() -> Self {
		Self::flat()
			.with(Operator::Pipe, 1)
			.with(Operator::Caret, 2)
			.with(Operator::Amp, 3)
			.with(Operator::Plus, 5)
			.with(Operator::Minus, 5)
			.with(Operator::Star, 6)
			.with(Operator::Slash, 6)
			.with(Operator::Percent, 6)
	}
}

impl PrecedenceTable {
	/// Every operator on the same level, so chains reduce left to right.
	#[must_use]
	pub fn flat() -> Self {
		Self {
			levels: Operator::ALL.iter().map(|op| (*op, 1)).collect(),
		}
	}

	#[must_use]
	pub fn with(mut self, op: Operator, level: u8) -> Self {
		self.levels.insert(op, level);
		self
	}

	#[must_use]
	pub fn level(&self, op: Operator) -> u8 {
		self.levels.get(&op).copied().unwrap_or_default()
	}

	/// Applies an override written as `OP=LEVEL`, e.g. `^=7`.
	///
	/// # Errors
	/// Fails when the text is not of that shape, names no operator, or the
	/// level is not a `u8`.
	pub fn parse_override(self, text: &str) -> Result<Self, ConfigError> {
		let Some((op, level)) = text.split_once('=') else {
			return Err(ConfigError::MalformedOverride(text.to_string()));
		};
		let op = Operator::from_symbol(op.trim())
			.ok_or_else(|| ConfigError::UnknownOperator(op.trim().to_string()))?;
		let level = level
			.trim()
			.parse()
			.map_err(|_| ConfigError::InvalidLevel(level.trim().to_string()))?;
		Ok(self.with(op, level))
	}

	/// Reduces `first (op operand)*` into a tree with an operator stack: an
	/// incoming operator first reduces every stacked operator that binds at
	/// least as tightly.
	#[must_use]
	pub fn fold(&self, first: Expr, rest: Vec<(Operator, Expr)>) -> Expr {
		fn reduce(operands: &mut Vec<Expr>, op: Operator) {
			let (Some(rhs), Some(lhs)) = (operands.pop(), operands.pop()) else {
				unreachable!("operator stack outgrew operand stack");
			};
			operands.push(Expr::binary(lhs, op, rhs));
		}

		let mut operands = vec![first];
		let mut operators: Vec<Operator> = Vec::new();
		for (op, rhs) in rest {
			while let Some(&top) = operators.last() {
				if self.level(top) < self.level(op) {
					break;
				}
				operators.pop();
				reduce(&mut operands, top);
			}
			operators.push(op);
			operands.push(rhs);
		}
		while let Some(op) = operators.pop() {
			reduce(&mut operands, op);
		}
		let Some(tree) = operands.pop() else {
			unreachable!("fold always leaves one operand");
		};
		tree
	}
}

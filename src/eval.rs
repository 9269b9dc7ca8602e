use crate::{common::expr::Expr, lexer::Operator};
use log::debug;
use std::collections::HashMap;
use thiserror::Error;

/// Values for the identifiers an expression may mention.
pub type Bindings = HashMap<String, i64>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
	#[error("number literal {0} does not fit in 64 bits")]
	InvalidNumber(String),
	#[error("'{0}' is not bound to a value")]
	UnboundIdentifier(String),
	#[error("division by zero in '{op}'")]
	DivisionByZero { op: Operator },
	#[error("{lhs} {op} {rhs} overflows")]
	Overflow { op: Operator, lhs: i64, rhs: i64 },
}

impl Operator {
	/// `None` on overflow or a zero divisor.
	#[must_use]
	pub fn apply(self, lhs: i64, rhs: i64) -> Option<i64> {
		match self {
			Self::Plus => lhs.checked_add(rhs),
			Self::Minus => lhs.checked_sub(rhs),
			Self::Star => lhs.checked_mul(rhs),
			Self::Slash => lhs.checked_div(rhs),
			Self::Percent => lhs.checked_rem(rhs),
			Self::Caret => Some(lhs ^ rhs),
			Self::Amp => Some(lhs & rhs),
			Self::Pipe => Some(lhs | rhs),
		}
	}
}

fn eval_inner(expr: &Expr, bindings: &Bindings) -> Result<i64, EvalError> {
	match expr {
		Expr::NumberLiteral(text) => text
			.parse()
			.map_err(|_| EvalError::InvalidNumber(text.clone())),
		Expr::Identifier(name) => bindings
			.get(name)
			.copied()
			.ok_or_else(|| EvalError::UnboundIdentifier(name.clone())),
		Expr::BinaryOp { lhs, op, rhs, .. } => {
			let lhs = eval_inner(lhs, bindings)?;
			let rhs = eval_inner(rhs, bindings)?;
			op.apply(lhs, rhs).ok_or(
				if rhs == 0 && matches!(op, Operator::Slash | Operator::Percent) {
					EvalError::DivisionByZero { op: *op }
				} else {
					EvalError::Overflow { op: *op, lhs, rhs }
				},
			)
		}
	}
}

/// Evaluates the tree with 64-bit signed arithmetic. `^`, `&` and `|` are
/// bitwise.
///
/// # Errors
/// Unbound identifiers, literals too large for `i64`, zero divisors and
/// overflow.
pub fn evaluate(expr: &Expr, bindings: &Bindings) -> Result<i64, EvalError> {
	let result = eval_inner(expr, bindings);
	debug!("evaluated `{expr}` to {result:?}");
	result
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::parser::{parse_source, precedence::DEFAULT_PRECEDENCE, ParserConfig};

	fn eval(code: &str, bindings: &[(&str, i64)]) -> Result<i64, EvalError> {
		let _ = env_logger::builder().is_test(true).try_init();
		let config = ParserConfig::chained(DEFAULT_PRECEDENCE.clone());
		let expr = parse_source(code, 0, &config).unwrap().expr.value;
		let bindings = bindings
			.iter()
			.map(|(name, value)| ((*name).to_string(), *value))
			.collect();
		evaluate(&expr, &bindings)
	}

	#[test]
	fn arithmetic() {
		assert_eq!(eval("(1*(2+3))", &[]), Ok(5));
		assert_eq!(eval("7 / 2", &[]), Ok(3));
		assert_eq!(eval("7 % 4 - 10", &[]), Ok(-7));
		assert_eq!(eval("2 + 3 * 4", &[]), Ok(14));
	}

	#[test]
	fn bitwise() {
		assert_eq!(eval("12 & 10", &[]), Ok(8));
		assert_eq!(eval("12 | 3", &[]), Ok(15));
		assert_eq!(eval("6 ^ 3", &[]), Ok(5));
	}

	#[test]
	fn identifiers_read_bindings() {
		assert_eq!(eval("x * y", &[("x", 6), ("y", 7)]), Ok(42));
		assert_eq!(
			eval("x + z", &[("x", 1)]),
			Err(EvalError::UnboundIdentifier("z".into()))
		);
	}

	#[test]
	fn division_by_zero() {
		assert_eq!(
			eval("1 / (x - x)", &[("x", 3)]),
			Err(EvalError::DivisionByZero { op: Operator::Slash })
		);
		assert_eq!(
			eval("1 % 0", &[]),
			Err(EvalError::DivisionByZero { op: Operator::Percent })
		);
	}

	#[test]
	fn overflow() {
		assert_eq!(
			eval("9223372036854775807 + 1", &[]),
			Err(EvalError::Overflow {
				op: Operator::Plus,
				lhs: i64::MAX,
				rhs: 1
			})
		);
		assert_eq!(
			eval("99999999999999999999", &[]),
			Err(EvalError::InvalidNumber("99999999999999999999".into()))
		);
	}
}

//! Postfix (reverse Polish) form of a parse tree.

use crate::{common::expr::Expr, lexer::Operator};
use derive_more::Display;
use itertools::Itertools;
use thiserror::Error;

#[derive(Debug, Display, Clone, PartialEq, Eq, Hash)]
pub enum RpnItem {
	Number(String),
	Identifier(String),
	Operator(Operator),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpnError {
	#[error("empty expression")]
	Empty,
	#[error("operator {op} at item {index} has {available} operand(s) but needs 2")]
	MissingOperands {
		op: Operator,
		index: usize,
		available: usize,
	},
	#[error("{remaining} values left on the stack, expected 1")]
	Unbalanced { remaining: usize },
}

fn push_postfix(expr: &Expr, out: &mut Vec<RpnItem>) {
	match expr {
		Expr::NumberLiteral(x) => out.push(RpnItem::Number(x.clone())),
		Expr::Identifier(x) => out.push(RpnItem::Identifier(x.clone())),
		Expr::BinaryOp { lhs, op, rhs, .. } => {
			push_postfix(lhs, out);
			push_postfix(rhs, out);
			out.push(RpnItem::Operator(*op));
		}
	}
}

#[must_use]
pub fn to_rpn(expr: &Expr) -> Vec<RpnItem> {
	let mut out = Vec::new();
	push_postfix(expr, &mut out);
	out
}

#[must_use]
pub fn format_rpn(items: &[RpnItem]) -> String {
	items.iter().join(" ")
}

/// Runs the sequence on a stack that only tracks depth: operands push one
/// value, operators pop two and push one. A well-formed sequence never
/// underflows and ends with exactly one value.
///
/// # Errors
/// Reports the first operator that underflows, or the final depth when it is
/// not one.
pub fn check_rpn(items: &[RpnItem]) -> Result<(), RpnError> {
	let mut depth = 0usize;
	for (index, item) in items.iter().enumerate() {
		match item {
			RpnItem::Number(_) | RpnItem::Identifier(_) => depth += 1,
			RpnItem::Operator(op) => {
				if depth < 2 {
					return Err(RpnError::MissingOperands {
						op: *op,
						index,
						available: depth,
					});
				}
				depth -= 1;
			}
		}
	}
	match depth {
		0 => Err(RpnError::Empty),
		1 => Ok(()),
		remaining => Err(RpnError::Unbalanced { remaining }),
	}
}

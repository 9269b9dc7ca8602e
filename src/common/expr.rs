use crate::lexer::Operator;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
	NumberLiteral(String),
	Identifier(String),
	BinaryOp {
		lhs: Box<Expr>,
		op: Operator,
		rhs: Box<Expr>,
		/// Written as `( lhs op rhs )` rather than bare `lhs op rhs`.
		parenthesized: bool,
	},
}

impl Expr {
	#[must_use]
	pub fn binary(lhs: Expr, op: Operator, rhs: Expr) -> Self {
		Self::BinaryOp {
			lhs: Box::new(lhs),
			op,
			rhs: Box::new(rhs),
			parenthesized: false,
		}
	}

	/// Marks a binary operation as written inside parentheses. Leaves are
	/// returned unchanged.
	#[must_use]
	pub fn parenthesize(self) -> Self {
		match self {
			Self::BinaryOp { lhs, op, rhs, .. } => Self::BinaryOp {
				lhs,
				op,
				rhs,
				parenthesized: true,
			},
			leaf => leaf,
		}
	}

	#[must_use]
	pub fn is_parenthesized(&self) -> bool {
		matches!(
			self,
			Self::BinaryOp {
				parenthesized: true,
				..
			}
		)
	}

	/// Number of operator applications in the tree.
	#[must_use]
	pub fn operator_count(&self) -> usize {
		match self {
			Self::NumberLiteral(_) | Self::Identifier(_) => 0,
			Self::BinaryOp { lhs, rhs, .. } => 1 + lhs.operator_count() + rhs.operator_count(),
		}
	}
}

impl std::fmt::Display for Expr {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::NumberLiteral(x) | Self::Identifier(x) => f.write_str(x),
			Self::BinaryOp {
				lhs,
				op,
				rhs,
				parenthesized,
			} => {
				if *parenthesized {
					f.write_fmt(format_args!("({lhs} {op} {rhs})"))
				} else {
					f.write_fmt(format_args!("{lhs} {op} {rhs}"))
				}
			}
		}
	}
}

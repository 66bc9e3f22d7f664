//! Operator legality on inferred operand types.

use core::fmt;
use std::fmt::{Display, Formatter};

use miniprob_ast::nodes::{OperatorKind, UnaryOperatorKind};

use crate::type_info::TypeDescription;

/// Every operation whose operand types are checked: binary operators, the
/// unary `!` and the `:` ratio of a probabilistic choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Binary(OperatorKind),
    Unary(UnaryOperatorKind),
    Ratio,
}

impl From<OperatorKind> for Operation {
    fn from(operator: OperatorKind) -> Self {
        Operation::Binary(operator)
    }
}

impl From<UnaryOperatorKind> for Operation {
    fn from(operator: UnaryOperatorKind) -> Self {
        Operation::Unary(operator)
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Binary(operator) => write!(f, "{operator}"),
            Operation::Unary(operator) => write!(f, "{operator}"),
            Operation::Ratio => write!(f, ":"),
        }
    }
}

/// Whether `operation` may be applied to `left` (and `right` for binary
/// operations). Operations without a type constraint, such as `==`, are
/// always legal.
#[must_use]
pub fn is_legal_operation(
    operation: impl Into<Operation>,
    left: &TypeDescription,
    right: Option<&TypeDescription>,
) -> bool {
    match operation.into() {
        Operation::Ratio => both(left, right, TypeDescription::is_integer),
        Operation::Binary(operator) if operator.is_arithmetic() || operator.is_relational() => {
            both(left, right, TypeDescription::is_integer)
        }
        Operation::Binary(operator) if operator.is_logical() => {
            both(left, right, TypeDescription::is_boolean)
        }
        Operation::Binary(_) => true,
        Operation::Unary(UnaryOperatorKind::Not) => left.is_boolean(),
    }
}

fn both(
    left: &TypeDescription,
    right: Option<&TypeDescription>,
    predicate: fn(&TypeDescription) -> bool,
) -> bool {
    right.is_some_and(|right| predicate(left) && predicate(right))
}

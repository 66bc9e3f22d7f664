//! Implementation methods for AST enum types.
//!
//! Operators and distribution names round-trip through their source
//! spelling; node kinds render as the names used in diagnostics.

use core::fmt;
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::{
    errors::AstError,
    nodes::{DeclaredType, DistributionKind, NodeKind, OperatorKind, UnaryOperatorKind},
};

impl OperatorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OperatorKind::Add => "+",
            OperatorKind::Sub => "-",
            OperatorKind::Mul => "*",
            OperatorKind::Div => "/",
            OperatorKind::Mod => "%",
            OperatorKind::And => "&&",
            OperatorKind::Or => "||",
            OperatorKind::Eq => "==",
            OperatorKind::Ne => "!=",
            OperatorKind::Lt => "<",
            OperatorKind::Le => "<=",
            OperatorKind::Gt => ">",
            OperatorKind::Ge => ">=",
        }
    }

    /// `+ - * / %`
    #[must_use]
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            OperatorKind::Add
                | OperatorKind::Sub
                | OperatorKind::Mul
                | OperatorKind::Div
                | OperatorKind::Mod
        )
    }

    #[must_use]
    pub fn is_relational(self) -> bool {
        matches!(
            self,
            OperatorKind::Lt | OperatorKind::Le | OperatorKind::Gt | OperatorKind::Ge
        )
    }

    #[must_use]
    pub fn is_logical(self) -> bool {
        matches!(self, OperatorKind::And | OperatorKind::Or)
    }

    #[must_use]
    pub fn is_division(self) -> bool {
        matches!(self, OperatorKind::Div | OperatorKind::Mod)
    }
}

impl Display for OperatorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatorKind {
    type Err = AstError;

    fn from_str(symbol: &str) -> Result<Self, Self::Err> {
        Ok(match symbol {
            "+" => OperatorKind::Add,
            "-" => OperatorKind::Sub,
            "*" => OperatorKind::Mul,
            "/" => OperatorKind::Div,
            "%" => OperatorKind::Mod,
            "&&" => OperatorKind::And,
            "||" => OperatorKind::Or,
            "==" => OperatorKind::Eq,
            "!=" => OperatorKind::Ne,
            "<" => OperatorKind::Lt,
            "<=" => OperatorKind::Le,
            ">" => OperatorKind::Gt,
            ">=" => OperatorKind::Ge,
            _ => {
                return Err(AstError::InvalidOperator {
                    symbol: symbol.to_string(),
                });
            }
        })
    }
}

impl Display for UnaryOperatorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperatorKind::Not => write!(f, "!"),
        }
    }
}

impl FromStr for UnaryOperatorKind {
    type Err = AstError;

    fn from_str(symbol: &str) -> Result<Self, Self::Err> {
        match symbol {
            "!" => Ok(UnaryOperatorKind::Not),
            _ => Err(AstError::InvalidOperator {
                symbol: symbol.to_string(),
            }),
        }
    }
}

impl Display for DistributionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DistributionKind::Bernoulli => write!(f, "Bernoulli"),
            DistributionKind::Uniform => write!(f, "Uniform"),
        }
    }
}

impl FromStr for DistributionKind {
    type Err = AstError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "Bernoulli" => Ok(DistributionKind::Bernoulli),
            "Uniform" => Ok(DistributionKind::Uniform),
            _ => Err(AstError::InvalidDistribution {
                name: name.to_string(),
            }),
        }
    }
}

impl Display for DeclaredType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredType::Bool => write!(f, "bool"),
            DeclaredType::Int { prefix } => write!(f, "{prefix}"),
            DeclaredType::IntArray { prefix, size } => write!(f, "{prefix}[{size}]"),
        }
    }
}

impl NodeKind {
    pub const ALL: [NodeKind; 23] = [
        NodeKind::Program,
        NodeKind::FileImport,
        NodeKind::Decl,
        NodeKind::Param,
        NodeKind::Func,
        NodeKind::Block,
        NodeKind::Assignment,
        NodeKind::FuncCall,
        NodeKind::Argument,
        NodeKind::Query,
        NodeKind::Observation,
        NodeKind::IfThenElse,
        NodeKind::While,
        NodeKind::TryCatch,
        NodeKind::Throw,
        NodeKind::BinaryExpression,
        NodeKind::LogicalNegation,
        NodeKind::Lval,
        NodeKind::IntegerLiteral,
        NodeKind::BoolLiteral,
        NodeKind::ProbabilisticAssignment,
        NodeKind::ProbChoice,
        NodeKind::Distribution,
    ];
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Program => "Program",
            NodeKind::FileImport => "FileImport",
            NodeKind::Decl => "Decl",
            NodeKind::Param => "Param",
            NodeKind::Func => "Func",
            NodeKind::Block => "Block",
            NodeKind::Assignment => "Assignment",
            NodeKind::FuncCall => "FuncCall",
            NodeKind::Argument => "Argument",
            NodeKind::Query => "Query",
            NodeKind::Observation => "Observation",
            NodeKind::IfThenElse => "IfThenElse",
            NodeKind::While => "While",
            NodeKind::TryCatch => "TryCatch",
            NodeKind::Throw => "Throw",
            NodeKind::BinaryExpression => "BinaryExpression",
            NodeKind::LogicalNegation => "LogicalNegation",
            NodeKind::Lval => "Lval",
            NodeKind::IntegerLiteral => "IntLiteral",
            NodeKind::BoolLiteral => "BoolLiteral",
            NodeKind::ProbabilisticAssignment => "ProbabilisticAssignment",
            NodeKind::ProbChoice => "ProbChoice",
            NodeKind::Distribution => "Distribution",
        };
        f.write_str(name)
    }
}

//! Type Information
//!
//! This module defines the value types produced by inference.
//!
//! MiniProb knows four kinds of values:
//! - booleans
//! - integers of arbitrary bit width, signed or unsigned
//! - fixed-size arrays of integers
//! - distribution results (`Bernoulli(..)`, `Uniform(..)`), which behave like
//!   integers for tag comparison
//!
//! Failed inference is a value as well: [`TypeDescription::Error`] carries the
//! reason and, when known, the id of the node that caused it.

use core::fmt;
use std::fmt::{Display, Formatter};

use miniprob_ast::nodes::DistributionKind;

use crate::errors::InferenceErrorKind;

/// Base tag of a type, ignoring width, signedness and literal origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Boolean,
    Integer,
    Array,
    Error,
}

impl Display for TypeTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Boolean => write!(f, "boolean"),
            TypeTag::Integer => write!(f, "integer"),
            TypeTag::Array => write!(f, "array"),
            TypeTag::Error => write!(f, "error"),
        }
    }
}

/// The integer literal a type was inferred from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LiteralValue {
    pub node_id: u32,
    pub negative: bool,
    pub value: u64,
}

impl LiteralValue {
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IntegerType {
    pub width: u32,
    pub signed: bool,
    pub literal: Option<LiteralValue>,
}

impl IntegerType {
    #[must_use]
    pub fn new(width: u32, signed: bool) -> Self {
        Self {
            width,
            signed,
            literal: None,
        }
    }

    /// Bit width available for magnitude: one bit less when signed.
    #[must_use]
    pub fn effective_width(&self) -> u32 {
        effective_width(self.width, self.signed)
    }

    /// Smallest type able to hold both operands: the larger effective width,
    /// signed if either operand is signed. Saturates at `u32::MAX` bits.
    #[must_use]
    pub fn widen(&self, other: &IntegerType) -> IntegerType {
        let signed = self.signed || other.signed;
        let effective = self.effective_width().max(other.effective_width());
        IntegerType::new(effective.saturating_add(u32::from(signed)), signed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DistributionType {
    pub kind: DistributionKind,
    pub width: u32,
    pub signed: bool,
    pub node_id: u32,
}

impl DistributionType {
    #[must_use]
    pub fn effective_width(&self) -> u32 {
        effective_width(self.width, self.signed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ErrorType {
    pub kind: InferenceErrorKind,
    pub source: Option<u32>,
}

impl ErrorType {
    #[must_use]
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescription {
    Boolean { literal: Option<bool> },
    Integer(IntegerType),
    Array { element: Box<TypeDescription> },
    Distribution(DistributionType),
    Error(ErrorType),
}

impl TypeDescription {
    #[must_use]
    pub fn boolean() -> Self {
        TypeDescription::Boolean { literal: None }
    }

    #[must_use]
    pub fn integer(width: u32, signed: bool) -> Self {
        TypeDescription::Integer(IntegerType::new(width, signed))
    }

    #[must_use]
    pub fn array_of(element: TypeDescription) -> Self {
        TypeDescription::Array {
            element: Box::new(element),
        }
    }

    #[must_use]
    pub fn error(kind: InferenceErrorKind, source: Option<u32>) -> Self {
        TypeDescription::Error(ErrorType { kind, source })
    }

    #[must_use]
    pub fn tag(&self) -> TypeTag {
        match self {
            TypeDescription::Boolean { .. } => TypeTag::Boolean,
            TypeDescription::Integer(_) | TypeDescription::Distribution(_) => TypeTag::Integer,
            TypeDescription::Array { .. } => TypeTag::Array,
            TypeDescription::Error(_) => TypeTag::Error,
        }
    }

    #[must_use]
    pub fn is_boolean(&self) -> bool {
        self.tag() == TypeTag::Boolean
    }

    /// True for plain integers and distribution results.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.tag() == TypeTag::Integer
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.tag() == TypeTag::Error
    }

    #[must_use]
    pub fn is_distribution(&self) -> bool {
        matches!(self, TypeDescription::Distribution(_))
    }

    #[must_use]
    pub fn as_integer(&self) -> Option<&IntegerType> {
        match self {
            TypeDescription::Integer(integer) => Some(integer),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_error(&self) -> Option<&ErrorType> {
        match self {
            TypeDescription::Error(error) => Some(error),
            _ => None,
        }
    }

    /// Element type of an integer array.
    #[must_use]
    pub fn as_integer_array(&self) -> Option<&IntegerType> {
        match self {
            TypeDescription::Array { element } => element.as_integer(),
            _ => None,
        }
    }

    /// Literal the type was inferred from, if it is an integer literal.
    #[must_use]
    pub fn literal(&self) -> Option<&LiteralValue> {
        self.as_integer().and_then(|integer| integer.literal.as_ref())
    }

    /// Effective width of integer-like types.
    #[must_use]
    pub fn effective_width(&self) -> Option<u32> {
        match self {
            TypeDescription::Integer(integer) => Some(integer.effective_width()),
            TypeDescription::Distribution(distribution) => Some(distribution.effective_width()),
            _ => None,
        }
    }

    /// Signedness of integer-like types.
    #[must_use]
    pub fn is_signed(&self) -> bool {
        match self {
            TypeDescription::Integer(integer) => integer.signed,
            TypeDescription::Distribution(distribution) => distribution.signed,
            _ => false,
        }
    }
}

fn effective_width(width: u32, signed: bool) -> u32 {
    if signed { width.saturating_sub(1) } else { width }
}

fn signedness(signed: bool) -> &'static str {
    if signed { "signed" } else { "unsigned" }
}

impl Display for TypeDescription {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescription::Integer(integer) => {
                write!(f, "{} integer{}", signedness(integer.signed), integer.width)
            }
            TypeDescription::Distribution(distribution) => write!(
                f,
                "{} integer{}",
                signedness(distribution.signed),
                distribution.width
            ),
            TypeDescription::Array { element } => write!(f, "[{element}]"),
            TypeDescription::Boolean { .. } | TypeDescription::Error(_) => {
                write!(f, "{}", self.tag())
            }
        }
    }
}

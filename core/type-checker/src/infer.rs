//! Type inference for expression-like nodes.
//!
//! [`infer_type`] computes a [`TypeDescription`] for a node and memoizes it in
//! an [`InferenceCache`] keyed by node id. The cache belongs to a single
//! validation pass and must be created fresh for every pass.
//!
//! Re-entrant inference of a node that is still being inferred (only possible
//! through a cyclic definition) yields `Recursive definition` instead of
//! looping.

use std::rc::Rc;

use miniprob_ast::{
    nodes::{
        AstNode, BinaryExpression, DeclaredType, Definition, Distribution, DistributionKind,
        Expression, IntLiteral, Literal, Lval, Misc, NodeKind, Param, ProbabilisticAssignment,
    },
    reference::ResolvedSymbol,
};
use rustc_hash::FxHashMap;

use crate::{
    errors::{InferenceErrorKind, SuffixError},
    type_info::{DistributionType, IntegerType, LiteralValue, TypeDescription},
};

/// Sanity ceiling for integer widths, `2^29 - 1`.
pub const DEFAULT_MAX_INTEGER_WIDTH: u32 = (1 << 29) - 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferenceState {
    InProgress,
    Done(TypeDescription),
}

/// Per-pass memoization table keyed by node id.
#[derive(Debug, Clone)]
pub struct InferenceCache {
    entries: FxHashMap<u32, InferenceState>,
    max_integer_width: u32,
}

impl Default for InferenceCache {
    fn default() -> Self {
        Self::new()
    }
}

impl InferenceCache {
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_integer_width(DEFAULT_MAX_INTEGER_WIDTH)
    }

    #[must_use]
    pub fn with_max_integer_width(max_integer_width: u32) -> Self {
        Self {
            entries: FxHashMap::default(),
            max_integer_width,
        }
    }

    #[must_use]
    pub fn max_integer_width(&self) -> u32 {
        self.max_integer_width
    }

    /// Completed result for `node_id`, if any.
    #[must_use]
    pub fn get(&self, node_id: u32) -> Option<&TypeDescription> {
        match self.entries.get(&node_id) {
            Some(InferenceState::Done(ty)) => Some(ty),
            _ => None,
        }
    }

    #[must_use]
    pub fn state(&self, node_id: u32) -> Option<&InferenceState> {
        self.entries.get(&node_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Infers the type of `node`. `None` yields `Could not infer type for undefined`.
pub fn infer_type(node: Option<&AstNode>, cache: &mut InferenceCache) -> TypeDescription {
    let Some(node) = node else {
        return TypeDescription::error(InferenceErrorKind::Undefined, None);
    };
    let id = node.id();
    match cache.entries.get(&id) {
        Some(InferenceState::Done(ty)) => {
            tracing::trace!(node = id, "inference cache hit");
            return ty.clone();
        }
        Some(InferenceState::InProgress) => {
            tracing::trace!(node = id, "recursive inference");
            return TypeDescription::error(InferenceErrorKind::RecursiveDefinition, Some(id));
        }
        None => {}
    }
    cache.entries.insert(id, InferenceState::InProgress);
    let ty = infer_uncached(node, cache);
    cache.entries.insert(id, InferenceState::Done(ty.clone()));
    ty
}

pub fn infer_expression(expression: &Expression, cache: &mut InferenceCache) -> TypeDescription {
    infer_type(Some(&AstNode::Expression(expression.clone())), cache)
}

pub fn infer_optional_expression(
    expression: Option<&Expression>,
    cache: &mut InferenceCache,
) -> TypeDescription {
    match expression {
        Some(expression) => infer_expression(expression, cache),
        None => infer_type(None, cache),
    }
}

pub fn infer_param(param: &Rc<Param>, cache: &mut InferenceCache) -> TypeDescription {
    infer_type(
        Some(&AstNode::Definition(Definition::Parameter(param.clone()))),
        cache,
    )
}

pub fn infer_distribution(
    distribution: &Rc<Distribution>,
    cache: &mut InferenceCache,
) -> TypeDescription {
    infer_type(
        Some(&AstNode::Misc(Misc::Distribution(distribution.clone()))),
        cache,
    )
}

/// Parses an integer type tag `<u|s><width>`.
///
/// # Errors
///
/// Returns a [`SuffixError`] when the prefix is neither `u` nor `s`, when the
/// width is not a number, or when it exceeds `max_width`.
pub fn parse_type_tag(tag: &str, max_width: u32) -> Result<IntegerType, SuffixError> {
    let mut chars = tag.chars();
    let signed = match chars.next() {
        Some('s') => true,
        Some('u') => false,
        other => {
            return Err(SuffixError::UnexpectedPrefix {
                prefix: other.map(String::from).unwrap_or_default(),
            });
        }
    };
    let width: u64 = chars
        .as_str()
        .parse()
        .map_err(|_| SuffixError::InvalidNumber {
            suffix: tag.to_string(),
        })?;
    match u32::try_from(width) {
        Ok(width) if width <= max_width => Ok(IntegerType::new(width, signed)),
        _ => Err(SuffixError::WidthTooLarge {
            width,
            max: max_width,
        }),
    }
}

fn infer_uncached(node: &AstNode, cache: &mut InferenceCache) -> TypeDescription {
    match node {
        AstNode::Expression(expression) => match expression {
            Expression::Literal(Literal::Bool(literal)) => TypeDescription::Boolean {
                literal: Some(literal.value),
            },
            Expression::Literal(Literal::Integer(literal)) => {
                infer_int_literal(literal, cache.max_integer_width)
            }
            Expression::Lval(lval) => infer_lval(lval, cache.max_integer_width),
            Expression::Negation(_) => TypeDescription::boolean(),
            Expression::Binary(binary) => infer_binary(binary, cache),
            Expression::Probabilistic(assignment) => infer_probabilistic(assignment, cache),
        },
        AstNode::Misc(Misc::Distribution(distribution)) => {
            infer_distribution_node(distribution, cache)
        }
        AstNode::Definition(Definition::Parameter(param)) => {
            declared_type(&param.declared_type, false, cache.max_integer_width)
                .unwrap_or_else(|reason| {
                    TypeDescription::error(
                        InferenceErrorKind::MalformedDeclaredType { reason },
                        Some(param.id),
                    )
                })
        }
        _ => TypeDescription::error(
            InferenceErrorKind::Unsupported { kind: node.kind() },
            Some(node.id()),
        ),
    }
}

fn infer_int_literal(literal: &IntLiteral, max_width: u32) -> TypeDescription {
    let source = Some(literal.id);
    if literal.negative && !literal.suffix.starts_with('s') {
        return TypeDescription::error(InferenceErrorKind::NegativeUnsigned, source);
    }
    let integer = match parse_type_tag(&literal.suffix, max_width) {
        Ok(integer) => integer,
        Err(reason) => {
            return TypeDescription::error(
                InferenceErrorKind::MalformedSuffix {
                    kind: NodeKind::IntegerLiteral,
                    reason,
                },
                source,
            );
        }
    };
    if integer.width < 64 && literal.value >= 1u64 << integer.width {
        return TypeDescription::error(
            InferenceErrorKind::ValueOutOfRange {
                value: literal.value,
                width: integer.width,
            },
            source,
        );
    }
    TypeDescription::Integer(IntegerType {
        literal: Some(LiteralValue {
            node_id: literal.id,
            negative: literal.negative,
            value: literal.value,
        }),
        ..integer
    })
}

/// Type of a value declared as `declared`. Unindexed integer arrays are
/// whole-array values; every other use yields the scalar/element type.
fn declared_type(
    declared: &DeclaredType,
    indexed: bool,
    max_width: u32,
) -> Result<TypeDescription, SuffixError> {
    match declared {
        DeclaredType::Bool => Ok(TypeDescription::boolean()),
        DeclaredType::Int { prefix } => {
            parse_type_tag(prefix, max_width).map(TypeDescription::Integer)
        }
        DeclaredType::IntArray { prefix, .. } => {
            let element = TypeDescription::Integer(parse_type_tag(prefix, max_width)?);
            Ok(if indexed {
                element
            } else {
                TypeDescription::array_of(element)
            })
        }
    }
}

fn infer_lval(lval: &Lval, max_width: u32) -> TypeDescription {
    let declared = match lval.reference.target() {
        Some(ResolvedSymbol::Declaration(decl)) => decl.declared_type.clone(),
        Some(ResolvedSymbol::Parameter(param)) => param.declared_type.clone(),
        Some(ResolvedSymbol::Function(_)) | None => {
            return TypeDescription::error(
                InferenceErrorKind::MissingLinkedReference,
                Some(lval.id),
            );
        }
    };
    declared_type(&declared, lval.index.is_some(), max_width).unwrap_or_else(|reason| {
        TypeDescription::error(
            InferenceErrorKind::MalformedDeclaredType { reason },
            Some(lval.id),
        )
    })
}

fn infer_binary(binary: &BinaryExpression, cache: &mut InferenceCache) -> TypeDescription {
    if !binary.operator.is_arithmetic() {
        return TypeDescription::boolean();
    }
    let left = infer_expression(&binary.left, cache);
    let right = infer_expression(&binary.right, cache);
    if left.is_error() {
        return left;
    }
    if right.is_error() {
        return right;
    }
    let (Some(left), Some(right)) = (left.as_integer(), right.as_integer()) else {
        return TypeDescription::error(InferenceErrorKind::ConflictingOperands, Some(binary.id));
    };
    if binary.operator.is_division() && right.literal.is_some_and(|literal| literal.is_zero()) {
        return TypeDescription::error(InferenceErrorKind::DivisionByZero, Some(binary.id));
    }
    TypeDescription::Integer(left.widen(right))
}

fn infer_distribution_node(
    distribution: &Distribution,
    cache: &mut InferenceCache,
) -> TypeDescription {
    match distribution.kind {
        DistributionKind::Bernoulli => TypeDescription::Distribution(DistributionType {
            kind: DistributionKind::Bernoulli,
            width: 1,
            signed: false,
            node_id: distribution.id,
        }),
        DistributionKind::Uniform => {
            let Some(upper) = &distribution.upper else {
                return TypeDescription::error(InferenceErrorKind::Undefined, Some(distribution.id));
            };
            let upper = infer_expression(upper, cache);
            if upper.is_error() {
                return upper;
            }
            match upper.as_integer() {
                Some(integer) => TypeDescription::Distribution(DistributionType {
                    kind: DistributionKind::Uniform,
                    width: integer.width,
                    signed: integer.signed,
                    node_id: distribution.id,
                }),
                None => TypeDescription::error(
                    InferenceErrorKind::NonIntegerDistribution,
                    Some(distribution.id),
                ),
            }
        }
    }
}

fn infer_probabilistic(
    assignment: &ProbabilisticAssignment,
    cache: &mut InferenceCache,
) -> TypeDescription {
    let head = infer_expression(&assignment.head, cache);
    let fallbacks: Vec<TypeDescription> = assignment
        .fallbacks
        .iter()
        .map(|fallback| infer_expression(fallback, cache))
        .collect();
    if let Some(error) = std::iter::once(&head).chain(&fallbacks).find(|ty| ty.is_error()) {
        return error.clone();
    }
    if fallbacks.iter().any(|ty| ty.tag() != head.tag()) {
        return TypeDescription::error(
            InferenceErrorKind::MismatchedBranches,
            Some(assignment.id),
        );
    }
    let Some(head_integer) = head.as_integer() else {
        return head;
    };
    let widened = fallbacks
        .iter()
        .filter_map(TypeDescription::as_integer)
        .fold(IntegerType::new(head_integer.width, head_integer.signed), |acc, next| {
            acc.widen(next)
        });
    TypeDescription::Integer(widened)
}

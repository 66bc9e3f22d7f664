//! Inference error catalogue.
//!
//! Inference never fails with a Rust error; every problem becomes a
//! [`TypeDescription::Error`](crate::type_info::TypeDescription::Error) whose
//! kind is one of the variants below. Their `Display` output is the
//! user-facing diagnostic message.

use miniprob_ast::nodes::NodeKind;
use thiserror::Error;

/// Failure to interpret an integer type tag such as `u8` or `s32`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum SuffixError {
    #[error("Unexpected prefix \"{prefix}\"")]
    UnexpectedPrefix { prefix: String },

    #[error("Invalid number in \"{suffix}\"")]
    InvalidNumber { suffix: String },

    #[error("Width {width} exceeds the maximum integer width {max}")]
    WidthTooLarge { width: u64, max: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum InferenceErrorKind {
    #[error("Could not infer type for undefined")]
    Undefined,

    #[error("Recursive definition")]
    RecursiveDefinition,

    #[error("Negative value cannot be stored in unsigned integer.")]
    NegativeUnsigned,

    #[error("Could not infer type for {kind}: {reason}")]
    MalformedSuffix { kind: NodeKind, reason: SuffixError },

    #[error("Value {value} does not fit into integer with width {width}")]
    ValueOutOfRange { value: u64, width: u32 },

    #[error("Missing linked reference.")]
    MissingLinkedReference,

    #[error("Could not infer type of Lval reference: {reason}")]
    MalformedDeclaredType { reason: SuffixError },

    #[error("Could not infer type from binary expression due to conflicted state.")]
    ConflictingOperands,

    #[error("Division by 0")]
    DivisionByZero,

    #[error("Distribution arguments must be integer.")]
    NonIntegerDistribution,

    #[error("Possible results do not fit each other's type.")]
    MismatchedBranches,

    #[error("Could not infer type for {kind}")]
    Unsupported { kind: NodeKind },
}

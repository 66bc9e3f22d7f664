//! Error types for the AST crate.
//!
//! This module defines structured errors for reference binding and for
//! building nodes from their textual parts.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[must_use = "errors must not be silently ignored"]
pub enum AstError {
    /// A reference can only be linked or failed once per link pass.
    #[error("reference `{name}` is already resolved")]
    ReferenceAlreadyResolved { name: String },

    /// The operator symbol is not part of the language.
    #[error("unknown operator `{symbol}`")]
    InvalidOperator { symbol: String },

    /// The distribution name is not part of the language.
    #[error("unknown distribution `{name}`")]
    InvalidDistribution { name: String },
}

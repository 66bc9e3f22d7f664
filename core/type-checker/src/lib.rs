#![warn(clippy::pedantic)]
//! Type System for the MiniProb Language
//!
//! This crate implements the value-level type system used by validation:
//!
//! - [`type_info`] - `TypeDescription`: booleans, width/signedness-aware
//!   integers, integer arrays, distribution results and error values
//! - [`infer`] - memoized inference over expression-like nodes with an
//!   explicit in-progress marker guarding against cyclic definitions
//! - [`compatible`] - directional assignability (`is_compatible`)
//! - [`operation`] - operator legality on operand types (`is_legal_operation`)
//! - [`errors`] - the inference error catalogue
//!
//! ## Effective Width
//!
//! Integer magnitudes are compared by *effective width*: the bit width minus
//! one for signed types. `u8` and `s9` therefore hold the same magnitudes, and
//! `u8 + s16` infers to `s16`.
//!
//! ## Error Values
//!
//! Inference never panics and never returns a Rust error. Malformed suffixes,
//! unresolved references and recursive definitions all become
//! [`TypeDescription::Error`](type_info::TypeDescription::Error) values that
//! callers check before applying compatibility or legality rules.
//!
//! ## Quick Start
//!
//! ```
//! use miniprob_ast::{builder::Builder, nodes::OperatorKind};
//! use miniprob_type_checker::{infer::{infer_expression, InferenceCache}, type_info::TypeDescription};
//!
//! let sum = Builder::binary(
//!     Builder::int_literal(3, "u8"),
//!     OperatorKind::Add,
//!     Builder::int_literal(4, "s16"),
//! );
//! let mut cache = InferenceCache::new();
//! assert_eq!(infer_expression(&sum, &mut cache), TypeDescription::integer(16, true));
//! ```

pub mod compatible;
pub mod errors;
pub mod infer;
pub mod operation;
pub mod type_info;

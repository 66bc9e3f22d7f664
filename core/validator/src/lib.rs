#![warn(clippy::pedantic)]
//! Semantic Validation for MiniProb
//!
//! The [`Validator`](validator::Validator) visits every node of a linked
//! document in pre-order and runs the checks registered for its kind in a
//! [`ValidationRegistry`](registry::ValidationRegistry). Checks never fail:
//! every problem, including inference errors met on the way, becomes a
//! [`Diagnostic`](diagnostic::Diagnostic).
//!
//! Each call to `validate_document` uses a fresh inference cache, so
//! validating an unchanged document twice yields identical diagnostics.

pub mod checks;
pub mod diagnostic;
pub mod errors;
pub mod registry;
pub mod validator;

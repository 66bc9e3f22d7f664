#![warn(clippy::pedantic)]
//! MiniProb Semantic Front-End
//!
//! This crate ties the analysis crates into one pipeline:
//!
//! ```text
//! Documents → Scope Computation → Index → Link → Validate → Diagnostics
//! ```
//!
//! - [`miniprob_ast`] defines the syntax tree and cross-references
//! - [`miniprob_type_checker`] infers types and decides compatibility
//! - [`miniprob_linker`] computes scopes and binds references
//! - [`miniprob_validator`] runs the per-node rule set
//!
//! ## Quick Start
//!
//! ```
//! use miniprob::{analyze, config::AnalysisConfig};
//! use miniprob_ast::{builder::Builder, document::{Document, DocumentUri}, nodes::DeclaredType};
//!
//! let program = Builder::program(
//!     vec![],
//!     vec![Builder::decl(DeclaredType::Bool, &["flag"])],
//!     vec![Builder::func(
//!         "main",
//!         vec![],
//!         vec![],
//!         vec![Builder::assignment(Builder::lval("flag"), Builder::bool_literal(false))],
//!     )],
//! );
//! let report = analyze([Document::new("file:///main.mp", program)], &AnalysisConfig::default());
//! assert!(report.diagnostics(&DocumentUri::new("file:///main.mp")).is_empty());
//! ```
//!
//! For incremental use, keep a [`Workspace`](workspace::Workspace), feed it
//! document changes and call `build` after each batch.
//!
//! ## Configuration
//!
//! [`AnalysisConfig`](config::AnalysisConfig) is read from TOML and controls
//! the integer width ceiling and the scoping heuristics.

use miniprob_ast::document::Document;

use crate::{
    config::AnalysisConfig,
    workspace::{BuildReport, Workspace},
};

pub mod config;
pub mod workspace;

/// One-shot analysis of a set of documents.
#[must_use]
pub fn analyze<I>(documents: I, config: &AnalysisConfig) -> BuildReport
where
    I: IntoIterator<Item = Document>,
{
    let mut workspace = Workspace::new(config.clone());
    for document in documents {
        workspace.add_document(document);
    }
    workspace.build()
}

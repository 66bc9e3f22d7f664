//! Export computation: what a document offers to the documents importing it.

use miniprob_ast::document::Document;

use crate::description::{SymbolDescription, SymbolScope};

/// Exported symbols of `document`: every function with a body, then every
/// name bound by a program-level declaration.
#[tracing::instrument(level = "debug", skip_all, fields(document = %document.uri))]
#[must_use]
pub fn compute_exports(document: &Document) -> Vec<SymbolDescription> {
    let program = &document.program;
    let mut exports: Vec<SymbolDescription> = program
        .real_functions()
        .map(|func| SymbolDescription::function(func, &document.uri))
        .collect();
    for decl in &program.declarations {
        exports.extend(SymbolDescription::declarations(
            decl,
            &document.uri,
            &SymbolScope::Global,
        ));
    }
    tracing::debug!(count = exports.len(), "computed exports");
    exports
}

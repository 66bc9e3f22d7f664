use miniprob_ast::document::Document;
use miniprob_type_checker::infer::{DEFAULT_MAX_INTEGER_WIDTH, InferenceCache};

use crate::{
    checks::CheckContext,
    diagnostic::{Diagnostic, DiagnosticSink},
    errors::ValidatorError,
    registry::ValidationRegistry,
};

/// Runs the registered checks over every node of a document.
pub struct Validator {
    registry: ValidationRegistry,
    max_integer_width: u32,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            registry: ValidationRegistry::standard(),
            max_integer_width: DEFAULT_MAX_INTEGER_WIDTH,
        }
    }
}

impl Validator {
    /// # Errors
    ///
    /// Returns [`ValidatorError::UncoveredNodeKinds`] if some node kind has no
    /// entry in `registry`.
    pub fn new(registry: ValidationRegistry) -> Result<Self, ValidatorError> {
        let uncovered = registry.uncovered();
        if !uncovered.is_empty() {
            return Err(ValidatorError::UncoveredNodeKinds(uncovered));
        }
        Ok(Self {
            registry,
            max_integer_width: DEFAULT_MAX_INTEGER_WIDTH,
        })
    }

    #[must_use]
    pub fn with_max_integer_width(mut self, max_integer_width: u32) -> Self {
        self.max_integer_width = max_integer_width;
        self
    }

    /// Validates `document` in pre-order with a fresh inference cache.
    ///
    /// References must have been linked beforehand; unlinked references are
    /// skipped rather than reported.
    #[tracing::instrument(level = "debug", skip_all, fields(document = %document.uri))]
    pub fn validate_document(&self, document: &Document) -> Vec<Diagnostic> {
        let mut cache = InferenceCache::with_max_integer_width(self.max_integer_width);
        let mut sink = DiagnosticSink::new();
        let mut ctx = CheckContext::new(document, &mut cache, &mut sink);
        for node in document.arena.nodes_in_order() {
            for check in self.registry.checks_for(node.kind()) {
                check(node, &mut ctx);
            }
        }
        tracing::debug!(diagnostics = sink.len(), "validation finished");
        sink.into_diagnostics()
    }
}

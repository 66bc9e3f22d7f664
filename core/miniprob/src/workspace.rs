//! Cross-document build pipeline.
//!
//! A build runs in three phases over the dirty documents: every one of them
//! is indexed first, then relinked, then validated. Linking therefore always
//! sees the current exports of documents rebuilt in the same pass.
//!
//! Changing a document invalidates the scope cache for it and for every
//! document that imports it, directly or transitively, and marks all of them
//! dirty.

use std::collections::{BTreeMap, BTreeSet};

use miniprob_ast::document::{Document, DocumentUri};
use miniprob_linker::{
    cache::ScopeCache,
    computation::compute_exports,
    index::WorkspaceIndex,
    linker::{LinkFailure, Linker},
};
use miniprob_validator::{diagnostic::Diagnostic, validator::Validator};

use crate::config::AnalysisConfig;

/// Diagnostics of the documents rebuilt by one [`Workspace::build`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    diagnostics: BTreeMap<DocumentUri, Vec<Diagnostic>>,
}

impl BuildReport {
    /// Rebuilt documents in URI order.
    pub fn built(&self) -> impl Iterator<Item = &DocumentUri> + '_ {
        self.diagnostics.keys()
    }

    #[must_use]
    pub fn was_built(&self, uri: &DocumentUri) -> bool {
        self.diagnostics.contains_key(uri)
    }

    #[must_use]
    pub fn diagnostics(&self, uri: &DocumentUri) -> &[Diagnostic] {
        self.diagnostics.get(uri).map(Vec::as_slice).unwrap_or_default()
    }

    /// Messages for `uri` in report order.
    #[must_use]
    pub fn messages(&self, uri: &DocumentUri) -> Vec<&str> {
        self.diagnostics(uri)
            .iter()
            .map(|diagnostic| diagnostic.message.as_str())
            .collect()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.diagnostics.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.error_count() == 0
    }
}

#[derive(Default)]
pub struct Workspace {
    config: AnalysisConfig,
    documents: BTreeMap<DocumentUri, Document>,
    index: WorkspaceIndex,
    cache: ScopeCache,
    dirty: BTreeSet<DocumentUri>,
    diagnostics: BTreeMap<DocumentUri, Vec<Diagnostic>>,
}

impl Workspace {
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Registers `document`, replacing any document with the same URI.
    pub fn add_document(&mut self, document: Document) {
        let uri = document.uri.clone();
        self.documents.insert(uri.clone(), document);
        self.changed(&uri);
    }

    /// Replaces the program of an existing document.
    pub fn update_document(&mut self, document: Document) {
        self.add_document(document);
    }

    /// Removes the document at `uri`. Documents importing it are rebuilt on
    /// the next build and report the import as unindexed.
    pub fn remove_document(&mut self, uri: &DocumentUri) -> Option<Document> {
        let removed = self.documents.remove(uri)?;
        self.index.remove(uri);
        self.diagnostics.remove(uri);
        for affected in self.cache.forget(uri) {
            if self.documents.contains_key(&affected) {
                self.dirty.insert(affected);
            }
        }
        self.dirty.remove(uri);
        Some(removed)
    }

    #[must_use]
    pub fn document(&self, uri: &DocumentUri) -> Option<&Document> {
        self.documents.get(uri)
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> + '_ {
        self.documents.values()
    }

    #[must_use]
    pub fn is_dirty(&self, uri: &DocumentUri) -> bool {
        self.dirty.contains(uri)
    }

    /// Diagnostics from the most recent build of `uri`.
    #[must_use]
    pub fn diagnostics(&self, uri: &DocumentUri) -> &[Diagnostic] {
        self.diagnostics.get(uri).map(Vec::as_slice).unwrap_or_default()
    }

    /// Indexes, relinks and validates every dirty document.
    #[tracing::instrument(level = "debug", skip_all, fields(dirty = self.dirty.len()))]
    pub fn build(&mut self) -> BuildReport {
        let dirty: Vec<DocumentUri> = std::mem::take(&mut self.dirty)
            .into_iter()
            .filter(|uri| self.documents.contains_key(uri))
            .collect();

        for uri in &dirty {
            if let Some(document) = self.documents.get(uri) {
                self.index.update(uri.clone(), compute_exports(document));
            }
        }

        let mut failures: BTreeMap<DocumentUri, Vec<LinkFailure>> = BTreeMap::new();
        {
            let mut linker =
                Linker::new(&self.index, &mut self.cache, self.config.scoping.options());
            for uri in &dirty {
                if let Some(document) = self.documents.get(uri) {
                    Linker::reset(document);
                    failures.insert(uri.clone(), linker.link(document));
                }
            }
        }

        let validator =
            Validator::default().with_max_integer_width(self.config.types.max_integer_width);
        let mut report = BuildReport::default();
        for uri in dirty {
            let Some(document) = self.documents.get(&uri) else {
                continue;
            };
            let mut diagnostics: Vec<Diagnostic> = failures
                .remove(&uri)
                .unwrap_or_default()
                .into_iter()
                .map(|failure| {
                    Diagnostic::error(failure.node_id, failure.location, failure.error.to_string())
                })
                .collect();
            diagnostics.extend(validator.validate_document(document));
            tracing::debug!(document = %uri, diagnostics = diagnostics.len(), "document built");
            self.diagnostics.insert(uri.clone(), diagnostics.clone());
            report.diagnostics.insert(uri, diagnostics);
        }
        report
    }

    fn changed(&mut self, uri: &DocumentUri) {
        for affected in self.cache.invalidate(uri) {
            if self.documents.contains_key(&affected) {
                self.dirty.insert(affected);
            }
        }
    }
}

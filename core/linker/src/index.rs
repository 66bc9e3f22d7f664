//! Workspace-wide index of exported symbols.

use miniprob_ast::{document::DocumentUri, reference::ReferenceKind};
use rustc_hash::FxHashMap;

use crate::description::SymbolDescription;

/// Exports of every indexed document, keyed by URI.
///
/// A document contributes symbols to its importers only once it has been
/// indexed; [`WorkspaceIndex::contains`] tells the two situations apart.
#[derive(Debug, Default, Clone)]
pub struct WorkspaceIndex {
    exports: FxHashMap<DocumentUri, Vec<SymbolDescription>>,
}

impl WorkspaceIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the exports recorded for `uri`.
    pub fn update(&mut self, uri: DocumentUri, exports: Vec<SymbolDescription>) {
        self.exports.insert(uri, exports);
    }

    pub fn remove(&mut self, uri: &DocumentUri) -> Option<Vec<SymbolDescription>> {
        self.exports.remove(uri)
    }

    #[must_use]
    pub fn contains(&self, uri: &DocumentUri) -> bool {
        self.exports.contains_key(uri)
    }

    #[must_use]
    pub fn exports(&self, uri: &DocumentUri) -> Option<&[SymbolDescription]> {
        self.exports.get(uri).map(Vec::as_slice)
    }

    /// Exports of kind `kind` from exactly the documents in `uris`, in the
    /// order the URIs are given. Unindexed URIs contribute nothing.
    #[must_use]
    pub fn all_elements(&self, kind: ReferenceKind, uris: &[DocumentUri]) -> Vec<SymbolDescription> {
        let mut seen: Vec<&DocumentUri> = Vec::with_capacity(uris.len());
        let mut elements = Vec::new();
        for uri in uris {
            if seen.contains(&uri) {
                continue;
            }
            seen.push(uri);
            if let Some(exports) = self.exports.get(uri) {
                elements.extend(
                    exports
                        .iter()
                        .filter(|description| description.kind() == kind)
                        .cloned(),
                );
            }
        }
        elements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exports.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exports.is_empty()
    }
}

//! Per-document cache of scope tiers.
//!
//! Entries are keyed by document and tier. The cache never expires on its
//! own: the build pipeline calls [`ScopeCache::invalidate`] whenever a
//! document is rebuilt, which also drops the entries of every document that
//! (transitively) imports it.

use std::rc::Rc;

use miniprob_ast::document::DocumentUri;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::description::SymbolDescription;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    ProgramFunctions,
    ProgramDeclarations,
    ImportedFunctions,
    ImportedDeclarations,
}

#[derive(Debug, Default)]
pub struct ScopeCache {
    entries: FxHashMap<(DocumentUri, CacheKey), Rc<Vec<SymbolDescription>>>,
    /// imported document -> documents importing it
    dependents: FxHashMap<DocumentUri, FxHashSet<DocumentUri>>,
}

impl ScopeCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, uri: &DocumentUri, key: CacheKey) -> Option<Rc<Vec<SymbolDescription>>> {
        self.entries.get(&(uri.clone(), key)).cloned()
    }

    /// Returns the cached tier, computing and storing it on a miss.
    pub fn get_or_insert_with<F>(
        &mut self,
        uri: &DocumentUri,
        key: CacheKey,
        compute: F,
    ) -> Rc<Vec<SymbolDescription>>
    where
        F: FnOnce() -> Vec<SymbolDescription>,
    {
        self.entries
            .entry((uri.clone(), key))
            .or_insert_with(|| Rc::new(compute()))
            .clone()
    }

    /// Records that `importer` consumes symbols of `imported`.
    pub fn record_dependency(&mut self, importer: &DocumentUri, imported: &DocumentUri) {
        self.dependents
            .entry(imported.clone())
            .or_default()
            .insert(importer.clone());
    }

    /// Drops every entry of `uri` and of all documents depending on it.
    /// Returns the affected documents, `uri` first.
    pub fn invalidate(&mut self, uri: &DocumentUri) -> Vec<DocumentUri> {
        let mut affected = vec![uri.clone()];
        let mut visited: FxHashSet<DocumentUri> = FxHashSet::default();
        visited.insert(uri.clone());
        let mut cursor = 0;
        while let Some(current) = affected.get(cursor).cloned() {
            cursor += 1;
            if let Some(dependents) = self.dependents.get(&current) {
                let mut next: Vec<&DocumentUri> = dependents
                    .iter()
                    .filter(|dependent| !visited.contains(*dependent))
                    .collect();
                next.sort();
                for dependent in next {
                    visited.insert(dependent.clone());
                    affected.push(dependent.clone());
                }
            }
        }
        self.entries
            .retain(|(entry_uri, _), _| !visited.contains(entry_uri));
        tracing::debug!(document = %uri, affected = affected.len(), "invalidated scope cache");
        affected
    }

    /// Forgets `uri` entirely, including the dependencies it declared.
    pub fn forget(&mut self, uri: &DocumentUri) -> Vec<DocumentUri> {
        let affected = self.invalidate(uri);
        for dependents in self.dependents.values_mut() {
            dependents.remove(uri);
        }
        self.dependents.retain(|_, dependents| !dependents.is_empty());
        affected
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.dependents.clear();
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

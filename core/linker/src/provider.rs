//! Candidate scopes for reference sites.
//!
//! Call sites see the program's functions, then imported functions, then
//! (for completion only) the locals of the function currently being typed.
//! Variable uses inside a function see, in precedence order, the function's
//! locals, its parameters, the program's globals and imported globals.

use std::rc::Rc;

use miniprob_ast::{
    document::{Document, DocumentUri},
    nodes::{FileImport, Func, FuncCall, Lval},
    reference::{Reference, ReferenceKind},
};

use crate::{
    cache::{CacheKey, ScopeCache},
    computation::compute_exports,
    description::{SymbolDescription, SymbolScope},
    index::WorkspaceIndex,
    scope::Scope,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeOptions {
    /// Fold the locals of the first function with unbalanced braces into call
    /// scopes.
    pub fold_in_progress_locals: bool,
    /// Report imports whose target document has never been indexed.
    pub report_unindexed_imports: bool,
}

impl Default for ScopeOptions {
    fn default() -> Self {
        Self {
            fold_in_progress_locals: true,
            report_unindexed_imports: true,
        }
    }
}

/// A use site whose reference needs a scope.
#[derive(Debug, Clone, Copy)]
pub enum ReferenceSite<'a> {
    FunctionCall(&'a FuncCall),
    Variable(&'a Lval),
}

impl ReferenceSite<'_> {
    #[must_use]
    pub fn id(&self) -> u32 {
        match self {
            ReferenceSite::FunctionCall(call) => call.id,
            ReferenceSite::Variable(lval) => lval.id,
        }
    }

    #[must_use]
    pub fn reference(&self) -> &Reference {
        match self {
            ReferenceSite::FunctionCall(call) => &call.reference,
            ReferenceSite::Variable(lval) => &lval.reference,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ReferenceKind {
        match self {
            ReferenceSite::FunctionCall(_) => ReferenceKind::Function,
            ReferenceSite::Variable(_) => ReferenceKind::Variable,
        }
    }
}

pub struct ScopeProvider<'a> {
    index: &'a WorkspaceIndex,
    cache: &'a mut ScopeCache,
    options: ScopeOptions,
}

impl<'a> ScopeProvider<'a> {
    #[must_use]
    pub fn new(index: &'a WorkspaceIndex, cache: &'a mut ScopeCache, options: ScopeOptions) -> Self {
        Self {
            index,
            cache,
            options,
        }
    }

    #[must_use]
    pub fn options(&self) -> ScopeOptions {
        self.options
    }

    /// Candidate scope for `site`, which must belong to `document`.
    pub fn scope_for(&mut self, document: &Document, site: ReferenceSite<'_>) -> Scope {
        match site {
            ReferenceSite::FunctionCall(_) => self.call_scope(document),
            ReferenceSite::Variable(lval) => {
                match document.arena.enclosing_function(lval.id) {
                    Some(func) => self.function_variable_scope(document, &func),
                    None => {
                        let mut scope = Scope::new();
                        scope.extend(self.program_declarations(document).iter());
                        scope
                    }
                }
            }
        }
    }

    /// Records `document` as a dependent of every document it imports, whether
    /// or not any reference site ever consults the imported scopes.
    pub fn track_imports(&mut self, document: &Document) {
        for uri in document.import_uris() {
            self.cache.record_dependency(&document.uri, &uri);
        }
    }

    /// Imports of `document` whose resolved target has no index entry.
    #[must_use]
    pub fn unindexed_imports(&self, document: &Document) -> Vec<(Rc<FileImport>, DocumentUri)> {
        document
            .program
            .imports
            .iter()
            .map(|import| (import.clone(), document.uri.join(&import.path)))
            .filter(|(_, uri)| !self.index.contains(uri))
            .collect()
    }

    fn call_scope(&mut self, document: &Document) -> Scope {
        let mut scope = Scope::new();
        scope.extend(self.program_functions(document).iter());
        if document.program.has_imports() {
            scope.extend(self.imported(document, CacheKey::ImportedFunctions).iter());
        }
        if self.options.fold_in_progress_locals
            && let Some(func) = document.program.real_functions().find(|f| f.is_in_progress())
        {
            scope.extend(&local_declarations(document, func));
        }
        scope
    }

    fn function_variable_scope(&mut self, document: &Document, func: &Rc<Func>) -> Scope {
        let mut scope = Scope::new();
        scope.extend(&local_declarations(document, func));
        scope.extend(
            &func
                .params
                .iter()
                .map(|param| SymbolDescription::parameter(param, &func.name, &document.uri))
                .collect::<Vec<_>>(),
        );
        scope.extend(self.program_declarations(document).iter());
        if document.program.has_imports() {
            scope.extend(
                self.imported(document, CacheKey::ImportedDeclarations)
                    .iter()
                    .filter(|description| !description.is_function_scoped()),
            );
        }
        scope
    }

    fn program_functions(&mut self, document: &Document) -> Rc<Vec<SymbolDescription>> {
        self.cache
            .get_or_insert_with(&document.uri, CacheKey::ProgramFunctions, || {
                document
                    .program
                    .real_functions()
                    .map(|func| SymbolDescription::function(func, &document.uri))
                    .collect()
            })
    }

    fn program_declarations(&mut self, document: &Document) -> Rc<Vec<SymbolDescription>> {
        self.cache
            .get_or_insert_with(&document.uri, CacheKey::ProgramDeclarations, || {
                compute_exports(document)
                    .into_iter()
                    .filter(|description| description.kind() == ReferenceKind::Variable)
                    .collect()
            })
    }

    fn imported(&mut self, document: &Document, key: CacheKey) -> Rc<Vec<SymbolDescription>> {
        let kind = match key {
            CacheKey::ImportedFunctions | CacheKey::ProgramFunctions => ReferenceKind::Function,
            CacheKey::ImportedDeclarations | CacheKey::ProgramDeclarations => {
                ReferenceKind::Variable
            }
        };
        self.track_imports(document);
        let uris = document.import_uris();
        let index = self.index;
        self.cache.get_or_insert_with(&document.uri, key, || {
            for uri in uris.iter().filter(|uri| !index.contains(uri)) {
                tracing::warn!(document = %document.uri, import = %uri, "import target is not indexed");
            }
            index.all_elements(kind, &uris)
        })
    }
}

fn local_declarations(document: &Document, func: &Func) -> Vec<SymbolDescription> {
    let scope = SymbolScope::Function(func.name.clone());
    func.declarations
        .iter()
        .flat_map(|decl| SymbolDescription::declarations(decl, &document.uri, &scope))
        .collect()
}

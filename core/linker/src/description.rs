use std::rc::Rc;

use miniprob_ast::{
    document::DocumentUri,
    nodes::{Decl, Func, Param},
    reference::{ReferenceKind, ResolvedSymbol, SymbolTarget},
};

/// Where a described symbol was declared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SymbolScope {
    /// Program level.
    Global,
    /// Inside the named function (locals and parameters).
    Function(String),
}

/// A named, linkable symbol: the unit stored in scopes, the workspace index
/// and the scope cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolDescription {
    pub name: String,
    pub target: SymbolTarget,
    pub document: DocumentUri,
    pub scope: SymbolScope,
}

impl SymbolDescription {
    #[must_use]
    pub fn declaration(decl: &Rc<Decl>, name: &str, document: &DocumentUri, scope: SymbolScope) -> Self {
        Self {
            name: name.to_string(),
            target: SymbolTarget::declaration(decl),
            document: document.clone(),
            scope,
        }
    }

    /// One description per name bound by `decl`.
    #[must_use]
    pub fn declarations(decl: &Rc<Decl>, document: &DocumentUri, scope: &SymbolScope) -> Vec<Self> {
        decl.names
            .iter()
            .map(|name| Self::declaration(decl, name, document, scope.clone()))
            .collect()
    }

    #[must_use]
    pub fn parameter(param: &Rc<Param>, function: &str, document: &DocumentUri) -> Self {
        Self {
            name: param.name.clone(),
            target: SymbolTarget::parameter(param),
            document: document.clone(),
            scope: SymbolScope::Function(function.to_string()),
        }
    }

    #[must_use]
    pub fn function(func: &Rc<Func>, document: &DocumentUri) -> Self {
        Self {
            name: func.name.clone(),
            target: SymbolTarget::function(func),
            document: document.clone(),
            scope: SymbolScope::Global,
        }
    }

    /// Kind of reference this symbol can satisfy.
    #[must_use]
    pub fn kind(&self) -> ReferenceKind {
        match self.target {
            SymbolTarget::Declaration(_) | SymbolTarget::Parameter(_) => ReferenceKind::Variable,
            SymbolTarget::Function(_) => ReferenceKind::Function,
        }
    }

    #[must_use]
    pub fn is_function_scoped(&self) -> bool {
        matches!(self.scope, SymbolScope::Function(_))
    }

    #[must_use]
    pub fn resolve(&self) -> Option<ResolvedSymbol> {
        self.target.upgrade()
    }
}

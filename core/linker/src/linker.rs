//! Reference binding.
//!
//! The linker walks a document in pre-order, asks the [`ScopeProvider`] for
//! the candidate scope of every unresolved `Lval` and `FuncCall` reference and
//! binds it to the highest-precedence candidate of the right kind. References
//! without a candidate are marked failed; the failure is returned to the
//! caller and recorded on the reference itself.

use miniprob_ast::{
    document::Document,
    nodes::{AstNode, Expression, Location, Statement},
    reference::LinkState,
};

use crate::{
    cache::ScopeCache,
    errors::LinkError,
    index::WorkspaceIndex,
    provider::{ReferenceSite, ScopeOptions, ScopeProvider},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFailure {
    pub node_id: u32,
    pub location: Location,
    pub error: LinkError,
}

pub struct Linker<'a> {
    provider: ScopeProvider<'a>,
}

impl<'a> Linker<'a> {
    #[must_use]
    pub fn new(index: &'a WorkspaceIndex, cache: &'a mut ScopeCache, options: ScopeOptions) -> Self {
        Self {
            provider: ScopeProvider::new(index, cache, options),
        }
    }

    /// Returns every reference of `document` to the unresolved state.
    pub fn reset(document: &Document) {
        for node in document.arena.nodes_in_order() {
            if let Some(site) = reference_site(node) {
                site.reference().reset();
            }
        }
    }

    /// Links every unresolved reference of `document`.
    ///
    /// References that already failed in an earlier pass are reported again;
    /// linked ones are left alone.
    #[tracing::instrument(level = "debug", skip_all, fields(document = %document.uri))]
    pub fn link(&mut self, document: &Document) -> Vec<LinkFailure> {
        let mut failures = Vec::new();
        self.provider.track_imports(document);
        if self.provider.options().report_unindexed_imports {
            for (import, uri) in self.provider.unindexed_imports(document) {
                failures.push(LinkFailure {
                    node_id: import.id,
                    location: import.location.clone(),
                    error: LinkError::UnindexedImport {
                        path: import.path.clone(),
                        uri,
                    },
                });
            }
        }
        for node in document.arena.nodes_in_order() {
            let Some(site) = reference_site(node) else {
                continue;
            };
            if let Err(error) = self.link_site(document, site) {
                tracing::debug!(node = site.id(), %error, "link failed");
                failures.push(LinkFailure {
                    node_id: site.id(),
                    location: node.location(),
                    error,
                });
            }
        }
        failures
    }

    fn link_site(&mut self, document: &Document, site: ReferenceSite<'_>) -> Result<(), LinkError> {
        let reference = site.reference();
        let unresolved = || LinkError::Unresolved {
            kind: reference.kind,
            name: reference.name.clone(),
        };
        match reference.state() {
            LinkState::Linked(_) => return Ok(()),
            LinkState::Failed(_) => return Err(unresolved()),
            LinkState::Unresolved => {}
        }
        let scope = self.provider.scope_for(document, site);
        if let Some(candidate) = scope.lookup(&reference.name, reference.kind) {
            reference.link(candidate.target.clone())?;
            return Ok(());
        }
        let error = unresolved();
        reference.fail(error.to_string())?;
        Err(error)
    }
}

fn reference_site(node: &AstNode) -> Option<ReferenceSite<'_>> {
    match node {
        AstNode::Expression(Expression::Lval(lval)) => Some(ReferenceSite::Variable(lval)),
        AstNode::Statement(Statement::FunctionCall(call)) => {
            Some(ReferenceSite::FunctionCall(call))
        }
        _ => None,
    }
}

use miniprob_ast::{document::DocumentUri, errors::AstError, reference::ReferenceKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("Could not resolve reference to {kind} named '{name}'.")]
    Unresolved { kind: ReferenceKind, name: String },

    #[error("Imported file '{path}' could not be found in the workspace index.")]
    UnindexedImport { path: String, uri: DocumentUri },

    #[error(transparent)]
    Ast(#[from] AstError),
}

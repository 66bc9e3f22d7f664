use miniprob_ast::nodes::NodeKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidatorError {
    #[error("No validation entry for node kinds: {}", join_kinds(.0))]
    UncoveredNodeKinds(Vec<NodeKind>),
}

fn join_kinds(kinds: &[NodeKind]) -> String {
    kinds
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

//! Node kind to check dispatch.
//!
//! Every [`NodeKind`] must have an entry, even if it carries no checks;
//! [`ValidationRegistry::uncovered`] lists kinds that were forgotten so a new
//! node kind cannot silently go unvalidated.

use miniprob_ast::nodes::{AstNode, NodeKind};
use rustc_hash::FxHashMap;

use crate::checks::{self, CheckContext};

pub type Check = fn(&AstNode, &mut CheckContext<'_>);

#[derive(Clone, Default)]
pub struct ValidationRegistry {
    checks: FxHashMap<NodeKind, Vec<Check>>,
}

impl ValidationRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The full MiniProb rule set.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry
            .register(NodeKind::Lval, checks::check_array_access)
            .register(NodeKind::Lval, checks::check_lval_shape)
            .register(NodeKind::Assignment, checks::check_assignment)
            .register(NodeKind::FuncCall, checks::check_function_call)
            .register(NodeKind::Func, checks::check_function_definition)
            .register(NodeKind::Query, checks::check_query)
            .register(NodeKind::ProbChoice, checks::check_probabilistic_choice)
            .register(NodeKind::Distribution, checks::check_distribution)
            .register(NodeKind::BinaryExpression, checks::check_binary_expression)
            .register(NodeKind::LogicalNegation, checks::check_logical_negation)
            .register(NodeKind::IntegerLiteral, checks::check_integer_literal)
            .register(NodeKind::Decl, checks::check_declaration_ids)
            .register(NodeKind::Observation, checks::check_observation);
        for kind in [
            NodeKind::Program,
            NodeKind::FileImport,
            NodeKind::Param,
            NodeKind::Block,
            NodeKind::Argument,
            NodeKind::IfThenElse,
            NodeKind::While,
            NodeKind::TryCatch,
            NodeKind::Throw,
            NodeKind::BoolLiteral,
            NodeKind::ProbabilisticAssignment,
        ] {
            registry.register_unchecked(kind);
        }
        registry
    }

    pub fn register(&mut self, kind: NodeKind, check: Check) -> &mut Self {
        self.checks.entry(kind).or_default().push(check);
        self
    }

    /// Marks `kind` as deliberately carrying no checks.
    pub fn register_unchecked(&mut self, kind: NodeKind) -> &mut Self {
        self.checks.entry(kind).or_default();
        self
    }

    #[must_use]
    pub fn checks_for(&self, kind: NodeKind) -> &[Check] {
        self.checks.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// Node kinds without an entry.
    #[must_use]
    pub fn uncovered(&self) -> Vec<NodeKind> {
        NodeKind::ALL
            .into_iter()
            .filter(|kind| !self.checks.contains_key(kind))
            .collect()
    }
}

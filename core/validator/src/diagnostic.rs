use core::fmt;
use std::fmt::{Display, Formatter};

use miniprob_ast::nodes::Location;
use rustc_hash::FxHashSet;

/// Every rule violation is currently an error; there are no warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic attached to a node, optionally narrowed to one of its
/// properties and, for list properties, to an element index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub node_id: u32,
    pub location: Location,
    pub property: Option<&'static str>,
    pub index: Option<usize>,
}

impl Diagnostic {
    #[must_use]
    pub fn error(node_id: u32, location: Location, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            node_id,
            location,
            property: None,
            index: None,
        }
    }

    #[must_use]
    pub fn with_property(mut self, property: &'static str) -> Self {
        self.property = Some(property);
        self
    }

    #[must_use]
    pub fn at_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.location, self.severity, self.message)
    }
}

type DiagnosticKey = (u32, Option<&'static str>, Option<usize>, String);

/// Collects diagnostics for one document, dropping exact repeats.
///
/// Inference errors are reported by every check that meets them; attaching
/// them to their source node lets the repeats collapse here.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
    reported: FxHashSet<DiagnosticKey>,
}

impl DiagnosticSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when an identical diagnostic was already accepted.
    pub fn accept(&mut self, diagnostic: Diagnostic) -> bool {
        let key = (
            diagnostic.node_id,
            diagnostic.property,
            diagnostic.index,
            diagnostic.message.clone(),
        );
        if !self.reported.insert(key) {
            return false;
        }
        self.diagnostics.push(diagnostic);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

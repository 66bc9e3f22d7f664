use core::fmt;
use std::{
    fmt::{Display, Formatter},
    rc::Rc,
};

use crate::{arena::Arena, nodes::Program};

/// Identity of a document in the workspace, e.g. `file:///project/main.mp`.
///
/// Only the path component takes part in import resolution; it is treated
/// with POSIX semantics regardless of the host platform.
#[derive(Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct DocumentUri(String);

impl DocumentUri {
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn split(&self) -> (&str, &str) {
        match self.0.find("://") {
            Some(scheme_end) => {
                let after_scheme = scheme_end + 3;
                let path_start = self.0[after_scheme..]
                    .find('/')
                    .map_or(self.0.len(), |offset| after_scheme + offset);
                self.0.split_at(path_start)
            }
            None => ("", self.0.as_str()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        self.split().1
    }

    /// Directory of the path, `dirname`-style (`/a/b.mp` -> `/a`).
    #[must_use]
    pub fn dirname(&self) -> String {
        let path = self.path();
        match path.rfind('/') {
            Some(0) => "/".to_string(),
            Some(index) => path[..index].to_string(),
            None => ".".to_string(),
        }
    }

    /// Resolves `relative` against this document's directory and returns the
    /// resulting URI with the same scheme and authority.
    #[must_use]
    pub fn join(&self, relative: &str) -> DocumentUri {
        let (prefix, _) = self.split();
        let joined = if relative.starts_with('/') {
            relative.to_string()
        } else {
            format!("{}/{relative}", self.dirname())
        };
        DocumentUri(format!("{prefix}{}", normalize(&joined)))
    }
}

fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push("..");
                }
            }
            _ => segments.push(segment),
        }
    }
    let joined = segments.join("/");
    if absolute {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

impl Display for DocumentUri {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentUri {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One parsed source file.
#[derive(Clone, Debug)]
pub struct Document {
    pub uri: DocumentUri,
    pub program: Rc<Program>,
    pub arena: Arena,
}

impl Document {
    #[must_use]
    pub fn new(uri: impl Into<DocumentUri>, program: Rc<Program>) -> Self {
        let arena = Arena::from_program(&program);
        Self {
            uri: uri.into(),
            program,
            arena,
        }
    }

    /// URIs of the imported documents, in import order.
    #[must_use]
    pub fn import_uris(&self) -> Vec<DocumentUri> {
        self.program
            .imports
            .iter()
            .map(|import| self.uri.join(&import.path))
            .collect()
    }
}

//! Cross-references from use sites to declarations and functions.
//!
//! A [`Reference`] is created unresolved together with its use-site node
//! (`Lval` or `FuncCall`) and is resolved exactly once by the linker, either
//! to a target node or to an error message. Targets are held through [`Weak`]
//! pointers: a reference never keeps its target alive.

use core::fmt;
use std::{
    cell::RefCell,
    fmt::{Display, Formatter},
    rc::{Rc, Weak},
};

use crate::{
    errors::AstError,
    nodes::{Decl, Func, Param},
};

/// What a reference is expected to point at.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ReferenceKind {
    /// A variable use, resolved to a `Decl` or a `Param`.
    Variable,
    /// A call or query target, resolved to a `Func`.
    Function,
}

impl Display for ReferenceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Variable => write!(f, "Decl"),
            ReferenceKind::Function => write!(f, "Func"),
        }
    }
}

/// Non-owning link to the node a reference was bound to.
#[derive(Clone, Debug)]
pub enum SymbolTarget {
    Declaration(Weak<Decl>),
    Parameter(Weak<Param>),
    Function(Weak<Func>),
}

impl SymbolTarget {
    #[must_use]
    pub fn declaration(decl: &Rc<Decl>) -> Self {
        SymbolTarget::Declaration(Rc::downgrade(decl))
    }

    #[must_use]
    pub fn parameter(param: &Rc<Param>) -> Self {
        SymbolTarget::Parameter(Rc::downgrade(param))
    }

    #[must_use]
    pub fn function(func: &Rc<Func>) -> Self {
        SymbolTarget::Function(Rc::downgrade(func))
    }

    /// Returns `None` when the target node has been dropped, e.g. because the
    /// document that owned it was rebuilt.
    #[must_use]
    pub fn upgrade(&self) -> Option<ResolvedSymbol> {
        match self {
            SymbolTarget::Declaration(decl) => decl.upgrade().map(ResolvedSymbol::Declaration),
            SymbolTarget::Parameter(param) => param.upgrade().map(ResolvedSymbol::Parameter),
            SymbolTarget::Function(func) => func.upgrade().map(ResolvedSymbol::Function),
        }
    }

    #[must_use]
    pub fn matches(&self, kind: ReferenceKind) -> bool {
        match self {
            SymbolTarget::Declaration(_) | SymbolTarget::Parameter(_) => {
                kind == ReferenceKind::Variable
            }
            SymbolTarget::Function(_) => kind == ReferenceKind::Function,
        }
    }
}

impl PartialEq for SymbolTarget {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SymbolTarget::Declaration(a), SymbolTarget::Declaration(b)) => Weak::ptr_eq(a, b),
            (SymbolTarget::Parameter(a), SymbolTarget::Parameter(b)) => Weak::ptr_eq(a, b),
            (SymbolTarget::Function(a), SymbolTarget::Function(b)) => Weak::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for SymbolTarget {}

/// Strong view of a live reference target.
#[derive(Clone, Debug)]
pub enum ResolvedSymbol {
    Declaration(Rc<Decl>),
    Parameter(Rc<Param>),
    Function(Rc<Func>),
}

impl ResolvedSymbol {
    #[must_use]
    pub fn id(&self) -> u32 {
        match self {
            ResolvedSymbol::Declaration(decl) => decl.id,
            ResolvedSymbol::Parameter(param) => param.id,
            ResolvedSymbol::Function(func) => func.id,
        }
    }

    #[must_use]
    pub fn as_function(&self) -> Option<&Rc<Func>> {
        match self {
            ResolvedSymbol::Function(func) => Some(func),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum LinkState {
    #[default]
    Unresolved,
    Linked(SymbolTarget),
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    pub name: String,
    pub kind: ReferenceKind,
    state: RefCell<LinkState>,
}

impl Reference {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ReferenceKind) -> Self {
        Self {
            name: name.into(),
            kind,
            state: RefCell::new(LinkState::Unresolved),
        }
    }

    #[must_use]
    pub fn state(&self) -> LinkState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !matches!(*self.state.borrow(), LinkState::Unresolved)
    }

    /// Returns the live target, if the reference was linked and the target
    /// node still exists.
    #[must_use]
    pub fn target(&self) -> Option<ResolvedSymbol> {
        match &*self.state.borrow() {
            LinkState::Linked(target) => target.upgrade(),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        match &*self.state.borrow() {
            LinkState::Failed(message) => Some(message.clone()),
            _ => None,
        }
    }

    /// Binds the reference to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::ReferenceAlreadyResolved`] if the reference was
    /// already linked or failed.
    pub fn link(&self, target: SymbolTarget) -> Result<(), AstError> {
        self.settle(LinkState::Linked(target))
    }

    /// Marks the reference as unresolvable.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::ReferenceAlreadyResolved`] if the reference was
    /// already linked or failed.
    pub fn fail(&self, message: impl Into<String>) -> Result<(), AstError> {
        self.settle(LinkState::Failed(message.into()))
    }

    /// Returns the reference to the unresolved state so it can be relinked
    /// after the documents it depends on were rebuilt.
    pub fn reset(&self) {
        *self.state.borrow_mut() = LinkState::Unresolved;
    }

    fn settle(&self, state: LinkState) -> Result<(), AstError> {
        let mut current = self.state.borrow_mut();
        if !matches!(*current, LinkState::Unresolved) {
            return Err(AstError::ReferenceAlreadyResolved {
                name: self.name.clone(),
            });
        }
        *current = state;
        Ok(())
    }
}

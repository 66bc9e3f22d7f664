use miniprob_ast::reference::ReferenceKind;
use rustc_hash::FxHashMap;

use crate::description::SymbolDescription;

/// Ordered, name-keyed candidate set for one reference site.
///
/// Tiers are inserted from highest to lowest precedence; the first symbol
/// inserted under a name wins and later ones are kept only for completion.
#[derive(Debug, Default, Clone)]
pub struct Scope {
    elements: Vec<SymbolDescription>,
    by_name: FxHashMap<String, usize>,
}

impl Scope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the name was already bound by an earlier tier.
    pub fn insert(&mut self, description: SymbolDescription) -> bool {
        let position = self.elements.len();
        let fresh = !self.by_name.contains_key(&description.name);
        if fresh {
            self.by_name.insert(description.name.clone(), position);
        }
        self.elements.push(description);
        fresh
    }

    pub fn extend<'a, I>(&mut self, tier: I)
    where
        I: IntoIterator<Item = &'a SymbolDescription>,
    {
        for description in tier {
            self.insert(description.clone());
        }
    }

    /// The winning symbol for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SymbolDescription> {
        self.by_name.get(name).map(|&position| &self.elements[position])
    }

    /// The highest-precedence symbol for `name` that can satisfy a reference
    /// of `kind`.
    #[must_use]
    pub fn lookup(&self, name: &str, kind: ReferenceKind) -> Option<&SymbolDescription> {
        self.elements
            .iter()
            .find(|description| description.name == name && description.kind() == kind)
    }

    /// Every candidate in insertion order, shadowed ones included.
    #[must_use]
    pub fn all_elements(&self) -> &[SymbolDescription] {
        &self.elements
    }

    /// Names visible from this scope, each once, in precedence order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut positions: Vec<usize> = self.by_name.values().copied().collect();
        positions.sort_unstable();
        positions
            .into_iter()
            .map(|position| self.elements[position].name.as_str())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

use crate::nodes::{Ast, AstNode, Definition, Func, Program};
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// Flat index over one program tree: every node by id, the parent route of
/// each node and the pre-order visiting sequence.
#[derive(Default, Clone, Debug)]
pub struct Arena {
    pub(crate) nodes: FxHashMap<u32, AstNode>,
    pub(crate) node_routes: FxHashMap<u32, NodeRoute>,
    pub(crate) order: Vec<u32>,
}

impl Arena {
    /// Indexes `program` by walking it in pre-order.
    #[must_use]
    pub fn from_program(program: &Rc<Program>) -> Self {
        let mut arena = Arena::default();
        let mut stack: Vec<(AstNode, Option<u32>)> =
            vec![(AstNode::Ast(Ast::Program(program.clone())), None)];
        while let Some((node, parent)) = stack.pop() {
            let id = node.id();
            let children = node.children();
            for child in children.into_iter().rev() {
                stack.push((child, Some(id)));
            }
            arena.add_node(node, parent);
        }
        arena
    }

    #[must_use]
    pub fn program(&self) -> Option<Rc<Program>> {
        self.order.first().and_then(|id| match self.nodes.get(id) {
            Some(AstNode::Ast(Ast::Program(program))) => Some(program.clone()),
            _ => None,
        })
    }

    #[must_use]
    pub fn functions(&self) -> Vec<Rc<Func>> {
        self.list_nodes_cmp(|node| {
            if let AstNode::Definition(Definition::Function(func)) = node {
                Some(func.clone())
            } else {
                None
            }
        })
        .collect()
    }

    /// Adds a node to the arena and records its parent-child relationship.
    ///
    /// A node that is already present is ignored, so shared subtrees are
    /// indexed once, under their first parent.
    pub fn add_node(&mut self, node: AstNode, parent_id: Option<u32>) {
        let id = node.id();
        if self.nodes.contains_key(&id) {
            return;
        }
        self.nodes.insert(id, node);
        self.order.push(id);
        if let Some(parent) = parent_id.and_then(|parent| self.node_routes.get_mut(&parent)) {
            parent.children.push(id);
        }
        self.node_routes.insert(
            id,
            NodeRoute {
                id,
                parent: parent_id,
                children: vec![],
            },
        );
    }

    #[must_use]
    pub fn find_node(&self, id: u32) -> Option<AstNode> {
        self.nodes.get(&id).cloned()
    }

    #[must_use]
    pub fn contains(&self, id: u32) -> bool {
        self.nodes.contains_key(&id)
    }

    #[must_use]
    pub fn find_parent_node(&self, id: u32) -> Option<u32> {
        self.node_routes.get(&id).and_then(|route| route.parent)
    }

    /// Walks parent routes from `id` (inclusive) and returns the first node
    /// accepted by `predicate`.
    pub fn find_ancestor<T, F>(&self, id: u32, predicate: F) -> Option<T>
    where
        F: Fn(&AstNode) -> Option<T>,
    {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if let Some(found) = self.nodes.get(&node_id).and_then(&predicate) {
                return Some(found);
            }
            current = self.find_parent_node(node_id);
        }
        None
    }

    /// Nearest `Func` containing the node, if any.
    #[must_use]
    pub fn enclosing_function(&self, id: u32) -> Option<Rc<Func>> {
        self.find_ancestor(id, |node| match node {
            AstNode::Definition(Definition::Function(func)) => Some(func.clone()),
            _ => None,
        })
    }

    #[must_use]
    pub fn children(&self, id: u32) -> Vec<AstNode> {
        self.node_routes
            .get(&id)
            .map(|route| {
                route
                    .children
                    .iter()
                    .filter_map(|child_id| self.nodes.get(child_id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All nodes in pre-order.
    pub fn nodes_in_order(&self) -> impl Iterator<Item = &AstNode> + '_ {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Nodes accepted by `fn_predicate`, in pre-order.
    pub fn filter_nodes<T: Fn(&AstNode) -> bool>(&self, fn_predicate: T) -> Vec<AstNode> {
        self.nodes_in_order()
            .filter(|node| fn_predicate(node))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn list_nodes_cmp<'a, T, F>(&'a self, cmp: F) -> impl Iterator<Item = T> + 'a
    where
        F: Fn(&AstNode) -> Option<T> + 'a,
        T: Clone + 'static,
    {
        self.nodes_in_order().filter_map(move |node| cmp(node))
    }
}

#[derive(Clone, Default, Debug)]
pub struct NodeRoute {
    pub id: u32,
    parent: Option<u32>,
    children: Vec<u32>,
}

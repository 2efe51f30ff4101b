use serde::Serialize;
use std::fmt;
use std::ops::Index;

use crate::State;

/// Stable handle for a node in a [`Tree`]
///
/// Ids are handed out in discovery order, which the frontier relies on to break ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A discovered state and how the search got there
#[derive(Debug, Clone)]
pub struct Node<S: State> {
    pub state: S,
    pub heuristic: u32,
    pub parent: Option<NodeId>,
    /// The move from the parent, `None` for the root
    pub step: Option<S::Step>,
    pub children: Vec<NodeId>,
}

/// Arena owning every node discovered during one search
///
/// Parent and child links are ids into the arena, so the whole tree is dropped at once.
#[derive(Debug, Clone)]
pub struct Tree<S: State> {
    nodes: Vec<Node<S>>,
}

impl<S: State> Default for Tree<S> {
    fn default() -> Self {
        Tree { nodes: Vec::new() }
    }
}

impl<S: State> Tree<S> {
    pub fn new() -> Self {
        Tree::default()
    }

    fn push(&mut self, node: Node<S>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn add_root(&mut self, state: S) -> NodeId {
        let heuristic = state.heuristic();
        self.push(Node {
            state,
            heuristic,
            parent: None,
            step: None,
            children: Vec::new(),
        })
    }

    pub fn add_child(&mut self, parent: NodeId, step: S::Step, state: S) -> NodeId {
        let heuristic = state.heuristic();
        let id = self.push(Node {
            state,
            heuristic,
            parent: Some(parent),
            step: Some(step),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node<S>> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Ids from the root down to `id`, inclusive at both ends
    pub fn path(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = id;

        while let Some(parent) = self[current].parent {
            path.push(parent);
            current = parent;
        }

        path.reverse();
        path
    }

    /// Moves taken from the root to reach `id`
    pub fn steps(&self, id: NodeId) -> Vec<S::Step> {
        self.path(id)
            .into_iter()
            .filter_map(|id| self[id].step)
            .collect()
    }

    pub fn depth(&self, id: NodeId) -> usize {
        self.path(id).len() - 1
    }
}

impl<S: State> Index<NodeId> for Tree<S> {
    type Output = Node<S>;

    fn index(&self, id: NodeId) -> &Node<S> {
        &self.nodes[id.0]
    }
}

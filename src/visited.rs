use fxhash::FxHashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;

use crate::node::NodeId;

/// Every state seen during one search, mapped to the node that found it first
#[derive(Debug, Clone)]
pub struct VisitedSet<S> {
    seen: FxHashMap<S, NodeId>,
}

impl<S> Default for VisitedSet<S> {
    fn default() -> Self {
        VisitedSet {
            seen: FxHashMap::default(),
        }
    }
}

impl<S: Eq + Hash> VisitedSet<S> {
    pub fn new() -> Self {
        VisitedSet::default()
    }

    pub fn contains(&self, state: &S) -> bool {
        self.seen.contains_key(state)
    }

    /// Record `state` as found by `id`; returns false and keeps the first owner if already seen
    pub fn insert(&mut self, state: S, id: NodeId) -> bool {
        match self.seen.entry(state) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(id);
                true
            }
        }
    }

    pub fn get(&self, state: &S) -> Option<NodeId> {
        self.seen.get(state).copied()
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod test_visited {
    use super::*;
    use crate::{Board, Direction, Tree};

    #[test]
    fn test_first_owner_wins() {
        let goal = Board::goal();
        let moved = goal.slide(Direction::Right).unwrap();

        let mut tree = Tree::new();
        let root = tree.add_root(goal);
        let child = tree.add_child(root, Direction::Right, moved);
        let back = tree.add_child(child, Direction::Left, goal);

        let mut visited = VisitedSet::new();
        assert!(visited.is_empty());
        assert!(visited.insert(goal, root));
        assert!(visited.insert(moved, child));
        assert!(!visited.insert(goal, back));

        assert_eq!(visited.len(), 2);
        assert!(visited.contains(&goal));
        assert_eq!(visited.get(&goal), Some(root));
        assert_eq!(visited.get(&moved), Some(child));
    }

    #[test]
    fn test_unknown_state() {
        let visited: VisitedSet<Board> = VisitedSet::new();
        assert!(!visited.contains(&Board::goal()));
        assert_eq!(visited.get(&Board::goal()), None);
    }
}

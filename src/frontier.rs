//! Best-first frontier of discovered but unexpanded nodes.

use priority_queue::PriorityQueue;
use std::cmp::Reverse;

use crate::node::NodeId;

/// Min-queue of node ids keyed on heuristic value
///
/// `PriorityQueue` pops the largest priority, so keys are wrapped in `Reverse`. Equal
/// heuristics fall back to the node id, so the earliest discovered node comes out first.
#[derive(Debug, Clone)]
pub struct Frontier {
    queue: PriorityQueue<NodeId, Reverse<(u32, NodeId)>>,
    high_water: usize,
}

impl Default for Frontier {
    fn default() -> Self {
        Frontier {
            queue: PriorityQueue::new(),
            high_water: 0,
        }
    }
}

impl Frontier {
    pub fn new() -> Self {
        Frontier::default()
    }

    pub fn push(&mut self, id: NodeId, heuristic: u32) {
        self.queue.push(id, Reverse((heuristic, id)));
        self.high_water = self.high_water.max(self.queue.len());
    }

    /// Remove the node with the lowest heuristic
    pub fn pop(&mut self) -> Option<NodeId> {
        self.queue.pop().map(|(id, _)| id)
    }

    /// Lowest heuristic still waiting, if any
    pub fn peek_heuristic(&self) -> Option<u32> {
        self.queue.peek().map(|(_, Reverse((heuristic, _)))| *heuristic)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Largest the frontier has ever been
    pub fn high_water(&self) -> usize {
        self.high_water
    }
}

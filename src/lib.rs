use core::fmt::Debug;
use std::hash::Hash;

pub mod board;
pub mod direction;
pub mod error;
pub mod frontier;
pub mod node;
pub mod point;
pub mod solver;
pub mod visited;

pub use board::Board;
pub use direction::Direction;
pub use error::{Malformation, PuzzleError};
pub use node::{Node, NodeId, Tree};
pub use solver::{Outcome, Solution, Solver, SolverConfig, SolverConfigBuilder, Status};

/// A position in a puzzle that can be searched
///
/// The value itself doubles as its canonical key: two states that compare equal are the same
/// configuration and are only ever expanded once per search.
pub trait State: Clone + Eq + Hash {
    /// The move that leads from one state to the next
    type Step: Copy + Debug;

    /// Every state reachable in one move, in a fixed order
    fn next_states(&self) -> Vec<(Self::Step, Self)>
    where
        Self: Sized;

    /// Estimated distance to a solution, zero only when solved
    fn heuristic(&self) -> u32;

    fn is_solved(&self) -> bool {
        self.heuristic() == 0
    }

    fn stringify(&self) -> String;
}

/// Solve a board with the default configuration
pub fn solve(board: Board) -> Solution<Board> {
    Solver::new(SolverConfig::default(), board).solution()
}

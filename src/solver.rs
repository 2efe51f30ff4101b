use derive_builder::Builder;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::frontier::Frontier;
use crate::node::{Node, NodeId, Tree};
use crate::visited::VisitedSet;
use crate::State;

pub const TIME_LIMIT_VAR: &str = "EIGHT_PUZZLE_TIME_LIMIT";
pub const MAX_STATES_VAR: &str = "EIGHT_PUZZLE_MAX_STATES";

#[derive(Debug, Clone, Builder)]
#[builder(default)]
pub struct SolverConfig {
    /// Stop with the best state so far once a search has run this long
    #[builder(setter(strip_option))]
    pub time_limit: Option<Duration>,
    /// Stop with the best state so far once this many states have been seen
    #[builder(setter(strip_option))]
    pub max_states: Option<usize>,
    /// Log progress every this many expansions, 0 to disable
    pub progress_interval: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            time_limit: None,
            max_states: None,
            progress_interval: 100_000,
        }
    }
}

impl SolverConfig {
    /// Default configuration with limits taken from `EIGHT_PUZZLE_TIME_LIMIT` (seconds) and
    /// `EIGHT_PUZZLE_MAX_STATES`
    pub fn from_env() -> SolverConfig {
        SolverConfig::from_vars(|name| std::env::var(name).ok())
    }

    pub fn from_vars<F>(lookup: F) -> SolverConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = SolverConfig::default();

        if let Some(seconds) = parse_var::<f64, _>(&lookup, TIME_LIMIT_VAR) {
            if seconds.is_finite() && seconds >= 0.0 {
                config.time_limit = Some(Duration::from_secs_f64(seconds));
            } else {
                log::warn!("Ignoring {TIME_LIMIT_VAR}={seconds}, must be a non-negative number");
            }
        }

        if let Some(states) = parse_var::<usize, _>(&lookup, MAX_STATES_VAR) {
            config.max_states = Some(states);
        }

        config
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(name)?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            log::warn!("Ignoring {name}={value:?}, could not parse it");
            None
        }
    }
}

/// How a search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    /// Found a state with a heuristic of zero
    Solved,
    /// Every reachable state was seen without solving
    Exhausted,
    /// Stopped early by a time or state limit
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub status: Status,
    /// The solved node, or the best one seen when not solved
    pub node: NodeId,
}

/// Everything a caller needs from a finished search, detached from the solver
#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = "S: Serialize, S::Step: Serialize"))]
pub struct Solution<S: State> {
    pub status: Status,
    pub state: S,
    pub heuristic: u32,
    pub moves: usize,
    pub path: Vec<S>,
    pub steps: Vec<S::Step>,
    pub states_visited: usize,
    pub time_spent: f32,
}

/// Greedy best-first search
///
/// The frontier is ordered purely by heuristic, with no accumulated path cost, so paths are not
/// guaranteed to be shortest. Each state is expanded at most once.
#[derive(Debug)]
pub struct Solver<S: State> {
    config: SolverConfig,
    tree: Tree<S>,
    visited: VisitedSet<S>,
    frontier: Frontier,
    root: NodeId,
    best: NodeId,
    outcome: Option<Outcome>,
    expanded: usize,
    time_spent: f32,
}

impl<S: State> Solver<S> {
    pub fn new(config: SolverConfig, initial_state: S) -> Solver<S> {
        let mut tree = Tree::new();
        let mut visited = VisitedSet::new();
        let mut frontier = Frontier::new();

        let root = tree.add_root(initial_state.clone());
        visited.insert(initial_state, root);
        frontier.push(root, tree[root].heuristic);

        // Nothing to search for if we start solved
        let outcome = if tree[root].state.is_solved() {
            Some(Outcome {
                status: Status::Solved,
                node: root,
            })
        } else {
            None
        };

        Solver {
            config,
            tree,
            visited,
            frontier,
            root,
            best: root,
            outcome,
            expanded: 0,
            time_spent: 0.0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn best(&self) -> NodeId {
        self.best
    }

    pub fn node(&self, id: NodeId) -> &Node<S> {
        &self.tree[id]
    }

    pub fn tree(&self) -> &Tree<S> {
        &self.tree
    }

    /// The node that first discovered `state`, if it has been seen
    pub fn visited_node(&self, state: &S) -> Option<NodeId> {
        self.visited.get(state)
    }

    pub fn states_visited(&self) -> usize {
        self.visited.len()
    }

    pub fn states_expanded(&self) -> usize {
        self.expanded
    }

    pub fn in_queue(&self) -> usize {
        self.frontier.len()
    }

    pub fn time_spent(&self) -> f32 {
        self.time_spent
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn path(&self, id: NodeId) -> Vec<NodeId> {
        self.tree.path(id)
    }

    pub fn steps(&self, id: NodeId) -> Vec<S::Step> {
        self.tree.steps(id)
    }

    /// Search until solved, exhausted, or out of budget
    ///
    /// Running a finished solver again returns the same outcome without searching.
    pub fn run(&mut self) -> Outcome {
        if let Some(outcome) = self.outcome {
            return outcome;
        }

        let start = Instant::now();
        let outcome = self.search(start);
        self.time_spent += start.elapsed().as_secs_f32();
        self.outcome = Some(outcome);

        log::info!(
            "{self} finished {:?} with heuristic {} after {} moves",
            outcome.status,
            self.tree[outcome.node].heuristic,
            self.tree.depth(outcome.node),
        );

        outcome
    }

    fn search(&mut self, start: Instant) -> Outcome {
        loop {
            if self.out_of_budget(start) {
                return Outcome {
                    status: Status::Interrupted,
                    node: self.best,
                };
            }

            let Some(current) = self.frontier.pop() else {
                break;
            };
            self.expanded += 1;

            let interval = self.config.progress_interval;
            if interval > 0 && self.expanded % interval == 0 {
                log::debug!(
                    "{self}, next heuristic {:?}, best so far:\n{}",
                    self.frontier.peek_heuristic(),
                    self.tree[self.best].state.stringify()
                );
            }

            let state = self.tree[current].state.clone();
            for (step, next_state) in state.next_states() {
                if self.visited.contains(&next_state) {
                    continue;
                }

                let child = self.tree.add_child(current, step, next_state.clone());
                self.visited.insert(next_state, child);

                let heuristic = self.tree[child].heuristic;
                self.frontier.push(child, heuristic);

                // Stop at the first solution, the rest of the frontier is dropped
                if self.tree[child].state.is_solved() {
                    return Outcome {
                        status: Status::Solved,
                        node: child,
                    };
                }

                if heuristic < self.tree[self.best].heuristic {
                    self.best = child;
                }
            }
        }

        Outcome {
            status: Status::Exhausted,
            node: self.best,
        }
    }

    fn out_of_budget(&self, start: Instant) -> bool {
        if let Some(limit) = self.config.time_limit {
            if start.elapsed() >= limit {
                log::warn!("{self} hit the time limit of {limit:?}");
                return true;
            }
        }

        if let Some(max_states) = self.config.max_states {
            if self.visited.len() >= max_states {
                log::warn!("{self} hit the limit of {max_states} states");
                return true;
            }
        }

        false
    }

    /// Run if needed and package the result
    pub fn solution(&mut self) -> Solution<S> {
        let outcome = self.run();
        let node = &self.tree[outcome.node];
        let path = self.tree.path(outcome.node);

        Solution {
            status: outcome.status,
            state: node.state.clone(),
            heuristic: node.heuristic,
            moves: path.len() - 1,
            path: path
                .iter()
                .map(|&id| self.tree[id].state.clone())
                .collect(),
            steps: self.tree.steps(outcome.node),
            states_visited: self.visited.len(),
            time_spent: self.time_spent,
        }
    }
}

impl<S: State> fmt::Display for Solver<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Solver<{} visited, {} expanded, {} queued (max {}), best {}, {:.3} seconds>",
            self.visited.len(),
            self.expanded,
            self.frontier.len(),
            self.frontier.high_water(),
            self.tree[self.best].heuristic,
            self.time_spent,
        )
    }
}

#[cfg(test)]
mod test_solver {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rayon::iter::{IntoParallelIterator, ParallelIterator};

    use super::*;
    use crate::{Board, Direction};

    // Every board in the slide graph's odd parity class
    const UNSOLVABLE_COMPONENT: usize = 181_440;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    fn solve(board: Board) -> Solution<Board> {
        Solver::new(SolverConfig::default(), board).solution()
    }

    // Replaying the recorded steps must walk the recorded path
    fn assert_consistent(solution: &Solution<Board>) {
        assert_eq!(solution.path.len(), solution.moves + 1);
        assert_eq!(solution.steps.len(), solution.moves);
        assert_eq!(solution.path.last(), Some(&solution.state));

        for (pair, step) in solution.path.windows(2).zip(solution.steps.iter()) {
            assert_eq!(pair[0].slide(*step), Some(pair[1]));
        }
    }

    #[test]
    fn test_goal_is_solved_immediately() {
        let mut solver = Solver::new(SolverConfig::default(), Board::goal());
        let outcome = solver.run();

        assert_eq!(outcome.status, Status::Solved);
        assert_eq!(outcome.node, solver.root());
        assert_eq!(solver.path(outcome.node).len(), 1);
        assert_eq!(solver.states_visited(), 1);
        assert_eq!(solver.states_expanded(), 0);
    }

    #[test]
    fn test_one_move_from_goal() {
        let solution = solve(board("123456708"));

        assert_eq!(solution.status, Status::Solved);
        assert_eq!(solution.moves, 1);
        assert_eq!(solution.path, vec![board("123456708"), Board::goal()]);
        assert_eq!(solution.steps, vec![Direction::Left]);
        assert_eq!(solution.heuristic, 0);
        assert_consistent(&solution);
    }

    #[test]
    fn test_solves_scrambled_board() {
        let solution = solve(board("867254301"));

        assert_eq!(solution.status, Status::Solved);
        assert!(solution.state.is_goal());
        assert!(solution.moves >= 1);
        assert_consistent(&solution);
    }

    #[test]
    fn test_unsolvable_board_is_exhausted() {
        let start = board("213456780");

        let mut solver = Solver::new(SolverConfig::default(), start);
        let outcome = solver.run();

        assert_eq!(outcome.status, Status::Exhausted);
        assert_eq!(solver.states_visited(), UNSOLVABLE_COMPONENT);
        assert_eq!(solver.tree().len(), UNSOLVABLE_COMPONENT);
        assert!(solver.in_queue() == 0);

        // Nothing in this parity class gets closer than the starting swap
        let best = solver.node(outcome.node);
        assert_eq!(best.heuristic, 2);
        assert_eq!(outcome.node, solver.root());
        assert!(solver
            .tree()
            .ids()
            .all(|id| solver.node(id).heuristic >= best.heuristic));

        // A second run is a fresh search with the same answer
        let again = solve(start);
        assert_eq!(again.status, Status::Exhausted);
        assert_eq!(again.state, best.state);
        assert_eq!(again.moves, 0);
        assert_eq!(again.states_visited, UNSOLVABLE_COMPONENT);
    }

    #[test]
    fn test_visited_has_one_node_per_state() {
        let mut solver = Solver::new(SolverConfig::default(), board("413726580"));
        solver.run();

        assert_eq!(solver.states_visited(), solver.tree().len());
        for id in solver.tree().ids() {
            assert_eq!(solver.visited_node(&solver.node(id).state), Some(id));
        }
    }

    #[test]
    fn test_best_never_worse_than_root() {
        let config = SolverConfigBuilder::default()
            .max_states(50)
            .build()
            .unwrap();
        let mut solver = Solver::new(config, board("087654321"));
        let solution = solver.solution();

        assert!(solution.heuristic <= board("087654321").heuristic());
        assert_consistent(&solution);
    }

    #[test]
    fn test_max_states_interrupts() {
        let config = SolverConfigBuilder::default()
            .max_states(10)
            .build()
            .unwrap();
        let mut solver = Solver::new(config, board("213456780"));
        let outcome = solver.run();

        assert_eq!(outcome.status, Status::Interrupted);
        // Checked once per expansion, so at most one expansion's worth of overshoot
        assert!(solver.states_visited() >= 10);
        assert!(solver.states_visited() < 10 + 4);
    }

    #[test]
    fn test_zero_time_limit_interrupts_before_expanding() {
        let config = SolverConfigBuilder::default()
            .time_limit(Duration::ZERO)
            .build()
            .unwrap();
        let mut solver = Solver::new(config, board("867254301"));
        let outcome = solver.run();

        assert_eq!(outcome.status, Status::Interrupted);
        assert_eq!(outcome.node, solver.root());
        assert_eq!(solver.states_expanded(), 0);
    }

    #[test]
    fn test_run_is_idempotent() {
        let mut solver = Solver::new(SolverConfig::default(), board("413726580"));
        let first = solver.run();
        let visited = solver.states_visited();

        assert_eq!(solver.run(), first);
        assert_eq!(solver.outcome(), Some(first));
        assert_eq!(solver.states_visited(), visited);
    }

    #[test]
    fn test_random_boards_are_deterministic() {
        let mut rng = StdRng::seed_from_u64(0x8);
        let boards: Vec<Board> = (0..32).map(|_| Board::random_solvable(&mut rng)).collect();

        let results = boards
            .into_par_iter()
            .map(|board| (solve(board), solve(board)))
            .collect::<Vec<_>>();

        for (first, second) in results {
            assert_eq!(first.status, Status::Solved);
            assert_consistent(&first);

            assert_eq!(first.status, second.status);
            assert_eq!(first.state, second.state);
            assert_eq!(first.path, second.path);
            assert_eq!(first.states_visited, second.states_visited);
        }
    }

    #[test]
    fn test_config_from_vars() {
        let config = SolverConfig::from_vars(|name| match name {
            TIME_LIMIT_VAR => Some("1.5".to_string()),
            MAX_STATES_VAR => Some("1000".to_string()),
            _ => None,
        });
        assert_eq!(config.time_limit, Some(Duration::from_millis(1500)));
        assert_eq!(config.max_states, Some(1000));

        let config = SolverConfig::from_vars(|name| match name {
            TIME_LIMIT_VAR => Some("-3".to_string()),
            MAX_STATES_VAR => Some("lots".to_string()),
            _ => None,
        });
        assert_eq!(config.time_limit, None);
        assert_eq!(config.max_states, None);

        let config = SolverConfig::from_vars(|_| None);
        assert_eq!(config.time_limit, None);
        assert_eq!(config.max_states, None);
    }

    #[test]
    fn test_solution_json() {
        let solution = solve(board("123456708"));
        let json = serde_json::to_value(&solution).unwrap();

        assert_eq!(json["status"], "Solved");
        assert_eq!(json["state"], "123456780");
        assert_eq!(json["moves"], 1);
        assert_eq!(json["path"][0], "123456708");
        assert_eq!(json["steps"][0], "Left");
    }
}

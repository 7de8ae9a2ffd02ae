//! Uninformed search over the crossing graph.
//!
//! One loop serves all three strategies. The frontier is a deque of node
//! ids: breadth-first pops from the front, depth-first and depth-limited
//! pop from the back. Nodes live in an arena and point at their parent,
//! so the solution path is rebuilt only once a goal is reached.
//!
//! Depth counts crossings from the initial state. A depth-limited node at
//! the limit is goal-tested but never expanded. The limited search keeps the
//! shallowest depth at which every state was expanded and expands a state
//! again when it is reached higher up the tree, so it finds a plan exactly
//! when one of at most `limit` crossings exists.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::error::{PuzzleError, Result};
use crate::moves::{generate_successors, transitions, Transition};
use crate::puzzle::PuzzleConfig;
use crate::state::State;

/// Search strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Algorithm {
    /// Breadth-first. Finds a plan with the fewest crossings.
    Bfs,
    /// Depth-first with an explicit stack
    Dfs,
    /// Depth-first that does not expand past `limit` crossings
    Dls { limit: usize },
}

impl Algorithm {
    pub fn depth_limit(&self) -> Option<usize> {
        match self {
            Algorithm::Dls { limit } => Some(*limit),
            _ => None,
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Algorithm::Dls { limit: 0 } => Err(PuzzleError::InvalidDepthLimit(0)),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Bfs => f.write_str("BFS"),
            Algorithm::Dfs => f.write_str("DFS"),
            Algorithm::Dls { limit } => write!(f, "DLS(limit={})", limit),
        }
    }
}

/// How a search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOutcome {
    /// A goal state was reached
    Solved,
    /// Every reachable state was expanded without reaching the goal
    Exhausted,
    /// No goal within the depth limit; deeper branches were cut off
    DepthLimitReached,
}

/// Counters collected during a search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    /// Frontier entries taken out and expanded (or goal-tested)
    pub expanded: usize,
    /// Frontier entries created, the initial state included
    pub generated: usize,
    pub max_frontier: usize,
    pub max_depth: usize,
    /// Entries not expanded because they sat at the depth limit
    pub cut_offs: usize,
    pub time_elapsed_ms: u64,
}

/// Result of one search call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub algorithm: Algorithm,
    pub outcome: SearchOutcome,
    /// States from the initial one to the goal; empty when unsolved
    pub path: Vec<State>,
    /// Every expanded state, once each, in the order it was first expanded
    pub explored: Vec<State>,
    pub stats: SearchStats,
}

impl SearchResult {
    pub fn is_solved(&self) -> bool {
        self.outcome == SearchOutcome::Solved
    }

    /// Number of boat trips in the solution
    pub fn crossings(&self) -> Option<usize> {
        if self.is_solved() {
            Some(self.path.len().saturating_sub(1))
        } else {
            None
        }
    }

    pub fn transitions(&self) -> Vec<Transition> {
        transitions(&self.path)
    }
}

/// A frontier entry; `parent` indexes the node arena
#[derive(Debug)]
struct SearchNode {
    state: State,
    parent: Option<usize>,
    depth: usize,
}

/// Search engine bound to one puzzle variant
#[derive(Debug, Clone)]
pub struct Solver {
    puzzle: PuzzleConfig,
}

impl Solver {
    pub fn new(puzzle: PuzzleConfig) -> Result<Self> {
        puzzle.validate()?;
        Ok(Self { puzzle })
    }

    pub fn puzzle(&self) -> &PuzzleConfig {
        &self.puzzle
    }

    /// Search from everybody on the left bank with the boat on the left.
    pub fn solve_from_start(&self, algorithm: Algorithm) -> Result<SearchResult> {
        self.solve(&State::initial(&self.puzzle), algorithm)
    }

    /// Run one search. Inputs are checked before any work is done; a
    /// puzzle without a plan is reported through the outcome, not as an
    /// error.
    pub fn solve(&self, initial: &State, algorithm: Algorithm) -> Result<SearchResult> {
        initial.validate(&self.puzzle)?;
        algorithm.validate()?;

        debug!(%algorithm, roster = self.puzzle.roster.len(), "starting search");
        let result = self.run(initial, algorithm);

        info!(
            %algorithm,
            outcome = ?result.outcome,
            crossings = ?result.crossings(),
            expanded = result.stats.expanded,
            elapsed_ms = result.stats.time_elapsed_ms,
            "search finished"
        );
        if result.outcome == SearchOutcome::DepthLimitReached {
            warn!(
                %algorithm,
                cut_offs = result.stats.cut_offs,
                "no plan within the depth limit"
            );
        }
        Ok(result)
    }

    fn run(&self, initial: &State, algorithm: Algorithm) -> SearchResult {
        let start_time = Instant::now();
        let limit = algorithm.depth_limit();
        let breadth_first = algorithm == Algorithm::Bfs;

        let mut stats = SearchStats::default();
        let mut nodes: Vec<SearchNode> = vec![SearchNode {
            state: initial.clone(),
            parent: None,
            depth: 0,
        }];
        let mut frontier: VecDeque<usize> = VecDeque::from([0]);
        // State -> shallowest depth it was expanded at
        let mut visited: HashMap<State, usize> = HashMap::new();
        let mut explored: Vec<State> = Vec::new();
        stats.generated = 1;
        stats.max_frontier = 1;

        loop {
            let next = if breadth_first {
                frontier.pop_front()
            } else {
                frontier.pop_back()
            };
            let Some(id) = next else {
                break;
            };

            let depth = nodes[id].depth;
            if already_expanded(&visited, &nodes[id].state, depth, limit.is_some()) {
                continue;
            }

            let state = nodes[id].state.clone();
            match visited.entry(state.clone()) {
                Entry::Occupied(mut e) => {
                    e.insert(depth);
                }
                Entry::Vacant(e) => {
                    e.insert(depth);
                    explored.push(state.clone());
                }
            }
            stats.expanded += 1;
            stats.max_depth = stats.max_depth.max(depth);
            trace!(depth, state = %state, "expanding");

            if state.is_goal() {
                stats.time_elapsed_ms = start_time.elapsed().as_millis() as u64;
                return SearchResult {
                    algorithm,
                    outcome: SearchOutcome::Solved,
                    path: reconstruct_path(&nodes, id),
                    explored,
                    stats,
                };
            }

            if limit.is_some_and(|limit| depth >= limit) {
                stats.cut_offs += 1;
                continue;
            }

            let mut successors = generate_successors(&state, &self.puzzle);
            if !breadth_first {
                // Stack pops the first successor first
                successors.reverse();
            }

            for successor in successors {
                if already_expanded(&visited, &successor, depth + 1, limit.is_some()) {
                    continue;
                }
                nodes.push(SearchNode {
                    state: successor,
                    parent: Some(id),
                    depth: depth + 1,
                });
                frontier.push_back(nodes.len() - 1);
                stats.generated += 1;
            }
            stats.max_frontier = stats.max_frontier.max(frontier.len());
        }

        stats.time_elapsed_ms = start_time.elapsed().as_millis() as u64;
        let outcome = if stats.cut_offs > 0 {
            SearchOutcome::DepthLimitReached
        } else {
            SearchOutcome::Exhausted
        };

        SearchResult {
            algorithm,
            outcome,
            path: Vec::new(),
            explored,
            stats,
        }
    }
}

/// Expanded before at `depth` or shallower. Without a depth limit any
/// earlier expansion counts.
fn already_expanded(
    visited: &HashMap<State, usize>,
    state: &State,
    depth: usize,
    limited: bool,
) -> bool {
    match visited.get(state) {
        Some(&expanded_at) => !limited || expanded_at <= depth,
        None => false,
    }
}

/// Walk parent links back from `goal` and return the path start-first
fn reconstruct_path(nodes: &[SearchNode], goal: usize) -> Vec<State> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(id) = current {
        path.push(nodes[id].state.clone());
        current = nodes[id].parent;
    }
    path.reverse();
    path
}

/// Solve `puzzle` from its initial state with a one-off [`Solver`].
pub fn solve(puzzle: &PuzzleConfig, algorithm: Algorithm) -> Result<SearchResult> {
    Solver::new(puzzle.clone())?.solve_from_start(algorithm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigIssue;
    use crate::moves::generate_successors;
    use crate::puzzle::{Person, Role, Side};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn family() -> Solver {
        Solver::new(PuzzleConfig::family()).unwrap()
    }

    fn classic() -> Solver {
        Solver::new(PuzzleConfig::classic()).unwrap()
    }

    /// Every step of the path must be one legal crossing
    fn assert_valid_path(solver: &Solver, result: &SearchResult) {
        let path = &result.path;
        assert_eq!(path[0], State::initial(solver.puzzle()));
        assert!(path.last().unwrap().is_goal());
        for pair in path.windows(2) {
            assert!(
                generate_successors(&pair[0], solver.puzzle()).contains(&pair[1]),
                "illegal step {} => {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_bfs_family_shortest_plan() {
        let solver = family();
        let result = solver.solve_from_start(Algorithm::Bfs).unwrap();

        assert!(result.is_solved());
        assert_eq!(result.crossings(), Some(9));
        assert_valid_path(&solver, &result);
        assert!(result.path.last().unwrap().left_bank.is_empty());
        assert_eq!(result.path.last().unwrap().boat_side, Side::Right);

        let first = &result.transitions()[0].crossing;
        assert_eq!(
            first.crew.as_slice(),
            &[Person::new(Role::Father), Person::new(Role::Son)]
        );
    }

    #[test]
    fn test_bfs_classic_takes_seventeen_crossings() {
        let solver = classic();
        let result = solver.solve_from_start(Algorithm::Bfs).unwrap();

        assert_eq!(result.outcome, SearchOutcome::Solved);
        assert_eq!(result.crossings(), Some(17));
        assert_valid_path(&solver, &result);
        assert_eq!(result.transitions().len(), 17);
    }

    #[test]
    fn test_dfs_finds_a_plan_no_shorter_than_bfs() {
        for solver in [family(), classic()] {
            let bfs = solver.solve_from_start(Algorithm::Bfs).unwrap();
            let dfs = solver.solve_from_start(Algorithm::Dfs).unwrap();

            assert!(dfs.is_solved());
            assert_valid_path(&solver, &dfs);
            assert!(bfs.crossings().unwrap() <= dfs.crossings().unwrap());
        }
    }

    #[test]
    fn test_dfs_family_takes_longer_route() {
        let result = family().solve_from_start(Algorithm::Dfs).unwrap();
        assert_eq!(result.crossings(), Some(11));
    }

    #[test]
    fn test_searches_are_deterministic() {
        let solver = classic();
        for algorithm in [Algorithm::Bfs, Algorithm::Dfs, Algorithm::Dls { limit: 20 }] {
            let first = solver.solve_from_start(algorithm).unwrap();
            let second = solver.solve_from_start(algorithm).unwrap();
            assert_eq!(first.path, second.path, "{}", algorithm);
            assert_eq!(first.explored, second.explored, "{}", algorithm);
        }
    }

    #[test]
    fn test_dls_below_shortest_plan_reports_limit() {
        let result = family()
            .solve_from_start(Algorithm::Dls { limit: 8 })
            .unwrap();

        assert_eq!(result.outcome, SearchOutcome::DepthLimitReached);
        assert!(!result.is_solved());
        assert!(result.path.is_empty());
        assert!(result.stats.cut_offs > 0);
        assert!(!result.explored.is_empty());
    }

    #[test]
    fn test_dls_at_shortest_plan_solves() {
        let solver = family();
        let result = solver
            .solve_from_start(Algorithm::Dls { limit: 9 })
            .unwrap();

        assert!(result.is_solved());
        assert_eq!(result.crossings(), Some(9));
        assert_valid_path(&solver, &result);
    }

    #[test]
    fn test_dls_with_generous_limit_solves() {
        let solver = classic();
        let result = solver
            .solve_from_start(Algorithm::Dls { limit: 40 })
            .unwrap();

        assert!(result.is_solved());
        assert!(result.crossings().unwrap() <= 40);
        assert!(result.stats.max_depth <= 40);
        assert_valid_path(&solver, &result);
    }

    #[test]
    fn test_dls_rejects_zero_limit() {
        let result = family().solve_from_start(Algorithm::Dls { limit: 0 });
        assert!(matches!(result, Err(PuzzleError::InvalidDepthLimit(0))));
    }

    #[test]
    fn test_single_seat_boat_is_unsolvable() {
        let solver = Solver::new(PuzzleConfig::family().with_boat_capacity(1)).unwrap();
        for algorithm in [Algorithm::Bfs, Algorithm::Dfs, Algorithm::Dls { limit: 5 }] {
            let result = solver.solve_from_start(algorithm).unwrap();
            assert_eq!(result.outcome, SearchOutcome::Exhausted, "{}", algorithm);
            assert!(result.path.is_empty());
            assert_eq!(result.explored.len(), 1);
            assert_eq!(result.crossings(), None);
        }
    }

    #[test]
    fn test_already_solved_start() {
        let solver = family();
        let done =
            State::with_left_bank(solver.puzzle(), Vec::<Person>::new(), Side::Right).unwrap();
        let result = solver.solve(&done, Algorithm::Dfs).unwrap();

        assert!(result.is_solved());
        assert_eq!(result.crossings(), Some(0));
        assert_eq!(result.path, vec![done]);
    }

    #[test]
    fn test_rejects_state_from_other_roster() {
        let solver = family();
        let other = State::initial(&PuzzleConfig::classic());
        assert!(matches!(
            solver.solve(&other, Algorithm::Bfs),
            Err(PuzzleError::InvalidConfiguration(ConfigIssue::Unknown(_)))
        ));
    }

    #[test]
    fn test_rejects_invalid_puzzle() {
        let result = Solver::new(PuzzleConfig::family().with_boat_capacity(0));
        assert!(matches!(result, Err(PuzzleError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_explored_lists_each_state_once() {
        let result = classic()
            .solve_from_start(Algorithm::Dls { limit: 17 })
            .unwrap();
        let unique: HashSet<&State> = result.explored.iter().collect();

        assert_eq!(unique.len(), result.explored.len());
        assert_eq!(result.explored[0], State::initial(&PuzzleConfig::classic()));
        assert!(result.stats.expanded >= result.explored.len());
    }

    #[test]
    fn test_bfs_explored_contains_path() {
        let result = classic().solve_from_start(Algorithm::Bfs).unwrap();
        for state in &result.path {
            assert!(result.explored.contains(state));
        }
        assert!(result.stats.generated >= result.explored.len());
    }

    #[test]
    fn test_free_solve_function() {
        let result = solve(&PuzzleConfig::family(), Algorithm::Bfs).unwrap();
        assert_eq!(result.crossings(), Some(9));
    }

    #[test]
    fn test_result_serializes() {
        let result = family().solve_from_start(Algorithm::Dls { limit: 9 }).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["outcome"], "solved");
        assert_eq!(json["algorithm"]["kind"], "dls");
        assert_eq!(json["algorithm"]["limit"], 9);
        assert_eq!(json["path"][0]["boatSide"], "left");
        assert_eq!(json["path"][0]["rightBank"], serde_json::json!([]));
        assert!(json["stats"]["cutOffs"].is_u64());
        assert!(json["stats"]["maxFrontier"].is_u64());
    }

    #[test]
    fn test_rules_do_not_lengthen_family_plan() {
        let strict = solve(&PuzzleConfig::family(), Algorithm::Bfs).unwrap();
        let relaxed = solve(
            &PuzzleConfig::family().with_rules(Vec::new()),
            Algorithm::Bfs,
        )
        .unwrap();

        // Each round trip nets one person: 2 * (6 - 2) + 1
        assert_eq!(relaxed.crossings(), Some(9));
        assert_eq!(strict.crossings(), relaxed.crossings());
        assert!(relaxed.explored.len() > strict.explored.len());
    }

    fn state_from_mask(puzzle: &PuzzleConfig, mask: u8, boat_left: bool) -> State {
        let left: Vec<Person> = puzzle
            .roster
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, p)| *p)
            .collect();
        let side = if boat_left { Side::Left } else { Side::Right };
        State::with_left_bank(puzzle, left, side).unwrap()
    }

    proptest! {
        #[test]
        fn prop_bfs_is_never_longer(mask in 0u8..64, boat_left in any::<bool>()) {
            let solver = family();
            let start = state_from_mask(solver.puzzle(), mask, boat_left);

            let bfs = solver.solve(&start, Algorithm::Bfs).unwrap();
            let dfs = solver.solve(&start, Algorithm::Dfs).unwrap();
            let dls = solver.solve(&start, Algorithm::Dls { limit: 128 }).unwrap();

            prop_assert_eq!(bfs.is_solved(), dfs.is_solved());
            prop_assert_eq!(bfs.is_solved(), dls.is_solved());
            if let Some(shortest) = bfs.crossings() {
                prop_assert!(shortest <= dfs.crossings().unwrap());
                prop_assert!(shortest <= dls.crossings().unwrap());
            }
        }

        #[test]
        fn prop_dls_below_bfs_reports_limit(mask in 0u8..64, boat_left in any::<bool>()) {
            let solver = family();
            let start = state_from_mask(solver.puzzle(), mask, boat_left);
            let bfs = solver.solve(&start, Algorithm::Bfs).unwrap();

            if let Some(shortest) = bfs.crossings() {
                if shortest >= 2 {
                    let dls = solver
                        .solve(&start, Algorithm::Dls { limit: shortest - 1 })
                        .unwrap();
                    prop_assert_eq!(dls.outcome, SearchOutcome::DepthLimitReached);

                    let dls = solver.solve(&start, Algorithm::Dls { limit: shortest }).unwrap();
                    prop_assert_eq!(dls.crossings(), Some(shortest));
                }
            }
        }

        #[test]
        fn prop_repeat_runs_match(mask in 0u8..64, boat_left in any::<bool>()) {
            let solver = family();
            let start = state_from_mask(solver.puzzle(), mask, boat_left);
            for algorithm in [Algorithm::Bfs, Algorithm::Dfs, Algorithm::Dls { limit: 12 }] {
                let a = solver.solve(&start, algorithm).unwrap();
                let b = solver.solve(&start, algorithm).unwrap();
                prop_assert_eq!(a.path, b.path);
            }
        }
    }

    #[test]
    fn test_algorithm_display() {
        assert_eq!(Algorithm::Bfs.to_string(), "BFS");
        assert_eq!(Algorithm::Dls { limit: 20 }.to_string(), "DLS(limit=20)");
        assert_eq!(Algorithm::Dfs.depth_limit(), None);
        assert_eq!(Algorithm::Dls { limit: 3 }.depth_limit(), Some(3));
    }
}

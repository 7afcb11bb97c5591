//! State-space search over tower arrangements.
//!
//! `HanoiSearch` explores the graph of reachable `TowerState`s from a start
//! arrangement with one of three strategies:
//! - breadth-first (shortest solution guaranteed),
//! - depth-first (some solution, usually long),
//! - bidirectional (breadth-first from both ends, meeting in the middle).
//!
//! Every popped frontier entry is reported to a `SearchObserver`; a definitive
//! outcome (solved or exhausted) is reported exactly once through
//! `SearchObserver::on_complete`. A run stopped by its `CancellationToken`
//! returns `SearchOutcome::Cancelled` and reports no completion.
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::tower::{Disk, Move, Snapshot, TowerState};

/// Search strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// FIFO frontier; finds a shortest solution.
    #[default]
    BreadthFirst,
    /// LIFO frontier; children pushed in reverse so they pop in move order.
    DepthFirst,
    /// Two FIFO frontiers, one from the start and one from the goal.
    Bidirectional,
}

impl Strategy {
    /// All strategies, in the order they are usually listed.
    pub const ALL: [Strategy; 3] = [
        Strategy::BreadthFirst,
        Strategy::DepthFirst,
        Strategy::Bidirectional,
    ];
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::BreadthFirst => write!(f, "bfs"),
            Strategy::DepthFirst => write!(f, "dfs"),
            Strategy::Bidirectional => write!(f, "bidirectional"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "bfs" | "breadth-first" => Ok(Strategy::BreadthFirst),
            "dfs" | "depth-first" => Ok(Strategy::DepthFirst),
            "bidirectional" | "bidi" | "bi" => Ok(Strategy::Bidirectional),
            _ => Err(format!(
                "Unknown strategy: '{}'. Valid options: bfs, dfs, bidirectional",
                s
            )),
        }
    }
}

/// Which frontier a progress report comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Single-frontier search (breadth- or depth-first).
    Exploring,
    /// Bidirectional search, frontier rooted at the start state.
    ExploringForward,
    /// Bidirectional search, frontier rooted at the goal state.
    ExploringBackward,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Exploring => "Exploring",
            Phase::ExploringForward => "Exploring Forward",
            Phase::ExploringBackward => "Exploring Backward",
        };
        write!(f, "{}", s)
    }
}

/// Receives progress and completion reports from a running search.
pub trait SearchObserver {
    /// Called once per popped frontier entry, before its goal test.
    ///
    /// `path` is the move sequence from that frontier's origin to `state`
    /// (for `Phase::ExploringBackward` the origin is the goal state).
    fn on_progress(&mut self, state: &TowerState, phase: Phase, path: &[Move]);

    /// Called exactly once when a run ends in success or exhaustion.
    /// `path` is empty when `success` is false.
    fn on_complete(&mut self, success: bool, path: &[Move], stats: &SearchStatistics);
}

impl<O: SearchObserver + ?Sized> SearchObserver for &mut O {
    fn on_progress(&mut self, state: &TowerState, phase: Phase, path: &[Move]) {
        (**self).on_progress(state, phase, path);
    }

    fn on_complete(&mut self, success: bool, path: &[Move], stats: &SearchStatistics) {
        (**self).on_complete(success, path, stats);
    }
}

/// Observer that ignores every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {
    fn on_progress(&mut self, _state: &TowerState, _phase: Phase, _path: &[Move]) {}

    fn on_complete(&mut self, _success: bool, _path: &[Move], _stats: &SearchStatistics) {}
}

/// Observer built from two closures.
pub struct FnObserver<P, C> {
    progress: P,
    complete: C,
}

impl<P, C> FnObserver<P, C>
where
    P: FnMut(&TowerState, Phase, &[Move]),
    C: FnMut(bool, &[Move], &SearchStatistics),
{
    pub fn new(progress: P, complete: C) -> Self {
        FnObserver { progress, complete }
    }
}

impl<P, C> SearchObserver for FnObserver<P, C>
where
    P: FnMut(&TowerState, Phase, &[Move]),
    C: FnMut(bool, &[Move], &SearchStatistics),
{
    fn on_progress(&mut self, state: &TowerState, phase: Phase, path: &[Move]) {
        (self.progress)(state, phase, path);
    }

    fn on_complete(&mut self, success: bool, path: &[Move], stats: &SearchStatistics) {
        (self.complete)(success, path, stats);
    }
}

/// Shared stop flag for a search run.
///
/// Clones share the same flag, so one clone can be handed to a timer or
/// another thread while the search polls the other.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the search stop at its next poll point.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How a search run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The goal was reached; the moves lead from the start state to the goal.
    /// Empty when the start state already is the goal.
    Solved(Vec<Move>),
    /// Every reachable state was explored without reaching the goal.
    Exhausted,
    /// The cancellation token was observed before a definitive outcome.
    Cancelled,
}

impl SearchOutcome {
    /// The solution moves, if the search succeeded.
    pub fn solution(&self) -> Option<&[Move]> {
        match self {
            SearchOutcome::Solved(path) => Some(path),
            _ => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, SearchOutcome::Solved(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SearchOutcome::Cancelled)
    }
}

/// Statistics collected during one search run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStatistics {
    /// Strategy that produced these numbers.
    pub strategy: Strategy,
    /// Frontier entries popped (counted before the goal test).
    pub nodes_explored: u64,
    /// Popped entries whose children were generated.
    pub nodes_expanded: u64,
    /// Distinct states recorded in the visited set(s) after the last expansion.
    pub states_visited: usize,
    /// Largest combined frontier size seen after an expansion.
    pub max_frontier_size: usize,
    /// Wall-clock time from the start of the run to its end.
    pub search_time: Duration,
    /// Set on a definitive outcome only.
    pub success: bool,
    /// Length of the solution; set on a definitive outcome only.
    pub path_length: usize,
}

impl SearchStatistics {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }
}

/// One frontier entry: a state and the moves that reached it from the
/// frontier's origin.
type FrontierEntry = (Snapshot, Vec<Move>);

/// Search engine bound to a start state and an observer.
///
/// # Examples
/// ```
/// use hanoi_solver::solver::{HanoiSearch, NoopObserver, SearchOutcome};
/// use hanoi_solver::tower::TowerState;
///
/// let start = TowerState::new(3);
/// let mut search = HanoiSearch::new(&start, NoopObserver);
/// match search.run_breadth_first() {
///     SearchOutcome::Solved(path) => assert_eq!(path.len(), 7),
///     other => panic!("unexpected outcome {:?}", other),
/// }
/// assert!(search.statistics().success);
/// ```
pub struct HanoiSearch<O: SearchObserver> {
    initial: TowerState,
    observer: O,
    cancel: CancellationToken,
    stats: SearchStatistics,
}

impl<O: SearchObserver> HanoiSearch<O> {
    /// Creates an engine with its own, not yet cancelled, token.
    pub fn new(initial: &TowerState, observer: O) -> Self {
        Self::with_cancellation(initial, observer, CancellationToken::new())
    }

    /// Creates an engine that polls `cancel` at the head of every loop iteration.
    pub fn with_cancellation(initial: &TowerState, observer: O, cancel: CancellationToken) -> Self {
        HanoiSearch {
            initial: initial.clone(),
            observer,
            cancel,
            stats: SearchStatistics::default(),
        }
    }

    /// A clone of the token this engine polls.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Statistics of the most recent run.
    pub fn statistics(&self) -> &SearchStatistics {
        &self.stats
    }

    /// Consumes the engine and returns its observer.
    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Runs `strategy` to completion, exhaustion or cancellation.
    pub fn run(&mut self, strategy: Strategy) -> SearchOutcome {
        let span = tracing::debug_span!("search", %strategy, disks = self.initial.num_disks());
        let _enter = span.enter();
        debug!("search started");

        let outcome = match strategy {
            Strategy::BreadthFirst | Strategy::DepthFirst => self.search_single(strategy),
            Strategy::Bidirectional => self.search_bidirectional(),
        };

        match &outcome {
            SearchOutcome::Solved(path) => info!(
                moves = path.len(),
                nodes = self.stats.nodes_explored,
                elapsed_ms = self.stats.search_time.as_millis() as u64,
                "solution found"
            ),
            SearchOutcome::Exhausted => info!(nodes = self.stats.nodes_explored, "search exhausted"),
            SearchOutcome::Cancelled => info!(nodes = self.stats.nodes_explored, "search cancelled"),
        }
        outcome
    }

    pub fn run_breadth_first(&mut self) -> SearchOutcome {
        self.run(Strategy::BreadthFirst)
    }

    pub fn run_depth_first(&mut self) -> SearchOutcome {
        self.run(Strategy::DepthFirst)
    }

    pub fn run_bidirectional(&mut self) -> SearchOutcome {
        self.run(Strategy::Bidirectional)
    }

    /// Breadth- and depth-first share everything but the end of the frontier
    /// they pop from and the order children are pushed in.
    fn search_single(&mut self, strategy: Strategy) -> SearchOutcome {
        let started = Instant::now();
        self.stats = SearchStatistics::new(strategy);
        let lifo = strategy == Strategy::DepthFirst;

        let start = self.initial.snapshot();
        let mut frontier: VecDeque<FrontierEntry> = VecDeque::new();
        frontier.push_back((start.clone(), Vec::new()));
        let mut visited: HashSet<Snapshot> = HashSet::new();
        visited.insert(start);

        let mut current = self.initial.clone();

        loop {
            if self.cancel.is_cancelled() {
                return self.cancelled(started);
            }
            let popped = if lifo {
                frontier.pop_back()
            } else {
                frontier.pop_front()
            };
            let Some((snapshot, path)) = popped else {
                break;
            };
            self.stats.nodes_explored += 1;

            current.restore(&snapshot);
            self.observer.on_progress(&current, Phase::Exploring, &path);

            if current.is_goal_state() {
                return self.solved(path, started);
            }

            let mut moves = current.valid_moves();
            if lifo {
                moves.reverse();
            }
            for mv in moves {
                if let Some(child) = expand(&current, mv) {
                    if !visited.contains(&child) {
                        visited.insert(child.clone());
                        frontier.push_back((child, extend_path(&path, mv)));
                    }
                }
            }

            self.stats.nodes_expanded += 1;
            self.stats.states_visited = visited.len();
            self.stats.max_frontier_size = self.stats.max_frontier_size.max(frontier.len());
        }

        self.exhausted(started)
    }

    fn search_bidirectional(&mut self) -> SearchOutcome {
        let started = Instant::now();
        self.stats = SearchStatistics::new(Strategy::Bidirectional);

        let start = self.initial.snapshot();
        let goal = TowerState::goal(self.initial.num_disks() as Disk).snapshot();

        let mut forward: VecDeque<FrontierEntry> = VecDeque::new();
        let mut backward: VecDeque<FrontierEntry> = VecDeque::new();
        forward.push_back((start.clone(), Vec::new()));
        backward.push_back((goal.clone(), Vec::new()));

        let mut forward_visited: HashMap<Snapshot, Vec<Move>> = HashMap::new();
        let mut backward_visited: HashMap<Snapshot, Vec<Move>> = HashMap::new();
        forward_visited.insert(start, Vec::new());
        backward_visited.insert(goal, Vec::new());

        let mut current = self.initial.clone();

        loop {
            if self.cancel.is_cancelled() {
                return self.cancelled(started);
            }
            if forward.is_empty() || backward.is_empty() {
                break;
            }

            let Some((snapshot, path)) = forward.pop_front() else {
                break;
            };
            self.stats.nodes_explored += 1;
            current.restore(&snapshot);
            self.observer.on_progress(&current, Phase::ExploringForward, &path);

            if let Some(from_goal) = backward_visited.get(&snapshot) {
                let full = splice(&path, from_goal);
                return self.solved(full, started);
            }
            expand_into(&current, &path, &mut forward, &mut forward_visited);
            self.stats.nodes_expanded += 1;

            if self.cancel.is_cancelled() {
                return self.cancelled(started);
            }

            let Some((snapshot, path)) = backward.pop_front() else {
                break;
            };
            self.stats.nodes_explored += 1;
            current.restore(&snapshot);
            self.observer.on_progress(&current, Phase::ExploringBackward, &path);

            if let Some(from_start) = forward_visited.get(&snapshot) {
                let full = splice(from_start, &path);
                return self.solved(full, started);
            }
            expand_into(&current, &path, &mut backward, &mut backward_visited);
            self.stats.nodes_expanded += 1;

            self.stats.states_visited = forward_visited.len() + backward_visited.len();
            self.stats.max_frontier_size = self
                .stats
                .max_frontier_size
                .max(forward.len() + backward.len());
        }

        self.exhausted(started)
    }

    fn solved(&mut self, path: Vec<Move>, started: Instant) -> SearchOutcome {
        self.stats.success = true;
        self.stats.path_length = path.len();
        self.stats.search_time = started.elapsed();
        self.observer.on_complete(true, &path, &self.stats);
        SearchOutcome::Solved(path)
    }

    fn exhausted(&mut self, started: Instant) -> SearchOutcome {
        self.stats.success = false;
        self.stats.path_length = 0;
        self.stats.search_time = started.elapsed();
        self.observer.on_complete(false, &[], &self.stats);
        SearchOutcome::Exhausted
    }

    fn cancelled(&mut self, started: Instant) -> SearchOutcome {
        self.stats.search_time = started.elapsed();
        SearchOutcome::Cancelled
    }
}

/// Snapshot of `state` after `mv`, or `None` if `mv` is illegal there.
fn expand(state: &TowerState, mv: Move) -> Option<Snapshot> {
    let mut child = state.clone();
    if child.apply_move(mv) {
        Some(child.snapshot())
    } else {
        None
    }
}

fn extend_path(path: &[Move], mv: Move) -> Vec<Move> {
    let mut next = Vec::with_capacity(path.len() + 1);
    next.extend_from_slice(path);
    next.push(mv);
    next
}

/// Generates the children of `state` for one bidirectional frontier.
fn expand_into(
    state: &TowerState,
    path: &[Move],
    frontier: &mut VecDeque<FrontierEntry>,
    visited: &mut HashMap<Snapshot, Vec<Move>>,
) {
    for mv in state.valid_moves() {
        if let Some(child) = expand(state, mv) {
            if !visited.contains_key(&child) {
                let child_path = extend_path(path, mv);
                visited.insert(child.clone(), child_path.clone());
                frontier.push_back((child, child_path));
            }
        }
    }
}

/// Joins a path from the start to a meeting state with a path from the goal
/// to the same state. The goal-side half is walked backwards, each move
/// inverted, so the result leads from the start to the goal.
fn splice(from_start: &[Move], from_goal: &[Move]) -> Vec<Move> {
    let mut full = Vec::with_capacity(from_start.len() + from_goal.len());
    full.extend_from_slice(from_start);
    full.extend(from_goal.iter().rev().map(Move::inverse));
    full
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::replay;

    /// Records every report so tests can inspect the contract.
    #[derive(Default)]
    struct Recorder {
        progress: Vec<(Snapshot, Phase, usize)>,
        completions: Vec<(bool, Vec<Move>, SearchStatistics)>,
    }

    impl SearchObserver for Recorder {
        fn on_progress(&mut self, state: &TowerState, phase: Phase, path: &[Move]) {
            self.progress.push((state.snapshot(), phase, path.len()));
        }

        fn on_complete(&mut self, success: bool, path: &[Move], stats: &SearchStatistics) {
            self.completions.push((success, path.to_vec(), stats.clone()));
        }
    }

    fn solve(start: &TowerState, strategy: Strategy) -> Vec<Move> {
        let mut search = HanoiSearch::new(start, NoopObserver);
        match search.run(strategy) {
            SearchOutcome::Solved(path) => path,
            other => panic!("{} did not solve {:?}: {:?}", strategy, start, other),
        }
    }

    #[test]
    fn test_bfs_optimal_length() {
        for n in 1..=7u8 {
            let path = solve(&TowerState::new(n), Strategy::BreadthFirst);
            assert_eq!(path.len(), (1usize << n) - 1, "n = {}", n);
        }
    }

    #[test]
    fn test_bfs_three_disks_exact_sequence() {
        let path = solve(&TowerState::new(3), Strategy::BreadthFirst);
        let expected: Vec<Move> = [(0, 2), (0, 1), (2, 1), (0, 2), (1, 0), (1, 2), (0, 2)]
            .iter()
            .map(|&(f, t)| Move::new(f, t))
            .collect();
        assert_eq!(path, expected);
    }

    #[test]
    fn test_all_strategies_reach_goal() {
        for n in 1..=6u8 {
            let start = TowerState::new(n);
            for strategy in Strategy::ALL {
                let path = solve(&start, strategy);
                let end = replay(&start, &path).unwrap();
                assert!(end.is_goal_state(), "{} n = {}", strategy, n);
            }
        }
    }

    #[test]
    fn test_all_strategies_from_random_starts() {
        for seed in 0..25 {
            let mut start = TowerState::new(5);
            start.randomize_with_seed(seed);
            let bfs = solve(&start, Strategy::BreadthFirst);
            for strategy in Strategy::ALL {
                let path = solve(&start, strategy);
                assert!(replay(&start, &path).unwrap().is_goal_state());
                assert!(bfs.len() <= path.len(), "{} beat bfs for seed {}", strategy, seed);
            }
        }
    }

    #[test]
    fn test_bfs_not_longer_than_others() {
        let start = TowerState::new(5);
        let bfs = solve(&start, Strategy::BreadthFirst).len();
        assert!(bfs <= solve(&start, Strategy::DepthFirst).len());
        assert!(bfs <= solve(&start, Strategy::Bidirectional).len());
    }

    #[test]
    fn test_zero_disks_all_strategies() {
        let start = TowerState::new(0);
        for strategy in Strategy::ALL {
            let mut recorder = Recorder::default();
            let mut search = HanoiSearch::new(&start, &mut recorder);
            assert_eq!(search.run(strategy), SearchOutcome::Solved(Vec::new()));
            let stats = search.statistics().clone();
            drop(search);
            assert_eq!(stats.nodes_expanded, 0);
            assert_eq!(stats.path_length, 0);
            assert!(stats.success);
            assert_eq!(recorder.completions.len(), 1);
            assert!(recorder.completions[0].0);
        }
    }

    #[test]
    fn test_already_solved_start() {
        let start = TowerState::goal(4);
        for strategy in Strategy::ALL {
            assert!(solve(&start, strategy).is_empty());
        }
    }

    #[test]
    fn test_cancel_before_run() {
        let start = TowerState::new(4);
        for strategy in Strategy::ALL {
            let mut recorder = Recorder::default();
            let token = CancellationToken::new();
            token.cancel();
            let mut search = HanoiSearch::with_cancellation(&start, &mut recorder, token);
            assert_eq!(search.run(strategy), SearchOutcome::Cancelled);
            let stats = search.statistics().clone();
            assert_eq!(stats.nodes_explored, 0);
            assert_eq!(stats.nodes_expanded, 0);
            assert!(!stats.success);
            assert!(recorder.progress.is_empty());
            assert!(recorder.completions.is_empty());
        }
    }

    #[test]
    fn test_cancel_mid_run_suppresses_completion() {
        let start = TowerState::new(6);
        let token = CancellationToken::new();
        let trigger = token.clone();
        let mut completions = 0;
        let mut seen = 0u32;
        let observer = FnObserver::new(
            |_: &TowerState, _: Phase, _: &[Move]| {
                seen += 1;
                if seen == 10 {
                    trigger.cancel();
                }
            },
            |_: bool, _: &[Move], _: &SearchStatistics| completions += 1,
        );
        let mut search = HanoiSearch::with_cancellation(&start, observer, token);
        let outcome = search.run_breadth_first();
        let nodes = search.statistics().nodes_explored;
        drop(search);

        assert_eq!(outcome, SearchOutcome::Cancelled);
        assert_eq!(nodes, 10);
        assert_eq!(completions, 0);
    }

    #[test]
    fn test_exhaustion_reports_failure() {
        // Two disks on the board but a puzzle of three: the goal is unreachable.
        let start = TowerState::unchecked([vec![2, 1], vec![], vec![]], 3);
        for strategy in Strategy::ALL {
            let mut recorder = Recorder::default();
            let mut search = HanoiSearch::new(&start, &mut recorder);
            assert_eq!(search.run(strategy), SearchOutcome::Exhausted, "{}", strategy);
            let stats = search.statistics().clone();
            drop(search);

            assert!(!stats.success);
            assert_eq!(stats.path_length, 0);
            assert_eq!(recorder.completions.len(), 1);
            assert_eq!(recorder.completions[0].0, false);
            assert!(recorder.completions[0].1.is_empty());
        }
    }

    #[test]
    fn test_bfs_exhaustion_visits_every_reachable_state() {
        let start = TowerState::unchecked([vec![2, 1], vec![], vec![]], 3);
        let mut search = HanoiSearch::new(&start, NoopObserver);
        assert_eq!(search.run_breadth_first(), SearchOutcome::Exhausted);
        // 3^2 arrangements of two disks.
        assert_eq!(search.statistics().states_visited, 9);
        assert_eq!(search.statistics().nodes_explored, 9);
    }

    #[test]
    fn test_no_state_expanded_twice() {
        for strategy in [Strategy::BreadthFirst, Strategy::DepthFirst] {
            let mut recorder = Recorder::default();
            let mut search = HanoiSearch::new(&TowerState::new(5), &mut recorder);
            assert!(search.run(strategy).is_solved());
            let explored = search.statistics().nodes_explored;
            drop(search);

            let distinct: HashSet<&Snapshot> = recorder.progress.iter().map(|p| &p.0).collect();
            assert_eq!(distinct.len(), recorder.progress.len(), "{}", strategy);
            assert_eq!(explored as usize, recorder.progress.len());
        }
    }

    #[test]
    fn test_progress_and_completion_contract() {
        let mut recorder = Recorder::default();
        let mut search = HanoiSearch::new(&TowerState::new(3), &mut recorder);
        let outcome = search.run_breadth_first();
        let stats = search.statistics().clone();
        drop(search);

        assert_eq!(recorder.progress.len() as u64, stats.nodes_explored);
        assert!(recorder.progress.iter().all(|p| p.1 == Phase::Exploring));
        assert_eq!(recorder.completions.len(), 1);
        let (success, path, reported) = &recorder.completions[0];
        assert!(*success);
        assert_eq!(Some(path.as_slice()), outcome.solution());
        assert_eq!(reported, &stats);
        assert_eq!(stats.path_length, 7);
        assert_eq!(stats.strategy, Strategy::BreadthFirst);
        assert!(stats.states_visited > 0);
        assert!(stats.max_frontier_size > 0);
        assert!(stats.nodes_expanded + 1 == stats.nodes_explored);
    }

    #[test]
    fn test_bfs_progress_paths_never_shrink() {
        let mut recorder = Recorder::default();
        let mut search = HanoiSearch::new(&TowerState::new(4), &mut recorder);
        search.run_breadth_first();
        drop(search);
        let lengths: Vec<usize> = recorder.progress.iter().map(|p| p.2).collect();
        assert!(lengths.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_dfs_explores_first_move_first() {
        let mut recorder = Recorder::default();
        let mut search = HanoiSearch::new(&TowerState::new(3), &mut recorder);
        search.run_depth_first();
        drop(search);
        // The second popped state is the child of the first legal move (0 -> 1).
        let expected = TowerState::from_pegs([vec![3, 2], vec![1], vec![]]).unwrap();
        assert_eq!(recorder.progress[1].0, expected.snapshot());
    }

    #[test]
    fn test_bidirectional_phases_alternate() {
        let mut recorder = Recorder::default();
        let mut search = HanoiSearch::new(&TowerState::new(4), &mut recorder);
        assert!(search.run_bidirectional().is_solved());
        let stats = search.statistics().clone();
        drop(search);

        assert_eq!(recorder.progress[0].1, Phase::ExploringForward);
        assert_eq!(recorder.progress[1].1, Phase::ExploringBackward);
        assert_eq!(recorder.progress[1].0, TowerState::goal(4).snapshot());
        assert_eq!(recorder.progress.len() as u64, stats.nodes_explored);
        assert_eq!(recorder.completions.len(), 1);
    }

    #[test]
    fn test_splice_inverts_goal_side() {
        let from_start = vec![Move::new(0, 2)];
        let from_goal = vec![Move::new(2, 1), Move::new(2, 0)];
        assert_eq!(
            splice(&from_start, &from_goal),
            vec![Move::new(0, 2), Move::new(0, 2), Move::new(1, 2)]
        );
    }

    #[test]
    fn test_fresh_statistics_per_run() {
        let mut search = HanoiSearch::new(&TowerState::new(3), NoopObserver);
        search.run_depth_first();
        let first = search.statistics().nodes_explored;
        search.run_depth_first();
        assert_eq!(search.statistics().nodes_explored, first);
        assert_eq!(search.statistics().strategy, Strategy::DepthFirst);
    }

    #[test]
    fn test_strategy_parse_and_display() {
        assert_eq!("BFS".parse::<Strategy>().unwrap(), Strategy::BreadthFirst);
        assert_eq!("depth_first".parse::<Strategy>().unwrap(), Strategy::DepthFirst);
        assert_eq!("bidi".parse::<Strategy>().unwrap(), Strategy::Bidirectional);
        assert!("astar".parse::<Strategy>().is_err());
        for strategy in Strategy::ALL {
            assert_eq!(strategy.to_string().parse::<Strategy>().unwrap(), strategy);
        }
        assert_eq!(Phase::ExploringBackward.to_string(), "Exploring Backward");
    }
}

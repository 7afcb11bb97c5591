//! # Tower of Hanoi Solver Library
//!
//! This library solves the Tower of Hanoi from any valid arrangement of
//! disks, canonical or randomized, by searching the graph of tower states.
//!
//! It is used by three binaries:
//! - `hanoi_solver`: Solves one start state with a chosen strategy and prints
//!   the moves and search statistics, optionally replaying them at a fixed pace.
//! - `hanoi_player`: Interactive play in the terminal, with undo and hints.
//! - `strategy_compare`: Runs every strategy over seeded random starts and
//!   compares path lengths, nodes explored and time.
//!
//! ## Modules
//! - `tower`: The state model (`TowerState`, `Move`, `Snapshot`): move rules,
//!   goal test, snapshots and randomized starts.
//! - `solver`: The search engine (`HanoiSearch`) with breadth-first,
//!   depth-first and bidirectional strategies, observers, cancellation and statistics.
//! - `worker`: Runs a search on its own thread and delivers its reports as
//!   channel events.
//! - `playback`: Replays a solution one move per interval on its own thread,
//!   with pause and resume.
//! - `utils`: Parsing of textual towers and moves, and path replay.
//! - `error`: Error types.

pub mod error;
pub mod playback;
pub mod solver;
pub mod tower;
pub mod utils;
pub mod worker;

pub use error::{SearchError, TowerError};
pub use solver::{
    CancellationToken, FnObserver, HanoiSearch, NoopObserver, Phase, SearchObserver,
    SearchOutcome, SearchStatistics, Strategy,
};
pub use tower::{Disk, Move, Snapshot, TowerState};

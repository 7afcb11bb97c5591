//! Error types for tower construction, parsing, and search workers.
//!
//! Illegal moves against a `TowerState` are not errors: `TowerState::apply_move`
//! reports them with `false`. `TowerError::IllegalMove` only appears when a whole
//! move sequence is replayed and one step fails.

use crate::tower::{Disk, Move};

/// Problems with a tower arrangement or a textual description of one.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TowerError {
    /// A peg index outside `0..PEG_COUNT`.
    #[error("peg {0} does not exist (expected 0, 1 or 2)")]
    InvalidPeg(usize),

    /// A disk numbered 0 or above the disk count.
    #[error("disk {disk} is out of range for {num_disks} disks")]
    DiskOutOfRange { disk: Disk, num_disks: usize },

    /// The same disk appears more than once.
    #[error("disk {0} appears more than once")]
    DuplicateDisk(Disk),

    /// A larger disk rests on a smaller one.
    #[error("disk {upper} cannot rest on smaller disk {lower} on peg {peg}")]
    StackOrder { peg: usize, lower: Disk, upper: Disk },

    /// The textual form could not be understood.
    #[error("parse error: {0}")]
    Parse(String),

    /// A move in a replayed sequence was not legal at that point.
    #[error("move {index} ({mv}) is illegal")]
    IllegalMove { index: usize, mv: Move },
}

/// Failures at the boundary of a background search.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The search thread panicked; the payload message is kept when it was a string.
    #[error("search worker panicked: {0}")]
    WorkerPanicked(String),

    /// The worker thread could not be started.
    #[error("failed to spawn search worker: {0}")]
    Spawn(String),
}

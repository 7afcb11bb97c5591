//! State model for the Tower of Hanoi.
//!
//! This module defines the puzzle's fundamental components:
//! - `Disk`: a disk size, `1..=N`, where larger numbers are larger disks.
//! - `Move`: an ordered `(from, to)` pair of peg indices.
//! - `Snapshot`: an immutable, hashable copy of the three pegs used as a
//!   visited-set key by the search engine.
//! - `TowerState`: the three pegs themselves, with move validation, move
//!   execution, goal testing and randomized start generation.
use rand::rngs::SmallRng;
use rand::{thread_rng, Rng, SeedableRng};
use std::fmt;

use crate::error::TowerError;

/// A disk size. Disk `1` is the smallest.
pub type Disk = u8;

/// Number of pegs on the board.
pub const PEG_COUNT: usize = 3;

/// Peg that holds the whole stack in the canonical start state.
pub const START_PEG: usize = 0;

/// Peg that must hold the whole stack for the puzzle to be solved.
pub const GOAL_PEG: usize = 2;

/// Every ordered peg pair, in the order moves are enumerated
/// (ascending `from`, then ascending `to`).
const PEG_PAIRS: [(usize, usize); 6] = [(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1)];

/// A transfer of the top disk from one peg to another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    /// Source peg index.
    pub from: usize,
    /// Destination peg index.
    pub to: usize,
}

impl Move {
    pub fn new(from: usize, to: usize) -> Self {
        Move { from, to }
    }

    /// The move that undoes this one.
    ///
    /// # Examples
    /// ```
    /// use hanoi_solver::tower::Move;
    /// assert_eq!(Move::new(0, 2).inverse(), Move::new(2, 0));
    /// ```
    pub fn inverse(&self) -> Self {
        Move {
            from: self.to,
            to: self.from,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Value copy of the three pegs, bottom to top.
///
/// Two snapshots are equal iff every peg holds the same disks in the same
/// order, so it can be used directly as a `HashSet`/`HashMap` key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Snapshot([Box<[Disk]>; PEG_COUNT]);

impl Snapshot {
    /// The disks on `peg`, bottom to top.
    ///
    /// # Panics
    /// Panics if `peg >= PEG_COUNT`.
    pub fn peg(&self, peg: usize) -> &[Disk] {
        &self.0[peg]
    }
}

/// Three pegs holding disks `1..=num_disks`, each peg strictly decreasing
/// from bottom to top.
///
/// The type is a plain value: `clone()` gives a fully independent copy.
///
/// # Examples
/// ```
/// use hanoi_solver::tower::{Move, TowerState};
/// let mut tower = TowerState::new(2);
/// assert!(tower.apply_move(Move::new(0, 1)));
/// assert!(tower.apply_move(Move::new(0, 2)));
/// assert!(!tower.apply_move(Move::new(2, 1))); // 2 cannot go onto 1
/// assert!(tower.apply_move(Move::new(1, 2)));
/// assert!(tower.is_goal_state());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TowerState {
    num_disks: usize,
    pegs: [Vec<Disk>; PEG_COUNT],
}

impl TowerState {
    /// Creates the canonical start state: all disks on peg 0, largest at the bottom.
    ///
    /// `num_disks == 0` is allowed and gives three empty pegs, which is
    /// already a goal state.
    pub fn new(num_disks: Disk) -> Self {
        Self::stacked_on(START_PEG, num_disks)
    }

    /// Creates the canonical goal state: all disks on peg 2.
    pub fn goal(num_disks: Disk) -> Self {
        Self::stacked_on(GOAL_PEG, num_disks)
    }

    fn stacked_on(peg: usize, num_disks: Disk) -> Self {
        let mut pegs: [Vec<Disk>; PEG_COUNT] = Default::default();
        pegs[peg] = (1..=num_disks).rev().collect();
        TowerState {
            num_disks: num_disks as usize,
            pegs,
        }
    }

    /// Builds a state from explicit peg contents (bottom to top).
    ///
    /// # Returns
    /// * `Ok(TowerState)` if the pegs together hold each disk `1..=N` exactly
    ///   once (N being the total number of disks given) and every peg is
    ///   strictly decreasing from bottom to top. With N disks, all in range
    ///   and none repeated, no disk can be missing.
    /// * `Err(TowerError)` describing the first violation found otherwise.
    pub fn from_pegs(pegs: [Vec<Disk>; PEG_COUNT]) -> Result<Self, TowerError> {
        let num_disks: usize = pegs.iter().map(Vec::len).sum();
        let mut seen = vec![false; num_disks + 1];

        for (peg_idx, peg) in pegs.iter().enumerate() {
            for (pos, &disk) in peg.iter().enumerate() {
                if disk == 0 || disk as usize > num_disks {
                    return Err(TowerError::DiskOutOfRange { disk, num_disks });
                }
                if seen[disk as usize] {
                    return Err(TowerError::DuplicateDisk(disk));
                }
                seen[disk as usize] = true;
                if pos > 0 && peg[pos - 1] < disk {
                    return Err(TowerError::StackOrder {
                        peg: peg_idx,
                        lower: peg[pos - 1],
                        upper: disk,
                    });
                }
            }
        }

        Ok(TowerState { num_disks, pegs })
    }

    /// Builds a state without checking any invariant.
    #[cfg(test)]
    pub(crate) fn unchecked(pegs: [Vec<Disk>; PEG_COUNT], num_disks: usize) -> Self {
        TowerState { num_disks, pegs }
    }

    /// Number of disks in play.
    pub fn num_disks(&self) -> usize {
        self.num_disks
    }

    /// Disks on `peg`, bottom to top. Returns an empty slice for a peg index
    /// that does not exist.
    pub fn peg(&self, peg: usize) -> &[Disk] {
        self.pegs.get(peg).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Top disk of `peg`, if any.
    pub fn top(&self, peg: usize) -> Option<Disk> {
        self.pegs.get(peg).and_then(|p| p.last().copied())
    }

    /// Replaces the contents with a random, valid, non-canonical arrangement
    /// using the thread-local RNG. See `randomize_with_rng`.
    pub fn randomize(&mut self) {
        self.randomize_with_rng(&mut thread_rng());
    }

    /// Like `randomize`, but reproducible: the same seed always yields the
    /// same arrangement.
    pub fn randomize_with_seed(&mut self, seed: u64) {
        let mut rng = SmallRng::seed_from_u64(seed);
        self.randomize_with_rng(&mut rng);
    }

    /// Replaces the contents with a random arrangement of all disks.
    ///
    /// One peg is chosen to stay empty. Each disk, largest first, goes onto
    /// one of the two remaining pegs at random. Because disks arrive in
    /// decreasing size, the chosen peg can always accept the disk, so every
    /// disk is placed. An arrangement equal to the canonical start or goal is
    /// discarded and drawn again, so for `N >= 1` the result is never one of
    /// those two.
    pub fn randomize_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let n = self.num_disks as Disk;
        let start = TowerState::new(n);
        let goal = TowerState::goal(n);

        loop {
            let mut pegs: [Vec<Disk>; PEG_COUNT] = Default::default();
            let empty_peg = rng.gen_range(0..PEG_COUNT);
            let candidates: Vec<usize> = (0..PEG_COUNT).filter(|&p| p != empty_peg).collect();

            for disk in (1..=n).rev() {
                let first = candidates[rng.gen_range(0..candidates.len())];
                let second = if first == candidates[0] { candidates[1] } else { candidates[0] };
                let target = [first, second]
                    .into_iter()
                    .find(|&p| pegs[p].last().map_or(true, |&top| top > disk));
                match target {
                    Some(p) => pegs[p].push(disk),
                    None => unreachable!("disks are placed largest first"),
                }
            }

            self.pegs = pegs;
            if n == 0 || (*self != start && *self != goal) {
                return;
            }
        }
    }

    /// Checks whether moving the top disk of `from` onto `to` is legal.
    ///
    /// A move is legal if both pegs exist and differ, `from` is non-empty,
    /// and `to` is empty or its top disk is larger than the one moved.
    /// Has no side effects.
    pub fn is_valid_move(&self, from: usize, to: usize) -> bool {
        if from == to || from >= PEG_COUNT || to >= PEG_COUNT {
            return false;
        }
        match (self.top(from), self.top(to)) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(moving), Some(target)) => moving < target,
        }
    }

    /// Executes `mv` if it is legal.
    ///
    /// # Returns
    /// * `true` if exactly one disk was transferred.
    /// * `false` if the move was illegal; the state is unchanged.
    pub fn apply_move(&mut self, mv: Move) -> bool {
        if !self.is_valid_move(mv.from, mv.to) {
            return false;
        }
        if let Some(disk) = self.pegs[mv.from].pop() {
            self.pegs[mv.to].push(disk);
            true
        } else {
            false
        }
    }

    /// True iff every disk sits on the goal peg and the other pegs are empty.
    pub fn is_goal_state(&self) -> bool {
        self.pegs[GOAL_PEG].len() == self.num_disks
            && (0..PEG_COUNT)
                .filter(|&p| p != GOAL_PEG)
                .all(|p| self.pegs[p].is_empty())
    }

    /// Immutable value copy of the pegs, suitable as a visited-set key.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.pegs.clone().map(Vec::into_boxed_slice))
    }

    /// Replaces all pegs with the contents of `snapshot`.
    ///
    /// Nothing of the previous arrangement is kept. The disk count belongs to
    /// the puzzle and is left as is, so restoring a snapshot taken from a
    /// puzzle with a different count gives a state whose goal is unreachable.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        for (peg, saved) in self.pegs.iter_mut().zip(snapshot.0.iter()) {
            peg.clear();
            peg.extend_from_slice(saved);
        }
    }

    /// All legal moves, ordered by ascending `from` then ascending `to`.
    ///
    /// # Examples
    /// ```
    /// use hanoi_solver::tower::{Move, TowerState};
    /// let tower = TowerState::new(3);
    /// assert_eq!(tower.valid_moves(), vec![Move::new(0, 1), Move::new(0, 2)]);
    /// ```
    pub fn valid_moves(&self) -> Vec<Move> {
        PEG_PAIRS
            .iter()
            .filter(|&&(from, to)| self.is_valid_move(from, to))
            .map(|&(from, to)| Move::new(from, to))
            .collect()
    }
}

impl fmt::Display for TowerState {
    /// One line per peg: the peg index, then its disks bottom to top.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, peg) in self.pegs.iter().enumerate() {
            write!(f, "{} |", idx)?;
            for disk in peg {
                write!(f, " {}", disk)?;
            }
            if idx + 1 < PEG_COUNT {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_valid_arrangement(tower: &TowerState) -> bool {
        TowerState::from_pegs([
            tower.peg(0).to_vec(),
            tower.peg(1).to_vec(),
            tower.peg(2).to_vec(),
        ])
        .is_ok()
    }

    #[test]
    fn test_new_is_canonical_start() {
        let tower = TowerState::new(3);
        assert_eq!(tower.num_disks(), 3);
        assert_eq!(tower.peg(0), &[3, 2, 1]);
        assert!(tower.peg(1).is_empty());
        assert!(tower.peg(2).is_empty());
        assert!(!tower.is_goal_state());
    }

    #[test]
    fn test_goal_state() {
        let goal = TowerState::goal(4);
        assert_eq!(goal.peg(2), &[4, 3, 2, 1]);
        assert!(goal.is_goal_state());
    }

    #[test]
    fn test_zero_disks_is_goal() {
        let tower = TowerState::new(0);
        assert!(tower.is_goal_state());
        assert!(tower.valid_moves().is_empty());
        assert_eq!(tower, TowerState::goal(0));
    }

    #[test]
    fn test_from_pegs_valid() {
        let tower = TowerState::from_pegs([vec![3], vec![2, 1], vec![]]).unwrap();
        assert_eq!(tower.num_disks(), 3);
        assert_eq!(tower.top(1), Some(1));
        assert_eq!(tower.top(2), None);
    }

    #[test]
    fn test_from_pegs_rejects_bad_order() {
        let result = TowerState::from_pegs([vec![1, 2], vec![], vec![]]);
        assert_eq!(
            result.unwrap_err(),
            TowerError::StackOrder { peg: 0, lower: 1, upper: 2 }
        );
    }

    #[test]
    fn test_from_pegs_rejects_duplicates_and_range() {
        assert_eq!(
            TowerState::from_pegs([vec![2], vec![2], vec![]]).unwrap_err(),
            TowerError::DuplicateDisk(2)
        );
        assert_eq!(
            TowerState::from_pegs([vec![5], vec![1], vec![]]).unwrap_err(),
            TowerError::DiskOutOfRange { disk: 5, num_disks: 2 }
        );
        assert!(matches!(
            TowerState::from_pegs([vec![0], vec![], vec![]]),
            Err(TowerError::DiskOutOfRange { disk: 0, .. })
        ));
    }

    #[test]
    fn test_is_valid_move_rules() {
        let tower = TowerState::from_pegs([vec![3], vec![2, 1], vec![]]).unwrap();
        assert!(tower.is_valid_move(1, 0)); // 1 onto 3
        assert!(tower.is_valid_move(1, 2)); // 1 onto empty
        assert!(!tower.is_valid_move(0, 1)); // 3 onto 1
        assert!(!tower.is_valid_move(2, 0)); // empty source
        assert!(!tower.is_valid_move(1, 1)); // same peg
        assert!(!tower.is_valid_move(0, 3)); // no such peg
        assert!(!tower.is_valid_move(7, 0));
    }

    #[test]
    fn test_apply_move_illegal_leaves_state_unchanged() {
        let mut tower = TowerState::new(3);
        let before = tower.clone();
        assert!(!tower.apply_move(Move::new(1, 0)));
        assert!(!tower.apply_move(Move::new(0, 0)));
        assert!(!tower.apply_move(Move::new(0, 5)));
        assert_eq!(tower, before);
    }

    #[test]
    fn test_apply_move_transfers_one_disk() {
        let mut tower = TowerState::new(3);
        assert!(tower.apply_move(Move::new(0, 2)));
        assert_eq!(tower.peg(0), &[3, 2]);
        assert_eq!(tower.peg(2), &[1]);
    }

    #[test]
    fn test_valid_moves_order() {
        let tower = TowerState::from_pegs([vec![3], vec![2], vec![1]]).unwrap();
        assert_eq!(
            tower.valid_moves(),
            vec![Move::new(1, 0), Move::new(2, 0), Move::new(2, 1)]
        );
    }

    #[test]
    fn test_valid_moves_canonical_start() {
        for n in 1..=6 {
            let tower = TowerState::new(n);
            assert_eq!(tower.valid_moves(), vec![Move::new(0, 1), Move::new(0, 2)]);
        }
    }

    #[test]
    fn test_clone_is_independent() {
        let original = TowerState::new(3);
        let mut copy = original.clone();
        assert!(copy.apply_move(Move::new(0, 1)));
        assert_eq!(original.peg(0), &[3, 2, 1]);
        assert_ne!(original, copy);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut tower = TowerState::from_pegs([vec![4, 1], vec![3, 2], vec![]]).unwrap();
        let moves_before = tower.valid_moves();
        let goal_before = tower.is_goal_state();

        let snap = tower.snapshot();
        tower.restore(&snap);

        assert_eq!(tower.valid_moves(), moves_before);
        assert_eq!(tower.is_goal_state(), goal_before);
        assert_eq!(tower.snapshot(), snap);
    }

    #[test]
    fn test_restore_replaces_contents() {
        let mut tower = TowerState::new(3);
        let goal_snapshot = TowerState::goal(3).snapshot();
        tower.restore(&goal_snapshot);
        assert!(tower.peg(0).is_empty());
        assert!(tower.is_goal_state());
        assert_eq!(tower.snapshot().peg(2), &[3, 2, 1]);
    }

    #[test]
    fn test_restore_keeps_disk_count() {
        let mut tower = TowerState::new(3);
        tower.restore(&TowerState::goal(2).snapshot());
        assert_eq!(tower.num_disks(), 3);
        assert!(!tower.is_goal_state());
    }

    #[test]
    fn test_snapshot_equality_is_by_value() {
        let a = TowerState::from_pegs([vec![2], vec![1], vec![]]).unwrap();
        let mut b = TowerState::new(2);
        assert!(b.apply_move(Move::new(0, 1)));
        assert_eq!(a.snapshot(), b.snapshot());
        assert!(b.apply_move(Move::new(1, 2)));
        assert_ne!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_randomize_places_all_disks_and_leaves_a_peg_empty() {
        for seed in 0..200 {
            let mut tower = TowerState::new(7);
            tower.randomize_with_seed(seed);
            assert!(is_valid_arrangement(&tower), "seed {} gave {:?}", seed, tower);
            let total: usize = (0..PEG_COUNT).map(|p| tower.peg(p).len()).sum();
            assert_eq!(total, 7);
            assert!((0..PEG_COUNT).any(|p| tower.peg(p).is_empty()));
            assert_ne!(tower, TowerState::new(7));
            assert!(!tower.is_goal_state());
        }
    }

    #[test]
    fn test_randomize_seed_determinism() {
        let mut a = TowerState::new(6);
        let mut b = TowerState::new(6);
        a.randomize_with_seed(42);
        b.randomize_with_seed(42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_randomize_single_and_zero_disks() {
        let mut one = TowerState::new(1);
        one.randomize_with_seed(3);
        assert_eq!(one.peg(1), &[1]);

        let mut zero = TowerState::new(0);
        zero.randomize();
        assert!(zero.is_goal_state());
    }

    #[test]
    fn test_display() {
        let tower = TowerState::from_pegs([vec![3, 1], vec![], vec![2]]).unwrap();
        assert_eq!(tower.to_string(), "0 | 3 1\n1 |\n2 | 2");
        assert_eq!(Move::new(1, 2).to_string(), "1 -> 2");
    }
}

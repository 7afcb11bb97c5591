use crate::error::TowerError;
use crate::tower::{Disk, Move, TowerState, PEG_COUNT};

/// Parses a textual tower description into a `TowerState`.
///
/// The three pegs are separated by `/`, in peg order. Each peg lists its
/// disks bottom to top, separated by whitespace or commas. An empty section
/// is an empty peg.
///
/// # Arguments
/// * `s`: The description, e.g. `"3 2 / 1 /"`.
///
/// # Returns
/// * `Ok(TowerState)` if the text names exactly three pegs and the resulting
///   arrangement is valid (see `TowerState::from_pegs`).
/// * `Err(TowerError::Parse)` if the peg count is wrong or a disk is not a
///   number in `1..=255`.
/// * Any other `TowerError` from validating the arrangement.
///
/// # Examples
/// ```
/// use hanoi_solver::utils::tower_from_str;
///
/// let tower = tower_from_str("3 2 / 1 /").unwrap();
/// assert_eq!(tower.peg(0), &[3, 2]);
/// assert_eq!(tower.peg(1), &[1]);
/// assert!(tower.peg(2).is_empty());
///
/// assert!(tower_from_str("1 2 / /").is_err()); // larger disk on a smaller one
/// assert!(tower_from_str("3 2 1").is_err()); // only one peg given
/// ```
pub fn tower_from_str(s: &str) -> Result<TowerState, TowerError> {
    let sections: Vec<&str> = s.split('/').collect();
    if sections.len() != PEG_COUNT {
        return Err(TowerError::Parse(format!(
            "Expected {} pegs separated by '/', found {}",
            PEG_COUNT,
            sections.len()
        )));
    }

    let mut pegs: [Vec<Disk>; PEG_COUNT] = Default::default();
    for (peg_idx, section) in sections.iter().enumerate() {
        for token in section
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
        {
            let disk: Disk = token.parse().map_err(|_| {
                TowerError::Parse(format!(
                    "Unrecognized disk '{}' on peg {}",
                    token, peg_idx
                ))
            })?;
            pegs[peg_idx].push(disk);
        }
    }

    TowerState::from_pegs(pegs)
}

/// Parses a move written as `"from to"`, `"from,to"` or `"from->to"`.
pub fn move_from_str(s: &str) -> Result<Move, TowerError> {
    let parts: Vec<&str> = s
        .split(|c: char| c.is_whitespace() || c == ',' || c == '-' || c == '>')
        .filter(|t| !t.is_empty())
        .collect();
    if parts.len() != 2 {
        return Err(TowerError::Parse(format!(
            "Expected two peg numbers, found '{}'",
            s.trim()
        )));
    }

    let mut pegs = [0usize; 2];
    for (slot, part) in pegs.iter_mut().zip(&parts) {
        let peg: usize = part
            .parse()
            .map_err(|_| TowerError::Parse(format!("Unrecognized peg '{}'", part)))?;
        if peg >= PEG_COUNT {
            return Err(TowerError::InvalidPeg(peg));
        }
        *slot = peg;
    }
    Ok(Move::new(pegs[0], pegs[1]))
}

/// Applies `path` to a copy of `start`, move by move.
///
/// # Returns
/// * `Ok(TowerState)` with the final arrangement if every move was legal.
/// * `Err(TowerError::IllegalMove)` naming the first move that was not.
pub fn replay(start: &TowerState, path: &[Move]) -> Result<TowerState, TowerError> {
    let mut tower = start.clone();
    for (index, &mv) in path.iter().enumerate() {
        if !tower.apply_move(mv) {
            return Err(TowerError::IllegalMove { index, mv });
        }
    }
    Ok(tower)
}

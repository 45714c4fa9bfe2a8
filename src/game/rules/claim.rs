//! Claiming unowned cells.

use super::super::{Board, InvalidMove, Player, Position};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Gives `player` every cell in `cells`.
///
/// All cells must be on the board, unowned, and distinct. Nothing changes
/// unless every cell passes.
///
/// # Errors
///
/// Returns the first failing condition as an [`InvalidMove`].
#[instrument(skip(board))]
pub fn claim(board: &mut Board, player: Player, cells: &[Position]) -> Result<Vec<Position>, InvalidMove> {
    if cells.is_empty() {
        return Err(InvalidMove::EmptyClaim);
    }

    let mut seen = HashSet::with_capacity(cells.len());
    for &pos in cells {
        let cell = board.cell(pos).ok_or(InvalidMove::OutOfBounds(pos))?;
        if !seen.insert(pos) {
            return Err(InvalidMove::DuplicateCell(pos));
        }
        if !cell.is_empty() {
            return Err(InvalidMove::CellOccupied(pos));
        }
    }

    let grid = board.grid_mut();
    for &pos in cells {
        grid[pos].set_owner(Some(player));
    }

    debug!(count = cells.len(), "Cells claimed");
    Ok(cells.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::new(6, 8, [Position::new(0, 0), Position::new(4, 6)]).unwrap()
    }

    #[test]
    fn test_claim_sets_owner() {
        let mut board = board();
        let cells = [Position::new(2, 2), Position::new(2, 3)];
        assert_eq!(claim(&mut board, Player::Two, &cells).unwrap(), cells.to_vec());
        for pos in cells {
            assert!(board.cell(pos).unwrap().is_owned_by(Player::Two));
        }
    }

    #[test]
    fn test_claim_occupied_is_untouched() {
        let mut board = board();
        claim(&mut board, Player::One, &[Position::new(3, 3)]).unwrap();
        let before = board.clone();
        let result = claim(&mut board, Player::Two, &[Position::new(3, 4), Position::new(3, 3)]);
        assert_eq!(result, Err(InvalidMove::CellOccupied(Position::new(3, 3))));
        assert_eq!(board, before);
    }

    #[test]
    fn test_claim_base_rejected() {
        let mut board = board();
        let result = claim(&mut board, Player::Two, &[Position::new(1, 1)]);
        assert_eq!(result, Err(InvalidMove::CellOccupied(Position::new(1, 1))));
    }

    #[test]
    fn test_claim_duplicate_rejected() {
        let mut board = board();
        let pos = Position::new(2, 5);
        let result = claim(&mut board, Player::One, &[pos, pos]);
        assert_eq!(result, Err(InvalidMove::DuplicateCell(pos)));
        assert!(board.cell(pos).unwrap().is_empty());
    }

    #[test]
    fn test_claim_out_of_bounds_rejected() {
        let mut board = board();
        let result = claim(&mut board, Player::One, &[Position::new(6, 0)]);
        assert_eq!(result, Err(InvalidMove::OutOfBounds(Position::new(6, 0))));
    }

    #[test]
    fn test_empty_claim_rejected() {
        let mut board = board();
        assert_eq!(claim(&mut board, Player::One, &[]), Err(InvalidMove::EmptyClaim));
    }
}

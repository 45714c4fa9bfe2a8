//! Erasing a uniformly owned 4x4 block.

use super::super::types::{ERASE_RING, ERASE_RING_THRESHOLD, ERASE_SIZE};
use super::super::{Board, InvalidMove, Player, Position};
use tracing::{debug, instrument};

/// Validates an erase and returns the block it would clear.
///
/// The eraser must hold at least [`ERASE_RING_THRESHOLD`] non-base cells of
/// the ring bordering the block, and the block must be on the board, free of
/// base cells, and owned uniformly by one player. An unclaimed block has
/// nothing to erase and is rejected.
///
/// # Errors
///
/// Returns the first failing condition as an [`InvalidMove`].
pub fn check_erase(board: &Board, player: Player, corner: Position) -> Result<Vec<Position>, InvalidMove> {
    let found = ERASE_RING
        .iter()
        .filter_map(|&(d_row, d_col)| corner.offset(d_row, d_col))
        .filter_map(|pos| board.cell(pos))
        .filter(|cell| !cell.is_base() && cell.is_owned_by(player))
        .count();
    if found < ERASE_RING_THRESHOLD {
        return Err(InvalidMove::InsufficientSurround {
            found,
            needed: ERASE_RING_THRESHOLD,
        });
    }

    let block = board
        .grid()
        .region(corner, ERASE_SIZE, ERASE_SIZE)
        .ok_or(InvalidMove::BlockOutOfBounds(corner))?;

    let owner = board.grid()[corner].owner();
    for &pos in &block {
        let cell = board.grid()[pos];
        if cell.is_base() {
            return Err(InvalidMove::BlockContainsBase(pos));
        }
        if cell.owner() != owner {
            return Err(InvalidMove::BlockNotUniform(pos));
        }
    }
    if owner.is_none() {
        return Err(InvalidMove::EmptyBlock(corner));
    }

    Ok(block)
}

/// Clears the block at `corner` after validating it.
///
/// # Errors
///
/// Returns an [`InvalidMove`] from [`check_erase`]; the board is unchanged.
#[instrument(skip(board))]
pub fn erase(board: &mut Board, player: Player, corner: Position) -> Result<(), InvalidMove> {
    let block = check_erase(board, player, corner)?;
    let grid = board.grid_mut();
    for pos in block {
        grid[pos].set_owner(None);
    }
    debug!("Block erased");
    Ok(())
}

/// Every corner where `player` could legally erase, row-major.
#[instrument(skip(board))]
pub fn erase_spots(board: &Board, player: Player) -> Vec<Position> {
    board
        .grid()
        .positions()
        .filter(|&corner| check_erase(board, player, corner).is_ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 10x10 board with bases tucked into the bottom corners.
    fn board() -> Board {
        Board::new(10, 10, [Position::new(8, 0), Position::new(8, 8)]).unwrap()
    }

    fn block_at(corner: Position) -> Vec<Position> {
        (0..4)
            .flat_map(|r| (0..4).map(move |c| Position::new(corner.row + r, corner.col + c)))
            .collect()
    }

    /// Player two owns the block at (2, 2); player one holds `ring` ring cells.
    fn setup(ring: usize) -> Board {
        let mut board = board();
        board.claim(Player::Two, &block_at(Position::new(2, 2))).unwrap();
        let ring_cells: Vec<_> = (0..ring).map(|i| Position::new(1, 2 + i)).collect();
        if !ring_cells.is_empty() {
            board.claim(Player::One, &ring_cells).unwrap();
        }
        board
    }

    #[test]
    fn test_erase_clears_block() {
        let mut board = setup(4);
        erase(&mut board, Player::One, Position::new(2, 2)).unwrap();
        for pos in block_at(Position::new(2, 2)) {
            assert!(board.cell(pos).unwrap().is_empty());
        }
        // Ring cells survive.
        assert!(board.cell(Position::new(1, 2)).unwrap().is_owned_by(Player::One));
    }

    #[test]
    fn test_erase_needs_four_ring_cells() {
        let mut board = setup(3);
        let before = board.clone();
        let result = erase(&mut board, Player::One, Position::new(2, 2));
        assert_eq!(result, Err(InvalidMove::InsufficientSurround { found: 3, needed: 4 }));
        assert_eq!(board, before);
    }

    #[test]
    fn test_erase_rejects_mixed_block() {
        let mut board = setup(4);
        board.grid_mut()[Position::new(4, 4)].set_owner(Some(Player::One));
        let result = erase(&mut board, Player::One, Position::new(2, 2));
        assert_eq!(result, Err(InvalidMove::BlockNotUniform(Position::new(4, 4))));
    }

    #[test]
    fn test_erase_rejects_empty_block() {
        let mut board = board();
        let ring: Vec<_> = (0..4).map(|i| Position::new(1, 2 + i)).collect();
        board.claim(Player::One, &ring).unwrap();
        let result = erase(&mut board, Player::One, Position::new(2, 2));
        assert_eq!(result, Err(InvalidMove::EmptyBlock(Position::new(2, 2))));
    }

    #[test]
    fn test_erase_rejects_block_off_board() {
        let mut board = board();
        let ring: Vec<_> = (0..4).map(|i| Position::new(6, 6 + i)).collect();
        board.claim(Player::One, &ring).unwrap();
        let result = erase(&mut board, Player::One, Position::new(7, 6));
        assert_eq!(result, Err(InvalidMove::BlockOutOfBounds(Position::new(7, 6))));
    }

    #[test]
    fn test_erase_rejects_base_in_block() {
        let mut board = board();
        // Block rows 6-9, cols 0-3 contains player one's base at (8, 0).
        let ring: Vec<_> = (0..4).map(|i| Position::new(5, i)).collect();
        board.claim(Player::Two, &ring).unwrap();
        let result = erase(&mut board, Player::Two, Position::new(6, 0));
        assert_eq!(result, Err(InvalidMove::BlockContainsBase(Position::new(8, 0))));
    }

    #[test]
    fn test_ring_base_cells_do_not_count() {
        let mut board = board();
        // Block rows 4-7, cols 0-3 sits just above player one's base.
        board.claim(Player::Two, &block_at(Position::new(4, 0))).unwrap();
        board.claim(Player::One, &[Position::new(8, 2), Position::new(8, 3)]).unwrap();
        let result = erase(&mut board, Player::One, Position::new(4, 0));
        assert_eq!(result, Err(InvalidMove::InsufficientSurround { found: 2, needed: 4 }));
    }

    #[test]
    fn test_erase_spots_lists_legal_corners() {
        let board = setup(4);
        assert_eq!(erase_spots(&board, Player::One), vec![Position::new(2, 2)]);
        assert!(erase_spots(&board, Player::Two).is_empty());
    }
}

//! Base invariants: base regions stay in place and always have an owner.

use super::super::{BASE_SIZE, Board, Player};
use super::Invariant;

/// Invariant: every base cell has an owner.
///
/// Bases can only gain cells (a winning path) and never lose their owner.
pub struct BasesOwnedInvariant;

impl Invariant<Board> for BasesOwnedInvariant {
    fn holds(board: &Board) -> bool {
        board
            .grid()
            .positions()
            .filter_map(|pos| board.cell(pos))
            .filter(|cell| cell.is_base())
            .all(|cell| !cell.is_empty())
    }

    fn description() -> &'static str {
        "Every base cell has an owner"
    }
}

/// Invariant: each player's base region is intact.
///
/// The full square at each anchor is base, and until a conquest it belongs to
/// the anchor's player.
pub struct BaseRegionsInvariant;

impl Invariant<Board> for BaseRegionsInvariant {
    fn holds(board: &Board) -> bool {
        Player::ALL.into_iter().all(|player| {
            let region = board.base_region(player);
            region.len() == BASE_SIZE * BASE_SIZE
                && region
                    .iter()
                    .filter_map(|&pos| board.cell(pos))
                    .all(|cell| cell.is_base() && !cell.is_empty())
        })
    }

    fn description() -> &'static str {
        "Both base regions are complete and owned"
    }
}

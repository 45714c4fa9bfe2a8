//! Flood capture: enemy cells touched from two sides change hands.

use super::super::{Board, Player, Position};
use std::collections::VecDeque;
use tracing::{debug, instrument};

/// Number of distinct capturing neighbours that flip an enemy cell.
const CONTACT_THRESHOLD: u8 = 2;

/// Converts every enemy cell reachable by the two-sided contact rule.
///
/// Every non-base cell owned by `player` seeds a queue. Popping a cell counts
/// one contact on each enemy neighbour (base cells excluded); an enemy cell
/// reaching [`CONTACT_THRESHOLD`] contacts flips to `player` and joins the
/// queue. Each cell flips at most once, so the fill terminates.
///
/// Returns the converted cells in conversion order.
#[instrument(skip(board))]
pub fn capture(board: &mut Board, player: Player) -> Vec<Position> {
    let enemy = player.opponent();
    let grid = board.grid_mut();
    let cols = grid.cols();
    let mut touching = vec![0u8; grid.rows() * cols];

    let mut queue: VecDeque<Position> = grid
        .positions()
        .filter(|&pos| grid[pos].is_owned_by(player) && !grid[pos].is_base())
        .collect();
    let seeds = queue.len();

    let mut captured = Vec::new();
    while let Some(current) = queue.pop_front() {
        let neighbours: Vec<Position> = grid.adjacent(current, false).collect();
        for next in neighbours {
            if !grid[next].is_owned_by(enemy) {
                continue;
            }
            let count = &mut touching[next.row * cols + next.col];
            *count += 1;
            if *count >= CONTACT_THRESHOLD {
                grid[next].set_owner(Some(player));
                queue.push_back(next);
                captured.push(next);
            }
        }
    }

    debug!(seeds, captured = captured.len(), "Capture finished");
    captured
}

//! Conquest: winning through an owned path into the enemy base.

use super::super::{Board, InvalidMove, Player, Position};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::{debug, info, instrument};

/// A found route into the enemy base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breach {
    /// Owned cells from the mover's base anchor to the cell touching the enemy base.
    pub path: Vec<Position>,
    /// The enemy base cell the path reaches.
    pub target: Position,
}

/// Searches for an owned path from `player`'s base anchor into the enemy base.
///
/// Cells owned by `player` (base cells of either side included in adjacency)
/// are the traversable nodes, each step costing one. The frontier is a
/// min-heap keyed by `(distance, position)`, so ties go to the row-major
/// smallest cell. The search stops at the first popped cell with an
/// enemy-owned base neighbour.
#[instrument(skip(board))]
pub fn find_breach(board: &Board, player: Player) -> Option<Breach> {
    let enemy = player.opponent();
    let grid = board.grid();
    let cols = grid.cols();
    let idx = |pos: Position| pos.row * cols + pos.col;
    let len = grid.rows() * cols;

    let mut dist = vec![usize::MAX; len];
    let mut visited = vec![false; len];
    let mut prev: Vec<Option<Position>> = vec![None; len];

    let start = board.base_anchor(player);
    dist[idx(start)] = 0;
    let mut frontier = BinaryHeap::new();
    frontier.push(Reverse((0usize, start)));

    while let Some(Reverse((path_len, current))) = frontier.pop() {
        if visited[idx(current)] {
            // Stale heap entry.
            continue;
        }
        visited[idx(current)] = true;

        for next in grid.adjacent(current, true) {
            let cell = grid[next];
            if !visited[idx(next)] && cell.is_owned_by(player) && dist[idx(next)] > path_len + 1 {
                dist[idx(next)] = path_len + 1;
                prev[idx(next)] = Some(current);
                frontier.push(Reverse((path_len + 1, next)));
            }

            if cell.is_base() && cell.is_owned_by(enemy) {
                let mut path = vec![current];
                let mut step = current;
                while let Some(back) = prev[idx(step)] {
                    path.push(back);
                    step = back;
                }
                path.reverse();
                debug!(length = path.len(), target = %next, "Breach found");
                return Some(Breach { path, target: next });
            }
        }
    }

    debug!("No breach");
    None
}

/// Performs conquest for `player`.
///
/// On success every path cell is flagged as base (the breach trail) and the
/// reached enemy base cell passes to `player`, staying a base cell.
///
/// # Errors
///
/// Returns [`InvalidMove::NoPath`] with the board unchanged if no path exists.
#[instrument(skip(board))]
pub fn conquest(board: &mut Board, player: Player) -> Result<Vec<Position>, InvalidMove> {
    let Breach { path, target } = find_breach(board, player).ok_or(InvalidMove::NoPath(player))?;

    let grid = board.grid_mut();
    for &pos in &path {
        grid[pos].mark_base();
    }
    grid[target].set_owner(Some(player));

    info!(%player, length = path.len(), %target, "Enemy base breached");
    Ok(path)
}

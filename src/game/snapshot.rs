//! Structural board snapshots handed to the transport layer.
//!
//! A snapshot reports `(owner, is_base)` for every cell. Mapping those pairs
//! to user-facing symbols is the transport's job.

use super::board::Board;
use super::phases::GameStatus;
use super::types::{Player, Position};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// What a single cell looks like from outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellView {
    /// 0 for unclaimed, otherwise the owning player's number.
    pub owner: u8,
    /// Whether the cell belongs to a base.
    pub is_base: bool,
}

impl CellView {
    /// The `(owner, is_base)` pair.
    pub fn as_tuple(&self) -> (u8, bool) {
        (self.owner, self.is_base)
    }
}

/// Board state after a move, plus turn information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct BoardSnapshot {
    /// Number of moves applied to reach this board.
    move_number: usize,
    /// Game status at this point.
    status: GameStatus,
    /// Player to move next, if the game is still running.
    to_move: Option<Player>,
    /// Number of rows.
    rows: usize,
    /// Number of columns.
    cols: usize,
    /// Cells, row by row.
    cells: Vec<Vec<CellView>>,
}

impl BoardSnapshot {
    /// Captures `board` together with turn information.
    pub fn new(board: &Board, move_number: usize, status: GameStatus, to_move: Player) -> Self {
        let cells = board
            .grid()
            .iter_rows()
            .map(|row| {
                row.iter()
                    .map(|cell| CellView {
                        owner: cell.owner_number(),
                        is_base: cell.is_base(),
                    })
                    .collect()
            })
            .collect();
        Self {
            move_number,
            status,
            to_move: status.is_in_progress().then_some(to_move),
            rows: board.rows(),
            cols: board.cols(),
            cells,
        }
    }

    /// The view of the cell at `pos`, or `None` off the board.
    pub fn cell(&self, pos: Position) -> Option<CellView> {
        self.cells.get(pos.row)?.get(pos.col).copied()
    }
}

impl std::fmt::Display for BoardSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, row) in self.cells.iter().enumerate() {
            for view in row {
                let symbol = match view.as_tuple() {
                    (0, _) => '.',
                    (1, false) => '1',
                    (2, false) => '2',
                    (1, true) => 'A',
                    (_, _) => 'B',
                };
                write!(f, "{}", symbol)?;
            }
            if idx + 1 < self.cells.len() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

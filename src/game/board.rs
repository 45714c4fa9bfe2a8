//! The Conquid board: a grid plus the two base anchors.

use super::action::{InvalidMove, Move, MoveEffect};
use super::grid::Grid;
use super::rules;
use super::types::{BASE_SIZE, Cell, MAX_CELLS, Player, Position};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Reasons a board cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SetupError {
    /// The grid has no cells.
    #[display("Board must have at least one row and column (got {}x{})", rows, cols)]
    EmptyGrid {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
    },
    /// The grid exceeds [`MAX_CELLS`].
    #[display("Board of {}x{} exceeds {} cells", rows, cols, MAX_CELLS)]
    TooLarge {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
    },
    /// A base region does not fit on the grid.
    #[display("Base for {} at {} does not fit on the board", player, anchor)]
    BaseOutOfBounds {
        /// Owner of the base.
        player: Player,
        /// Requested anchor.
        anchor: Position,
    },
    /// The two base regions share cells.
    #[display("Bases at {} and {} overlap", first, second)]
    OverlappingBases {
        /// Player one's anchor.
        first: Position,
        /// Player two's anchor.
        second: Position,
    },
}

/// Board state: cell ownership and base regions.
///
/// Cloning produces a fully independent board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    grid: Grid,
    bases: [Position; 2],
}

impl Board {
    /// Creates a board with both base regions established.
    ///
    /// `bases[0]` anchors player one's base and `bases[1]` player two's; each
    /// anchor is the top-left of a `BASE_SIZE` square.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if the grid is empty or too large, or a base does
    /// not fit.
    #[instrument]
    pub fn new(rows: usize, cols: usize, bases: [Position; 2]) -> Result<Self, SetupError> {
        if rows == 0 || cols == 0 {
            return Err(SetupError::EmptyGrid { rows, cols });
        }
        if rows.checked_mul(cols).is_none_or(|cells| cells > MAX_CELLS) {
            return Err(SetupError::TooLarge { rows, cols });
        }

        let mut grid = Grid::new(rows, cols);
        let mut regions = Vec::with_capacity(2);
        for player in Player::ALL {
            let anchor = bases[player.index()];
            let region = grid
                .region(anchor, BASE_SIZE, BASE_SIZE)
                .ok_or(SetupError::BaseOutOfBounds { player, anchor })?;
            regions.push(region);
        }
        if regions[0].iter().any(|pos| regions[1].contains(pos)) {
            return Err(SetupError::OverlappingBases {
                first: bases[0],
                second: bases[1],
            });
        }

        for (player, region) in Player::ALL.into_iter().zip(&regions) {
            for &pos in region {
                grid[pos] = Cell::base(player);
            }
        }

        debug!(rows, cols, "Board created");
        Ok(Self { grid, bases })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    /// The underlying grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Base anchors, indexed by seat.
    pub fn bases(&self) -> [Position; 2] {
        self.bases
    }

    /// Anchor of `player`'s base.
    pub fn base_anchor(&self, player: Player) -> Position {
        self.bases[player.index()]
    }

    /// Positions of `player`'s base region.
    pub fn base_region(&self, player: Player) -> Vec<Position> {
        self.grid
            .region(self.base_anchor(player), BASE_SIZE, BASE_SIZE)
            .unwrap_or_default()
    }

    /// Returns true if `pos` lies on the board.
    pub fn is_valid(&self, pos: Position) -> bool {
        self.grid.is_valid(pos)
    }

    /// Returns the cell at `pos`, or `None` off the board.
    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.grid.get(pos)
    }

    /// Orthogonal neighbours of `pos`; see [`Grid::adjacent`].
    pub fn adjacent(&self, pos: Position, include_base: bool) -> impl Iterator<Item = Position> + '_ {
        self.grid.adjacent(pos, include_base)
    }

    /// Number of cells owned by `player`, base cells included.
    pub fn count_owned(&self, player: Player) -> usize {
        self.grid
            .positions()
            .filter(|&pos| self.grid[pos].is_owned_by(player))
            .count()
    }

    /// Claims every cell in `cells` for `player`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMove`] if any cell is off the board, owned, or listed twice.
    pub fn claim(&mut self, player: Player, cells: &[Position]) -> Result<Vec<Position>, InvalidMove> {
        rules::claim(self, player, cells)
    }

    /// Converts every enemy cell touched from two sides by `player`.
    ///
    /// Never fails; returns the converted cells (possibly none).
    pub fn capture(&mut self, player: Player) -> Vec<Position> {
        rules::capture(self, player)
    }

    /// Clears the 4x4 block at `corner`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMove`] if the ring or block conditions do not hold.
    pub fn erase(&mut self, player: Player, corner: Position) -> Result<(), InvalidMove> {
        rules::erase(self, player, corner)
    }

    /// Checks whether `player` may erase the block at `corner`.
    ///
    /// # Errors
    ///
    /// Returns the [`InvalidMove`] an erase there would fail with.
    pub fn check_erase(&self, player: Player, corner: Position) -> Result<(), InvalidMove> {
        rules::check_erase(self, player, corner).map(|_| ())
    }

    /// Every corner at which `player` could erase right now.
    pub fn erase_spots(&self, player: Player) -> Vec<Position> {
        rules::erase_spots(self, player)
    }

    /// Attempts conquest: an owned path from `player`'s base into the enemy base.
    ///
    /// On success the path is marked and the touched enemy base cell passes
    /// to `player`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMove::NoPath`] if no such path exists.
    pub fn path_win(&mut self, player: Player) -> Result<Vec<Position>, InvalidMove> {
        rules::conquest(self, player)
    }

    /// Applies `mv` to a copy of this board, leaving `self` untouched.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMove`] if the move is not legal here.
    #[instrument(skip(self), fields(kind = mv.kind()))]
    pub fn apply_clone(&self, mv: &Move) -> Result<(Board, MoveEffect), InvalidMove> {
        let mut working = self.clone();
        let effect = mv.apply(&mut working)?;
        Ok((working, effect))
    }

    /// Formats the board as text: `.` unclaimed, `1`/`2` owned, `A`/`B` base.
    pub fn display(&self) -> String {
        let mut result = String::with_capacity(self.rows() * (self.cols() + 1));
        for (row_idx, row) in self.grid.iter_rows().enumerate() {
            for cell in row {
                let symbol = match (cell.owner(), cell.is_base()) {
                    (None, _) => '.',
                    (Some(Player::One), false) => '1',
                    (Some(Player::Two), false) => '2',
                    (Some(Player::One), true) => 'A',
                    (Some(Player::Two), true) => 'B',
                };
                result.push(symbol);
            }
            if row_idx + 1 < self.rows() {
                result.push('\n');
            }
        }
        result
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> Board {
        Board::new(14, 28, [Position::new(6, 4), Position::new(6, 22)]).unwrap()
    }

    #[test]
    fn test_new_places_bases() {
        let board = standard();
        for player in Player::ALL {
            let region = board.base_region(player);
            assert_eq!(region.len(), BASE_SIZE * BASE_SIZE);
            for pos in region {
                let cell = board.cell(pos).unwrap();
                assert!(cell.is_base());
                assert_eq!(cell.owner(), Some(player));
            }
        }
        assert_eq!(board.count_owned(Player::One), 4);
    }

    #[test]
    fn test_base_off_board_rejected() {
        let result = Board::new(5, 5, [Position::new(0, 0), Position::new(4, 4)]);
        assert!(matches!(result, Err(SetupError::BaseOutOfBounds { player: Player::Two, .. })));
    }

    #[test]
    fn test_overlapping_bases_rejected() {
        let result = Board::new(5, 5, [Position::new(0, 0), Position::new(1, 1)]);
        assert!(matches!(result, Err(SetupError::OverlappingBases { .. })));
    }

    #[test]
    fn test_empty_grid_rejected() {
        let result = Board::new(0, 5, [Position::new(0, 0), Position::new(0, 2)]);
        assert!(matches!(result, Err(SetupError::EmptyGrid { .. })));
    }

    #[test]
    fn test_clone_is_independent() {
        let board = standard();
        let mut copy = board.clone();
        copy.claim(Player::One, &[Position::new(0, 0)]).unwrap();
        assert!(board.cell(Position::new(0, 0)).unwrap().is_empty());
        assert_ne!(board, copy);
    }

    #[test]
    fn test_apply_clone_leaves_original() {
        let board = standard();
        let (after, effect) = board
            .apply_clone(&Move::claim(Player::One, [Position::new(1, 1)]))
            .unwrap();
        assert_eq!(effect, MoveEffect::Claimed { claimed: vec![Position::new(1, 1)] });
        assert!(board.cell(Position::new(1, 1)).unwrap().is_empty());
        assert!(after.cell(Position::new(1, 1)).unwrap().is_owned_by(Player::One));
    }

    #[test]
    fn test_display() {
        let mut board = Board::new(2, 5, [Position::new(0, 0), Position::new(0, 3)]).unwrap();
        board.claim(Player::Two, &[Position::new(1, 2)]).unwrap();
        assert_eq!(board.display(), "AA.BB\nAA2BB");
    }
}

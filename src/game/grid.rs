//! Fixed-size grid of cells with geometric queries.
//!
//! The grid knows nothing about game rules: it stores cells row-major and
//! answers bounds, adjacency and region questions.

use super::types::{ADJACENT_OFFSETS, Cell, Position};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Row-major 2D array of cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid of unclaimed cells.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::empty(); rows * cols],
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns true if `pos` lies on the grid.
    pub fn is_valid(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Returns the cell at `pos`, or `None` off the grid.
    pub fn get(&self, pos: Position) -> Option<&Cell> {
        self.index_of(pos).map(|idx| &self.cells[idx])
    }

    /// Orthogonal in-bounds neighbours of `pos`.
    ///
    /// Base cells are skipped unless `include_base` is set. Order is fixed:
    /// `+col`, `-col`, `+row`, `-row`.
    pub fn adjacent(&self, pos: Position, include_base: bool) -> impl Iterator<Item = Position> + '_ {
        ADJACENT_OFFSETS.iter().filter_map(move |&(d_row, d_col)| {
            let next = pos.offset(d_row, d_col)?;
            let cell = self.get(next)?;
            (include_base || !cell.is_base()).then_some(next)
        })
    }

    /// Every position on the grid, row-major.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| Position::new(row, col)))
    }

    /// Positions of the `height` x `width` rectangle whose top-left is `corner`.
    ///
    /// Returns `None` if any part of the rectangle falls off the grid.
    pub fn region(&self, corner: Position, height: usize, width: usize) -> Option<Vec<Position>> {
        if height == 0 || width == 0 {
            return Some(Vec::new());
        }
        let far = Position::new(
            corner.row.checked_add(height - 1)?,
            corner.col.checked_add(width - 1)?,
        );
        if !self.is_valid(corner) || !self.is_valid(far) {
            return None;
        }
        Some(
            (corner.row..=far.row)
                .flat_map(|row| (corner.col..=far.col).map(move |col| Position::new(row, col)))
                .collect(),
        )
    }

    /// Iterates cells row by row.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.cols.max(1))
    }

    fn index_of(&self, pos: Position) -> Option<usize> {
        self.is_valid(pos).then(|| pos.row * self.cols + pos.col)
    }
}

impl Index<Position> for Grid {
    type Output = Cell;

    fn index(&self, pos: Position) -> &Cell {
        assert!(self.is_valid(pos), "position {} outside {}x{} grid", pos, self.rows, self.cols);
        &self.cells[pos.row * self.cols + pos.col]
    }
}

impl IndexMut<Position> for Grid {
    fn index_mut(&mut self, pos: Position) -> &mut Cell {
        assert!(self.is_valid(pos), "position {} outside {}x{} grid", pos, self.rows, self.cols);
        &mut self.cells[pos.row * self.cols + pos.col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::Player;

    #[test]
    fn test_bounds() {
        let grid = Grid::new(3, 5);
        assert!(grid.is_valid(Position::new(2, 4)));
        assert!(!grid.is_valid(Position::new(3, 0)));
        assert!(!grid.is_valid(Position::new(0, 5)));
    }

    #[test]
    fn test_region_near_usize_max_is_none() {
        let grid = Grid::new(3, 5);
        assert_eq!(grid.region(Position::new(usize::MAX, 0), 2, 2), None);
        assert_eq!(grid.region(Position::new(0, usize::MAX), 2, 2), None);
    }

    #[test]
    fn test_corner_has_two_neighbours() {
        let grid = Grid::new(3, 3);
        let adj: Vec<_> = grid.adjacent(Position::new(0, 0), false).collect();
        assert_eq!(adj, vec![Position::new(0, 1), Position::new(1, 0)]);
    }

    #[test]
    fn test_adjacent_order_is_fixed() {
        let grid = Grid::new(3, 3);
        let adj: Vec<_> = grid.adjacent(Position::new(1, 1), false).collect();
        assert_eq!(
            adj,
            vec![
                Position::new(1, 2),
                Position::new(1, 0),
                Position::new(2, 1),
                Position::new(0, 1),
            ]
        );
    }

    #[test]
    fn test_adjacent_skips_base_unless_asked() {
        let mut grid = Grid::new(3, 3);
        grid[Position::new(1, 2)] = Cell::base(Player::One);
        assert_eq!(grid.adjacent(Position::new(1, 1), false).count(), 3);
        assert_eq!(grid.adjacent(Position::new(1, 1), true).count(), 4);
    }

    #[test]
    fn test_region_off_grid() {
        let grid = Grid::new(4, 4);
        assert_eq!(grid.region(Position::new(0, 0), 4, 4).map(|r| r.len()), Some(16));
        assert!(grid.region(Position::new(1, 0), 4, 4).is_none());
    }
}

//! Core domain types for Conquid.

use derive_more::Display;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Side length of the square base region anchored at each base position.
pub const BASE_SIZE: usize = 2;

/// Side length of the block cleared by an erase.
pub const ERASE_SIZE: usize = 4;

/// Upper bound on `rows * cols` for any board.
pub const MAX_CELLS: usize = 1 << 20;

/// Minimum number of ring cells the eraser must hold around the block.
pub const ERASE_RING_THRESHOLD: usize = 4;

/// Offsets (relative to the block corner) of the 16 cells bordering an erase block.
pub const ERASE_RING: [(isize, isize); 16] = [
    (-1, 0),
    (-1, 1),
    (-1, 2),
    (-1, 3),
    (4, 0),
    (4, 1),
    (4, 2),
    (4, 3),
    (0, -1),
    (1, -1),
    (2, -1),
    (3, -1),
    (0, 4),
    (1, 4),
    (2, 4),
    (3, 4),
];

/// Orthogonal neighbour offsets, in traversal order.
pub(crate) const ADJACENT_OFFSETS: [(isize, isize); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Player in the game.
///
/// Serialized as its number (`1` or `2`) so stored logs stay compact.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Player {
    /// Player one (moves first).
    #[display("player 1")]
    One,
    /// Player two.
    #[display("player 2")]
    Two,
}

impl Player {
    /// Both players, in seating order.
    pub const ALL: [Player; 2] = [Player::One, Player::Two];

    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Returns the player's number (1 or 2).
    pub fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    /// Returns the zero-based seat index (0 or 1).
    pub fn index(self) -> usize {
        usize::from(self.number() - 1)
    }

    /// Converts a player number (1 or 2) into a player.
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }
}

impl TryFrom<u8> for Player {
    type Error = String;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Player::from_number(number).ok_or_else(|| format!("invalid player number {}", number))
    }
}

impl From<Player> for u8 {
    fn from(player: Player) -> Self {
        player.number()
    }
}

/// A `(row, col)` coordinate on the board.
///
/// Ordering is row-major, which the path search relies on to break ties.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, new,
)]
#[display("({}, {})", row, col)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Position {
    /// Zero-based row.
    pub row: usize,
    /// Zero-based column.
    pub col: usize,
}

impl Position {
    /// Shifts the position by a signed offset, returning `None` below zero.
    ///
    /// Upper bounds are the grid's concern.
    pub fn offset(self, d_row: isize, d_col: isize) -> Option<Position> {
        Some(Position {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Position { row, col }
    }
}

impl From<Position> for (usize, usize) {
    fn from(pos: Position) -> Self {
        (pos.row, pos.col)
    }
}

/// One grid unit: an optional owner and a base flag.
///
/// A base cell always has an owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    owner: Option<Player>,
    is_base: bool,
}

impl Cell {
    /// Creates an unclaimed, non-base cell.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a base cell owned by `player`.
    pub fn base(player: Player) -> Self {
        Self {
            owner: Some(player),
            is_base: true,
        }
    }

    /// Returns the owner, if any.
    pub fn owner(&self) -> Option<Player> {
        self.owner
    }

    /// Returns the owner as a number: 0 for unclaimed, otherwise 1 or 2.
    pub fn owner_number(&self) -> u8 {
        self.owner.map_or(0, Player::number)
    }

    /// Returns true if this cell belongs to a base.
    pub fn is_base(&self) -> bool {
        self.is_base
    }

    /// Returns true if the cell is unclaimed.
    pub fn is_empty(&self) -> bool {
        self.owner.is_none()
    }

    /// Returns true if `player` owns this cell.
    pub fn is_owned_by(&self, player: Player) -> bool {
        self.owner == Some(player)
    }

    pub(crate) fn set_owner(&mut self, owner: Option<Player>) {
        self.owner = owner;
    }

    pub(crate) fn mark_base(&mut self) {
        self.is_base = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_round_trips_through_number() {
        for player in Player::ALL {
            assert_eq!(Player::from_number(player.number()), Some(player));
        }
        assert_eq!(Player::from_number(0), None);
        assert_eq!(Player::from_number(3), None);
    }

    #[test]
    fn test_opponent() {
        assert_eq!(Player::One.opponent(), Player::Two);
        assert_eq!(Player::Two.opponent(), Player::One);
    }

    #[test]
    fn test_offset_rejects_negative() {
        let pos = Position::new(0, 3);
        assert_eq!(pos.offset(-1, 0), None);
        assert_eq!(pos.offset(1, -3), Some(Position::new(1, 0)));
    }

    #[test]
    fn test_position_orders_row_major() {
        assert!(Position::new(0, 9) < Position::new(1, 0));
        assert!(Position::new(2, 1) < Position::new(2, 2));
    }

    #[test]
    fn test_player_serializes_as_number() {
        let json = serde_json::to_string(&Player::Two).unwrap();
        assert_eq!(json, "2");
        assert!(serde_json::from_str::<Player>("7").is_err());
    }
}

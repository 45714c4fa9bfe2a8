//! First-class move types for Conquid.
//!
//! Moves are domain events, not side effects. A move is the only unit of
//! board mutation and the only thing stored in the game log.

use super::board::Board;
use super::types::{Player, Position};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// The operation a move performs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, strum::IntoStaticStr)]
#[serde(tag = "type", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    /// Take ownership of unclaimed cells.
    Claim {
        /// Cells to claim; must be distinct and unclaimed.
        cells: Vec<Position>,
    },
    /// Convert enemy cells touched from two sides.
    Capture,
    /// Clear the uniformly owned 4x4 block whose top-left is `corner`.
    Erase {
        /// Top-left of the block.
        corner: Position,
    },
    /// Claim victory through an owned path into the enemy base.
    PathWin,
}

/// A move: a player performing an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The player making the move.
    pub player: Player,
    /// What the move does.
    #[serde(flatten)]
    pub action: Action,
}

impl Move {
    /// Creates a new move.
    pub fn new(player: Player, action: Action) -> Self {
        Self { player, action }
    }

    /// Creates a claim move.
    pub fn claim(player: Player, cells: impl IntoIterator<Item = Position>) -> Self {
        Self::new(
            player,
            Action::Claim {
                cells: cells.into_iter().collect(),
            },
        )
    }

    /// Creates a capture move.
    pub fn capture(player: Player) -> Self {
        Self::new(player, Action::Capture)
    }

    /// Creates an erase move.
    pub fn erase(player: Player, corner: Position) -> Self {
        Self::new(player, Action::Erase { corner })
    }

    /// Creates a path-win move.
    pub fn path_win(player: Player) -> Self {
        Self::new(player, Action::PathWin)
    }

    /// Returns the player making this move.
    pub fn player(&self) -> Player {
        self.player
    }

    /// Short name of the action, for logs.
    pub fn kind(&self) -> &'static str {
        (&self.action).into()
    }

    /// Applies the move to `board`, dispatching on the action.
    ///
    /// The board is untouched when an error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMove`] if the action's preconditions do not hold.
    #[instrument(skip(board), fields(player = %self.player, kind = self.kind()))]
    pub fn apply(&self, board: &mut Board) -> Result<MoveEffect, InvalidMove> {
        match &self.action {
            Action::Claim { cells } => board
                .claim(self.player, cells)
                .map(|claimed| MoveEffect::Claimed { claimed }),
            Action::Capture => Ok(MoveEffect::Captured {
                captured: board.capture(self.player),
            }),
            Action::Erase { corner } => board
                .erase(self.player, *corner)
                .map(|_| MoveEffect::Erased { corner: *corner }),
            Action::PathWin => board
                .path_win(self.player)
                .map(|path| MoveEffect::Won { path }),
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.action {
            Action::Claim { cells } => {
                let cells = cells.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ");
                write!(f, "{} claims {}", self.player, cells)
            }
            Action::Capture => write!(f, "{} captures", self.player),
            Action::Erase { corner } => write!(f, "{} erases block at {}", self.player, corner),
            Action::PathWin => write!(f, "{} attempts conquest", self.player),
        }
    }
}

/// What an accepted move changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveEffect {
    /// Cells were claimed.
    Claimed {
        /// Cells newly owned.
        claimed: Vec<Position>,
    },
    /// Enemy cells were converted.
    Captured {
        /// Cells converted, in conversion order.
        captured: Vec<Position>,
    },
    /// A block was cleared.
    Erased {
        /// Top-left of the cleared block.
        corner: Position,
    },
    /// The mover connected to the enemy base and won.
    Won {
        /// Path from the mover's base anchor to the cell touching the enemy base.
        path: Vec<Position>,
    },
}

impl MoveEffect {
    /// Returns true if this effect ends the game.
    pub fn is_win(&self) -> bool {
        matches!(self, MoveEffect::Won { .. })
    }
}

/// A move whose preconditions do not hold.
///
/// Every variant is the same outcome to callers: nothing changed and the
/// move may be retried in corrected form. Variants exist for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum InvalidMove {
    /// A claimed cell is already owned.
    #[display("Cell {} is already owned", _0)]
    CellOccupied(Position),

    /// A cell appears twice in one claim.
    #[display("Cell {} is listed more than once", _0)]
    DuplicateCell(Position),

    /// A position lies off the board.
    #[display("Cell {} is off the board", _0)]
    OutOfBounds(Position),

    /// A claim named no cells.
    #[display("Claim names no cells")]
    EmptyClaim,

    /// Too few ring cells around an erase block belong to the eraser.
    #[display("Only {} of the surrounding cells belong to the eraser (need {})", found, needed)]
    InsufficientSurround {
        /// Ring cells held by the eraser.
        found: usize,
        /// Ring cells required.
        needed: usize,
    },

    /// The erase block extends off the board.
    #[display("Block at {} extends off the board", _0)]
    BlockOutOfBounds(Position),

    /// The erase block contains a base cell.
    #[display("Block contains base cell {}", _0)]
    BlockContainsBase(Position),

    /// The erase block has mixed owners.
    #[display("Block is not uniformly owned (cell {} differs)", _0)]
    BlockNotUniform(Position),

    /// The erase block is entirely unclaimed.
    #[display("Block at {} is empty", _0)]
    EmptyBlock(Position),

    /// No owned path reaches the enemy base.
    #[display("{} has no path to the enemy base", _0)]
    NoPath(Player),

    /// It's not this player's turn.
    #[display("It's not {}'s turn", _0)]
    WrongPlayer(Player),

    /// Another move is still being processed.
    #[display("Another move is still pending")]
    MovePending,

    /// The game is already over.
    #[display("Game is already over")]
    GameOver,

    /// An invariant was violated (postcondition failure).
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for InvalidMove {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(Move::capture(Player::One).kind(), "capture");
        assert_eq!(Move::path_win(Player::Two).kind(), "path_win");
        assert_eq!(Move::claim(Player::One, [Position::new(0, 0)]).kind(), "claim");
    }

    #[test]
    fn test_move_serializes_flat() {
        let mv = Move::erase(Player::Two, Position::new(3, 5));
        let json = serde_json::to_value(&mv).unwrap();
        assert_eq!(json, serde_json::json!({"player": 2, "type": "erase", "corner": [3, 5]}));
        let back: Move = serde_json::from_value(json).unwrap();
        assert_eq!(back, mv);
    }

    #[test]
    fn test_unit_action_serializes() {
        let json = serde_json::to_string(&Move::capture(Player::One)).unwrap();
        assert_eq!(json, r#"{"player":1,"type":"capture"}"#);
    }
}

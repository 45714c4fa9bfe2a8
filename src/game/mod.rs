//! Conquid: a two-player territory game on a rectangular grid.
//!
//! Players claim cells, capture enemy cells they surround from two sides,
//! erase uniformly owned blocks, and win by connecting their base to the
//! enemy base. Every accepted move is recorded in a [`GameLog`], from which
//! any board in the game's history can be rebuilt.

pub mod action;
pub mod board;
pub mod cache;
pub mod contracts;
pub mod grid;
pub mod invariants;
pub mod log;
pub mod phases;
pub mod rules;
pub mod snapshot;
pub mod types;

pub use action::{Action, InvalidMove, Move, MoveEffect};
pub use board::{Board, SetupError};
pub use cache::{TurnCache, new_game};
pub use contracts::{Contract, MoveContract, SubmitContract};
pub use grid::Grid;
pub use invariants::{BoardInvariants, CacheInvariants, Invariant, InvariantSet, InvariantViolation};
pub use log::{GameLog, GameRecord, GameSetup, Replay, ReplayError};
pub use phases::{GameStatus, Outcome};
pub use snapshot::{BoardSnapshot, CellView};
pub use types::{BASE_SIZE, Cell, ERASE_RING, ERASE_RING_THRESHOLD, ERASE_SIZE, MAX_CELLS, Player, Position};

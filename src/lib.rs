//! Conquid - rules engine and replayable move log for a territory game
//!
//! Two players share a rectangular grid. Each starts with a 2x2 base and on
//! their turn claims cells, captures enemy cells touched from two sides,
//! erases a uniformly owned 4x4 block, or wins by showing an owned path from
//! their base into the enemy base.
//!
//! # Architecture
//!
//! - **Game**: grid, board, moves and rules; the append-only [`GameLog`] and
//!   the [`TurnCache`] that accepts submissions
//! - **Session**: two seats around one game, with draw agreement
//! - **Store**: durable JSON logs that rebuild games by replay
//! - **Config**: board parameters from TOML
//!
//! # Example
//!
//! ```
//! use conquid::{Move, Player, Position, new_game};
//!
//! # fn example() -> anyhow::Result<()> {
//! let (log, mut cache) = new_game(14, 28, [Position::new(6, 4), Position::new(6, 22)])?;
//! cache.submit(Move::claim(Player::One, [Position::new(6, 6), Position::new(6, 7)]))?;
//! assert!(cache.submit(Move::path_win(Player::Two)).is_err());
//!
//! let boards = log.replay()?;
//! assert_eq!(boards.last(), Some(cache.latest()));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod game;
mod session;
mod store;

// Crate-level exports - Configuration
pub use config::{ConfigError, GameConfig};

// Crate-level exports - Game types
pub use game::{
    Action, BASE_SIZE, Board, BoardSnapshot, Cell, CellView, ERASE_RING, ERASE_RING_THRESHOLD,
    ERASE_SIZE, GameLog, GameRecord, GameSetup, GameStatus, Grid, InvalidMove, MAX_CELLS, Move,
    MoveEffect, Outcome, Player, Position, Replay, ReplayError, SetupError, TurnCache, new_game,
};

// Crate-level exports - Rules
pub use game::rules::{Breach, find_breach};

// Crate-level exports - Invariants and contracts
pub use game::{
    BoardInvariants, CacheInvariants, Contract, Invariant, InvariantSet, InvariantViolation,
    MoveContract, SubmitContract,
};

// Crate-level exports - Session management
pub use session::{DrawOffer, GameSession, PlayerId, Seat, SessionError, SessionId, SessionManager};

// Crate-level exports - Storage
pub use store::{JsonFileStore, LogStore, MemoryStore, StoreError};

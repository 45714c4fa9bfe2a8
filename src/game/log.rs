//! The append-only game log.
//!
//! The log is the single source of truth for a game. It stores the fixed
//! setup and every accepted move; any board in the game's history can be
//! rebuilt from it by replay.

use super::action::{InvalidMove, Move};
use super::board::{Board, SetupError};
use super::phases::{GameStatus, Outcome};
use super::types::{Player, Position};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, instrument, warn};

/// Immutable parameters of a game, fixed when it starts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, derive_new::new)]
pub struct GameSetup {
    /// Number of rows.
    rows: usize,
    /// Number of columns.
    cols: usize,
    /// Base anchors for player one and player two.
    bases: [Position; 2],
}

impl GameSetup {
    /// The standard 14x28 board with bases at (6, 4) and (6, 22).
    pub fn standard() -> Self {
        Self::new(14, 28, [Position::new(6, 4), Position::new(6, 22)])
    }

    /// Builds the board every replay starts from.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if the parameters do not describe a valid board.
    pub fn initial_board(&self) -> Result<Board, SetupError> {
        Board::new(self.rows, self.cols, self.bases)
    }
}

impl Default for GameSetup {
    fn default() -> Self {
        Self::standard()
    }
}

/// Serializable contents of a game log.
///
/// This is the persisted layout: enough to reconstruct the full game by replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Board parameters.
    pub setup: GameSetup,
    /// Accepted moves, in order.
    #[serde(default)]
    pub moves: Vec<Move>,
    /// Whether the players agreed to a draw after the last move.
    #[serde(default)]
    pub draw_agreed: bool,
}

impl GameRecord {
    /// A record with no moves.
    pub fn new(setup: GameSetup) -> Self {
        Self {
            setup,
            moves: Vec::new(),
            draw_agreed: false,
        }
    }

    /// Replays the record from the initial board.
    ///
    /// Every move is checked for turn order and legality; the first one that
    /// does not fit is reported as corruption.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] if the setup or any stored move is invalid.
    #[instrument(skip(self), fields(moves = self.moves.len()))]
    pub fn replay(&self) -> Result<Replay, ReplayError> {
        let mut board = self.setup.initial_board()?;
        let mut boards = Vec::with_capacity(self.moves.len() + 1);
        boards.push(board.clone());
        let mut to_move = Player::One;
        let mut status = GameStatus::InProgress;

        for (index, mv) in self.moves.iter().enumerate() {
            if !status.is_in_progress() {
                warn!(index, "Stored move follows the end of the game");
                return Err(ReplayError::AfterGameEnd { index });
            }
            if mv.player != to_move {
                warn!(index, expected = %to_move, found = %mv.player, "Stored move out of turn");
                return Err(ReplayError::OutOfTurn {
                    index,
                    expected: to_move,
                    found: mv.player,
                });
            }
            let effect = mv.apply(&mut board).map_err(|source| {
                warn!(index, error = %source, "Stored move rejected during replay");
                ReplayError::Rejected { index, source }
            })?;
            boards.push(board.clone());

            if effect.is_win() {
                status = GameStatus::Finished(Outcome::Winner(mv.player));
            } else {
                to_move = to_move.opponent();
            }
        }

        if self.draw_agreed {
            if !status.is_in_progress() {
                return Err(ReplayError::AfterGameEnd {
                    index: self.moves.len(),
                });
            }
            status = GameStatus::Finished(Outcome::Draw);
        }

        debug!(boards = boards.len(), %status, "Replay complete");
        Ok(Replay {
            boards,
            latest: board,
            status,
            to_move,
        })
    }
}

/// Result of replaying a log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replay {
    /// Boards `[initial, after move 1, after move 2, ...]`.
    pub boards: Vec<Board>,
    /// The final board.
    pub latest: Board,
    /// Status after the last move.
    pub status: GameStatus,
    /// Player to move next (the winner, once the game is won).
    pub to_move: Player,
}

/// A stored log that does not replay.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ReplayError {
    /// The stored setup cannot produce a board.
    #[display("Stored setup is invalid: {}", _0)]
    Setup(SetupError),

    /// A stored move is illegal on the board it follows.
    #[display("Move {} no longer applies: {}", index, source)]
    Rejected {
        /// Zero-based position in the log.
        index: usize,
        /// Why the move was refused.
        source: InvalidMove,
    },

    /// A stored move was made by the wrong player.
    #[display("Move {} was made by {} but {} was to move", index, found, expected)]
    OutOfTurn {
        /// Zero-based position in the log.
        index: usize,
        /// Player whose turn it was.
        expected: Player,
        /// Player recorded on the move.
        found: Player,
    },

    /// Something was recorded after the game had ended.
    #[display("Entry {} follows the end of the game", index)]
    AfterGameEnd {
        /// Zero-based position of the offending entry.
        index: usize,
    },
}

impl From<SetupError> for ReplayError {
    fn from(err: SetupError) -> Self {
        ReplayError::Setup(err)
    }
}

/// Shared handle to a game's log.
///
/// Clones share the same record. Appends take the write lock; exports and
/// replays take the read lock, so a backup never observes a half-written move.
#[derive(Debug, Clone)]
pub struct GameLog {
    inner: Arc<RwLock<GameRecord>>,
}

impl GameLog {
    /// Starts an empty log for `setup`.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if the setup does not describe a valid board.
    pub fn new(setup: GameSetup) -> Result<Self, SetupError> {
        setup.initial_board()?;
        Ok(Self::wrap(GameRecord::new(setup)))
    }

    /// Adopts a stored record after checking that it replays.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] if the record is corrupt.
    pub fn from_record(record: GameRecord) -> Result<Self, ReplayError> {
        record.replay()?;
        Ok(Self::wrap(record))
    }

    pub(crate) fn wrap(record: GameRecord) -> Self {
        Self {
            inner: Arc::new(RwLock::new(record)),
        }
    }

    // The record is only ever extended by whole moves, so a guard poisoned by
    // a panicking reader or writer still holds a consistent prefix.
    fn read(&self) -> RwLockReadGuard<'_, GameRecord> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, GameRecord> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The game's fixed parameters.
    pub fn setup(&self) -> GameSetup {
        self.read().setup.clone()
    }

    /// Appends an accepted move.
    ///
    /// Callers are responsible for only appending moves that applied.
    #[instrument(skip(self), fields(player = %mv.player, kind = mv.kind()))]
    pub fn append(&self, mv: Move) {
        let mut record = self.write();
        record.moves.push(mv);
        debug!(len = record.moves.len(), "Move appended to log");
    }

    pub(crate) fn record_draw(&self) {
        self.write().draw_agreed = true;
    }

    /// Whether the players agreed to a draw.
    pub fn draw_agreed(&self) -> bool {
        self.read().draw_agreed
    }

    /// Number of stored moves.
    pub fn len(&self) -> usize {
        self.read().moves.len()
    }

    /// Returns true if no move has been stored.
    pub fn is_empty(&self) -> bool {
        self.read().moves.is_empty()
    }

    /// Copy of the move history.
    pub fn moves(&self) -> Vec<Move> {
        self.read().moves.clone()
    }

    /// Consistent copy of the whole record, for persistence or backup.
    pub fn record(&self) -> GameRecord {
        self.read().clone()
    }

    /// Rebuilds every board in the game's history.
    ///
    /// Returns `[initial, after move 1, ...]`. Replaying the same log twice
    /// yields identical sequences.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] if the stored contents are corrupt.
    pub fn replay(&self) -> Result<Vec<Board>, ReplayError> {
        Ok(self.replay_state()?.boards)
    }

    /// Replays the log and reports turn state alongside the boards.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] if the stored contents are corrupt.
    pub fn replay_state(&self) -> Result<Replay, ReplayError> {
        let record = self.record();
        record.replay()
    }

    /// The board after `n` moves (`0` is the initial board).
    ///
    /// Returns `Ok(None)` if fewer than `n` moves are stored.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] if the stored contents are corrupt.
    pub fn board_at(&self, n: usize) -> Result<Option<Board>, ReplayError> {
        let mut record = self.record();
        if n > record.moves.len() {
            return Ok(None);
        }
        record.moves.truncate(n);
        record.draw_agreed = false;
        Ok(Some(record.replay()?.latest))
    }
}

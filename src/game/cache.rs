//! The turn cache: the live view of a game that accepts submissions.

use super::action::{InvalidMove, Move, MoveEffect};
use super::board::{Board, SetupError};
use super::contracts::{Contract, GameOngoing, MoveContract, NoMovePending, SubmitContract, assert_invariants};
use super::log::{GameLog, GameRecord, GameSetup, Replay, ReplayError};
use super::phases::{GameStatus, Outcome};
use super::snapshot::BoardSnapshot;
use super::types::{Player, Position};
use tracing::{info, instrument, warn};

/// Latest board and turn state, derived from a [`GameLog`].
///
/// `latest` always equals the board obtained by replaying the log. The cache
/// is the only writer of its log; every accepted move is appended before
/// `submit` returns.
#[derive(Debug)]
pub struct TurnCache {
    log: GameLog,
    current_player: Player,
    latest: Board,
    status: GameStatus,
    /// The move being committed, set only inside `submit`.
    ///
    /// `submit` takes `&mut self`, so a second submission cannot start while
    /// one is in flight and callers never observe `Some` here. Only
    /// [`NoMovePending`] and `SubmissionIdleInvariant` read it, from inside
    /// the commit path.
    pending: Option<Move>,
}

impl TurnCache {
    /// Builds a cache by replaying `log`.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] if the log does not replay.
    #[instrument(skip(log), fields(moves = log.len()))]
    pub fn new(log: GameLog) -> Result<Self, ReplayError> {
        let replay = log.replay_state()?;
        Ok(Self::from_replay(log, replay))
    }

    /// Builds a cache over a stored record, replaying it once.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] if the record is corrupt.
    #[instrument(skip(record), fields(moves = record.moves.len()))]
    pub fn from_record(record: GameRecord) -> Result<Self, ReplayError> {
        let replay = record.replay()?;
        Ok(Self::from_replay(GameLog::wrap(record), replay))
    }

    fn from_replay(log: GameLog, replay: Replay) -> Self {
        Self {
            log,
            current_player: replay.to_move,
            latest: replay.latest,
            status: replay.status,
            pending: None,
        }
    }

    /// Submits a move.
    ///
    /// The move is checked against turn state, applied to a working copy of
    /// the latest board, and committed only if it applies. On success the
    /// move is appended to the log and the turn passes.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMove`] if the move is refused; nothing changes.
    #[instrument(skip(self), fields(player = %mv.player, kind = mv.kind(), move_number = self.log.len() + 1))]
    pub fn submit(&mut self, mv: Move) -> Result<BoardSnapshot, InvalidMove> {
        SubmitContract::check(&mv, self).inspect_err(|err| warn!(%err, "Submission refused"))?;

        self.pending = Some(mv.clone());
        let result = self.commit(&mv);
        self.pending = None;

        match result {
            Ok(snapshot) => {
                assert_invariants(self);
                Ok(snapshot)
            }
            Err(err) => {
                warn!(%err, "Move rejected");
                Err(err)
            }
        }
    }

    fn commit(&mut self, mv: &Move) -> Result<BoardSnapshot, InvalidMove> {
        MoveContract::pre(&self.latest, mv)?;
        let (board, effect) = self.latest.apply_clone(mv)?;

        #[cfg(debug_assertions)]
        MoveContract::post(&self.latest, &board)?;

        self.latest = board;
        self.log.append(mv.clone());

        match &effect {
            MoveEffect::Won { path } => {
                self.status = GameStatus::Finished(Outcome::Winner(mv.player));
                info!(winner = %mv.player, path_len = path.len(), "Game won by conquest");
            }
            _ => {
                self.current_player = self.current_player.opponent();
                info!(next = %self.current_player, "Move accepted");
            }
        }

        Ok(self.snapshot())
    }

    /// Shows what `mv` would do without committing it.
    ///
    /// # Errors
    ///
    /// Returns the [`InvalidMove`] that `submit` would return.
    #[instrument(skip(self), fields(player = %mv.player, kind = mv.kind()))]
    pub fn preview(&self, mv: &Move) -> Result<Board, InvalidMove> {
        SubmitContract::check(mv, self)?;
        MoveContract::pre(&self.latest, mv)?;
        let (board, _) = self.latest.apply_clone(mv)?;
        Ok(board)
    }

    /// Replaces all cached state by replaying the log from scratch.
    ///
    /// The live state is only swapped once the replay has succeeded; on error
    /// the cache is left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] if the log does not replay.
    #[instrument(skip(self), fields(moves = self.log.len()))]
    pub fn rebuild_from_log(&mut self) -> Result<(), ReplayError> {
        let rebuilt = Self::new(self.log.clone())
            .inspect_err(|err| warn!(%err, "Rebuild failed; keeping cached state"))?;
        if rebuilt.latest != self.latest || rebuilt.current_player != self.current_player {
            warn!("Cached state diverged from log");
        }
        *self = rebuilt;
        info!(to_move = %self.current_player, status = %self.status, "Turn cache rebuilt from log");
        Ok(())
    }

    /// Ends the game as a draw and records it in the log.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMove`] if a move is pending or the game is already over.
    #[instrument(skip(self))]
    pub fn conclude_draw(&mut self) -> Result<BoardSnapshot, InvalidMove> {
        NoMovePending::check(self)?;
        GameOngoing::check(self)?;
        self.log.record_draw();
        self.status = GameStatus::Finished(Outcome::Draw);
        info!(moves = self.log.len(), "Game drawn by agreement");
        assert_invariants(self);
        Ok(self.snapshot())
    }

    /// The log this cache writes to.
    pub fn log(&self) -> &GameLog {
        &self.log
    }

    /// The current board.
    pub fn latest(&self) -> &Board {
        &self.latest
    }

    /// Player whose turn it is (the winner once the game is won).
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Current game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns true while a submission is being processed.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of moves applied so far.
    pub fn move_number(&self) -> usize {
        self.log.len()
    }

    /// Snapshot of the current board and turn.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::new(&self.latest, self.move_number(), self.status, self.current_player)
    }
}

/// Starts a game: an empty log and a cache positioned on the initial board.
///
/// # Errors
///
/// Returns [`SetupError`] if the dimensions or base positions are invalid.
#[instrument]
pub fn new_game(
    rows: usize,
    cols: usize,
    bases: [Position; 2],
) -> Result<(GameLog, TurnCache), SetupError> {
    let setup = GameSetup::new(rows, cols, bases);
    let latest = setup.initial_board()?;
    let log = GameLog::new(setup)?;
    let cache = TurnCache {
        log: log.clone(),
        current_player: Player::One,
        latest,
        status: GameStatus::InProgress,
        pending: None,
    };
    info!("New game started");
    Ok((log, cache))
}

//! Game sessions: two seated players around one game.

use crate::game::{
    Action, BoardSnapshot, GameRecord, GameSetup, InvalidMove, Move, Player, ReplayError,
    SetupError, TurnCache, new_game,
};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Unique identifier for a participant.
pub type PlayerId = String;

/// A participant occupying one side of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    /// Participant's unique ID.
    pub id: PlayerId,
    /// Participant's display name.
    pub name: String,
    /// Which side this participant plays.
    pub player: Player,
}

/// Result of a draw offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOffer {
    /// The offer stands until the opponent also offers.
    Pending,
    /// Both sides offered; the game ended in a draw.
    Agreed(BoardSnapshot),
}

/// Session-level failures.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum SessionError {
    /// The move or request was refused by the game.
    #[display("Invalid move: {}", _0)]
    Rejected(InvalidMove),

    /// The stored game does not replay.
    #[display("Corrupt game log: {}", _0)]
    Corrupt(ReplayError),

    /// The board parameters are invalid.
    #[display("Invalid setup: {}", _0)]
    Setup(SetupError),

    /// Nobody with this id is seated.
    #[display("Unknown player '{}'", _0)]
    #[from(ignore)]
    UnknownPlayer(#[error(not(source))] PlayerId),

    /// This participant already holds a seat.
    #[display("Player '{}' is already seated", _0)]
    #[from(ignore)]
    AlreadySeated(#[error(not(source))] PlayerId),

    /// Both seats are taken.
    #[display("Session already has 2 players")]
    #[from(ignore)]
    SessionFull,

    /// No session with this id exists.
    #[display("Session '{}' not found", _0)]
    #[from(ignore)]
    NotFound(#[error(not(source))] SessionId),

    /// A session with this id already exists.
    #[display("Session '{}' already exists", _0)]
    #[from(ignore)]
    AlreadyExists(#[error(not(source))] SessionId),
}

/// A game with two seats and a draw-offer slot.
#[derive(Debug)]
pub struct GameSession {
    /// Session ID.
    pub id: SessionId,
    cache: TurnCache,
    seats: [Option<Seat>; 2],
    draw_offer: Option<Player>,
}

impl GameSession {
    /// Creates a session around a fresh game.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if `setup` does not describe a valid board.
    #[instrument(skip(setup))]
    pub fn new(id: SessionId, setup: GameSetup) -> Result<Self, SetupError> {
        let (_log, cache) = new_game(*setup.rows(), *setup.cols(), *setup.bases())?;
        info!(session_id = %id, "Creating new game session");
        Ok(Self::with_cache(id, cache))
    }

    /// Rebuilds a session purely from a stored record.
    ///
    /// Seats start empty; participants register again.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] if the record does not replay.
    #[instrument(skip(record), fields(moves = record.moves.len()))]
    pub fn restore(id: SessionId, record: GameRecord) -> Result<Self, ReplayError> {
        let cache = TurnCache::from_record(record)?;
        info!(session_id = %id, status = %cache.status(), "Session restored from log");
        Ok(Self::with_cache(id, cache))
    }

    fn with_cache(id: SessionId, cache: TurnCache) -> Self {
        Self {
            id,
            cache,
            seats: [None, None],
            draw_offer: None,
        }
    }

    /// Seats a participant in the first free seat and returns their side.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadySeated`] if `id` holds a seat, or
    /// [`SessionError::SessionFull`] if both seats are taken.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn register_player(&mut self, id: PlayerId, name: String) -> Result<Player, SessionError> {
        if self.player_of(&id).is_some() {
            warn!(player_id = %id, "Player already seated");
            return Err(SessionError::AlreadySeated(id));
        }
        let Some(player) = Player::ALL
            .into_iter()
            .find(|player| self.seats[player.index()].is_none())
        else {
            warn!(player_id = %id, "Session already has 2 players");
            return Err(SessionError::SessionFull);
        };

        info!(player_id = %id, %player, "Registering player");
        self.seats[player.index()] = Some(Seat { id, name, player });
        Ok(player)
    }

    /// The seat occupied by `player`.
    pub fn seat(&self, player: Player) -> Option<&Seat> {
        self.seats[player.index()].as_ref()
    }

    /// Side played by the participant with `player_id`.
    pub fn player_of(&self, player_id: &str) -> Option<Player> {
        self.seats
            .iter()
            .flatten()
            .find(|seat| seat.id == player_id)
            .map(|seat| seat.player)
    }

    /// Checks if it's the given participant's turn.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn is_players_turn(&self, player_id: &str) -> bool {
        let is_turn = self.player_of(player_id) == Some(self.cache.current_player())
            && self.cache.status().is_in_progress();
        debug!(player_id, is_turn, "Checked if player's turn");
        is_turn
    }

    fn seated(&self, player_id: &str) -> Result<Player, SessionError> {
        self.player_of(player_id).ok_or_else(|| {
            warn!(player_id, "Unknown player");
            SessionError::UnknownPlayer(player_id.to_string())
        })
    }

    /// Submits `action` on behalf of the participant with `player_id`.
    ///
    /// An accepted move withdraws any standing draw offer.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the participant is unknown or the move is refused.
    #[instrument(skip(self, action), fields(session_id = %self.id))]
    pub fn make_move(&mut self, player_id: &str, action: Action) -> Result<BoardSnapshot, SessionError> {
        let player = self.seated(player_id)?;
        let snapshot = self.cache.submit(Move::new(player, action))?;
        if self.draw_offer.take().is_some() {
            debug!("Standing draw offer withdrawn by move");
        }
        info!(player_id, status = %snapshot.status(), "Move completed successfully");
        Ok(snapshot)
    }

    /// Offers a draw. If the opponent already offered, the game ends drawn.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the participant is unknown or the game is over.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn offer_draw(&mut self, player_id: &str) -> Result<DrawOffer, SessionError> {
        let player = self.seated(player_id)?;
        if !self.cache.status().is_in_progress() {
            return Err(InvalidMove::GameOver.into());
        }

        if self.draw_offer == Some(player.opponent()) {
            let snapshot = self.cache.conclude_draw()?;
            self.draw_offer = None;
            info!(%player, "Draw accepted");
            return Ok(DrawOffer::Agreed(snapshot));
        }

        self.draw_offer = Some(player);
        info!(%player, "Draw offered");
        Ok(DrawOffer::Pending)
    }

    /// Withdraws the participant's own draw offer. Returns whether one stood.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownPlayer`] if the participant is not seated.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn cancel_draw(&mut self, player_id: &str) -> Result<bool, SessionError> {
        let player = self.seated(player_id)?;
        if self.draw_offer == Some(player) {
            self.draw_offer = None;
            info!(%player, "Draw offer withdrawn");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Side with a standing draw offer, if any.
    pub fn draw_offer(&self) -> Option<Player> {
        self.draw_offer
    }

    /// The live turn cache.
    pub fn cache(&self) -> &TurnCache {
        &self.cache
    }

    /// Rebuilds the cache from the log after a suspected desync.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Corrupt`] if the log does not replay.
    pub fn rebuild(&mut self) -> Result<(), SessionError> {
        Ok(self.cache.rebuild_from_log()?)
    }

    /// Consistent export of the game log.
    pub fn record(&self) -> GameRecord {
        self.cache.log().record()
    }

    /// Snapshot of the current board.
    pub fn snapshot(&self) -> BoardSnapshot {
        self.cache.snapshot()
    }
}

/// Manages all game sessions.
///
/// Each session is independent; the map lock is held only for the duration
/// of one operation on one session.
#[derive(Debug, Clone, Default)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<SessionId, GameSession>>>,
}

impl SessionManager {
    /// Creates a new session manager.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating session manager");
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, GameSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert(&self, session: GameSession) -> Result<SessionId, SessionError> {
        let mut sessions = self.lock();
        if sessions.contains_key(&session.id) {
            warn!(session_id = %session.id, "Session already exists");
            return Err(SessionError::AlreadyExists(session.id));
        }
        let id = session.id.clone();
        sessions.insert(id.clone(), session);
        info!(session_id = %id, "Session added");
        Ok(id)
    }

    /// Creates a new game session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the id is taken or the setup is invalid.
    #[instrument(skip(self, setup))]
    pub fn create_session(&self, id: SessionId, setup: GameSetup) -> Result<SessionId, SessionError> {
        if self.lock().contains_key(&id) {
            warn!(session_id = %id, "Session already exists");
            return Err(SessionError::AlreadyExists(id));
        }
        self.insert(GameSession::new(id, setup)?)
    }

    /// Restores a session from a stored record.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the id is taken or the record is corrupt.
    #[instrument(skip(self, record))]
    pub fn restore_session(&self, id: SessionId, record: GameRecord) -> Result<SessionId, SessionError> {
        self.insert(GameSession::restore(id, record)?)
    }

    /// Runs `f` against the session with `id` while holding the lock.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] if there is no such session.
    pub fn with_session<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut GameSession) -> R,
    ) -> Result<R, SessionError> {
        let mut sessions = self.lock();
        let session = sessions.get_mut(id).ok_or_else(|| {
            debug!(session_id = id, "Session not found");
            SessionError::NotFound(id.to_string())
        })?;
        Ok(f(session))
    }

    /// Removes a session, returning its final record.
    #[instrument(skip(self))]
    pub fn remove_session(&self, id: &str) -> Option<GameRecord> {
        let removed = self.lock().remove(id).map(|session| session.record());
        if removed.is_some() {
            info!(session_id = id, "Session removed");
        }
        removed
    }

    /// Lists all active session IDs, sorted.
    #[instrument(skip(self))]
    pub fn list_sessions(&self) -> Vec<SessionId> {
        let mut ids: Vec<_> = self.lock().keys().cloned().collect();
        ids.sort();
        debug!(count = ids.len(), "Listed sessions");
        ids
    }
}

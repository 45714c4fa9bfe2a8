//! Contract-based validation for move submission.
//!
//! Contracts define correctness through preconditions and postconditions:
//! `{P} move {Q}`. Preconditions gate every submission; postconditions are
//! checked in debug builds against the working copy before it is committed.

use super::action::{Action, InvalidMove, Move};
use super::board::Board;
use super::cache::TurnCache;
use super::invariants::{BoardInvariants, CacheInvariants, InvariantSet, describe};
use tracing::{instrument, warn};

/// A contract defines preconditions and postconditions for state transitions.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), InvalidMove>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), InvalidMove>;
}

/// Precondition: no other move is being processed.
pub struct NoMovePending;

impl NoMovePending {
    /// Fails with [`InvalidMove::MovePending`] while a submission is in flight.
    #[instrument(skip(cache))]
    pub fn check(cache: &TurnCache) -> Result<(), InvalidMove> {
        if cache.is_pending() {
            Err(InvalidMove::MovePending)
        } else {
            Ok(())
        }
    }
}

/// Precondition: the game has not ended.
pub struct GameOngoing;

impl GameOngoing {
    /// Fails with [`InvalidMove::GameOver`] once the game is finished.
    #[instrument(skip(cache))]
    pub fn check(cache: &TurnCache) -> Result<(), InvalidMove> {
        if cache.status().is_in_progress() {
            Ok(())
        } else {
            Err(InvalidMove::GameOver)
        }
    }
}

/// Precondition: it must be the player's turn.
pub struct PlayersTurn;

impl PlayersTurn {
    /// Fails with [`InvalidMove::WrongPlayer`] if `mv` is out of turn.
    #[instrument(skip(cache), fields(player = %mv.player))]
    pub fn check(mv: &Move, cache: &TurnCache) -> Result<(), InvalidMove> {
        if mv.player != cache.current_player() {
            Err(InvalidMove::WrongPlayer(mv.player))
        } else {
            Ok(())
        }
    }
}

/// Composite precondition for [`TurnCache::submit`].
pub struct SubmitContract;

impl SubmitContract {
    /// Validates turn-level preconditions, in guard order.
    #[instrument(skip(cache, mv))]
    pub fn check(mv: &Move, cache: &TurnCache) -> Result<(), InvalidMove> {
        NoMovePending::check(cache)?;
        GameOngoing::check(cache)?;
        PlayersTurn::check(mv, cache)?;
        Ok(())
    }
}

/// Contract for applying a move to a board.
///
/// Preconditions:
/// - Every position the move names lies on the board
///
/// Postconditions:
/// - Dimensions and base anchors are unchanged
/// - Base cells never revert to ordinary cells
/// - Base invariants hold
pub struct MoveContract;

impl Contract<Board, Move> for MoveContract {
    fn pre(board: &Board, mv: &Move) -> Result<(), InvalidMove> {
        let off_board = match &mv.action {
            Action::Claim { cells } => cells.iter().copied().find(|&pos| !board.is_valid(pos)),
            Action::Erase { corner } => (!board.is_valid(*corner)).then_some(*corner),
            Action::Capture | Action::PathWin => None,
        };
        match off_board {
            Some(pos) => Err(InvalidMove::OutOfBounds(pos)),
            None => Ok(()),
        }
    }

    fn post(before: &Board, after: &Board) -> Result<(), InvalidMove> {
        if before.rows() != after.rows()
            || before.cols() != after.cols()
            || before.bases() != after.bases()
        {
            return Err(InvalidMove::InvariantViolation(
                "Postcondition failed: board geometry changed".to_string(),
            ));
        }

        let lost_base = before.grid().positions().find(|&pos| {
            let was_base = before.cell(pos).is_some_and(|cell| cell.is_base());
            let is_base = after.cell(pos).is_some_and(|cell| cell.is_base());
            was_base && !is_base
        });
        if let Some(pos) = lost_base {
            return Err(InvalidMove::InvariantViolation(format!(
                "Postcondition failed: base cell {} was removed",
                pos
            )));
        }

        BoardInvariants::check_all(after).map_err(|violations| {
            InvalidMove::InvariantViolation(format!(
                "Postcondition failed: {}",
                describe(&violations)
            ))
        })
    }
}

/// Asserts that all cache invariants hold (panic on violation in debug builds).
///
/// Compiled to nothing in release builds: log consistency replays the whole log.
#[instrument(skip(cache))]
pub fn assert_invariants(cache: &TurnCache) {
    if cfg!(debug_assertions) {
        let result = CacheInvariants::check_all(cache);
        if let Err(violations) = &result {
            warn!(violations = %describe(violations), "Turn cache invariants violated");
        }
        debug_assert!(result.is_ok(), "Turn cache invariants violated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameLog, GameSetup, Player, Position};

    fn cache() -> TurnCache {
        let setup = GameSetup::new(6, 10, [Position::new(0, 0), Position::new(4, 8)]);
        TurnCache::new(GameLog::new(setup).unwrap()).unwrap()
    }

    #[test]
    fn test_precondition_players_turn() {
        let cache = cache();
        assert!(SubmitContract::check(&Move::capture(Player::One), &cache).is_ok());
        assert_eq!(
            SubmitContract::check(&Move::capture(Player::Two), &cache),
            Err(InvalidMove::WrongPlayer(Player::Two))
        );
    }

    #[test]
    fn test_precondition_game_over() {
        let mut cache = cache();
        cache.conclude_draw().unwrap();
        assert_eq!(
            SubmitContract::check(&Move::capture(Player::One), &cache),
            Err(InvalidMove::GameOver)
        );
    }

    #[test]
    fn test_precondition_off_board_claim() {
        let board = Board::new(4, 8, [Position::new(0, 0), Position::new(0, 6)]).unwrap();
        let mv = Move::claim(Player::One, [Position::new(2, 2), Position::new(9, 0)]);
        assert_eq!(
            MoveContract::pre(&board, &mv),
            Err(InvalidMove::OutOfBounds(Position::new(9, 0)))
        );
        assert!(MoveContract::pre(&board, &Move::path_win(Player::One)).is_ok());
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "Turn cache invariants violated"))]
    fn test_invariant_assertion_only_in_debug_builds() {
        let cache = cache();
        // Desync the cache from its log behind its back.
        cache.log().append(Move::capture(Player::One));
        assert_invariants(&cache);
    }

    #[test]
    fn test_postcondition_holds_after_move() {
        let board = Board::new(4, 8, [Position::new(0, 0), Position::new(0, 6)]).unwrap();
        let (after, _) = board
            .apply_clone(&Move::claim(Player::One, [Position::new(3, 3)]))
            .unwrap();
        assert!(MoveContract::post(&board, &after).is_ok());
    }

    #[test]
    fn test_postcondition_detects_removed_base() {
        let board = Board::new(4, 8, [Position::new(0, 0), Position::new(0, 6)]).unwrap();
        let corrupted = Board::new(4, 8, [Position::new(0, 0), Position::new(2, 6)]).unwrap();
        assert!(matches!(
            MoveContract::post(&board, &corrupted),
            Err(InvalidMove::InvariantViolation(_))
        ));
    }
}

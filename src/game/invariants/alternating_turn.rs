//! Alternating turn invariant: players alternate 1, 2, 1, 2, ...

use super::super::{Outcome, Player, TurnCache};
use super::Invariant;

/// Invariant: players alternate turns.
///
/// The log must show player 1, player 2, player 1, ... and the cache's
/// current player must be the next in that sequence. After a win the
/// current player stays the winner, who made the last move.
pub struct AlternatingTurnInvariant;

impl Invariant<TurnCache> for AlternatingTurnInvariant {
    fn holds(cache: &TurnCache) -> bool {
        let history = cache.log().moves();

        if history.first().is_some_and(|first| first.player != Player::One) {
            return false;
        }

        if history.windows(2).any(|pair| pair[0].player == pair[1].player) {
            return false;
        }

        let expected_next = if history.len() % 2 == 0 {
            Player::One
        } else {
            Player::Two
        };

        match cache.status().outcome() {
            Some(Outcome::Winner(winner)) => {
                history.last().map(|mv| mv.player) == Some(winner)
                    && cache.current_player() == winner
            }
            _ => cache.current_player() == expected_next,
        }
    }

    fn description() -> &'static str {
        "Players alternate turns (1, 2, 1, 2, ...)"
    }
}

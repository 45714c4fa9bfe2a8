//! Log consistency invariant: the cached board is the replayed board.

use super::super::TurnCache;
use super::Invariant;

/// Invariant: replaying the log reproduces the cache.
///
/// `latest` equals the final replayed board and the cached status equals the
/// replayed status. This is the recovery guarantee: the log alone is enough.
pub struct LogConsistentInvariant;

impl Invariant<TurnCache> for LogConsistentInvariant {
    fn holds(cache: &TurnCache) -> bool {
        match cache.log().replay_state() {
            Ok(replay) => &replay.latest == cache.latest() && replay.status == cache.status(),
            Err(_) => false,
        }
    }

    fn description() -> &'static str {
        "Replaying the log reproduces the cached board"
    }
}

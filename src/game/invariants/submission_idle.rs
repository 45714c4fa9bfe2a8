//! No move is left pending between submissions.

use super::super::TurnCache;
use super::Invariant;

/// Invariant: the pending slot is empty outside of `submit`.
pub struct SubmissionIdleInvariant;

impl Invariant<TurnCache> for SubmissionIdleInvariant {
    fn holds(cache: &TurnCache) -> bool {
        !cache.is_pending()
    }

    fn description() -> &'static str {
        "No move is pending between submissions"
    }
}

use rand::Rng;
use rand::seq::IndexedRandom;

use quiz_core::model::{History, Question};

use crate::error::SessionError;

/// Pick the next question uniformly at random, avoiding recent repeats.
///
/// Questions in `history` are excluded from the draw. When every available
/// question is in `history`, the history is cleared and the draw runs over
/// the full pool again, so a short question list keeps cycling instead of
/// running dry. The chosen id is recorded in `history` before returning.
///
/// # Errors
///
/// Returns `SessionError::Empty` when `available` is empty.
pub fn pick_next<R: Rng + ?Sized>(
    available: &[Question],
    history: &mut History,
    rng: &mut R,
) -> Result<Question, SessionError> {
    if available.is_empty() {
        return Err(SessionError::Empty);
    }

    let fresh: Vec<&Question> = available
        .iter()
        .filter(|question| !history.contains(question.id))
        .collect();

    let chosen = if fresh.is_empty() {
        history.clear();
        available.choose(rng)
    } else {
        fresh.choose(rng).copied()
    };

    let question = chosen.ok_or(SessionError::Empty)?;
    history.record(question.id);
    Ok(question.clone())
}

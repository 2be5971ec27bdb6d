use rand::Rng;

use quiz_core::model::{History, Question};

use crate::error::SessionError;
use super::picker::pick_next;

/// In-memory quiz loop over the currently available questions.
///
/// Holds the question on screen, whether its answer is revealed, and the
/// recent-pick history that steers the next draw. Filter changes swap the
/// available pool via [`QuizSession::refresh_available`] without disturbing
/// the question already on screen.
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    available: Vec<Question>,
    current: Option<Question>,
    history: History,
    answer_shown: bool,
}

impl QuizSession {
    #[must_use]
    pub fn new(available: Vec<Question>) -> Self {
        Self {
            available,
            current: None,
            history: History::new(),
            answer_shown: false,
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn answer_shown(&self) -> bool {
        self.answer_shown
    }

    /// Number of questions eligible for the next draw.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.available.len()
    }

    /// Replace the available pool after a filter or mastery change.
    ///
    /// The question currently on screen stays put even when it no longer
    /// matches the new pool; it leaves the screen at the next advance.
    pub fn refresh_available(&mut self, available: Vec<Question>) {
        self.available = available;
    }

    /// Reveal the current question's answer. Returns false when there is no
    /// current question or the answer is already shown.
    pub fn reveal(&mut self) -> bool {
        if self.current.is_none() || self.answer_shown {
            return false;
        }
        self.answer_shown = true;
        true
    }

    /// Draw the next question and put it on screen with the answer hidden.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` when the available pool is empty; the
    /// current question and history are left untouched in that case.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&Question, SessionError> {
        let question = pick_next(&self.available, &mut self.history, rng)?;
        self.answer_shown = false;
        Ok(self.current.insert(question))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn build_question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            "数学",
            None,
            format!("Q{id}"),
            format!("A{id}"),
            "",
        )
    }

    fn build_pool(count: u64) -> Vec<Question> {
        (1..=count).map(build_question).collect()
    }

    #[test]
    fn advance_sets_current_and_hides_answer() {
        let mut session = QuizSession::new(build_pool(3));
        let mut rng = StdRng::seed_from_u64(1);

        assert!(session.current().is_none());
        let id = session.advance(&mut rng).unwrap().id;
        assert_eq!(session.current().unwrap().id, id);
        assert!(!session.answer_shown());

        session.reveal();
        session.advance(&mut rng).unwrap();
        assert!(!session.answer_shown());
    }

    #[test]
    fn reveal_is_idempotent() {
        let mut session = QuizSession::new(build_pool(1));
        let mut rng = StdRng::seed_from_u64(1);

        assert!(!session.reveal());

        session.advance(&mut rng).unwrap();
        assert!(session.reveal());
        assert!(!session.reveal());
        assert!(session.answer_shown());
    }

    #[test]
    fn advance_on_empty_pool_keeps_current() {
        let mut session = QuizSession::new(build_pool(2));
        let mut rng = StdRng::seed_from_u64(5);
        let shown = session.advance(&mut rng).unwrap().id;

        session.refresh_available(Vec::new());
        let err = session.advance(&mut rng).unwrap_err();
        assert!(matches!(err, SessionError::Empty));
        assert_eq!(session.current().unwrap().id, shown);
        assert_eq!(session.remaining(), 0);
    }

    #[test]
    fn refresh_keeps_current_question_on_screen() {
        let mut session = QuizSession::new(build_pool(3));
        let mut rng = StdRng::seed_from_u64(2);
        let shown = session.advance(&mut rng).unwrap().id;

        session.refresh_available(build_pool(1));
        assert_eq!(session.current().unwrap().id, shown);
        assert_eq!(session.remaining(), 1);
    }

    #[test]
    fn successive_advances_avoid_recent_questions() {
        let mut session = QuizSession::new(build_pool(4));
        let mut rng = StdRng::seed_from_u64(11);

        let mut seen = Vec::new();
        for _ in 0..4 {
            let id = session.advance(&mut rng).unwrap().id;
            assert!(!seen.contains(&id));
            seen.push(id);
        }
    }
}

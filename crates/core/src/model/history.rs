use std::collections::VecDeque;

use crate::model::ids::QuestionId;

/// Bounded FIFO of recently shown question ids.
///
/// Holds at most `History::MAX` entries; recording beyond that evicts the
/// oldest first. The selector consults it to avoid immediate repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    ids: VecDeque<QuestionId>,
}

impl History {
    pub const MAX: usize = 10;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, id: QuestionId) {
        self.ids.push_back(id);
        while self.ids.len() > Self::MAX {
            self.ids.pop_front();
        }
    }

    #[must_use]
    pub fn contains(&self, id: QuestionId) -> bool {
        self.ids.contains(&id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;

/// A single quiz item as it appears in the dataset.
///
/// Questions are immutable once loaded; all mutable state (mastery, history)
/// lives outside and references them by id. `subgenre` is optional and only
/// meaningful within the question's genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub genre: String,
    #[serde(default)]
    pub subgenre: Option<String>,
    #[serde(rename = "question")]
    pub prompt: String,
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
}

impl Question {
    #[must_use]
    pub fn new(
        id: QuestionId,
        genre: impl Into<String>,
        subgenre: Option<&str>,
        prompt: impl Into<String>,
        answer: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            id,
            genre: genre.into(),
            subgenre: subgenre.map(str::to_owned),
            prompt: prompt.into(),
            answer: answer.into(),
            explanation: explanation.into(),
        }
        .normalized()
    }

    /// Maps a blank or whitespace-only subgenre to "no subgenre".
    #[must_use]
    pub(crate) fn normalized(mut self) -> Self {
        self.subgenre = self
            .subgenre
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty());
        self
    }
}

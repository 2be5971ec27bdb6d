use quiz_core::model::{Question, QuestionId, Selection};

/// UI-ready rendering of the question on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionCardVm {
    pub id: QuestionId,
    pub id_label: String,
    pub tag_label: String,
    pub prompt: String,
    pub answer: String,
    pub explanation: Option<String>,
    pub mastered: bool,
}

/// Map a domain question into a card view model.
#[must_use]
pub fn map_question_card(question: &Question, selection: &Selection) -> QuestionCardVm {
    let tag_label = match question.subgenre.as_deref() {
        Some(subgenre) => format!("{} · {subgenre}", question.genre),
        None => question.genre.clone(),
    };
    let explanation = if question.explanation.trim().is_empty() {
        None
    } else {
        Some(question.explanation.clone())
    };

    QuestionCardVm {
        id: question.id,
        id_label: format!("#{}", question.id.value()),
        tag_label,
        prompt: question.prompt.clone(),
        answer: question.answer.clone(),
        explanation,
        mastered: selection.is_mastered(question.id),
    }
}

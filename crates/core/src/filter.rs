//! The filter engine: derives the set of questions eligible for selection
//! from the dataset and the user's current choices.

use crate::model::{Dataset, Question, Selection};

/// How the mastered set participates in a filter pass.
///
/// `Unmastered` is the selection path; `Any` and `Mastered` feed the
/// progress counts, which ignore and invert the mastery gate respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasteryFilter {
    Unmastered,
    Any,
    Mastered,
}

/// Counts shown in the progress line, recomputed after every change.
///
/// `total_in_range` deliberately ignores mastery, so a fully mastered
/// selection reads as "0 remaining of N".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub remaining: usize,
    pub total_in_range: usize,
    pub mastered_in_range: usize,
}

/// The four-gate inclusion test.
///
/// A question passes when:
/// 1. its genre is selected (an empty genre selection passes everything),
/// 2. its subgenre is selected, checked only when its genre is explicitly
///    selected, that genre carries a non-empty subgenre restriction, and the
///    question has a subgenre at all,
/// 3. its id falls inside the configured range,
/// 4. its mastered state agrees with `mastery`.
#[must_use]
pub fn matches(question: &Question, selection: &Selection, mastery: MasteryFilter) -> bool {
    let genres = selection.selected_genres();
    if !genres.is_empty() && !selection.is_genre_selected(&question.genre) {
        return false;
    }

    if selection.is_genre_selected(&question.genre) {
        if let (Some(selected), Some(subgenre)) = (
            selection.subgenres_for(&question.genre),
            question.subgenre.as_deref(),
        ) {
            if !selected.is_empty() && !selected.iter().any(|s| s == subgenre) {
                return false;
            }
        }
    }

    if !selection.range().contains(question.id) {
        return false;
    }

    match mastery {
        MasteryFilter::Unmastered => !selection.is_mastered(question.id),
        MasteryFilter::Any => true,
        MasteryFilter::Mastered => selection.is_mastered(question.id),
    }
}

/// Questions eligible for selection, in dataset order.
#[must_use]
pub fn available_questions(dataset: &Dataset, selection: &Selection) -> Vec<Question> {
    dataset
        .questions()
        .iter()
        .filter(|q| matches(q, selection, MasteryFilter::Unmastered))
        .cloned()
        .collect()
}

/// Progress counts over the genre/subgenre/range gates.
#[must_use]
pub fn progress(dataset: &Dataset, selection: &Selection) -> Progress {
    let mut progress = Progress::default();
    for question in dataset.questions() {
        if !matches(question, selection, MasteryFilter::Any) {
            continue;
        }
        progress.total_in_range += 1;
        if selection.is_mastered(question.id) {
            progress.mastered_in_range += 1;
        } else {
            progress.remaining += 1;
        }
    }
    progress
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

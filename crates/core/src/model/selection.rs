use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SelectionError {
    #[error("at least one genre must be selected")]
    NoGenreSelected,
}

//
// ─── RANGE ─────────────────────────────────────────────────────────────────────
//

/// Inclusive id bounds; either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuestionRange {
    pub start: Option<u64>,
    pub end: Option<u64>,
}

impl QuestionRange {
    #[must_use]
    pub fn new(start: Option<u64>, end: Option<u64>) -> Self {
        Self { start, end }
    }

    /// Builds a range from raw input fields.
    ///
    /// Empty or non-numeric text means "no bound"; it is never an error.
    #[must_use]
    pub fn parse(start: &str, end: &str) -> Self {
        Self {
            start: start.trim().parse().ok(),
            end: end.trim().parse().ok(),
        }
    }

    #[must_use]
    pub fn contains(&self, id: QuestionId) -> bool {
        if let Some(start) = self.start {
            if id.value() < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if id.value() > end {
                return false;
            }
        }
        true
    }
}

//
// ─── SELECTION ─────────────────────────────────────────────────────────────────
//

/// The user's persisted filter choices plus the mastered set.
///
/// An empty genre list means every genre is eligible. A genre with no
/// subgenre entry (or an empty one) has all its subgenres eligible.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    selected_genres: Vec<String>,
    selected_subgenres: BTreeMap<String, Vec<String>>,
    range: QuestionRange,
    mastered: BTreeSet<QuestionId>,
}

impl Selection {
    #[must_use]
    pub fn new(
        selected_genres: Vec<String>,
        selected_subgenres: BTreeMap<String, Vec<String>>,
        range: QuestionRange,
        mastered: BTreeSet<QuestionId>,
    ) -> Self {
        Self {
            selected_genres,
            selected_subgenres,
            range,
            mastered,
        }
    }

    #[must_use]
    pub fn selected_genres(&self) -> &[String] {
        &self.selected_genres
    }

    #[must_use]
    pub fn is_genre_selected(&self, genre: &str) -> bool {
        self.selected_genres.iter().any(|g| g == genre)
    }

    #[must_use]
    pub fn subgenres_for(&self, genre: &str) -> Option<&[String]> {
        self.selected_subgenres.get(genre).map(Vec::as_slice)
    }

    #[must_use]
    pub fn is_subgenre_selected(&self, genre: &str, subgenre: &str) -> bool {
        self.subgenres_for(genre)
            .is_some_and(|subs| subs.iter().any(|s| s == subgenre))
    }

    /// Records the selected subgenres of a genre; an empty list clears the
    /// entry instead (no restriction).
    pub fn set_subgenres(&mut self, genre: &str, subgenres: Vec<String>) {
        if subgenres.is_empty() {
            self.selected_subgenres.remove(genre);
        } else {
            self.selected_subgenres.insert(genre.to_owned(), subgenres);
        }
    }

    #[must_use]
    pub fn range(&self) -> QuestionRange {
        self.range
    }

    #[must_use]
    pub fn mastered(&self) -> &BTreeSet<QuestionId> {
        &self.mastered
    }

    #[must_use]
    pub fn mastered_count(&self) -> usize {
        self.mastered.len()
    }

    #[must_use]
    pub fn is_mastered(&self, id: QuestionId) -> bool {
        self.mastered.contains(&id)
    }

    /// Flips the mastered state of one question; returns the new state.
    pub fn toggle_mastered(&mut self, id: QuestionId) -> bool {
        if self.mastered.remove(&id) {
            false
        } else {
            self.mastered.insert(id);
            true
        }
    }

    /// Clears the whole mastered set; returns how many ids were cleared.
    pub fn clear_all_mastered(&mut self) -> usize {
        let cleared = self.mastered.len();
        self.mastered.clear();
        cleared
    }

    /// Removes the given ids from the mastered set; returns how many were
    /// actually mastered.
    pub fn clear_mastered_ids(&mut self, ids: &[QuestionId]) -> usize {
        let mut cleared = 0;
        for id in ids {
            if self.mastered.remove(id) {
                cleared += 1;
            }
        }
        cleared
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Distinguishes the initial setup commit from later edits.
///
/// The first commit must name at least one genre; afterwards an empty genre
/// list is a valid choice meaning "all genres".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitMode {
    FirstRun,
    Update,
}

/// In-progress filter choices, as edited in the settings panel.
///
/// Carries the mastered set through unchanged so a commit never loses
/// mastery state.
#[derive(Debug, Clone, Default)]
pub struct SelectionDraft {
    pub genres: Vec<String>,
    pub subgenres: BTreeMap<String, Vec<String>>,
    pub range: QuestionRange,
    mastered: BTreeSet<QuestionId>,
}

impl SelectionDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_selection(selection: &Selection) -> Self {
        Self {
            genres: selection.selected_genres.clone(),
            subgenres: selection.selected_subgenres.clone(),
            range: selection.range,
            mastered: selection.mastered.clone(),
        }
    }

    /// Validate the draft into a committed selection.
    ///
    /// Subgenre entries for unselected genres and empty entries are dropped;
    /// the remaining map only restricts genres that are actually selected.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::NoGenreSelected` for a first-run commit with
    /// no genre chosen.
    pub fn validate(self, mode: CommitMode) -> Result<Selection, SelectionError> {
        if mode == CommitMode::FirstRun && self.genres.is_empty() {
            return Err(SelectionError::NoGenreSelected);
        }

        let mut subgenres = BTreeMap::new();
        for genre in &self.genres {
            if let Some(subs) = self.subgenres.get(genre) {
                if !subs.is_empty() {
                    subgenres.insert(genre.clone(), subs.clone());
                }
            }
        }

        Ok(Selection {
            selected_genres: self.genres,
            selected_subgenres: subgenres,
            range: self.range,
            mastered: self.mastered,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

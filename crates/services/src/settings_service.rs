use std::sync::Arc;

use quiz_core::model::{CommitMode, Dataset, QuestionId, Selection, SelectionDraft, SelectionError};
use quiz_core::time::Clock;
use storage::repository::{SettingsRecord, SettingsRepository, StorageError};

use crate::error::SettingsError;

/// Loads, validates, and persists the user's selection.
///
/// Every mutation saves the full blob; saves are idempotent, so callers may
/// fire them without awaiting ordering guarantees.
#[derive(Clone)]
pub struct SettingsService {
    repo: Arc<dyn SettingsRepository>,
    clock: Clock,
}

impl SettingsService {
    #[must_use]
    pub fn new(repo: Arc<dyn SettingsRepository>, clock: Clock) -> Self {
        Self { repo, clock }
    }

    /// Fetch the persisted selection.
    ///
    /// `None` means first run: nothing was ever saved, or the stored blob is
    /// unreadable (logged, never surfaced).
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` only when the store itself is unreachable.
    pub async fn load(&self) -> Result<Option<Selection>, SettingsError> {
        match self.repo.load_settings().await {
            Ok(record) => Ok(record.map(SettingsRecord::into_selection)),
            Err(StorageError::Serialization(err)) => {
                log::warn!("stored settings unreadable, starting fresh: {err}");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Persist the selection, stamping the access time.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` on storage failures.
    pub async fn save(&self, selection: &Selection) -> Result<(), SettingsError> {
        let record = SettingsRecord::from_selection(selection, self.clock.now());
        self.repo.save_settings(&record).await?;
        Ok(())
    }

    /// Validate a draft and persist the committed selection.
    ///
    /// A first-run commit also selects every subgenre of each chosen genre,
    /// so the settings panel starts with them all checked.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::NoGenreSelected` (wrapped) for a first-run
    /// commit with no genre; nothing is persisted in that case.
    pub async fn commit(
        &self,
        dataset: &Dataset,
        mode: CommitMode,
        draft: SelectionDraft,
    ) -> Result<Selection, SettingsError> {
        let mut selection = draft.validate(mode)?;
        if mode == CommitMode::FirstRun {
            for genre in selection.selected_genres().to_vec() {
                selection.set_subgenres(&genre, dataset.subgenres_of(&genre));
            }
        }
        self.save(&selection).await?;
        Ok(selection)
    }

    /// Flip one question's mastered state and persist; returns the new state.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` on storage failures.
    pub async fn toggle_mastered(
        &self,
        selection: &mut Selection,
        id: QuestionId,
    ) -> Result<bool, SettingsError> {
        let mastered = selection.toggle_mastered(id);
        self.save(selection).await?;
        Ok(mastered)
    }

    /// Clear the whole mastered set and persist; returns how many ids were
    /// cleared.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` on storage failures.
    pub async fn reset_all_mastered(
        &self,
        selection: &mut Selection,
    ) -> Result<usize, SettingsError> {
        let cleared = selection.clear_all_mastered();
        self.save(selection).await?;
        Ok(cleared)
    }

    /// Clear mastery for questions in the currently selected genres and
    /// persist; returns how many ids were cleared.
    ///
    /// # Errors
    ///
    /// Rejects with `SelectionError::NoGenreSelected` before touching any
    /// state when no genre is selected.
    pub async fn reset_genre_mastered(
        &self,
        dataset: &Dataset,
        selection: &mut Selection,
    ) -> Result<usize, SettingsError> {
        if selection.selected_genres().is_empty() {
            return Err(SelectionError::NoGenreSelected.into());
        }
        let ids = dataset.ids_in_genres(selection.selected_genres());
        let cleared = selection.clear_mastered_ids(&ids);
        self.save(selection).await?;
        Ok(cleared)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

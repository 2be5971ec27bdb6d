use quiz_core::model::{CommitMode, Dataset, QuestionId, Selection, SelectionDraft};
use quiz_core::time::Clock;
use storage::repository::Storage;

use crate::dataset_service::{DatasetService, DatasetSource};
use crate::error::SettingsError;
use crate::settings_service::SettingsService;

/// Everything the quiz screen needs at startup.
#[derive(Debug, Clone)]
pub struct SessionBootstrap {
    pub dataset: Dataset,
    pub selection: Option<Selection>,
}

impl SessionBootstrap {
    /// True when no settings have ever been committed on this machine.
    #[must_use]
    pub fn is_first_run(&self) -> bool {
        self.selection.is_none()
    }
}

/// Orchestrates dataset loading and settings persistence for the quiz loop.
#[derive(Clone)]
pub struct QuizLoopService {
    datasets: DatasetService,
    settings: SettingsService,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(storage: &Storage, source: DatasetSource, clock: Clock) -> Self {
        Self {
            datasets: DatasetService::new(source, clock),
            settings: SettingsService::new(storage.settings.clone(), clock),
        }
    }

    /// Load the dataset and the persisted selection, if any.
    ///
    /// Dataset problems never fail the bootstrap; the built-in questions
    /// stand in. An unreadable settings blob reads as a first run.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` when the settings store is unreachable.
    pub async fn bootstrap(&self) -> Result<SessionBootstrap, SettingsError> {
        let dataset = self.datasets.load().await;
        let selection = self.settings.load().await?;
        Ok(SessionBootstrap { dataset, selection })
    }

    /// Validate and persist a settings draft.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` on validation or storage failures.
    pub async fn commit_settings(
        &self,
        dataset: &Dataset,
        mode: CommitMode,
        draft: SelectionDraft,
    ) -> Result<Selection, SettingsError> {
        self.settings.commit(dataset, mode, draft).await
    }

    /// Flip one question's mastered state and persist the selection.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` on storage failures.
    pub async fn toggle_mastered(
        &self,
        selection: &mut Selection,
        id: QuestionId,
    ) -> Result<bool, SettingsError> {
        self.settings.toggle_mastered(selection, id).await
    }

    /// Clear all mastered marks and persist the selection.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` on storage failures.
    pub async fn reset_all_mastered(
        &self,
        selection: &mut Selection,
    ) -> Result<usize, SettingsError> {
        self.settings.reset_all_mastered(selection).await
    }

    /// Clear mastered marks within the selected genres and persist.
    ///
    /// # Errors
    ///
    /// Rejects when no genre is selected; storage failures propagate.
    pub async fn reset_genre_mastered(
        &self,
        dataset: &Dataset,
        selection: &mut Selection,
    ) -> Result<usize, SettingsError> {
        self.settings.reset_genre_mastered(dataset, selection).await
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use quiz_core::model::{QuestionId, QuestionRange, Selection};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of the settings blob, stored under the `quizSettings` key.
///
/// This mirrors the domain `Selection` so repositories can serialize without
/// leaking storage concerns into the domain layer. Every field defaults, so a
/// blob written by an older version (or missing fields entirely) still loads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsRecord {
    pub selected_genres: Vec<String>,
    pub selected_subgenres: BTreeMap<String, Vec<String>>,
    pub question_range: RangeRecord,
    pub mastered_questions: Vec<u64>,
    pub last_access_date: Option<DateTime<Utc>>,
}

/// Persisted id bounds; `null` means the side is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeRecord {
    pub start: Option<u64>,
    pub end: Option<u64>,
}

impl SettingsRecord {
    #[must_use]
    pub fn from_selection(selection: &Selection, last_access: DateTime<Utc>) -> Self {
        Self {
            selected_genres: selection.selected_genres().to_vec(),
            selected_subgenres: selection
                .selected_genres()
                .iter()
                .filter_map(|genre| {
                    selection
                        .subgenres_for(genre)
                        .map(|subs| (genre.clone(), subs.to_vec()))
                })
                .collect(),
            question_range: RangeRecord {
                start: selection.range().start,
                end: selection.range().end,
            },
            mastered_questions: selection.mastered().iter().map(QuestionId::value).collect(),
            last_access_date: Some(last_access),
        }
    }

    /// Convert the record back into a domain `Selection`.
    ///
    /// Infallible: unknown or missing pieces fall back to "no restriction".
    #[must_use]
    pub fn into_selection(self) -> Selection {
        let mastered: BTreeSet<QuestionId> = self
            .mastered_questions
            .into_iter()
            .map(QuestionId::new)
            .collect();
        Selection::new(
            self.selected_genres,
            self.selected_subgenres,
            QuestionRange::new(self.question_range.start, self.question_range.end),
            mastered,
        )
    }
}

/// Repository contract for the settings blob.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Fetch the stored settings. `None` means nothing was ever saved,
    /// which the caller treats as a first run.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store is unreachable or the blob cannot
    /// be decoded.
    async fn load_settings(&self) -> Result<Option<SettingsRecord>, StorageError>;

    /// Persist the settings, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save_settings(&self, record: &SettingsRecord) -> Result<(), StorageError>;
}

/// Simple in-memory settings store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemorySettingsStore {
    record: Arc<Mutex<Option<SettingsRecord>>>,
}

impl InMemorySettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsRepository for InMemorySettingsStore {
    async fn load_settings(&self) -> Result<Option<SettingsRecord>, StorageError> {
        let guard = self
            .record
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_settings(&self, record: &SettingsRecord) -> Result<(), StorageError> {
        let mut guard = self
            .record
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(record.clone());
        Ok(())
    }
}

/// Aggregates the settings repository behind a trait object for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub settings: Arc<dyn SettingsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            settings: Arc::new(InMemorySettingsStore::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{CommitMode, SelectionDraft};
    use quiz_core::time::fixed_now;

    fn build_selection() -> Selection {
        let mut draft = SelectionDraft::new();
        draft.genres = vec!["数学".to_owned(), "日本史".to_owned()];
        draft
            .subgenres
            .insert("数学".to_owned(), vec!["幾何".to_owned()]);
        draft.range = QuestionRange::new(Some(1), None);
        let mut selection = draft.validate(CommitMode::Update).unwrap();
        selection.toggle_mastered(QuestionId::new(6));
        selection
    }

    #[tokio::test]
    async fn in_memory_round_trips_selection() {
        let store = InMemorySettingsStore::new();
        assert!(store.load_settings().await.unwrap().is_none());

        let selection = build_selection();
        let record = SettingsRecord::from_selection(&selection, fixed_now());
        store.save_settings(&record).await.unwrap();

        let loaded = store.load_settings().await.unwrap().unwrap();
        assert_eq!(loaded, record);
        assert_eq!(loaded.into_selection(), selection);
    }

    #[tokio::test]
    async fn save_overwrites_previous_record() {
        let store = InMemorySettingsStore::new();
        let mut selection = build_selection();
        store
            .save_settings(&SettingsRecord::from_selection(&selection, fixed_now()))
            .await
            .unwrap();

        selection.toggle_mastered(QuestionId::new(7));
        let updated = SettingsRecord::from_selection(&selection, fixed_now());
        store.save_settings(&updated).await.unwrap();

        let loaded = store.load_settings().await.unwrap().unwrap();
        assert_eq!(loaded.mastered_questions, vec![6, 7]);
    }

    #[test]
    fn record_uses_camel_case_keys() {
        let record = SettingsRecord::from_selection(&build_selection(), fixed_now());
        let value = serde_json::to_value(&record).unwrap();

        assert!(value.get("selectedGenres").is_some());
        assert!(value.get("selectedSubgenres").is_some());
        assert!(value.get("questionRange").is_some());
        assert!(value.get("masteredQuestions").is_some());
        assert!(value.get("lastAccessDate").is_some());
    }

    #[test]
    fn record_tolerates_missing_fields() {
        let record: SettingsRecord =
            serde_json::from_str(r#"{"selectedGenres": ["数学"]}"#).unwrap();

        assert_eq!(record.selected_genres, vec!["数学"]);
        assert!(record.selected_subgenres.is_empty());
        assert_eq!(record.question_range, RangeRecord::default());
        assert!(record.mastered_questions.is_empty());
        assert!(record.last_access_date.is_none());
    }

    #[test]
    fn record_reads_browser_style_blob() {
        let blob = r#"{
            "selectedGenres": ["英単語"],
            "selectedSubgenres": {"英単語": ["基礎"]},
            "questionRange": {"start": 1, "end": 5},
            "masteredQuestions": [2, 3],
            "lastAccessDate": "2024-01-15T09:30:00.000Z"
        }"#;
        let record: SettingsRecord = serde_json::from_str(blob).unwrap();
        let selection = record.into_selection();

        assert!(selection.is_genre_selected("英単語"));
        assert!(selection.is_subgenre_selected("英単語", "基礎"));
        assert_eq!(selection.range(), QuestionRange::new(Some(1), Some(5)));
        assert!(selection.is_mastered(QuestionId::new(2)));
        assert!(selection.is_mastered(QuestionId::new(3)));
    }
}

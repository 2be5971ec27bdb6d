use async_trait::async_trait;
use sqlx::Row;

use crate::repository::{SettingsRecord, SettingsRepository, StorageError};

use super::SqliteRepository;

/// Key the settings blob is stored under, shared with earlier versions of
/// the app so existing data keeps loading.
const SETTINGS_KEY: &str = "quizSettings";

#[async_trait]
impl SettingsRepository for SqliteRepository {
    async fn load_settings(&self) -> Result<Option<SettingsRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT value FROM settings WHERE key = ?1
            ",
        )
        .bind(SETTINGS_KEY)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let value: String = row
            .try_get("value")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        serde_json::from_str(&value)
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn save_settings(&self, record: &SettingsRecord) -> Result<(), StorageError> {
        let value = serde_json::to_string(record)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        sqlx::query(
            r"
            INSERT INTO settings (key, value)
            VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value
            ",
        )
        .bind(SETTINGS_KEY)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}

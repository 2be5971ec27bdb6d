//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::SelectionError;
use storage::repository::StorageError;

/// Errors emitted while loading a question file.
///
/// These never reach the user: the dataset loader logs them and substitutes
/// the built-in fallback set.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DatasetError {
    #[error("dataset fetch failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("dataset file unreadable: {0}")]
    Io(#[from] std::io::Error),
    #[error("dataset malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors emitted by `SettingsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the quiz session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available with the current settings")]
    Empty,
}

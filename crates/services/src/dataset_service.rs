use std::path::{Path, PathBuf};

use quiz_core::model::{Dataset, DatasetPayload};
use quiz_core::time::Clock;

use crate::error::DatasetError;

/// Where the question file comes from.
#[derive(Debug, Clone)]
pub enum DatasetSource {
    Url(String),
    File(PathBuf),
}

impl DatasetSource {
    /// Location used when neither a flag nor an environment variable names
    /// one.
    #[must_use]
    pub fn default_file() -> Self {
        Self::File(PathBuf::from("data/questions.json"))
    }
}

/// Loads the question dataset from a URL or a local file.
///
/// Loading is total: any fetch, IO, or shape problem is logged and the
/// built-in fallback set is returned, so the app always has questions.
#[derive(Clone)]
pub struct DatasetService {
    client: reqwest::Client,
    source: DatasetSource,
    clock: Clock,
}

impl DatasetService {
    #[must_use]
    pub fn new(source: DatasetSource, clock: Clock) -> Self {
        Self {
            client: reqwest::Client::new(),
            source,
            clock,
        }
    }

    /// Load the dataset from the configured source, falling back on failure.
    pub async fn load(&self) -> Dataset {
        match self.try_load().await {
            Ok(dataset) => {
                log::info!("loaded {} questions", dataset.total_questions());
                dataset
            }
            Err(err) => {
                log::warn!("using built-in questions: {err}");
                Dataset::fallback()
            }
        }
    }

    async fn try_load(&self) -> Result<Dataset, DatasetError> {
        let payload = match &self.source {
            DatasetSource::Url(url) => self.fetch(url).await?,
            DatasetSource::File(path) => Self::read_file(path)?,
        };
        Ok(payload.into_dataset())
    }

    async fn fetch(&self, url: &str) -> Result<DatasetPayload, DatasetError> {
        // timestamp parameter defeats intermediate caches on re-fetch
        let url = format!("{url}?t={}", self.clock.now().timestamp_millis());
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(DatasetError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }

    fn read_file(path: &Path) -> Result<DatasetPayload, DatasetError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

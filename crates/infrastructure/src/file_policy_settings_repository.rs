//! JSON file store for reaper settings.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use idlereap_application::PolicySettingsRepository;
use idlereap_core::{AppError, AppResult};
use idlereap_domain::PolicySettings;

/// Reads settings from a JSON document on disk.
///
/// The file is re-read on every load so edits apply to the next run. A
/// missing file yields the default settings.
#[derive(Debug, Clone)]
pub struct FilePolicySettingsRepository {
    path: PathBuf,
}

impl FilePolicySettingsRepository {
    /// Creates a repository reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PolicySettingsRepository for FilePolicySettingsRepository {
    async fn load_settings(&self) -> AppResult<PolicySettings> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(
                    path = %self.path.display(),
                    "reaper settings file not found, using defaults"
                );
                return Ok(PolicySettings::default());
            }
            Err(error) => {
                return Err(AppError::Unavailable(format!(
                    "failed to read reaper settings '{}': {error}",
                    self.path.display()
                )));
            }
        };

        serde_json::from_str::<PolicySettings>(contents.as_str()).map_err(|error| {
            AppError::Validation(format!(
                "invalid reaper settings '{}': {error}",
                self.path.display()
            ))
        })
    }
}

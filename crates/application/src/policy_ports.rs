use async_trait::async_trait;

use idlereap_core::AppResult;
use idlereap_domain::PolicySettings;

/// Read port for the administrator-edited reaper settings.
#[async_trait]
pub trait PolicySettingsRepository: Send + Sync {
    /// Loads the current settings record.
    async fn load_settings(&self) -> AppResult<PolicySettings>;
}

//! Scheduled cleanup task wrapping the reaper for a host scheduler.
//!
//! The task snapshots the policy once per execution, reports progress, and
//! re-raises failures so the scheduler can mark the run as failed.

use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use idlereap_core::AppResult;
use idlereap_domain::{CheckHour, PolicyConfiguration, RunSummary};

use crate::policy_ports::PolicySettingsRepository;
use crate::reaper_service::InactivityReaperService;

/// Sink for run progress, expressed as a percentage.
pub trait RunProgress: Send + Sync {
    /// Reports progress between 0 and 100.
    fn report(&self, percent: f64);
}

/// Progress sink that discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRunProgress;

impl RunProgress for NoopRunProgress {
    fn report(&self, _percent: f64) {}
}

/// When a host scheduler should fire the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskTrigger {
    /// Once a day at the given UTC hour.
    Daily {
        /// Hour of day.
        hour: CheckHour,
    },
}

/// Host-facing task that runs one reaper pass per invocation.
#[derive(Clone)]
pub struct InactiveAccountCleanupTask {
    reaper: InactivityReaperService,
    settings_repository: Arc<dyn PolicySettingsRepository>,
}

impl InactiveAccountCleanupTask {
    /// Display name shown by schedulers.
    pub const NAME: &'static str = "Clean Up Inactive Users";
    /// Stable task key.
    pub const KEY: &'static str = "idlereap.inactive_cleanup";
    /// Task description.
    pub const DESCRIPTION: &'static str = "Checks for inactive users and disables or deletes them according to the reaper policy.";
    /// Scheduler category.
    pub const CATEGORY: &'static str = "User Management";

    /// Creates the task.
    #[must_use]
    pub fn new(
        reaper: InactivityReaperService,
        settings_repository: Arc<dyn PolicySettingsRepository>,
    ) -> Self {
        Self {
            reaper,
            settings_repository,
        }
    }

    /// Loads and normalizes the current policy, logging every correction.
    pub async fn load_policy(&self) -> AppResult<PolicyConfiguration> {
        let settings = self.settings_repository.load_settings().await?;
        let (policy, corrections) = settings.normalize();

        for correction in &corrections {
            warn!(correction = %correction, "corrected invalid reaper setting");
        }

        Ok(policy)
    }

    /// Returns the trigger the host should register for this task.
    ///
    /// Falls back to the default hour when settings cannot be loaded.
    /// Corrections are only logged by the run itself.
    pub async fn default_trigger(&self) -> TaskTrigger {
        let hour = match self.settings_repository.load_settings().await {
            Ok(settings) => settings.normalize().0.check_hour(),
            Err(error) => {
                warn!(
                    error = %error,
                    default_hour = CheckHour::DEFAULT.hour(),
                    "failed to load reaper settings for trigger, using default hour"
                );
                CheckHour::DEFAULT
            }
        };

        TaskTrigger::Daily { hour }
    }

    /// Executes one cleanup pass.
    pub async fn execute(
        &self,
        progress: &dyn RunProgress,
        cancellation: &CancellationToken,
    ) -> AppResult<RunSummary> {
        info!(task = Self::KEY, "starting inactive account cleanup task");
        progress.report(0.0);

        match self.run_once(cancellation).await {
            Ok(summary) => {
                if !summary.cancelled {
                    progress.report(100.0);
                }
                info!(
                    task = Self::KEY,
                    cancelled = summary.cancelled,
                    "inactive account cleanup task completed"
                );
                Ok(summary)
            }
            Err(error) => {
                error!(
                    task = Self::KEY,
                    error = %error,
                    "inactive account cleanup task failed"
                );
                Err(error)
            }
        }
    }

    async fn run_once(&self, cancellation: &CancellationToken) -> AppResult<RunSummary> {
        let policy = self.load_policy().await?;
        self.reaper.evaluate(&policy, Utc::now(), cancellation).await
    }
}

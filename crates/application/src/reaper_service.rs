//! Inactivity evaluation engine.
//!
//! Walks the directory once per run, classifies every account against the
//! policy snapshot and dispatches the configured remediation. Failures local
//! to one account are recorded in the summary and never abort the run.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use idlereap_core::{AppError, AppResult};
use idlereap_domain::{
    AccountClassification, AccountFailureStage, AccountSnapshot, ActionKind, PolicyConfiguration,
    RunSummary, classify_account,
};

use crate::directory_ports::{DirectoryEntry, UserDirectory};

mod remediation;

/// Application service that evaluates and remediates inactive accounts.
#[derive(Clone)]
pub struct InactivityReaperService {
    directory: Arc<dyn UserDirectory>,
    run_lock: Arc<Mutex<()>>,
}

impl InactivityReaperService {
    /// Creates a reaper bound to one directory.
    #[must_use]
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            directory,
            run_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Runs one evaluation pass at instant `now`.
    ///
    /// At most one pass runs at a time per service (clones share the lock);
    /// an overlapping call fails with [`AppError::Conflict`]. Cancellation is
    /// observed between accounts and returns the partial summary.
    pub async fn evaluate(
        &self,
        policy: &PolicyConfiguration,
        now: DateTime<Utc>,
        cancellation: &CancellationToken,
    ) -> AppResult<RunSummary> {
        let Ok(_run_guard) = self.run_lock.try_lock() else {
            return Err(AppError::Conflict(
                "an inactivity reaper run is already in progress".to_owned(),
            ));
        };

        if !policy.is_enabled() {
            info!("inactivity reaper is disabled, skipping inactive account check");
            return Ok(RunSummary::default());
        }

        info!(
            threshold_days = policy.inactivity_threshold_days(),
            action = %policy.action_kind(),
            dry_run = policy.is_dry_run(),
            whitelisted = policy.whitelisted_account_ids().len(),
            "starting inactive account check"
        );

        let entries = self.directory.list_accounts().await?;
        let mut summary = RunSummary::default();

        for entry in entries {
            if cancellation.is_cancelled() {
                warn!(
                    processed = summary.processed,
                    "inactive account check cancelled before completion"
                );
                summary.cancelled = true;
                break;
            }

            summary.record_processed();

            let account = match entry {
                DirectoryEntry::Account(account) => account,
                DirectoryEntry::Unreadable { account_id, reason } => {
                    error!(
                        account_id = %account_id,
                        error = %reason,
                        "failed to read account metadata, skipping account"
                    );
                    summary.record_failure(account_id, AccountFailureStage::MetadataRead, reason);
                    continue;
                }
            };

            self.evaluate_account(policy, &account, now, &mut summary).await;
        }

        info!(
            processed = summary.processed,
            skipped_admin = summary.skipped_admin,
            skipped_whitelist = summary.skipped_whitelist,
            skipped_recent = summary.skipped_recent,
            actioned = summary.actioned,
            failed = summary.failed,
            cancelled = summary.cancelled,
            "inactive account check completed"
        );

        Ok(summary)
    }

    async fn evaluate_account(
        &self,
        policy: &PolicyConfiguration,
        account: &AccountSnapshot,
        now: DateTime<Utc>,
        summary: &mut RunSummary,
    ) {
        match classify_account(policy, account, now) {
            AccountClassification::Administrator => {
                info!(
                    account_id = %account.id(),
                    display_name = account.display_name(),
                    "skipping account: administrator"
                );
                summary.record_skipped_admin();
            }
            AccountClassification::Whitelisted => {
                info!(
                    account_id = %account.id(),
                    display_name = account.display_name(),
                    "skipping account: whitelisted"
                );
                summary.record_skipped_whitelist();
            }
            AccountClassification::Recent { inactive_for } => {
                info!(
                    account_id = %account.id(),
                    display_name = account.display_name(),
                    last_activity = ?account.last_activity_at(),
                    inactive_days = inactive_for.num_days(),
                    "skipping account: active within threshold"
                );
                summary.record_skipped_recent();
            }
            AccountClassification::Inactive { inactive_for } => {
                self.remediate(
                    policy.action_kind(),
                    policy.is_dry_run(),
                    account,
                    inactive_for,
                    summary,
                )
                .await;
            }
        }
    }
}

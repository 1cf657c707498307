//! Aggregate statistics for one reaper run.

use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::account::AccountId;
use crate::policy::ActionKind;

/// Step at which one account could not be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountFailureStage {
    /// The directory could not return the account's metadata.
    MetadataRead,
    /// The remediation call failed.
    Action(ActionKind),
}

impl Display for AccountFailureStage {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MetadataRead => formatter.write_str("metadata_read"),
            Self::Action(action_kind) => formatter.write_str(action_kind.verb()),
        }
    }
}

/// One account that failed during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountFailure {
    /// Account the failure belongs to.
    pub account_id: AccountId,
    /// Where the failure happened.
    pub stage: AccountFailureStage,
    /// Error detail reported by the directory.
    pub message: String,
}

/// Counters accumulated during one run.
///
/// `processed` always equals the sum of the skip counters, `actioned` and
/// `failed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Accounts examined.
    pub processed: u32,
    /// Accounts skipped because they are administrators.
    pub skipped_admin: u32,
    /// Accounts skipped because they are whitelisted.
    pub skipped_whitelist: u32,
    /// Accounts skipped because they were active within the threshold.
    pub skipped_recent: u32,
    /// Accounts actioned, or that would have been in dry-run mode.
    pub actioned: u32,
    /// Accounts whose metadata read or action failed.
    pub failed: u32,
    /// Details for every counted failure.
    pub failures: Vec<AccountFailure>,
    /// Whether the run stopped early on cancellation.
    pub cancelled: bool,
}

impl RunSummary {
    /// Records one examined account.
    pub fn record_processed(&mut self) {
        self.processed = self.processed.saturating_add(1);
    }

    /// Records an administrator skip.
    pub fn record_skipped_admin(&mut self) {
        self.skipped_admin = self.skipped_admin.saturating_add(1);
    }

    /// Records a whitelist skip.
    pub fn record_skipped_whitelist(&mut self) {
        self.skipped_whitelist = self.skipped_whitelist.saturating_add(1);
    }

    /// Records a recently-active skip.
    pub fn record_skipped_recent(&mut self) {
        self.skipped_recent = self.skipped_recent.saturating_add(1);
    }

    /// Records one actioned account.
    pub fn record_actioned(&mut self) {
        self.actioned = self.actioned.saturating_add(1);
    }

    /// Records one failed account.
    pub fn record_failure(
        &mut self,
        account_id: AccountId,
        stage: AccountFailureStage,
        message: impl Into<String>,
    ) {
        self.failed = self.failed.saturating_add(1);
        self.failures.push(AccountFailure {
            account_id,
            stage,
            message: message.into(),
        });
    }

    /// Returns whether every processed account landed in exactly one bucket.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        let accounted = u64::from(self.skipped_admin)
            + u64::from(self.skipped_whitelist)
            + u64::from(self.skipped_recent)
            + u64::from(self.actioned)
            + u64::from(self.failed);

        accounted == u64::from(self.processed)
    }
}

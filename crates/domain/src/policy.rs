//! Reaper policy: the settings record edited by administrators and the
//! validated configuration the engine evaluates against.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use chrono::TimeDelta;
use idlereap_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::account::AccountId;

/// Default inactivity threshold in days.
pub const DEFAULT_INACTIVITY_THRESHOLD_DAYS: u32 = 30;

/// Remediation applied to inactive, non-exempt accounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Disable the account, keeping its data.
    #[default]
    Disable,
    /// Permanently remove the account.
    Delete,
}

impl ActionKind {
    /// Returns the settings value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disable => "Disable",
            Self::Delete => "Delete",
        }
    }

    /// Returns the lowercase verb used in log records.
    #[must_use]
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Disable => "disable",
            Self::Delete => "delete",
        }
    }

    /// Parses a settings value, matching case-insensitively.
    ///
    /// Returns `None` for unrecognized values.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("delete") {
            Some(Self::Delete)
        } else if value.eq_ignore_ascii_case("disable") {
            Some(Self::Disable)
        } else {
            None
        }
    }
}

impl Display for ActionKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Hour of day (UTC, 0-23) the daily run fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CheckHour(u8);

impl CheckHour {
    /// Hour used when the configured value is out of range.
    pub const DEFAULT: Self = Self(3);

    /// Creates a validated check hour.
    pub fn new(hour: u8) -> AppResult<Self> {
        if hour > 23 {
            return Err(AppError::Validation(format!(
                "check hour must be between 0 and 23, got {hour}"
            )));
        }

        Ok(Self(hour))
    }

    /// Returns the hour value.
    #[must_use]
    pub fn hour(&self) -> u32 {
        u32::from(self.0)
    }
}

impl Default for CheckHour {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Settings record exchanged with the settings surface.
///
/// Unvalidated: every field accepts what an editor might store. Missing
/// fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicySettings {
    /// Master switch for the reaper.
    pub enabled: bool,
    /// Days of inactivity tolerated before an account is actioned.
    pub inactivity_threshold_days: i64,
    /// `"Disable"` or `"Delete"`.
    pub action_kind: String,
    /// Accounts exempt from any action.
    pub whitelisted_account_ids: Vec<String>,
    /// Log would-be actions without performing them.
    pub dry_run: bool,
    /// Hour of day the daily run fires.
    pub check_hour: i64,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            inactivity_threshold_days: i64::from(DEFAULT_INACTIVITY_THRESHOLD_DAYS),
            action_kind: ActionKind::Disable.as_str().to_owned(),
            whitelisted_account_ids: Vec::new(),
            dry_run: false,
            check_hour: i64::from(CheckHour::DEFAULT.0),
        }
    }
}

/// A settings value replaced by a safe default during normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyCorrection {
    /// `checkHour` was outside 0-23 and fell back to the default hour.
    CheckHourOutOfRange {
        /// Stored value.
        value: i64,
    },
    /// `inactivityThresholdDays` was negative and was raised to zero.
    NegativeThreshold {
        /// Stored value.
        value: i64,
    },
    /// `inactivityThresholdDays` exceeded the supported range and was capped.
    ThresholdTooLarge {
        /// Stored value.
        value: i64,
    },
    /// `actionKind` was not recognized and fell back to `Disable`.
    UnknownActionKind {
        /// Stored value.
        value: String,
    },
    /// A whitelist entry was blank and was dropped.
    BlankWhitelistEntry {
        /// Position in the stored list.
        index: usize,
    },
}

impl Display for PolicyCorrection {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CheckHourOutOfRange { value } => write!(
                formatter,
                "checkHour {value} is outside 0-23, using {}",
                CheckHour::DEFAULT.0
            ),
            Self::NegativeThreshold { value } => write!(
                formatter,
                "inactivityThresholdDays {value} is negative, using 0"
            ),
            Self::ThresholdTooLarge { value } => write!(
                formatter,
                "inactivityThresholdDays {value} is too large, using {}",
                u32::MAX
            ),
            Self::UnknownActionKind { value } => write!(
                formatter,
                "actionKind '{value}' is not recognized, using {}",
                ActionKind::Disable
            ),
            Self::BlankWhitelistEntry { index } => {
                write!(formatter, "whitelistedAccountIds[{index}] is blank, ignoring")
            }
        }
    }
}

impl PolicySettings {
    /// Converts stored settings into a configuration, correcting invalid
    /// values instead of rejecting them.
    #[must_use]
    pub fn normalize(&self) -> (PolicyConfiguration, Vec<PolicyCorrection>) {
        let mut corrections = Vec::new();

        let inactivity_threshold_days = if self.inactivity_threshold_days < 0 {
            corrections.push(PolicyCorrection::NegativeThreshold {
                value: self.inactivity_threshold_days,
            });
            0
        } else {
            u32::try_from(self.inactivity_threshold_days).unwrap_or_else(|_| {
                corrections.push(PolicyCorrection::ThresholdTooLarge {
                    value: self.inactivity_threshold_days,
                });
                u32::MAX
            })
        };

        let action_kind = ActionKind::parse(self.action_kind.as_str()).unwrap_or_else(|| {
            corrections.push(PolicyCorrection::UnknownActionKind {
                value: self.action_kind.clone(),
            });
            ActionKind::Disable
        });

        let mut whitelisted_account_ids = BTreeSet::new();
        for (index, entry) in self.whitelisted_account_ids.iter().enumerate() {
            match AccountId::new(entry.trim()) {
                Ok(account_id) => {
                    whitelisted_account_ids.insert(account_id);
                }
                Err(_) => corrections.push(PolicyCorrection::BlankWhitelistEntry { index }),
            }
        }

        let check_hour = u8::try_from(self.check_hour)
            .ok()
            .and_then(|hour| CheckHour::new(hour).ok())
            .unwrap_or_else(|| {
                corrections.push(PolicyCorrection::CheckHourOutOfRange {
                    value: self.check_hour,
                });
                CheckHour::DEFAULT
            });

        let configuration = PolicyConfiguration {
            enabled: self.enabled,
            inactivity_threshold_days,
            action_kind,
            whitelisted_account_ids,
            dry_run: self.dry_run,
            check_hour,
        };

        (configuration, corrections)
    }
}

/// Validated reaper policy, immutable for the duration of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyConfiguration {
    enabled: bool,
    inactivity_threshold_days: u32,
    action_kind: ActionKind,
    whitelisted_account_ids: BTreeSet<AccountId>,
    dry_run: bool,
    check_hour: CheckHour,
}

impl Default for PolicyConfiguration {
    fn default() -> Self {
        Self {
            enabled: true,
            inactivity_threshold_days: DEFAULT_INACTIVITY_THRESHOLD_DAYS,
            action_kind: ActionKind::Disable,
            whitelisted_account_ids: BTreeSet::new(),
            dry_run: false,
            check_hour: CheckHour::DEFAULT,
        }
    }
}

impl PolicyConfiguration {
    /// Sets the master switch.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the inactivity threshold in days.
    #[must_use]
    pub fn with_inactivity_threshold_days(mut self, days: u32) -> Self {
        self.inactivity_threshold_days = days;
        self
    }

    /// Sets the remediation action.
    #[must_use]
    pub fn with_action_kind(mut self, action_kind: ActionKind) -> Self {
        self.action_kind = action_kind;
        self
    }

    /// Adds one exempt account.
    #[must_use]
    pub fn with_whitelisted_account(mut self, account_id: AccountId) -> Self {
        self.whitelisted_account_ids.insert(account_id);
        self
    }

    /// Sets dry-run mode.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Returns whether the reaper is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the inactivity threshold in days.
    #[must_use]
    pub fn inactivity_threshold_days(&self) -> u32 {
        self.inactivity_threshold_days
    }

    /// Returns the inactivity threshold as a duration.
    #[must_use]
    pub fn inactivity_threshold(&self) -> TimeDelta {
        TimeDelta::days(i64::from(self.inactivity_threshold_days))
    }

    /// Returns the remediation action.
    #[must_use]
    pub fn action_kind(&self) -> ActionKind {
        self.action_kind
    }

    /// Returns whether `account_id` is exempt through the whitelist.
    #[must_use]
    pub fn is_whitelisted(&self, account_id: &AccountId) -> bool {
        self.whitelisted_account_ids.contains(account_id)
    }

    /// Returns the whitelisted account identifiers.
    #[must_use]
    pub fn whitelisted_account_ids(&self) -> &BTreeSet<AccountId> {
        &self.whitelisted_account_ids
    }

    /// Returns whether actions are only previewed.
    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the daily check hour.
    #[must_use]
    pub fn check_hour(&self) -> CheckHour {
        self.check_hour
    }
}

//! Directory account types as seen by the reaper.

use chrono::{DateTime, TimeDelta, Utc};
use idlereap_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Opaque, stable identifier of a directory account.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(NonEmptyString);

impl AccountId {
    /// Creates an account identifier. The value is kept verbatim; only
    /// blank values are rejected.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        NonEmptyString::new(value).map(Self)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for AccountId {
    type Error = idlereap_core::AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.0.into()
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Point-in-time view of one account, read fresh from the directory each run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    id: AccountId,
    display_name: String,
    is_administrator: bool,
    last_activity_at: Option<DateTime<Utc>>,
}

impl AccountSnapshot {
    /// Creates an account snapshot.
    #[must_use]
    pub fn new(
        id: AccountId,
        display_name: impl Into<String>,
        is_administrator: bool,
        last_activity_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            is_administrator,
            last_activity_at,
        }
    }

    /// Returns the account identifier.
    #[must_use]
    pub fn id(&self) -> &AccountId {
        &self.id
    }

    /// Returns the human readable account name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns whether the account holds administrator rights.
    #[must_use]
    pub fn is_administrator(&self) -> bool {
        self.is_administrator
    }

    /// Returns the recorded last activity, if the account was ever active.
    #[must_use]
    pub fn last_activity_at(&self) -> Option<DateTime<Utc>> {
        self.last_activity_at
    }

    /// Returns the instant inactivity is measured from.
    ///
    /// Accounts that were never active are measured from the earliest
    /// representable instant.
    #[must_use]
    pub fn activity_reference(&self) -> DateTime<Utc> {
        self.last_activity_at.unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Returns how long the account has been inactive at `now`.
    ///
    /// Negative when the recorded activity lies in the future.
    #[must_use]
    pub fn inactive_for(&self, now: DateTime<Utc>) -> TimeDelta {
        now.signed_duration_since(self.activity_reference())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn account_id(value: &str) -> AccountId {
        AccountId::new(value).unwrap_or_else(|_| panic!("test"))
    }

    #[test]
    fn account_id_is_kept_verbatim() {
        assert_eq!(account_id("  user-1 ").as_str(), "  user-1 ");
        assert_ne!(account_id(" bob"), account_id("bob"));
    }

    #[test]
    fn blank_account_id_is_rejected() {
        assert!(AccountId::new(" \t").is_err());
    }

    #[test]
    fn account_id_deserialization_is_validated() {
        let parsed: Result<AccountId, _> = serde_json::from_str("\"   \"");
        assert!(parsed.is_err());

        let parsed: Result<AccountId, _> = serde_json::from_str("\"abc\"");
        assert_eq!(parsed.ok(), Some(account_id("abc")));
    }

    #[test]
    fn never_active_account_is_measured_from_earliest_instant() {
        let now = Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_else(|| panic!("test"));
        let account = AccountSnapshot::new(account_id("ghost"), "Ghost", false, None);

        assert_eq!(account.activity_reference(), DateTime::<Utc>::MIN_UTC);
        assert!(account.inactive_for(now) > TimeDelta::days(365 * 100_000));
    }

    #[test]
    fn future_activity_yields_negative_inactivity() {
        let now = Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_else(|| panic!("test"));
        let account = AccountSnapshot::new(
            account_id("skewed"),
            "Skewed Clock",
            false,
            Some(now + TimeDelta::hours(2)),
        );

        assert_eq!(account.inactive_for(now), TimeDelta::hours(-2));
    }
}

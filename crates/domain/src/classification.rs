//! Inactivity classification rules.
//!
//! Exemptions are decided before any duration arithmetic: administrators
//! first, then the whitelist, then the strict threshold comparison.

use chrono::{DateTime, TimeDelta, Utc};

use crate::account::AccountSnapshot;
use crate::policy::PolicyConfiguration;

/// Outcome of evaluating one account against a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountClassification {
    /// Administrators are never actioned.
    Administrator,
    /// Account is listed in the whitelist.
    Whitelisted,
    /// Account was active within the threshold.
    Recent {
        /// Time since last activity.
        inactive_for: TimeDelta,
    },
    /// Account exceeded the threshold and is not exempt.
    Inactive {
        /// Time since last activity.
        inactive_for: TimeDelta,
    },
}

impl AccountClassification {
    /// Returns whether the account should receive the configured action.
    #[must_use]
    pub fn requires_action(&self) -> bool {
        matches!(self, Self::Inactive { .. })
    }
}

/// Classifies one account at instant `now`.
#[must_use]
pub fn classify_account(
    policy: &PolicyConfiguration,
    account: &AccountSnapshot,
    now: DateTime<Utc>,
) -> AccountClassification {
    if account.is_administrator() {
        return AccountClassification::Administrator;
    }

    if policy.is_whitelisted(account.id()) {
        return AccountClassification::Whitelisted;
    }

    let inactive_for = account.inactive_for(now);
    if inactive_for <= policy.inactivity_threshold() {
        return AccountClassification::Recent { inactive_for };
    }

    AccountClassification::Inactive { inactive_for }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use proptest::prelude::*;

    use super::*;
    use crate::account::AccountId;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0)
            .single()
            .unwrap_or_else(|| panic!("test"))
    }

    fn account(id: &str, is_administrator: bool, inactive_days: Option<i64>) -> AccountSnapshot {
        AccountSnapshot::new(
            AccountId::new(id).unwrap_or_else(|_| panic!("test")),
            id,
            is_administrator,
            inactive_days.map(|days| now() - TimeDelta::days(days)),
        )
    }

    #[test]
    fn inactivity_equal_to_threshold_is_recent() {
        let policy = PolicyConfiguration::default().with_inactivity_threshold_days(30);
        let classification = classify_account(&policy, &account("u", false, Some(30)), now());

        assert_eq!(
            classification,
            AccountClassification::Recent {
                inactive_for: TimeDelta::days(30)
            }
        );
    }

    #[test]
    fn inactivity_one_second_past_threshold_is_inactive() {
        let policy = PolicyConfiguration::default().with_inactivity_threshold_days(30);
        let snapshot = AccountSnapshot::new(
            AccountId::new("u").unwrap_or_else(|_| panic!("test")),
            "u",
            false,
            Some(now() - TimeDelta::days(30) - TimeDelta::seconds(1)),
        );

        assert!(classify_account(&policy, &snapshot, now()).requires_action());
    }

    #[test]
    fn never_active_account_is_inactive() {
        let policy = PolicyConfiguration::default();
        assert!(classify_account(&policy, &account("u", false, None), now()).requires_action());
    }

    #[test]
    fn zero_threshold_actions_any_past_activity() {
        let policy = PolicyConfiguration::default().with_inactivity_threshold_days(0);
        let snapshot = AccountSnapshot::new(
            AccountId::new("u").unwrap_or_else(|_| panic!("test")),
            "u",
            false,
            Some(now() - TimeDelta::milliseconds(1)),
        );

        assert!(classify_account(&policy, &snapshot, now()).requires_action());
        assert!(!classify_account(&policy, &account("v", false, Some(0)), now()).requires_action());
    }

    #[test]
    fn administrator_wins_over_whitelist() {
        let policy = PolicyConfiguration::default()
            .with_whitelisted_account(AccountId::new("root").unwrap_or_else(|_| panic!("test")));

        assert_eq!(
            classify_account(&policy, &account("root", true, Some(400)), now()),
            AccountClassification::Administrator
        );
    }

    proptest! {
        #[test]
        fn administrators_are_never_actioned(
            inactive_days in proptest::option::of(-1_000_i64..100_000),
            threshold in 0_u32..10_000,
            whitelisted in any::<bool>(),
        ) {
            let mut policy = PolicyConfiguration::default().with_inactivity_threshold_days(threshold);
            if whitelisted {
                policy = policy.with_whitelisted_account(
                    AccountId::new("admin").unwrap_or_else(|_| panic!("test")),
                );
            }

            let classification = classify_account(&policy, &account("admin", true, inactive_days), now());
            prop_assert_eq!(classification, AccountClassification::Administrator);
        }

        #[test]
        fn whitelisted_accounts_are_never_actioned(
            inactive_days in proptest::option::of(-1_000_i64..100_000),
            threshold in 0_u32..10_000,
        ) {
            let policy = PolicyConfiguration::default()
                .with_inactivity_threshold_days(threshold)
                .with_whitelisted_account(AccountId::new("kept").unwrap_or_else(|_| panic!("test")));

            let classification = classify_account(&policy, &account("kept", false, inactive_days), now());
            prop_assert_eq!(classification, AccountClassification::Whitelisted);
        }

        #[test]
        fn action_iff_strictly_past_threshold(
            inactive_days in -1_000_i64..100_000,
            threshold in 0_u32..10_000,
        ) {
            let policy = PolicyConfiguration::default().with_inactivity_threshold_days(threshold);
            let classification = classify_account(&policy, &account("u", false, Some(inactive_days)), now());

            prop_assert_eq!(classification.requires_action(), inactive_days > i64::from(threshold));
        }
    }
}

//! User directory port consumed by the reaper.

use async_trait::async_trait;

use idlereap_core::AppResult;
use idlereap_domain::{AccountId, AccountSnapshot};

/// One entry returned by a directory enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryEntry {
    /// Account whose metadata was read successfully.
    Account(AccountSnapshot),
    /// Account that exists but whose metadata could not be read.
    Unreadable {
        /// Identifier of the unreadable account.
        account_id: AccountId,
        /// Read error reported by the directory.
        reason: String,
    },
}

impl From<AccountSnapshot> for DirectoryEntry {
    fn from(value: AccountSnapshot) -> Self {
        Self::Account(value)
    }
}

/// Directory that owns account storage and the two mutations the reaper
/// may request.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Lists every account that currently exists, in a stable order.
    ///
    /// An `Err` means the account set is unavailable and fails the run.
    async fn list_accounts(&self) -> AppResult<Vec<DirectoryEntry>>;

    /// Disables one account. Disabling an already disabled account succeeds.
    async fn disable_account(&self, account_id: &AccountId) -> AppResult<()>;

    /// Permanently deletes one account.
    async fn delete_account(&self, account_id: &AccountId) -> AppResult<()>;
}

use async_trait::async_trait;
use idlereap_application::{DirectoryEntry, UserDirectory};
use idlereap_core::{AppError, AppResult};
use idlereap_domain::{AccountId, AccountSnapshot};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
enum StoredMetadata {
    Readable(AccountSnapshot),
    Unreadable(String),
}

#[derive(Debug, Clone)]
struct StoredAccount {
    account_id: AccountId,
    metadata: StoredMetadata,
    is_disabled: bool,
}

/// In-memory user directory adapter for tests and local development.
///
/// Accounts are listed in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    accounts: RwLock<Vec<StoredAccount>>,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces one readable account.
    pub async fn upsert_account(&self, snapshot: AccountSnapshot) {
        let account_id = snapshot.id().clone();
        self.upsert(account_id, StoredMetadata::Readable(snapshot)).await;
    }

    /// Adds or replaces one account whose metadata reads fail with `reason`.
    pub async fn upsert_unreadable_account(
        &self,
        account_id: AccountId,
        reason: impl Into<String>,
    ) {
        self.upsert(account_id, StoredMetadata::Unreadable(reason.into()))
            .await;
    }

    /// Returns whether the account exists.
    pub async fn contains(&self, account_id: &AccountId) -> bool {
        self.accounts
            .read()
            .await
            .iter()
            .any(|account| &account.account_id == account_id)
    }

    /// Returns whether the account exists and is disabled.
    pub async fn is_disabled(&self, account_id: &AccountId) -> bool {
        self.accounts
            .read()
            .await
            .iter()
            .any(|account| &account.account_id == account_id && account.is_disabled)
    }

    async fn upsert(&self, account_id: AccountId, metadata: StoredMetadata) {
        let mut accounts = self.accounts.write().await;
        if let Some(existing) = accounts
            .iter_mut()
            .find(|account| account.account_id == account_id)
        {
            existing.metadata = metadata;
            return;
        }

        accounts.push(StoredAccount {
            account_id,
            metadata,
            is_disabled: false,
        });
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn list_accounts(&self) -> AppResult<Vec<DirectoryEntry>> {
        Ok(self
            .accounts
            .read()
            .await
            .iter()
            .map(|account| match &account.metadata {
                StoredMetadata::Readable(snapshot) => DirectoryEntry::Account(snapshot.clone()),
                StoredMetadata::Unreadable(reason) => DirectoryEntry::Unreadable {
                    account_id: account.account_id.clone(),
                    reason: reason.clone(),
                },
            })
            .collect())
    }

    async fn disable_account(&self, account_id: &AccountId) -> AppResult<()> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .iter_mut()
            .find(|account| &account.account_id == account_id)
            .ok_or_else(|| AppError::NotFound(format!("account '{account_id}' not found")))?;

        account.is_disabled = true;
        Ok(())
    }

    async fn delete_account(&self, account_id: &AccountId) -> AppResult<()> {
        let mut accounts = self.accounts.write().await;
        let position = accounts
            .iter()
            .position(|account| &account.account_id == account_id)
            .ok_or_else(|| AppError::NotFound(format!("account '{account_id}' not found")))?;

        accounts.remove(position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, Utc};

    use super::*;

    fn account_id(value: &str) -> AccountId {
        AccountId::new(value).unwrap_or_else(|_| panic!("test"))
    }

    fn snapshot(id: &str) -> AccountSnapshot {
        AccountSnapshot::new(
            account_id(id),
            id,
            false,
            Some(Utc::now() - TimeDelta::days(1)),
        )
    }

    #[tokio::test]
    async fn lists_accounts_in_insertion_order() {
        let directory = InMemoryUserDirectory::new();
        let first = snapshot("b");
        let second = snapshot("a");
        directory.upsert_account(first.clone()).await;
        directory.upsert_account(second.clone()).await;
        directory
            .upsert_unreadable_account(account_id("c"), "corrupt")
            .await;

        let entries = directory
            .list_accounts()
            .await
            .unwrap_or_else(|error| panic!("list should succeed: {error}"));

        assert_eq!(
            entries,
            vec![
                DirectoryEntry::Account(first),
                DirectoryEntry::Account(second),
                DirectoryEntry::Unreadable {
                    account_id: account_id("c"),
                    reason: "corrupt".to_owned(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn upsert_replaces_existing_account_in_place() {
        let directory = InMemoryUserDirectory::new();
        directory.upsert_account(snapshot("a")).await;
        directory.upsert_account(snapshot("b")).await;
        let replacement = AccountSnapshot::new(account_id("a"), "Renamed", true, None);
        directory.upsert_account(replacement.clone()).await;

        let entries = directory
            .list_accounts()
            .await
            .unwrap_or_else(|error| panic!("list should succeed: {error}"));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], DirectoryEntry::Account(replacement));
    }

    #[tokio::test]
    async fn disable_is_idempotent() {
        let directory = InMemoryUserDirectory::new();
        directory.upsert_account(snapshot("a")).await;

        assert!(directory.disable_account(&account_id("a")).await.is_ok());
        assert!(directory.disable_account(&account_id("a")).await.is_ok());
        assert!(directory.is_disabled(&account_id("a")).await);
        assert!(directory.contains(&account_id("a")).await);
    }

    #[tokio::test]
    async fn delete_removes_account_and_second_delete_is_not_found() {
        let directory = InMemoryUserDirectory::new();
        directory.upsert_account(snapshot("a")).await;
        directory.upsert_account(snapshot("b")).await;

        assert!(directory.delete_account(&account_id("a")).await.is_ok());
        assert!(!directory.contains(&account_id("a")).await);
        assert!(directory.contains(&account_id("b")).await);
        assert!(matches!(
            directory.delete_account(&account_id("a")).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn disabling_unknown_account_is_not_found() {
        let directory = InMemoryUserDirectory::new();

        assert!(matches!(
            directory.disable_account(&account_id("missing")).await,
            Err(AppError::NotFound(_))
        ));
    }
}

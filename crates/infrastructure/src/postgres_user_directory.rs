//! PostgreSQL-backed user directory.
//!
//! Reads the host-owned `directory_accounts` table. A row whose
//! `is_administrator` flag is NULL cannot be classified safely and is
//! reported as unreadable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::warn;

use idlereap_application::{DirectoryEntry, UserDirectory};
use idlereap_core::{AppError, AppResult};
use idlereap_domain::{AccountId, AccountSnapshot};

/// PostgreSQL implementation of the user directory port.
#[derive(Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    /// Creates a directory with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DirectoryAccountRow {
    id: String,
    display_name: String,
    is_administrator: Option<bool>,
    last_activity_at: Option<DateTime<Utc>>,
}

impl DirectoryAccountRow {
    fn into_entry(self) -> Option<DirectoryEntry> {
        let account_id = match AccountId::new(self.id.as_str()) {
            Ok(account_id) => account_id,
            Err(error) => {
                warn!(
                    raw_id = %self.id,
                    error = %error,
                    "ignoring directory row without a usable account id"
                );
                return None;
            }
        };

        let Some(is_administrator) = self.is_administrator else {
            return Some(DirectoryEntry::Unreadable {
                account_id,
                reason: "administrator flag is not set".to_owned(),
            });
        };

        Some(DirectoryEntry::Account(AccountSnapshot::new(
            account_id,
            self.display_name,
            is_administrator,
            self.last_activity_at,
        )))
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn list_accounts(&self) -> AppResult<Vec<DirectoryEntry>> {
        let rows = sqlx::query_as::<_, DirectoryAccountRow>(
            r#"
            SELECT id, display_name, is_administrator, last_activity_at
            FROM directory_accounts
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Unavailable(format!("failed to list directory accounts: {error}"))
        })?;

        Ok(rows
            .into_iter()
            .filter_map(DirectoryAccountRow::into_entry)
            .collect())
    }

    async fn disable_account(&self, account_id: &AccountId) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE directory_accounts
            SET is_disabled = TRUE, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(account_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to disable account: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "account '{account_id}' not found"
            )));
        }

        Ok(())
    }

    async fn delete_account(&self, account_id: &AccountId) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM directory_accounts
            WHERE id = $1
            "#,
        )
        .bind(account_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete account: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "account '{account_id}' not found"
            )));
        }

        Ok(())
    }
}

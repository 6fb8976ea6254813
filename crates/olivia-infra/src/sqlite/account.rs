//! SQLite account repository implementation.
//!
//! Implements `AccountRepository` from `olivia-core`: account records plus
//! the single-row `auth_session` table that remembers who is signed in.

use chrono::{DateTime, Utc};
use sqlx::Row;

use olivia_core::identity::repository::AccountRepository;
use olivia_types::error::RepositoryError;
use olivia_types::identity::{Account, IdentityId};

use super::pool::DatabasePool;
use super::turn::format_datetime;

/// SQLite-backed implementation of `AccountRepository`.
pub struct SqliteAccountRepository {
    pool: DatabasePool,
}

impl SqliteAccountRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct AccountRow {
    id: String,
    email: String,
    password_hash: String,
    onboarding_complete: bool,
    created_at: String,
}

impl AccountRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            onboarding_complete: row.try_get("onboarding_complete")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_account(self) -> Result<Account, RepositoryError> {
        Ok(Account {
            id: parse_identity(&self.id)?,
            email: self.email,
            password_hash: self.password_hash,
            onboarding_complete: self.onboarding_complete,
            created_at: DateTime::parse_from_rfc3339(&self.created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))?,
        })
    }
}

pub(crate) fn parse_identity(s: &str) -> Result<IdentityId, RepositoryError> {
    s.parse::<IdentityId>()
        .map_err(|e| RepositoryError::Query(format!("invalid identity id: {e}")))
}

fn unique_violation(e: sqlx::Error, email: &str) -> RepositoryError {
    match e {
        sqlx::Error::Database(db_err) if db_err.message().contains("UNIQUE") => {
            RepositoryError::Conflict(format!("email '{email}' is already registered"))
        }
        other => RepositoryError::Query(other.to_string()),
    }
}

fn require_row(rows_affected: u64) -> Result<(), RepositoryError> {
    if rows_affected == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

impl SqliteAccountRepository {
    async fn fetch_one_where(
        &self,
        clause: &str,
        value: String,
    ) -> Result<Option<Account>, RepositoryError> {
        let sql = format!(
            "SELECT id, email, password_hash, onboarding_complete, created_at FROM accounts WHERE {clause} = ?"
        );
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let r = AccountRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(r.into_account()?))
            }
            None => Ok(None),
        }
    }
}

impl AccountRepository for SqliteAccountRepository {
    async fn create_account(&self, account: &Account) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO accounts (id, email, password_hash, onboarding_complete, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(account.id.to_string())
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.onboarding_complete)
        .bind(format_datetime(&account.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| unique_violation(e, &account.email))?;
        Ok(())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError> {
        self.fetch_one_where("email", email.to_string()).await
    }

    async fn get_by_id(&self, id: &IdentityId) -> Result<Option<Account>, RepositoryError> {
        self.fetch_one_where("id", id.to_string()).await
    }

    async fn update_email(&self, id: &IdentityId, email: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE accounts SET email = ? WHERE id = ?")
            .bind(email)
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| unique_violation(e, email))?;
        require_row(result.rows_affected())
    }

    async fn update_password_hash(&self, id: &IdentityId, password_hash: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE accounts SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        require_row(result.rows_affected())
    }

    async fn set_onboarding_complete(&self, id: &IdentityId, complete: bool) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE accounts SET onboarding_complete = ? WHERE id = ?")
            .bind(complete)
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        require_row(result.rows_affected())
    }

    async fn delete_account(&self, id: &IdentityId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        require_row(result.rows_affected())
    }

    async fn signed_in(&self) -> Result<Option<IdentityId>, RepositoryError> {
        let row = sqlx::query("SELECT identity_id FROM auth_session WHERE id = 1")
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let id: Option<String> = row
            .try_get("identity_id")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        id.as_deref().map(parse_identity).transpose()
    }

    async fn set_signed_in(&self, id: Option<&IdentityId>) -> Result<(), RepositoryError> {
        let signed_in_at = id.map(|_| format_datetime(&Utc::now()));
        sqlx::query(
            r#"INSERT INTO auth_session (id, identity_id, signed_in_at) VALUES (1, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                   identity_id = excluded.identity_id,
                   signed_in_at = excluded.signed_in_at"#,
        )
        .bind(id.map(|id| id.to_string()))
        .bind(signed_in_at)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::sqlite::pool::test_pool;

    pub(crate) fn make_account(email: &str) -> Account {
        Account {
            id: IdentityId::new(),
            email: email.to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            onboarding_complete: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (pool, _dir) = test_pool::open().await;
        let repo = SqliteAccountRepository::new(pool);
        let account = make_account("sam@example.com");
        repo.create_account(&account).await.unwrap();

        let by_email = repo.get_by_email("sam@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, account.id);
        assert_eq!(by_email.password_hash, account.password_hash);
        assert!(!by_email.onboarding_complete);

        let by_id = repo.get_by_id(&account.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "sam@example.com");
        assert_eq!(by_id.created_at, account.created_at);

        assert!(repo.get_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflict() {
        let (pool, _dir) = test_pool::open().await;
        let repo = SqliteAccountRepository::new(pool);
        repo.create_account(&make_account("sam@example.com")).await.unwrap();

        let err = repo
            .create_account(&make_account("sam@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_updates() {
        let (pool, _dir) = test_pool::open().await;
        let repo = SqliteAccountRepository::new(pool);
        let account = make_account("sam@example.com");
        let other = make_account("alex@example.com");
        repo.create_account(&account).await.unwrap();
        repo.create_account(&other).await.unwrap();

        repo.update_email(&account.id, "samuel@example.com").await.unwrap();
        repo.update_password_hash(&account.id, "new-hash").await.unwrap();
        repo.set_onboarding_complete(&account.id, true).await.unwrap();

        let updated = repo.get_by_id(&account.id).await.unwrap().unwrap();
        assert_eq!(updated.email, "samuel@example.com");
        assert_eq!(updated.password_hash, "new-hash");
        assert!(updated.onboarding_complete);

        let err = repo.update_email(&account.id, "alex@example.com").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let err = repo.update_password_hash(&IdentityId::new(), "x").await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_signed_in_roundtrip() {
        let (pool, _dir) = test_pool::open().await;
        let repo = SqliteAccountRepository::new(pool);
        let account = make_account("sam@example.com");
        repo.create_account(&account).await.unwrap();

        assert_eq!(repo.signed_in().await.unwrap(), None);
        repo.set_signed_in(Some(&account.id)).await.unwrap();
        assert_eq!(repo.signed_in().await.unwrap(), Some(account.id));
        repo.set_signed_in(None).await.unwrap();
        assert_eq!(repo.signed_in().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_clears_sign_in() {
        let (pool, _dir) = test_pool::open().await;
        let repo = SqliteAccountRepository::new(pool);
        let account = make_account("sam@example.com");
        repo.create_account(&account).await.unwrap();
        repo.set_signed_in(Some(&account.id)).await.unwrap();

        repo.delete_account(&account.id).await.unwrap();
        assert!(repo.get_by_id(&account.id).await.unwrap().is_none());
        assert_eq!(repo.signed_in().await.unwrap(), None);

        let err = repo.delete_account(&account.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}

//! SQLite profile repository implementation.

use sqlx::Row;

use olivia_core::identity::repository::ProfileRepository;
use olivia_types::error::RepositoryError;
use olivia_types::identity::{IdentityId, UserProfile};

use super::account::parse_identity;
use super::pool::DatabasePool;

/// SQLite-backed implementation of `ProfileRepository`.
pub struct SqliteProfileRepository {
    pool: DatabasePool,
}

impl SqliteProfileRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl ProfileRepository for SqliteProfileRepository {
    async fn get_profile(&self, id: &IdentityId) -> Result<Option<UserProfile>, RepositoryError> {
        let row = sqlx::query(
            "SELECT identity_id, name, profile_image_path FROM profiles WHERE identity_id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let identity_id: String = row
            .try_get("identity_id")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let name: String = row
            .try_get("name")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let profile_image_path: Option<String> = row
            .try_get("profile_image_path")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(Some(UserProfile {
            identity_id: parse_identity(&identity_id)?,
            name,
            profile_image_path,
        }))
    }

    async fn save_profile(&self, profile: &UserProfile) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO profiles (identity_id, name, profile_image_path) VALUES (?, ?, ?)
               ON CONFLICT(identity_id) DO UPDATE SET
                   name = excluded.name,
                   profile_image_path = excluded.profile_image_path"#,
        )
        .bind(profile.identity_id.to_string())
        .bind(&profile.name)
        .bind(&profile.profile_image_path)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.message().contains("FOREIGN KEY") => {
                RepositoryError::NotFound
            }
            other => RepositoryError::Query(other.to_string()),
        })?;
        Ok(())
    }

    async fn delete_profile(&self, id: &IdentityId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM profiles WHERE identity_id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }
}

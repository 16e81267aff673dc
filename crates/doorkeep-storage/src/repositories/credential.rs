#![allow(async_fn_in_trait)]

use doorkeep_core::Credential;
use sqlx::SqlitePool;

use crate::error::{StorageError, StorageResult};
use crate::models::CredentialRow;

/// Repository trait for the `credentials` table
///
/// This trait uses native async trait methods (Edition 2024 feature),
/// eliminating the need for the async-trait crate.
pub trait CredentialRepository: Send + Sync {
    /// Rows whose badge code equals `badge_code` exactly, oldest first,
    /// at most `limit` of them.
    async fn find_by_code(&self, badge_code: &str, limit: i64) -> StorageResult<Vec<CredentialRow>>;

    /// Insert a credential, returning its row id
    async fn create(&self, credential: &Credential) -> StorageResult<i64>;

    /// Total number of credential rows
    async fn count(&self) -> StorageResult<i64>;
}

/// SQLite implementation of CredentialRepository
#[derive(Debug, Clone)]
pub struct SqliteCredentialRepository {
    pool: SqlitePool,
}

impl SqliteCredentialRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl CredentialRepository for SqliteCredentialRepository {
    async fn find_by_code(&self, badge_code: &str, limit: i64) -> StorageResult<Vec<CredentialRow>> {
        let rows = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, badge_code, identity_id, display_name
            FROM credentials
            WHERE badge_code = ?
            ORDER BY id
            LIMIT ?
            "#,
        )
        .bind(badge_code)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn create(&self, credential: &Credential) -> StorageResult<i64> {
        if credential.badge_code.is_empty() {
            return Err(StorageError::Validation(
                "badge code must not be empty".to_string(),
            ));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO credentials (badge_code, identity_id, display_name)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&credential.badge_code)
        .bind(credential.identity_id)
        .bind(&credential.display_name)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn count(&self) -> StorageResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM credentials")
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }
}

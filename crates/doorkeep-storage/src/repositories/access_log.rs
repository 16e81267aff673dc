#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::StorageResult;

/// Repository trait for the `access_log` audit table
///
/// Entries are append-only; there is no update or delete.
pub trait AccessLogRepository: Send + Sync {
    /// Append an entry, returning its row id
    async fn log_access(&self, identity_id: i64, accessed_at: DateTime<Utc>) -> StorageResult<i64>;

    /// Total number of entries
    async fn count(&self) -> StorageResult<i64>;
}

/// SQLite implementation of AccessLogRepository
#[derive(Debug, Clone)]
pub struct SqliteAccessLogRepository {
    pool: SqlitePool,
}

impl SqliteAccessLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl AccessLogRepository for SqliteAccessLogRepository {
    async fn log_access(&self, identity_id: i64, accessed_at: DateTime<Utc>) -> StorageResult<i64> {
        let result = sqlx::query("INSERT INTO access_log (identity_id, accessed_at) VALUES (?, ?)")
            .bind(identity_id)
            .bind(accessed_at)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    async fn count(&self) -> StorageResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM access_log")
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Database;
    use chrono::Duration;

    async fn setup() -> (Database, SqliteAccessLogRepository) {
        let db = Database::in_memory().await.unwrap();
        let repo = SqliteAccessLogRepository::new(db.pool().clone());
        (db, repo)
    }

    #[tokio::test]
    async fn test_log_access_appends_rows() {
        let (db, repo) = setup().await;
        let at = Utc::now() - Duration::minutes(5);

        let first = repo.log_access(42, at).await.unwrap();
        let second = repo.log_access(7, Utc::now()).await.unwrap();

        assert!(second > first);
        assert_eq!(repo.count().await.unwrap(), 2);

        let stored: (i64, DateTime<Utc>) =
            sqlx::query_as("SELECT identity_id, accessed_at FROM access_log WHERE id = ?")
                .bind(first)
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(stored.0, 42);
        assert_eq!(stored.1.timestamp(), at.timestamp());
    }

    #[tokio::test]
    async fn test_repeated_access_is_not_merged() {
        let (_db, repo) = setup().await;
        let at = Utc::now();
        for _ in 0..3 {
            repo.log_access(1, at).await.unwrap();
        }

        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_log_after_close_fails() {
        let (db, repo) = setup().await;
        db.close().await;

        assert!(repo.log_access(1, Utc::now()).await.is_err());
    }
}

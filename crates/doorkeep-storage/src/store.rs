//! The credential store seam used by the resolver.

#![allow(async_fn_in_trait)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use doorkeep_core::Credential;
use doorkeep_core::constants::DUPLICATE_LOOKUP_LIMIT;
use tracing::info;

use crate::connection::Database;
use crate::error::StorageResult;
use crate::repositories::{
    AccessLogRepository, CredentialRepository, SqliteAccessLogRepository,
    SqliteCredentialRepository,
};

/// Lookup and audit operations the terminal needs from a credential store.
///
/// Implementations are expected to return the matching rows in a stable
/// order and need not return more than [`DUPLICATE_LOOKUP_LIMIT`] of them:
/// the caller only has to tell "one" from "more than one".
pub trait CredentialStore: Send + Sync {
    /// Credentials whose badge code equals `badge_code` exactly.
    async fn find_by_code(&self, badge_code: &str) -> StorageResult<Vec<Credential>>;

    /// Record that `identity_id` was let in at `accessed_at`.
    async fn log_access(&self, identity_id: i64, accessed_at: DateTime<Utc>) -> StorageResult<()>;
}

/// [`CredentialStore`] backed by the SQLite repositories.
///
/// The schema is brought up to date before the first query that reaches the
/// database. A store that was unreachable at startup is migrated on the
/// first swipe after it comes back.
#[derive(Debug, Clone)]
pub struct SqliteCredentialStore {
    db: Database,
    credentials: SqliteCredentialRepository,
    access_log: SqliteAccessLogRepository,
    schema_ready: Arc<AtomicBool>,
}

impl SqliteCredentialStore {
    pub fn new(db: &Database) -> Self {
        Self {
            db: db.clone(),
            credentials: SqliteCredentialRepository::new(db.pool().clone()),
            access_log: SqliteAccessLogRepository::new(db.pool().clone()),
            schema_ready: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Run the migrations unless an earlier call already succeeded.
    ///
    /// # Errors
    ///
    /// Returns the connection or migration error; the next call tries again.
    pub async fn ensure_schema(&self) -> StorageResult<()> {
        if self.schema_ready.load(Ordering::Acquire) {
            return Ok(());
        }
        self.db.migrate().await?;
        if !self.schema_ready.swap(true, Ordering::AcqRel) {
            info!("credential store schema ready");
        }
        Ok(())
    }

    pub fn schema_ready(&self) -> bool {
        self.schema_ready.load(Ordering::Acquire)
    }

    pub fn credentials(&self) -> &SqliteCredentialRepository {
        &self.credentials
    }

    pub fn access_log(&self) -> &SqliteAccessLogRepository {
        &self.access_log
    }
}

impl CredentialStore for SqliteCredentialStore {
    async fn find_by_code(&self, badge_code: &str) -> StorageResult<Vec<Credential>> {
        self.ensure_schema().await?;
        let rows = self
            .credentials
            .find_by_code(badge_code, DUPLICATE_LOOKUP_LIMIT)
            .await?;
        Ok(rows.into_iter().map(Credential::from).collect())
    }

    async fn log_access(&self, identity_id: i64, accessed_at: DateTime<Utc>) -> StorageResult<()> {
        self.ensure_schema().await?;
        self.access_log.log_access(identity_id, accessed_at).await?;
        Ok(())
    }
}

//! SQLite connection pool for the credential store.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use doorkeep_core::constants::DEFAULT_STORE_TIMEOUT_MS;
use sqlx::ConnectOptions;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};

/// Database connection configuration for SQLite
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub database_path: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of idle connections to maintain
    pub min_connections: u32,

    /// Maximum lifetime of a connection before it's recycled
    pub max_lifetime: Duration,

    /// Timeout for acquiring a connection from the pool
    pub acquire_timeout: Duration,

    /// Whether to create the database file if it doesn't exist
    pub create_if_missing: bool,

    /// Whether to run migrations on connection
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        // A terminal serves one swipe at a time: a lookup plus its audit write.
        Self {
            database_path: "doorkeep.db".to_string(),
            max_connections: 2,
            min_connections: 0,
            max_lifetime: Duration::from_secs(1800),
            acquire_timeout: Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS),
            create_if_missing: true,
            auto_migrate: true,
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration with the given path
    pub fn new(database_path: impl Into<String>) -> Self {
        Self {
            database_path: database_path.into(),
            ..Default::default()
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Set how long a caller may wait for a pooled connection
    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    pub fn auto_migrate(mut self, migrate: bool) -> Self {
        self.auto_migrate = migrate;
        self
    }
}

/// Database connection pool wrapper
///
/// Connections are acquired per query, so a failed acquisition (file locked,
/// disk gone) only fails that query; the next swipe tries again.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the database file and build the pool.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use doorkeep_storage::connection::{Database, DatabaseConfig};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = DatabaseConfig::new("/var/lib/doorkeep/doorkeep.db").auto_migrate(true);
    /// let db = Database::new(config).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new(config: DatabaseConfig) -> StorageResult<Self> {
        let pool = pool_options(&config)
            .connect_with(connect_options(&config)?)
            .await?;

        info!(path = %config.database_path, "credential store opened");
        let db = Self { pool };

        if config.auto_migrate {
            db.migrate().await?;
        }

        Ok(db)
    }

    /// Build the pool without touching the database file.
    ///
    /// Connections are opened on first use, so an unreachable store shows
    /// up as a failed query later instead of an error here. Migrations are
    /// not run; call [`migrate`](Self::migrate) separately.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Configuration`] if the path is unusable.
    pub fn connect_lazy(config: &DatabaseConfig) -> StorageResult<Self> {
        let pool = pool_options(config).connect_lazy_with(connect_options(config)?);
        Ok(Self { pool })
    }

    /// Create an in-memory database (primarily for testing)
    ///
    /// ```
    /// use doorkeep_storage::connection::Database;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let db = Database::in_memory().await?;
    /// db.health_check().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn in_memory() -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        // Every connection to :memory: is a separate database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Run the embedded migrations from `migrations/`.
    ///
    /// The migration files are embedded at compile time by `sqlx::migrate!`.
    ///
    /// # Errors
    ///
    /// Returns error if a migration fails to apply.
    pub async fn migrate(&self) -> StorageResult<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        debug!("credential store migrations applied");
        Ok(())
    }

    /// Get a reference to the underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the pool. Every later query fails with a pool-closed error.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Check if the database connection is healthy
    pub async fn health_check(&self) -> StorageResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn connect_options(config: &DatabaseConfig) -> StorageResult<SqliteConnectOptions> {
    if let Some(parent) = Path::new(&config.database_path).parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            StorageError::Configuration(format!("Failed to create database directory: {e}"))
        })?;
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", config.database_path))
        .map_err(|e| StorageError::Configuration(format!("Invalid database path: {e}")))?
        .create_if_missing(config.create_if_missing)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(config.acquire_timeout)
        .disable_statement_logging();

    Ok(options)
}

fn pool_options(config: &DatabaseConfig) -> SqlitePoolOptions {
    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .max_lifetime(Some(config.max_lifetime))
        .acquire_timeout(config.acquire_timeout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_builder() {
        let config = DatabaseConfig::new("test.db")
            .max_connections(5)
            .min_connections(1)
            .create_if_missing(false)
            .auto_migrate(false)
            .acquire_timeout(Duration::from_millis(250));

        assert_eq!(config.database_path, "test.db");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.acquire_timeout, Duration::from_millis(250));
        assert!(!config.create_if_missing);
        assert!(!config.auto_migrate);
    }

    #[test]
    fn test_database_config_defaults() {
        let config = DatabaseConfig::default();

        assert_eq!(config.database_path, "doorkeep.db");
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.min_connections, 0);
        assert_eq!(config.acquire_timeout, Duration::from_secs(5));
        assert!(config.create_if_missing);
        assert!(config.auto_migrate);
    }

    #[tokio::test]
    async fn test_file_database_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("doorkeep.db");

        let db = Database::new(DatabaseConfig::new(path.to_string_lossy()))
            .await
            .unwrap();

        db.health_check().await.unwrap();
        assert!(path.exists());
        db.close().await;
    }

    #[tokio::test]
    async fn test_lazy_pool_connects_on_first_query() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lazy.db");
        let config = DatabaseConfig::new(path.to_string_lossy());

        let db = Database::connect_lazy(&config).unwrap();
        assert!(!path.exists());

        db.migrate().await.unwrap();
        db.health_check().await.unwrap();
        assert!(path.exists());
        db.close().await;
    }

    #[tokio::test]
    async fn test_closed_pool_fails_health_check() {
        let db = Database::in_memory().await.unwrap();
        db.close().await;

        assert!(matches!(
            db.health_check().await,
            Err(StorageError::Database(_))
        ));
    }
}

use thiserror::Error;

/// Storage-specific error types for the credential store.
///
/// These never reach the display. The resolver folds them into the core
/// taxonomy (see the `From` impl below) and logs the detail.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database connection or query execution failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration execution failed
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Data validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A missing credential is not a storage error; every storage failure is a
/// store fault to the terminal.
impl From<StorageError> for doorkeep_core::Error {
    fn from(e: StorageError) -> Self {
        doorkeep_core::Error::store_unavailable(e.to_string())
    }
}

/// Specialized result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

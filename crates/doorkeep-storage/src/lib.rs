//! Credential store for the doorkeep terminal.
//!
//! This crate provides SQLite-backed persistence for badge credentials and
//! the access audit trail, and the [`Resolver`] that turns a normalized badge
//! code into a credential.
//!
//! # Architecture
//!
//! - [`Database`] - Connection pool manager with automatic migrations
//! - [`CredentialRepository`], [`AccessLogRepository`] - Table access traits
//! - [`CredentialStore`] - The two operations the terminal needs, with a
//!   SQLite implementation on top of the repositories
//! - [`Resolver`] - Timeout-bounded lookup, duplicate detection and
//!   best-effort audit
//!
//! # Examples
//!
//! ```no_run
//! use doorkeep_core::NormalizedCode;
//! use doorkeep_storage::{Database, DatabaseConfig, Resolver, SqliteCredentialStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new(DatabaseConfig::new("doorkeep.db")).await?;
//! let resolver = Resolver::new(SqliteCredentialStore::new(&db));
//!
//! match resolver.resolve(&NormalizedCode::new("u123")).await {
//!     Ok(credential) => println!("Hello {}", credential.display_name),
//!     Err(e) if e.is_denial() => println!("denied"),
//!     Err(e) => println!("store fault: {e}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # SQL Injection Prevention
//!
//! Badge codes come straight from a reader and are never trusted. All
//! queries bind them as parameters; nothing is spliced into SQL text.

pub mod connection;
pub mod error;
pub mod models;
pub mod repositories;
pub mod resolver;
pub mod store;

pub use connection::{Database, DatabaseConfig};
pub use error::{StorageError, StorageResult};
pub use models::CredentialRow;
pub use repositories::{
    AccessLogRepository, CredentialRepository, SqliteAccessLogRepository,
    SqliteCredentialRepository,
};
pub use resolver::Resolver;
pub use store::{CredentialStore, SqliteCredentialStore};

pub mod access_log;
pub mod credential;

pub use access_log::{AccessLogRepository, SqliteAccessLogRepository};
pub use credential::{CredentialRepository, SqliteCredentialRepository};

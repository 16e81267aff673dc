//! Authorization resolver.
//!
//! Maps a normalized badge code to at most one credential. Every store call
//! is bounded by a timeout so a hung database cannot freeze the terminal; a
//! lookup timeout is reported the same way as an unreachable store.
//!
//! Resolving never writes. The caller records the access with
//! [`Resolver::record_access`] once the door has been driven.

use std::time::Duration;

use chrono::Utc;
use doorkeep_core::constants::{DEFAULT_AUDIT_TIMEOUT_MS, DEFAULT_STORE_TIMEOUT_MS};
use doorkeep_core::{Credential, Error, NormalizedCode, Result};
use tracing::{debug, info, warn};

use crate::store::CredentialStore;

/// Resolves badge codes against a [`CredentialStore`].
///
/// # Examples
///
/// ```
/// use doorkeep_core::{Credential, NormalizedCode};
/// use doorkeep_storage::{Database, Resolver, SqliteCredentialStore};
/// use doorkeep_storage::repositories::CredentialRepository;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let db = Database::in_memory().await?;
/// let store = SqliteCredentialStore::new(&db);
/// store.credentials().create(&Credential::new("u123", 42, "Alice")).await?;
///
/// let resolver = Resolver::new(store);
/// let credential = resolver.resolve(&NormalizedCode::new("u123")).await?;
/// assert_eq!(credential.display_name, "Alice");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Resolver<S: CredentialStore> {
    store: S,
    query_timeout: Duration,
    audit_timeout: Duration,
}

impl<S: CredentialStore> Resolver<S> {
    pub fn new(store: S) -> Self {
        Self::with_timeout(store, Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS))
    }

    pub fn with_timeout(store: S, query_timeout: Duration) -> Self {
        Self {
            store,
            query_timeout,
            audit_timeout: Duration::from_millis(DEFAULT_AUDIT_TIMEOUT_MS),
        }
    }

    pub fn with_audit_timeout(mut self, audit_timeout: Duration) -> Self {
        self.audit_timeout = audit_timeout;
        self
    }

    /// Look up the credential carrying `code`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if no credential carries this code.
    /// - [`Error::StoreUnavailable`] if the store fails or does not answer
    ///   within the query timeout.
    pub async fn resolve(&self, code: &NormalizedCode) -> Result<Credential> {
        let lookup = tokio::time::timeout(self.query_timeout, self.store.find_by_code(code.as_str()));

        let matches = match lookup.await {
            Ok(Ok(matches)) => matches,
            Ok(Err(e)) => {
                warn!(error = %e, "credential lookup failed");
                return Err(Error::store_unavailable(e.to_string()));
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.query_timeout.as_millis() as u64,
                    "credential lookup timed out"
                );
                return Err(Error::store_unavailable(format!(
                    "lookup timed out after {}ms",
                    self.query_timeout.as_millis()
                )));
            }
        };

        let mut matches = matches.into_iter();
        let Some(credential) = matches.next() else {
            info!("no credential for presented code");
            return Err(Error::NotFound);
        };

        if let Some(duplicate) = matches.next() {
            warn!(
                identity_id = credential.identity_id,
                duplicate_identity_id = duplicate.identity_id,
                "badge code is assigned more than once, using first match"
            );
        }

        info!(identity_id = credential.identity_id, "credential resolved");
        Ok(credential)
    }

    /// Append an access log entry for `credential`.
    ///
    /// Bounded by the audit timeout. Failures are logged and never reported
    /// to the caller.
    pub async fn record_access(&self, credential: &Credential) {
        let write = self.store.log_access(credential.identity_id, Utc::now());

        match tokio::time::timeout(self.audit_timeout, write).await {
            Ok(Ok(())) => debug!(identity_id = credential.identity_id, "access recorded"),
            Ok(Err(e)) => warn!(
                identity_id = credential.identity_id,
                error = %e,
                "audit write failed"
            ),
            Err(_) => warn!(identity_id = credential.identity_id, "audit write timed out"),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

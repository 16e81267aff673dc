use doorkeep_core::Credential;
use serde::{Deserialize, Serialize};

/// One row of the `credentials` table.
///
/// The core only ever sees [`Credential`]; the surrogate `id` stays in the
/// storage layer, where it orders duplicate rows deterministically.
///
/// # Examples
///
/// ```
/// use doorkeep_storage::models::CredentialRow;
///
/// let row = CredentialRow {
///     id: 1,
///     badge_code: "u123".to_string(),
///     identity_id: 42,
///     display_name: "Alice".to_string(),
/// };
///
/// let credential = row.into_credential();
/// assert_eq!(credential.display_name, "Alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CredentialRow {
    /// Auto-increment primary key
    pub id: i64,

    /// Normalized badge code as produced by the swipe normalizer
    pub badge_code: String,

    /// Identity of the badge holder, referenced by the audit trail
    pub identity_id: i64,

    /// Name shown in the greeting
    pub display_name: String,
}

impl CredentialRow {
    pub fn into_credential(self) -> Credential {
        Credential {
            badge_code: self.badge_code,
            identity_id: self.identity_id,
            display_name: self.display_name,
        }
    }
}

impl From<CredentialRow> for Credential {
    fn from(row: CredentialRow) -> Self {
        row.into_credential()
    }
}

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the swipe-to-unlock pipeline.
///
/// The first four variants form the runtime taxonomy the session reacts to.
/// None of them terminate the process; see [`Error::is_fatal`].
#[derive(Error, Debug)]
pub enum Error {
    // Swipe errors
    #[error("Malformed swipe code: {reason}")]
    MalformedCode { reason: String },

    #[error("No credential matches the presented code")]
    NotFound,

    // Store errors
    #[error("Credential store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    // Lock link errors
    #[error("Lock link error: {reason}")]
    Link { reason: String },

    // Session errors
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Invalid display line {line} (max {max})")]
    InvalidLine { line: usize, max: usize },

    // Startup errors
    #[error("Required asset not found: {}", path.display())]
    MissingAsset { path: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedCode {
            reason: reason.into(),
        }
    }

    pub fn store_unavailable(reason: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            reason: reason.into(),
        }
    }

    pub fn link(reason: impl Into<String>) -> Self {
        Self::Link {
            reason: reason.into(),
        }
    }

    /// Whether the swipe should be treated as a plain denial
    /// (bad badge shape or unknown badge).
    #[must_use]
    pub fn is_denial(&self) -> bool {
        matches!(self, Self::MalformedCode { .. } | Self::NotFound)
    }

    /// Whether the error belongs to the operational class shown as a
    /// link/store fault on the display.
    #[must_use]
    pub fn is_operational(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. } | Self::Link { .. })
    }

    /// Only startup conditions may end the process.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingAsset { .. } | Self::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        assert!(Error::malformed("short").is_denial());
        assert!(Error::NotFound.is_denial());
        assert!(!Error::NotFound.is_operational());

        assert!(Error::store_unavailable("refused").is_operational());
        assert!(Error::link("closed").is_operational());
        assert!(!Error::link("closed").is_denial());
    }

    #[test]
    fn test_only_startup_errors_are_fatal() {
        assert!(
            Error::MissingAsset {
                path: PathBuf::from("bg.png")
            }
            .is_fatal()
        );
        assert!(Error::Config("bad".into()).is_fatal());
        assert!(!Error::NotFound.is_fatal());
        assert!(!Error::store_unavailable("down").is_fatal());
        assert!(!Error::link("down").is_fatal());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::malformed("too short").to_string(),
            "Malformed swipe code: too short"
        );
        assert_eq!(
            Error::MissingAsset {
                path: PathBuf::from("/srv/bg.png")
            }
            .to_string(),
            "Required asset not found: /srv/bg.png"
        );
    }
}

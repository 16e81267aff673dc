//! Error types for the reader and the lock link.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Failures of the badge reader or the lock controller link.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// The device went away, or was never opened.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// No serial port could be found or enumerated.
    #[error("No port available: {message}")]
    PortUnavailable { message: String },

    /// The port exists but could not be opened.
    #[error("Failed to open {message}")]
    OpenFailed { message: String },

    /// The controller did not accept a command.
    #[error("Write failed: {message}")]
    WriteFailed { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl HardwareError {
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    pub fn port_unavailable(message: impl Into<String>) -> Self {
        Self::PortUnavailable {
            message: message.into(),
        }
    }

    pub fn open_failed(message: impl Into<String>) -> Self {
        Self::OpenFailed {
            message: message.into(),
        }
    }

    pub fn write_failed(message: impl Into<String>) -> Self {
        Self::WriteFailed {
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

/// Every hardware failure reaches the session as a lock link error.
impl From<HardwareError> for doorkeep_core::Error {
    fn from(error: HardwareError) -> Self {
        doorkeep_core::Error::link(error.to_string())
    }
}

//! Enum wrappers for hardware device dispatch.
//!
//! Native `async fn` in traits (RPITIT) are not object-safe, so
//! `Box<dyn LockLink>` is not available. The enum below gives the binary one
//! concrete link type whether it drives the real controller or runs against
//! the mock on a bench.
//!
//! # Examples
//!
//! ```
//! use doorkeep_hardware::devices::AnyLockLink;
//! use doorkeep_hardware::mock::MockLink;
//!
//! let (link, _handle) = MockLink::new();
//! let any_link = AnyLockLink::Mock(link);
//! ```

use doorkeep_core::ActuationCommand;

use crate::mock::MockLink;
#[cfg(feature = "hardware-serial")]
use crate::serial::SerialLink;
use crate::traits::LockLink;
use crate::{DeviceInfo, Result};

/// Enum wrapper for lock link dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyLockLink {
    /// Serial lock controller.
    #[cfg(feature = "hardware-serial")]
    Serial(SerialLink),

    /// Mock link for development and dry runs.
    Mock(MockLink),
}

impl LockLink for AnyLockLink {
    async fn connect(&mut self, channel: &str) -> Result<()> {
        match self {
            #[cfg(feature = "hardware-serial")]
            Self::Serial(link) => link.connect(channel).await,
            Self::Mock(link) => link.connect(channel).await,
        }
    }

    async fn send(&mut self, command: &ActuationCommand) -> Result<()> {
        match self {
            #[cfg(feature = "hardware-serial")]
            Self::Serial(link) => link.send(command).await,
            Self::Mock(link) => link.send(command).await,
        }
    }

    fn is_open(&self) -> bool {
        match self {
            #[cfg(feature = "hardware-serial")]
            Self::Serial(link) => link.is_open(),
            Self::Mock(link) => link.is_open(),
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            #[cfg(feature = "hardware-serial")]
            Self::Serial(link) => link.get_info().await,
            Self::Mock(link) => link.get_info().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_dispatch() {
        let (link, handle) = MockLink::new();
        let mut any_link = AnyLockLink::Mock(link);

        any_link.connect("bench").await.unwrap();
        any_link.send(&ActuationCommand::unlock()).await.unwrap();

        assert!(any_link.is_open());
        assert_eq!(handle.sent_count(), 1);
        assert_eq!(
            any_link.get_info().await.unwrap().channel.as_deref(),
            Some("bench")
        );
    }
}

//! Door actuator.
//!
//! Owns the lock link for the life of the process. The link is connected
//! once at startup; if that fails the actuator stays disconnected and every
//! unlock is refused with a link error, which lets the terminal keep running
//! as a display-only observation station.

use std::time::Duration;

use doorkeep_core::constants::DEFAULT_LINK_WRITE_TIMEOUT_MS;
use doorkeep_core::{ActuationCommand, Error, Result};
use tracing::{error, info, warn};

use crate::traits::LockLink;

/// Actuator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActuatorConfig {
    /// Command written on every unlock.
    pub command: ActuationCommand,

    /// Upper bound for connecting and for each command write.
    pub write_timeout: Duration,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            command: ActuationCommand::unlock(),
            write_timeout: Duration::from_millis(DEFAULT_LINK_WRITE_TIMEOUT_MS),
        }
    }
}

/// Issues unlock commands to the lock controller and tracks link health.
///
/// # Examples
///
/// ```
/// use doorkeep_hardware::actuator::{Actuator, ActuatorConfig};
/// use doorkeep_hardware::mock::MockLink;
///
/// #[tokio::main]
/// async fn main() -> doorkeep_core::Result<()> {
///     let (link, handle) = MockLink::new();
///     let mut actuator = Actuator::new(link, ActuatorConfig::default());
///
///     actuator.connect("mock0").await?;
///     actuator.unlock().await?;
///
///     assert_eq!(handle.sent_count(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Actuator<L: LockLink> {
    link: L,
    config: ActuatorConfig,
    healthy: bool,
}

impl<L: LockLink> Actuator<L> {
    /// Wrap a link. The actuator starts disconnected.
    pub fn new(link: L, config: ActuatorConfig) -> Self {
        Self {
            link,
            config,
            healthy: false,
        }
    }

    /// Open the link on `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Link`] if the channel cannot be opened within the
    /// write timeout. The actuator is left disconnected.
    pub async fn connect(&mut self, channel: &str) -> Result<()> {
        self.healthy = false;

        match tokio::time::timeout(self.config.write_timeout, self.link.connect(channel)).await {
            Ok(Ok(())) => {
                self.healthy = true;
                info!(channel, "lock link connected");
                Ok(())
            }
            Ok(Err(e)) => {
                error!(channel, error = %e, "lock link connection failed");
                Err(e.into())
            }
            Err(_) => {
                error!(channel, "lock link connection timed out");
                Err(Error::link(format!(
                    "connect to {channel} timed out after {}ms",
                    self.config.write_timeout.as_millis()
                )))
            }
        }
    }

    /// Send the unlock command.
    ///
    /// Returns once the transport accepted the write. A failed or timed-out
    /// write marks the link unhealthy; later calls fail fast until
    /// [`connect`](Self::connect) succeeds again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Link`] if the link is down, the write fails, or the
    /// write does not complete within the configured timeout.
    pub async fn unlock(&mut self) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::link("lock link not connected"));
        }

        let write = self.link.send(&self.config.command);
        match tokio::time::timeout(self.config.write_timeout, write).await {
            Ok(Ok(())) => {
                info!("unlock command sent");
                Ok(())
            }
            Ok(Err(e)) => {
                self.healthy = false;
                warn!(error = %e, "unlock write failed");
                Err(e.into())
            }
            Err(_) => {
                self.healthy = false;
                warn!(
                    timeout_ms = self.config.write_timeout.as_millis() as u64,
                    "unlock write timed out"
                );
                Err(Error::link(format!(
                    "write timed out after {}ms",
                    self.config.write_timeout.as_millis()
                )))
            }
        }
    }

    /// Current link health. No side effects.
    pub fn is_connected(&self) -> bool {
        self.healthy && self.link.is_open()
    }

    pub fn link(&self) -> &L {
        &self.link
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockLink;

    fn actuator() -> (Actuator<MockLink>, crate::mock::MockLinkHandle) {
        let (link, handle) = MockLink::new();
        (Actuator::new(link, ActuatorConfig::default()), handle)
    }

    #[tokio::test]
    async fn test_unlock_sends_command_once() {
        let (mut actuator, handle) = actuator();
        actuator.connect("mock0").await.unwrap();

        actuator.unlock().await.unwrap();

        assert_eq!(handle.sent_commands(), vec![b"u\r".to_vec()]);
        assert!(actuator.is_connected());
    }

    #[tokio::test]
    async fn test_starts_disconnected() {
        let (mut actuator, handle) = actuator();

        assert!(!actuator.is_connected());
        let result = actuator.unlock().await;
        assert!(matches!(result, Err(Error::Link { .. })));
        assert_eq!(handle.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_connect_leaves_actuator_degraded() {
        let (mut actuator, handle) = actuator();
        handle.refuse_connections(true);

        assert!(actuator.connect("mock0").await.is_err());
        assert!(!actuator.is_connected());
        assert!(actuator.unlock().await.is_err());
        assert_eq!(handle.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_write_failure_marks_link_unhealthy() {
        let (mut actuator, handle) = actuator();
        actuator.connect("mock0").await.unwrap();
        handle.fail_writes(true);

        assert!(actuator.unlock().await.is_err());
        assert!(!actuator.is_connected());

        // Fails fast even after the controller recovers.
        handle.fail_writes(false);
        assert!(actuator.unlock().await.is_err());
        assert_eq!(handle.sent_count(), 0);

        actuator.connect("mock0").await.unwrap();
        actuator.unlock().await.unwrap();
        assert_eq!(handle.sent_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_write_times_out() {
        let (link, handle) = MockLink::new();
        let config = ActuatorConfig {
            write_timeout: Duration::from_millis(200),
            ..ActuatorConfig::default()
        };
        let mut actuator = Actuator::new(link, config);
        actuator.connect("mock0").await.unwrap();
        handle.set_write_delay(Duration::from_secs(10));

        let result = actuator.unlock().await;

        assert!(matches!(result, Err(Error::Link { .. })));
        assert!(!actuator.is_connected());
        assert_eq!(handle.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_unplugged_link_reports_disconnected() {
        let (mut actuator, handle) = actuator();
        actuator.connect("mock0").await.unwrap();
        handle.unplug();

        assert!(!actuator.is_connected());
    }
}

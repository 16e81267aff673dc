//! Serial lock controller link.
//!
//! The door controller is a microcontroller on a USB-serial adapter that
//! listens at 9600 baud, 8N1, and releases the strike when it receives the
//! unlock command.
//!
//! Opens and writes go through [`tokio::task::spawn_blocking`] because
//! `serialport` is a blocking API. The port carries its own OS-level write
//! timeout; callers add an async timeout on top (see
//! [`Actuator`](crate::actuator::Actuator)). When that outer timeout fires
//! the port stays with the abandoned blocking task and the link reports
//! itself closed.

use std::io::Write;
use std::time::Duration;

use doorkeep_core::ActuationCommand;
use doorkeep_core::constants::{DEFAULT_BAUD_RATE, DEFAULT_LINK_WRITE_TIMEOUT_MS};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, info, warn};

use crate::{HardwareError, Result, traits::LockLink, types::DeviceInfo};

/// List the serial channels present on this machine, in system order.
///
/// # Errors
///
/// Returns an error if the platform port enumeration fails.
pub fn available_channels() -> Result<Vec<String>> {
    let ports = serialport::available_ports()
        .map_err(|e| HardwareError::port_unavailable(format!("port enumeration failed: {e}")))?;
    Ok(ports.into_iter().map(|port| port.port_name).collect())
}

/// Lock controller reached over a serial port.
pub struct SerialLink {
    baud_rate: u32,
    write_timeout: Duration,
    channel: Option<String>,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialLink {
    /// Create a closed link with the given line speed and write timeout.
    pub fn new(baud_rate: u32, write_timeout: Duration) -> Self {
        Self {
            baud_rate,
            write_timeout,
            channel: None,
            port: None,
        }
    }

    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }
}

impl Default for SerialLink {
    fn default() -> Self {
        Self::new(
            DEFAULT_BAUD_RATE,
            Duration::from_millis(DEFAULT_LINK_WRITE_TIMEOUT_MS),
        )
    }
}

impl std::fmt::Debug for SerialLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialLink")
            .field("baud_rate", &self.baud_rate)
            .field("channel", &self.channel)
            .field("open", &self.port.is_some())
            .finish()
    }
}

impl LockLink for SerialLink {
    async fn connect(&mut self, channel: &str) -> Result<()> {
        self.port = None;
        self.channel = Some(channel.to_string());

        let builder = serialport::new(channel, self.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(self.write_timeout);

        // Opening a USB-serial adapter can block in the driver.
        let port = tokio::task::spawn_blocking(move || builder.open())
            .await
            .map_err(|e| HardwareError::other(format!("serial open task failed: {e}")))?
            .map_err(|e| HardwareError::open_failed(format!("{channel}: {e}")))?;

        info!(channel, baud = self.baud_rate, "serial link open");
        self.port = Some(port);
        Ok(())
    }

    async fn send(&mut self, command: &ActuationCommand) -> Result<()> {
        let channel = self.channel.clone().unwrap_or_default();
        let mut port = self
            .port
            .take()
            .ok_or_else(|| HardwareError::disconnected(channel.clone()))?;
        let payload = command.as_bytes().to_vec();

        let (port, outcome) = tokio::task::spawn_blocking(move || {
            let outcome = port.write_all(&payload).and_then(|()| port.flush());
            (port, outcome)
        })
        .await
        .map_err(|e| HardwareError::other(format!("serial writer task failed: {e}")))?;

        match outcome {
            Ok(()) => {
                debug!(channel = %channel, bytes = command.as_bytes().len(), "command written");
                self.port = Some(port);
                Ok(())
            }
            Err(e) => {
                warn!(channel = %channel, error = %e, "serial write failed, closing link");
                Err(HardwareError::write_failed(format!("{channel}: {e}")))
            }
        }
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        let info = DeviceInfo::new("Door Controller", format!("Serial {} 8N1", self.baud_rate));
        Ok(match &self.channel {
            Some(channel) => info.with_channel(channel.clone()),
            None => info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_line_settings() {
        let link = SerialLink::default();
        assert_eq!(link.baud_rate(), 9600);
        assert!(!link.is_open());
    }

    #[tokio::test]
    async fn test_connect_to_missing_port_fails() {
        let mut link = SerialLink::default();
        let result = link.connect("/dev/doorkeep-no-such-port").await;

        assert!(matches!(
            result,
            Err(HardwareError::OpenFailed { .. })
        ));
        assert!(!link.is_open());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_open_runs_off_the_runtime_thread() {
        let mut link = SerialLink::default();
        let ticker = tokio::spawn(async {});

        // The runtime has a single worker; the spawned task can only finish
        // if connect gives the thread back while the port is being opened.
        let result = link.connect("/dev/doorkeep-no-such-port").await;

        assert!(ticker.is_finished());
        assert!(matches!(result, Err(HardwareError::OpenFailed { .. })));
        assert_eq!(
            link.get_info().await.unwrap().channel.as_deref(),
            Some("/dev/doorkeep-no-such-port")
        );
    }

    #[tokio::test]
    async fn test_send_without_port_is_disconnected() {
        let mut link = SerialLink::default();
        let result = link.send(&ActuationCommand::unlock()).await;

        assert!(matches!(result, Err(HardwareError::Disconnected { .. })));
    }

    #[tokio::test]
    async fn test_info_before_connect() {
        let link = SerialLink::default();
        let info = link.get_info().await.unwrap();
        assert_eq!(info.model, "Serial 9600 8N1");
        assert!(info.channel.is_none());
    }
}

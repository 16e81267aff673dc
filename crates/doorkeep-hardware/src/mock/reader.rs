//! Mock badge reader implementation for testing and development.
//!
//! This module provides a simulated keyboard-emulating badge reader that can
//! be driven programmatically for testing without physical hardware.

use doorkeep_core::{SwipeEvent, TerminalInput};
use tokio::sync::mpsc;

use crate::{Result, traits::SwipeSource, types::DeviceInfo};

/// Mock badge reader for testing and development.
///
/// Inputs are received through an internal channel. Tests send them with a
/// [`MockSwipeReaderHandle`].
///
/// # Examples
///
/// ```
/// use doorkeep_hardware::mock::MockSwipeReader;
/// use doorkeep_hardware::traits::SwipeSource;
/// use doorkeep_core::{SwipeEvent, TerminalInput};
///
/// #[tokio::main]
/// async fn main() -> doorkeep_hardware::Result<()> {
///     let (mut reader, handle) = MockSwipeReader::new();
///
///     handle.send_swipe("u1").await?;
///
///     assert_eq!(reader.read_input().await?, TerminalInput::Swipe(SwipeEvent::key('u')));
///     assert_eq!(reader.read_input().await?, TerminalInput::Swipe(SwipeEvent::key('1')));
///     assert_eq!(reader.read_input().await?, TerminalInput::Swipe(SwipeEvent::terminator()));
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockSwipeReader {
    /// Channel receiver for simulated input
    input_rx: mpsc::Receiver<TerminalInput>,

    /// Device name
    name: String,
}

impl MockSwipeReader {
    /// Create a new mock reader with the default name.
    ///
    /// Returns a tuple of (MockSwipeReader, MockSwipeReaderHandle) where the
    /// handle is used to simulate input.
    pub fn new() -> (Self, MockSwipeReaderHandle) {
        Self::with_name("Mock Badge Reader".to_string())
    }

    /// Create a new mock reader with a custom name.
    pub fn with_name(name: String) -> (Self, MockSwipeReaderHandle) {
        let (input_tx, input_rx) = mpsc::channel(256);

        let reader = Self { input_rx, name };
        let handle = MockSwipeReaderHandle { input_tx };

        (reader, handle)
    }
}

impl Default for MockSwipeReader {
    fn default() -> Self {
        Self::new().0
    }
}

impl SwipeSource for MockSwipeReader {
    async fn read_input(&mut self) -> Result<TerminalInput> {
        self.input_rx
            .recv()
            .await
            .ok_or_else(|| crate::HardwareError::disconnected("Reader input channel closed"))
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "Mock Badge Reader v1.0"))
    }
}

/// Handle for driving a mock badge reader.
///
/// It can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockSwipeReaderHandle {
    /// Channel sender for simulated input
    input_tx: mpsc::Sender<TerminalInput>,
}

impl MockSwipeReaderHandle {
    /// Send a single input.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader has been dropped.
    pub async fn send_input(&self, input: TerminalInput) -> Result<()> {
        self.input_tx
            .send(input)
            .await
            .map_err(|_| crate::HardwareError::disconnected("Reader input channel closed"))
    }

    /// Send the characters of `code` as individual keys, without terminator.
    pub async fn send_keys(&self, code: &str) -> Result<()> {
        for character in code.chars() {
            self.send_input(SwipeEvent::key(character).into()).await?;
        }
        Ok(())
    }

    /// Send a complete swipe: every character followed by the terminator.
    pub async fn send_swipe(&self, code: &str) -> Result<()> {
        self.send_keys(code).await?;
        self.send_input(SwipeEvent::terminator().into()).await
    }

    /// Send the operator reset signal.
    pub async fn send_reset(&self) -> Result<()> {
        self.send_input(TerminalInput::Reset).await
    }

    /// Send the operator quit signal.
    pub async fn send_quit(&self) -> Result<()> {
        self.send_input(TerminalInput::Quit).await
    }
}

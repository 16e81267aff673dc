//! Hardware device trait definitions.
//!
//! This module defines the contract between the terminal session and its two
//! peripherals: the badge reader (a keyboard-emulating device delivering one
//! key per character) and the lock controller reached over a serial link.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use doorkeep_core::{ActuationCommand, TerminalInput};

use crate::error::Result;
use crate::types::DeviceInfo;

/// Source of terminal input: swipe keystrokes plus the operator's reset and
/// quit signals.
///
/// Implementations translate their raw events (scan codes, key events,
/// reader API callbacks) into [`TerminalInput`]. Control keys that are not
/// badge content must be mapped to `Reset`/`Quit` or dropped here, never
/// delivered as swipe characters.
///
/// # Object Safety and Dynamic Dispatch
///
/// **NOTE**: This trait is NOT object-safe because `async fn` methods return
/// `impl Future`. Use generic type parameters:
///
/// ```no_run
/// use doorkeep_hardware::traits::SwipeSource;
/// use doorkeep_hardware::error::Result;
/// use doorkeep_core::TerminalInput;
///
/// async fn next_key<S: SwipeSource>(source: &mut S) -> Result<Option<char>> {
///     match source.read_input().await? {
///         TerminalInput::Swipe(event) if !event.is_terminator() => Ok(Some(event.character())),
///         _ => Ok(None),
///     }
/// }
/// ```
pub trait SwipeSource: Send {
    /// Read the next input.
    ///
    /// Waits asynchronously until input is available.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is disconnected or the underlying
    /// event stream fails.
    async fn read_input(&mut self) -> Result<TerminalInput>;

    /// Get device information.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// Physical link to the lock controller.
///
/// Line settings (baud rate, parity) are fixed by the implementation when it
/// is constructed; the session never negotiates them.
///
/// For dynamic dispatch use the enum wrapper
/// [`AnyLockLink`](crate::devices::AnyLockLink).
///
/// # Examples
///
/// ```
/// use doorkeep_hardware::traits::LockLink;
/// use doorkeep_hardware::mock::MockLink;
/// use doorkeep_core::ActuationCommand;
///
/// #[tokio::main]
/// async fn main() -> doorkeep_hardware::Result<()> {
///     let (mut link, handle) = MockLink::new();
///     link.connect("mock0").await?;
///     link.send(&ActuationCommand::unlock()).await?;
///
///     assert_eq!(handle.sent_commands(), vec![b"u\r".to_vec()]);
///     Ok(())
/// }
/// ```
pub trait LockLink: Send {
    /// Open the link on the given channel (e.g., a serial port path).
    ///
    /// # Errors
    ///
    /// Returns an error if the channel does not exist or cannot be opened.
    async fn connect(&mut self, channel: &str) -> Result<()>;

    /// Write one command, returning once the transport accepted it.
    ///
    /// Acceptance by the transport does not mean the lock moved.
    ///
    /// # Errors
    ///
    /// Returns an error if the link is closed or the write fails.
    async fn send(&mut self, command: &ActuationCommand) -> Result<()>;

    /// Whether the link is currently open. No side effects.
    fn is_open(&self) -> bool;

    /// Get device information.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

//! Hardware device abstraction layer for the doorkeep terminal.
//!
//! This crate provides trait-based abstractions for the two peripherals of a
//! badge-swipe door terminal, and the actuator that drives the lock:
//!
//! - [`SwipeSource`]: the badge reader, delivering one key per character of
//!   the badge code plus the operator's reset and quit signals.
//! - [`LockLink`]: the link to the lock controller (serial in production).
//! - [`Actuator`]: owns a link, sends the unlock command with a bounded
//!   write, and tracks whether the link is healthy.
//!
//! # Design Philosophy
//!
//! - **Async-first**: All I/O operations are asynchronous using native `async fn`
//!   in traits (Rust 1.90 + Edition 2024 RPITIT).
//! - **Enum dispatch**: [`AnyLockLink`] replaces `Box<dyn LockLink>`.
//! - **Error-aware**: All operations return `Result<T>` with detailed error information.
//!
//! # Example
//!
//! ```
//! use doorkeep_hardware::{Actuator, ActuatorConfig};
//! use doorkeep_hardware::mock::MockLink;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (link, handle) = MockLink::new();
//!     handle.refuse_connections(true);
//!
//!     let mut actuator = Actuator::new(link, ActuatorConfig::default());
//!     assert!(actuator.connect("/dev/ttyACM0").await.is_err());
//!
//!     // Degraded: the terminal keeps running, unlocks are refused.
//!     assert!(actuator.unlock().await.is_err());
//! }
//! ```
//!
//! # Mock Implementations
//!
//! [`mock::MockSwipeReader`] and [`mock::MockLink`] come with handles that
//! let tests script input and inspect what was written to the lock.
//!
//! [`SwipeSource`]: traits::SwipeSource
//! [`LockLink`]: traits::LockLink
//! [`Actuator`]: actuator::Actuator
//! [`AnyLockLink`]: devices::AnyLockLink

pub mod actuator;
pub mod devices;
pub mod error;
pub mod mock;
#[cfg(feature = "hardware-serial")]
pub mod serial;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use actuator::{Actuator, ActuatorConfig};
pub use devices::AnyLockLink;
pub use error::{HardwareError, Result};
pub use traits::{LockLink, SwipeSource};
pub use types::DeviceInfo;

//! Mock device implementations for testing and development.
//!
//! This module provides simulated device implementations that can be controlled
//! programmatically without requiring physical hardware.

pub mod link;
pub mod reader;

// Re-export commonly used types
pub use link::{MockLink, MockLinkHandle, SENT_HISTORY_LIMIT};
pub use reader::{MockSwipeReader, MockSwipeReaderHandle};

//! Mock lock controller link for testing and development.
//!
//! Records every command written to it and can be told to refuse
//! connections, fail writes or stall, so the session's degraded paths can be
//! exercised without a controller on the bench.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use doorkeep_core::ActuationCommand;

use crate::{HardwareError, Result, traits::LockLink, types::DeviceInfo};

/// Number of most recent command payloads a [`MockLink`] keeps.
///
/// A dry-run terminal drives the mock for days; older payloads are dropped
/// while [`MockLinkHandle::sent_count`] keeps counting.
pub const SENT_HISTORY_LIMIT: usize = 256;

#[derive(Debug, Default)]
struct MockLinkState {
    channel: Option<String>,
    open: bool,
    sent: VecDeque<Vec<u8>>,
    sent_total: usize,
    refuse_connect: bool,
    fail_writes: bool,
    write_delay: Option<Duration>,
}

/// Mock lock link.
///
/// # Examples
///
/// ```
/// use doorkeep_hardware::mock::MockLink;
/// use doorkeep_hardware::traits::LockLink;
///
/// #[tokio::main]
/// async fn main() {
///     let (mut link, handle) = MockLink::new();
///     handle.refuse_connections(true);
///
///     assert!(link.connect("mock0").await.is_err());
///     assert!(!link.is_open());
/// }
/// ```
#[derive(Debug)]
pub struct MockLink {
    state: Arc<Mutex<MockLinkState>>,
    name: String,
}

impl MockLink {
    /// Create a new, closed mock link and its control handle.
    pub fn new() -> (Self, MockLinkHandle) {
        let state = Arc::new(Mutex::new(MockLinkState::default()));
        let link = Self {
            state: Arc::clone(&state),
            name: "Mock Link".to_string(),
        };
        (link, MockLinkHandle { state })
    }

    fn state(&self) -> MutexGuard<'_, MockLinkState> {
        lock(&self.state)
    }
}

impl Default for MockLink {
    fn default() -> Self {
        Self::new().0
    }
}

fn lock(state: &Mutex<MockLinkState>) -> MutexGuard<'_, MockLinkState> {
    // A panicking test thread must not hide the recorded commands.
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl LockLink for MockLink {
    async fn connect(&mut self, channel: &str) -> Result<()> {
        let mut state = self.state();
        if state.refuse_connect {
            state.open = false;
            return Err(HardwareError::open_failed(format!(
                "{channel}: connection refused"
            )));
        }
        state.channel = Some(channel.to_string());
        state.open = true;
        Ok(())
    }

    async fn send(&mut self, command: &ActuationCommand) -> Result<()> {
        let delay = self.state().write_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state();
        if !state.open {
            return Err(HardwareError::disconnected(&self.name));
        }
        if state.fail_writes {
            return Err(HardwareError::write_failed("write rejected"));
        }
        if state.sent.len() == SENT_HISTORY_LIMIT {
            state.sent.pop_front();
        }
        state.sent.push_back(command.as_bytes().to_vec());
        state.sent_total += 1;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.state().open
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        let info = DeviceInfo::new(self.name.clone(), "Mock Link v1.0");
        Ok(match self.state().channel.clone() {
            Some(channel) => info.with_channel(channel),
            None => info,
        })
    }
}

/// Handle for inspecting and steering a [`MockLink`].
#[derive(Debug, Clone)]
pub struct MockLinkHandle {
    state: Arc<Mutex<MockLinkState>>,
}

impl MockLinkHandle {
    /// The most recent accepted payloads, oldest first, at most
    /// [`SENT_HISTORY_LIMIT`] of them.
    pub fn sent_commands(&self) -> Vec<Vec<u8>> {
        lock(&self.state).sent.iter().cloned().collect()
    }

    /// Number of commands accepted since the link was created.
    pub fn sent_count(&self) -> usize {
        lock(&self.state).sent_total
    }

    /// Make subsequent `connect` calls fail.
    pub fn refuse_connections(&self, refuse: bool) {
        lock(&self.state).refuse_connect = refuse;
    }

    /// Make subsequent writes fail while the link stays open.
    pub fn fail_writes(&self, fail: bool) {
        lock(&self.state).fail_writes = fail;
    }

    /// Delay every write by `delay` before it is accepted.
    pub fn set_write_delay(&self, delay: Duration) {
        lock(&self.state).write_delay = Some(delay);
    }

    /// Simulate the controller being unplugged.
    pub fn unplug(&self) {
        lock(&self.state).open = false;
    }

    /// Channel the link was last connected to.
    pub fn channel(&self) -> Option<String> {
        lock(&self.state).channel.clone()
    }
}

//! Terminal state machine.
//!
//! Tracks the [`TerminalState`] of the door terminal, enforces the legal
//! transitions, keeps a bounded transition history for diagnostics and holds
//! the dwell deadline of the feedback states.
//!
//! # Valid Transitions
//!
//! - Idle → Capturing → Resolving → Granted / Denied / LinkError
//! - Granted → LinkError (unlock failed)
//! - Granted / Denied / LinkError → Idle (dwell elapsed)
//! - any → Idle via [`StateMachine::reset`]
//!
//! Time is read from [`tokio::time::Instant`], so dwells follow a paused
//! test clock.
//!
//! # Examples
//!
//! ```
//! use doorkeep_core::TerminalState;
//! use doorkeep_terminal::StateMachine;
//!
//! let mut machine = StateMachine::new();
//! assert_eq!(machine.current_state(), &TerminalState::Idle);
//!
//! machine.transition_to(TerminalState::Capturing).unwrap();
//! assert!(machine.transition_to(TerminalState::Granted).is_err());
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use doorkeep_core::{Error, Result, TerminalState};
use tokio::time::Instant;
use tracing::debug;

/// Default number of transitions kept in history.
///
/// A complete swipe is three or four transitions, so this covers the last
/// few dozen swipes.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// A single state transition with timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    pub from: TerminalState,
    pub to: TerminalState,
    pub timestamp: Instant,
}

impl StateTransition {
    pub fn new(from: TerminalState, to: TerminalState) -> Self {
        Self {
            from,
            to,
            timestamp: Instant::now(),
        }
    }
}

/// State machine for the swipe-to-unlock flow.
///
/// Not thread-safe; the session owns it exclusively.
#[derive(Debug)]
pub struct StateMachine {
    current_state: TerminalState,
    history: VecDeque<StateTransition>,
    history_limit: usize,

    /// When the current feedback state should give way to `Idle`.
    deadline: Option<Instant>,
}

impl StateMachine {
    /// Create a new state machine in the Idle state.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> StateMachineBuilder {
        StateMachineBuilder::default()
    }

    pub fn current_state(&self) -> &TerminalState {
        &self.current_state
    }

    /// Arm the dwell deadline for the current state, `dwell` from now.
    ///
    /// ```
    /// use std::time::Duration;
    /// use doorkeep_terminal::StateMachine;
    ///
    /// let mut machine = StateMachine::new();
    /// machine.set_dwell(Duration::from_secs(5));
    /// assert!(!machine.dwell_elapsed());
    /// assert!(machine.deadline().is_some());
    /// ```
    pub fn set_dwell(&mut self, dwell: Duration) {
        self.deadline = Some(Instant::now() + dwell);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether a dwell is armed and has run out.
    pub fn dwell_elapsed(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Transitions ordered from oldest to newest.
    pub fn history(&self) -> &VecDeque<StateTransition> {
        &self.history
    }

    /// Transition to `new_state` if the move is legal.
    ///
    /// Entering a new state clears any armed dwell.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStateTransition`] if the transition is not
    /// allowed from the current state. The machine is left unchanged.
    pub fn transition_to(&mut self, new_state: TerminalState) -> Result<StateTransition> {
        if !self.current_state.can_transition_to(&new_state) {
            return Err(Error::InvalidStateTransition {
                from: self.current_state.to_string(),
                to: new_state.to_string(),
            });
        }

        let transition = StateTransition::new(self.current_state, new_state);
        self.perform_state_change(new_state, transition.clone());
        Ok(transition)
    }

    /// Force the machine back to `Idle` from any state.
    pub fn reset(&mut self) -> StateTransition {
        let transition = StateTransition::new(self.current_state, TerminalState::Idle);
        self.perform_state_change(TerminalState::Idle, transition.clone());
        transition
    }

    fn perform_state_change(&mut self, new_state: TerminalState, transition: StateTransition) {
        debug!(from = %transition.from, to = %transition.to, "state transition");
        self.current_state = new_state;
        self.deadline = None;
        self.add_to_history(transition);
    }

    fn add_to_history(&mut self, transition: StateTransition) {
        if self.history_limit == 0 {
            return;
        }
        self.history.push_back(transition);
        while self.history.len() > self.history_limit {
            self.history.pop_front();
        }
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`StateMachine`].
///
/// ```
/// use doorkeep_terminal::StateMachine;
///
/// let machine = StateMachine::builder().with_history_limit(8).build();
/// assert!(machine.history().is_empty());
/// ```
#[derive(Debug)]
pub struct StateMachineBuilder {
    history_limit: usize,
}

impl StateMachineBuilder {
    /// Cap the number of transitions kept in history.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn build(self) -> StateMachine {
        StateMachine {
            current_state: TerminalState::Idle,
            history: VecDeque::with_capacity(self.history_limit.min(DEFAULT_HISTORY_LIMIT)),
            history_limit: self.history_limit,
            deadline: None,
        }
    }
}

impl Default for StateMachineBuilder {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::DEFAULT_UNLOCK_COMMAND;

/// One key-input unit delivered by the badge reader.
///
/// A swipe arrives as a burst of key events followed by a single terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwipeEvent {
    character: char,
    terminator: bool,
}

impl SwipeEvent {
    /// A content key carrying one character of the badge code.
    #[must_use]
    pub fn key(character: char) -> Self {
        Self {
            character,
            terminator: false,
        }
    }

    /// The end-of-swipe marker.
    #[must_use]
    pub fn terminator() -> Self {
        Self {
            character: '\r',
            terminator: true,
        }
    }

    #[must_use]
    pub fn character(&self) -> char {
        self.character
    }

    #[must_use]
    pub fn is_terminator(&self) -> bool {
        self.terminator
    }
}

/// Input delivered by the input source to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalInput {
    /// A key belonging to a badge swipe.
    Swipe(SwipeEvent),
    /// Operator reset: back to the welcome screen immediately.
    Reset,
    /// Operator quit: end the process.
    Quit,
}

impl From<SwipeEvent> for TerminalInput {
    fn from(event: SwipeEvent) -> Self {
        Self::Swipe(event)
    }
}

/// Characters collected between two terminators, as typed by the reader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawCode(String);

impl RawCode {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters (not bytes).
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RawCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Badge code in the form stored in the credential table.
///
/// Deliberately not convertible back into a [`RawCode`], so the site
/// transform cannot be applied twice to the same swipe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedCode(String);

impl NormalizedCode {
    /// Wrap a code that is already in store form.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for NormalizedCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A badge holder as recorded in the credential store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub badge_code: String,
    pub identity_id: i64,
    pub display_name: String,
}

impl Credential {
    pub fn new(
        badge_code: impl Into<String>,
        identity_id: i64,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            badge_code: badge_code.into(),
            identity_id,
            display_name: display_name.into(),
        }
    }
}

/// Fixed instruction written to the lock controller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActuationCommand(Vec<u8>);

impl ActuationCommand {
    #[must_use]
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self(payload.into())
    }

    /// The controller's unlock command (`u\r`).
    #[must_use]
    pub fn unlock() -> Self {
        Self(DEFAULT_UNLOCK_COMMAND.to_vec())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Default for ActuationCommand {
    fn default() -> Self {
        Self::unlock()
    }
}

/// Top-level state of the door terminal.
///
/// `Idle` is both the initial state and the only resting state; every other
/// state either advances or times out back to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalState {
    /// Welcome screen, waiting for a swipe.
    Idle,
    /// Keys of a swipe are arriving.
    Capturing,
    /// Looking the code up in the credential store.
    Resolving,
    /// Door unlocked, greeting on screen.
    Granted,
    /// Unknown or malformed badge.
    Denied,
    /// Store or lock link fault, operational message on screen.
    LinkError,
}

impl fmt::Display for TerminalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            TerminalState::Idle => "Idle",
            TerminalState::Capturing => "Capturing",
            TerminalState::Resolving => "Resolving",
            TerminalState::Granted => "Granted",
            TerminalState::Denied => "Denied",
            TerminalState::LinkError => "LinkError",
        };
        write!(f, "{}", state_str)
    }
}

impl TerminalState {
    /// Check if the sequencer may move from this state to `target`.
    ///
    /// Operator resets bypass this table; they are always allowed.
    ///
    /// # Examples
    ///
    /// ```
    /// use doorkeep_core::TerminalState;
    ///
    /// assert!(TerminalState::Idle.can_transition_to(&TerminalState::Capturing));
    /// assert!(!TerminalState::Idle.can_transition_to(&TerminalState::Granted));
    /// ```
    pub fn can_transition_to(&self, target: &TerminalState) -> bool {
        matches!(
            (self, target),
            (TerminalState::Idle, TerminalState::Capturing)
                | (TerminalState::Capturing, TerminalState::Resolving)
                | (
                    TerminalState::Resolving,
                    TerminalState::Granted | TerminalState::Denied | TerminalState::LinkError
                )
                | (TerminalState::Granted, TerminalState::LinkError)
                | (
                    TerminalState::Granted | TerminalState::Denied | TerminalState::LinkError,
                    TerminalState::Idle
                )
        )
    }

    /// States that hold feedback on screen until a deadline passes.
    #[must_use]
    pub fn is_feedback(&self) -> bool {
        matches!(
            self,
            TerminalState::Granted | TerminalState::Denied | TerminalState::LinkError
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_swipe_event_constructors() {
        let key = SwipeEvent::key('7');
        assert_eq!(key.character(), '7');
        assert!(!key.is_terminator());

        assert!(SwipeEvent::terminator().is_terminator());
    }

    #[test]
    fn test_raw_code_counts_chars_not_bytes() {
        let code = RawCode::new("é12");
        assert_eq!(code.char_len(), 3);
        assert_eq!(code.as_str().len(), 4);
    }

    #[test]
    fn test_unlock_command_default() {
        assert_eq!(ActuationCommand::default().as_bytes(), b"u\r");
    }

    #[rstest]
    #[case(TerminalState::Idle, TerminalState::Capturing)]
    #[case(TerminalState::Capturing, TerminalState::Resolving)]
    #[case(TerminalState::Resolving, TerminalState::Granted)]
    #[case(TerminalState::Resolving, TerminalState::Denied)]
    #[case(TerminalState::Resolving, TerminalState::LinkError)]
    #[case(TerminalState::Granted, TerminalState::LinkError)]
    #[case(TerminalState::Granted, TerminalState::Idle)]
    #[case(TerminalState::Denied, TerminalState::Idle)]
    #[case(TerminalState::LinkError, TerminalState::Idle)]
    fn test_valid_transitions(#[case] from: TerminalState, #[case] to: TerminalState) {
        assert!(from.can_transition_to(&to));
    }

    #[rstest]
    #[case(TerminalState::Idle, TerminalState::Resolving)]
    #[case(TerminalState::Idle, TerminalState::Granted)]
    #[case(TerminalState::Capturing, TerminalState::Granted)]
    #[case(TerminalState::Capturing, TerminalState::Idle)]
    #[case(TerminalState::Resolving, TerminalState::Idle)]
    #[case(TerminalState::Denied, TerminalState::Granted)]
    #[case(TerminalState::LinkError, TerminalState::Capturing)]
    fn test_invalid_transitions(#[case] from: TerminalState, #[case] to: TerminalState) {
        assert!(!from.can_transition_to(&to));
    }

    #[test]
    fn test_feedback_states() {
        assert!(TerminalState::Granted.is_feedback());
        assert!(TerminalState::Denied.is_feedback());
        assert!(TerminalState::LinkError.is_feedback());
        assert!(!TerminalState::Idle.is_feedback());
        assert!(!TerminalState::Capturing.is_feedback());
    }

    #[test]
    fn test_state_serialization() {
        let serialized = serde_json::to_string(&TerminalState::LinkError).unwrap();
        assert_eq!(serialized, "\"link_error\"");

        let state: TerminalState = serde_json::from_str("\"capturing\"").unwrap();
        assert_eq!(state, TerminalState::Capturing);
    }
}

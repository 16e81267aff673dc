//! Swipe accumulator.
//!
//! Badge readers emulate a keyboard: a swipe arrives as one key per code
//! character followed by a terminator. The accumulator buffers the keys and
//! hands over the complete code when the terminator arrives.

use doorkeep_core::{RawCode, SwipeEvent};

/// Buffers key events until the terminator completes a code.
///
/// # Examples
///
/// ```
/// use doorkeep_core::SwipeEvent;
/// use doorkeep_terminal::Accumulator;
///
/// let mut accumulator = Accumulator::new();
/// assert!(accumulator.on_key_event(SwipeEvent::key('4')).is_none());
/// assert!(accumulator.on_key_event(SwipeEvent::key('2')).is_none());
///
/// let code = accumulator.on_key_event(SwipeEvent::terminator()).unwrap();
/// assert_eq!(code.as_str(), "42");
/// assert!(accumulator.is_empty());
/// ```
#[derive(Debug, Default, Clone)]
pub struct Accumulator {
    buffer: String,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one key event.
    ///
    /// Returns the buffered code on the terminator (possibly empty) and
    /// starts a new one; returns `None` for any other key.
    pub fn on_key_event(&mut self, event: SwipeEvent) -> Option<RawCode> {
        if event.is_terminator() {
            return Some(RawCode::new(std::mem::take(&mut self.buffer)));
        }
        self.buffer.push(event.character());
        None
    }

    /// Discard a partial code.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Number of buffered characters.
    pub fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

//! Keyboard input source.
//!
//! USB badge readers enumerate as a keyboard, so swipes and operator keys
//! arrive on the same crossterm event stream. Printable characters are badge
//! content, `Enter` ends a swipe, keypad-enter or `Ctrl-R` resets and `Esc`
//! or `Ctrl-C` quits.

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers,
};
use doorkeep_core::{SwipeEvent, TerminalInput};
use doorkeep_hardware::{DeviceInfo, HardwareError, Result, SwipeSource};
use futures::StreamExt;
use tracing::trace;

pub struct KeyboardSource {
    event_stream: EventStream,
}

impl KeyboardSource {
    /// Start reading terminal events. Raw mode must already be enabled.
    pub fn new() -> Self {
        Self {
            event_stream: EventStream::new(),
        }
    }
}

impl Default for KeyboardSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SwipeSource for KeyboardSource {
    async fn read_input(&mut self) -> Result<TerminalInput> {
        loop {
            match self.event_stream.next().await {
                Some(Ok(Event::Key(key_event))) => {
                    if let Some(input) = convert_key(key_event) {
                        return Ok(input);
                    }
                    trace!(?key_event, "key ignored");
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(HardwareError::Io(e)),
                None => return Err(HardwareError::disconnected("keyboard event stream ended")),
            }
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new("Keyboard Badge Reader", "HID keyboard").with_channel("stdin"))
    }
}

/// Map a key event to terminal input. Releases and repeats are dropped.
fn convert_key(key_event: KeyEvent) -> Option<TerminalInput> {
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
    match key_event.code {
        KeyCode::Esc => Some(TerminalInput::Quit),
        KeyCode::Char('c') if ctrl => Some(TerminalInput::Quit),
        KeyCode::Char('r') if ctrl => Some(TerminalInput::Reset),
        KeyCode::Enter if key_event.state.contains(KeyEventState::KEYPAD) => {
            Some(TerminalInput::Reset)
        }
        KeyCode::Enter => Some(SwipeEvent::terminator().into()),
        KeyCode::Char(c) if !ctrl && !c.is_control() => Some(SwipeEvent::key(c).into()),
        _ => None,
    }
}

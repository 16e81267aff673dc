//! Console rendering of the terminal display.

use std::io::{self, Stdout, Write, stdout};

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    style::Print,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use doorkeep_core::Result;
use doorkeep_terminal::{Display, VirtualDisplay};
use tracing::{debug, warn};

/// Raw mode and alternate screen for the life of the session.
///
/// Dropping the guard restores the terminal, including on early return.
pub struct TerminalGuard {
    enhanced_keys: bool,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        out.execute(EnterAlternateScreen)?.execute(cursor::Hide)?;

        // Keypad enter is only distinguishable with enhanced key reporting.
        let enhanced_keys = out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES,
            ))
            .is_ok();
        if !enhanced_keys {
            debug!("terminal lacks keyboard enhancement, keypad reset unavailable");
        }

        Ok(Self { enhanced_keys })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = stdout();
        if self.enhanced_keys {
            let _ = out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = out.execute(cursor::Show);
        let _ = out.execute(LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// A [`VirtualDisplay`] painted to a terminal after every change.
///
/// The grid is centered in the terminal window as sized at construction.
pub struct ConsoleDisplay<W: Write = Stdout> {
    screen: VirtualDisplay,
    out: W,
    origin: (u16, u16),
}

impl ConsoleDisplay<Stdout> {
    pub fn stdout(screen: VirtualDisplay) -> Self {
        let window = terminal::size().unwrap_or((0, 0));
        Self::new(screen, stdout(), window)
    }
}

impl<W: Write> ConsoleDisplay<W> {
    /// Paint `screen` into a window of `(columns, rows)` cells.
    pub fn new(screen: VirtualDisplay, out: W, window: (u16, u16)) -> Self {
        let origin = (
            centered_origin(window.0, screen.columns()),
            centered_origin(window.1, screen.rows()),
        );
        Self {
            screen,
            out,
            origin,
        }
    }

    pub fn screen(&self) -> &VirtualDisplay {
        &self.screen
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn paint(&mut self) -> io::Result<()> {
        self.out.queue(Clear(ClearType::All))?;
        let (x, y) = self.origin;
        for (row, line) in self.screen.get_all_lines().into_iter().enumerate() {
            let row = y.saturating_add(u16::try_from(row).unwrap_or(u16::MAX));
            self.out.queue(cursor::MoveTo(x, row))?.queue(Print(line))?;
        }
        self.out.flush()
    }
}

impl<W: Write> Display for ConsoleDisplay<W> {
    fn render_text(&mut self, message: &str, x: Option<u16>, y: u16) -> Result<()> {
        self.screen.render_text(message, x, y)?;
        self.paint()?;
        Ok(())
    }

    fn render_idle_screen(&mut self) -> Result<()> {
        self.screen.render_idle_screen()?;
        self.paint()?;
        Ok(())
    }

    fn clear(&mut self) {
        self.screen.clear();
        if let Err(e) = self.paint() {
            warn!(error = %e, "console repaint failed");
        }
    }
}

fn centered_origin(window: u16, cells: usize) -> u16 {
    let cells = u16::try_from(cells).unwrap_or(u16::MAX);
    window.saturating_sub(cells) / 2
}

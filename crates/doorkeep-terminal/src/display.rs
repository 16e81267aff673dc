//! Display seam and the in-memory text grid behind it.
//!
//! The session talks to a [`Display`]: place a message at a cell, show the
//! welcome screen, clear. [`VirtualDisplay`] implements it as a rows ×
//! columns ASCII buffer that tests can read back and that the CLI paints to
//! the terminal.
//!
//! # Character Encoding - ASCII Only
//!
//! The grid stores one ASCII character per cell so that column arithmetic is
//! exact. Control characters are dropped and any other non-ASCII character
//! (a display name imported with accents, say) is shown as `?`.
//!
//! # Examples
//!
//! ```
//! use doorkeep_terminal::display::{Display, VirtualDisplay};
//!
//! let mut display = VirtualDisplay::new(12, 48);
//! display.render_idle_screen().unwrap();
//! assert_eq!(display.get_line(2).unwrap().trim(), "Welcome to BUILDS");
//!
//! display.clear();
//! display.render_text("Hello Alice", None, 5).unwrap();
//! assert_eq!(display.get_line(5).unwrap().trim(), "Hello Alice");
//! ```

use doorkeep_core::constants::{
    DEFAULT_DISPLAY_COLUMNS, DEFAULT_DISPLAY_ROWS, DEFAULT_WELCOME_LINES, DEFAULT_WELCOME_ROW,
};
use doorkeep_core::{Error, Result};

/// Output surface used by the session.
///
/// Coordinates are text cells. `x = None` centers the message on row `y`.
pub trait Display {
    /// Draw `message` on row `y`, starting at column `x` or centered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLine`] if `y` is outside the display.
    fn render_text(&mut self, message: &str, x: Option<u16>, y: u16) -> Result<()>;

    /// Replace the whole screen with the welcome screen.
    fn render_idle_screen(&mut self) -> Result<()>;

    /// Blank the whole screen.
    fn clear(&mut self);
}

/// Text alignment options for a full display row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Text starts at column 0, padded with spaces on the right.
    Left,
    /// Text centered (extra space on the right if odd).
    Center,
    /// Text ends at the last column.
    Right,
}

/// In-memory text grid.
#[derive(Debug, Clone)]
pub struct VirtualDisplay {
    rows: usize,
    columns: usize,

    /// One string of exactly `columns` ASCII characters per row.
    buffer: Vec<String>,

    welcome_lines: Vec<String>,
    welcome_row: u16,
}

impl VirtualDisplay {
    /// Create a blank display with the stock welcome screen.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self::builder().with_size(rows, columns).build()
    }

    pub fn builder() -> VirtualDisplayBuilder {
        VirtualDisplayBuilder::default()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Replace row `line` with `text` aligned across the full width.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLine`] if `line` is out of bounds.
    ///
    /// ```
    /// use doorkeep_terminal::display::{Alignment, VirtualDisplay};
    ///
    /// let mut display = VirtualDisplay::new(2, 10);
    /// display.set_line_aligned(1, "DOOR", Alignment::Right).unwrap();
    /// assert_eq!(display.get_line(1).unwrap(), "      DOOR");
    /// ```
    pub fn set_line_aligned(&mut self, line: usize, text: &str, align: Alignment) -> Result<()> {
        self.check_line(line)?;
        self.buffer[line] = align_text(&sanitize_text(text), self.columns, align);
        Ok(())
    }

    pub fn set_line(&mut self, line: usize, text: &str) -> Result<()> {
        self.set_line_aligned(line, text, Alignment::Left)
    }

    /// Write `text` into row `line` starting at `column`, keeping the rest of
    /// the row. Anything past the right edge is cut off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLine`] if `line` is out of bounds.
    pub fn put_text(&mut self, line: usize, column: usize, text: &str) -> Result<()> {
        self.check_line(line)?;

        let mut cells: Vec<char> = self.buffer[line].chars().collect();
        for (cell, c) in cells
            .iter_mut()
            .skip(column)
            .zip(sanitize_text(text).chars())
        {
            *cell = c;
        }
        self.buffer[line] = cells.into_iter().collect();
        Ok(())
    }

    /// Row `line` as a `columns`-wide string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLine`] if `line` is out of bounds.
    pub fn get_line(&self, line: usize) -> Result<&str> {
        self.check_line(line)?;
        Ok(&self.buffer[line])
    }

    pub fn get_all_lines(&self) -> Vec<&str> {
        self.buffer.iter().map(String::as_str).collect()
    }

    /// Whether any cell holds a non-space character.
    pub fn is_blank(&self) -> bool {
        self.buffer.iter().all(|row| row.trim().is_empty())
    }

    /// Whether the grid shows exactly the welcome screen.
    pub fn is_idle_screen(&self) -> bool {
        let mut idle = self.clone();
        idle.paint_welcome();
        idle.buffer == self.buffer
    }

    fn check_line(&self, line: usize) -> Result<()> {
        if line >= self.rows {
            return Err(Error::InvalidLine {
                line,
                max: self.rows.saturating_sub(1),
            });
        }
        Ok(())
    }

    fn paint_welcome(&mut self) {
        self.clear();
        let first = usize::from(self.welcome_row);
        for (offset, text) in self.welcome_lines.iter().enumerate() {
            let row = first + offset;
            if row >= self.rows {
                break;
            }
            self.buffer[row] = align_text(&sanitize_text(text), self.columns, Alignment::Center);
        }
    }
}

impl Default for VirtualDisplay {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for VirtualDisplay {
    fn render_text(&mut self, message: &str, x: Option<u16>, y: u16) -> Result<()> {
        let line = usize::from(y);
        match x {
            None => self.set_line_aligned(line, message, Alignment::Center),
            Some(column) => self.put_text(line, usize::from(column), message),
        }
    }

    fn render_idle_screen(&mut self) -> Result<()> {
        self.paint_welcome();
        Ok(())
    }

    fn clear(&mut self) {
        for row in &mut self.buffer {
            *row = " ".repeat(self.columns);
        }
    }
}

/// Builder for [`VirtualDisplay`].
///
/// ```
/// use doorkeep_terminal::display::{Display, VirtualDisplay};
///
/// let mut display = VirtualDisplay::builder()
///     .with_size(6, 30)
///     .with_welcome_lines(vec!["Lab 3".to_string()])
///     .with_welcome_row(1)
///     .build();
///
/// display.render_idle_screen().unwrap();
/// assert_eq!(display.get_line(1).unwrap().trim(), "Lab 3");
/// ```
#[derive(Debug)]
pub struct VirtualDisplayBuilder {
    rows: usize,
    columns: usize,
    welcome_lines: Vec<String>,
    welcome_row: u16,
}

impl VirtualDisplayBuilder {
    pub fn with_size(mut self, rows: usize, columns: usize) -> Self {
        self.rows = rows;
        self.columns = columns;
        self
    }

    pub fn with_welcome_lines(mut self, lines: Vec<String>) -> Self {
        self.welcome_lines = lines;
        self
    }

    pub fn with_welcome_row(mut self, row: u16) -> Self {
        self.welcome_row = row;
        self
    }

    /// Build a blank display.
    pub fn build(self) -> VirtualDisplay {
        VirtualDisplay {
            rows: self.rows,
            columns: self.columns,
            buffer: vec![" ".repeat(self.columns); self.rows],
            welcome_lines: self.welcome_lines,
            welcome_row: self.welcome_row,
        }
    }
}

impl Default for VirtualDisplayBuilder {
    fn default() -> Self {
        Self {
            rows: DEFAULT_DISPLAY_ROWS,
            columns: DEFAULT_DISPLAY_COLUMNS,
            welcome_lines: DEFAULT_WELCOME_LINES
                .iter()
                .map(|line| line.to_string())
                .collect(),
            welcome_row: DEFAULT_WELCOME_ROW,
        }
    }
}

/// Truncate text to a maximum number of characters.
///
/// ```
/// use doorkeep_terminal::display::truncate_text;
///
/// assert_eq!(truncate_text("Welcome", 4), "Welc");
/// assert_eq!(truncate_text("Short", 10), "Short");
/// ```
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Align text within a fixed width, padding with spaces.
///
/// The result is always exactly `width` characters long.
///
/// ```
/// use doorkeep_terminal::display::{align_text, Alignment};
///
/// assert_eq!(align_text("HELLO", 10, Alignment::Left), "HELLO     ");
/// assert_eq!(align_text("HELLO", 10, Alignment::Center), "  HELLO   ");
/// assert_eq!(align_text("HELLO", 10, Alignment::Right), "     HELLO");
/// ```
pub fn align_text(text: &str, width: usize, alignment: Alignment) -> String {
    let char_count = text.chars().count();
    if char_count >= width {
        return truncate_text(text, width);
    }

    let padding = width - char_count;
    match alignment {
        Alignment::Left => format!("{}{}", text, " ".repeat(padding)),
        Alignment::Right => format!("{}{}", " ".repeat(padding), text),
        Alignment::Center => {
            let left_pad = padding / 2;
            let right_pad = padding - left_pad;
            format!("{}{}{}", " ".repeat(left_pad), text, " ".repeat(right_pad))
        }
    }
}

/// Drop control characters, replace non-ASCII with `?`, trim.
fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control())
        .map(|c| if c.is_ascii() { c } else { '?' })
        .collect::<String>()
        .trim()
        .to_string()
}

//! The terminal control surface consumed by progress bars.
//!
//! A bar needs four capabilities from its terminal: querying the cursor, moving it
//! to an absolute position, toggling its visibility, and writing raw text without
//! an implicit newline. [`Terminal`] captures exactly that.
//!
//! Two implementations ship with the crate:
//!
//! * [`CrosstermTerminal`]: a real terminal driven through `crossterm`.
//! * [`VirtualTerminal`]: an in-memory screen that records every call. Useful in
//!   tests, or wherever output should be captured instead of displayed.

use std::{
    fmt,
    io::{self, Stdout, Write},
    sync::Arc,
};

use crossterm::{cursor, queue};
use parking_lot::Mutex;

use crate::render::BACKSPACE;

/// Minimal cursor-addressable terminal.
///
/// Coordinates are zero-based `(column, row)`.
pub trait Terminal {
    /// Returns the current cursor position as `(column, row)`.
    fn cursor_position(&mut self) -> io::Result<(u16, u16)>;

    /// Moves the cursor to an absolute position.
    fn move_to(&mut self, column: u16, row: u16) -> io::Result<()>;

    /// Shows or hides the cursor.
    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()>;

    /// Writes text at the cursor. No newline is appended.
    fn write_str(&mut self, text: &str) -> io::Result<()>;

    /// Flushes any buffered output.
    fn flush(&mut self) -> io::Result<()>;
}

/// A [`Terminal`] backed by a real TTY via `crossterm`.
///
/// Commands are queued into the writer and sent on [`flush`](Terminal::flush).
pub struct CrosstermTerminal<W: Write = Stdout> {
    out: W,
}

impl CrosstermTerminal<Stdout> {
    /// Creates a terminal writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> CrosstermTerminal<W> {
    /// Wraps an arbitrary writer connected to a terminal.
    pub const fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Terminal for CrosstermTerminal<W> {
    fn cursor_position(&mut self) -> io::Result<(u16, u16)> {
        // Pending output would move the cursor after the query.
        self.out.flush()?;
        cursor::position()
    }

    fn move_to(&mut self, column: u16, row: u16) -> io::Result<()> {
        queue!(self.out, cursor::MoveTo(column, row))
    }

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
        if visible {
            queue!(self.out, cursor::Show)
        } else {
            queue!(self.out, cursor::Hide)
        }
    }

    fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl<W: Write> fmt::Debug for CrosstermTerminal<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrosstermTerminal").finish_non_exhaustive()
    }
}

/// A single call received by a [`VirtualTerminal`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TerminalEvent {
    /// `cursor_position` was queried.
    QueryCursor,
    /// `move_to(column, row)`.
    MoveTo(u16, u16),
    /// `set_cursor_visible(visible)`.
    CursorVisible(bool),
    /// `write_str(text)`.
    Write(String),
    /// `flush`.
    Flush,
}

#[derive(Debug)]
struct Screen {
    lines: Vec<Vec<char>>,
    column: u16,
    row: u16,
    visible: bool,
    events: Vec<TerminalEvent>,
}

impl Screen {
    fn line_mut(&mut self, row: u16) -> &mut Vec<char> {
        let row = usize::from(row);
        if self.lines.len() <= row {
            self.lines.resize_with(row + 1, Vec::new);
        }
        &mut self.lines[row]
    }

    fn put(&mut self, c: char) {
        match c {
            '\n' => {
                self.row = self.row.saturating_add(1);
                self.column = 0;
                self.line_mut(self.row);
            }
            '\r' => self.column = 0,
            BACKSPACE => self.column = self.column.saturating_sub(1),
            _ => {
                let column = usize::from(self.column);
                let line = self.line_mut(self.row);
                if line.len() <= column {
                    line.resize(column + 1, ' ');
                }
                line[column] = c;
                self.column = self.column.saturating_add(1);
            }
        }
    }
}

/// An in-memory terminal with an unbounded, growable grid.
///
/// Cloning is cheap and every clone observes the same screen, so a test can keep a
/// handle while the original is moved into a [`TerminalLock`](crate::TerminalLock).
/// Newlines move to column 0 of the next row, backspace moves one column left and
/// printable characters overwrite the cell under the cursor.
#[derive(Clone, Debug)]
pub struct VirtualTerminal {
    screen: Arc<Mutex<Screen>>,
}

impl Default for VirtualTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualTerminal {
    /// Creates an empty screen with the cursor at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self {
            screen: Arc::new(Mutex::new(Screen {
                lines: vec![Vec::new()],
                column: 0,
                row: 0,
                visible: true,
                events: Vec::new(),
            })),
        }
    }

    /// Writes text as if an application printed it, without recording an event.
    pub fn print(&self, text: &str) {
        let mut screen = self.screen.lock();
        text.chars().for_each(|c| screen.put(c));
    }

    /// Returns the contents of `row`, with trailing blanks removed.
    #[must_use]
    pub fn line(&self, row: u16) -> String {
        let screen = self.screen.lock();
        screen
            .lines
            .get(usize::from(row))
            .map(|line| line.iter().collect::<String>().trim_end().to_owned())
            .unwrap_or_default()
    }

    /// Returns all rows, with trailing blanks removed.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let screen = self.screen.lock();
        screen
            .lines
            .iter()
            .map(|line| line.iter().collect::<String>().trim_end().to_owned())
            .collect()
    }

    /// Current `(column, row)` of the cursor.
    #[must_use]
    pub fn cursor(&self) -> (u16, u16) {
        let screen = self.screen.lock();
        (screen.column, screen.row)
    }

    /// Whether the cursor is currently visible.
    #[must_use]
    pub fn is_cursor_visible(&self) -> bool {
        self.screen.lock().visible
    }

    /// Every call received so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<TerminalEvent> {
        self.screen.lock().events.clone()
    }

    /// Forgets recorded events while keeping the screen.
    pub fn clear_events(&self) {
        self.screen.lock().events.clear();
    }
}

impl Terminal for VirtualTerminal {
    fn cursor_position(&mut self) -> io::Result<(u16, u16)> {
        let mut screen = self.screen.lock();
        screen.events.push(TerminalEvent::QueryCursor);
        Ok((screen.column, screen.row))
    }

    fn move_to(&mut self, column: u16, row: u16) -> io::Result<()> {
        let mut screen = self.screen.lock();
        screen.events.push(TerminalEvent::MoveTo(column, row));
        screen.line_mut(row);
        screen.column = column;
        screen.row = row;
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
        let mut screen = self.screen.lock();
        screen.events.push(TerminalEvent::CursorVisible(visible));
        screen.visible = visible;
        Ok(())
    }

    fn write_str(&mut self, text: &str) -> io::Result<()> {
        let mut screen = self.screen.lock();
        screen.events.push(TerminalEvent::Write(text.to_owned()));
        text.chars().for_each(|c| screen.put(c));
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.screen.lock().events.push(TerminalEvent::Flush);
        Ok(())
    }
}

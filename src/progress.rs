//! The line-stable progress bar.
//!
//! A [`ProgressBar`] owns exactly one terminal row. [`ProgressBar::start`] pins that
//! row; every later [`update`](ProgressBar::update) or [`write`](ProgressBar::write)
//! redraws only that row and puts the cursor back where the application left it.
//!
//! # Locking
//!
//! Two locks are involved, always taken in the same order:
//!
//! * **Render lock** (private, one per bar): guards the bar's configuration, text,
//!   previous render length and reserved row. Concurrent updates of the *same* bar
//!   are serialized and each produces a complete render.
//! * **Terminal lock** ([`TerminalLock`], shared by default): guards the
//!   save-cursor / jump / write / restore-cursor sequence across all bars and any
//!   other writer holding the same lock.
//!
//! The render lock is held while the terminal lock is acquired, never the reverse.

use std::{fmt, sync::Arc};

use compact_str::CompactString;
use parking_lot::Mutex;

use crate::{
    config::BarConfig,
    context::BarContext,
    error::{BarError, Result},
    lock::TerminalLock,
    numeric::{ProgressValue, fraction},
    render::{Frame, compose_bar, compose_text, finalize},
    terminal::Terminal,
};

/// A thread-safe, cloneable handle to a single-row progress bar.
///
/// Cloning is cheap (Arc bump) and every clone drives the same row.
#[derive(Clone)]
pub struct ProgressBar {
    state: Arc<Mutex<BarState>>,
}

/// Everything guarded by the render lock.
struct BarState {
    config: BarConfig,
    text: Option<CompactString>,
    last_rendered_len: usize,
    reserved_row: Option<u16>,
    terminal: TerminalLock,
}

impl fmt::Debug for ProgressBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ProgressBar")
            .field("config", &state.config)
            .field("text", &state.text)
            .field("last_rendered_len", &state.last_rendered_len)
            .field("reserved_row", &state.reserved_row)
            .finish_non_exhaustive()
    }
}

impl ProgressBar {
    /// Creates a bar using the process-wide default lock.
    ///
    /// Nothing is written until [`start`](Self::start). Negative widths fail with
    /// [`BarError::InvalidArgument`].
    pub fn new<L, S>(text: Option<&str>, bar_length: L, text_space: S) -> Result<Self>
    where
        L: TryInto<usize> + Copy + fmt::Display,
        S: TryInto<usize> + Copy + fmt::Display,
    {
        BarContext::global().bar(text, bar_length, text_space)
    }

    pub(crate) fn from_parts(
        config: BarConfig,
        text: Option<CompactString>,
        terminal: TerminalLock,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(BarState {
                config,
                text,
                last_rendered_len: 0,
                reserved_row: None,
                terminal,
            })),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// A copy of the current configuration.
    #[must_use]
    pub fn config(&self) -> BarConfig {
        self.state.lock().config.clone()
    }

    /// Replaces the configuration. Takes effect on the next render.
    pub fn set_config(&self, config: BarConfig) {
        self.state.lock().config = config;
    }

    /// Applies a fallible edit to the configuration.
    ///
    /// The closure works on a copy which is committed only if it returns `Ok`, so a
    /// rejected value never leaves the bar half-updated.
    pub fn configure<F>(&self, edit: F) -> Result<()>
    where
        F: FnOnce(&mut BarConfig) -> Result<()>,
    {
        let mut state = self.state.lock();
        let mut config = state.config.clone();
        edit(&mut config)?;
        state.config = config;
        Ok(())
    }

    /// The text shown before the bar, if any.
    #[must_use]
    pub fn text(&self) -> Option<CompactString> {
        self.state.lock().text.clone()
    }

    /// Character length of the last render, excluding blank-out padding.
    #[must_use]
    pub fn last_rendered_length(&self) -> usize {
        self.state.lock().last_rendered_len
    }

    /// The row pinned by [`start`](Self::start).
    #[must_use]
    pub fn reserved_row(&self) -> Option<u16> {
        self.state.lock().reserved_row
    }

    /// Whether [`start`](Self::start) has reserved a row.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.reserved_row().is_some()
    }

    /// The terminal lock this bar renders under.
    #[must_use]
    pub fn lock(&self) -> TerminalLock {
        self.state.lock().terminal.clone()
    }

    /// Switches this bar to another terminal lock, effective immediately.
    pub fn set_lock(&self, lock: TerminalLock) {
        tracing::debug!("replacing terminal lock of progress bar");
        self.state.lock().terminal = lock;
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Reserves the row this bar will redraw.
    ///
    /// Moves to a fresh line if the cursor is mid-line, records the cursor's row,
    /// then emits one more newline so later output lands below the bar. Calling it
    /// twice reserves a second row and abandons the first.
    pub fn start(&self) -> Result<()> {
        let mut state = self.state.lock();
        let row = {
            let mut term = state.terminal.lock();
            let (column, _) = term.cursor_position()?;
            if column != 0 {
                term.write_str("\n")?;
            }
            let (_, row) = term.cursor_position()?;
            term.write_str("\n")?;
            term.flush()?;
            row
        };

        if let Some(previous) = state.reserved_row.replace(row) {
            tracing::warn!(previous, row, "progress bar started twice");
        }
        state.last_rendered_len = 0;
        tracing::debug!(row, "reserved progress row");
        Ok(())
    }

    /// Redraws the bar at `progress`, keeping the current text.
    ///
    /// `progress` is a fraction; values above 1 fill the bar and values below 0
    /// leave it empty. NaN or infinite values fail with [`BarError::Computation`].
    pub fn update(&self, progress: f64) -> Result<()> {
        let mut state = self.state.lock();
        let content = compose_bar(&state.config, progress, state.text.as_deref())?;
        state.emit(content)
    }

    /// Replaces the text (or removes it with `None`) and redraws the bar.
    pub fn update_with_text(&self, progress: f64, text: Option<&str>) -> Result<()> {
        let mut state = self.state.lock();
        let content = compose_bar(&state.config, progress, text)?;
        state.emit(content)?;
        state.text = text.map(CompactString::from);
        Ok(())
    }

    /// Redraws the bar at `current / total`.
    ///
    /// A zero `total` yields a non-finite fraction and fails with
    /// [`BarError::Computation`].
    pub fn update_ratio<T: ProgressValue>(&self, current: T, total: T) -> Result<()> {
        self.update(fraction(current, total))
    }

    /// Redraws the bar at `current / total` with new text.
    pub fn update_ratio_with_text<T: ProgressValue>(
        &self,
        current: T,
        total: T,
        text: Option<&str>,
    ) -> Result<()> {
        self.update_with_text(fraction(current, total), text)
    }

    /// Replaces the whole row with plain text, typically a final status message.
    pub fn write(&self, text: Option<&str>) -> Result<()> {
        let mut state = self.state.lock();
        state.emit(compose_text(text))?;
        state.text = text.map(CompactString::from);
        Ok(())
    }
}

impl BarState {
    /// Finalizes `content` against the previous render and draws it.
    fn emit(&mut self, content: String) -> Result<()> {
        let row = self.reserved_row.ok_or(BarError::NotStarted)?;
        let frame = finalize(content, self.last_rendered_len);

        {
            let mut term = self.terminal.lock();
            draw(&mut **term, row, &frame)?;
        }

        tracing::trace!(
            row,
            len = frame.semantic_len,
            blanked = self.last_rendered_len.saturating_sub(frame.semantic_len),
            "rendered progress row"
        );
        self.last_rendered_len = frame.semantic_len;
        Ok(())
    }
}

/// Writes `frame` at column 0 of `row` and returns the cursor to where it was.
///
/// Once the cursor has been hidden it is shown again even if a later step fails.
fn draw(term: &mut dyn Terminal, row: u16, frame: &Frame) -> Result<()> {
    let (column, current_row) = term.cursor_position()?;
    term.set_cursor_visible(false)?;

    let drawn = term
        .move_to(0, row)
        .and_then(|()| term.write_str(&frame.output))
        .and_then(|()| term.move_to(column, current_row));
    if let Err(err) = drawn {
        let _ = term.set_cursor_visible(true).and_then(|()| term.flush());
        return Err(err.into());
    }

    term.set_cursor_visible(true)?;
    term.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Barrier},
        thread,
    };

    use std::io;

    use super::{ProgressBar, draw};
    use crate::{
        BarBuilder, BarError,
        lock::TerminalLock,
        render::{BACKSPACE, finalize},
        terminal::{Terminal, TerminalEvent, VirtualTerminal},
    };

    /// Forwards to a `VirtualTerminal` but fails every text write.
    struct FailingWrites(VirtualTerminal);

    impl Terminal for FailingWrites {
        fn cursor_position(&mut self) -> io::Result<(u16, u16)> {
            self.0.cursor_position()
        }

        fn move_to(&mut self, column: u16, row: u16) -> io::Result<()> {
            self.0.move_to(column, row)
        }

        fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
            self.0.set_cursor_visible(visible)
        }

        fn write_str(&mut self, _text: &str) -> io::Result<()> {
            Err(io::Error::other("write refused"))
        }

        fn flush(&mut self) -> io::Result<()> {
            self.0.flush()
        }
    }

    fn bar_on(term: &VirtualTerminal, length: usize, text_space: usize) -> ProgressBar {
        BarBuilder::new()
            .with_bar_length(length)
            .unwrap()
            .with_text_space(text_space)
            .unwrap()
            .with_lock(TerminalLock::new(term.clone()))
            .build()
    }

    /// Row reservation
    /// A bar started mid-line moves to a fresh row first and leaves a blank row below.
    #[test]
    fn test_start_reserves_row() {
        let term = VirtualTerminal::new();
        let bar = bar_on(&term, 10, 0);
        assert_eq!(bar.reserved_row(), None);

        bar.start().unwrap();
        assert_eq!(bar.reserved_row(), Some(0));
        assert_eq!(term.cursor(), (0, 1));

        term.print("partial");
        let second = bar_on(&term, 10, 0);
        second.start().unwrap();
        assert_eq!(second.reserved_row(), Some(2));
        assert_eq!(term.cursor(), (0, 3));
        assert_eq!(term.line(1), "partial");
        assert_eq!(term.line(2), "");
    }

    /// Construction through the global context writes nothing and validates widths.
    #[test]
    fn test_new_validates_without_output() {
        let bar = ProgressBar::new(Some("job"), 10, 5).unwrap();
        assert!(!bar.is_started());
        assert_eq!(bar.text().as_deref(), Some("job"));
        assert_eq!(bar.config().text_space(), 5);

        assert!(matches!(
            ProgressBar::new(None, -1, 0),
            Err(BarError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_render_before_start() {
        let term = VirtualTerminal::new();
        let bar = bar_on(&term, 10, 0);

        assert!(matches!(bar.update(0.5), Err(BarError::NotStarted)));
        assert!(matches!(bar.write(Some("x")), Err(BarError::NotStarted)));
        assert!(term.events().is_empty());
    }

    /// Cursor restoration
    /// The application's cursor is where it was before the render.
    #[test]
    fn test_update_restores_cursor() {
        let term = VirtualTerminal::new();
        let bar = bar_on(&term, 10, 0);
        bar.start().unwrap();
        term.print("log output");
        term.clear_events();

        bar.update(0.35).unwrap();

        assert_eq!(term.line(0), "[###-------]");
        assert_eq!(term.line(1), "log output");
        assert_eq!(term.cursor(), (10, 1));
        assert!(term.is_cursor_visible());
        assert_eq!(
            term.events(),
            vec![
                TerminalEvent::QueryCursor,
                TerminalEvent::CursorVisible(false),
                TerminalEvent::MoveTo(0, 0),
                TerminalEvent::Write("[###-------]".into()),
                TerminalEvent::MoveTo(10, 1),
                TerminalEvent::CursorVisible(true),
                TerminalEvent::Flush,
            ]
        );
        assert_eq!(bar.last_rendered_length(), 12);
    }

    /// Text handling
    /// `update` keeps the text, `update_with_text(None)` drops it along with its padding.
    #[test]
    fn test_text_prefix() {
        let term = VirtualTerminal::new();
        let bar = BarBuilder::new()
            .with_text("copy")
            .with_bar_length(4)
            .unwrap()
            .with_text_space(8)
            .unwrap()
            .with_lock(TerminalLock::new(term.clone()))
            .build();
        bar.start().unwrap();

        bar.update(0.5).unwrap();
        assert_eq!(term.line(0), "copy    [##--]");

        bar.update_with_text(0.75, Some("move")).unwrap();
        assert_eq!(term.line(0), "move    [###-]");
        assert_eq!(bar.text().as_deref(), Some("move"));

        bar.update_with_text(1.0, None).unwrap();
        assert_eq!(term.line(0), "[####]");
        assert_eq!(bar.text(), None);
        assert_eq!(bar.last_rendered_length(), 6);
    }

    /// Blank-out
    /// A shorter render after a longer one overwrites the stale tail.
    #[test]
    fn test_write_replaces_longer_bar() {
        let term = VirtualTerminal::new();
        let bar = bar_on(&term, 10, 0);
        bar.start().unwrap();

        bar.update_with_text(0.5, Some("working ")).unwrap();
        assert_eq!(bar.last_rendered_length(), 20);
        term.clear_events();

        bar.write(Some("Done!")).unwrap();

        let expected = format!("Done!{}{}", " ".repeat(15), BACKSPACE.to_string().repeat(15));
        assert!(term.events().contains(&TerminalEvent::Write(expected)));
        assert_eq!(term.line(0), "Done!");
        assert_eq!(bar.last_rendered_length(), 5);
        assert_eq!(bar.text().as_deref(), Some("Done!"));
    }

    #[test]
    fn test_ratio_updates() {
        let term = VirtualTerminal::new();
        let bar = bar_on(&term, 10, 0);
        bar.start().unwrap();

        bar.update_ratio(7u32, 10u32).unwrap();
        assert_eq!(term.line(0), "[#######---]");

        bar.update_ratio_with_text(1u8, 4u8, Some("q")).unwrap();
        assert_eq!(term.line(0), "q[##--------]");

        term.clear_events();
        let err = bar.update_ratio(0u64, 0u64).unwrap_err();
        assert!(matches!(err, BarError::Computation { .. }));
        assert!(term.events().is_empty());
        assert_eq!(term.line(0), "q[##--------]");
    }

    /// Atomic configuration edits
    #[test]
    fn test_configure_rolls_back() {
        let term = VirtualTerminal::new();
        let bar = bar_on(&term, 10, 0);

        let result = bar.configure(|cfg| {
            cfg.set_char_fill('*');
            cfg.set_bar_length(-1)
        });
        assert!(matches!(result, Err(BarError::InvalidArgument { .. })));
        assert_eq!(bar.config().char_fill(), '#');
        assert_eq!(bar.config().bar_length(), 10);

        bar.configure(|cfg| {
            cfg.set_show_percentage(true);
            cfg.set_bar_length(4)
        })
        .unwrap();
        bar.start().unwrap();
        bar.update(0.5).unwrap();
        assert_eq!(term.line(0), "[##--] 50%");
    }

    /// Failed write
    /// The cursor is shown again and the error reaches the caller.
    #[test]
    fn test_failed_draw_restores_cursor_visibility() {
        let screen = VirtualTerminal::new();
        let mut term = FailingWrites(screen.clone());

        let err = draw(&mut term, 0, &finalize("[##--]".to_owned(), 0)).unwrap_err();

        assert!(matches!(err, BarError::Io(_)));
        assert!(screen.is_cursor_visible());
        assert_eq!(
            screen.events().last(),
            Some(&TerminalEvent::Flush),
            "visibility change must be flushed"
        );
    }

    /// Lock override
    /// A swapped lock takes effect on the very next render.
    #[test]
    fn test_set_lock_is_immediate() {
        let first = VirtualTerminal::new();
        let second = VirtualTerminal::new();
        let bar = bar_on(&first, 4, 0);
        bar.start().unwrap();
        bar.update(0.5).unwrap();

        bar.set_lock(TerminalLock::new(second.clone()));
        first.clear_events();
        bar.update(1.0).unwrap();

        assert!(first.events().is_empty());
        assert_eq!(first.line(0), "[##--]");
        assert_eq!(second.line(0), "[####]");
    }

    /// Shared terminal, concurrent bars
    /// Every render session (query, hide, jump, write, restore, show, flush) is
    /// contiguous in the terminal's call log.
    #[test]
    fn test_concurrent_bars_never_interleave() {
        const STEPS: usize = 200;

        let term = VirtualTerminal::new();
        let lock = TerminalLock::new(term.clone());
        let bars: Vec<_> = ["a", "b"]
            .iter()
            .map(|label| {
                let bar = BarBuilder::new()
                    .with_text(*label)
                    .with_bar_length(10)
                    .unwrap()
                    .with_lock(lock.clone())
                    .build();
                bar.start().unwrap();
                bar
            })
            .collect();
        term.clear_events();

        let barrier = Arc::new(Barrier::new(bars.len()));
        let handles: Vec<_> = bars
            .iter()
            .cloned()
            .map(|bar| {
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    for step in 0..=STEPS {
                        bar.update_ratio(step, STEPS).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let events = term.events();
        assert_eq!(events.len(), 2 * (STEPS + 1) * 7);

        for session in events.chunks(7) {
            assert_eq!(session[0], TerminalEvent::QueryCursor);
            assert_eq!(session[1], TerminalEvent::CursorVisible(false));
            let TerminalEvent::MoveTo(0, row) = session[2] else {
                panic!("expected jump to reserved row, got {:?}", session[2]);
            };
            let TerminalEvent::Write(ref text) = session[3] else {
                panic!("expected write, got {:?}", session[3]);
            };
            let label = if row == 0 { "a[" } else { "b[" };
            assert!(text.starts_with(label), "row {row} got {text:?}");
            assert_eq!(session[4], TerminalEvent::MoveTo(0, 2));
            assert_eq!(session[5], TerminalEvent::CursorVisible(true));
            assert_eq!(session[6], TerminalEvent::Flush);
        }

        assert_eq!(term.line(0), "a[##########]");
        assert_eq!(term.line(1), "b[##########]");
        assert_eq!(term.cursor(), (0, 2));
    }

    /// Same bar, two threads
    /// Renders are serialized, so the final row matches the final length.
    #[test]
    fn test_concurrent_updates_same_bar() {
        let term = VirtualTerminal::new();
        let bar = bar_on(&term, 20, 0);
        bar.start().unwrap();

        let handles: Vec<_> = (0..2)
            .map(|id| {
                let bar = bar.clone();
                thread::spawn(move || {
                    for step in 0..100u32 {
                        let text = if id == 0 { "short" } else { "a much longer label" };
                        bar.update_with_text(f64::from(step) / 100.0, Some(text))
                            .unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let line = term.line(0);
        assert_eq!(line.chars().count(), bar.last_rendered_length());
        assert!(line.starts_with("short[") || line.starts_with("a much longer label["));
    }
}

//! Fluent interface for constructing [`ProgressBar`] instances.
//!
//! [`ProgressBar::new`] covers the common case. [`BarBuilder`] exposes every
//! appearance knob up front and lets callers inject a specific [`TerminalLock`],
//! either to share one with other bars or to isolate a bar on its own stream.

use compact_str::CompactString;

use crate::{
    config::BarConfig, context::BarContext, error::Result, lock::TerminalLock,
    progress::ProgressBar,
};

/// A builder for [`ProgressBar`].
///
/// Width setters validate eagerly and return `Result<Self>`, so an invalid value is
/// reported at the call that supplied it.
#[derive(Debug, Default)]
pub struct BarBuilder {
    config: BarConfig,
    text: Option<CompactString>,
    lock: Option<TerminalLock>,
}

impl BarBuilder {
    /// Starts from the default [`BarConfig`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    #[must_use]
    pub fn with_config(mut self, config: BarConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the initial text shown before the bar.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<CompactString>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the number of segments.
    pub fn with_bar_length<N>(mut self, bar_length: N) -> Result<Self>
    where
        N: TryInto<usize> + Copy + std::fmt::Display,
    {
        self.config.set_bar_length(bar_length)?;
        Ok(self)
    }

    /// Sets the minimum width of the text column.
    pub fn with_text_space<N>(mut self, text_space: N) -> Result<Self>
    where
        N: TryInto<usize> + Copy + std::fmt::Display,
    {
        self.config.set_text_space(text_space)?;
        Ok(self)
    }

    /// Sets the fill and empty glyphs.
    #[must_use]
    pub fn with_chars(mut self, fill: char, empty: char) -> Self {
        self.config.set_char_fill(fill);
        self.config.set_char_empty(empty);
        self
    }

    /// Sets the decorations around the segments.
    #[must_use]
    pub fn with_brackets(
        mut self,
        opening: impl Into<CompactString>,
        closing: impl Into<CompactString>,
    ) -> Self {
        self.config.set_bar_opening(opening);
        self.config.set_bar_closing(closing);
        self
    }

    /// Enables the percentage suffix with the given format specifier.
    #[must_use]
    pub fn with_percentage(mut self, format: impl Into<CompactString>) -> Self {
        self.config.set_show_percentage(true);
        self.config.set_percentage_format(format);
        self
    }

    /// Uses `lock` instead of the process-wide default.
    #[must_use]
    pub fn with_lock(mut self, lock: TerminalLock) -> Self {
        self.lock = Some(lock);
        self
    }

    /// Consumes the builder and returns the bar. No terminal output happens.
    #[must_use]
    pub fn build(self) -> ProgressBar {
        let lock = self
            .lock
            .unwrap_or_else(|| BarContext::global().default_lock());
        ProgressBar::from_parts(self.config, self.text, lock)
    }
}

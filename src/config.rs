//! Visual configuration of a [`ProgressBar`](crate::ProgressBar).
//!
//! [`BarConfig`] is a plain value. Width setters validate their input and leave the
//! previous value in place on failure; every other setter accepts anything.

use compact_str::CompactString;

use crate::{
    error::{Result, to_width},
    format::PercentageFormat,
};

/// Appearance of a single progress bar row.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BarConfig {
    bar_length: usize,
    char_fill: char,
    char_empty: char,
    text_space: usize,
    show_percentage: bool,
    percentage_format: CompactString,
    bar_opening: CompactString,
    bar_closing: CompactString,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            bar_length: 20,
            char_fill: '#',
            char_empty: '-',
            text_space: 0,
            show_percentage: false,
            percentage_format: CompactString::const_new("P0"),
            bar_opening: CompactString::const_new("["),
            bar_closing: CompactString::const_new("]"),
        }
    }
}

impl BarConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fill/empty segments.
    #[must_use]
    pub const fn bar_length(&self) -> usize {
        self.bar_length
    }

    /// Sets the number of segments.
    ///
    /// Fails with [`BarError::InvalidArgument`](crate::BarError::InvalidArgument) for
    /// negative values.
    pub fn set_bar_length<N>(&mut self, bar_length: N) -> Result<()>
    where
        N: TryInto<usize> + Copy + std::fmt::Display,
    {
        self.bar_length = to_width("bar_length", bar_length)?;
        Ok(())
    }

    /// Glyph for completed segments.
    #[must_use]
    pub const fn char_fill(&self) -> char {
        self.char_fill
    }

    /// Sets the glyph for completed segments.
    pub fn set_char_fill(&mut self, c: char) {
        self.char_fill = c;
    }

    /// Glyph for remaining segments.
    #[must_use]
    pub const fn char_empty(&self) -> char {
        self.char_empty
    }

    /// Sets the glyph for remaining segments.
    pub fn set_char_empty(&mut self, c: char) {
        self.char_empty = c;
    }

    /// Minimum column width reserved for the text prefix.
    #[must_use]
    pub const fn text_space(&self) -> usize {
        self.text_space
    }

    /// Sets the text column width.
    ///
    /// Fails with [`BarError::InvalidArgument`](crate::BarError::InvalidArgument) for
    /// negative values.
    pub fn set_text_space<N>(&mut self, text_space: N) -> Result<()>
    where
        N: TryInto<usize> + Copy + std::fmt::Display,
    {
        self.text_space = to_width("text_space", text_space)?;
        Ok(())
    }

    /// Whether the fraction is appended after the bar.
    #[must_use]
    pub const fn show_percentage(&self) -> bool {
        self.show_percentage
    }

    /// Toggles the percentage suffix.
    pub fn set_show_percentage(&mut self, show: bool) {
        self.show_percentage = show;
    }

    /// The raw percentage format specifier.
    #[must_use]
    pub fn percentage_format(&self) -> &str {
        &self.percentage_format
    }

    /// The percentage format as it will be rendered.
    #[must_use]
    pub fn parsed_percentage_format(&self) -> PercentageFormat {
        PercentageFormat::parse_lossy(&self.percentage_format)
    }

    /// Sets the percentage format specifier (see [`crate::format`]).
    ///
    /// Any string is accepted; unsupported specifiers render in general format.
    pub fn set_percentage_format(&mut self, spec: impl Into<CompactString>) {
        let spec = spec.into();
        if let Err(err) = spec.parse::<PercentageFormat>() {
            tracing::warn!(%err, "falling back to general percentage format");
        }
        self.percentage_format = spec;
    }

    /// Decoration written before the segments.
    #[must_use]
    pub fn bar_opening(&self) -> &str {
        &self.bar_opening
    }

    /// Sets the decoration written before the segments.
    pub fn set_bar_opening(&mut self, opening: impl Into<CompactString>) {
        self.bar_opening = opening.into();
    }

    /// Decoration written after the segments.
    #[must_use]
    pub fn bar_closing(&self) -> &str {
        &self.bar_closing
    }

    /// Sets the decoration written after the segments.
    pub fn set_bar_closing(&mut self, closing: impl Into<CompactString>) {
        self.bar_closing = closing.into();
    }
}

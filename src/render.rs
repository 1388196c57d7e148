//! Pure composition of render buffers.
//!
//! Nothing in here touches a terminal. [`compose_bar`] builds the Update-path line,
//! [`compose_text`] the Write-path line, and [`finalize`] appends the blank-out
//! suffix that erases leftovers from a longer previous render.

use crate::{
    config::BarConfig,
    error::{BarError, Result},
};

/// Backspace control character.
pub const BACKSPACE: char = '\u{8}';

/// Number of filled segments for `progress`.
///
/// The count is clamped to `0..=bar_length` on both ends. Non-finite fractions
/// cannot be mapped to a segment count and fail with [`BarError::Computation`].
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn fill_count(progress: f64, bar_length: usize) -> Result<usize> {
    if !progress.is_finite() {
        return Err(BarError::Computation { progress });
    }

    let raw = (progress * bar_length as f64).floor();
    if raw <= 0.0 {
        Ok(0)
    } else if raw >= bar_length as f64 {
        Ok(bar_length)
    } else {
        Ok(raw as usize)
    }
}

/// Builds the bar line: optional padded text, decorations, segments and percentage.
pub fn compose_bar(config: &BarConfig, progress: f64, text: Option<&str>) -> Result<String> {
    let fill = fill_count(progress, config.bar_length())?;
    let mut buf = String::new();

    if let Some(text) = text {
        buf.push_str(text);
        let len = text.chars().count();
        buf.extend(std::iter::repeat_n(' ', config.text_space().saturating_sub(len)));
    }

    buf.push_str(config.bar_opening());
    buf.extend(std::iter::repeat_n(config.char_fill(), fill));
    buf.extend(std::iter::repeat_n(
        config.char_empty(),
        config.bar_length() - fill,
    ));
    buf.push_str(config.bar_closing());

    if config.show_percentage() {
        buf.push(' ');
        buf.push_str(&config.parsed_percentage_format().render(progress));
    }

    Ok(buf)
}

/// Builds the plain-text line used by `write`.
pub fn compose_text(text: Option<&str>) -> String {
    text.map(str::to_owned).unwrap_or_default()
}

/// A buffer ready to be emitted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Frame {
    /// Exact text written at column 0 of the reserved row.
    pub output: String,
    /// Character length of the content, excluding the blank-out suffix.
    pub semantic_len: usize,
}

/// Appends `diff` spaces and `diff` backspaces when `content` is shorter than the
/// previous render.
pub fn finalize(content: String, last_rendered_len: usize) -> Frame {
    let semantic_len = content.chars().count();
    let diff = last_rendered_len.saturating_sub(semantic_len);

    let mut output = content;
    if diff > 0 {
        output.reserve(diff * 2);
        output.extend(std::iter::repeat_n(' ', diff));
        output.extend(std::iter::repeat_n(BACKSPACE, diff));
    }

    Frame {
        output,
        semantic_len,
    }
}

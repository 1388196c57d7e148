//! Rendering of the optional percentage suffix.
//!
//! A percentage format is a standard numeric specifier: one letter followed by an
//! optional precision.
//!
//! | Specifier | Output for `0.35` |
//! |-----------|-------------------|
//! | `P0`      | `35%`             |
//! | `P1`      | `35.0%`           |
//! | `F3`      | `0.350`           |
//! | `E2`      | `3.50e-1`         |
//! | `G`       | `0.35`            |
//!
//! Unknown specifiers, including precisions above [`MAX_PRECISION`], are accepted
//! and rendered as `G`.

use std::str::FromStr;

/// Largest precision a specifier may request.
pub const MAX_PRECISION: usize = 32;

/// A parsed percentage format specifier.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PercentageFormat {
    /// Fraction multiplied by 100, followed by `%`.
    Percent(usize),
    /// Fixed-point fraction.
    Fixed(usize),
    /// Scientific notation.
    Exponent(usize),
    /// Shortest round-trip representation.
    General,
}

impl Default for PercentageFormat {
    fn default() -> Self {
        Self::Percent(0)
    }
}

/// Error returned when a specifier is not recognised.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[error("unsupported percentage format `{0}`")]
pub struct UnknownFormat(pub String);

impl FromStr for PercentageFormat {
    type Err = UnknownFormat;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let spec = spec.trim();
        let mut chars = spec.chars();
        let Some(letter) = chars.next() else {
            return Ok(Self::General);
        };

        let digits = chars.as_str();
        let precision = if digits.is_empty() {
            None
        } else {
            let precision = digits
                .parse::<usize>()
                .ok()
                .filter(|&p| p <= MAX_PRECISION)
                .ok_or_else(|| UnknownFormat(spec.to_owned()))?;
            Some(precision)
        };

        match letter.to_ascii_uppercase() {
            'P' => Ok(Self::Percent(precision.unwrap_or(0))),
            'F' | 'N' => Ok(Self::Fixed(precision.unwrap_or(2))),
            'E' => Ok(Self::Exponent(precision.unwrap_or(6))),
            'G' if precision.is_none() => Ok(Self::General),
            _ => Err(UnknownFormat(spec.to_owned())),
        }
    }
}

impl PercentageFormat {
    /// Parses `spec`, falling back to [`PercentageFormat::General`] when unsupported.
    pub fn parse_lossy(spec: &str) -> Self {
        spec.parse().unwrap_or(Self::General)
    }

    /// Formats a progress fraction.
    pub fn render(self, progress: f64) -> String {
        match self {
            Self::Percent(precision) => format!("{:.*}%", precision, progress * 100.0),
            Self::Fixed(precision) => format!("{progress:.precision$}"),
            Self::Exponent(precision) => format!("{progress:.precision$e}"),
            Self::General => format!("{progress}"),
        }
    }
}

//! Error types for bar configuration and rendering.

use std::io;

use thiserror::Error;

/// Errors raised by [`ProgressBar`](crate::ProgressBar) and its configuration.
#[derive(Error, Debug)]
pub enum BarError {
    /// A setter or constructor received a value outside its domain.
    ///
    /// The previous value is always left untouched.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the rejected parameter.
        name: &'static str,
        /// Human-readable explanation.
        reason: String,
    },

    /// `update` or `write` was called before [`start`](crate::ProgressBar::start)
    /// reserved a terminal row.
    #[error("progress bar has not been started; call `start` before rendering")]
    NotStarted,

    /// The progress fraction could not be turned into a fill count.
    #[error("cannot compute fill count from progress {progress}")]
    Computation {
        /// The offending fraction (NaN or infinite).
        progress: f64,
    },

    /// Terminal I/O failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl BarError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = BarError> = std::result::Result<T, E>;

/// Converts any integer into a `usize`, rejecting negative or oversized values.
pub(crate) fn to_width<N>(name: &'static str, value: N) -> Result<usize>
where
    N: TryInto<usize> + Copy + std::fmt::Display,
{
    value
        .try_into()
        .map_err(|_| BarError::invalid(name, format!("{value} is not a valid non-negative width")))
}

#[cfg(test)]
mod tests {
    use super::{BarError, to_width};

    #[test]
    fn test_to_width() {
        assert_eq!(to_width("len", 10i32).unwrap(), 10);
        assert_eq!(to_width("len", 0u8).unwrap(), 0);

        let err = to_width("len", -1i64).unwrap_err();
        assert!(matches!(err, BarError::InvalidArgument { name: "len", .. }));
        assert_eq!(
            err.to_string(),
            "invalid argument `len`: -1 is not a valid non-negative width"
        );
    }
}

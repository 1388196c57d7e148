//! Conversion of `(current, total)` pairs into a progress fraction.
//!
//! Every primitive number implements [`ProgressValue`], so
//! [`ProgressBar::update_ratio`](crate::ProgressBar::update_ratio) accepts any of
//! them. A zero total is not intercepted here: the resulting NaN or infinity is
//! rejected later when the fill count is computed.

/// A number that can act as a progress position or total.
pub trait ProgressValue: Copy {
    /// Lossy conversion to `f64`.
    fn to_f64(self) -> f64;
}

macro_rules! impl_progress_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ProgressValue for $ty {
                #[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_progress_value!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64
);

/// Computes `current / total` as a fraction.
#[must_use]
pub fn fraction<T: ProgressValue>(current: T, total: T) -> f64 {
    current.to_f64() / total.to_f64()
}

#[cfg(test)]
mod tests {
    use super::fraction;

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_fraction() {
        assert_eq!(fraction(35u8, 100u8), 0.35);
        assert_eq!(fraction(1usize, 4usize), 0.25);
        assert_eq!(fraction(-5i64, 10i64), -0.5);
        assert_eq!(fraction(0.5f32, 2.0f32), 0.25);
    }

    /// Division by a zero total propagates as a non-finite fraction.
    #[test]
    fn test_zero_total() {
        assert!(fraction(0u32, 0u32).is_nan());
        assert!(fraction(3u32, 0u32).is_infinite());
    }
}

//! Iterator adapter that redraws a bar as items are consumed.
//!
//! # Example
//!
//! ```ignore
//! use pinned_progress::{BarIteratorExt, ProgressBar};
//!
//! let bar = ProgressBar::new(Some("files"), 30, 8)?;
//! bar.start()?;
//! for file in files.iter().with_bar(bar) {
//!     // ...
//! }
//! ```

use crate::ProgressBar;

/// An iterator adapter that updates a [`ProgressBar`] after every item.
///
/// When the wrapped iterator reports an exact [`size_hint`](Iterator::size_hint) the
/// bar advances proportionally; otherwise it only jumps to full on exhaustion.
/// Rendering errors are logged and never interrupt iteration.
#[derive(Debug)]
pub struct BarIter<I> {
    iter: I,
    bar: ProgressBar,
    done: u64,
    total: Option<u64>,
    finished: bool,
}

impl<I: Iterator> BarIter<I> {
    /// Creates a new `BarIter`.
    ///
    /// Usually constructed via [`BarIteratorExt::with_bar`].
    pub fn new(iter: I, bar: ProgressBar) -> Self {
        let total = exact_len(&iter);
        Self {
            iter,
            bar,
            done: 0,
            total,
            finished: false,
        }
    }

    /// The bar driven by this iterator.
    pub const fn bar(&self) -> &ProgressBar {
        &self.bar
    }

    fn redraw(&self, progress: f64) {
        if let Err(err) = self.bar.update(progress) {
            tracing::warn!(%err, "progress bar update failed during iteration");
        }
    }
}

impl<I: Iterator> Iterator for BarIter<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.iter.next();

        match (&item, self.total) {
            (Some(_), Some(total)) => {
                self.done += 1;
                #[allow(clippy::cast_precision_loss)]
                self.redraw(self.done as f64 / total as f64);
            }
            (Some(_), None) => self.done += 1,
            (None, _) if !self.finished => {
                self.finished = true;
                self.redraw(1.0);
            }
            (None, _) => {}
        }

        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// Extension trait attaching a [`ProgressBar`] to any iterator.
pub trait BarIteratorExt: Iterator + Sized {
    /// Wraps the iterator so that `bar` is redrawn after every item.
    fn with_bar(self, bar: ProgressBar) -> BarIter<Self> {
        BarIter::new(self, bar)
    }
}

impl<I: Iterator> BarIteratorExt for I {}

fn exact_len<I: Iterator>(iter: &I) -> Option<u64> {
    match iter.size_hint() {
        (lower, Some(upper)) if lower == upper && upper > 0 => Some(upper as u64),
        _ => None,
    }
}

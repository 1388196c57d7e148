//! Where new bars get their terminal lock from.
//!
//! A [`BarContext`] holds the default [`TerminalLock`] handed to bars it constructs.
//! Replacing the default only affects bars built afterwards; existing bars keep the
//! lock they were created with.
//!
//! [`BarContext::global`] is the process-wide context used by
//! [`ProgressBar::new`](crate::ProgressBar::new). Code that wants construction to be
//! independent of global state creates its own context and builds bars from it.

use std::sync::OnceLock;

use parking_lot::RwLock;

use crate::{BarBuilder, ProgressBar, error::Result, lock::TerminalLock};

/// Factory for progress bars sharing a default terminal lock.
#[derive(Debug)]
pub struct BarContext {
    default_lock: RwLock<TerminalLock>,
}

static GLOBAL: OnceLock<BarContext> = OnceLock::new();

impl BarContext {
    /// Creates a context whose bars default to `lock`.
    #[must_use]
    pub fn new(lock: TerminalLock) -> Self {
        Self {
            default_lock: RwLock::new(lock),
        }
    }

    /// The process-wide context, defaulting to a lock over standard output.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(|| Self::new(TerminalLock::stdout()))
    }

    /// The lock that the next constructed bar will receive.
    #[must_use]
    pub fn default_lock(&self) -> TerminalLock {
        self.default_lock.read().clone()
    }

    /// Replaces the default lock for bars constructed from now on.
    pub fn set_default_lock(&self, lock: TerminalLock) {
        tracing::debug!("replacing default terminal lock");
        *self.default_lock.write() = lock;
    }

    /// Starts a builder pre-wired with this context's default lock.
    #[must_use]
    pub fn builder(&self) -> BarBuilder {
        BarBuilder::new().with_lock(self.default_lock())
    }

    /// Constructs a bar using this context's default lock.
    pub fn bar<L, S>(&self, text: Option<&str>, bar_length: L, text_space: S) -> Result<ProgressBar>
    where
        L: TryInto<usize> + Copy + std::fmt::Display,
        S: TryInto<usize> + Copy + std::fmt::Display,
    {
        let mut builder = self
            .builder()
            .with_bar_length(bar_length)?
            .with_text_space(text_space)?;
        if let Some(text) = text {
            builder = builder.with_text(text);
        }
        Ok(builder.build())
    }
}

//! I/O wrappers that drive a bar from a data transfer.
//!
//! [`BarReader`] and [`BarWriter`] wrap any [`std::io::Read`] or [`std::io::Write`].
//! Every successful call adds the transferred byte count to a running total and
//! redraws the bar at `transferred / total`. Once the inner call succeeds its byte
//! count is always returned; a failed redraw (unstarted bar, zero total) is logged
//! and never turns a completed transfer into an error.

use std::io::{self, Read, Write};

use crate::ProgressBar;

fn redraw(bar: &ProgressBar, transferred: u64, total: u64) {
    if let Err(err) = bar.update_ratio(transferred, total) {
        tracing::warn!(%err, transferred, total, "progress bar update failed during transfer");
    }
}

/// A wrapper around [`Read`] that advances a [`ProgressBar`] by bytes read.
#[derive(Debug)]
pub struct BarReader<R> {
    inner: R,
    bar: ProgressBar,
    transferred: u64,
    total: u64,
}

impl<R> BarReader<R> {
    /// Wraps `inner`, expecting `total` bytes. `bar` must already be started.
    pub const fn new(inner: R, bar: ProgressBar, total: u64) -> Self {
        Self {
            inner,
            bar,
            transferred: 0,
            total,
        }
    }

    /// Bytes read so far.
    pub const fn transferred(&self) -> u64 {
        self.transferred
    }

    /// Unwraps the inner reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for BarReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.transferred += n as u64;
        redraw(&self.bar, self.transferred, self.total);
        Ok(n)
    }
}

/// A wrapper around [`Write`] that advances a [`ProgressBar`] by bytes written.
#[derive(Debug)]
pub struct BarWriter<W> {
    inner: W,
    bar: ProgressBar,
    transferred: u64,
    total: u64,
}

impl<W> BarWriter<W> {
    /// Wraps `inner`, expecting `total` bytes. `bar` must already be started.
    pub const fn new(inner: W, bar: ProgressBar, total: u64) -> Self {
        Self {
            inner,
            bar,
            transferred: 0,
            total,
        }
    }

    /// Bytes written so far.
    pub const fn transferred(&self) -> u64 {
        self.transferred
    }

    /// Unwraps the inner writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for BarWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.transferred += n as u64;
        redraw(&self.bar, self.transferred, self.total);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

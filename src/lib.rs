//! # `pinned_progress`
//!
//! Line-stable terminal progress bars.
//!
//! A [`ProgressBar`] reserves one terminal row when started and from then on redraws
//! only that row, while the rest of the program keeps printing normally below it.
//! It is designed to be:
//!
//! * **Minimal-diff**: each redraw overwrites the previous one in place; a shorter
//!   line blanks out the stale tail instead of clearing the whole row.
//! * **Cursor-neutral**: the application's cursor is saved before a redraw and
//!   restored afterwards, so interleaved `println!`s keep appending where they were.
//! * **Concurrent**: bar handles are cheap to clone ([`Arc`](std::sync::Arc)-based)
//!   and safe to update from many threads. Bars sharing a [`TerminalLock`] never
//!   interleave their cursor jumps and writes.
//!
//! ## Modules
//!
//! * [`builder`]: Fluent interface for constructing [`ProgressBar`] instances.
//! * [`config`]: Appearance settings with validated setters.
//! * [`context`]: Default-lock holder used when constructing bars.
//! * [`error`]: The [`BarError`] taxonomy.
//! * [`format`]: Percentage format specifiers.
//! * [`io`]: Wrappers for [`std::io::Read`] and [`std::io::Write`] that drive a bar.
//! * [`iter`]: Extension trait driving a bar from an iterator.
//! * [`lock`]: Shared, reference-counted terminal locks.
//! * [`numeric`]: Generic `(current, total)` to fraction conversion.
//! * [`progress`]: The [`ProgressBar`] handle and its render protocol.
//! * [`render`]: Pure render-buffer composition.
//! * [`terminal`]: The terminal control surface and its implementations.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod builder;
pub mod config;
pub mod context;
pub mod error;
pub mod format;
pub mod io;
pub mod iter;
pub mod lock;
pub mod numeric;
pub mod progress;
pub mod render;
pub mod terminal;

pub use builder::BarBuilder;
pub use config::BarConfig;
pub use context::BarContext;
pub use error::{BarError, Result};
pub use format::PercentageFormat;
pub use io::{BarReader, BarWriter};
pub use iter::{BarIter, BarIteratorExt};
pub use lock::TerminalLock;
pub use numeric::ProgressValue;
pub use progress::ProgressBar;
pub use terminal::{CrosstermTerminal, Terminal, TerminalEvent, VirtualTerminal};

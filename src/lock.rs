//! Shared ownership of a terminal.
//!
//! A [`TerminalLock`] is a reference-counted mutex around a [`Terminal`]. Whoever
//! holds the guard may move the cursor and write. Bars that should cooperate on one
//! screen share a lock (cloning is an `Arc` bump); bars that write to unrelated
//! streams get distinct locks.

use std::{fmt, sync::Arc};

use parking_lot::{Mutex, MutexGuard};

use crate::terminal::{CrosstermTerminal, Terminal};

/// Boxed terminal as stored inside a lock.
pub type DynTerminal = Box<dyn Terminal + Send>;

/// A cloneable handle to a mutex guarding one terminal.
#[derive(Clone)]
pub struct TerminalLock {
    inner: Arc<Mutex<DynTerminal>>,
}

impl fmt::Debug for TerminalLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalLock")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish()
    }
}

impl TerminalLock {
    /// Wraps `terminal` in a new, unshared lock.
    pub fn new(terminal: impl Terminal + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(terminal))),
        }
    }

    /// A new lock over standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(CrosstermTerminal::stdout())
    }

    /// Acquires the lock, blocking until it is free.
    ///
    /// Code that prints to the same screen as a set of bars should write through
    /// this guard so its output never lands between a bar's cursor jump and its
    /// write.
    pub fn lock(&self) -> MutexGuard<'_, DynTerminal> {
        self.inner.lock()
    }

    /// Returns `true` if both handles guard the same terminal.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use super::TerminalLock;
    use crate::terminal::{Terminal as _, VirtualTerminal};

    #[test]
    fn test_identity() {
        let a = TerminalLock::new(VirtualTerminal::new());
        let b = a.clone();
        let c = TerminalLock::new(VirtualTerminal::new());

        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
    }

    /// Cooperating writers
    /// Whole lines written under the guard never interleave.
    #[test]
    fn test_guarded_writes() {
        let term = VirtualTerminal::new();
        let lock = TerminalLock::new(term.clone());
        let barrier = Arc::new(std::sync::Barrier::new(4));

        let handles: Vec<_> = (0..4)
            .map(|id| {
                let lock = lock.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    for _ in 0..25 {
                        let mut guard = lock.lock();
                        for c in format!("worker-{id}").chars() {
                            guard.write_str(&c.to_string()).unwrap();
                        }
                        guard.write_str("\n").unwrap();
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        let lines = term.lines();
        let written: Vec<_> = lines.iter().filter(|l| !l.is_empty()).collect();
        assert_eq!(written.len(), 100);
        assert!(written.iter().all(|l| l.starts_with("worker-") && l.len() == 8));
    }
}

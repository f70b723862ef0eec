//! Debug-only guard against nested table operations.
//!
//! `Table::set` updates the digest index and a bucket's chain as one
//! step, and calls user code (`Hash`, `Display`, `Eq`) while doing so.
//! If that user code reaches back into the same table, it would observe
//! the update half done. In debug builds the guard turns this into a
//! panic naming both operations; in release builds it compiles away.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-table busy marker. Public operations start with
/// `let _busy = self.busy.enter("set");`.
#[derive(Debug)]
pub(crate) struct BusyFlag {
    #[cfg(debug_assertions)]
    current: Cell<Option<&'static str>>,
    // The table is single-threaded; keep it !Send + !Sync.
    _nosend: PhantomData<*mut ()>,
}

impl BusyFlag {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            current: Cell::new(None),
            _nosend: PhantomData,
        }
    }

    /// Marks the table busy with `op` until the returned guard drops.
    /// In debug builds, panics if another operation is still running.
    #[inline]
    pub(crate) fn enter(&self, op: &'static str) -> Busy<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(running) = self.current.get() {
                panic!("table reentered: `{op}` called while `{running}` is running");
            }
            self.current.set(Some(op));
            return Busy { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            return Busy { _z: PhantomData };
        }
    }
}

impl Default for BusyFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard returned by [`BusyFlag::enter`].
pub(crate) struct Busy<'a> {
    #[cfg(debug_assertions)]
    owner: &'a BusyFlag,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            let prev = self.owner.current.take();
            debug_assert!(prev.is_some());
        }
    }
}

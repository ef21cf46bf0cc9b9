//! Revision counter - The monotonic clock every tag is measured against.

use std::cell::Cell;
use std::fmt;

/// A point on the global revision clock.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Revision(u64);

/// Revision reported by tags that never change.
pub const CONSTANT_REVISION: Revision = Revision(0);

/// Revision a fresh dirtyable tag starts at.
pub const INITIAL_REVISION: Revision = Revision(1);

thread_local! {
    static CURRENT_REVISION: Cell<Revision> = const { Cell::new(INITIAL_REVISION) };
}

/// Current value of the global revision clock.
pub fn current_revision() -> Revision {
    CURRENT_REVISION.with(|r| r.get())
}

/// Advance the clock and return the new revision.
pub(crate) fn bump() -> Revision {
    CURRENT_REVISION.with(|r| {
        let next = Revision(r.get().0 + 1);
        r.set(next);
        next
    })
}

impl Revision {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

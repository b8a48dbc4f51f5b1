//! Episode time model.
//!
//! # Design
//!
//! The environment is sampled at discrete epochs.  The epoch counter is the
//! canonical step index; each epoch snapshot carries its own continuous
//! episode time (seconds, the unit vertex time stamps are expressed in).
//!
//! Car schedules report `f64` arrival estimates, so continuous time stays
//! floating point while step bookkeeping stays integral.

use std::fmt;

// ── Epoch ─────────────────────────────────────────────────────────────────────

/// An absolute epoch counter within one episode.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Epoch(pub u64);

impl Epoch {
    pub const ZERO: Epoch = Epoch(0);

    /// Cast to `usize` for indexing into an epoch store.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The epoch after `self`.
    #[inline]
    pub fn next(self) -> Epoch {
        Epoch(self.0 + 1)
    }

    /// The epoch before `self`, or `None` at epoch zero.
    #[inline]
    pub fn prev(self) -> Option<Epoch> {
        self.0.checked_sub(1).map(Epoch)
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

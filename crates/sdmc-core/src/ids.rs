//! Strongly typed identifier wrappers.
//!
//! Numeric IDs are `Copy + Ord + Hash` so they can be used as map keys and
//! sorted collection elements without ceremony.  The inner integer is `pub` to
//! allow direct indexing into the vertex arena via `id.0 as usize`, but
//! callers should prefer the `.index()` helpers for clarity.
//!
//! Cars are identified by the string key the environment reports them under,
//! so [`CarId`] wraps a `String` instead.

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a space-time waypoint in the graph's vertex arena.
    /// Issued in strictly increasing order and never reused within an episode.
    pub struct VertexId(u32);
}

typed_id! {
    /// Identifier of a drone.  `DroneId(0)` is the single drone of an episode.
    pub struct DroneId(u32);
}

typed_id! {
    /// Car-local waypoint number.  Route waypoints are ordered by this value.
    pub struct WaypointId(u32);
}

impl FromStr for WaypointId {
    type Err = CoreError;

    /// Parse the trailing decimal digits of a waypoint identifier.
    ///
    /// Environments label waypoints as `"17"`, `"wp17"` or `"car3-17"`; all of
    /// these parse to `WaypointId(17)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits_at = s.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        s[digits_at..]
            .parse::<u32>()
            .map(WaypointId)
            .map_err(|_| CoreError::Parse(format!("invalid waypoint id {s:?}: no trailing number")))
    }
}

// ── CarId ─────────────────────────────────────────────────────────────────────

/// The environment's key for a car.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarId(pub String);

impl CarId {
    pub fn new(id: impl Into<String>) -> Self {
        CarId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CarId {
    fn from(s: &str) -> Self {
        CarId(s.to_owned())
    }
}

impl From<String> for CarId {
    fn from(s: String) -> Self {
        CarId(s)
    }
}

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

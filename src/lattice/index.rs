//! Typed indices.
//!
//! Team, job and day indices are 0-based positions in the scheduler's
//! entity lists. CNF variable indices are 1-based, matching the DIMACS
//! convention that the sign of a literal encodes its polarity.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! position_index {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub usize);

        impl $name {
            /// Position in the owning list.
            #[inline]
            pub fn get(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $label, self.0)
            }
        }
    };
}

position_index!(
    /// Position of a team in registration order.
    TeamIx,
    "team#"
);
position_index!(
    /// Position of a job in registration order.
    JobIx,
    "job#"
);
position_index!(
    /// Position of a day in the pay period.
    DayIx,
    "day#"
);

/// A CNF variable index (1-based, never zero, at most `i32::MAX`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarIx(u32);

impl VarIx {
    /// Largest representable index (DIMACS literals are signed 32-bit).
    pub const MAX: u32 = i32::MAX as u32;

    /// Wraps a raw index. Returns `None` for 0 or anything above [`VarIx::MAX`].
    pub fn new(raw: u32) -> Option<Self> {
        (raw > 0 && raw <= Self::MAX).then_some(Self(raw))
    }

    /// The raw 1-based index.
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Arena slot holding this variable.
    #[inline]
    pub(crate) fn slot(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Index of the variable stored at an arena slot.
    pub(crate) fn from_slot(slot: usize) -> Option<Self> {
        u32::try_from(slot + 1).ok().and_then(Self::new)
    }
}

impl fmt::Display for VarIx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

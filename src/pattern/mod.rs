//! Interleave patterns and the priority-ordered catalogue of legal topologies.
//!
//! An [`InterleavePattern`] names the exact slots that must all be populated
//! for one interleave topology to apply. A [`PriorityTable`] orders those
//! patterns by hardware preference; the first pattern fully satisfied by the
//! remaining DIMMs wins.
//!
//! # Module Structure
//!
//! - [`table`] - the validated catalogue and the built-in 2 × 3 table
//! - [`matcher`] - exact pattern matching and best-match selection

pub mod matcher;
pub mod table;

use std::fmt;

pub use matcher::{find_best_interleaving, match_pattern, Selection};
pub use table::{PriorityTable, TableConfig, TableEntry, PURLEY_TABLE};

/// Bitmap naming the slots required by one interleave topology.
///
/// The all-zero pattern requires nothing and is used only as the
/// end-of-table sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct InterleavePattern(u32);

impl InterleavePattern {
    /// End-of-table marker.
    pub const SENTINEL: InterleavePattern = InterleavePattern(0);

    /// Highest number of slots a pattern can name.
    pub const MAX_SLOTS: u32 = u32::BITS;

    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Number of DIMMs interleaved by this pattern (the "x" in x4, x6...).
    pub const fn width(&self) -> u32 {
        self.0.count_ones()
    }

    pub const fn is_sentinel(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if `slot` is required by this pattern.
    pub const fn contains(&self, slot: u32) -> bool {
        match self.0.checked_shr(slot) {
            Some(shifted) => shifted & 1 == 1,
            None => false,
        }
    }

    /// Returns a copy with `slot` no longer required.
    pub const fn without(self, slot: u32) -> Self {
        match 1u32.checked_shl(slot) {
            Some(bit) => Self(self.0 & !bit),
            None => self,
        }
    }
}

impl fmt::Display for InterleavePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#b} (x{})", self.0, self.width())
    }
}

//! Priority-ordered catalogue of interleave patterns.

use std::collections::HashSet;

use crate::error::{InterleaveError, Result};
use crate::topology::Topology;

use super::InterleavePattern;

/// One row of a hand-written pattern table: the declared width and the bits.
///
/// Rows are only built in `const` context, where a declared width that
/// disagrees with the number of bits set fails compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    ways: u32,
    pattern: InterleavePattern,
}

impl TableEntry {
    pub(crate) const fn new(ways: u32, bits: u32) -> Self {
        assert!(bits.count_ones() == ways, "declared width does not match pattern bits");
        Self {
            ways,
            pattern: InterleavePattern::new(bits),
        }
    }

    /// Declared interleave width of this row.
    pub const fn ways(&self) -> u32 {
        self.ways
    }

    pub const fn pattern(&self) -> InterleavePattern {
        self.pattern
    }
}

/// Interleave catalogue for two memory controllers with three channels each.
///
/// Wider sets come first. Among equal widths, pairs across memory controllers
/// on the same channel are preferred over pairs across channels.
pub const PURLEY_TABLE: [TableEntry; 22] = [
    TableEntry::new(6, 0b111111),
    TableEntry::new(4, 0b001111),
    TableEntry::new(4, 0b111100),
    TableEntry::new(4, 0b110011),
    // one whole controller
    TableEntry::new(3, 0b010101),
    TableEntry::new(3, 0b101010),
    // across memory controllers
    TableEntry::new(2, 0b000011),
    TableEntry::new(2, 0b001100),
    TableEntry::new(2, 0b110000),
    // across channels
    TableEntry::new(2, 0b000101),
    TableEntry::new(2, 0b001010),
    TableEntry::new(2, 0b010100),
    TableEntry::new(2, 0b101000),
    TableEntry::new(2, 0b010001),
    TableEntry::new(2, 0b100010),
    TableEntry::new(1, 0b000001),
    TableEntry::new(1, 0b000010),
    TableEntry::new(1, 0b000100),
    TableEntry::new(1, 0b001000),
    TableEntry::new(1, 0b010000),
    TableEntry::new(1, 0b100000),
    TableEntry::new(0, 0),
];

/// Ordered, validated set of interleave patterns for one topology.
///
/// Invariants upheld by every constructor:
/// - at least one pattern
/// - no pattern names a slot outside the topology
/// - no pattern appears twice
/// - widths never increase down the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityTable {
    topology: Topology,
    patterns: Vec<InterleavePattern>,
}

impl PriorityTable {
    /// Builds a table from patterns in preference order.
    ///
    /// Reading stops at the first [`InterleavePattern::SENTINEL`]; a
    /// non-sentinel pattern after it is rejected as unreachable.
    pub fn new<I>(topology: Topology, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = InterleavePattern>,
    {
        let topology = Topology::new(topology.controllers(), topology.channels_per_controller())?;
        let mut table: Vec<InterleavePattern> = Vec::new();
        let mut seen = HashSet::new();
        let mut terminated = false;

        for pattern in patterns {
            if pattern.is_sentinel() {
                terminated = true;
                continue;
            }
            if terminated {
                return Err(InterleaveError::InvalidParameter(format!(
                    "pattern {pattern} follows the end-of-table sentinel"
                )));
            }
            if pattern.bits() & !topology.full_mask() != 0 {
                return Err(InterleaveError::InvalidParameter(format!(
                    "pattern {pattern} names slots outside the {}x{} topology",
                    topology.controllers(),
                    topology.channels_per_controller()
                )));
            }
            if !seen.insert(pattern) {
                return Err(InterleaveError::InvalidParameter(format!(
                    "pattern {pattern} appears more than once"
                )));
            }
            if let Some(&previous) = table.last() {
                if pattern.width() > previous.width() {
                    return Err(InterleaveError::InvalidParameter(format!(
                        "pattern {pattern} is wider than the preceding {previous}"
                    )));
                }
            }
            table.push(pattern);
        }

        if table.is_empty() {
            return Err(InterleaveError::InvalidParameter(
                "interleave table has no patterns".to_string(),
            ));
        }

        Ok(Self {
            topology,
            patterns: table,
        })
    }

    /// Built-in table for two controllers with three channels each.
    pub fn purley() -> Self {
        Self {
            topology: Topology::TWO_BY_THREE,
            patterns: PURLEY_TABLE
                .iter()
                .map(|entry| entry.pattern)
                .take_while(|pattern| !pattern.is_sentinel())
                .collect(),
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Patterns in preference order, sentinel excluded.
    pub fn iter(&self) -> impl Iterator<Item = InterleavePattern> + '_ {
        self.patterns.iter().copied()
    }

    /// Widest interleave this table can form.
    pub fn max_width(&self) -> u32 {
        self.patterns.first().map_or(0, InterleavePattern::width)
    }
}

impl Default for PriorityTable {
    fn default() -> Self {
        Self::purley()
    }
}

/// Declarative form of a [`PriorityTable`], suitable for loading from a
/// platform configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableConfig {
    pub topology: Topology,
    pub patterns: Vec<InterleavePattern>,
}

impl TryFrom<TableConfig> for PriorityTable {
    type Error = InterleaveError;

    fn try_from(config: TableConfig) -> Result<Self> {
        PriorityTable::new(config.topology, config.patterns)
    }
}

impl From<&PriorityTable> for TableConfig {
    fn from(table: &PriorityTable) -> Self {
        Self {
            topology: table.topology,
            patterns: table.patterns.clone(),
        }
    }
}

//! Memory-controller topology and slot encoding.
//!
//! A platform exposes `controllers` integrated memory controllers, each
//! driving `channels_per_controller` channels with at most one persistent
//! memory DIMM per channel. Every (controller, channel) position maps to a
//! linear *slot index*; interleave patterns are bitmaps over those indices.
//!
//! For the default 2 × 3 layout the slots are arranged as:
//!
//! ```text
//!         IMC0       IMC1
//! CH0 | 0b000001 | 0b000010 |
//! CH1 | 0b000100 | 0b001000 |
//! CH2 | 0b010000 | 0b100000 |
//! ```

use crate::dimm::DimmLocation;
use crate::error::{InterleaveError, Result};
use crate::pattern::InterleavePattern;

/// Controller and channel counts of one socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "TopologyConfig"))]
pub struct Topology {
    controllers: u16,
    channels_per_controller: u16,
}

impl Topology {
    /// Two memory controllers with three channels each.
    pub const TWO_BY_THREE: Topology = Topology {
        controllers: 2,
        channels_per_controller: 3,
    };

    /// Creates a topology, rejecting empty layouts and layouts with more
    /// slots than an [`InterleavePattern`] can name.
    pub fn new(controllers: u16, channels_per_controller: u16) -> Result<Self> {
        if controllers == 0 || channels_per_controller == 0 {
            return Err(InterleaveError::InvalidParameter(format!(
                "topology {controllers}x{channels_per_controller} has no slots"
            )));
        }
        let slots = u32::from(controllers) * u32::from(channels_per_controller);
        if slots > InterleavePattern::MAX_SLOTS {
            return Err(InterleaveError::InvalidParameter(format!(
                "topology {controllers}x{channels_per_controller} needs {slots} slots, \
                 at most {} are supported",
                InterleavePattern::MAX_SLOTS
            )));
        }
        Ok(Self {
            controllers,
            channels_per_controller,
        })
    }

    pub const fn controllers(&self) -> u16 {
        self.controllers
    }

    pub const fn channels_per_controller(&self) -> u16 {
        self.channels_per_controller
    }

    /// Total number of slots addressed by this topology.
    pub const fn slot_count(&self) -> u32 {
        self.controllers as u32 * self.channels_per_controller as u32
    }

    /// Maps a (controller, channel) pair to its slot index.
    ///
    /// The channel is taken modulo the channels per controller and selects the
    /// row; the controller selects the offset within the row. Controller ids
    /// outside the topology are not checked: they either alias a slot of a
    /// later row (`slot_of(2, 0) == slot_of(0, 1)` for 2 x 3) or, on the last
    /// row, land past the slot range where no pattern names them.
    pub const fn slot_of(&self, controller_id: u16, channel_id: u16) -> u32 {
        let row = match channel_id.checked_rem(self.channels_per_controller) {
            Some(row) => row as u32,
            None => channel_id as u32,
        };
        self.controllers as u32 * row + controller_id as u32
    }

    /// Slot index of a DIMM.
    pub fn slot_of_dimm<D: DimmLocation + ?Sized>(&self, dimm: &D) -> u32 {
        self.slot_of(dimm.controller_id(), dimm.channel_id())
    }

    /// Bitmap with every slot of this topology set.
    pub const fn full_mask(&self) -> u32 {
        let slots = self.slot_count();
        if slots >= u32::BITS {
            u32::MAX
        } else {
            (1u32 << slots) - 1
        }
    }
}

/// Unvalidated wire form; deserialization goes through [`Topology::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct TopologyConfig {
    controllers: u16,
    channels_per_controller: u16,
}

#[cfg(feature = "serde")]
impl TryFrom<TopologyConfig> for Topology {
    type Error = InterleaveError;

    fn try_from(config: TopologyConfig) -> Result<Self> {
        Topology::new(config.controllers, config.channels_per_controller)
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::TWO_BY_THREE
    }
}

/// Bitmap of occupied slots.
///
/// Bit `i` is set when at least one DIMM sits in slot `i`. Slots at or above
/// 64 cannot be represented and are left out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Population(u64);

impl Population {
    pub const EMPTY: Population = Population(0);

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Builds the population bitmap of a DIMM collection.
    pub fn from_dimms<'a, D, I>(topology: &Topology, dimms: I) -> Self
    where
        D: DimmLocation + ?Sized + 'a,
        I: IntoIterator<Item = &'a D>,
    {
        dimms.into_iter().fold(Self::EMPTY, |population, dimm| {
            population.with_slot(topology.slot_of_dimm(dimm))
        })
    }

    /// Returns a copy with `slot` marked as occupied.
    pub const fn with_slot(self, slot: u32) -> Self {
        match 1u64.checked_shl(slot) {
            Some(bit) => Self(self.0 | bit),
            None => self,
        }
    }

    pub const fn bits(&self) -> u64 {
        self.0
    }

    pub const fn is_occupied(&self, slot: u32) -> bool {
        match 1u64.checked_shl(slot) {
            Some(bit) => self.0 & bit != 0,
            None => false,
        }
    }

    /// Number of distinct occupied slots.
    pub const fn occupied(&self) -> u32 {
        self.0.count_ones()
    }

    /// Returns true if every slot named by `pattern` is occupied.
    pub const fn covers(&self, pattern: InterleavePattern) -> bool {
        let required = pattern.bits() as u64;
        self.0 & required == required
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimm::Dimm;

    #[test]
    fn default_is_two_by_three() {
        let t = Topology::default();
        assert_eq!(t.controllers(), 2);
        assert_eq!(t.channels_per_controller(), 3);
        assert_eq!(t.slot_count(), 6);
        assert_eq!(t.full_mask(), 0x3F);
    }

    #[test]
    fn slot_layout_matches_hardware() {
        let t = Topology::default();
        assert_eq!(t.slot_of(0, 0), 0);
        assert_eq!(t.slot_of(1, 0), 1);
        assert_eq!(t.slot_of(0, 1), 2);
        assert_eq!(t.slot_of(1, 1), 3);
        assert_eq!(t.slot_of(0, 2), 4);
        assert_eq!(t.slot_of(1, 2), 5);
    }

    #[test]
    fn channel_wraps_modulo_channels_per_controller() {
        let t = Topology::default();
        assert_eq!(t.slot_of(0, 3), t.slot_of(0, 0));
        assert_eq!(t.slot_of(1, 5), t.slot_of(1, 2));
    }

    #[test]
    fn controller_out_of_range_leaves_the_slot_range() {
        let t = Topology::default();
        assert_eq!(t.slot_of(2, 2), 6);
        assert!(t.slot_of(2, 2) >= t.slot_count());
    }

    #[test]
    fn controller_out_of_range_aliases_next_row() {
        let t = Topology::default();
        assert_eq!(t.slot_of(2, 0), 2);
        assert_eq!(t.slot_of(2, 0), t.slot_of(0, 1));
        assert_eq!(t.slot_of(3, 1), t.slot_of(1, 2));
        assert!(t.slot_of(2, 0) < t.slot_count());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_validates_topology() {
        let ok: Topology =
            serde_json::from_str(r#"{ "controllers": 4, "channels_per_controller": 2 }"#).unwrap();
        assert_eq!(ok, Topology::new(4, 2).unwrap());
        assert!(serde_json::from_str::<Topology>(
            r#"{ "controllers": 0, "channels_per_controller": 3 }"#
        )
        .is_err());
        assert!(serde_json::from_str::<Topology>(
            r#"{ "controllers": 40, "channels_per_controller": 40 }"#
        )
        .is_err());
    }

    #[test]
    fn new_rejects_empty_topology() {
        assert!(matches!(
            Topology::new(0, 3),
            Err(InterleaveError::InvalidParameter(_))
        ));
        assert!(matches!(
            Topology::new(2, 0),
            Err(InterleaveError::InvalidParameter(_))
        ));
    }

    #[test]
    fn new_rejects_too_many_slots() {
        assert!(Topology::new(4, 8).is_ok());
        assert!(matches!(
            Topology::new(4, 9),
            Err(InterleaveError::InvalidParameter(_))
        ));
    }

    #[test]
    fn four_by_two_layout() {
        let t = Topology::new(4, 2).unwrap();
        assert_eq!(t.slot_of(3, 0), 3);
        assert_eq!(t.slot_of(0, 1), 4);
        assert_eq!(t.full_mask(), 0xFF);
    }

    #[test]
    fn population_from_dimms() {
        let t = Topology::default();
        let dimms = [Dimm::new(1, 0, 0), Dimm::new(2, 1, 2)];
        let p = Population::from_dimms(&t, &dimms);
        assert_eq!(p.bits(), 0b100001);
        assert!(p.is_occupied(0));
        assert!(p.is_occupied(5));
        assert!(!p.is_occupied(1));
        assert_eq!(p.occupied(), 2);
    }

    #[test]
    fn population_ignores_unrepresentable_slots() {
        let p = Population::EMPTY.with_slot(64).with_slot(3);
        assert_eq!(p.bits(), 0b1000);
        assert!(!p.is_occupied(64));
    }

    #[test]
    fn covers_requires_every_slot() {
        let p = Population::from_bits(0b001011);
        assert!(p.covers(InterleavePattern::new(0b000011)));
        assert!(!p.covers(InterleavePattern::new(0b001111)));
    }
}

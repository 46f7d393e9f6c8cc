//! Exact pattern matching and best-match selection.

use crate::dimm::DimmLocation;
use crate::error::{InterleaveError, Result};
use crate::topology::{Population, Topology};

use super::{InterleavePattern, PriorityTable};

/// DIMMs carved out by one pattern.
#[derive(Debug, Clone)]
pub struct Selection<'a, D: ?Sized> {
    pattern: InterleavePattern,
    dimms: Vec<&'a D>,
}

impl<'a, D: ?Sized> Selection<'a, D> {
    pub fn pattern(&self) -> InterleavePattern {
        self.pattern
    }

    pub fn dimms(&self) -> &[&'a D] {
        &self.dimms
    }

    pub fn len(&self) -> usize {
        self.dimms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimms.is_empty()
    }

    pub fn into_dimms(self) -> Vec<&'a D> {
        self.dimms
    }
}

/// Collects the DIMMs whose slot is named by `pattern`.
///
/// Returns `None` unless every slot of the pattern is populated: a partial
/// match is never usable since the hardware interleaves exactly the named
/// set. DIMMs in slots outside the pattern are left alone. Matched DIMMs keep
/// their order in `dimms`.
pub fn match_pattern<'a, D>(
    topology: &Topology,
    dimms: &[&'a D],
    pattern: InterleavePattern,
) -> Option<Vec<&'a D>>
where
    D: DimmLocation + ?Sized,
{
    let mut not_found = pattern;
    let mut matched = Vec::with_capacity(dimms.len());

    for &dimm in dimms {
        let slot = topology.slot_of_dimm(dimm);
        if pattern.contains(slot) {
            matched.push(dimm);
            not_found = not_found.without(slot);
        }
    }

    if not_found.is_sentinel() {
        Some(matched)
    } else {
        None
    }
}

/// Returns the DIMMs matched by the first table pattern they fully satisfy.
///
/// # Errors
///
/// [`InterleaveError::Aborted`] when no pattern matches, i.e. some DIMM sits
/// where no known topology can place it.
pub fn find_best_interleaving<'a, D>(
    table: &PriorityTable,
    dimms: &[&'a D],
) -> Result<Selection<'a, D>>
where
    D: DimmLocation + ?Sized,
{
    let topology = table.topology();

    for pattern in table.iter() {
        tracing::trace!(pattern = pattern.bits(), "interleave: trying pattern");
        if let Some(matched) = match_pattern(topology, dimms, pattern) {
            return Ok(Selection {
                pattern,
                dimms: matched,
            });
        }
    }

    let population = Population::from_dimms(topology, dimms.iter().copied());
    tracing::warn!(
        remaining = dimms.len(),
        population = population.bits(),
        "Interleaving match not found"
    );
    Err(InterleaveError::Aborted {
        remaining: dimms.len(),
        population: population.bits(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimm::Dimm;

    /// One DIMM per listed slot of the 2 x 3 layout, handle = slot.
    fn dimms_in_slots(slots: &[u32]) -> Vec<Dimm> {
        slots
            .iter()
            .map(|&slot| Dimm::new(slot, (slot % 2) as u16, (slot / 2) as u16))
            .collect()
    }

    fn handles(dimms: &[&Dimm]) -> Vec<u32> {
        dimms.iter().map(|d| d.handle()).collect()
    }

    #[test]
    fn full_match_returns_named_dimms_only() {
        let dimms = dimms_in_slots(&[0, 1, 2, 5]);
        let refs: Vec<&Dimm> = dimms.iter().collect();

        let matched =
            match_pattern(&Topology::default(), &refs, InterleavePattern::new(0x03)).unwrap();
        assert_eq!(handles(&matched), vec![0, 1]);
    }

    #[test]
    fn partial_match_is_discarded() {
        let dimms = dimms_in_slots(&[0, 1, 2]);
        let refs: Vec<&Dimm> = dimms.iter().collect();

        assert!(match_pattern(&Topology::default(), &refs, InterleavePattern::new(0x0F)).is_none());
    }

    #[test]
    fn matched_dimms_keep_list_order() {
        let dimms = dimms_in_slots(&[4, 2, 0]);
        let refs: Vec<&Dimm> = dimms.iter().collect();

        let matched =
            match_pattern(&Topology::default(), &refs, InterleavePattern::new(0x15)).unwrap();
        assert_eq!(handles(&matched), vec![4, 2, 0]);
    }

    #[test]
    fn shared_slot_pulls_in_every_occupant() {
        let a = Dimm::new(10, 0, 0);
        let b = Dimm::new(11, 0, 3);
        let refs = vec![&a, &b];

        let matched =
            match_pattern(&Topology::default(), &refs, InterleavePattern::new(0x01)).unwrap();
        assert_eq!(handles(&matched), vec![10, 11]);
    }

    #[test]
    fn empty_list_never_matches() {
        let refs: Vec<&Dimm> = Vec::new();
        assert!(match_pattern(&Topology::default(), &refs, InterleavePattern::new(0x01)).is_none());
    }

    #[test]
    fn best_match_takes_widest_pattern() {
        let dimms = dimms_in_slots(&[0, 1, 2, 3, 4, 5]);
        let refs: Vec<&Dimm> = dimms.iter().collect();

        let selection = find_best_interleaving(&PriorityTable::purley(), &refs).unwrap();
        assert_eq!(selection.pattern().bits(), 0x3F);
        assert_eq!(selection.len(), 6);
    }

    #[test]
    fn best_match_follows_table_order_within_a_width() {
        // {0,1,2,3,4} satisfies 0x0F before 0x3C or 0x33
        let dimms = dimms_in_slots(&[0, 1, 2, 3, 4]);
        let refs: Vec<&Dimm> = dimms.iter().collect();

        let selection = find_best_interleaving(&PriorityTable::purley(), &refs).unwrap();
        assert_eq!(selection.pattern().bits(), 0x0F);
        assert_eq!(handles(selection.dimms()), vec![0, 1, 2, 3]);
    }

    #[test]
    fn best_match_prefers_same_channel_pair() {
        // 0x03 (same channel) ranks above 0x05 (same controller)
        let dimms = dimms_in_slots(&[0, 1, 2]);
        let refs: Vec<&Dimm> = dimms.iter().collect();

        let selection = find_best_interleaving(&PriorityTable::purley(), &refs).unwrap();
        assert_eq!(selection.pattern().bits(), 0x03);
    }

    #[test]
    fn diagonal_slots_fall_back_to_single() {
        let dimms = dimms_in_slots(&[0, 3]);
        let refs: Vec<&Dimm> = dimms.iter().collect();

        let selection = find_best_interleaving(&PriorityTable::purley(), &refs).unwrap();
        assert_eq!(selection.pattern().bits(), 0x01);
        assert_eq!(handles(selection.dimms()), vec![0]);
    }

    #[test]
    fn unknown_slot_aborts() {
        let stray = Dimm::new(7, 2, 2);
        let refs = vec![&stray];

        let err = find_best_interleaving(&PriorityTable::purley(), &refs).unwrap_err();
        assert_eq!(
            err,
            InterleaveError::Aborted {
                remaining: 1,
                population: 1 << 6,
            }
        );
    }

    #[test]
    fn table_without_fallback_aborts() {
        let table = PriorityTable::new(
            Topology::default(),
            vec![InterleavePattern::new(0x03), InterleavePattern::new(0x0C)],
        )
        .unwrap();
        let dimms = dimms_in_slots(&[0, 2]);
        let refs: Vec<&Dimm> = dimms.iter().collect();

        let err = find_best_interleaving(&table, &refs).unwrap_err();
        assert!(matches!(err, InterleaveError::Aborted { remaining: 2, .. }));
    }
}

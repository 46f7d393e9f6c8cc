//! Interleave-set goal synthesis.
//!
//! [`GoalSynthesizer`] drives the whole grouping request:
//!
//! 1. Copy the input DIMMs into a bounded working list
//! 2. Pick the highest-priority pattern the working list fully satisfies
//! 3. Remove the matched DIMMs and charge them against the input count
//! 4. Ask the [`GoalFactory`] for a goal carrying the group's share of the
//!    requested size
//! 5. Repeat until the working list is empty
//!
//! # Capacity split
//!
//! Each group receives `requested × group_size / total_dimms`, truncated. The
//! remainders are not redistributed, so the goals can add up to less than the
//! request by at most `group_count - 1` units.

use crate::dimm::DimmLocation;
use crate::error::{InterleaveError, Result};
use crate::goal::{GoalFactory, GoalRequest};
use crate::list::{DimmList, MAX_DIMMS};
use crate::pattern::{find_best_interleaving, PriorityTable};


/// Splits DIMM populations into interleave sets and creates one goal per set.
#[derive(Debug, Clone)]
pub struct GoalSynthesizer {
    table: PriorityTable,
    max_dimms: usize,
}

impl GoalSynthesizer {
    /// Creates a synthesizer matching against `table`.
    pub fn new(table: PriorityTable) -> Self {
        Self {
            table,
            max_dimms: MAX_DIMMS,
        }
    }

    /// Sets the largest DIMM population a request may carry.
    pub fn with_max_dimms(mut self, max_dimms: usize) -> Self {
        self.max_dimms = max_dimms;
        self
    }

    pub fn table(&self) -> &PriorityTable {
        &self.table
    }

    pub fn max_dimms(&self) -> usize {
        self.max_dimms
    }

    /// Groups `dimms` into interleave sets and appends one goal per set to
    /// `goals`.
    ///
    /// Returns the number of goals appended. A request of size zero appends
    /// nothing and succeeds.
    ///
    /// # Errors
    ///
    /// - [`InterleaveError::InvalidParameter`] if a non-zero request carries
    ///   more DIMMs than [`max_dimms`](Self::max_dimms)
    /// - [`InterleaveError::Aborted`] if the remaining DIMMs match no pattern
    /// - [`InterleaveError::OutOfResources`] if the factory yields no goal
    /// - [`InterleaveError::BadBufferSize`] if more DIMMs were consumed than
    ///   supplied
    ///
    /// Goals appended before a failure stay in `goals`.
    pub fn synthesize<'a, D, F, I>(
        &self,
        factory: &mut F,
        request: &GoalRequest<'_, F::Template, F::Preferences>,
        dimms: I,
        goals: &mut Vec<F::Goal>,
        interleave_set_index: &mut u16,
    ) -> Result<usize>
    where
        D: DimmLocation + ?Sized + 'a,
        F: GoalFactory<D>,
        I: IntoIterator<Item = &'a D>,
    {
        if request.interleave_set_size() == 0 {
            tracing::debug!("interleave: zero-sized request, no goals created");
            return Ok(0);
        }

        let mut remaining = DimmList::from_dimms(dimms, self.max_dimms)?;

        let total = remaining.len();
        let mut consumed = 0;
        let mut created = 0;

        while !remaining.is_empty() {
            let selection = find_best_interleaving(&self.table, remaining.as_slice())?;

            remaining.remove_all(selection.dimms());
            consumed = charge_consumed(consumed, selection.len(), total)?;

            let size = share_of(request.interleave_set_size(), selection.len(), total);
            tracing::debug!(
                pattern = selection.pattern().bits(),
                ways = selection.len(),
                size = size,
                interleave_set_index = *interleave_set_index,
                remaining = remaining.len(),
                "interleave: selected set"
            );

            let goal = factory
                .create_goal(
                    request.template(),
                    selection.dimms(),
                    size,
                    request.preferences(),
                    request.sequence_index(),
                    interleave_set_index,
                )
                .ok_or_else(|| {
                    tracing::error!(created = created, "interleave: region goal creation failed");
                    InterleaveError::OutOfResources { created }
                })?;

            goals.push(goal);
            created += 1;
        }

        Ok(created)
    }
}

impl Default for GoalSynthesizer {
    fn default() -> Self {
        Self::new(PriorityTable::purley())
    }
}

/// Adds `used` to the running count, failing once it passes `available`.
fn charge_consumed(consumed: usize, used: usize, available: usize) -> Result<usize> {
    let consumed = consumed + used;
    if consumed > available {
        tracing::error!(
            consumed = consumed,
            available = available,
            "interleave: consumed more DIMMs than supplied"
        );
        return Err(InterleaveError::BadBufferSize {
            consumed,
            available,
        });
    }
    Ok(consumed)
}

/// Truncating proportional share: `requested × group / total`.
///
/// Computed in 128 bits so the product cannot wrap; the result never exceeds
/// `requested` because `group <= total`.
fn share_of(requested: u64, group: usize, total: usize) -> u64 {
    if total == 0 {
        return 0;
    }
    let share = u128::from(requested) * group as u128 / total as u128;
    u64::try_from(share).unwrap_or(u64::MAX)
}

//! Region goal materialization.
//!
//! The interleaving engine decides *which* DIMMs form each interleave set and
//! how much of the request each set carries. Building the goal record itself
//! is delegated to a [`GoalFactory`], so hosts can plug in their own goal
//! types. [`RegionGoalBuilder`] is the stock factory.

mod region;

pub use region::{
    DriverPreferences, InterleaveGranularity, PersistentMemoryType, RegionGoal,
    RegionGoalBuilder, RegionGoalTemplate,
};

use crate::dimm::DimmLocation;

/// Builds one region goal per interleave set.
///
/// # Associated Types
///
/// - `Template`: request-wide parameters shared by every goal of one request.
/// - `Preferences`: optional host configuration, passed through untouched.
/// - `Goal`: the record handed back to the caller.
///
/// # Contract
///
/// `create_goal` returns `None` when it cannot produce a goal (for example,
/// the host's goal table is full). It may advance `interleave_set_index`; the
/// engine threads the counter through without reading it. The DIMM slice is
/// only borrowed for the duration of the call.
pub trait GoalFactory<D: DimmLocation + ?Sized> {
    type Template;
    type Preferences;
    type Goal;

    fn create_goal(
        &mut self,
        template: &Self::Template,
        dimms: &[&D],
        size: u64,
        preferences: Option<&Self::Preferences>,
        sequence_index: u16,
        interleave_set_index: &mut u16,
    ) -> Option<Self::Goal>;
}

/// Request-wide inputs of one grouping call.
#[derive(Debug)]
pub struct GoalRequest<'r, T, P> {
    template: &'r T,
    preferences: Option<&'r P>,
    interleave_set_size: u64,
    sequence_index: u16,
}

impl<'r, T, P> GoalRequest<'r, T, P> {
    /// Creates a request for `interleave_set_size` capacity units split across
    /// the interleave sets found.
    pub fn new(template: &'r T, interleave_set_size: u64) -> Self {
        Self {
            template,
            preferences: None,
            interleave_set_size,
            sequence_index: 0,
        }
    }

    pub fn with_preferences(mut self, preferences: &'r P) -> Self {
        self.preferences = Some(preferences);
        self
    }

    pub fn with_sequence_index(mut self, sequence_index: u16) -> Self {
        self.sequence_index = sequence_index;
        self
    }

    pub fn template(&self) -> &'r T {
        self.template
    }

    pub fn preferences(&self) -> Option<&'r P> {
        self.preferences
    }

    pub fn interleave_set_size(&self) -> u64 {
        self.interleave_set_size
    }

    pub fn sequence_index(&self) -> u16 {
        self.sequence_index
    }
}

impl<T, P> Clone for GoalRequest<'_, T, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, P> Copy for GoalRequest<'_, T, P> {}

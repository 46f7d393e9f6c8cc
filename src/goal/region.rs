//! Stock region goal types and factory.

use std::fmt;

use crate::dimm::DimmLocation;
use crate::Id;

use super::GoalFactory;

/// Persistent memory flavour requested for a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PersistentMemoryType {
    #[default]
    AppDirect,
    AppDirectNotInterleaved,
}

impl fmt::Display for PersistentMemoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistentMemoryType::AppDirect => write!(f, "AppDirect"),
            PersistentMemoryType::AppDirectNotInterleaved => write!(f, "AppDirectNotInterleaved"),
        }
    }
}

/// Parameters shared by every goal of one provisioning request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionGoalTemplate {
    /// Capacity requested by the template as a whole; recorded on every goal
    /// derived from it.
    pub size: u64,
    pub memory_type: PersistentMemoryType,
}

/// Interleave granularity override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterleaveGranularity {
    #[default]
    Default,
    Bytes256,
    Kib4,
}

/// Host driver preferences recorded on each goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriverPreferences {
    pub imc_interleaving: InterleaveGranularity,
    pub channel_interleaving: InterleaveGranularity,
}

/// Provisioning descriptor for one interleave set.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionGoal {
    id: Id,
    dimm_handles: Vec<u32>,
    size: u64,
    template_size: u64,
    memory_type: PersistentMemoryType,
    interleave_set_index: u16,
    sequence_index: u16,
    preferences: Option<DriverPreferences>,
}

impl RegionGoal {
    /// Unique auto-generated identifier of this goal.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Handles of the interleaved DIMMs, in interleave order.
    pub fn dimm_handles(&self) -> &[u32] {
        &self.dimm_handles
    }

    /// Number of DIMMs interleaved by this goal.
    pub fn ways(&self) -> usize {
        self.dimm_handles.len()
    }

    /// Capacity allotted to this interleave set.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Capacity requested by the template this goal was derived from.
    pub fn template_size(&self) -> u64 {
        self.template_size
    }

    pub fn memory_type(&self) -> PersistentMemoryType {
        self.memory_type
    }

    pub fn interleave_set_index(&self) -> u16 {
        self.interleave_set_index
    }

    pub fn sequence_index(&self) -> u16 {
        self.sequence_index
    }

    pub fn preferences(&self) -> Option<&DriverPreferences> {
        self.preferences.as_ref()
    }
}

/// Stock [`GoalFactory`] producing [`RegionGoal`]s.
///
/// Each goal takes the current interleave-set index, which is then advanced.
/// An optional goal limit models a host goal table of fixed size: once it is
/// reached, further requests produce nothing.
#[derive(Debug, Clone, Default)]
pub struct RegionGoalBuilder {
    goal_limit: Option<usize>,
    created: usize,
}

impl RegionGoalBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of goals this builder will ever create.
    pub fn with_goal_limit(mut self, limit: usize) -> Self {
        self.goal_limit = Some(limit);
        self
    }

    /// Goals created so far.
    pub fn created(&self) -> usize {
        self.created
    }
}

impl<D> GoalFactory<D> for RegionGoalBuilder
where
    D: DimmLocation + ?Sized,
{
    type Template = RegionGoalTemplate;
    type Preferences = DriverPreferences;
    type Goal = RegionGoal;

    fn create_goal(
        &mut self,
        template: &RegionGoalTemplate,
        dimms: &[&D],
        size: u64,
        preferences: Option<&DriverPreferences>,
        sequence_index: u16,
        interleave_set_index: &mut u16,
    ) -> Option<RegionGoal> {
        if self.goal_limit.is_some_and(|limit| self.created >= limit) {
            return None;
        }

        let goal = RegionGoal {
            id: crate::generate_id(),
            dimm_handles: dimms.iter().map(|dimm| dimm.handle()).collect(),
            size,
            template_size: template.size,
            memory_type: template.memory_type,
            interleave_set_index: *interleave_set_index,
            sequence_index,
            preferences: preferences.copied(),
        };
        *interleave_set_index = interleave_set_index.wrapping_add(1);
        self.created += 1;
        Some(goal)
    }
}

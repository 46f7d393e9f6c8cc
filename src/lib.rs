//! dimm-interleave - persistent memory interleave-set planning
//!
//! Groups the persistent memory DIMMs of a socket into interleave sets
//! according to a priority-ordered catalogue of hardware topologies, and
//! creates one region goal per set carrying its share of the requested
//! capacity.
//!
//! # Example
//!
//! ```
//! use dimm_interleave::{
//!     Dimm, GoalRequest, GoalSynthesizer, RegionGoalBuilder, RegionGoalTemplate,
//! };
//!
//! // Both controllers populated on channels 0 and 1, plus IMC0 channel 2.
//! let dimms = [
//!     Dimm::new(0x0001, 0, 0),
//!     Dimm::new(0x0011, 1, 0),
//!     Dimm::new(0x0101, 0, 1),
//!     Dimm::new(0x0111, 1, 1),
//!     Dimm::new(0x0201, 0, 2),
//! ];
//!
//! let template = RegionGoalTemplate::default();
//! let request = GoalRequest::new(&template, 500);
//! let mut goals = Vec::new();
//! let mut interleave_set_index = 1;
//!
//! let created = GoalSynthesizer::default()
//!     .synthesize(
//!         &mut RegionGoalBuilder::new(),
//!         &request,
//!         &dimms,
//!         &mut goals,
//!         &mut interleave_set_index,
//!     )
//!     .unwrap();
//!
//! // A x4 set across both controllers, then the leftover DIMM on its own.
//! assert_eq!(created, 2);
//! assert_eq!(goals[0].ways(), 4);
//! assert_eq!(goals[0].size(), 400);
//! assert_eq!(goals[1].dimm_handles(), &[0x0201]);
//! assert_eq!(goals[1].size(), 100);
//! ```

pub mod dimm;
pub mod error;
pub mod goal;
pub mod list;
pub mod pattern;
pub mod synthesis;
pub mod topology;

pub use dimm::{Dimm, DimmLocation};
pub use error::{InterleaveError, Result};
pub use goal::{
    DriverPreferences, GoalFactory, GoalRequest, InterleaveGranularity, PersistentMemoryType,
    RegionGoal, RegionGoalBuilder, RegionGoalTemplate,
};
pub use list::{DimmList, MAX_DIMMS};
pub use pattern::{InterleavePattern, PriorityTable, TableConfig};
pub use synthesis::GoalSynthesizer;
pub use topology::{Population, Topology};

/// Identifier type used for region goals.
pub type Id = String;

/// Generates a new unique identifier (UUID v4).
pub fn generate_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}

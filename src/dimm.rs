//! DIMM abstraction consumed by the interleaving engine.
//!
//! The engine never owns or mutates DIMMs. It reads their location, tracks
//! them by reference while carving out interleave sets, and hands subsets of
//! those references to the goal factory.

use std::fmt::Debug;

/// A persistent memory module installed at a controller/channel position.
///
/// # Example
///
/// ```ignore
/// use dimm_interleave::DimmLocation;
///
/// #[derive(Debug)]
/// struct InventoryEntry {
///     handle: u32,
///     imc: u16,
///     channel: u16,
///     serial: String,
/// }
///
/// impl DimmLocation for InventoryEntry {
///     fn handle(&self) -> u32 { self.handle }
///     fn controller_id(&self) -> u16 { self.imc }
///     fn channel_id(&self) -> u16 { self.channel }
/// }
/// ```
pub trait DimmLocation: Debug {
    /// Platform handle recorded in the goals built for this DIMM.
    fn handle(&self) -> u32;

    /// Memory controller (iMC) the DIMM is attached to.
    fn controller_id(&self) -> u16;

    /// Channel within the controller. Values past the channel count wrap.
    fn channel_id(&self) -> u16;
}

/// Plain DIMM record carrying only what the engine needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimm {
    handle: u32,
    controller_id: u16,
    channel_id: u16,
}

impl Dimm {
    pub const fn new(handle: u32, controller_id: u16, channel_id: u16) -> Self {
        Self {
            handle,
            controller_id,
            channel_id,
        }
    }
}

impl DimmLocation for Dimm {
    fn handle(&self) -> u32 {
        self.handle
    }

    fn controller_id(&self) -> u16 {
        self.controller_id
    }

    fn channel_id(&self) -> u16 {
        self.channel_id
    }
}

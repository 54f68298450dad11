//! Events produced by a simulation tick
//!
//! The scene never calls back into gameplay from inside the solver. Instead
//! every tick returns a [`StepResult`] and the caller dispatches in order.

use rift_math::Vec3;

use crate::body::{BodyTag, ObjectHandle};

/// A body overlapping a trigger sensor this tick.
///
/// Reported every tick while the overlap holds, not just on entry. Ordering
/// is deterministic: ascending listener index, then ascending subject tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerOverlap {
    /// Index of the trigger listener whose volume is overlapped
    pub listener: usize,
    /// Identity of the overlapping body
    pub subject: BodyTag,
    /// World-space center of the overlapping body
    pub subject_position: Vec3,
}

/// A solid contact that started this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    /// First participant
    pub first: BodyTag,
    /// Second participant
    pub second: BodyTag,
}

/// A dynamic body carried through an open portal this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortalTransfer {
    /// The transferred object
    pub object: ObjectHandle,
    /// Identity of the transferred body
    pub tag: BodyTag,
    /// Portal the body entered (0 or 1)
    pub entered_portal: usize,
    /// Room the body ended up in
    pub new_room: usize,
}

/// Everything one simulation tick produced, in dispatch order
#[derive(Debug, Clone, Default)]
pub struct StepResult {
    /// Bodies inside trigger volumes this tick
    pub trigger_overlaps: Vec<TriggerOverlap>,
    /// Solid contacts that started this tick
    pub contacts: Vec<ContactEvent>,
    /// Portal transfers that happened this tick
    pub transfers: Vec<PortalTransfer>,
}

impl StepResult {
    /// Whether the tick produced no events at all
    pub fn is_empty(&self) -> bool {
        self.trigger_overlaps.is_empty() && self.contacts.is_empty() && self.transfers.is_empty()
    }

    /// Overlaps for a single listener, in report order
    pub fn overlaps_for(&self, listener: usize) -> impl Iterator<Item = &TriggerOverlap> {
        self.trigger_overlaps
            .iter()
            .filter(move |o| o.listener == listener)
    }
}

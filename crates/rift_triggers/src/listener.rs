//! Runtime trigger listener
//!
//! Owns one authored [`Trigger`], registers its sensor volume with the
//! collision scene, and turns overlap reports into ordered rule fires. The
//! sensor collider is slightly generous, so the listener re-checks true
//! containment against the authored half extents before dispatching.

use rift_math::Vec3;
use rift_physics::{BodyTag, CollisionScene, TriggerOverlap};

use crate::trigger::{CutsceneId, SubjectKind, Trigger};

/// Decor type of a tracked cube
pub const DECOR_CUBE: u32 = 0;
/// Decor type of an untracked cube (visually identical, not scripted)
pub const DECOR_CUBE_UNTRACKED: u32 = 1;

/// Classify a body for rule matching. Player identity wins over everything;
/// both cube decor types count as cubes.
pub fn classify(tag: BodyTag) -> SubjectKind {
    match tag {
        BodyTag::Player => SubjectKind::Player,
        BodyTag::Cube { .. } => SubjectKind::Cube,
        BodyTag::Decor { decor_type, .. }
            if decor_type == DECOR_CUBE || decor_type == DECOR_CUBE_UNTRACKED =>
        {
            SubjectKind::Cube
        }
        _ => SubjectKind::None,
    }
}

/// A rule that fired this tick, in dispatch order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleFire {
    /// Index of the trigger whose rule fired
    pub trigger: usize,
    /// Index of the rule within the trigger
    pub rule: usize,
    /// Signal to send, if the rule carries one
    pub signal: Option<u32>,
    /// Cutscene to hand to the director, always dispatched
    pub cutscene: CutsceneId,
}

/// Runtime listener for one trigger
pub struct TriggerListener {
    trigger: Trigger,
    index: usize,
    center: Vec3,
    half_extents: Vec3,
}

impl TriggerListener {
    pub fn new(trigger: Trigger, index: usize) -> Self {
        let center = trigger.volume.center();
        let half_extents = trigger.volume.half_extents();
        Self {
            trigger,
            index,
            center,
            half_extents,
        }
    }

    /// Listener index, matching the collision scene's listener order
    pub fn index(&self) -> usize {
        self.index
    }

    /// The authored trigger this listener serves
    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    /// Register the sensor volume with the collision scene. Must be called
    /// in ascending listener index order.
    pub fn register(&self, scene: &mut CollisionScene) {
        scene.add_trigger_volume(self.center, self.half_extents, self.index);
    }

    /// Convert one overlap report into rule fires, appended to `out` in rule
    /// order.
    ///
    /// An overlapping body whose center sits outside the authored half
    /// extents on any axis is dropped entirely.
    pub fn process(&self, overlap: &TriggerOverlap, out: &mut Vec<RuleFire>) {
        let offset = overlap.subject_position - self.center;
        if offset.x.abs() > self.half_extents.x
            || offset.y.abs() > self.half_extents.y
            || offset.z.abs() > self.half_extents.z
        {
            return;
        }

        let kind = classify(overlap.subject);
        for (rule_index, rule) in self.trigger.rules.iter().enumerate() {
            if rule.subject != kind {
                continue;
            }
            log::trace!(
                "trigger {} rule {} fired for {:?}",
                self.index,
                rule_index,
                overlap.subject
            );
            out.push(RuleFire {
                trigger: self.index,
                rule: rule_index,
                signal: rule.signal,
                cutscene: rule.cutscene,
            });
        }
    }
}

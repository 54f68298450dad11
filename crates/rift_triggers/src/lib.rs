//! # rift_triggers - Trigger volumes and rule dispatch
//!
//! A level authors static [`Trigger`]s: a box volume plus an ordered list of
//! rules, each naming what kind of body it reacts to, an optional signal to
//! send, and a cutscene to start. At runtime a [`TriggerListener`] owns one
//! trigger, registers a sensor volume with the collision scene, and converts
//! the scene's overlap reports into ordered [`RuleFire`] actions for the
//! orchestrator to dispatch.

pub mod listener;
pub mod trigger;

pub use listener::{classify, RuleFire, TriggerListener, DECOR_CUBE, DECOR_CUBE_UNTRACKED};
pub use trigger::{CutsceneId, SubjectKind, Trigger, TriggerRule};

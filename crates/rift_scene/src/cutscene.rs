//! Cutscene dispatch collaborator

pub use rift_triggers::CutsceneId;

/// Runs authored cutscenes. The scene hands over every cutscene id a trigger
/// rule carries, including [`CutsceneId::NONE`]; the director decides what to
/// ignore.
pub trait CutsceneDirector {
    /// Start (or queue) a cutscene. `context` is the index of the trigger
    /// that fired it.
    fn trigger(&mut self, cutscene: CutsceneId, context: usize);

    /// Advance running cutscenes by one frame
    fn update(&mut self);
}

/// Ignores every cutscene
#[derive(Debug, Default)]
pub struct NullCutsceneDirector;

impl CutsceneDirector for NullCutsceneDirector {
    fn trigger(&mut self, _cutscene: CutsceneId, _context: usize) {}
    fn update(&mut self) {}
}

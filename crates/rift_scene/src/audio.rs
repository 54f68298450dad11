//! Sound playback collaborator

/// Identifier of an authored sound effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundId(pub u32);

/// Sounds the scene core fires
pub mod sounds {
    use super::SoundId;

    pub const PORTAL_OPEN: SoundId = SoundId(0);
    pub const PORTAL_ENTER: SoundId = SoundId(1);
    pub const CUBE_IMPACT: SoundId = SoundId(2);
    pub const BUTTON_PRESS: SoundId = SoundId(3);
    pub const DOOR_MOVE: SoundId = SoundId(4);
}

/// Fire-and-forget sound playback. Implementations own mixing and channel
/// limits; the scene never waits on playback.
pub trait SoundPlayer {
    fn play(&mut self, sound: SoundId, volume: f32, pitch: f32);
}

/// Discards every sound
#[derive(Debug, Default)]
pub struct NullSoundPlayer;

impl SoundPlayer for NullSoundPlayer {
    fn play(&mut self, _sound: SoundId, _volume: f32, _pitch: f32) {}
}

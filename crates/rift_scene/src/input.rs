//! Input polling collaborator

use rift_math::Vec2;

/// Button bit masks
pub mod buttons {
    /// Fire the orange portal (index 0)
    pub const FIRE_PORTAL_0: u32 = 1 << 0;
    /// Fire the blue portal (index 1)
    pub const FIRE_PORTAL_1: u32 = 1 << 1;
    /// Grab or release a cube
    pub const INTERACT: u32 = 1 << 2;
    /// Jump
    pub const JUMP: u32 = 1 << 3;
}

/// Polled controller state. The scene reads it once per frame during the
/// player and portal-fire updates.
pub trait InputSource {
    /// Whether any button in `mask` was pressed this frame
    fn button_pressed(&self, player: usize, mask: u32) -> bool;

    /// Movement axes in [-1, 1], x strafes and y walks forward
    fn move_axes(&self, player: usize) -> Vec2 {
        let _ = player;
        Vec2::ZERO
    }

    /// Look delta in radians (yaw, pitch) for this frame
    fn look_delta(&self, player: usize) -> Vec2 {
        let _ = player;
        Vec2::ZERO
    }
}

/// No buttons, no movement
#[derive(Debug, Default)]
pub struct NullInputSource;

impl InputSource for NullInputSource {
    fn button_pressed(&self, _player: usize, _mask: u32) -> bool {
        false
    }
}

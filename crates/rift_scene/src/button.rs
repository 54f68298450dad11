//! Floor button entity

use rift_math::{Transform, Vec3};
use rift_physics::{BodyTag, CollisionLayers, CollisionScene};

use crate::audio::{sounds, SoundPlayer};
use crate::signals::SignalSet;

const BUTTON_RADIUS: f32 = 0.5;
const BUTTON_HEIGHT: f32 = 0.1;
/// Vertical slack above the pad that still counts as standing on it
const PRESS_HEIGHT: f32 = 0.6;

/// A pad that sends its signal every frame something heavy stands on it
pub struct Button {
    position: Vec3,
    signal: u32,
    pressed: bool,
}

impl Button {
    /// Register the pad's collision with the scene
    pub fn new(physics: &mut CollisionScene, index: usize, position: Vec3, room: usize, signal: u32) -> Self {
        physics.add_static_box(
            Transform::from_position(position),
            Vec3::new(BUTTON_RADIUS, BUTTON_HEIGHT, BUTTON_RADIUS),
            BodyTag::Button {
                index: index as u32,
            },
            CollisionLayers::static_no_portal(),
            room,
        );
        Self {
            position,
            signal,
            pressed: false,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Whether a body centered at `point` presses the pad
    fn presses(&self, point: Vec3) -> bool {
        let offset = point - self.position;
        offset.x.abs() <= BUTTON_RADIUS
            && offset.z.abs() <= BUTTON_RADIUS
            && offset.y >= 0.0
            && offset.y <= PRESS_HEIGHT
    }

    /// Send the signal while the player or a cube stands on the pad.
    /// `weights` are the centers of every body heavy enough to press.
    pub fn update(
        &mut self,
        weights: &[Vec3],
        signals: &mut SignalSet,
        sound_player: &mut dyn SoundPlayer,
    ) {
        let pressed = weights.iter().any(|&p| self.presses(p));
        if pressed {
            signals.send(self.signal);
        }
        if pressed && !self.pressed {
            sound_player.play(sounds::BUTTON_PRESS, 1.0, 1.0);
        }
        self.pressed = pressed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullSoundPlayer;

    fn button() -> (CollisionScene, Button) {
        let mut physics = CollisionScene::default();
        let button = Button::new(&mut physics, 0, Vec3::new(3.0, 0.0, 0.0), 0, 2);
        (physics, button)
    }

    #[test]
    fn test_standing_weight_sends_signal() {
        let (_physics, mut button) = button();
        let mut signals = SignalSet::new(4);
        let mut sound_player = NullSoundPlayer;

        button.update(&[Vec3::new(3.1, 0.3, 0.0)], &mut signals, &mut sound_player);
        assert!(button.is_pressed());
        assert!(signals.is_active(2));

        // Signal is per frame: reset clears it until the next update
        signals.reset();
        assert!(!signals.is_active(2));
        button.update(&[Vec3::new(3.1, 0.3, 0.0)], &mut signals, &mut sound_player);
        assert!(signals.is_active(2));
    }

    #[test]
    fn test_nothing_on_pad_sends_nothing() {
        let (_physics, mut button) = button();
        let mut signals = SignalSet::new(4);
        let mut sound_player = NullSoundPlayer;

        button.update(&[Vec3::new(10.0, 0.0, 0.0)], &mut signals, &mut sound_player);
        assert!(!button.is_pressed());
        assert!(!signals.is_active(2));
    }

    #[test]
    fn test_weight_beside_pad_does_not_press() {
        let (_physics, mut button) = button();
        let mut signals = SignalSet::new(4);
        let mut sound_player = NullSoundPlayer;

        // Within height range but outside the pad footprint
        button.update(&[Vec3::new(4.0, 0.3, 0.0)], &mut signals, &mut sound_player);
        assert!(!button.is_pressed());
    }
}

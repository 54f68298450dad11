//! Door entity

use rift_math::{Transform, Vec3};
use rift_physics::{BodyTag, CollisionLayers, CollisionScene, StaticHandle};

use crate::audio::{sounds, SoundPlayer};
use crate::signals::SignalSet;

const DOOR_HALF_EXTENTS: Vec3 = Vec3::new(0.7, 1.0, 0.1);
/// Open/close speed in fraction of travel per tick
const DOOR_SPEED: f32 = 1.0 / 12.0;
/// Above this open fraction the panel stops blocking
const PASSABLE_THRESHOLD: f32 = 0.9;

/// A sliding panel driven by a signal: open while the signal is active,
/// closed otherwise
pub struct Door {
    transform: Transform,
    signal: u32,
    collider: StaticHandle,
    open_amount: f32,
    passable: bool,
}

impl Door {
    pub fn new(
        physics: &mut CollisionScene,
        index: usize,
        transform: Transform,
        room: usize,
        signal: u32,
    ) -> Self {
        let collider = physics.add_static_box(
            transform,
            DOOR_HALF_EXTENTS,
            BodyTag::Door {
                index: index as u32,
            },
            CollisionLayers::static_no_portal(),
            room,
        );
        Self {
            transform,
            signal,
            collider,
            open_amount: 0.0,
            passable: false,
        }
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Open fraction in [0, 1], for rendering the panel position
    pub fn open_amount(&self) -> f32 {
        self.open_amount
    }

    pub fn is_passable(&self) -> bool {
        self.passable
    }

    /// Advance the panel toward its signal's state and toggle the collider
    /// when it crosses the passable threshold.
    pub fn update(
        &mut self,
        signals: &SignalSet,
        physics: &mut CollisionScene,
        sound_player: &mut dyn SoundPlayer,
    ) {
        let target = if signals.is_active(self.signal) { 1.0 } else { 0.0 };
        if (self.open_amount - target).abs() < f32::EPSILON {
            return;
        }

        if self.open_amount == 0.0 || self.open_amount == 1.0 {
            sound_player.play(sounds::DOOR_MOVE, 1.0, 1.0);
        }
        self.open_amount = if target > self.open_amount {
            (self.open_amount + DOOR_SPEED).min(1.0)
        } else {
            (self.open_amount - DOOR_SPEED).max(0.0)
        };

        let passable = self.open_amount >= PASSABLE_THRESHOLD;
        if passable != self.passable {
            physics.set_static_enabled(self.collider, !passable);
            self.passable = passable;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullSoundPlayer;

    #[test]
    fn test_door_opens_while_signal_active() {
        let mut physics = CollisionScene::default();
        let mut door = Door::new(&mut physics, 0, Transform::IDENTITY, 0, 1);
        let mut signals = SignalSet::new(4);
        let mut sound_player = NullSoundPlayer;

        signals.send(1);
        for _ in 0..60 {
            door.update(&signals, &mut physics, &mut sound_player);
        }

        assert!((door.open_amount() - 1.0).abs() < 1e-6);
        assert!(door.is_passable());
    }

    #[test]
    fn test_door_closes_when_signal_drops() {
        let mut physics = CollisionScene::default();
        let mut door = Door::new(&mut physics, 0, Transform::IDENTITY, 0, 1);
        let mut signals = SignalSet::new(4);
        let mut sound_player = NullSoundPlayer;

        signals.send(1);
        for _ in 0..60 {
            door.update(&signals, &mut physics, &mut sound_player);
        }
        signals.reset();
        for _ in 0..60 {
            door.update(&signals, &mut physics, &mut sound_player);
        }

        assert_eq!(door.open_amount(), 0.0);
        assert!(!door.is_passable());
    }

    #[test]
    fn test_door_stays_shut_without_signal() {
        let mut physics = CollisionScene::default();
        let mut door = Door::new(&mut physics, 0, Transform::IDENTITY, 0, 1);
        let signals = SignalSet::new(4);
        let mut sound_player = NullSoundPlayer;

        door.update(&signals, &mut physics, &mut sound_player);
        assert_eq!(door.open_amount(), 0.0);
        assert!(!door.is_passable());
    }
}

//! Authored level data
//!
//! Loaded once from JSON, read-only at runtime. Every cross-reference
//! (slot ranges, rooms, signals) is validated at load so the rest of the
//! engine can index without checking.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use rift_math::{Transform, Vec2, Vec3};
use rift_triggers::Trigger;

/// Level data errors
#[derive(Debug, Error)]
pub enum LevelError {
    /// Malformed JSON
    #[error("failed to parse level data: {0}")]
    Parse(#[from] serde_json::Error),

    /// A quad's slot range points outside the slot table
    #[error("quad {quad} slot range {min}..{max} exceeds slot table of {len}")]
    InvalidSlotRange {
        quad: usize,
        min: usize,
        max: usize,
        len: usize,
    },

    /// A room index out of range
    #[error("room index {room} out of range ({rooms} rooms)")]
    InvalidRoom { room: usize, rooms: usize },

    /// A signal index out of range
    #[error("signal index {signal} out of range ({signals} signals)")]
    InvalidSignal { signal: u32, signals: usize },

    /// More rooms than the visibility masks can address
    #[error("{rooms} rooms exceed the {max} a visibility mask can address")]
    TooManyRooms { rooms: usize, max: usize },
}

/// Contiguous range of portal slots belonging to one quad
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SlotRange {
    pub min: usize,
    pub max: usize,
}

impl SlotRange {
    /// Empty range: the quad hosts no portals
    pub const EMPTY: Self = Self { min: 0, max: 0 };

    pub fn is_empty(&self) -> bool {
        self.min >= self.max
    }
}

/// A designer-authored sub-rectangle of a quad, in quad-local 2D coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PortalSlot {
    pub min: Vec2,
    pub max: Vec2,
}

/// One flat collision quad of the level.
///
/// The quad plane spans local +X/+Y of `transform`; the surface normal is
/// the transform's forward direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelQuad {
    pub transform: Transform,
    pub half_width: f32,
    pub half_height: f32,
    pub room: usize,
    /// Whether portals may ever land on this quad
    pub portalable: bool,
    /// Portal slots carved into this quad
    pub slots: SlotRange,
}

impl LevelQuad {
    /// Project a world-space point into quad-local 2D coordinates
    pub fn to_local_2d(&self, point: Vec3) -> Vec2 {
        let local = self.transform.inverse().transform_point(point);
        Vec2::new(local.x, local.y)
    }
}

/// A floor button definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ButtonDef {
    pub position: Vec3,
    pub room: usize,
    /// Signal sent while the button is pressed
    pub signal: u32,
}

/// A door definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoorDef {
    pub transform: Transform,
    pub room: usize,
    /// Signal that holds the door open
    pub signal: u32,
}

/// A cube spawn definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CubeDef {
    pub transform: Transform,
    pub room: usize,
}

/// Complete authored level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelData {
    /// Number of rooms
    pub rooms: usize,
    /// Per room, a bitmask of which rooms are potentially visible from it.
    /// A room always sees itself.
    pub room_visibility: Vec<u64>,
    /// Number of signals the level wires up
    pub signals: usize,
    /// Flat collision quads
    pub quads: Vec<LevelQuad>,
    /// Global portal slot table, indexed by [`SlotRange`]s
    pub slots: Vec<PortalSlot>,
    /// Triggers in listener index order
    pub triggers: Vec<Trigger>,
    pub buttons: Vec<ButtonDef>,
    pub doors: Vec<DoorDef>,
    pub cubes: Vec<CubeDef>,
    /// Where the player spawns
    pub player_start: Transform,
    pub player_start_room: usize,
}

impl LevelData {
    /// Parse and validate a level from JSON
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: LevelData = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    /// Room count limit imposed by the u64 visibility masks
    pub const MAX_ROOMS: usize = u64::BITS as usize;

    /// Check every cross-reference
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.rooms > Self::MAX_ROOMS {
            return Err(LevelError::TooManyRooms {
                rooms: self.rooms,
                max: Self::MAX_ROOMS,
            });
        }
        let check_room = |room: usize| {
            if room >= self.rooms {
                Err(LevelError::InvalidRoom {
                    room,
                    rooms: self.rooms,
                })
            } else {
                Ok(())
            }
        };
        let check_signal = |signal: u32| {
            if signal as usize >= self.signals {
                Err(LevelError::InvalidSignal {
                    signal,
                    signals: self.signals,
                })
            } else {
                Ok(())
            }
        };

        for (index, quad) in self.quads.iter().enumerate() {
            check_room(quad.room)?;
            if quad.slots.max > self.slots.len() || quad.slots.min > quad.slots.max {
                return Err(LevelError::InvalidSlotRange {
                    quad: index,
                    min: quad.slots.min,
                    max: quad.slots.max,
                    len: self.slots.len(),
                });
            }
        }
        for button in &self.buttons {
            check_room(button.room)?;
            check_signal(button.signal)?;
        }
        for door in &self.doors {
            check_room(door.room)?;
            check_signal(door.signal)?;
        }
        for cube in &self.cubes {
            check_room(cube.room)?;
        }
        for trigger in &self.triggers {
            for rule in &trigger.rules {
                if let Some(signal) = rule.signal {
                    check_signal(signal)?;
                }
            }
        }
        check_room(self.player_start_room)?;
        Ok(())
    }

    /// Whether `room` is potentially visible from `from`
    pub fn room_visible(&self, from: usize, room: usize) -> bool {
        if from == room {
            return true;
        }
        if room >= Self::MAX_ROOMS {
            return false;
        }
        self.room_visibility
            .get(from)
            .map(|mask| mask & (1u64 << room) != 0)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rift_math::Quat;

    fn minimal_level() -> LevelData {
        LevelData {
            rooms: 2,
            room_visibility: vec![0b11, 0b11],
            signals: 4,
            quads: vec![LevelQuad {
                transform: Transform::from_position_rotation(
                    Vec3::new(0.0, 1.0, -3.0),
                    Quat::IDENTITY,
                ),
                half_width: 2.0,
                half_height: 1.5,
                room: 0,
                portalable: true,
                slots: SlotRange { min: 0, max: 1 },
            }],
            slots: vec![PortalSlot {
                min: Vec2::new(-1.0, -1.0),
                max: Vec2::new(1.0, 1.0),
            }],
            triggers: Vec::new(),
            buttons: Vec::new(),
            doors: Vec::new(),
            cubes: Vec::new(),
            player_start: Transform::IDENTITY,
            player_start_room: 0,
        }
    }

    #[test]
    fn test_validate_accepts_minimal_level() {
        assert!(minimal_level().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_slot_range() {
        let mut level = minimal_level();
        level.quads[0].slots = SlotRange { min: 0, max: 5 };
        assert!(matches!(
            level.validate(),
            Err(LevelError::InvalidSlotRange { quad: 0, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_room() {
        let mut level = minimal_level();
        level.quads[0].room = 7;
        assert!(matches!(
            level.validate(),
            Err(LevelError::InvalidRoom { room: 7, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_too_many_rooms() {
        let mut level = minimal_level();
        level.rooms = LevelData::MAX_ROOMS + 1;
        level.room_visibility = vec![u64::MAX; level.rooms];
        assert!(matches!(
            level.validate(),
            Err(LevelError::TooManyRooms { rooms: 65, .. })
        ));

        // The limit itself is fine
        level.rooms = LevelData::MAX_ROOMS;
        level.room_visibility = vec![u64::MAX; level.rooms];
        assert!(level.validate().is_ok());
    }

    #[test]
    fn test_room_visible_out_of_mask_range() {
        let level = minimal_level();
        // Never shifts past the mask width, even for garbage indices
        assert!(!level.room_visible(0, LevelData::MAX_ROOMS));
        assert!(!level.room_visible(0, usize::MAX));
        assert!(level.room_visible(usize::MAX, usize::MAX));
    }

    #[test]
    fn test_json_roundtrip() {
        let level = minimal_level();
        let json = serde_json::to_string(&level).unwrap();
        let loaded = LevelData::from_json(&json).unwrap();
        assert_eq!(loaded.quads.len(), 1);
        assert_eq!(loaded.rooms, 2);
    }

    #[test]
    fn test_room_visibility() {
        let mut level = minimal_level();
        level.room_visibility = vec![0b01, 0b11];
        assert!(level.room_visible(0, 0));
        assert!(!level.room_visible(0, 1));
        assert!(level.room_visible(1, 0));
        // A room always sees itself even with a zeroed mask
        level.room_visibility = vec![0, 0];
        assert!(level.room_visible(1, 1));
    }

    #[test]
    fn test_quad_local_projection() {
        let level = minimal_level();
        let quad = &level.quads[0];
        let local = quad.to_local_2d(Vec3::new(0.5, 1.25, -3.0));
        assert!((local.x - 0.5).abs() < 1e-5);
        assert!((local.y - 0.25).abs() < 1e-5);
    }
}

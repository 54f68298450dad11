//! Body handles and identity tags

use rapier3d::prelude as rapier;
use serde::{Deserialize, Serialize};

use rift_math::Transform;

use crate::layers::CollisionLayers;
use crate::shapes::CollisionShape;

/// Handle to a rigid body in the collision scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub(crate) rapier::RigidBodyHandle);

impl BodyHandle {
    /// Create from raw Rapier handle
    pub fn from_raw(handle: rapier::RigidBodyHandle) -> Self {
        Self(handle)
    }

    /// Get the raw Rapier handle
    pub fn raw(&self) -> rapier::RigidBodyHandle {
        self.0
    }
}

/// Handle to a static collider (level quad, door panel, button base)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StaticHandle(pub(crate) rapier::ColliderHandle);

/// Handle to a dynamic object registered with the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectHandle(pub usize);

/// Identity of the gameplay entity behind a collider.
///
/// Packed into Rapier's `user_data` so that raycasts and overlap reports can
/// name what they hit without a side table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyTag {
    /// Untagged collider
    None,
    /// The player body
    Player,
    /// A carryable cube, by dynamic object index
    Cube { index: u32 },
    /// Other decor props, by decor type and index
    Decor { decor_type: u32, index: u32 },
    /// A trigger sensor volume, by listener index
    TriggerListener { index: u32 },
    /// A static level quad, by quad index
    LevelQuad { index: u32 },
    /// A floor button, by button index
    Button { index: u32 },
    /// A door panel, by door index
    Door { index: u32 },
}

// Discriminants for user_data packing
const TAG_NONE: u128 = 0;
const TAG_PLAYER: u128 = 1;
const TAG_CUBE: u128 = 2;
const TAG_DECOR: u128 = 3;
const TAG_TRIGGER: u128 = 4;
const TAG_QUAD: u128 = 5;
const TAG_BUTTON: u128 = 6;
const TAG_DOOR: u128 = 7;

impl BodyTag {
    /// Pack into a collider `user_data` word.
    ///
    /// Layout: bits 0..8 discriminant, bits 8..40 index, bits 40..72 extra.
    pub fn pack(&self) -> u128 {
        let (disc, index, extra) = match *self {
            BodyTag::None => (TAG_NONE, 0, 0),
            BodyTag::Player => (TAG_PLAYER, 0, 0),
            BodyTag::Cube { index } => (TAG_CUBE, index, 0),
            BodyTag::Decor { decor_type, index } => (TAG_DECOR, index, decor_type),
            BodyTag::TriggerListener { index } => (TAG_TRIGGER, index, 0),
            BodyTag::LevelQuad { index } => (TAG_QUAD, index, 0),
            BodyTag::Button { index } => (TAG_BUTTON, index, 0),
            BodyTag::Door { index } => (TAG_DOOR, index, 0),
        };
        disc | ((index as u128) << 8) | ((extra as u128) << 40)
    }

    /// Unpack from a collider `user_data` word.
    pub fn unpack(data: u128) -> Self {
        let disc = data & 0xff;
        let index = ((data >> 8) & 0xffff_ffff) as u32;
        let extra = ((data >> 40) & 0xffff_ffff) as u32;
        match disc {
            TAG_PLAYER => BodyTag::Player,
            TAG_CUBE => BodyTag::Cube { index },
            TAG_DECOR => BodyTag::Decor {
                decor_type: extra,
                index,
            },
            TAG_TRIGGER => BodyTag::TriggerListener { index },
            TAG_QUAD => BodyTag::LevelQuad { index },
            TAG_BUTTON => BodyTag::Button { index },
            TAG_DOOR => BodyTag::Door { index },
            _ => BodyTag::None,
        }
    }

    /// Whether this tag belongs to an entity triggers care about
    pub fn is_trigger_subject(&self) -> bool {
        matches!(
            self,
            BodyTag::Player | BodyTag::Cube { .. } | BodyTag::Decor { .. }
        )
    }
}

/// Description of a dynamic object to add to the scene
#[derive(Debug, Clone)]
pub struct DynamicObjectDesc {
    /// Starting transform
    pub transform: Transform,
    /// Collision shape
    pub shape: CollisionShape,
    /// Room the object starts in
    pub room: usize,
    /// Mass in kilograms
    pub mass: f32,
    /// Collision layers
    pub layers: CollisionLayers,
    /// Gameplay identity
    pub tag: BodyTag,
    /// Kinematic bodies are positioned directly instead of simulated
    pub kinematic: bool,
    /// Whether the body may pass through open portals
    pub transferable: bool,
}

impl DynamicObjectDesc {
    pub fn new(transform: Transform, shape: CollisionShape) -> Self {
        Self {
            transform,
            shape,
            room: 0,
            mass: 1.0,
            layers: CollisionLayers::tangible(),
            tag: BodyTag::None,
            kinematic: false,
            transferable: true,
        }
    }

    /// Set the starting room
    pub fn with_room(mut self, room: usize) -> Self {
        self.room = room;
        self
    }

    /// Set the mass
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Set the collision layers
    pub fn with_layers(mut self, layers: CollisionLayers) -> Self {
        self.layers = layers;
        self
    }

    /// Set the gameplay tag
    pub fn with_tag(mut self, tag: BodyTag) -> Self {
        self.tag = tag;
        self
    }

    /// Make the body kinematic
    pub fn kinematic(mut self) -> Self {
        self.kinematic = true;
        self
    }

    /// Forbid portal transfer for this body
    pub fn not_transferable(mut self) -> Self {
        self.transferable = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_pack_roundtrip() {
        let tags = [
            BodyTag::None,
            BodyTag::Player,
            BodyTag::Cube { index: 7 },
            BodyTag::Decor {
                decor_type: 3,
                index: 250,
            },
            BodyTag::TriggerListener { index: 12 },
            BodyTag::LevelQuad { index: 4095 },
            BodyTag::Button { index: 2 },
            BodyTag::Door { index: 1 },
        ];
        for tag in tags {
            assert_eq!(BodyTag::unpack(tag.pack()), tag);
        }
    }

    #[test]
    fn test_trigger_subjects() {
        assert!(BodyTag::Player.is_trigger_subject());
        assert!(BodyTag::Cube { index: 0 }.is_trigger_subject());
        assert!(!BodyTag::LevelQuad { index: 0 }.is_trigger_subject());
        assert!(!BodyTag::None.is_trigger_subject());
    }
}
